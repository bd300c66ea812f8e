use serde::{Deserialize, Serialize};

use super::member::{CurrentUser, Member, MemberDirectory};
use super::message::ChatMessage;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub gid: String,
    /// Explicit group name; one-to-one chats usually leave this empty
    #[serde(default)]
    pub name: Option<String>,
    /// Unread messages not yet surfaced to the user
    #[serde(default)]
    pub notice_count: u32,
    /// Messages ordered by arrival
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub is_mute: bool,
    #[serde(default)]
    pub is_hidden: bool,
    #[serde(default)]
    pub is_one2one: bool,
    /// Member accounts, including the current user
    #[serde(default)]
    pub members: Vec<String>,
}

impl Conversation {
    pub fn new(gid: impl Into<String>) -> Self {
        Self {
            gid: gid.into(),
            name: None,
            notice_count: 0,
            messages: Vec::new(),
            is_mute: false,
            is_hidden: false,
            is_one2one: false,
            members: Vec::new(),
        }
    }

    pub fn one2one(gid: impl Into<String>, me: &str, other: &str) -> Self {
        let mut chat = Self::new(gid);
        chat.is_one2one = true;
        chat.members = vec![me.to_string(), other.to_string()];
        chat
    }

    pub fn group(gid: impl Into<String>, name: impl Into<String>, members: &[&str]) -> Self {
        let mut chat = Self::new(gid);
        chat.name = Some(name.into());
        chat.members = members.iter().map(|m| m.to_string()).collect();
        chat
    }

    pub fn last_message(&self) -> Option<&ChatMessage> {
        self.messages.iter().max_by_key(|m| m.date)
    }

    pub fn is_mute_or_hidden(&self) -> bool {
        self.is_mute || self.is_hidden
    }

    /// Append incoming messages. Messages from `me` are stored read and do
    /// not raise the notice count.
    pub fn receive(&mut self, messages: Vec<ChatMessage>, me: Option<&str>) {
        for mut message in messages {
            if self.messages.iter().any(|m| m.id == message.id) {
                continue;
            }
            if me == Some(message.sender.as_str()) {
                message.unread = false;
            } else {
                message.unread = true;
                self.notice_count += 1;
            }
            self.messages.push(message);
        }
    }

    /// Clear the notice count and mark unread messages read.
    ///
    /// Returns the messages that were newly marked read.
    pub fn mute_notice(&mut self) -> Vec<ChatMessage> {
        self.notice_count = 0;
        let mut muted = Vec::new();
        for message in self.messages.iter_mut().filter(|m| m.unread) {
            message.unread = false;
            muted.push(message.clone());
        }
        muted
    }

    /// The member on the other side of a one-to-one chat
    pub fn the_other_one(&self, members: &MemberDirectory, user: Option<&CurrentUser>) -> Option<Member> {
        let me = user.map(|u| u.account.as_str());
        self.members
            .iter()
            .find(|account| Some(account.as_str()) != me)
            .map(|account| members.guess(account))
    }

    /// Name shown for this chat: explicit name, the other member for
    /// one-to-one chats, or the joined member names.
    pub fn display_name(
        &self,
        members: &MemberDirectory,
        user: Option<&CurrentUser>,
        separator: &str,
    ) -> String {
        if let Some(name) = self.name.as_deref().filter(|n| !n.trim().is_empty()) {
            return name.to_string();
        }
        if self.is_one2one {
            if let Some(other) = self.the_other_one(members, user) {
                return other.display_name().to_string();
            }
        }
        let names: Vec<String> = self
            .members
            .iter()
            .map(|account| members.guess(account).display_name().to_string())
            .collect();
        if names.is_empty() {
            self.gid.clone()
        } else {
            names.join(separator)
        }
    }
}
