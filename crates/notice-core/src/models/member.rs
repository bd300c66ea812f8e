use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub account: String,
    #[serde(default)]
    pub realname: Option<String>,
    /// Absolute URL or a path relative to the user's server
    #[serde(default)]
    pub avatar: Option<String>,
}

impl Member {
    pub fn new(account: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            realname: None,
            avatar: None,
        }
    }

    pub fn with_realname(mut self, realname: impl Into<String>) -> Self {
        self.realname = Some(realname.into());
        self
    }

    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }

    /// Real name when set, account otherwise
    pub fn display_name(&self) -> &str {
        match self.realname.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.account,
        }
    }

    /// Resolve the avatar against `server` when it is a relative path.
    pub fn avatar_url(&self, server: Option<&str>) -> Option<String> {
        let avatar = self.avatar.as_deref()?.trim();
        if avatar.is_empty() {
            return None;
        }
        if avatar.starts_with("http://")
            || avatar.starts_with("https://")
            || avatar.starts_with("data:")
        {
            return Some(avatar.to_string());
        }
        match server {
            Some(server) if !server.trim().is_empty() => Some(format!(
                "{}/{}",
                server.trim().trim_end_matches('/'),
                avatar.trim_start_matches('/')
            )),
            _ => Some(avatar.to_string()),
        }
    }
}

/// Lookup table of known members keyed by account
#[derive(Debug, Clone, Default)]
pub struct MemberDirectory {
    members: HashMap<String, Member>,
}

impl MemberDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, member: Member) {
        self.members.insert(member.account.clone(), member);
    }

    pub fn get(&self, account: &str) -> Option<&Member> {
        self.members.get(account)
    }

    /// Known member, or a bare member named after the account.
    pub fn guess(&self, account: &str) -> Member {
        self.get(account)
            .cloned()
            .unwrap_or_else(|| Member::new(account))
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl FromIterator<Member> for MemberDirectory {
    fn from_iter<I: IntoIterator<Item = Member>>(iter: I) -> Self {
        let mut directory = Self::new();
        for member in iter {
            directory.insert(member);
        }
        directory
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UserStatus {
    #[default]
    Online,
    Busy,
    Away,
    Offline,
}

/// The signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub account: String,
    /// Server base URL, used to resolve relative avatars
    #[serde(default)]
    pub server: Option<String>,
    #[serde(default)]
    pub status: UserStatus,
}

impl CurrentUser {
    pub fn new(account: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            server: None,
            status: UserStatus::Online,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.status == UserStatus::Busy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_prefers_realname() {
        assert_eq!(Member::new("alice").display_name(), "alice");
        assert_eq!(
            Member::new("alice").with_realname("Alice Liddell").display_name(),
            "Alice Liddell"
        );
        assert_eq!(Member::new("bob").with_realname("  ").display_name(), "bob");
    }

    #[test]
    fn test_avatar_url_resolves_relative_paths() {
        let member = Member::new("alice").with_avatar("/data/upload/alice.png");
        assert_eq!(
            member.avatar_url(Some("https://chat.example.com/")).as_deref(),
            Some("https://chat.example.com/data/upload/alice.png")
        );
        assert_eq!(
            member.avatar_url(None).as_deref(),
            Some("/data/upload/alice.png")
        );

        let absolute = Member::new("bob").with_avatar("https://cdn.example.com/bob.png");
        assert_eq!(
            absolute.avatar_url(Some("https://chat.example.com")).as_deref(),
            Some("https://cdn.example.com/bob.png")
        );

        assert_eq!(Member::new("carol").avatar_url(Some("https://x")), None);
    }

    #[test]
    fn test_directory_guess_falls_back_to_account() {
        let directory: MemberDirectory = vec![Member::new("alice").with_realname("Alice")]
            .into_iter()
            .collect();
        assert_eq!(directory.guess("alice").display_name(), "Alice");
        assert_eq!(directory.guess("mallory").display_name(), "mallory");
    }
}
