use serde::{Deserialize, Serialize};

use super::member::{Member, MemberDirectory};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MessageContent {
    Text {
        text: String,
        /// Render as markdown instead of escaped plain text
        #[serde(default)]
        markdown: bool,
    },
    File {
        name: String,
        #[serde(default)]
        size: u64,
    },
    Image {
        #[serde(default)]
        name: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    /// Conversation the message belongs to
    pub gid: String,
    /// Sender account
    pub sender: String,
    /// Milliseconds since the Unix epoch
    pub date: i64,
    pub content: MessageContent,
    #[serde(default)]
    pub unread: bool,
}

impl ChatMessage {
    pub fn text(
        id: impl Into<String>,
        gid: impl Into<String>,
        sender: impl Into<String>,
        date: i64,
        text: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            gid: gid.into(),
            sender: sender.into(),
            date,
            content: MessageContent::Text {
                text: text.into(),
                markdown: false,
            },
            unread: true,
        }
    }

    pub fn is_file_content(&self) -> bool {
        matches!(self.content, MessageContent::File { .. })
    }

    pub fn is_image_content(&self) -> bool {
        matches!(self.content, MessageContent::Image { .. })
    }

    pub fn sender_of(&self, members: &MemberDirectory) -> Member {
        members.guess(&self.sender)
    }
}
