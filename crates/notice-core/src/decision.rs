use serde::{Deserialize, Serialize};

use crate::constants::RECENT_CHAT_ROUTE_PREFIX;

/// What happens when the user activates a popup notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum NoticeAction {
    /// Navigate to the conversation and bring the window forward
    OpenChat { gid: String },
}

impl NoticeAction {
    pub fn route(&self) -> String {
        match self {
            NoticeAction::OpenChat { gid } => chat_route(gid),
        }
    }
}

pub fn chat_route(gid: &str) -> String {
    format!("{RECENT_CHAT_ROUTE_PREFIX}{gid}")
}

/// Popup payload handed to the presentation sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentationMessage {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub on_activate: NoticeAction,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrayNotice {
    /// Human-readable unread total, empty when nothing is pending
    pub label: String,
    pub flash: bool,
}

/// Outcome of one aggregation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDecision {
    /// Pending notices across conversations not currently being read
    pub total: u32,
    /// Mirrors `total`; kept for consumers of the older payload shape
    pub chats: u32,
    /// Pending notices in conversations that are neither muted nor hidden
    pub not_mute_count: u32,
    pub message: Option<PresentationMessage>,
    pub sound: bool,
    pub tray: TrayNotice,
}

impl NotificationDecision {
    /// Whether this decision asks for any attention-grabbing effect
    pub fn is_alerting(&self) -> bool {
        self.message.is_some() || self.sound || self.tray.flash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_chat_route() {
        let action = NoticeAction::OpenChat {
            gid: "g-42".to_string(),
        };
        assert_eq!(action.route(), "#/chats/recents/g-42");
    }

    #[test]
    fn test_decision_serializes_camel_case() {
        let decision = NotificationDecision {
            total: 2,
            chats: 2,
            not_mute_count: 1,
            message: Some(PresentationMessage {
                title: "Alice says:".to_string(),
                body: None,
                icon: None,
                on_activate: NoticeAction::OpenChat {
                    gid: "c1".to_string(),
                },
            }),
            sound: true,
            tray: TrayNotice {
                label: "You received 2 messages".to_string(),
                flash: false,
            },
        };
        let json = serde_json::to_value(&decision).unwrap();
        assert_eq!(json["notMuteCount"], 1);
        assert_eq!(json["message"]["onActivate"]["action"], "openChat");
        assert!(json["message"].get("body").is_none());
        assert!(decision.is_alerting());
        assert!(!NotificationDecision::default().is_alerting());
    }
}
