//! Application-wide constants
//!
//! Centralized location for localization keys, defaults and route strings
//! shared by the aggregator, the runtime and hosts.

/// Trailing debounce window for the aggregation pass, in milliseconds
pub const NOTICE_DEBOUNCE_MS: u64 = 200;

/// Default maximum length of a notification body
pub const DEFAULT_PLAIN_TEXT_LIMIT: usize = 255;

/// File name of the persisted user configuration inside the data dir
pub const USER_CONFIG_FILE: &str = "user-config.json";

/// Directory name used under the platform data dir
pub const APP_DIR_NAME: &str = "chat-notice";

/// Environment variable enabling the debug file log
pub const LOG_FILE_ENV: &str = "CHAT_NOTICE_LOG_FILE";

/// Route prefix the UI uses for the recent-chats view
pub const RECENT_CHAT_ROUTE_PREFIX: &str = "#/chats/recents/";

// Localization keys
pub mod keys {
    /// "You received {0} messages"
    pub const RECEIVED_MESSAGES: &str = "notification.receivedMessages.format";
    /// "{0} says:"
    pub const MEMBER_SAYS: &str = "notification.memberSays.format";
    /// "{0} said in {1}:"
    pub const MEMBER_SAYS_IN_GROUP: &str = "notification.memberSaysInGroup.format";
    /// "File: {0}"
    pub const FILE_TITLE: &str = "file.title.format";
    /// "Image"
    pub const IMAGE_TITLE: &str = "file.image.title";
    /// Separator used when joining member names into a group title
    pub const MEMBER_LIST_SEPARATOR: &str = "chat.members.separator";
    /// "Unknown member"
    pub const UNKNOWN_MEMBER: &str = "member.unknown";
}
