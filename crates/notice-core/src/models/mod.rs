pub mod conversation;
pub mod member;
pub mod message;

pub use conversation::Conversation;
pub use member::{CurrentUser, Member, MemberDirectory, UserStatus};
pub use message::{ChatMessage, MessageContent};
