pub mod aggregator;
pub mod config;
pub mod constants;
pub mod debounce;
pub mod decision;
pub mod error;
pub mod host;
pub mod lang;
pub mod models;
pub mod plain_text;
pub mod runtime;
pub mod tracing_setup;

// Re-export the types hosts wire together at crate root for convenience
pub use aggregator::NoticeAggregator;
pub use config::{NoticeConfig, UserConfig, WindowCondition};
pub use decision::{NoticeAction, NotificationDecision, PresentationMessage, TrayNotice};
pub use error::NoticeError;
pub use runtime::{NoticeHandle, NoticeRuntime};
