//! Scenario files: a snapshot of chats and window state plus a script of
//! events replayed through the notice runtime.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use notice_core::aggregator::{AggregatorState, NoticeHost};
use notice_core::host::{
    MemoryChatStore, MemoryUi, NoticeSink, Platform, SharedWindow, StaticProfile, UiHost,
    WindowCapabilities, WindowEvent, WindowState,
};
use notice_core::lang::Lang;
use notice_core::models::{ChatMessage, Conversation, CurrentUser, Member, MessageContent};
use notice_core::plain_text::MarkdownRenderer;
use notice_core::{NoticeAction, NoticeAggregator, NoticeConfig, NoticeRuntime, UserConfig};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomingMessage {
    #[serde(default)]
    pub id: Option<String>,
    pub sender: String,
    /// Milliseconds since epoch; defaults to replay time
    #[serde(default)]
    pub date: Option<i64>,
    #[serde(flatten)]
    pub content: MessageContent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Step {
    /// Deliver messages to a conversation and fire the arrival hook
    Messages {
        gid: String,
        messages: Vec<IncomingMessage>,
    },
    Window { event: WindowEvent },
    ActiveChat { gid: Option<String> },
    Wait { ms: u64 },
    /// Force a pass without waiting for the debounce window
    Evaluate,
    /// Simulate the user clicking a popup
    Activate { gid: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default)]
    pub platform: Platform,
    #[serde(default)]
    pub window: WindowState,
    #[serde(default)]
    pub user: Option<CurrentUser>,
    /// Overrides the stored user config when present
    #[serde(default)]
    pub config: Option<UserConfig>,
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub conversations: Vec<Conversation>,
    #[serde(default)]
    pub active_chat: Option<String>,
    #[serde(default)]
    pub debounce_ms: Option<u64>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

fn default_locale() -> String {
    "en".to_string()
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario file: {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Failed to parse scenario file: {}", path.display()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid scenario JSON")
    }
}

/// Outcome of a replay
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayReport {
    pub route: Option<String>,
    pub active_chat: Option<String>,
    pub last_notice_chat: Option<String>,
    pub pending_notices: u32,
}

impl ReplayReport {
    fn new(state: &AggregatorState, ui: &MemoryUi, chats: &MemoryChatStore) -> Self {
        Self {
            route: ui.route(),
            active_chat: ui.active_chat_gid(),
            last_notice_chat: state.last_notice_chat.clone(),
            pending_notices: chats.conversations().iter().map(|c| c.notice_count).sum(),
        }
    }
}

/// Replay `scenario` through a fresh runtime, reporting decisions to `sink`.
pub async fn replay(
    scenario: Scenario,
    stored_config: UserConfig,
    notice_config: &NoticeConfig,
    sink: Arc<dyn NoticeSink>,
) -> Result<ReplayReport> {
    let me = scenario.user.as_ref().map(|u| u.account.clone());
    let chats = Arc::new(MemoryChatStore::new(me));
    for chat in scenario.conversations {
        chats.insert(chat);
    }

    let ui = Arc::new(MemoryUi::new());
    ui.set_active_chat(scenario.active_chat);

    let window = Arc::new(SharedWindow::new(
        scenario.window,
        scenario.platform,
        WindowCapabilities {
            show_and_focus_window: Some(Arc::new(|| info!("Window shown and focused"))),
            focus_events: true,
            restore_events: true,
        },
    ));

    let user_config = scenario.config.unwrap_or(stored_config);
    let profile = Arc::new(StaticProfile::new(
        Some(user_config),
        scenario.user,
        scenario.members.into_iter().collect(),
    ));

    let host = NoticeHost {
        chats: chats.clone(),
        ui: ui.clone(),
        window: window.clone(),
        profile,
        lang: Arc::new(Lang::new(&scenario.locale)),
        renderer: Arc::new(MarkdownRenderer),
        sink,
    };

    let mut config = notice_config.clone();
    if let Some(ms) = scenario.debounce_ms {
        config.debounce = Duration::from_millis(ms);
    }
    let aggregator = NoticeAggregator::new(host).with_plain_text_options(config.plain_text);
    let (handle, task) = NoticeRuntime::spawn(aggregator, &config);

    // Default dates stay strictly increasing even within one millisecond
    let mut last_date = i64::MIN;
    for (index, step) in scenario.steps.into_iter().enumerate() {
        debug!("Step {}: {:?}", index, step);
        match step {
            Step::Messages { gid, messages } => {
                let messages = messages
                    .into_iter()
                    .enumerate()
                    .map(|(i, incoming)| {
                        let date = incoming.date.unwrap_or_else(|| {
                            chrono::Utc::now()
                                .timestamp_millis()
                                .max(last_date.saturating_add(1))
                        });
                        last_date = last_date.max(date);
                        ChatMessage {
                            id: incoming
                                .id
                                .unwrap_or_else(|| format!("step{}-{}", index, i)),
                            gid: gid.clone(),
                            sender: incoming.sender,
                            date,
                            content: incoming.content,
                            unread: true,
                        }
                    })
                    .collect();
                if !chats.receive(&gid, messages) {
                    anyhow::bail!("Step {}: unknown conversation '{}'", index, gid);
                }
                handle.on_chat_messages()?;
            }
            Step::Window { event } => {
                window.apply(event);
                handle.window_event(event)?;
            }
            Step::ActiveChat { gid } => ui.set_active_chat(gid),
            Step::Wait { ms } => tokio::time::sleep(Duration::from_millis(ms)).await,
            Step::Evaluate => {
                handle.evaluate_now().await?;
            }
            Step::Activate { gid } => handle.activate(NoticeAction::OpenChat { gid })?,
        }
    }

    let state = handle.shutdown().await?;
    task.await.context("Notice runtime task failed")?;
    Ok(ReplayReport::new(&state, &ui, &chats))
}
