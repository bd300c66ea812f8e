//! Collaborator interfaces the aggregator calls into, plus in-memory
//! implementations used by hosts without their own stores and by tests.

use std::fmt;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};

use crate::config::UserConfig;
use crate::decision::{chat_route, NotificationDecision};
use crate::models::{ChatMessage, Conversation, CurrentUser, MemberDirectory};
use crate::runtime::NoticeHandle;

/// Access to every known conversation.
pub trait ChatStore: Send + Sync {
    /// Visit every conversation in a stable order.
    fn for_each_chat(&self, visitor: &mut dyn FnMut(&mut Conversation));

    fn find_chat(&self, gid: &str) -> Option<Conversation>;

    /// Persist messages that were just marked read. Fire-and-forget.
    fn save_chat_messages(&self, messages: Vec<ChatMessage>, gid: &str);
}

/// The chat UI: which conversation is on screen and how to switch.
pub trait UiHost: Send + Sync {
    fn active_chat_gid(&self) -> Option<String>;

    /// Navigate the UI to the conversation
    fn open_chat(&self, gid: &str);

    fn is_active_chat(&self, gid: &str) -> bool {
        self.active_chat_gid().as_deref() == Some(gid)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowState {
    pub focused: bool,
    pub visible: bool,
    pub minimized: bool,
}

impl Default for WindowState {
    fn default() -> Self {
        Self {
            focused: true,
            visible: true,
            minimized: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WindowEvent {
    Focus,
    Blur,
    Restore,
    Minimize,
    Hide,
    Show,
}

impl WindowState {
    pub fn apply(&mut self, event: WindowEvent) {
        match event {
            WindowEvent::Focus => {
                self.focused = true;
                self.visible = true;
                self.minimized = false;
            }
            WindowEvent::Blur => self.focused = false,
            WindowEvent::Restore => {
                self.visible = true;
                self.minimized = false;
            }
            WindowEvent::Minimize => {
                self.focused = false;
                self.minimized = true;
            }
            WindowEvent::Hide => {
                self.focused = false;
                self.visible = false;
            }
            WindowEvent::Show => self.visible = true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Platform {
    #[default]
    Desktop,
    /// Web build: popups are not gated by window conditions
    Browser,
}

pub type WindowAction = Arc<dyn Fn() + Send + Sync>;

/// Optional window features a host may or may not provide.
#[derive(Clone, Default)]
pub struct WindowCapabilities {
    pub show_and_focus_window: Option<WindowAction>,
    /// Host delivers focus-gained events
    pub focus_events: bool,
    /// Host delivers restore events
    pub restore_events: bool,
}

impl fmt::Debug for WindowCapabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowCapabilities")
            .field("show_and_focus_window", &self.show_and_focus_window.is_some())
            .field("focus_events", &self.focus_events)
            .field("restore_events", &self.restore_events)
            .finish()
    }
}

pub trait WindowHost: Send + Sync {
    fn state(&self) -> WindowState;

    fn platform(&self) -> Platform {
        Platform::Desktop
    }

    fn capabilities(&self) -> WindowCapabilities;

    fn is_window_focus(&self) -> bool {
        self.state().focused
    }
}

/// Signed-in user, their config and the member directory.
pub trait ProfileSource: Send + Sync {
    /// `None` until the user's config has loaded
    fn user_config(&self) -> Option<UserConfig>;

    fn user(&self) -> Option<CurrentUser>;

    fn members(&self) -> MemberDirectory;
}

/// Consumes decisions and drives the OS notification, sound and tray icon.
pub trait NoticeSink: Send + Sync {
    fn update_notice(&self, decision: &NotificationDecision);

    /// Called once by `NoticeRuntime::spawn`. Sinks whose popups can be
    /// activated keep the handle to route `on_activate` back.
    fn bind_handle(&self, _handle: &NoticeHandle) {}
}

impl<F> NoticeSink for F
where
    F: Fn(&NotificationDecision) + Send + Sync,
{
    fn update_notice(&self, decision: &NotificationDecision) {
        self(decision)
    }
}

// ===== In-memory implementations =====

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedMessages {
    pub gid: String,
    pub messages: Vec<ChatMessage>,
}

/// Conversations held in insertion order
#[derive(Debug, Default)]
pub struct MemoryChatStore {
    me: Option<String>,
    chats: RwLock<Vec<Conversation>>,
    saved: Mutex<Vec<SavedMessages>>,
}

impl MemoryChatStore {
    pub fn new(me: Option<String>) -> Self {
        Self {
            me,
            chats: RwLock::new(Vec::new()),
            saved: Mutex::new(Vec::new()),
        }
    }

    /// Insert or replace a conversation
    pub fn insert(&self, chat: Conversation) {
        let mut chats = self.chats.write();
        match chats.iter_mut().find(|c| c.gid == chat.gid) {
            Some(existing) => *existing = chat,
            None => chats.push(chat),
        }
    }

    /// Deliver incoming messages. Returns false for an unknown conversation.
    pub fn receive(&self, gid: &str, messages: Vec<ChatMessage>) -> bool {
        let mut chats = self.chats.write();
        match chats.iter_mut().find(|c| c.gid == gid) {
            Some(chat) => {
                chat.receive(messages, self.me.as_deref());
                true
            }
            None => false,
        }
    }

    pub fn conversations(&self) -> Vec<Conversation> {
        self.chats.read().clone()
    }

    pub fn saved(&self) -> Vec<SavedMessages> {
        self.saved.lock().clone()
    }
}

impl ChatStore for MemoryChatStore {
    fn for_each_chat(&self, visitor: &mut dyn FnMut(&mut Conversation)) {
        let mut chats = self.chats.write();
        for chat in chats.iter_mut() {
            visitor(chat);
        }
    }

    fn find_chat(&self, gid: &str) -> Option<Conversation> {
        self.chats.read().iter().find(|c| c.gid == gid).cloned()
    }

    fn save_chat_messages(&self, messages: Vec<ChatMessage>, gid: &str) {
        let mut chats = self.chats.write();
        if let Some(chat) = chats.iter_mut().find(|c| c.gid == gid) {
            for saved in &messages {
                if let Some(stored) = chat.messages.iter_mut().find(|m| m.id == saved.id) {
                    *stored = saved.clone();
                }
            }
        }
        drop(chats);
        self.saved.lock().push(SavedMessages {
            gid: gid.to_string(),
            messages,
        });
    }
}

/// UI state: active conversation and current route
#[derive(Debug, Default)]
pub struct MemoryUi {
    active_chat: RwLock<Option<String>>,
    route: RwLock<Option<String>>,
}

impl MemoryUi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_active_chat(&self, gid: Option<String>) {
        if let Some(gid) = gid.as_deref() {
            *self.route.write() = Some(chat_route(gid));
        }
        *self.active_chat.write() = gid;
    }

    pub fn route(&self) -> Option<String> {
        self.route.read().clone()
    }
}

impl UiHost for MemoryUi {
    fn active_chat_gid(&self) -> Option<String> {
        self.active_chat.read().clone()
    }

    fn open_chat(&self, gid: &str) {
        self.set_active_chat(Some(gid.to_string()));
    }
}

/// Window whose state the host updates from its own event loop
#[derive(Debug)]
pub struct SharedWindow {
    state: RwLock<WindowState>,
    platform: Platform,
    capabilities: WindowCapabilities,
}

impl SharedWindow {
    pub fn new(state: WindowState, platform: Platform, capabilities: WindowCapabilities) -> Self {
        Self {
            state: RwLock::new(state),
            platform,
            capabilities,
        }
    }

    pub fn set_state(&self, state: WindowState) {
        *self.state.write() = state;
    }

    pub fn apply(&self, event: WindowEvent) -> WindowState {
        let mut state = self.state.write();
        state.apply(event);
        *state
    }
}

impl Default for SharedWindow {
    fn default() -> Self {
        Self::new(
            WindowState::default(),
            Platform::Desktop,
            WindowCapabilities {
                show_and_focus_window: None,
                focus_events: true,
                restore_events: true,
            },
        )
    }
}

impl WindowHost for SharedWindow {
    fn state(&self) -> WindowState {
        *self.state.read()
    }

    fn platform(&self) -> Platform {
        self.platform
    }

    fn capabilities(&self) -> WindowCapabilities {
        self.capabilities.clone()
    }
}

#[derive(Debug, Default)]
pub struct StaticProfile {
    config: RwLock<Option<UserConfig>>,
    user: RwLock<Option<CurrentUser>>,
    members: RwLock<MemberDirectory>,
}

impl StaticProfile {
    pub fn new(config: Option<UserConfig>, user: Option<CurrentUser>, members: MemberDirectory) -> Self {
        Self {
            config: RwLock::new(config),
            user: RwLock::new(user),
            members: RwLock::new(members),
        }
    }

    pub fn set_user_config(&self, config: Option<UserConfig>) {
        *self.config.write() = config;
    }

    pub fn set_user(&self, user: Option<CurrentUser>) {
        *self.user.write() = user;
    }
}

impl ProfileSource for StaticProfile {
    fn user_config(&self) -> Option<UserConfig> {
        self.config.read().clone()
    }

    fn user(&self) -> Option<CurrentUser> {
        self.user.read().clone()
    }

    fn members(&self) -> MemberDirectory {
        self.members.read().clone()
    }
}

/// Sink that keeps every decision it receives
#[derive(Debug, Default)]
pub struct RecordingSink {
    decisions: Mutex<Vec<NotificationDecision>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn decisions(&self) -> Vec<NotificationDecision> {
        self.decisions.lock().clone()
    }

    pub fn last(&self) -> Option<NotificationDecision> {
        self.decisions.lock().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.decisions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.decisions.lock().is_empty()
    }
}

impl NoticeSink for RecordingSink {
    fn update_notice(&self, decision: &NotificationDecision) {
        self.decisions.lock().push(decision.clone());
    }
}
