use std::sync::Arc;

use tracing::{debug, info};

use crate::config::UserConfig;
use crate::constants::keys;
use crate::decision::{NoticeAction, NotificationDecision, PresentationMessage, TrayNotice};
use crate::host::{ChatStore, NoticeSink, Platform, ProfileSource, UiHost, WindowHost};
use crate::lang::Localizer;
use crate::models::ChatMessage;
use crate::plain_text::{plain_text_of_chat_message, ContentRenderer, PlainTextOptions};

/// Collaborators the aggregator reads from and reports to
#[derive(Clone)]
pub struct NoticeHost {
    pub chats: Arc<dyn ChatStore>,
    pub ui: Arc<dyn UiHost>,
    pub window: Arc<dyn WindowHost>,
    pub profile: Arc<dyn ProfileSource>,
    pub lang: Arc<dyn Localizer>,
    pub renderer: Arc<dyn ContentRenderer>,
    pub sink: Arc<dyn NoticeSink>,
}

/// What the aggregator remembers between passes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregatorState {
    /// Conversation that most recently produced a notice
    pub last_notice_chat: Option<String>,
    /// Previous pass's decision, the baseline for "strictly increased"
    pub last_notice_info: Option<NotificationDecision>,
}

impl AggregatorState {
    /// `(total, not_mute_count)` of the previous pass, if one was recorded
    fn previous_counts(&self) -> Option<(u32, u32)> {
        self.last_notice_info
            .as_ref()
            .map(|info| (info.total, info.not_mute_count))
    }
}

/// Decides when unread chat messages deserve a popup, a sound or a tray flash.
pub struct NoticeAggregator {
    host: NoticeHost,
    state: AggregatorState,
    plain_text: PlainTextOptions,
}

impl NoticeAggregator {
    pub fn new(host: NoticeHost) -> Self {
        Self {
            host,
            state: AggregatorState::default(),
            plain_text: PlainTextOptions::default(),
        }
    }

    pub fn with_plain_text_options(mut self, options: PlainTextOptions) -> Self {
        self.plain_text = options;
        self
    }

    pub fn state(&self) -> &AggregatorState {
        &self.state
    }

    pub fn host(&self) -> &NoticeHost {
        &self.host
    }

    /// Run one aggregation pass and hand the decision to the sink.
    ///
    /// Returns `None` without touching any state when no user config is loaded.
    pub fn update_chat_notice(&mut self) -> Option<NotificationDecision> {
        let Some(user_config) = self.host.profile.user_config() else {
            debug!("Skipping notice pass: user config not loaded");
            return None;
        };

        let is_window_focus = self.host.window.is_window_focus();
        let ui = Arc::clone(&self.host.ui);

        let mut total: u32 = 0;
        let mut not_mute_count: u32 = 0;
        let mut last_chat_message: Option<ChatMessage> = None;
        let mut last_notice_chat = self.state.last_notice_chat.clone();
        let mut muted_batches: Vec<(String, Vec<ChatMessage>)> = Vec::new();

        self.host.chats.for_each_chat(&mut |chat| {
            if chat.notice_count == 0 {
                return;
            }
            if is_window_focus && ui.is_active_chat(&chat.gid) {
                let muted = chat.mute_notice();
                if !muted.is_empty() {
                    muted_batches.push((chat.gid.clone(), muted));
                }
                return;
            }

            total = total.saturating_add(chat.notice_count);
            if let Some(message) = chat.last_message() {
                let is_newer = last_chat_message
                    .as_ref()
                    .map_or(true, |candidate| candidate.date < message.date);
                if is_newer {
                    last_chat_message = Some(message.clone());
                    if !chat.is_mute_or_hidden() {
                        last_notice_chat = Some(chat.gid.clone());
                    }
                }
            }
            if !chat.is_mute_or_hidden() {
                not_mute_count = not_mute_count.saturating_add(chat.notice_count);
            }
        });

        // Saved after the visit so stores may lock conversations while visiting
        for (gid, messages) in muted_batches {
            debug!("Marked {} messages read in active chat {}", messages.len(), gid);
            self.host.chats.save_chat_messages(messages, &gid);
        }
        self.state.last_notice_chat = last_notice_chat.clone();

        let previous = self.state.previous_counts();
        let (has_new_notices, not_mute_increased) = match previous {
            Some((prev_total, prev_not_mute_count)) => {
                let not_mute_increased =
                    not_mute_count > 0 && not_mute_count > prev_not_mute_count;
                (not_mute_increased && total > prev_total, not_mute_increased)
            }
            // First pass only records the baseline
            None => (false, false),
        };
        let window_state = self.host.window.state();

        let mut message = None;
        if has_new_notices
            && user_config.enable_window_notification
            && (self.host.window.platform() == Platform::Browser
                || user_config
                    .window_notification_condition
                    .matches(&window_state))
        {
            message = self.build_message(
                &user_config,
                total,
                last_chat_message.as_ref(),
                last_notice_chat.as_deref(),
            );
        }

        let user_is_busy = self.host.profile.user().is_some_and(|user| user.is_busy());
        let sound = has_new_notices
            && user_config.enable_sound
            && (!user_config.mute_on_user_is_busy || !user_is_busy)
            && user_config.play_sound_condition.matches(&window_state);

        let tray = TrayNotice {
            label: if total > 0 {
                self.received_messages(total)
            } else {
                String::new()
            },
            flash: total > 0
                && not_mute_increased
                && user_config.flash_tray_icon
                && user_config.flash_tray_icon_condition.matches(&window_state),
        };

        let decision = NotificationDecision {
            total,
            chats: total,
            not_mute_count,
            message,
            sound,
            tray,
        };

        debug!(total, not_mute_count, ?previous, "Notice pass complete");
        if decision.is_alerting() {
            info!(
                "Notifying: total={} popup={} sound={} flash={}",
                total,
                decision.message.is_some(),
                decision.sound,
                decision.tray.flash
            );
        }

        self.state.last_notice_info = Some(decision.clone());
        self.host.sink.update_notice(&decision);
        Some(decision)
    }

    fn build_message(
        &self,
        user_config: &UserConfig,
        total: u32,
        last_chat_message: Option<&ChatMessage>,
        last_notice_chat: Option<&str>,
    ) -> Option<PresentationMessage> {
        let Some(chat) = last_notice_chat.and_then(|gid| self.host.chats.find_chat(gid)) else {
            debug!("No conversation to open from the popup, skipping it");
            return None;
        };
        let on_activate = NoticeAction::OpenChat {
            gid: chat.gid.clone(),
        };

        let last_chat_message = match last_chat_message {
            Some(message) if !user_config.safe_window_notification => message,
            _ => {
                return Some(PresentationMessage {
                    title: self.received_messages(total),
                    body: None,
                    icon: None,
                    on_activate,
                });
            }
        };

        let lang = self.host.lang.as_ref();
        let members = self.host.profile.members();
        let user = self.host.profile.user();
        let sender = last_chat_message.sender_of(&members);

        let title = if chat.is_one2one {
            lang.format(keys::MEMBER_SAYS, &[sender.display_name()])
        } else {
            let separator = lang.string(keys::MEMBER_LIST_SEPARATOR);
            let chat_name = chat.display_name(&members, user.as_ref(), &separator);
            lang.format(
                keys::MEMBER_SAYS_IN_GROUP,
                &[sender.display_name(), chat_name.as_str()],
            )
        };
        let body = plain_text_of_chat_message(
            last_chat_message,
            self.host.renderer.as_ref(),
            lang,
            self.plain_text,
        );

        let icon = if chat.is_one2one {
            let server = user.as_ref().and_then(|u| u.server.as_deref());
            chat.the_other_one(&members, user.as_ref())
                .and_then(|other| other.avatar_url(server))
        } else {
            None
        };

        Some(PresentationMessage {
            title,
            body: Some(body),
            icon,
            on_activate,
        })
    }

    fn received_messages(&self, total: u32) -> String {
        self.host
            .lang
            .format(keys::RECEIVED_MESSAGES, &[total.to_string().as_str()])
    }

    /// Window regained focus: the active conversation's notices count as read.
    pub fn on_window_focus(&mut self) {
        let Some(active_gid) = self.host.ui.active_chat_gid() else {
            return;
        };

        let mut muted: Option<Vec<ChatMessage>> = None;
        self.host.chats.for_each_chat(&mut |chat| {
            if chat.gid == active_gid && chat.notice_count > 0 {
                muted = Some(chat.mute_notice());
            }
        });

        if let Some(messages) = muted {
            debug!("Window focused, cleared notices in {}", active_gid);
            self.host.chats.save_chat_messages(messages, &active_gid);
        }
    }

    /// Window restored: jump to the conversation behind the last notice when
    /// it is still unread and the user is not already reading something else
    /// with pending notices. Returns whether the UI navigated.
    pub fn on_window_restore(&mut self) -> bool {
        let Some(notice_gid) = self.state.last_notice_chat.clone() else {
            return false;
        };
        let still_unread = self
            .host
            .chats
            .find_chat(&notice_gid)
            .is_some_and(|chat| chat.notice_count > 0);
        if !still_unread {
            return false;
        }

        let should_open = match self.host.ui.active_chat_gid() {
            None => true,
            Some(active_gid) => {
                let active_has_notices = self
                    .host
                    .chats
                    .find_chat(&active_gid)
                    .is_some_and(|chat| chat.notice_count > 0);
                !active_has_notices && active_gid != notice_gid
            }
        };

        if should_open {
            debug!("Window restored, opening {}", notice_gid);
            self.host.ui.open_chat(&notice_gid);
        }
        should_open
    }

    /// Perform a popup's activation: open the chat and bring the window forward.
    pub fn activate(&mut self, action: &NoticeAction) {
        match action {
            NoticeAction::OpenChat { gid } => {
                self.host.ui.open_chat(gid);
                if let Some(show_and_focus) = self.host.window.capabilities().show_and_focus_window {
                    show_and_focus();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WindowCondition;
    use crate::host::{
        MemoryChatStore, MemoryUi, RecordingSink, SharedWindow, StaticProfile, WindowCapabilities,
        WindowState,
    };
    use crate::lang::Lang;
    use crate::models::{Conversation, CurrentUser, Member, MemberDirectory, UserStatus};
    use crate::plain_text::MarkdownRenderer;
    use std::sync::atomic::{AtomicBool, Ordering};

    const BLURRED: WindowState = WindowState {
        focused: false,
        visible: true,
        minimized: false,
    };

    struct Fixture {
        chats: Arc<MemoryChatStore>,
        ui: Arc<MemoryUi>,
        window: Arc<SharedWindow>,
        profile: Arc<StaticProfile>,
        sink: Arc<RecordingSink>,
        aggregator: NoticeAggregator,
        next_id: u32,
    }

    fn always_config() -> UserConfig {
        UserConfig {
            window_notification_condition: WindowCondition::Always,
            play_sound_condition: WindowCondition::Always,
            flash_tray_icon_condition: WindowCondition::Always,
            ..UserConfig::default()
        }
    }

    impl Fixture {
        fn with_window(window: SharedWindow) -> Self {
            let members: MemberDirectory = vec![
                Member::new("me").with_realname("Me"),
                Member::new("alice")
                    .with_realname("Alice")
                    .with_avatar("/avatars/alice.png"),
                Member::new("bob").with_realname("Bob"),
            ]
            .into_iter()
            .collect();
            let mut user = CurrentUser::new("me");
            user.server = Some("https://chat.example.com".to_string());

            let chats = Arc::new(MemoryChatStore::new(Some("me".to_string())));
            let ui = Arc::new(MemoryUi::new());
            let window = Arc::new(window);
            let profile = Arc::new(StaticProfile::new(Some(always_config()), Some(user), members));
            let sink = Arc::new(RecordingSink::new());

            let host = NoticeHost {
                chats: chats.clone(),
                ui: ui.clone(),
                window: window.clone(),
                profile: profile.clone(),
                lang: Arc::new(Lang::default()),
                renderer: Arc::new(MarkdownRenderer),
                sink: sink.clone(),
            };

            Self {
                chats,
                ui,
                window,
                profile,
                sink,
                aggregator: NoticeAggregator::new(host),
                next_id: 0,
            }
        }

        fn unprimed() -> Self {
            Self::with_window(SharedWindow::new(
                BLURRED,
                Platform::Desktop,
                WindowCapabilities::default(),
            ))
        }

        /// Blurred desktop window with a baseline pass already recorded
        fn new() -> Self {
            Self::unprimed().primed()
        }

        fn primed(mut self) -> Self {
            self.pass();
            self
        }

        fn deliver(&mut self, gid: &str, sender: &str, count: u32) {
            let messages = (0..count)
                .map(|_| {
                    self.next_id += 1;
                    ChatMessage::text(
                        format!("m{}", self.next_id),
                        gid,
                        sender,
                        i64::from(self.next_id),
                        format!("message {}", self.next_id),
                    )
                })
                .collect();
            assert!(self.chats.receive(gid, messages));
        }

        fn pass(&mut self) -> NotificationDecision {
            self.aggregator.update_chat_notice().unwrap()
        }
    }

    #[test]
    fn test_same_counts_do_not_notify_twice() {
        let mut f = Fixture::new();
        f.chats.insert(Conversation::one2one("c1", "me", "alice"));
        f.deliver("c1", "alice", 2);

        let first = f.pass();
        assert!(first.message.is_some());
        assert!(first.sound);
        assert!(first.tray.flash);
        assert_eq!(first.total, 2);
        assert_eq!(first.chats, 2);

        let second = f.pass();
        assert_eq!(second.total, 2);
        assert!(second.message.is_none());
        assert!(!second.sound);
        assert!(!second.tray.flash);
        assert_eq!(second.tray.label, "You received 2 messages");
        assert_eq!(f.sink.len(), 3);

        f.deliver("c1", "alice", 1);
        assert!(f.pass().message.is_some());
    }

    #[test]
    fn test_first_pass_only_records_baseline() {
        let mut f = Fixture::unprimed();
        f.chats.insert(Conversation::one2one("c1", "me", "alice"));
        f.deliver("c1", "alice", 1);

        let first = f.pass();
        assert_eq!((first.total, first.not_mute_count), (1, 1));
        assert!(first.message.is_none());
        assert!(!first.sound);
        assert!(!first.tray.flash);
        assert_eq!(first.tray.label, "You received 1 messages");
        assert_eq!(f.aggregator.state().last_notice_info, Some(first));
        assert_eq!(f.aggregator.state().last_notice_chat.as_deref(), Some("c1"));

        f.deliver("c1", "alice", 1);
        let second = f.pass();
        assert!(second.message.is_some());
        assert!(second.sound);
        assert!(second.tray.flash);
    }

    #[test]
    fn test_counts_saturate_instead_of_overflowing() {
        let mut f = Fixture::new();
        let mut first = Conversation::one2one("c1", "me", "alice");
        first.notice_count = u32::MAX;
        let mut second = Conversation::one2one("c2", "me", "bob");
        second.notice_count = 5;
        f.chats.insert(first);
        f.chats.insert(second);

        let decision = f.pass();
        assert_eq!(decision.total, u32::MAX);
        assert_eq!(decision.not_mute_count, u32::MAX);
    }

    #[test]
    fn test_active_chat_in_focused_window_is_muted() {
        let mut f = Fixture::new();
        f.chats.insert(Conversation::one2one("c1", "me", "alice"));
        f.deliver("c1", "alice", 5);
        f.ui.set_active_chat(Some("c1".to_string()));
        f.window.set_state(WindowState::default());

        let decision = f.pass();
        assert_eq!(decision.total, 0);
        assert_eq!(decision.tray.label, "");
        assert!(!decision.is_alerting());
        assert_eq!(f.chats.find_chat("c1").unwrap().notice_count, 0);

        let saved = f.chats.saved();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].gid, "c1");
        assert_eq!(saved[0].messages.len(), 5);
    }

    #[test]
    fn test_active_chat_in_blurred_window_still_counts() {
        let mut f = Fixture::new();
        f.chats.insert(Conversation::one2one("c1", "me", "alice"));
        f.deliver("c1", "alice", 3);
        f.ui.set_active_chat(Some("c1".to_string()));

        assert_eq!(f.pass().total, 3);
        assert!(f.chats.saved().is_empty());
    }

    #[test]
    fn test_one2one_title_names_sender_and_attaches_avatar() {
        let mut f = Fixture::new();
        f.chats.insert(Conversation::one2one("c1", "me", "alice"));
        f.deliver("c1", "alice", 1);

        let message = f.pass().message.unwrap();
        assert_eq!(message.title, "Alice says:");
        assert_eq!(message.body.as_deref(), Some("message 1"));
        assert_eq!(
            message.icon.as_deref(),
            Some("https://chat.example.com/avatars/alice.png")
        );
        assert_eq!(
            message.on_activate,
            NoticeAction::OpenChat {
                gid: "c1".to_string()
            }
        );
    }

    #[test]
    fn test_group_title_names_sender_and_group() {
        let mut f = Fixture::new();
        f.chats
            .insert(Conversation::group("g1", "Release Team", &["me", "alice", "bob"]));
        f.deliver("g1", "bob", 1);

        let message = f.pass().message.unwrap();
        assert_eq!(message.title, "Bob said in Release Team:");
        assert!(message.icon.is_none());
    }

    #[test]
    fn test_newest_message_picks_notice_chat() {
        let mut f = Fixture::new();
        f.chats.insert(Conversation::one2one("c1", "me", "alice"));
        f.chats
            .insert(Conversation::group("g1", "Release Team", &["me", "alice", "bob"]));
        f.deliver("g1", "bob", 1);
        f.deliver("c1", "alice", 1);

        let decision = f.pass();
        assert_eq!(decision.total, 2);
        assert_eq!(f.aggregator.state().last_notice_chat.as_deref(), Some("c1"));
        assert_eq!(decision.message.unwrap().title, "Alice says:");
    }

    #[test]
    fn test_long_body_is_truncated() {
        let mut f = Fixture::new();
        f.chats.insert(Conversation::one2one("c1", "me", "alice"));
        let text = format!("<b>{}</b>", "y".repeat(300));
        let mut message = ChatMessage::text("long", "c1", "alice", 10, text.clone());
        message.content = crate::models::MessageContent::Text {
            text,
            markdown: true,
        };
        f.chats.receive("c1", vec![message]);

        let body = f.pass().message.unwrap().body.unwrap();
        assert_eq!(body.chars().count(), 255);
        assert!(!body.contains("<b>"));
    }

    #[test]
    fn test_safe_mode_redacts_sender_and_body() {
        let mut f = Fixture::new();
        f.profile.set_user_config(Some(UserConfig {
            safe_window_notification: true,
            ..always_config()
        }));
        f.chats.insert(Conversation::one2one("c1", "me", "alice"));
        f.deliver("c1", "alice", 3);

        let message = f.pass().message.unwrap();
        assert_eq!(message.title, "You received 3 messages");
        assert!(message.body.is_none());
        assert!(message.icon.is_none());
    }

    #[test]
    fn test_missing_user_config_short_circuits() {
        let mut f = Fixture::unprimed();
        f.profile.set_user_config(None);
        f.chats.insert(Conversation::one2one("c1", "me", "alice"));
        f.deliver("c1", "alice", 1);

        assert!(f.aggregator.update_chat_notice().is_none());
        assert!(f.sink.is_empty());
        assert_eq!(*f.aggregator.state(), AggregatorState::default());
    }

    #[test]
    fn test_muted_chat_counts_toward_total_only() {
        let mut f = Fixture::new();
        let mut muted = Conversation::group("g1", "Noise", &["me", "bob"]);
        muted.is_mute = true;
        f.chats.insert(muted);
        f.deliver("g1", "bob", 4);

        let decision = f.pass();
        assert_eq!(decision.total, 4);
        assert_eq!(decision.not_mute_count, 0);
        assert!(!decision.is_alerting());
        assert_eq!(decision.tray.label, "You received 4 messages");
        assert!(f.aggregator.state().last_notice_chat.is_none());
    }

    #[test]
    fn test_tray_flash_needs_only_unmuted_increase() {
        let mut f = Fixture::new();
        f.chats.insert(Conversation::one2one("c1", "me", "alice"));
        let mut muted = Conversation::group("g1", "Noise", &["me", "bob"]);
        muted.is_mute = true;
        f.chats.insert(muted);
        f.deliver("c1", "alice", 1);
        f.deliver("g1", "bob", 3);
        let first = f.pass();
        assert_eq!((first.total, first.not_mute_count), (4, 1));

        // The muted backlog is read elsewhere while one more direct message arrives
        f.chats.for_each_chat(&mut |chat| {
            if chat.gid == "g1" {
                chat.mute_notice();
            }
        });
        f.deliver("c1", "alice", 1);

        let second = f.pass();
        assert_eq!((second.total, second.not_mute_count), (2, 2));
        assert!(second.message.is_none());
        assert!(!second.sound);
        assert!(second.tray.flash);
    }

    #[test]
    fn test_busy_user_gets_no_sound() {
        let mut f = Fixture::new();
        let mut user = CurrentUser::new("me");
        user.status = UserStatus::Busy;
        f.profile.set_user(Some(user));
        f.chats.insert(Conversation::one2one("c1", "me", "alice"));
        f.deliver("c1", "alice", 1);

        let decision = f.pass();
        assert!(decision.message.is_some());
        assert!(!decision.sound);

        f.profile.set_user_config(Some(UserConfig {
            mute_on_user_is_busy: false,
            ..always_config()
        }));
        f.deliver("c1", "alice", 1);
        assert!(f.pass().sound);
    }

    #[test]
    fn test_window_condition_gates_popup_except_in_browser() {
        let blur_only = UserConfig {
            window_notification_condition: WindowCondition::OnWindowBlur,
            ..always_config()
        };

        let mut desktop = Fixture::with_window(SharedWindow::new(
            WindowState::default(),
            Platform::Desktop,
            WindowCapabilities::default(),
        ))
        .primed();
        desktop.profile.set_user_config(Some(blur_only.clone()));
        desktop.chats.insert(Conversation::one2one("c1", "me", "alice"));
        desktop.deliver("c1", "alice", 1);
        let decision = desktop.pass();
        assert!(decision.message.is_none());
        assert!(decision.sound);

        let mut browser = Fixture::with_window(SharedWindow::new(
            WindowState::default(),
            Platform::Browser,
            WindowCapabilities::default(),
        ))
        .primed();
        browser.profile.set_user_config(Some(blur_only));
        browser.chats.insert(Conversation::one2one("c1", "me", "alice"));
        browser.deliver("c1", "alice", 1);
        assert!(browser.pass().message.is_some());
    }

    #[test]
    fn test_focus_mutes_active_chat() {
        let mut f = Fixture::new();
        f.chats.insert(Conversation::one2one("c1", "me", "alice"));
        f.deliver("c1", "alice", 2);
        f.ui.set_active_chat(Some("c1".to_string()));

        f.aggregator.on_window_focus();
        assert_eq!(f.chats.find_chat("c1").unwrap().notice_count, 0);
        assert_eq!(f.chats.saved().len(), 1);

        // Nothing pending: nothing saved
        f.aggregator.on_window_focus();
        assert_eq!(f.chats.saved().len(), 1);
    }

    #[test]
    fn test_restore_opens_last_notice_chat() {
        let mut f = Fixture::new();
        f.chats.insert(Conversation::one2one("c1", "me", "alice"));
        f.chats.insert(Conversation::one2one("c2", "me", "bob"));
        f.deliver("c1", "alice", 1);
        f.pass();

        // Reading a chat without notices: jump to the notice
        f.ui.set_active_chat(Some("c2".to_string()));
        assert!(f.aggregator.on_window_restore());
        assert_eq!(f.ui.active_chat_gid().as_deref(), Some("c1"));
        assert_eq!(f.ui.route().as_deref(), Some("#/chats/recents/c1"));

        // Active chat with its own notices stays put
        f.deliver("c2", "bob", 1);
        f.ui.set_active_chat(Some("c2".to_string()));
        assert!(!f.aggregator.on_window_restore());
        assert_eq!(f.ui.active_chat_gid().as_deref(), Some("c2"));
    }

    #[test]
    fn test_restore_without_unread_notice_chat_does_nothing() {
        let mut f = Fixture::new();
        assert!(!f.aggregator.on_window_restore());

        f.chats.insert(Conversation::one2one("c1", "me", "alice"));
        f.deliver("c1", "alice", 1);
        f.pass();
        f.chats.for_each_chat(&mut |chat| {
            chat.mute_notice();
        });
        assert!(!f.aggregator.on_window_restore());
        assert!(f.ui.active_chat_gid().is_none());
    }

    #[test]
    fn test_activate_opens_chat_and_focuses_window() {
        let shown = Arc::new(AtomicBool::new(false));
        let flag = shown.clone();
        let mut f = Fixture::with_window(SharedWindow::new(
            BLURRED,
            Platform::Desktop,
            WindowCapabilities {
                show_and_focus_window: Some(Arc::new(move || flag.store(true, Ordering::SeqCst))),
                focus_events: true,
                restore_events: true,
            },
        ));

        f.aggregator.activate(&NoticeAction::OpenChat {
            gid: "c9".to_string(),
        });
        assert!(shown.load(Ordering::SeqCst));
        assert_eq!(f.ui.active_chat_gid().as_deref(), Some("c9"));
    }
}
