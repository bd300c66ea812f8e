use std::io::Write;
use std::sync::Arc;
use std::thread;

use notice_core::host::NoticeSink;
use notice_core::{NoticeAction, NoticeHandle, NotificationDecision};
use notify_rust::{Notification, Timeout};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

/// Application name for desktop notifications
const APP_NAME: &str = "Chat Notice";

/// Default timeout for desktop notifications (5 seconds)
const DEFAULT_TIMEOUT_MS: u32 = 5000;

/// Freedesktop sound played alongside a popup
const MESSAGE_SOUND: &str = "message-new-instant";

const FALLBACK_ICON: &str = "mail-message-new";

/// Action id the notification server reports for a click on the popup body
const DEFAULT_ACTION: &str = "default";

/// Writes each decision to stdout as one JSON document
pub struct StdoutSink {
    pretty: bool,
}

impl StdoutSink {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl NoticeSink for StdoutSink {
    fn update_notice(&self, decision: &NotificationDecision) {
        let json = if self.pretty {
            serde_json::to_string_pretty(decision)
        } else {
            serde_json::to_string(decision)
        };
        match json {
            Ok(json) => {
                let mut stdout = std::io::stdout().lock();
                if let Err(e) = writeln!(stdout, "{}", json) {
                    warn!("Failed to write decision: {}", e);
                }
            }
            Err(e) => warn!("Failed to serialize decision: {}", e),
        }
    }
}

/// Shows popups through the desktop notification service and routes
/// clicks back to the runtime that produced them
#[derive(Debug, Default)]
pub struct DesktopSink {
    handle: Mutex<Option<NoticeHandle>>,
}

impl DesktopSink {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Forward a notification action to the runtime. Returns whether the popup's
/// activation was delivered.
fn route_action(handle: Option<&NoticeHandle>, action_id: &str, on_activate: &NoticeAction) -> bool {
    if action_id != DEFAULT_ACTION {
        debug!("Notification dismissed ({})", action_id);
        return false;
    }
    let Some(handle) = handle else {
        debug!("No runtime bound, ignoring notification click");
        return false;
    };
    match handle.activate(on_activate.clone()) {
        Ok(()) => true,
        Err(e) => {
            warn!("Failed to route notification click: {}", e);
            false
        }
    }
}

impl NoticeSink for DesktopSink {
    fn update_notice(&self, decision: &NotificationDecision) {
        if !decision.tray.label.is_empty() || decision.tray.flash {
            info!(
                "Tray: '{}'{}",
                decision.tray.label,
                if decision.tray.flash { " (flashing)" } else { "" }
            );
        }

        let Some(message) = decision.message.clone() else {
            if decision.sound {
                // No popup to carry the sound hint
                eprint!("\x07");
            }
            return;
        };

        let sound = decision.sound;
        let handle = self.handle.lock().clone();
        debug!("Showing desktop notification: {}", message.title);
        // The notification service call blocks; keep it off the runtime
        thread::spawn(move || {
            let mut notification = Notification::new();
            notification
                .appname(APP_NAME)
                .summary(&message.title)
                .icon(message.icon.as_deref().unwrap_or(FALLBACK_ICON))
                .action(DEFAULT_ACTION, "Open")
                .timeout(Timeout::Milliseconds(DEFAULT_TIMEOUT_MS));
            if let Some(body) = message.body.as_deref() {
                notification.body(body);
            }
            if sound {
                notification.sound_name(MESSAGE_SOUND);
            }
            match notification.show() {
                // Blocks this thread until the popup is clicked or closed
                #[cfg(all(unix, not(target_os = "macos")))]
                Ok(shown) => shown.wait_for_action(|action_id| {
                    route_action(handle.as_ref(), action_id, &message.on_activate);
                }),
                #[cfg(not(all(unix, not(target_os = "macos"))))]
                Ok(_) => debug!("Notification actions unsupported here, click not routed"),
                Err(e) => warn!("Failed to show desktop notification: {}", e),
            }
        });
    }

    fn bind_handle(&self, handle: &NoticeHandle) {
        *self.handle.lock() = Some(handle.clone());
    }
}

/// Forwards every decision to each inner sink in order
#[derive(Default)]
pub struct FanoutSink {
    sinks: Vec<Arc<dyn NoticeSink>>,
}

impl FanoutSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sink: Arc<dyn NoticeSink>) {
        self.sinks.push(sink);
    }
}

impl NoticeSink for FanoutSink {
    fn update_notice(&self, decision: &NotificationDecision) {
        for sink in &self.sinks {
            sink.update_notice(decision);
        }
    }

    fn bind_handle(&self, handle: &NoticeHandle) {
        for sink in &self.sinks {
            sink.bind_handle(handle);
        }
    }
}
