use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};

use crate::aggregator::{AggregatorState, NoticeAggregator};
use crate::config::NoticeConfig;
use crate::debounce::DelayAction;
use crate::decision::{NoticeAction, NotificationDecision};
use crate::error::NoticeError;
use crate::host::WindowEvent;

#[derive(Debug)]
pub enum NoticeCommand {
    /// New messages arrived; run a debounced pass
    UpdateChatNotice,
    /// Run a pass right away, dropping any pending debounced one
    EvaluateNow {
        reply: oneshot::Sender<Option<NotificationDecision>>,
    },
    WindowEvent(WindowEvent),
    Activate(NoticeAction),
    /// Flush a pending pass and stop
    Shutdown {
        reply: oneshot::Sender<AggregatorState>,
    },
}

/// Cloneable handle to a running notice runtime
#[derive(Debug, Clone)]
pub struct NoticeHandle {
    command_tx: mpsc::UnboundedSender<NoticeCommand>,
}

impl NoticeHandle {
    fn send(&self, command: NoticeCommand) -> Result<(), NoticeError> {
        self.command_tx
            .send(command)
            .map_err(|_| NoticeError::RuntimeStopped)
    }

    /// Request a debounced aggregation pass
    pub fn update_chat_notice(&self) -> Result<(), NoticeError> {
        self.send(NoticeCommand::UpdateChatNotice)
    }

    /// Hook for the chat layer's "messages received" event
    pub fn on_chat_messages(&self) -> Result<(), NoticeError> {
        self.update_chat_notice()
    }

    pub async fn evaluate_now(&self) -> Result<Option<NotificationDecision>, NoticeError> {
        let (reply, rx) = oneshot::channel();
        self.send(NoticeCommand::EvaluateNow { reply })?;
        rx.await.map_err(|_| NoticeError::RuntimeStopped)
    }

    pub fn window_event(&self, event: WindowEvent) -> Result<(), NoticeError> {
        self.send(NoticeCommand::WindowEvent(event))
    }

    /// Forward a popup activation from the presentation layer
    pub fn activate(&self, action: NoticeAction) -> Result<(), NoticeError> {
        self.send(NoticeCommand::Activate(action))
    }

    pub async fn shutdown(&self) -> Result<AggregatorState, NoticeError> {
        let (reply, rx) = oneshot::channel();
        self.send(NoticeCommand::Shutdown { reply })?;
        rx.await.map_err(|_| NoticeError::RuntimeStopped)
    }
}

/// Single task owning the aggregator; every pass and reaction runs here.
pub struct NoticeRuntime {
    aggregator: NoticeAggregator,
    delay: DelayAction,
    command_rx: mpsc::UnboundedReceiver<NoticeCommand>,
}

impl NoticeRuntime {
    /// Spawn the runtime on the current tokio runtime.
    pub fn spawn(aggregator: NoticeAggregator, config: &NoticeConfig) -> (NoticeHandle, JoinHandle<()>) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let runtime = Self {
            aggregator,
            delay: DelayAction::new(config.debounce).with_max_wait(config.max_wait),
            command_rx,
        };
        let handle = NoticeHandle { command_tx };
        runtime.aggregator.host().sink.bind_handle(&handle);
        let task = tokio::spawn(runtime.run());
        (handle, task)
    }

    async fn run(mut self) {
        info!("Notice runtime started (debounce {:?})", self.delay.delay());
        loop {
            let deadline = self.delay.deadline();
            tokio::select! {
                command = self.command_rx.recv() => {
                    let Some(command) = command else {
                        debug!("All notice handles dropped");
                        self.flush_pending();
                        break;
                    };
                    if let Some(reply) = self.handle_command(command) {
                        self.flush_pending();
                        if reply.send(self.aggregator.state().clone()).is_err() {
                            warn!("Shutdown requester went away before the reply");
                        }
                        break;
                    }
                }
                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    if self.delay.fire_if_due(Instant::now()) {
                        self.aggregator.update_chat_notice();
                    }
                }
            }
        }
        info!("Notice runtime stopped");
    }

    /// Returns the shutdown reply channel when the command asks to stop.
    fn handle_command(&mut self, command: NoticeCommand) -> Option<oneshot::Sender<AggregatorState>> {
        match command {
            NoticeCommand::UpdateChatNotice => {
                self.delay.schedule(Instant::now());
            }
            NoticeCommand::EvaluateNow { reply } => {
                self.delay.cancel();
                let decision = self.aggregator.update_chat_notice();
                let _ = reply.send(decision);
            }
            NoticeCommand::WindowEvent(event) => self.handle_window_event(event),
            NoticeCommand::Activate(action) => self.aggregator.activate(&action),
            NoticeCommand::Shutdown { reply } => return Some(reply),
        }
        None
    }

    fn handle_window_event(&mut self, event: WindowEvent) {
        let capabilities = self.aggregator.host().window.capabilities();
        match event {
            WindowEvent::Focus if capabilities.focus_events => self.aggregator.on_window_focus(),
            WindowEvent::Restore if capabilities.restore_events => {
                self.aggregator.on_window_restore();
            }
            _ => debug!("Window event {:?} needs no reaction", event),
        }
    }

    fn flush_pending(&mut self) {
        if self.delay.cancel() {
            self.aggregator.update_chat_notice();
        }
    }
}
