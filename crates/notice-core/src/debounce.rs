use std::time::Duration;

use tokio::time::Instant;

/// Trailing-edge debounce: a pending deadline that every trigger pushes back.
///
/// The owner polls [`DelayAction::fire_if_due`] (or sleeps until
/// [`DelayAction::deadline`]) and runs the action once per burst.
#[derive(Debug, Clone)]
pub struct DelayAction {
    delay: Duration,
    max_wait: Option<Duration>,
    deadline: Option<Instant>,
    first_trigger: Option<Instant>,
}

impl DelayAction {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            max_wait: None,
            deadline: None,
            first_trigger: None,
        }
    }

    /// Cap how far repeated triggers can push the deadline past the first
    /// trigger of a burst.
    pub fn with_max_wait(mut self, max_wait: Option<Duration>) -> Self {
        self.max_wait = max_wait;
        self
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Arm (or re-arm) the deadline. Returns the new deadline.
    pub fn schedule(&mut self, now: Instant) -> Instant {
        let first = *self.first_trigger.get_or_insert(now);
        let mut deadline = now + self.delay;
        if let Some(max_wait) = self.max_wait {
            deadline = deadline.min(first + max_wait.max(self.delay));
        }
        self.deadline = Some(deadline);
        deadline
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Consume the pending run when its deadline has passed.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.cancel();
                true
            }
            _ => false,
        }
    }

    /// Drop the pending run. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.first_trigger = None;
        self.deadline.take().is_some()
    }
}
