//! Session inactivity timeout.
//!
//! Every user input calls [`InactivityTimer::touch`]; bumps closer together
//! than [`TOUCH_DEBOUNCE`] are coalesced so mouse movement does not reset the
//! deadline every frame.

use std::time::{Duration, Instant};

pub const TOUCH_DEBOUNCE: Duration = Duration::from_millis(250);

#[derive(Debug, Clone)]
pub struct InactivityTimer {
    timeout: Duration,
    last_activity: Instant,
}

impl InactivityTimer {
    pub fn new(timeout: Duration, now: Instant) -> Self {
        Self {
            timeout,
            last_activity: now,
        }
    }

    /// Record user activity. Returns whether the deadline moved.
    pub fn touch(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last_activity) < TOUCH_DEBOUNCE {
            return false;
        }
        self.last_activity = now;
        true
    }

    /// Restart the countdown unconditionally (e.g. right after login).
    pub fn reset(&mut self, now: Instant) {
        self.last_activity = now;
    }

    pub fn deadline(&self) -> Instant {
        self.last_activity + self.timeout
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.deadline()
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.deadline().saturating_duration_since(now)
    }
}
