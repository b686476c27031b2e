//! Transient, self-clearing user messages.
//!
//! Each screen owns one [`FlashSlot`]. Time is passed in explicitly so the
//! expiry can be checked without sleeping.

use std::time::{Duration, Instant};

/// Default lifetime of a flash message.
pub const FLASH_TTL: Duration = Duration::from_millis(3000);

/// Visual class of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Success,
    Danger,
    Warning,
}

impl FlashKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashKind::Success => "success",
            FlashKind::Danger => "danger",
            FlashKind::Warning => "warning",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub kind: FlashKind,
    pub text: String,
    shown_at: Instant,
    ttl: Duration,
}

impl Flash {
    pub fn expires_at(&self) -> Instant {
        self.shown_at + self.ttl
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at()
    }
}

/// Holds at most one message; a new one replaces the previous.
#[derive(Debug, Clone, Default)]
pub struct FlashSlot {
    current: Option<Flash>,
}

impl FlashSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, kind: FlashKind, text: impl Into<String>, now: Instant) {
        self.show_for(kind, text, FLASH_TTL, now);
    }

    pub fn show_for(
        &mut self,
        kind: FlashKind,
        text: impl Into<String>,
        ttl: Duration,
        now: Instant,
    ) {
        self.current = Some(Flash {
            kind,
            text: text.into(),
            shown_at: now,
            ttl,
        });
    }

    /// The message still visible at `now`.
    pub fn visible(&self, now: Instant) -> Option<&Flash> {
        self.current.as_ref().filter(|f| !f.is_expired(now))
    }

    /// Drop an expired message. Returns whether one was dropped.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.current.as_ref().is_some_and(|f| f.is_expired(now)) {
            self.current = None;
            return true;
        }
        false
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    /// Next instant at which the view must repaint to hide the message.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.current.as_ref().map(Flash::expires_at)
    }
}
