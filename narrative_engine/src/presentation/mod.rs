//! Presentation timers.
//!
//! These only pace how settled engine state is shown. They never call into
//! the engine, and the caller advances them with the time elapsed since the
//! last frame.

use std::time::Duration;

/// Reveals dialogue text one character at a time.
#[derive(Debug, Clone)]
pub struct Typewriter {
    text: String,
    interval: Duration,
    elapsed: Duration,
    revealed: usize,
    total: usize,
    cancelled: bool,
}

impl Typewriter {
    /// Reveal `text` at one character per `interval`. A zero interval shows
    /// everything at once.
    pub fn new(text: impl Into<String>, interval: Duration) -> Self {
        let text = text.into();
        let total = text.chars().count();
        let revealed = if interval.is_zero() { total } else { 0 };
        Self {
            text,
            interval,
            elapsed: Duration::ZERO,
            revealed,
            total,
            cancelled: false,
        }
    }

    /// Advance by `dt` and return the visible text.
    pub fn advance(&mut self, dt: Duration) -> &str {
        if !self.cancelled && !self.is_finished() {
            self.elapsed = self.elapsed.saturating_add(dt);
            let chars = self.elapsed.as_nanos() / self.interval.as_nanos();
            self.revealed = usize::try_from(chars)
                .unwrap_or(usize::MAX)
                .min(self.total);
        }
        self.visible()
    }

    /// Show the whole text now (a click while typing).
    pub fn skip(&mut self) {
        if !self.cancelled {
            self.revealed = self.total;
        }
    }

    /// Stop revealing, e.g. because the node was left.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn is_finished(&self) -> bool {
        self.revealed >= self.total
    }

    /// Options are shown once typing is over.
    pub fn is_typing(&self) -> bool {
        !self.cancelled && !self.is_finished()
    }

    pub fn visible(&self) -> &str {
        let end = self
            .text
            .char_indices()
            .nth(self.revealed)
            .map(|(index, _)| index)
            .unwrap_or(self.text.len());
        &self.text[..end]
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// A fixed pause before a reply appears.
#[derive(Debug, Clone)]
pub struct ThinkingDelay {
    remaining: Duration,
    cancelled: bool,
}

impl ThinkingDelay {
    pub fn new(delay: Duration) -> Self {
        Self {
            remaining: delay,
            cancelled: false,
        }
    }

    /// Advance by `dt`. Returns true once the delay has run out.
    pub fn advance(&mut self, dt: Duration) -> bool {
        if !self.cancelled {
            self.remaining = self.remaining.saturating_sub(dt);
        }
        self.is_ready()
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    /// A cancelled delay never becomes ready.
    pub fn is_ready(&self) -> bool {
        !self.cancelled && self.remaining.is_zero()
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }
}
