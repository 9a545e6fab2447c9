//! Transient notifications shown in the corner of the screen.

use std::time::{Duration, Instant};

use ratatui::style::Color;

use crate::tui::colors::{DARK_GREEN, DARK_RED, GOLD};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Level {
    Success,
    Warning,
    Error,
}

impl Level {
    pub fn color(self) -> Color {
        match self {
            Level::Success => DARK_GREEN,
            Level::Warning => GOLD,
            Level::Error => DARK_RED,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Toast {
    pub message: String,
    pub level: Level,
    shown_at: Instant,
}

/// Queue of toasts, each dismissed once `timeout` has passed.
#[derive(Debug)]
pub struct Toasts {
    items: Vec<Toast>,
    timeout: Duration,
}

impl Toasts {
    pub fn new(timeout: Duration) -> Self {
        Toasts {
            items: Vec::new(),
            timeout,
        }
    }

    pub fn push(&mut self, level: Level, message: impl Into<String>) {
        self.items.push(Toast {
            message: message.into(),
            level,
            shown_at: Instant::now(),
        });
        // Keep the stack short.
        if self.items.len() > 4 {
            self.items.remove(0);
        }
    }

    /// Drop expired toasts; returns whether anything was removed.
    pub fn prune(&mut self, now: Instant) -> bool {
        let before = self.items.len();
        let timeout = self.timeout;
        self.items
            .retain(|t| now.saturating_duration_since(t.shown_at) < timeout);
        before != self.items.len()
    }

    pub fn visible(&self) -> &[Toast] {
        &self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prune_after_timeout() {
        let mut toasts = Toasts::new(Duration::from_millis(10));
        toasts.push(Level::Success, "saved");
        assert!(!toasts.prune(Instant::now()));
        assert!(toasts.prune(Instant::now() + Duration::from_millis(20)));
        assert!(toasts.visible().is_empty());
    }

    #[test]
    fn test_stack_is_bounded() {
        let mut toasts = Toasts::new(Duration::from_secs(3));
        for i in 0..6 {
            toasts.push(Level::Warning, format!("w{i}"));
        }
        assert_eq!(toasts.visible().len(), 4);
        assert_eq!(toasts.visible()[0].message, "w2");
    }
}
