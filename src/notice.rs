//! Short-lived user notices ("toasts").
//!
//! The search controller only emits [`Notice`] values; the board keeps
//! them on screen for a fixed duration and forgets them afterwards.

use std::time::{Duration, Instant};

/// How long a notice stays visible
pub const NOTICE_DURATION: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Failure,
            message: message.into(),
        }
    }
}

/// Notices currently on screen, oldest first
#[derive(Debug, Default)]
pub struct NoticeBoard {
    entries: Vec<(Notice, Instant)>,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `notice` starting at `now`
    pub fn push(&mut self, notice: Notice, now: Instant) {
        self.entries.push((notice, now + NOTICE_DURATION));
    }

    /// Drop expired notices. Returns true if anything was removed.
    pub fn prune(&mut self, now: Instant) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(_, expires_at)| *expires_at > now);
        self.entries.len() != before
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.entries.iter().map(|(notice, _)| notice)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
