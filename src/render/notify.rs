use std::collections::VecDeque;
use std::time::{Duration, Instant};

use console::style;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

/// One transient message with a fixed visible lifetime.
#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub expires_at: Instant,
}

/// Queue of active notifications. Entries expire after the configured TTL;
/// the owning session sweeps on its own cadence.
pub struct NotificationSink {
    ttl: Duration,
    active: VecDeque<Notice>,
}

impl NotificationSink {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            active: VecDeque::new(),
        }
    }

    pub fn push(&mut self, kind: NoticeKind, message: impl Into<String>) {
        self.active.push_back(Notice {
            kind,
            message: message.into(),
            expires_at: Instant::now() + self.ttl,
        });
    }

    /// Drop every notice whose lifetime has elapsed as of `now`.
    pub fn sweep(&mut self, now: Instant) {
        self.active.retain(|n| n.expires_at > now);
    }

    pub fn active(&self) -> impl Iterator<Item = &Notice> {
        self.active.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }
}

/// Styled one-line rendering for a notification.
pub fn render_notice(kind: NoticeKind, message: &str) -> String {
    match kind {
        NoticeKind::Success => format!("{} {}", style("✓").green().bold(), message),
        NoticeKind::Error => format!("{} {}", style("✗").red().bold(), message),
        NoticeKind::Info => format!("{} {}", style("•").cyan(), message),
    }
}
