// ABOUTME: Transient user-facing notices raised by controller operations
// ABOUTME: Holds the latest notice and hides it once its display time has passed

use std::fmt;
use std::time::Duration;
use tokio::time::Instant;

pub const DEFAULT_NOTICE_TTL: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    raised_at: Instant,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            NoticeKind::Success => write!(f, "✓ {}", self.message),
            NoticeKind::Error => write!(f, "✗ {}", self.message),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NoticeBoard {
    ttl: Duration,
    current: Option<Notice>,
}

impl NoticeBoard {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, current: None }
    }

    /// Replaces whatever notice is showing.
    pub fn show(&mut self, kind: NoticeKind, message: impl Into<String>) {
        self.current = Some(Notice {
            kind,
            message: message.into(),
            raised_at: Instant::now(),
        });
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.show(NoticeKind::Success, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.show(NoticeKind::Error, message);
    }

    pub fn current(&self) -> Option<&Notice> {
        self.current
            .as_ref()
            .filter(|notice| notice.raised_at.elapsed() < self.ttl)
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::new(DEFAULT_NOTICE_TTL)
    }
}
