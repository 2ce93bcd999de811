//! Transient user-facing notices.
//!
//! # Invariants
//! - A notice is active from push until `ttl` has elapsed.
//! - Notices never carry template content, only fixed messages.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub expires_at: Instant,
}

impl Notice {
    pub fn is_active(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Queue of time-limited notices, newest last.
#[derive(Debug, Clone)]
pub struct NoticeBoard {
    ttl: Duration,
    notices: Vec<Notice>,
}

impl NoticeBoard {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            notices: Vec::new(),
        }
    }

    pub fn push(&mut self, level: NoticeLevel, message: impl Into<String>, now: Instant) {
        self.prune(now);
        self.notices.push(Notice {
            level,
            message: message.into(),
            expires_at: now + self.ttl,
        });
    }

    /// Notices still visible at `now`, oldest first.
    pub fn active(&self, now: Instant) -> impl Iterator<Item = &Notice> + '_ {
        self.notices.iter().filter(move |notice| notice.is_active(now))
    }

    pub fn latest(&self) -> Option<&Notice> {
        self.notices.last()
    }

    /// Drops expired notices; returns how many were removed.
    pub fn prune(&mut self, now: Instant) -> usize {
        let before = self.notices.len();
        self.notices.retain(|notice| notice.is_active(now));
        before - self.notices.len()
    }

    pub fn clear(&mut self) {
        self.notices.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::{NoticeBoard, NoticeLevel};
    use std::time::{Duration, Instant};

    #[test]
    fn notices_expire_after_ttl() {
        let start = Instant::now();
        let mut board = NoticeBoard::new(Duration::from_millis(3000));
        board.push(NoticeLevel::Error, "Failed to add category", start);

        assert_eq!(board.active(start + Duration::from_millis(2999)).count(), 1);
        assert_eq!(board.active(start + Duration::from_millis(3000)).count(), 0);
        assert_eq!(board.prune(start + Duration::from_millis(3000)), 1);
        assert!(board.latest().is_none());
    }
}
