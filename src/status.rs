//! Transient status messages shown to the user.

use std::time::{Duration, Instant};

/// How long a status message stays up.
pub const STATUS_TIMEOUT: Duration = Duration::from_secs(2);

/// At most one human-readable message, cleared after a timeout.
#[derive(Debug, Clone, Default)]
pub struct StatusLine {
    current: Option<(String, Instant)>,
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `message` until `now + STATUS_TIMEOUT`, replacing any previous one.
    pub fn show(&mut self, message: impl Into<String>, now: Instant) {
        self.current = Some((message.into(), now + STATUS_TIMEOUT));
    }

    /// Drop the message if it has expired. Returns `true` if it was cleared.
    pub fn tick(&mut self, now: Instant) -> bool {
        match &self.current {
            Some((_, expires)) if now >= *expires => {
                self.current = None;
                true
            }
            _ => false,
        }
    }

    /// The message currently on display.
    pub fn message(&self) -> Option<&str> {
        self.current.as_ref().map(|(m, _)| m.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_expires() {
        let t0 = Instant::now();
        let mut status = StatusLine::new();
        status.show("Image decode failed", t0);
        assert_eq!(status.message(), Some("Image decode failed"));

        assert!(!status.tick(t0 + Duration::from_millis(1999)));
        assert!(status.message().is_some());

        assert!(status.tick(t0 + STATUS_TIMEOUT));
        assert_eq!(status.message(), None);
        assert!(!status.tick(t0 + STATUS_TIMEOUT));
    }

    #[test]
    fn test_new_message_restarts_timer() {
        let t0 = Instant::now();
        let mut status = StatusLine::new();
        status.show("first", t0);
        status.show("second", t0 + Duration::from_secs(1));
        assert!(!status.tick(t0 + Duration::from_millis(2500)));
        assert_eq!(status.message(), Some("second"));
    }
}
