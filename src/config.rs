use chrono::Duration;

use crate::error::{Result, ThreadingError};

/// Number of days a thread stays open to subject-only matches.
pub const DEFAULT_SUBJECT_WINDOW_DAYS: i64 = 30;

/// Reply and forward markers stripped from the front of a subject, including
/// the German `AW`/`WG` variants some clients emit.
pub const DEFAULT_REPLY_PREFIXES: &[&str] = &["re", "fwd", "fw", "aw", "wg"];

/// Runtime configuration for the threading engine.
#[derive(Debug, Clone)]
pub struct ThreadingConfig {
    /// How far back a thread's last message may lie for a subject match.
    pub subject_window: Duration,
    /// Prefix tokens stripped from a subject, matched case-insensitively.
    pub reply_prefixes: Vec<String>,
}

impl ThreadingConfig {
    pub fn with_subject_window(mut self, window: Duration) -> Self {
        self.subject_window = window;
        self
    }

    pub fn with_reply_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reply_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    /// Reject settings the matcher cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.subject_window <= Duration::zero() {
            return Err(ThreadingError::invalid_config(format!(
                "subject window must be positive, got {}s",
                self.subject_window.num_seconds()
            )));
        }

        if self.reply_prefixes.is_empty() {
            return Err(ThreadingError::invalid_config(
                "at least one reply prefix is required",
            ));
        }

        if let Some(position) = self
            .reply_prefixes
            .iter()
            .position(|prefix| prefix.trim().is_empty())
        {
            return Err(ThreadingError::invalid_config(format!(
                "reply prefix at position {position} is blank"
            )));
        }

        Ok(())
    }
}

impl Default for ThreadingConfig {
    fn default() -> Self {
        Self {
            subject_window: Duration::days(DEFAULT_SUBJECT_WINDOW_DAYS),
            reply_prefixes: DEFAULT_REPLY_PREFIXES
                .iter()
                .map(|prefix| prefix.to_string())
                .collect(),
        }
    }
}
