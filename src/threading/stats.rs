//! Threading statistics tracking.

use serde::{Deserialize, Serialize};

use super::strategy::MatchSignal;

/// Counters for a single threading run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadingStats {
    /// Number of messages processed
    pub messages: usize,
    /// Number of threads created
    pub threads_created: usize,
    /// Messages placed through their In-Reply-To header
    pub matched_by_in_reply_to: usize,
    /// Messages placed through their References header
    pub matched_by_references: usize,
    /// Messages placed through the subject/time-window fallback
    pub matched_by_subject: usize,
}

impl ThreadingStats {
    pub fn record_match(&mut self, signal: MatchSignal) {
        self.messages += 1;
        match signal {
            MatchSignal::InReplyTo => self.matched_by_in_reply_to += 1,
            MatchSignal::References => self.matched_by_references += 1,
            MatchSignal::Subject => self.matched_by_subject += 1,
        }
    }

    pub fn record_new_thread(&mut self) {
        self.messages += 1;
        self.threads_created += 1;
    }

    /// Messages that joined an existing thread
    pub fn matched(&self) -> usize {
        self.matched_by_in_reply_to + self.matched_by_references + self.matched_by_subject
    }

    /// Merge another ThreadingStats into this one by summing all counts.
    ///
    /// Used to combine statistics from several mailboxes.
    pub fn merge(&mut self, other: ThreadingStats) {
        self.messages += other.messages;
        self.threads_created += other.threads_created;
        self.matched_by_in_reply_to += other.matched_by_in_reply_to;
        self.matched_by_references += other.matched_by_references;
        self.matched_by_subject += other.matched_by_subject;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_merge() {
        let mut first = ThreadingStats::default();
        first.record_new_thread();
        first.record_match(MatchSignal::InReplyTo);
        first.record_match(MatchSignal::Subject);

        let mut second = ThreadingStats::default();
        second.record_new_thread();
        second.record_match(MatchSignal::References);

        first.merge(second);

        assert_eq!(first.messages, 5);
        assert_eq!(first.threads_created, 2);
        assert_eq!(first.matched(), 3);
        assert_eq!(first.matched_by_references, 1);
    }
}
