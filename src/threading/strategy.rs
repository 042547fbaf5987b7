//! Matching strategies
//!
//! Each strategy looks at one signal of an incoming message and either names
//! the thread it belongs to or passes. The engine runs them in priority order
//! and stops at the first hit:
//!
//! 1. **In-Reply-To**: the directly replied-to message is already threaded
//! 2. **References**: any ancestor is already threaded, first resolving wins
//! 3. **Subject**: an open thread has the same normalized subject
//!
//! Header signals are authoritative. The subject fallback covers clients that
//! drop reply headers and is bounded by a time window so a generic subject
//! like "Hello" does not pull unrelated conversations together.

use std::fmt;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::index::MessageIndex;
use super::message::Message;
use super::subject_matching::SubjectNormalizer;
use super::thread::{Thread, ThreadId};

/// Which signal placed a message into an existing thread
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchSignal {
    InReplyTo,
    References,
    Subject,
}

impl MatchSignal {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchSignal::InReplyTo => "in_reply_to",
            MatchSignal::References => "references",
            MatchSignal::Subject => "subject",
        }
    }
}

impl fmt::Display for MatchSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State a strategy may consult while matching one message.
#[derive(Debug, Clone, Copy)]
pub struct MatchContext<'a> {
    /// message_id → thread for every message placed so far
    pub index: &'a MessageIndex,
    /// Candidate threads in creation order
    pub threads: &'a [Thread],
    pub normalizer: &'a SubjectNormalizer,
    pub subject_window: Duration,
}

/// A single matching signal.
pub trait MatchStrategy: fmt::Debug + Send + Sync {
    fn signal(&self) -> MatchSignal;

    /// Thread the message belongs to according to this signal, if any.
    fn find_thread(&self, message: &Message, context: &MatchContext<'_>) -> Option<ThreadId>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InReplyToStrategy;

impl MatchStrategy for InReplyToStrategy {
    fn signal(&self) -> MatchSignal {
        MatchSignal::InReplyTo
    }

    fn find_thread(&self, message: &Message, context: &MatchContext<'_>) -> Option<ThreadId> {
        message
            .reply_target()
            .and_then(|parent_id| context.index.lookup(parent_id))
            .cloned()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReferencesStrategy;

impl MatchStrategy for ReferencesStrategy {
    fn signal(&self) -> MatchSignal {
        MatchSignal::References
    }

    fn find_thread(&self, message: &Message, context: &MatchContext<'_>) -> Option<ThreadId> {
        message
            .resolvable_references()
            .find_map(|reference| context.index.lookup(reference))
            .cloned()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SubjectWindowStrategy;

impl MatchStrategy for SubjectWindowStrategy {
    fn signal(&self) -> MatchSignal {
        MatchSignal::Subject
    }

    /// First thread, in the order given, whose normalized subject equals the
    /// message's and whose last message is no older than the window.
    fn find_thread(&self, message: &Message, context: &MatchContext<'_>) -> Option<ThreadId> {
        let subject_key = context.normalizer.normalize(&message.subject);
        // Earliest dates cannot go back a full window; every thread is then recent enough
        let window_start = message.sent_at.checked_sub_signed(context.subject_window);

        context
            .threads
            .iter()
            .filter(|thread| thread.normalized_subject == subject_key)
            .find(|thread| window_start.is_none_or(|start| thread.last_message_at >= start))
            .map(|thread| thread.thread_id.clone())
    }
}

/// The standard strategy chain, highest priority first.
pub fn default_strategies() -> Vec<Box<dyn MatchStrategy>> {
    vec![
        Box::new(InReplyToStrategy),
        Box::new(ReferencesStrategy),
        Box::new(SubjectWindowStrategy),
    ]
}
