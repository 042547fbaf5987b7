//! Thread aggregate built by the threading engine
//!
//! A thread owns its messages (ordered by send date), the union of their
//! participants, and the timestamp of its latest message. The subject is set
//! from the first message and never changes afterwards.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::message::Message;
use super::participants::extract_participants;

/// Opaque thread identifier generated when a thread is created
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThreadId(String);

impl ThreadId {
    /// Allocate a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ThreadId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ThreadId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A conversation: messages grouped by the threading engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thread {
    pub thread_id: ThreadId,

    /// Subject of the first message with its reply prefix stripped and
    /// whitespace collapsed, original casing kept
    pub subject: String,

    /// Lower-cased form of `subject`, used for subject matching
    pub normalized_subject: String,

    /// Messages ordered by `sent_at` ascending
    pub messages: Vec<Message>,

    /// Every address seen in from/to/cc of the thread's messages
    pub participants: BTreeSet<String>,

    /// Send date of the latest message
    pub last_message_at: DateTime<Utc>,
}

impl Thread {
    /// Start a new thread from its first message.
    ///
    /// `subject` is the display form of the message subject; the comparison
    /// key is derived from it.
    pub fn new(thread_id: ThreadId, subject: String, message: Message) -> Self {
        let normalized_subject = subject.to_lowercase();
        let participants = extract_participants(&message);
        let last_message_at = message.sent_at;

        Thread {
            thread_id,
            subject,
            normalized_subject,
            messages: vec![message],
            participants,
            last_message_at,
        }
    }

    /// Add a message to the thread.
    ///
    /// The message lands after every message sent at or before it, so the
    /// send-date order holds even for late arrivals. Participants are unioned
    /// in and `last_message_at` only ever moves forward.
    pub fn push_message(&mut self, message: Message) {
        self.participants.extend(extract_participants(&message));

        if message.sent_at > self.last_message_at {
            self.last_message_at = message.sent_at;
        }

        let position = self
            .messages
            .partition_point(|existing| existing.sent_at <= message.sent_at);
        self.messages.insert(position, message);
    }

    /// Copy of this thread with `message` added, leaving `self` untouched.
    pub fn with_message(&self, message: Message) -> Self {
        let mut thread = self.clone();
        thread.push_message(message);
        thread
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// The thread starter
    pub fn first_message(&self) -> Option<&Message> {
        self.messages.first()
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn contains_message(&self, message_id: &str) -> bool {
        self.messages.iter().any(|m| m.message_id == message_id)
    }
}
