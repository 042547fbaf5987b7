//! Message-ID lookup used while matching
//!
//! The index is rebuilt for every engine call, either incrementally during a
//! batch pass or in one scan over caller-supplied threads. It is never kept
//! between calls.

use std::collections::HashMap;

use super::thread::{Thread, ThreadId};

/// Map of message_id → thread the message was placed in
#[derive(Debug, Default, Clone)]
pub struct MessageIndex {
    entries: HashMap<String, ThreadId>,
}

impl MessageIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
        }
    }

    /// Index every message of every thread.
    ///
    /// If the same message id shows up in more than one thread, the thread
    /// that comes first in `threads` keeps it.
    pub fn from_threads(threads: &[Thread]) -> Self {
        let capacity = threads.iter().map(Thread::message_count).sum();
        let mut index = Self::with_capacity(capacity);

        for thread in threads {
            for message in &thread.messages {
                index.register(&message.message_id, &thread.thread_id);
            }
        }

        index
    }

    /// Record that `message_id` lives in `thread_id`.
    ///
    /// Returns `false` when the id was already registered; the first
    /// registration is kept.
    pub fn register(&mut self, message_id: &str, thread_id: &ThreadId) -> bool {
        if self.entries.contains_key(message_id) {
            return false;
        }
        self.entries
            .insert(message_id.to_string(), thread_id.clone());
        true
    }

    pub fn lookup(&self, message_id: &str) -> Option<&ThreadId> {
        self.entries.get(message_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
