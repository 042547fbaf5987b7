//! Threading engine: batch and incremental entry points
//!
//! ## Batch
//!
//! `build_threads` sorts the messages by send date (stable) and walks them
//! once. Each message is matched against the threads created so far; a hit
//! appends it, a miss starts a new thread. The message is then registered in
//! the message_id lookup so later replies can find it.
//!
//! ## Incremental
//!
//! `find_thread_for_message` rebuilds the same lookup from caller-supplied
//! threads and runs the same matching chain for one message. It never touches
//! the threads it is given.
//!
//! No state survives between calls; the engine only holds its configuration.

use std::collections::HashMap;
use std::time::Instant;

use rayon::prelude::*;

use crate::config::ThreadingConfig;
use crate::error::Result;

use super::index::MessageIndex;
use super::message::Message;
use super::stats::ThreadingStats;
use super::strategy::{MatchContext, MatchSignal, MatchStrategy, default_strategies};
use super::subject_matching::SubjectNormalizer;
use super::thread::{Thread, ThreadId};

/// Outcome of matching one message against existing threads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadMatch {
    pub thread_id: ThreadId,
    pub signal: MatchSignal,
}

/// Result of `ThreadingEngine::ingest`
#[derive(Debug, Clone)]
pub struct Placement {
    /// Copy of the supplied threads with the message placed
    pub threads: Vec<Thread>,
    /// Thread the message landed in
    pub thread_id: ThreadId,
    /// Signal that matched, `None` when a new thread was started
    pub signal: Option<MatchSignal>,
}

impl Placement {
    pub fn created_thread(&self) -> bool {
        self.signal.is_none()
    }
}

#[derive(Debug)]
pub struct ThreadingEngine {
    config: ThreadingConfig,
    normalizer: SubjectNormalizer,
    strategies: Vec<Box<dyn MatchStrategy>>,
}

impl ThreadingEngine {
    /// Engine with the default 30-day window and prefix set.
    pub fn new() -> Self {
        Self {
            config: ThreadingConfig::default(),
            normalizer: SubjectNormalizer::default(),
            strategies: default_strategies(),
        }
    }

    pub fn with_config(config: ThreadingConfig) -> Result<Self> {
        config.validate()?;
        let normalizer = SubjectNormalizer::new(config.reply_prefixes.as_slice())?;

        Ok(Self {
            config,
            normalizer,
            strategies: default_strategies(),
        })
    }

    /// Replace the matching chain. Strategies run in the order given.
    pub fn with_strategies(mut self, strategies: Vec<Box<dyn MatchStrategy>>) -> Self {
        self.strategies = strategies;
        self
    }

    pub fn config(&self) -> &ThreadingConfig {
        &self.config
    }

    pub fn normalizer(&self) -> &SubjectNormalizer {
        &self.normalizer
    }

    pub fn normalize_subject(&self, subject: &str) -> String {
        self.normalizer.normalize(subject)
    }

    /// Group an unordered set of messages into threads.
    ///
    /// Threads come back in creation order, which is the send-date order of
    /// their first messages. Every message is validated before any thread is
    /// built, so a rejected batch yields nothing.
    pub fn build_threads(&self, messages: Vec<Message>) -> Result<Vec<Thread>> {
        self.build_threads_with_stats(messages)
            .map(|(threads, _)| threads)
    }

    /// Same as `build_threads`, also reporting how each message was placed.
    pub fn build_threads_with_stats(
        &self,
        mut messages: Vec<Message>,
    ) -> Result<(Vec<Thread>, ThreadingStats)> {
        for (position, message) in messages.iter().enumerate() {
            message.validate(position)?;
        }

        let start_time = Instant::now();

        // Stable: equal timestamps keep input order
        messages.sort_by_key(|message| message.sent_at);

        let mut index = MessageIndex::with_capacity(messages.len());
        let mut threads: Vec<Thread> = Vec::new();
        let mut positions: HashMap<ThreadId, usize> = HashMap::new();
        let mut stats = ThreadingStats::default();

        for message in messages {
            let message_id = message.message_id.clone();
            let matched = self
                .match_with(&message, &index, &threads)
                .and_then(|m| positions.get(&m.thread_id).map(|&pos| (pos, m.signal)));

            let thread_id = match matched {
                Some((pos, signal)) => {
                    log::trace!(
                        "message {} joined thread {} via {}",
                        message_id,
                        threads[pos].thread_id,
                        signal
                    );
                    stats.record_match(signal);
                    threads[pos].push_message(message);
                    threads[pos].thread_id.clone()
                }
                None => {
                    let thread = self.start_thread(message);
                    let thread_id = thread.thread_id.clone();
                    log::trace!("message {} started thread {}", message_id, thread_id);
                    stats.record_new_thread();
                    positions.insert(thread_id.clone(), threads.len());
                    threads.push(thread);
                    thread_id
                }
            };

            if !index.register(&message_id, &thread_id) {
                log::warn!(
                    "duplicate message id {} in batch, keeping first placement",
                    message_id
                );
            }
        }

        log::debug!(
            "threading complete: {} messages into {} threads (in_reply_to={}, references={}, subject={}) in {:.2}ms",
            stats.messages,
            threads.len(),
            stats.matched_by_in_reply_to,
            stats.matched_by_references,
            stats.matched_by_subject,
            start_time.elapsed().as_secs_f64() * 1000.0
        );

        Ok((threads, stats))
    }

    /// Thread an incoming message belongs to, or `None` for a new thread.
    pub fn find_thread_for_message(
        &self,
        message: &Message,
        existing_threads: &[Thread],
    ) -> Result<Option<ThreadId>> {
        Ok(self
            .match_message(message, existing_threads)?
            .map(|m| m.thread_id))
    }

    /// Like `find_thread_for_message`, also naming the signal that matched.
    pub fn match_message(
        &self,
        message: &Message,
        existing_threads: &[Thread],
    ) -> Result<Option<ThreadMatch>> {
        message.validate(0)?;

        let index = MessageIndex::from_threads(existing_threads);
        let matched = self.match_with(message, &index, existing_threads);

        log::debug!(
            "incremental match for {} against {} threads ({} messages): {}",
            message.message_id,
            existing_threads.len(),
            index.len(),
            matched
                .as_ref()
                .map_or("new thread", |m| m.signal.as_str())
        );

        Ok(matched)
    }

    /// Place one new message and return the resulting thread list.
    ///
    /// The supplied threads are left as they are; the matched thread (or the
    /// new one, appended last) is updated in the returned copy.
    pub fn ingest(&self, existing_threads: &[Thread], message: Message) -> Result<Placement> {
        let matched = self.match_message(&message, existing_threads)?;
        let mut threads = existing_threads.to_vec();

        let target = matched.and_then(|m| {
            threads
                .iter()
                .position(|thread| thread.thread_id == m.thread_id)
                .map(|pos| (pos, m.signal))
        });

        match target {
            Some((pos, signal)) => {
                threads[pos].push_message(message);
                let thread_id = threads[pos].thread_id.clone();
                Ok(Placement {
                    threads,
                    thread_id,
                    signal: Some(signal),
                })
            }
            None => {
                let thread = self.start_thread(message);
                let thread_id = thread.thread_id.clone();
                threads.push(thread);
                Ok(Placement {
                    threads,
                    thread_id,
                    signal: None,
                })
            }
        }
    }

    /// Thread several independent mailboxes in parallel.
    ///
    /// Output keeps the input order. If any mailbox is rejected, one of the
    /// rejections is returned and no threads are.
    pub fn build_threads_for_mailboxes<K>(
        &self,
        mailboxes: Vec<(K, Vec<Message>)>,
    ) -> Result<Vec<(K, Vec<Thread>)>>
    where
        K: Send,
    {
        log::debug!("threading {} mailboxes in parallel", mailboxes.len());

        mailboxes
            .into_par_iter()
            .map(|(key, messages)| self.build_threads(messages).map(|threads| (key, threads)))
            .collect()
    }

    fn match_with(
        &self,
        message: &Message,
        index: &MessageIndex,
        threads: &[Thread],
    ) -> Option<ThreadMatch> {
        let context = MatchContext {
            index,
            threads,
            normalizer: &self.normalizer,
            subject_window: self.config.subject_window,
        };

        self.strategies.iter().find_map(|strategy| {
            strategy
                .find_thread(message, &context)
                .map(|thread_id| ThreadMatch {
                    thread_id,
                    signal: strategy.signal(),
                })
        })
    }

    fn start_thread(&self, message: Message) -> Thread {
        let subject = self.normalizer.display_form(&message.subject);
        Thread::new(ThreadId::generate(), subject, message)
    }
}

impl Default for ThreadingEngine {
    fn default() -> Self {
        Self::new()
    }
}
