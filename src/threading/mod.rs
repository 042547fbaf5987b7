//! Email threading module
//!
//! Groups parsed email messages into conversation threads the way mail
//! clients do: explicit reply headers first, then a subject match bounded by
//! a time window.
//!
//! ## Threading Strategy
//!
//! For every message, signals are tried in priority order and the first hit
//! wins:
//!
//! 1. **In-Reply-To Header**: the replied-to message is already in a thread
//! 2. **References Header**: the first listed ancestor already in a thread
//! 3. **Subject + Time Window**: a thread with the same normalized subject
//!    whose last message is at most 30 days older than this one
//!
//! A message matching nothing starts a new thread.
//!
//! ## Module Structure
//!
//! - `message`: Input record consumed by the engine
//! - `thread`: Thread aggregate and identifiers
//! - `subject_matching`: Subject normalization
//! - `participants`: Address set extraction
//! - `index`: message_id → thread lookup
//! - `strategy`: The individual matching signals
//! - `stats`: Per-run counters
//! - `engine`: Batch and incremental entry points

pub mod engine;
pub mod index;
pub mod message;
pub mod participants;
pub mod stats;
pub mod strategy;
pub mod subject_matching;
pub mod thread;

// Re-export main types and functions
pub use engine::{Placement, ThreadMatch, ThreadingEngine};
pub use index::MessageIndex;
pub use message::Message;
pub use participants::extract_participants;
pub use stats::ThreadingStats;
pub use strategy::{MatchContext, MatchSignal, MatchStrategy};
pub use subject_matching::{SubjectNormalizer, normalize_subject, subjects_match};
pub use thread::{Thread, ThreadId};
