//! Message records consumed by the threading engine
//!
//! A `Message` is the read-only view of a parsed email that threading needs:
//! its identity, its reply headers, its subject and date, and the addresses
//! involved. Parsing raw mail into this shape is done upstream.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ThreadingError};

/// Threading-relevant fields of a single parsed email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Message-ID header value, the join key for reply linkage
    pub message_id: String,

    /// In-Reply-To header value
    #[serde(default)]
    pub in_reply_to: Option<String>,

    /// References header, oldest ancestor first
    #[serde(default)]
    pub references: Vec<String>,

    /// Raw subject line
    pub subject: String,

    /// Date the message was sent
    pub sent_at: DateTime<Utc>,

    pub from: String,

    #[serde(default)]
    pub to: Vec<String>,

    #[serde(default)]
    pub cc: Vec<String>,
}

impl Message {
    pub fn new(
        message_id: impl Into<String>,
        subject: impl Into<String>,
        sent_at: DateTime<Utc>,
    ) -> Self {
        Message {
            message_id: message_id.into(),
            in_reply_to: None,
            references: Vec::new(),
            subject: subject.into(),
            sent_at,
            from: String::new(),
            to: Vec::new(),
            cc: Vec::new(),
        }
    }

    pub fn with_in_reply_to(mut self, in_reply_to: impl Into<String>) -> Self {
        self.in_reply_to = Some(in_reply_to.into());
        self
    }

    pub fn with_references<I, S>(mut self, references: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.references = references.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = from.into();
        self
    }

    pub fn with_to<I, S>(mut self, to: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.to = to.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_cc<I, S>(mut self, cc: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cc = cc.into_iter().map(Into::into).collect();
        self
    }

    /// In-Reply-To value, ignoring a header that is present but blank.
    pub fn reply_target(&self) -> Option<&str> {
        self.in_reply_to
            .as_deref()
            .filter(|value| !value.trim().is_empty())
    }

    /// References in header order, skipping blank entries.
    pub fn resolvable_references(&self) -> impl Iterator<Item = &str> {
        self.references
            .iter()
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    /// Reject a message whose id could collide with other blank ids.
    ///
    /// `position` is reported back in the error so callers can point at the
    /// offending entry of their input.
    pub fn validate(&self, position: usize) -> Result<()> {
        if self.message_id.trim().is_empty() {
            return Err(ThreadingError::empty_message_id(position));
        }
        Ok(())
    }
}
