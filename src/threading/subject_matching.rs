//! Subject normalization and matching for email threading
//!
//! When a message carries no usable In-Reply-To or References header, the
//! engine falls back to comparing subjects. Both sides are normalized first:
//!
//! 1. One leading reply/forward prefix is stripped (`Re:`, `Fwd:`, `AW:`, ...)
//! 2. Runs of whitespace collapse to a single space
//! 3. Leading/trailing whitespace is trimmed
//! 4. The result is lower-cased for comparison
//!
//! Only a single prefix is removed per call: `"Re: Re: Hello"` becomes
//! `"re: hello"`, not `"hello"`.

use std::sync::OnceLock;

use regex::Regex;

use crate::config::DEFAULT_REPLY_PREFIXES;
use crate::error::{Result, ThreadingError};

static DEFAULT_NORMALIZER: OnceLock<SubjectNormalizer> = OnceLock::new();

fn default_normalizer() -> &'static SubjectNormalizer {
    DEFAULT_NORMALIZER.get_or_init(|| {
        SubjectNormalizer::new(DEFAULT_REPLY_PREFIXES).expect("Invalid default reply prefixes")
    })
}

/// Compiled subject normalizer for a fixed set of reply prefixes.
#[derive(Debug, Clone)]
pub struct SubjectNormalizer {
    prefix_regex: Regex,
}

impl SubjectNormalizer {
    /// Build a normalizer stripping any of `prefixes`.
    ///
    /// A prefix is recognised case-insensitively at the start of the subject
    /// (after optional whitespace) when it is followed by a colon or by
    /// whitespace, so `"Regarding"` is left alone while `"RE:"`, `"Re "` and
    /// `"wg:"` are stripped.
    pub fn new<S: AsRef<str>>(prefixes: &[S]) -> Result<Self> {
        let mut tokens: Vec<String> = prefixes
            .iter()
            .map(|prefix| prefix.as_ref().trim())
            .filter(|prefix| !prefix.is_empty())
            .map(regex::escape)
            .collect();

        if tokens.is_empty() {
            return Err(ThreadingError::invalid_config(
                "at least one reply prefix is required",
            ));
        }

        // Longest first so "fwd" is tried before "fw"
        tokens.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        tokens.dedup();

        let pattern = format!(r"(?i)^\s*(?:{})(?::\s*|\s+)", tokens.join("|"));
        let prefix_regex = Regex::new(&pattern)
            .map_err(|err| ThreadingError::invalid_config(format!("reply prefix pattern: {err}")))?;

        Ok(Self { prefix_regex })
    }

    /// Subject with one prefix stripped and whitespace collapsed, original
    /// casing preserved. This is the form stored on a thread.
    pub fn display_form(&self, subject: &str) -> String {
        let stripped = match self.prefix_regex.find(subject) {
            Some(prefix) => &subject[prefix.end()..],
            None => subject,
        };

        stripped.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Comparison key: the display form, lower-cased.
    pub fn normalize(&self, subject: &str) -> String {
        self.display_form(subject).to_lowercase()
    }

    /// Whether two raw subjects normalize to the same key.
    pub fn matches(&self, a: &str, b: &str) -> bool {
        self.normalize(a) == self.normalize(b)
    }
}

impl Default for SubjectNormalizer {
    fn default() -> Self {
        default_normalizer().clone()
    }
}

/// Normalize an email subject for threading comparison using the default
/// prefix set.
///
/// ## Examples
///
/// ```rust
/// use mail_threading::threading::normalize_subject;
///
/// assert_eq!(normalize_subject("Re: Project   Update"), "project update");
/// assert_eq!(normalize_subject("AW: Angebot"), "angebot");
/// assert_eq!(normalize_subject("Re: Re: Hello"), "re: hello");
/// ```
pub fn normalize_subject(subject: &str) -> String {
    default_normalizer().normalize(subject)
}

/// Whether two subjects are equal for threading purposes.
pub fn subjects_match(a: &str, b: &str) -> bool {
    default_normalizer().matches(a, b)
}
