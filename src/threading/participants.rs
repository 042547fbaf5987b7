//! Participant extraction
//!
//! Addresses are opaque strings here. No case folding or display-name
//! stripping is applied, so `Foo@x.com` and `foo@x.com` are two participants.

use std::collections::BTreeSet;

use super::message::Message;

/// Collect `from`, `to` and `cc` of a message into a set of addresses.
///
/// Exact duplicates collapse; empty address fields are skipped.
pub fn extract_participants(message: &Message) -> BTreeSet<String> {
    std::iter::once(&message.from)
        .chain(message.to.iter())
        .chain(message.cc.iter())
        .filter(|address| !address.trim().is_empty())
        .cloned()
        .collect()
}
