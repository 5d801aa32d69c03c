//! Background sync.
//!
//! The `contact-form` tag is acknowledged but flushes nothing: there is no
//! pending-submission queue behind it.

use serde::Serialize;

pub const CONTACT_FORM_TAG: &str = "contact-form";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, schemars::JsonSchema)]
pub struct SyncOutcome {
    pub tag: String,
    /// Whether the worker has a handler for this tag.
    pub recognized: bool,
    /// Submissions delivered.
    pub flushed: usize,
}

pub(crate) fn handle(tag: &str) -> SyncOutcome {
    let recognized = tag == CONTACT_FORM_TAG;
    if recognized {
        tracing::info!(tag, "contact form sync: no pending submissions");
    } else {
        tracing::debug!(tag, "ignoring unknown sync tag");
    }
    SyncOutcome { tag: tag.to_string(), recognized, flushed: 0 }
}
