//! Error kinds for the data-access layer.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers must distinguish "the
//! requested list or item does not exist" (a normal, client-facing outcome)
//! from `MalformedDocument` (a persisted document that violates the schema,
//! which signals corruption) and `Store` (the driver itself failed). The
//! HTTP layer maps the first to 404 and the other two to 500; a malformed
//! document is never coerced into not-found.

use thiserror::Error as ThisError;

/// Errors produced by [`TodoStore`](crate::dal::TodoStore) operations.
#[derive(Debug, ThisError)]
pub enum Error {
    /// The requested to-do list or item does not exist.
    #[error("to-do list not found")]
    NotFound,

    /// A persisted document is missing a required field or has the wrong
    /// shape for one.
    #[error("malformed list document: {0}")]
    MalformedDocument(String),

    /// The document store reported a failure.
    #[error(transparent)]
    Store(#[from] mongodb::error::Error),
}

impl Error {
    pub(crate) fn malformed(detail: impl Into<String>) -> Self {
        Error::MalformedDocument(detail.into())
    }
}
