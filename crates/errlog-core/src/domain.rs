//! # domain
//!
//! why: mark errors whose message is written for the end user
//! relations: detected by resolver.rs while walking a cause chain
//! what: DomainError, raised deliberately by application code

use std::error::Error as StdError;

use thiserror::Error;

type BoxedSource = Box<dyn StdError + Send + Sync + 'static>;

/// An error raised on purpose, carrying a message that can be shown as-is
///
/// When one of these appears anywhere in a cause chain, the resolver uses
/// its message instead of deriving one from the root cause.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct DomainError {
    message: String,
    #[source]
    source: Option<BoxedSource>,
}

impl DomainError {
    /// Create a domain error with no underlying cause
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Create a domain error wrapping the failure that triggered it
    pub fn with_source(
        message: impl Into<String>,
        source: impl Into<BoxedSource>,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
