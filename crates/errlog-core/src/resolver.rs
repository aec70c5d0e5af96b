//! # resolver
//!
//! why: turn any caught error into something fit to show an end user
//! relations: uses chain.rs to walk causes, domain.rs to recognize user-facing errors
//! what: resolve(), the first-domain-error-wins lookup with root cause fallback

use std::sync::Arc;

use crate::chain::{root_cause_message, Chain};
use crate::{DomainError, ErrorSummary, FaultRef};

/// Summarize `error` for display
///
/// The first `DomainError` found while walking from `error` down its causes
/// supplies the message, and the summary keeps the top-level error as its
/// cause. Without one, the message names the deepest cause and that cause
/// is kept instead (the error itself for a chain of one). Never fails.
pub fn resolve(error: impl Into<anyhow::Error>) -> ErrorSummary {
    let root = Arc::new(error.into());

    let mut domain_message = None;
    let mut deepest = 0;
    for (depth, node) in Chain::new(&**root).enumerate() {
        if let Some(domain) = node.downcast_ref::<DomainError>() {
            domain_message = Some(domain.message().to_owned());
            break;
        }
        deepest = depth;
    }

    match domain_message {
        Some(message) => ErrorSummary::new(message, Some(FaultRef::at(root, 0))),
        None => {
            let cause = FaultRef::at(root, deepest);
            ErrorSummary::new(root_cause_message(cause.error()), Some(cause))
        }
    }
}
