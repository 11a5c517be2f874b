// Core subscription logic exports
pub mod filters;
pub mod merge;
pub mod period;

use thiserror::Error;

pub use filters::{matches_filter, sum_prices};
pub use merge::{merge, MergeOutcome};
pub use period::{overlaps, validate_period, validate_window};

/// A subscription or filter violates a domain rule
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
