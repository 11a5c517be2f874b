//! Subs Aggregator - HTTP service tracking user subscriptions
//!
//! This library provides the subscription model, the date-window overlap
//! evaluator used for aggregate spend queries, and the partial-update merge
//! engine, together with their storage adapters and HTTP routes.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;
pub mod telemetry;

// Re-export commonly used types
pub use crate::core::{matches_filter, merge, sum_prices, MergeOutcome, ValidationError};
pub use crate::models::{MonthDate, Subscription, SubscriptionFilter, SubscriptionUpdate, SubscriptionField};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let filter = SubscriptionFilter::default();
        let subs: Vec<Subscription> = vec![];
        assert_eq!(sum_prices(&subs, &filter), Ok(0));
    }
}
