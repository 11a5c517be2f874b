use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::core::{MergeOutcome, ValidationError};
use crate::models::{NewSubscription, Service, Subscription, SubscriptionFilter, SubscriptionUpdate};

/// Errors that can occur when reading or writing subscriptions
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Subscription not found: {0}")]
    NotFound(Uuid),

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("SQLx error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// One page of stored subscriptions
#[derive(Debug, Clone)]
pub struct SubscriptionPage {
    pub items: Vec<Subscription>,
    pub total: u64,
}

/// Persistence operations for subscriptions
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// Insert a subscription with a freshly generated ID
    async fn insert(&self, new_subscription: NewSubscription) -> Result<Subscription, StoreError>;

    async fn get_by_id(&self, id: Uuid) -> Result<Subscription, StoreError>;

    /// Merge `update` into the stored subscription as one atomic
    /// read-modify-write cycle
    async fn update(&self, id: Uuid, update: SubscriptionUpdate) -> Result<MergeOutcome, StoreError>;

    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;

    /// Subscriptions ordered by start date, then ID
    async fn list(&self, limit: u32, offset: u64) -> Result<SubscriptionPage, StoreError>;

    /// Subscriptions that may match the filter
    ///
    /// Implementations may narrow the result by the filter's equality
    /// fields. The date window is always evaluated by the caller.
    async fn candidates(&self, filter: &SubscriptionFilter) -> Result<Vec<Subscription>, StoreError>;

    async fn health_check(&self) -> Result<bool, StoreError>;
}

/// Maps service names to stable service identities
#[async_trait]
pub trait ServiceResolver: Send + Sync {
    /// Return the service with this name, creating it if missing
    ///
    /// Concurrent calls with the same name must yield the same service.
    async fn resolve_or_create(&self, name: &str) -> Result<Service, StoreError>;
}
