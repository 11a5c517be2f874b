use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::core::{sum_prices, validate_period, validate_window, MergeOutcome, ValidationError};
use crate::models::{
    CreateSubscriptionRequest, NewSubscription, Pagination, Subscription, SubscriptionFilter,
    SubscriptionListResponse, SubscriptionUpdate, UpdateSubscriptionRequest,
};
use crate::services::store::{ServiceResolver, StoreError, SubscriptionStore};

/// Outcome kinds surfaced to the HTTP layer
#[derive(Debug, Error)]
pub enum SubscriptionError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Subscription not found: {0}")]
    NotFound(Uuid),

    #[error("Storage error: {0}")]
    Storage(StoreError),
}

impl From<StoreError> for SubscriptionError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => SubscriptionError::NotFound(id),
            StoreError::Validation(err) => SubscriptionError::Validation(err),
            other => SubscriptionError::Storage(other),
        }
    }
}

impl SubscriptionError {
    /// HTTP status code this error maps to
    pub fn status_code(&self) -> u16 {
        match self {
            SubscriptionError::Validation(_) => 400,
            SubscriptionError::NotFound(_) => 404,
            SubscriptionError::Storage(_) => 500,
        }
    }
}

/// Subscription use cases on top of a store and a service resolver
///
/// Service names are resolved to identities here, before anything reaches
/// the store, so the merge engine only ever sees resolved services.
#[derive(Clone)]
pub struct SubscriptionService {
    store: Arc<dyn SubscriptionStore>,
    services: Arc<dyn ServiceResolver>,
}

impl SubscriptionService {
    pub fn new(store: Arc<dyn SubscriptionStore>, services: Arc<dyn ServiceResolver>) -> Self {
        Self { store, services }
    }

    /// Create a subscription, registering its service name if new
    pub async fn create(&self, req: CreateSubscriptionRequest) -> Result<Subscription, SubscriptionError> {
        validate_period(req.start_date, req.end_date)?;

        let service = self.services.resolve_or_create(&req.service_name).await?;

        let subscription = self
            .store
            .insert(NewSubscription {
                service,
                price: req.price,
                user_id: req.user_id,
                start_date: req.start_date,
                end_date: req.end_date,
            })
            .await?;

        tracing::info!(
            "Created subscription {} ({}, {} per month) for user {}",
            subscription.id,
            subscription.service_name,
            subscription.price,
            subscription.user_id
        );

        Ok(subscription)
    }

    pub async fn get(&self, id: Uuid) -> Result<Subscription, SubscriptionError> {
        let subscription = self.store.get_by_id(id).await?;
        tracing::debug!("Fetched subscription {}", id);
        Ok(subscription)
    }

    /// Apply a partial update and report which fields were supplied
    pub async fn update(&self, id: Uuid, req: UpdateSubscriptionRequest) -> Result<MergeOutcome, SubscriptionError> {
        let service = match &req.service_name {
            Some(name) => Some(self.services.resolve_or_create(name).await?),
            None => None,
        };

        let update = SubscriptionUpdate {
            service,
            price: req.price,
            user_id: req.user_id,
            start_date: req.start_date,
            end_date: req.end_date,
        };

        let outcome = self.store.update(id, update).await?;

        if outcome.is_unchanged() {
            tracing::debug!("Update of subscription {} supplied no fields", id);
        } else {
            let fields: Vec<&str> = outcome.changed.iter().map(|field| field.as_str()).collect();
            tracing::info!("Updated subscription {}: {}", id, fields.join(", "));
        }

        Ok(outcome)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), SubscriptionError> {
        self.store.delete(id).await?;
        tracing::info!("Deleted subscription {}", id);
        Ok(())
    }

    /// List subscriptions one page at a time; `page` is 1-based
    pub async fn list(&self, page: u32, limit: u32) -> Result<SubscriptionListResponse, SubscriptionError> {
        let page = page.max(1);
        let limit = limit.clamp(1, 100);
        let offset = u64::from(page - 1) * u64::from(limit);

        let result = self.store.list(limit, offset).await?;

        tracing::debug!("Listed {} of {} subscriptions (page {})", result.items.len(), result.total, page);

        Ok(SubscriptionListResponse {
            data: result.items,
            pagination: Pagination::new(page, limit, result.total),
        })
    }

    /// Sum of prices of all subscriptions matching the filter
    pub async fn sum(&self, filter: &SubscriptionFilter) -> Result<i64, SubscriptionError> {
        validate_window(filter)?;

        let candidates = self.store.candidates(filter).await?;
        let total = sum_prices(&candidates, filter)?;

        tracing::info!(
            "Sum over {} candidate subscriptions is {} (filter: {:?})",
            candidates.len(),
            total,
            filter
        );

        Ok(total)
    }

    pub async fn health_check(&self) -> bool {
        match self.store.health_check().await {
            Ok(healthy) => healthy,
            Err(e) => {
                tracing::warn!("Store health check failed: {}", e);
                false
            }
        }
    }
}
