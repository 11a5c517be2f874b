use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::core::{merge, MergeOutcome};
use crate::models::{NewSubscription, Service, Subscription, SubscriptionFilter, SubscriptionUpdate};
use crate::services::store::{ServiceResolver, StoreError, SubscriptionPage, SubscriptionStore};

#[derive(Default)]
struct Tables {
    subscriptions: HashMap<Uuid, Subscription>,
    services: HashMap<String, Service>,
}

/// In-process store backed by hash maps
///
/// Every operation takes the single table lock, which makes updates and
/// service creation atomic. Used by tests and benchmarks.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubscriptionStore for InMemoryStore {
    async fn insert(&self, new_subscription: NewSubscription) -> Result<Subscription, StoreError> {
        let subscription = new_subscription.into_subscription(Uuid::new_v4());

        let mut tables = self.tables.write().await;
        tables.subscriptions.insert(subscription.id, subscription.clone());

        Ok(subscription)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Subscription, StoreError> {
        self.tables
            .read()
            .await
            .subscriptions
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn update(&self, id: Uuid, update: SubscriptionUpdate) -> Result<MergeOutcome, StoreError> {
        let mut tables = self.tables.write().await;

        let base = tables.subscriptions.get(&id).ok_or(StoreError::NotFound(id))?;
        let outcome = merge(base, &update)?;

        tables.subscriptions.insert(id, outcome.subscription.clone());

        Ok(outcome)
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        self.tables
            .write()
            .await
            .subscriptions
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    async fn list(&self, limit: u32, offset: u64) -> Result<SubscriptionPage, StoreError> {
        let tables = self.tables.read().await;

        let mut all: Vec<&Subscription> = tables.subscriptions.values().collect();
        all.sort_by(|a, b| a.start_date.cmp(&b.start_date).then_with(|| a.id.cmp(&b.id)));

        let items = all
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(limit as usize)
            .cloned()
            .collect();

        Ok(SubscriptionPage {
            items,
            total: tables.subscriptions.len() as u64,
        })
    }

    async fn candidates(&self, filter: &SubscriptionFilter) -> Result<Vec<Subscription>, StoreError> {
        let tables = self.tables.read().await;

        Ok(tables
            .subscriptions
            .values()
            .filter(|sub| filter.user_id.map_or(true, |user_id| sub.user_id == user_id))
            .cloned()
            .collect())
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}

#[async_trait]
impl ServiceResolver for InMemoryStore {
    async fn resolve_or_create(&self, name: &str) -> Result<Service, StoreError> {
        let mut tables = self.tables.write().await;

        let service = tables
            .services
            .entry(name.to_string())
            .or_insert_with(|| Service {
                id: Uuid::new_v4(),
                name: name.to_string(),
            });

        Ok(service.clone())
    }
}
