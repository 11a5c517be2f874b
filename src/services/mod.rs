// Service exports
pub mod memory;
pub mod postgres;
pub mod store;
pub mod subscriptions;

pub use memory::InMemoryStore;
pub use postgres::PostgresClient;
pub use store::{ServiceResolver, StoreError, SubscriptionPage, SubscriptionStore};
pub use subscriptions::{SubscriptionError, SubscriptionService};
