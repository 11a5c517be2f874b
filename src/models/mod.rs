// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{MonthDate, MonthDateParseError, Service, Subscription, NewSubscription, SubscriptionUpdate, SubscriptionField, SubscriptionFilter};
pub use requests::{CreateSubscriptionRequest, UpdateSubscriptionRequest, SubscriptionSumQuery, ListSubscriptionsQuery};
pub use responses::{Pagination, SubscriptionListResponse, UpdateSubscriptionResponse, SubscriptionSumResponse, HealthResponse, ErrorResponse};
