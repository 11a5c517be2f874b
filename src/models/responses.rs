use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::models::domain::{Subscription, SubscriptionField, SubscriptionFilter};

/// Pagination details for the subscription list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub pages: u32,
    pub total: u64,
    pub limit: u32,
}

impl Pagination {
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        let limit = limit.max(1);
        let pages = total.div_ceil(u64::from(limit));
        Self {
            page,
            pages: u32::try_from(pages).unwrap_or(u32::MAX),
            total,
            limit,
        }
    }
}

/// Response for the list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionListResponse {
    pub data: Vec<Subscription>,
    pub pagination: Pagination,
}

/// Response for the update endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateSubscriptionResponse {
    pub data: Subscription,
    pub changed_fields: Vec<SubscriptionField>,
}

/// Sum of subscription prices matching a filter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionSumResponse {
    pub filter: SubscriptionFilter,
    pub sum: i64,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
///
/// Body of every non-2xx reply, whether produced by a handler or by an
/// extractor error handler.
#[derive(Debug, Clone, Serialize, Deserialize, Error)]
#[error("{error}: {message}")]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
