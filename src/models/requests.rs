use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use crate::models::domain::{MonthDate, SubscriptionFilter};

/// Request to create a subscription
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateSubscriptionRequest {
    #[validate(length(min = 1, max = 100))]
    pub service_name: String,
    #[validate(range(min = 1, max = 1_000_000))]
    pub price: i64,
    pub user_id: Uuid,
    pub start_date: MonthDate,
    #[serde(default)]
    pub end_date: Option<MonthDate>,
}

/// Request to partially update a subscription
///
/// Missing keys leave the stored value untouched. `"end_date": null`
/// clears the end date.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateSubscriptionRequest {
    #[validate(length(min = 1, max = 100))]
    #[serde(default)]
    pub service_name: Option<String>,
    #[validate(range(min = 1, max = 1_000_000))]
    #[serde(default)]
    pub price: Option<i64>,
    #[serde(default)]
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub start_date: Option<MonthDate>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub end_date: Option<Option<MonthDate>>,
}

/// Distinguishes an explicit `null` from a missing key
fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Treats an empty query value (`user_id=`) like a missing one
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.is_empty() => raw.parse().map(Some).map_err(de::Error::custom),
        _ => Ok(None),
    }
}

/// Query parameters of the aggregate price endpoint
///
/// Empty values impose no constraint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SubscriptionSumQuery {
    #[validate(length(max = 100))]
    #[serde(default, deserialize_with = "empty_as_none")]
    pub service_name: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub user_id: Option<Uuid>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub start_date: Option<MonthDate>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub end_date: Option<MonthDate>,
}

impl From<SubscriptionSumQuery> for SubscriptionFilter {
    fn from(query: SubscriptionSumQuery) -> Self {
        SubscriptionFilter {
            service_name: query.service_name.filter(|name| !name.is_empty()),
            user_id: query.user_id,
            start_date: query.start_date,
            end_date: query.end_date,
        }
    }
}

/// Pagination parameters of the list endpoint
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ListSubscriptionsQuery {
    #[validate(range(min = 1))]
    #[serde(default = "default_page")]
    pub page: u32,
    #[validate(range(min = 1, max = 100))]
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl Default for ListSubscriptionsQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    20
}
