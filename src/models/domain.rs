use chrono::{Datelike, Days, NaiveDate};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Returned when a string is not a valid `MM-YYYY` month
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid month date '{0}', expected MM-YYYY")]
pub struct MonthDateParseError(pub String);

/// Calendar month, stored as the first day of that month
///
/// Day-of-month carries no meaning for subscriptions, so every value is
/// truncated on construction. The external representation is `MM-YYYY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthDate(NaiveDate);

impl MonthDate {
    /// Build a month from a year and a 1-based month number
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    /// Truncate an arbitrary date to its month
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date - Days::new(u64::from(date.day0())))
    }

    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }
}

impl From<NaiveDate> for MonthDate {
    fn from(date: NaiveDate) -> Self {
        Self::from_date(date)
    }
}

impl FromStr for MonthDate {
    type Err = MonthDateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || MonthDateParseError(s.to_string());

        let (month, year) = s.split_once('-').ok_or_else(err)?;
        if month.len() != 2 || year.len() != 4 {
            return Err(err());
        }
        if !month.bytes().chain(year.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(err());
        }

        let month: u32 = month.parse().map_err(|_| err())?;
        let year: i32 = year.parse().map_err(|_| err())?;

        Self::new(year, month).ok_or_else(err)
    }
}

impl fmt::Display for MonthDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:04}", self.month(), self.year())
    }
}

impl Serialize for MonthDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// Subscribable service, unique by name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: Uuid,
    pub name: String,
}

/// Stored user subscription
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: Uuid,
    #[serde(skip)]
    pub service_id: Uuid,
    pub service_name: String,
    pub price: i64,
    pub user_id: Uuid,
    pub start_date: MonthDate,
    /// `None` while the subscription is still active
    pub end_date: Option<MonthDate>,
}

impl Subscription {
    pub fn is_open_ended(&self) -> bool {
        self.end_date.is_none()
    }
}

/// Subscription about to be inserted, with its service already resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubscription {
    pub service: Service,
    pub price: i64,
    pub user_id: Uuid,
    pub start_date: MonthDate,
    pub end_date: Option<MonthDate>,
}

impl NewSubscription {
    pub fn into_subscription(self, id: Uuid) -> Subscription {
        Subscription {
            id,
            service_id: self.service.id,
            service_name: self.service.name,
            price: self.price,
            user_id: self.user_id,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

/// Sparse update of a subscription
///
/// `None` means "leave unchanged". For `end_date`, `Some(None)` clears the
/// end date and makes the subscription open-ended again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionUpdate {
    pub service: Option<Service>,
    pub price: Option<i64>,
    pub user_id: Option<Uuid>,
    pub start_date: Option<MonthDate>,
    pub end_date: Option<Option<MonthDate>>,
}

/// Names of the subscription fields a partial update can touch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionField {
    ServiceName,
    Price,
    UserId,
    StartDate,
    EndDate,
}

impl SubscriptionField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionField::ServiceName => "service_name",
            SubscriptionField::Price => "price",
            SubscriptionField::UserId => "user_id",
            SubscriptionField::StartDate => "start_date",
            SubscriptionField::EndDate => "end_date",
        }
    }
}

impl fmt::Display for SubscriptionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filter for the aggregate price query
///
/// Every criterion is optional. Missing window bounds are unbounded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<MonthDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<MonthDate>,
}

impl SubscriptionFilter {
    /// Service name constraint, treating an empty string as absent
    pub fn service_name(&self) -> Option<&str> {
        self.service_name.as_deref().filter(|name| !name.is_empty())
    }
}
