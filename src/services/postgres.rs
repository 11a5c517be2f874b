use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::time::Duration;
use uuid::Uuid;

use crate::config::DatabaseSettings;
use crate::core::{merge, MergeOutcome};
use crate::models::{MonthDate, NewSubscription, Service, Subscription, SubscriptionFilter, SubscriptionUpdate};
use crate::services::store::{ServiceResolver, StoreError, SubscriptionPage, SubscriptionStore};

const SELECT_SUBSCRIPTION: &str = r#"
    SELECT subs.id, subs.service_id, services.name AS service_name,
           subs.price, subs.user_id, subs.start_date, subs.end_date
    FROM subs
    JOIN services ON services.id = subs.service_id
"#;

/// PostgreSQL-backed subscription store and service resolver
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(settings: &DatabaseSettings) -> Result<Self, StoreError> {
        tracing::info!(
            "Connecting to PostgreSQL (max: {}, min: {} connections)",
            settings.max_connections,
            settings.min_connections
        );

        Self::new(
            &settings.url,
            settings.max_connections,
            settings.min_connections,
            Duration::from_secs(settings.acquire_timeout_secs),
            Duration::from_secs(settings.idle_timeout_secs),
        )
        .await
    }
}

fn subscription_from_row(row: &PgRow) -> Result<Subscription, sqlx::Error> {
    let start_date: NaiveDate = row.try_get("start_date")?;
    let end_date: Option<NaiveDate> = row.try_get("end_date")?;

    Ok(Subscription {
        id: row.try_get("id")?,
        service_id: row.try_get("service_id")?,
        service_name: row.try_get("service_name")?,
        price: row.try_get("price")?,
        user_id: row.try_get("user_id")?,
        start_date: MonthDate::from(start_date),
        end_date: end_date.map(MonthDate::from),
    })
}

#[async_trait]
impl SubscriptionStore for PostgresClient {
    async fn insert(&self, new_subscription: NewSubscription) -> Result<Subscription, StoreError> {
        let subscription = new_subscription.into_subscription(Uuid::new_v4());

        let query = r#"
            INSERT INTO subs (id, service_id, price, user_id, start_date, end_date)
            VALUES ($1, $2, $3, $4, $5, $6)
        "#;

        sqlx::query(query)
            .bind(subscription.id)
            .bind(subscription.service_id)
            .bind(subscription.price)
            .bind(subscription.user_id)
            .bind(subscription.start_date.as_naive())
            .bind(subscription.end_date.map(|date| date.as_naive()))
            .execute(&self.pool)
            .await?;

        tracing::debug!("Inserted subscription {}", subscription.id);

        Ok(subscription)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Subscription, StoreError> {
        let query = format!("{SELECT_SUBSCRIPTION} WHERE subs.id = $1");

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound(id))?;

        Ok(subscription_from_row(&row)?)
    }

    /// Runs inside a transaction holding a row lock, so concurrent updates
    /// of the same subscription are serialized.
    async fn update(&self, id: Uuid, update: SubscriptionUpdate) -> Result<MergeOutcome, StoreError> {
        let mut tx = self.pool.begin().await?;

        let select = format!("{SELECT_SUBSCRIPTION} WHERE subs.id = $1 FOR UPDATE OF subs");
        let row = sqlx::query(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(StoreError::NotFound(id))?;
        let base = subscription_from_row(&row)?;

        let outcome = merge(&base, &update)?;

        if !outcome.is_unchanged() {
            let merged = &outcome.subscription;
            let query = r#"
                UPDATE subs
                SET service_id = $2, price = $3, user_id = $4, start_date = $5, end_date = $6
                WHERE id = $1
            "#;

            sqlx::query(query)
                .bind(merged.id)
                .bind(merged.service_id)
                .bind(merged.price)
                .bind(merged.user_id)
                .bind(merged.start_date.as_naive())
                .bind(merged.end_date.map(|date| date.as_naive()))
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(outcome)
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM subs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }

        Ok(())
    }

    async fn list(&self, limit: u32, offset: u64) -> Result<SubscriptionPage, StoreError> {
        let total: i64 = sqlx::query("SELECT COUNT(*) AS total FROM subs")
            .fetch_one(&self.pool)
            .await?
            .try_get("total")?;

        let query = format!("{SELECT_SUBSCRIPTION} ORDER BY subs.start_date, subs.id LIMIT $1 OFFSET $2");
        let rows = sqlx::query(&query)
            .bind(i64::from(limit))
            .bind(i64::try_from(offset).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await?;

        let items = rows
            .iter()
            .map(subscription_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(SubscriptionPage {
            items,
            total: u64::try_from(total).unwrap_or(0),
        })
    }

    async fn candidates(&self, filter: &SubscriptionFilter) -> Result<Vec<Subscription>, StoreError> {
        let query = format!(
            "{SELECT_SUBSCRIPTION} WHERE ($1::uuid IS NULL OR subs.user_id = $1) \
             AND ($2::text IS NULL OR services.name = $2)"
        );

        let rows = sqlx::query(&query)
            .bind(filter.user_id)
            .bind(filter.service_name())
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!("Fetched {} candidate subscriptions", rows.len());

        Ok(rows
            .iter()
            .map(subscription_from_row)
            .collect::<Result<Vec<_>, _>>()?)
    }

    /// Health check for the database connection
    async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

#[async_trait]
impl ServiceResolver for PostgresClient {
    /// Single-statement upsert; the unique index on `services.name` makes
    /// concurrent creation of the same name converge on one row.
    async fn resolve_or_create(&self, name: &str) -> Result<Service, StoreError> {
        let query = r#"
            INSERT INTO services (id, name)
            VALUES ($1, $2)
            ON CONFLICT (name)
            DO UPDATE SET name = EXCLUDED.name
            RETURNING id, name
        "#;

        let row = sqlx::query(query)
            .bind(Uuid::new_v4())
            .bind(name)
            .fetch_one(&self.pool)
            .await?;

        Ok(Service {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
        })
    }
}
