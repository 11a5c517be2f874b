use crate::core::{period::validate_period, ValidationError};
use crate::models::{Subscription, SubscriptionField, SubscriptionUpdate};

/// Result of applying a sparse update to a subscription
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    pub subscription: Subscription,
    /// Fields supplied by the update, in declaration order
    pub changed: Vec<SubscriptionField>,
}

impl MergeOutcome {
    pub fn is_unchanged(&self) -> bool {
        self.changed.is_empty()
    }
}

/// Apply a sparse update on top of a stored subscription
///
/// Only fields present in `update` are written; the rest are copied from
/// `base`. The service must already be resolved by the caller. The merged
/// period is validated before anything is returned, so a failing update
/// yields no partial result.
///
/// # Returns
/// The merged subscription and the names of the supplied fields, or a
/// `ValidationError` if the merged end date precedes the start date.
pub fn merge(base: &Subscription, update: &SubscriptionUpdate) -> Result<MergeOutcome, ValidationError> {
    let mut merged = base.clone();
    let mut changed = Vec::new();

    if let Some(service) = &update.service {
        merged.service_id = service.id;
        merged.service_name = service.name.clone();
        changed.push(SubscriptionField::ServiceName);
    }

    if let Some(price) = update.price {
        merged.price = price;
        changed.push(SubscriptionField::Price);
    }

    if let Some(user_id) = update.user_id {
        merged.user_id = user_id;
        changed.push(SubscriptionField::UserId);
    }

    if let Some(start_date) = update.start_date {
        merged.start_date = start_date;
        changed.push(SubscriptionField::StartDate);
    }

    if let Some(end_date) = update.end_date {
        merged.end_date = end_date;
        changed.push(SubscriptionField::EndDate);
    }

    validate_period(merged.start_date, merged.end_date)?;

    Ok(MergeOutcome {
        subscription: merged,
        changed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MonthDate, Service};
    use uuid::Uuid;

    fn create_test_subscription() -> Subscription {
        Subscription {
            id: Uuid::new_v4(),
            service_id: Uuid::new_v4(),
            service_name: "Yandex Plus".to_string(),
            price: 400,
            user_id: Uuid::new_v4(),
            start_date: MonthDate::new(2025, 7).unwrap(),
            end_date: Some(MonthDate::new(2025, 12).unwrap()),
        }
    }

    #[test]
    fn test_price_only_update() {
        let base = create_test_subscription();
        let update = SubscriptionUpdate { price: Some(500), ..Default::default() };

        let outcome = merge(&base, &update).unwrap();

        assert_eq!(outcome.subscription.price, 500);
        assert_eq!(outcome.subscription.service_name, base.service_name);
        assert_eq!(outcome.subscription.user_id, base.user_id);
        assert_eq!(outcome.subscription.start_date, base.start_date);
        assert_eq!(outcome.subscription.end_date, base.end_date);
        assert_eq!(outcome.changed, vec![SubscriptionField::Price]);
    }

    #[test]
    fn test_service_update_uses_resolved_identity() {
        let base = create_test_subscription();
        let service = Service { id: Uuid::new_v4(), name: "Kinopoisk".to_string() };
        let update = SubscriptionUpdate { service: Some(service.clone()), ..Default::default() };

        let outcome = merge(&base, &update).unwrap();

        assert_eq!(outcome.subscription.service_id, service.id);
        assert_eq!(outcome.subscription.service_name, "Kinopoisk");
        assert_eq!(outcome.changed, vec![SubscriptionField::ServiceName]);
    }

    #[test]
    fn test_end_before_start_is_rejected() {
        let base = create_test_subscription();
        let update = SubscriptionUpdate {
            price: Some(1),
            end_date: Some(MonthDate::new(2025, 6)),
            ..Default::default()
        };

        assert!(merge(&base, &update).is_err());
    }

    #[test]
    fn test_start_moved_past_existing_end_is_rejected() {
        let base = create_test_subscription();
        let update = SubscriptionUpdate {
            start_date: MonthDate::new(2026, 1),
            ..Default::default()
        };

        assert!(merge(&base, &update).is_err());
    }

    #[test]
    fn test_clearing_end_date() {
        let base = create_test_subscription();
        let update = SubscriptionUpdate { end_date: Some(None), ..Default::default() };

        let outcome = merge(&base, &update).unwrap();

        assert!(outcome.subscription.is_open_ended());
        assert_eq!(outcome.changed, vec![SubscriptionField::EndDate]);
    }

    #[test]
    fn test_empty_update_is_idempotent() {
        let base = create_test_subscription();
        let update = SubscriptionUpdate::default();

        let first = merge(&base, &update).unwrap();
        let second = merge(&first.subscription, &update).unwrap();

        assert!(first.is_unchanged());
        assert_eq!(first.subscription, base);
        assert_eq!(second.subscription, base);
    }
}
