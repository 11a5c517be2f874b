use crate::core::{period::overlaps, ValidationError};
use crate::models::{Subscription, SubscriptionFilter};

/// Check if a subscription satisfies the aggregate filter
///
/// Service name and user are exact, case-sensitive matches when set. The
/// date window uses closed-interval overlap, see [`overlaps`].
#[inline]
pub fn matches_filter(subscription: &Subscription, filter: &SubscriptionFilter) -> bool {
    if let Some(user_id) = filter.user_id {
        if subscription.user_id != user_id {
            return false;
        }
    }

    if let Some(service_name) = filter.service_name() {
        if subscription.service_name != service_name {
            return false;
        }
    }

    overlaps(
        subscription.start_date,
        subscription.end_date,
        filter.start_date,
        filter.end_date,
    )
}

/// Sum the prices of all subscriptions matching the filter
///
/// Fails instead of wrapping when the total does not fit in an `i64`.
pub fn sum_prices<'a, I>(subscriptions: I, filter: &SubscriptionFilter) -> Result<i64, ValidationError>
where
    I: IntoIterator<Item = &'a Subscription>,
{
    subscriptions
        .into_iter()
        .filter(|subscription| matches_filter(subscription, filter))
        .try_fold(0i64, |total, subscription| {
            total
                .checked_add(subscription.price)
                .ok_or_else(|| ValidationError::new("sum of subscription prices is out of range"))
        })
}
