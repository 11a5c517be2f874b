use crate::core::ValidationError;
use crate::models::{MonthDate, SubscriptionFilter};

/// Check whether a subscription period intersects a query window
///
/// Both intervals are closed. A missing subscription end means the
/// subscription is still active; a missing window bound is unbounded on that
/// side. The function is total: a period whose end precedes its start is
/// evaluated by the same two comparisons.
///
/// # Arguments
/// * `start` - First month of the subscription
/// * `end` - Last month of the subscription, `None` if open-ended
/// * `window_start` - Earliest month of the query window
/// * `window_end` - Latest month of the query window
#[inline]
pub fn overlaps(
    start: MonthDate,
    end: Option<MonthDate>,
    window_start: Option<MonthDate>,
    window_end: Option<MonthDate>,
) -> bool {
    // Started no later than the window closes
    let started_in_time = window_end.map_or(true, |window_end| start <= window_end);

    // Not finished before the window opens
    let still_running = match (end, window_start) {
        (Some(end), Some(window_start)) => end >= window_start,
        _ => true,
    };

    started_in_time && still_running
}

/// Reject a period whose end precedes its start
pub fn validate_period(start: MonthDate, end: Option<MonthDate>) -> Result<(), ValidationError> {
    match end {
        Some(end) if end < start => Err(ValidationError::new(format!(
            "end_date {} precedes start_date {}",
            end, start
        ))),
        _ => Ok(()),
    }
}

/// Reject a filter window whose end precedes its start
pub fn validate_window(filter: &SubscriptionFilter) -> Result<(), ValidationError> {
    match (filter.start_date, filter.end_date) {
        (Some(start), Some(end)) if end < start => Err(ValidationError::new(format!(
            "filter end_date {} precedes filter start_date {}",
            end, start
        ))),
        _ => Ok(()),
    }
}
