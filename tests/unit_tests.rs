// Unit tests for the overlap evaluator and merge engine

use subs_aggregator::core::{filters::{matches_filter, sum_prices}, merge::merge, period::overlaps};
use subs_aggregator::models::{MonthDate, Service, Subscription, SubscriptionField, SubscriptionFilter, SubscriptionUpdate};
use uuid::Uuid;

fn month(raw: &str) -> MonthDate {
    raw.parse().unwrap()
}

fn create_subscription(start: &str, end: Option<&str>, price: i64) -> Subscription {
    Subscription {
        id: Uuid::new_v4(),
        service_id: Uuid::new_v4(),
        service_name: "Yandex Plus".to_string(),
        price,
        user_id: Uuid::parse_str("60601fee-2bf1-4721-ae6f-7636e79a0cba").unwrap(),
        start_date: month(start),
        end_date: end.map(month),
    }
}

fn window(start: Option<&str>, end: Option<&str>) -> SubscriptionFilter {
    SubscriptionFilter {
        start_date: start.map(month),
        end_date: end.map(month),
        ..Default::default()
    }
}

/// Every month from 01-2023 to 12-2025
fn months() -> Vec<MonthDate> {
    (2023..=2025)
        .flat_map(|year| (1..=12).map(move |m| MonthDate::new(year, m).unwrap()))
        .collect()
}

#[test]
fn test_open_ended_started_before_window_always_matches() {
    let all = months();
    for &start in &all {
        for &window_start in all.iter().filter(|&&ws| ws >= start) {
            let sub = Subscription { start_date: start, end_date: None, ..create_subscription("01-2023", None, 1) };

            assert!(matches_filter(&sub, &SubscriptionFilter { start_date: Some(window_start), ..Default::default() }));

            for &window_end in all.iter().filter(|&&we| we >= window_start) {
                let filter = SubscriptionFilter {
                    start_date: Some(window_start),
                    end_date: Some(window_end),
                    ..Default::default()
                };
                assert!(matches_filter(&sub, &filter), "start {start} window {window_start}..{window_end}");
            }
        }
    }
}

#[test]
fn test_no_bounds_depends_only_on_equality_fields() {
    let sub = create_subscription("03-2024", Some("05-2024"), 100);

    assert!(matches_filter(&sub, &SubscriptionFilter::default()));

    let other_user = SubscriptionFilter { user_id: Some(Uuid::new_v4()), ..Default::default() };
    assert!(!matches_filter(&sub, &other_user));

    let same_user = SubscriptionFilter { user_id: Some(sub.user_id), ..Default::default() };
    assert!(matches_filter(&sub, &same_user));

    let other_service = SubscriptionFilter { service_name: Some("Kion".to_string()), ..Default::default() };
    assert!(!matches_filter(&sub, &other_service));
}

#[test]
fn test_boundary_inclusivity() {
    // Starts exactly on the window end
    let starts_on_end = create_subscription("08-2024", None, 100);
    assert!(matches_filter(&starts_on_end, &window(Some("06-2024"), Some("08-2024"))));
    assert!(matches_filter(&starts_on_end, &window(None, Some("08-2024"))));

    // Ends exactly on the window start
    let ends_on_start = create_subscription("01-2024", Some("06-2024"), 100);
    assert!(matches_filter(&ends_on_start, &window(Some("06-2024"), Some("08-2024"))));
    assert!(matches_filter(&ends_on_start, &window(Some("06-2024"), None)));
}

#[test]
fn test_disjoint_intervals_do_not_match() {
    let sub = create_subscription("03-2024", Some("05-2024"), 100);
    assert!(!matches_filter(&sub, &window(Some("06-2024"), Some("08-2024"))));
    assert!(!matches_filter(&sub, &window(Some("06-2024"), None)));
    assert!(!matches_filter(&sub, &window(None, Some("02-2024"))));
}

#[test]
fn test_overlap_is_symmetric_for_closed_intervals() {
    let all = months();
    let sample: Vec<MonthDate> = all.iter().step_by(5).copied().collect();

    for &a_start in &sample {
        for &a_end in sample.iter().filter(|&&e| e >= a_start) {
            for &b_start in &sample {
                for &b_end in sample.iter().filter(|&&e| e >= b_start) {
                    assert_eq!(
                        overlaps(a_start, Some(a_end), Some(b_start), Some(b_end)),
                        overlaps(b_start, Some(b_end), Some(a_start), Some(a_end)),
                    );
                }
            }
        }
    }
}

#[test]
fn test_aggregate_scenario() {
    let subs = vec![
        create_subscription("07-2025", None, 400),
        create_subscription("01-2024", Some("03-2024"), 100),
    ];

    assert_eq!(sum_prices(&subs, &window(Some("06-2025"), Some("09-2025"))), Ok(400));
    assert_eq!(sum_prices(&subs, &window(None, Some("12-2024"))), Ok(100));
    assert_eq!(sum_prices(&subs, &window(Some("02-2024"), None)), Ok(500));
}

#[test]
fn test_merge_price_only() {
    let base = create_subscription("07-2025", None, 400);
    let update = SubscriptionUpdate { price: Some(450), ..Default::default() };

    let outcome = merge(&base, &update).unwrap();

    assert_eq!(outcome.changed, vec![SubscriptionField::Price]);
    assert_eq!(outcome.subscription, Subscription { price: 450, ..base });
}

#[test]
fn test_merge_all_fields() {
    let base = create_subscription("07-2025", None, 400);
    let service = Service { id: Uuid::new_v4(), name: "Okko".to_string() };
    let user_id = Uuid::new_v4();
    let update = SubscriptionUpdate {
        service: Some(service.clone()),
        price: Some(299),
        user_id: Some(user_id),
        start_date: Some(month("01-2025")),
        end_date: Some(Some(month("06-2025"))),
    };

    let outcome = merge(&base, &update).unwrap();

    assert_eq!(
        outcome.changed,
        vec![
            SubscriptionField::ServiceName,
            SubscriptionField::Price,
            SubscriptionField::UserId,
            SubscriptionField::StartDate,
            SubscriptionField::EndDate,
        ]
    );
    assert_eq!(outcome.subscription.id, base.id);
    assert_eq!(outcome.subscription.service_id, service.id);
    assert_eq!(outcome.subscription.user_id, user_id);
    assert_eq!(outcome.subscription.end_date, Some(month("06-2025")));
}

#[test]
fn test_merge_rejects_end_before_start() {
    let base = create_subscription("07-2025", None, 400);
    let update = SubscriptionUpdate {
        price: Some(1),
        end_date: Some(Some(month("06-2025"))),
        ..Default::default()
    };

    let err = merge(&base, &update).unwrap_err();
    assert!(err.to_string().contains("06-2025"));
}

#[test]
fn test_merge_empty_update_twice() {
    let base = create_subscription("07-2025", Some("09-2025"), 400);
    let update = SubscriptionUpdate::default();

    let first = merge(&base, &update).unwrap();
    let second = merge(&base, &update).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.subscription, base);
    assert!(first.changed.is_empty());
}
