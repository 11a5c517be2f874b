// Criterion benchmarks for Subs Aggregator

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use subs_aggregator::core::{filters::sum_prices, merge::merge};
use subs_aggregator::models::{MonthDate, Subscription, SubscriptionFilter, SubscriptionUpdate};
use uuid::Uuid;

fn create_subscription(id: usize, users: &[Uuid]) -> Subscription {
    let start_year = 2020 + (id % 5) as i32;
    let start_month = 1 + (id % 12) as u32;
    let start = MonthDate::new(start_year, start_month).unwrap();
    let end = if id % 3 == 0 {
        None
    } else {
        MonthDate::new(start_year + 1, start_month)
    };

    Subscription {
        id: Uuid::new_v4(),
        service_id: Uuid::new_v4(),
        service_name: format!("Service {}", id % 20),
        price: 100 + (id % 50) as i64,
        user_id: users[id % users.len()],
        start_date: start,
        end_date: end,
    }
}

fn create_subscriptions(count: usize) -> Vec<Subscription> {
    let users: Vec<Uuid> = (0..100).map(|_| Uuid::new_v4()).collect();
    (0..count).map(|i| create_subscription(i, &users)).collect()
}

fn bench_sum_prices(c: &mut Criterion) {
    let mut group = c.benchmark_group("sum_prices");

    let filter = SubscriptionFilter {
        start_date: MonthDate::new(2022, 6),
        end_date: MonthDate::new(2023, 6),
        ..Default::default()
    };

    for size in [100, 1_000, 10_000] {
        let subscriptions = create_subscriptions(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &subscriptions, |b, subs| {
            b.iter(|| sum_prices(black_box(subs), black_box(&filter)));
        });
    }

    group.finish();
}

fn bench_sum_prices_filtered(c: &mut Criterion) {
    let subscriptions = create_subscriptions(10_000);
    let filter = SubscriptionFilter {
        service_name: Some("Service 7".to_string()),
        user_id: Some(subscriptions[7].user_id),
        start_date: MonthDate::new(2021, 1),
        end_date: None,
    };

    c.bench_function("sum_prices_filtered_10k", |b| {
        b.iter(|| sum_prices(black_box(&subscriptions), black_box(&filter)));
    });
}

fn bench_merge(c: &mut Criterion) {
    let base = create_subscriptions(1).remove(0);
    let update = SubscriptionUpdate {
        price: Some(499),
        end_date: Some(None),
        ..Default::default()
    };

    c.bench_function("merge", |b| {
        b.iter(|| merge(black_box(&base), black_box(&update)));
    });
}

criterion_group!(benches, bench_sum_prices, bench_sum_prices_filtered, bench_merge);
criterion_main!(benches);
