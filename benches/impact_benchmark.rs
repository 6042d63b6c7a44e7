use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ecotrack::engine::{analytics, impact, streak};
use ecotrack::models::{Activity, Category, UserStats};

/// A year of synthetic history: four activities per day across all
/// categories.
fn synthetic_history() -> Vec<Activity> {
    let base = Utc.with_ymd_and_hms(2025, 3, 15, 6, 30, 0).unwrap();
    let types = [
        (Category::Travel, "Car", 12.0),
        (Category::Food, "Vegan", 1.0),
        (Category::Shopping, "Second-hand", 2.0),
        (Category::Energy, "Electricity", 4.0),
    ];

    (0..365)
        .flat_map(|day| {
            types.iter().enumerate().map(move |(i, (category, ty, amount))| {
                let estimate = impact::compute_impact(*category, ty, *amount).unwrap();
                Activity {
                    id: format!("bench-{day}-{i}"),
                    user_id: "bench-user".to_string(),
                    category: *category,
                    activity_type: ty.to_string(),
                    amount: *amount,
                    co2_impact: estimate.co2_impact,
                    financial_impact: estimate.financial_impact,
                    created_at: base + Duration::days(day) + Duration::hours(i as i64),
                }
            })
        })
        .collect()
}

fn benchmark_impact_computation(c: &mut Criterion) {
    c.bench_function("compute_impact_static", |b| {
        b.iter(|| {
            impact::compute_impact(
                black_box(Category::Travel),
                black_box("Car"),
                black_box(12.5),
            )
        })
    });

    let signals = impact::SignalSnapshot::default();
    c.bench_function("compute_impact_enhanced", |b| {
        b.iter(|| {
            impact::compute_enhanced(
                black_box(Category::Energy),
                black_box("Electricity"),
                black_box(4.0),
                black_box(&signals),
            )
        })
    });
}

fn benchmark_derived_views(c: &mut Criterion) {
    let history = synthetic_history();
    let offset = chrono::FixedOffset::east_opt(330 * 60).unwrap();
    let today = chrono::NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();

    let mut group = c.benchmark_group("year_of_history");

    group.bench_function("user_stats", |b| {
        b.iter(|| UserStats::from_activities(black_box(&history), today, offset))
    });

    let timestamps: Vec<_> = history.iter().map(|a| a.created_at).collect();
    group.bench_function("streak", |b| {
        b.iter(|| streak::compute_streak(black_box(&timestamps), today, offset))
    });

    group.bench_function("analytics_report_365", |b| {
        b.iter(|| analytics::report(black_box(&history), 365, today, offset))
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_impact_computation,
    benchmark_derived_views
);
criterion_main!(benches);
