use chrono::NaiveDate;
use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use overlap_engine::{compute_team_overlap, OverlapOptions, ReferenceWeek, UserAvailability};

const ZONES: &[&str] = &[
    "America/Los_Angeles",
    "America/New_York",
    "Europe/London",
    "Europe/Berlin",
    "Asia/Kolkata",
    "Asia/Tokyo",
    "Australia/Sydney",
];

fn team(size: usize) -> Vec<UserAvailability> {
    (0..size)
        .map(|i| {
            let start = 7 + (i % 5) as i32;
            UserAvailability::new(
                format!("user-{i}"),
                ZONES[i % ZONES.len()],
                start,
                (start + 8) % 24,
                vec![1, 2, 3, 4, 5],
            )
        })
        .collect()
}

fn bench_compute_team_overlap(c: &mut Criterion) {
    let date = NaiveDate::from_ymd_opt(2026, 1, 14).unwrap();
    let week = ReferenceWeek::containing(date).unwrap();
    let options = OverlapOptions::new(week);
    let mut group = c.benchmark_group("compute_team_overlap");

    for size in [2usize, 10, 50, 200] {
        let users = team(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &users, |b, users| {
            b.iter(|| compute_team_overlap(black_box(users), black_box(&options)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_compute_team_overlap);
criterion_main!(benches);
