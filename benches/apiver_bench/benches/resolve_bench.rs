//! Version resolution and route selection benchmarks

use apiver_core::{Version, VersionRegistry};
use apiver_router::VersionedRouter;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use http::{HeaderMap, HeaderValue, Method};
use std::sync::Arc;

/// One version per quarter starting in 2015
fn quarterly_registry(count: usize) -> VersionRegistry {
    let registry = VersionRegistry::new();
    for i in 0..count {
        let year = 2015 + (i / 4) as i32;
        let month = 1 + (i % 4) as u32 * 3;
        if let Ok(version) = Version::new(year, month, 1) {
            registry.register(version, i + 1 == count);
        }
    }
    registry
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");

    for count in [4, 16, 48].iter() {
        let registry = quarterly_registry(*count);
        group.bench_with_input(BenchmarkId::new("dated", count), count, |b, _| {
            b.iter(|| registry.resolve(black_box("2019-05-17")))
        });
        group.bench_with_input(BenchmarkId::new("unparsable", count), count, |b, _| {
            b.iter(|| registry.resolve(black_box("latest")))
        });
    }

    group.finish();
}

fn bench_select(c: &mut Criterion) {
    let registry = Arc::new(quarterly_registry(16));
    let dates: Vec<String> = registry
        .all_versions()
        .iter()
        .map(Version::canonical)
        .collect();

    let mut router = VersionedRouter::new(registry);
    for (i, date) in dates.iter().enumerate() {
        router = router.route(Method::GET, "/users/{id}", [date.as_str()], i);
    }

    let mut headers = HeaderMap::new();
    headers.insert("Api-Version", HeaderValue::from_static("2017-08-01"));

    c.bench_function("select/16_candidates", |b| {
        b.iter(|| {
            router
                .select(black_box(&Method::GET), black_box("/users/42"), &headers)
                .map(|matched| *matched.handler)
        })
    });

    c.bench_function("select/default_version", |b| {
        let empty = HeaderMap::new();
        b.iter(|| {
            router
                .select(black_box(&Method::GET), black_box("/users/42"), &empty)
                .map(|matched| *matched.handler)
        })
    });
}

criterion_group!(benches, bench_resolve, bench_select);
criterion_main!(benches);
