//! Cache benchmarks
//!
//! Benchmarks for cache operations including insert, get, TTL expiry
//! checks, key generation, and concurrent access patterns.
//!
//! Run with: `cargo bench --bench cache_bench -p caresync-common --features
//! runtime`

use std::sync::Arc;
use std::time::Duration;

use caresync_common::cache::{generate_key, ResourceCache, TtlCache};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde_json::json;

// ============================================================================
// Basic Operations Benchmarks
// ============================================================================

fn bench_cache_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("cache_insert");

    for size in [100, 1000, 10_000] {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("ttl", size), &size, |b, _| {
            let cache: TtlCache<u64, String> = TtlCache::new();
            let mut counter = 0u64;
            b.iter(|| {
                cache.insert(
                    black_box(counter),
                    black_box(format!("value_{}", counter)),
                    Duration::from_secs(300),
                );
                counter = counter.wrapping_add(1);
            });
        });
    }

    group.finish();
}

fn bench_cache_get_hit(c: &mut Criterion) {
    let mut group = c.benchmark_group("cache_get_hit");

    for size in [100, 1000, 10_000] {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("ttl", size), &size, |b, &size| {
            let cache: TtlCache<u64, String> = TtlCache::new();
            // Pre-populate cache
            for i in 0..size as u64 {
                cache.insert(i, format!("value_{}", i), Duration::from_secs(300));
            }
            let mut counter = 0u64;
            b.iter(|| {
                let key = counter % (size as u64);
                let _ = black_box(cache.get(&black_box(key)));
                counter = counter.wrapping_add(1);
            });
        });
    }

    group.finish();
}

fn bench_cache_get_miss(c: &mut Criterion) {
    let mut group = c.benchmark_group("cache_get_miss");

    for size in [100, 1000, 10_000] {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("ttl", size), &size, |b, &size| {
            let cache: TtlCache<u64, String> = TtlCache::new();
            // Pre-populate with keys 0..size
            for i in 0..size as u64 {
                cache.insert(i, format!("value_{}", i), Duration::from_secs(300));
            }
            let mut counter = 0u64;
            b.iter(|| {
                // Query keys that don't exist (size + counter)
                let key = (size as u64) + counter;
                let _ = black_box(cache.get(&black_box(key)));
                counter = counter.wrapping_add(1);
            });
        });
    }

    group.finish();
}

// ============================================================================
// Key Generation Benchmarks
// ============================================================================

fn bench_generate_key(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_key");

    group.throughput(Throughput::Elements(1));
    group.bench_function("empty_params", |b| {
        let params = json!({});
        b.iter(|| black_box(generate_key(black_box("appointments"), black_box(&params))));
    });

    group.bench_function("flat_params", |b| {
        let params = json!({ "status": "confirmed", "patient": 42, "professional": 7 });
        b.iter(|| black_box(generate_key(black_box("appointments"), black_box(&params))));
    });

    group.bench_function("nested_params", |b| {
        let params = json!({
            "status": "confirmed",
            "range": { "from": "2025-06-01", "to": "2025-06-30" },
        });
        b.iter(|| black_box(generate_key(black_box("appointments"), black_box(&params))));
    });

    group.finish();
}

// ============================================================================
// Resource Cache Scenario Benchmarks
// ============================================================================

fn bench_resource_cache_scenario(c: &mut Criterion) {
    let mut group = c.benchmark_group("resource_cache");

    // Simulates listing lookups with an 80% hit rate
    group.throughput(Throughput::Elements(1));
    group.bench_function("listing_lookup", |b| {
        let cache = ResourceCache::new();

        for i in 0..250 {
            let key = generate_key("appointments", &json!({ "patient": i }));
            cache.set(&key, json!([{ "id": i, "reason": "Consulta" }]), ResourceCache::DEFAULT_TTL);
        }

        let mut counter = 0u64;
        b.iter(|| {
            let is_hit = (counter % 10) < 8;
            let patient = if is_hit { counter % 250 } else { 500 + counter };
            let key = generate_key("appointments", &json!({ "patient": patient }));
            let _ = black_box(cache.get(&black_box(key)));
            counter = counter.wrapping_add(1);
        });
    });

    group.bench_function("prefix_invalidation", |b| {
        b.iter_with_setup(
            || {
                let cache = ResourceCache::new();
                for i in 0..100 {
                    let key = generate_key("appointments", &json!({ "patient": i }));
                    cache.set(&key, json!([]), ResourceCache::DEFAULT_TTL);
                }
                for i in 0..100 {
                    let key = generate_key("patients", &json!({ "page": i }));
                    cache.set(&key, json!([]), ResourceCache::DEFAULT_TTL);
                }
                cache
            },
            |cache| {
                let removed = cache.remove_by_prefix(black_box("appointments:"));
                black_box(removed);
            },
        );
    });

    group.finish();
}

// ============================================================================
// Concurrent Access Benchmarks
// ============================================================================

fn bench_cache_concurrent_reads(c: &mut Criterion) {
    let mut group = c.benchmark_group("cache_concurrent_reads");

    for thread_count in [2, 4, 8] {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(
            BenchmarkId::new("threads", thread_count),
            &thread_count,
            |b, &thread_count| {
                let cache = Arc::new(TtlCache::new());

                // Pre-populate
                for i in 0..1000u64 {
                    cache.insert(i, format!("value_{}", i), Duration::from_secs(300));
                }

                b.iter(|| {
                    let mut handles = vec![];
                    for _ in 0..thread_count {
                        let cache_clone = Arc::clone(&cache);
                        let handle = std::thread::spawn(move || {
                            for i in 0..100u64 {
                                let _ = black_box(cache_clone.get(&black_box(i)));
                            }
                        });
                        handles.push(handle);
                    }
                    for handle in handles {
                        handle.join().unwrap();
                    }
                });
            },
        );
    }

    group.finish();
}

// ============================================================================
// Benchmark Groups
// ============================================================================

criterion_group!(basic_operations, bench_cache_insert, bench_cache_get_hit, bench_cache_get_miss,);

criterion_group!(keys, bench_generate_key,);

criterion_group!(resource, bench_resource_cache_scenario,);

criterion_group!(concurrent, bench_cache_concurrent_reads,);

criterion_main!(basic_operations, keys, resource, concurrent,);
