use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::sync::atomic::{AtomicU64, Ordering};
use veldra_core::sync::{DeferredCache, SpinLock};

fn bench_deferred_cache(c: &mut Criterion) {
    let mut group = c.benchmark_group("DeferredCache");

    let cache = DeferredCache::new();
    let value = AtomicU64::new(0);
    cache.ensure(|| value.store(1, Ordering::Relaxed));

    // The read-many path: validity already published, no lock taken.
    group.bench_function("ensure (fast path)", |b| {
        b.iter(|| {
            cache.ensure(|| value.store(2, Ordering::Relaxed));
            black_box(value.load(Ordering::Relaxed));
        });
    });

    group.bench_function("is_cached", |b| {
        b.iter(|| black_box(cache.is_cached()));
    });

    group.bench_function("tag_dirty + ensure (cold path)", |b| {
        b.iter(|| {
            cache.tag_dirty();
            cache.ensure(|| value.fetch_add(1, Ordering::Relaxed));
            black_box(value.load(Ordering::Relaxed));
        });
    });

    group.finish();
}

fn bench_spin_lock(c: &mut Criterion) {
    let mut group = c.benchmark_group("SpinLock");

    let lock = SpinLock::new(0u64);
    group.bench_function("uncontended lock/unlock", |b| {
        b.iter(|| {
            let mut guard = lock.lock();
            *guard += 1;
            black_box(*guard);
        });
    });

    let mutex = std::sync::Mutex::new(0u64);
    group.bench_function("std::sync::Mutex baseline", |b| {
        b.iter(|| {
            let mut guard = mutex.lock().unwrap();
            *guard += 1;
            black_box(*guard);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_deferred_cache, bench_spin_lock);
criterion_main!(benches);
