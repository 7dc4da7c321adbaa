//! Benchmarks for the hash-chained LRU glyph cache.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use glam::IVec2;
use immediate_ui::text::GlyphCache;

fn upload_all(cache: &mut GlyphCache) {
    for pending in cache.drain_pending_uploads() {
        cache.mark_uploaded(pending.glyph_id, IVec2::ZERO, IVec2::new(8, 8));
    }
}

fn bench_cold_fill(c: &mut Criterion) {
    let mut group = c.benchmark_group("glyph_cache_cold_fill");
    for capacity in [64u32, 256, 1024] {
        group.throughput(Throughput::Elements(capacity as u64));
        group.bench_with_input(BenchmarkId::from_parameter(capacity), &capacity, |b, &capacity| {
            b.iter(|| {
                let mut cache = GlyphCache::new(capacity, 32);
                for glyph in 0..capacity {
                    black_box(cache.get_or_create(glyph));
                }
            });
        });
    }
    group.finish();
}

fn bench_steady_state_requests(c: &mut Criterion) {
    let mut group = c.benchmark_group("glyph_cache_steady_state");

    group.bench_function("all_resident_repeat", |b| {
        let mut cache = GlyphCache::new(256, 32);
        for glyph in 0..256 {
            cache.get_or_create(glyph);
        }
        upload_all(&mut cache);
        b.iter(|| {
            cache.begin_frame();
            for glyph in 0..256 {
                black_box(cache.request(glyph));
            }
        });
    });

    group.bench_function("thrashing_over_capacity", |b| {
        b.iter(|| {
            let mut cache = GlyphCache::new(64, 32);
            for round in 0..4 {
                cache.begin_frame();
                for glyph in round * 80..round * 80 + 80 {
                    black_box(cache.get_or_create(glyph));
                }
                upload_all(&mut cache);
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_cold_fill, bench_steady_state_requests);
criterion_main!(benches);
