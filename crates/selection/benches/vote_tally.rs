//! Benchmarks for vote tallying
//!
//! Run with: cargo bench --package selection
//!
//! This benchmarks ranking a full vote pool under a crowd of voters.

use catalog::Movie;
use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use selection::{rank, tally, VoteRecord};

fn build_pool(size: u32) -> Vec<Movie> {
    (1..=size)
        .map(|id| Movie {
            id,
            title: format!("Movie {}", id),
            rating: 7.0,
            poster_path: None,
            overview: "A synopsis.".to_string(),
            runtime: Some(110),
        })
        .collect()
}

fn build_records(pool_size: u32, voters: u32) -> Vec<VoteRecord> {
    let now = Utc::now();
    let mut records = Vec::new();
    for voter in 0..voters {
        // Each voter backs roughly half the pool.
        for movie_id in 1..=pool_size {
            if (movie_id + voter) % 2 == 0 {
                records.push(VoteRecord {
                    movie_id,
                    voter: format!("voter-{}", voter),
                    cast_at: now,
                });
            }
        }
    }
    records
}

fn bench_tally(c: &mut Criterion) {
    let records = build_records(10, 50);

    c.bench_function("tally_10_movies_50_voters", |b| {
        b.iter(|| {
            let counts = tally(black_box(&records));
            black_box(counts)
        })
    });
}

fn bench_rank(c: &mut Criterion) {
    let pool = build_pool(10);
    let records = build_records(10, 50);

    c.bench_function("rank_10_movies_50_voters", |b| {
        b.iter(|| {
            let ranked = rank(black_box(&pool), black_box(&records));
            black_box(ranked)
        })
    });
}

criterion_group!(benches, bench_tally, bench_rank);
criterion_main!(benches);
