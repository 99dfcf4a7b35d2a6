//! Benchmarks for catalog indexing and per-query recommendation
//!
//! Run with: cargo bench --package pipeline
//!
//! Uses a synthetic catalog so the benchmark runs without dataset files.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use data_loader::{build_indices, Catalog, CategoryOf, RatingsTable};
use pipeline::{CandidateRanker, DEFAULT_RECOMMENDATION_LIMIT};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sources::resolve_preferences;
use std::sync::Arc;

const USERS: usize = 5_000;
const PRODUCTS: usize = 2_000;
const CATEGORIES: usize = 25;

fn synthetic_tables() -> (RatingsTable, CategoryOf) {
    let mut rng = StdRng::seed_from_u64(1);

    let category_of: CategoryOf = (0..PRODUCTS)
        .map(|p| (format!("p{p}"), format!("c{}", rng.random_range(0..CATEGORIES))))
        .collect();

    let ratings: RatingsTable = (0..USERS)
        .map(|u| {
            let purchases = (0..rng.random_range(1..40))
                .map(|_| (format!("p{}", rng.random_range(0..PRODUCTS)), 4.0))
                .collect();
            (format!("u{u}"), purchases)
        })
        .collect();

    (ratings, category_of)
}

fn bench_build_indices(c: &mut Criterion) {
    let (ratings, category_of) = synthetic_tables();

    c.bench_function("build_indices", |b| {
        b.iter(|| {
            let indices = build_indices(black_box(&ratings), black_box(&category_of));
            black_box(indices)
        })
    });
}

fn bench_recommend(c: &mut Criterion) {
    let (ratings, category_of) = synthetic_tables();
    let catalog = Arc::new(Catalog::build(ratings, category_of));
    let ranker = CandidateRanker::new(catalog.clone(), DEFAULT_RECOMMENDATION_LIMIT);
    let owned = catalog.get_user_ratings("u1").expect("synthetic user exists");

    c.bench_function("resolve_and_rank", |b| {
        b.iter(|| {
            let preferred = resolve_preferences(black_box(owned), catalog.category_mapping());
            let recommendations = ranker.recommend(owned, &preferred);
            black_box(recommendations)
        })
    });
}

criterion_group!(benches, bench_build_indices, bench_recommend);
criterion_main!(benches);
