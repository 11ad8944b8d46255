//! Benchmarks for neighbor search and candidate ranking
//!
//! Run with: cargo bench --package model
//!
//! Uses a synthetic interaction set sized like a mid-size deployment
//! (2000 users, 500 restaurants) so the benchmark needs no data files.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use model::{ModelBundle, NeighborModel, Recommender};
use pipeline::{build_matrix, Interaction};

fn synthetic_interactions(users: usize, restaurants: usize) -> Vec<Interaction> {
    let mut interactions = Vec::new();
    for user in 0..users {
        // Each user touches a deterministic handful of restaurants
        for offset in 0..8 {
            let restaurant = (user * 7 + offset * 13) % restaurants;
            interactions.push(Interaction {
                user_id: format!("user-{user}"),
                restaurant_id: format!("restaurant-{restaurant}"),
                score: ((user + offset) % 5) as f32 + 1.0,
            });
        }
    }
    interactions
}

fn bench_neighbor_search(c: &mut Criterion) {
    let interactions = synthetic_interactions(2000, 500);
    let pivoted = build_matrix(&interactions).expect("Failed to build matrix");
    let model = NeighborModel::fit(&pivoted.matrix);
    let query = pivoted.matrix.row(0).to_vec();

    c.bench_function("neighbor_search_k6", |b| {
        b.iter(|| {
            let neighbors = model.search(black_box(&pivoted.matrix), black_box(&query), 6);
            black_box(neighbors)
        })
    });
}

fn bench_recommend_similar(c: &mut Criterion) {
    let interactions = synthetic_interactions(2000, 500);
    let bundle = ModelBundle::fit(&interactions).expect("Failed to fit bundle");
    let recommender = Recommender::new(bundle).expect("Failed to build recommender");

    c.bench_function("recommend_similar_k5", |b| {
        b.iter(|| {
            let recs = recommender
                .recommend_similar(black_box("user-0"), black_box(5))
                .unwrap();
            black_box(recs)
        })
    });
}

fn bench_fit_neighbor_model(c: &mut Criterion) {
    let interactions = synthetic_interactions(2000, 500);
    let pivoted = build_matrix(&interactions).expect("Failed to build matrix");

    c.bench_function("fit_neighbor_model", |b| {
        b.iter(|| {
            let model = NeighborModel::fit(black_box(&pivoted.matrix));
            black_box(model)
        })
    });
}

criterion_group!(
    benches,
    bench_neighbor_search,
    bench_recommend_similar,
    bench_fit_neighbor_model
);
criterion_main!(benches);
