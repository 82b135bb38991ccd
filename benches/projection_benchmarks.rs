//! Projection Benchmarks
//!
//! The dominant cost of a projection is the 1000 x 30 stochastic path
//! simulation; these benchmarks track it serially, on the work-stealing
//! pool, and as part of the full pipeline.
//!
//! Run with: cargo bench

use climecon::domains::monte_carlo::StochasticPathSimulator;
use climecon::domains::risk::RiskAggregator;
use climecon::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn bench_path_simulation(c: &mut Criterion) {
    let mut group = c.benchmark_group("PathSimulation");
    group.sample_size(50);
    group.confidence_level(0.95);

    for workers in [1usize, 2, 4, 8].iter() {
        group.bench_with_input(
            BenchmarkId::new("1000x30", workers),
            workers,
            |b, &workers| {
                let simulator = StochasticPathSimulator::new(30).with_workers(workers);
                let mut rng = SimRng::new(42);
                b.iter(|| {
                    let paths = simulator.simulate(1000, 15.9, 0.1, &mut rng).unwrap();
                    black_box(paths.len())
                });
            },
        );
    }

    group.finish();
}

fn bench_risk_aggregation(c: &mut Criterion) {
    let paths = StochasticPathSimulator::new(30)
        .simulate(1000, 15.9, 0.1, &mut SimRng::new(42))
        .unwrap();

    c.bench_function("risk_aggregate_1000", |b| {
        b.iter(|| black_box(RiskAggregator.aggregate(black_box(&paths)).unwrap()));
    });
}

fn bench_full_pipeline(c: &mut Criterion) {
    let pipeline = ProjectionPipeline::default();
    let history = HistoricalData::default();
    let mut rng = SimRng::new(42);

    c.bench_function("projection_pipeline", |b| {
        b.iter(|| black_box(pipeline.project_with(&history, &mut rng).unwrap()));
    });
}

criterion_group!(
    benches,
    bench_path_simulation,
    bench_risk_aggregation,
    bench_full_pipeline
);
criterion_main!(benches);
