//! Benchmarks for the coordinator loop.

use criterion::{criterion_group, criterion_main, Criterion};
use std::collections::HashMap;
use std::sync::Arc;
use taskflow::pipeline::PipelineCoordinator;
use taskflow::stages::NoOpBody;

fn coordinator_benchmark(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let coordinator = PipelineCoordinator::builder("bench")
        .stage("first", Arc::new(NoOpBody))
        .unwrap()
        .stage("second", Arc::new(NoOpBody))
        .unwrap()
        .stage("third", Arc::new(NoOpBody))
        .unwrap()
        .build()
        .unwrap();

    c.bench_function("run_all_three_noop_stages", |b| {
        b.iter(|| runtime.block_on(coordinator.run_all(HashMap::new())));
    });
}

criterion_group!(benches, coordinator_benchmark);
criterion_main!(benches);
