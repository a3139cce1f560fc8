use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use idtrack::{AssignmentSolver, SolverMode};
use ndarray::Array2;
use rand::prelude::*;
use std::hint::black_box;

fn generate_random_cost_matrix(rows: usize, cols: usize) -> Array2<f64> {
    let mut rng = StdRng::seed_from_u64(7);
    Array2::from_shape_fn((rows, cols), |_| rng.gen_range(0.0..100.0))
}

fn bench_solvers(c: &mut Criterion) {
    let mut group = c.benchmark_group("assignment");

    for &size in &[10, 50, 100] {
        let cost_matrix = generate_random_cost_matrix(size, size);

        group.bench_with_input(BenchmarkId::new("exact", size), &cost_matrix, |b, m| {
            b.iter(|| AssignmentSolver::solve(black_box(m.view()), SolverMode::Exact).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("greedy", size), &cost_matrix, |b, m| {
            b.iter(|| AssignmentSolver::solve(black_box(m.view()), SolverMode::Greedy).unwrap())
        });
    }
    group.finish();
}

fn bench_rectangular(c: &mut Criterion) {
    // More previous-frame rows than current columns: cache replays pile up
    let cost_matrix = generate_random_cost_matrix(60, 20);

    c.bench_function("exact_60x20", |b| {
        b.iter(|| {
            AssignmentSolver::solve(black_box(cost_matrix.view()), SolverMode::Exact).unwrap()
        })
    });
}

criterion_group!(benches, bench_solvers, bench_rectangular);
criterion_main!(benches);
