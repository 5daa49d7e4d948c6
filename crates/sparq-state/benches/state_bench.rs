//! Benchmarks for sparse state-map gate application
//!
//! Run with: cargo bench -p sparq-state

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sparq_state::StateMap;
use std::f64::consts::PI;

/// Uniform superposition over `n` qubits.
fn superposition(n: usize) -> StateMap {
    let mut state = StateMap::new();
    for q in 0..n {
        state.h(q, &[]);
    }
    state
}

/// Benchmark re-keying gates on growing superpositions
fn bench_rekeying_gates(c: &mut Criterion) {
    let mut group = c.benchmark_group("rekeying_gates");

    for n in &[4, 8, 12] {
        let state = superposition(*n);
        group.bench_with_input(BenchmarkId::new("h", n), &state, |b, state| {
            b.iter(|| {
                let mut s = state.clone();
                s.h(black_box(0), &[]);
                s
            });
        });
        group.bench_with_input(BenchmarkId::new("cnot", n), &state, |b, state| {
            b.iter(|| {
                let mut s = state.clone();
                s.cnot(black_box(0), black_box(1), &[]);
                s
            });
        });
    }

    group.finish();
}

/// Benchmark in-place phase gates
fn bench_phase_gates(c: &mut Criterion) {
    let mut group = c.benchmark_group("phase_gates");

    let state = superposition(10);
    group.bench_function("rz", |b| {
        let mut s = state.clone();
        b.iter(|| s.rz(black_box(PI / 8.0), 3, &[]));
    });
    group.bench_function("controlled_t", |b| {
        let mut s = state.clone();
        b.iter(|| s.t(black_box(3), &[0, 1]));
    });

    group.finish();
}

/// Benchmark tensor products of independent partitions
fn bench_tensor(c: &mut Criterion) {
    let mut left = superposition(6);
    left.swap(0, 40);
    let mut right = StateMap::new();
    for q in 6..12 {
        right.h(q, &[]);
    }

    c.bench_function("tensor_64x64", |b| {
        b.iter(|| black_box(&left).tensor(black_box(&right)));
    });
}

criterion_group!(benches, bench_rekeying_gates, bench_phase_gates, bench_tensor);
criterion_main!(benches);
