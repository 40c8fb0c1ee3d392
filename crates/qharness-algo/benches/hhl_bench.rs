//! Benchmarks for the HHL engine
//!
//! Run with: cargo bench -p qharness-algo

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;

use qharness_adapter_sim::StatevectorBackend;
use qharness_algo::linalg::real_vector;
use qharness_algo::random_matrix::random_hermitian;
use qharness_algo::{EigsOptions, EigsQpe, Hhl, ReciprocalOptions, SpectrumSpec};
use qharness_hal::RunConfig;

/// Benchmark building the evolution unitary
fn bench_eigs_setup(c: &mut Criterion) {
    let mut group = c.benchmark_group("eigs_setup");
    let mut rng = StdRng::seed_from_u64(1);
    let spec = SpectrumSpec::new(0.1, 1.0);

    for dim in &[2usize, 4, 8] {
        let a = random_hermitian(*dim, spec, &mut rng).unwrap();
        group.bench_with_input(BenchmarkId::new("suzuki2", dim), &a, |b, a| {
            b.iter(|| EigsQpe::new(black_box(a), EigsOptions::default()).unwrap());
        });
    }

    group.finish();
}

/// Benchmark a full deterministic solve by clock size
fn bench_hhl_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("hhl_solve");
    let mut rng = StdRng::seed_from_u64(2);
    let a = random_hermitian(2, SpectrumSpec::new(0.1, 1.0), &mut rng).unwrap();
    let b = real_vector(&[1.0, 1.0]);
    let backend = StatevectorBackend::new();

    for clock in &[3u32, 5, 7] {
        let hhl = Hhl::new(
            &a,
            &b,
            EigsOptions::default().with_num_ancillae(*clock),
            ReciprocalOptions::default(),
        )
        .unwrap();
        group.bench_with_input(BenchmarkId::new("clock", clock), &hhl, |bench, hhl| {
            bench.iter(|| hhl.run(&backend, &RunConfig::new(1)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_eigs_setup, bench_hhl_solve);
criterion_main!(benches);
