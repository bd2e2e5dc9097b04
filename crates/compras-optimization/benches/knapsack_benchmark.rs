use compras_optimization::{KnapsackConfig, KnapsackItem, ScaledKnapsackSolver};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Benchmark the full scaled DP at increasing pool sizes
fn bench_scaled_knapsack(c: &mut Criterion) {
    let mut group = c.benchmark_group("scaled_knapsack");
    let solver = ScaledKnapsackSolver::new(KnapsackConfig::default());

    for size in [100, 600, 2_000].iter() {
        let mut rng = StdRng::seed_from_u64(1);
        let items: Vec<KnapsackItem> = (0..*size)
            .map(|_| KnapsackItem::new(rng.gen_range(10.0..20_000.0), rng.gen_range(1..50)))
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let solution = solver.solve(&items, 100_000.0).unwrap();
                criterion::black_box(solution.total_value);
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_scaled_knapsack);
criterion_main!(benches);
