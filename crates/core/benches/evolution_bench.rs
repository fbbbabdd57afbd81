//! Benchmarks for the GA engine.
//!
//! Measures crossover throughput and full evolution runs at various scales.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tsp_ga_core::{Crossover, DistanceMatrix, EvolutionConfig, EvolutionRunner, GeoPoint, Tour};

fn grid_points(n: usize) -> Vec<GeoPoint> {
    (0..n)
        .map(|i| {
            let lat = -50.0 + (i as f64 * 7.3) % 100.0;
            let lon = -120.0 + (i as f64 * 13.7) % 90.0;
            GeoPoint::from_degrees(lat, lon).unwrap()
        })
        .collect()
}

fn bench_crossover(c: &mut Criterion) {
    let mut group = c.benchmark_group("crossover");
    let mut rng = StdRng::seed_from_u64(42);

    for &n in &[35, 200] {
        let p1 = Tour::random(n, &mut rng);
        let p2 = Tour::random(n, &mut rng);
        for op in Crossover::ALL {
            group.bench_with_input(BenchmarkId::new(op.name(), n), &(&p1, &p2), |b, (p1, p2)| {
                let mut rng = StdRng::seed_from_u64(7);
                b.iter(|| black_box(op.apply(black_box(p1), black_box(p2), &mut rng)))
            });
        }
    }
    group.finish();
}

fn bench_evolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("evolution");
    group.sample_size(10);

    for &n in &[35, 100] {
        let distances = DistanceMatrix::from_points(&grid_points(n)).unwrap();
        for parallel in [false, true] {
            let config = EvolutionConfig::new()
                .with_population_size(100)
                .with_generations_count(50)
                .with_seed(1)
                .with_parallel_evaluation(parallel);
            let label = if parallel { "parallel" } else { "serial" };

            group.bench_with_input(BenchmarkId::new(label, n), &config, |b, config| {
                b.iter(|| {
                    let runner = EvolutionRunner::new(config.clone(), &distances).unwrap();
                    black_box(runner.run())
                })
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_crossover, bench_evolution);
criterion_main!(benches);
