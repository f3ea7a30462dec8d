//! ECS scenario benchmarks using Criterion.
//!
//! These benchmarks measure whole ticks of realistic workloads:
//! - Particle system (high entity count, constant churn)

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rusty_ecs_bench::scenarios::{ParticleConfig, ParticleScenario, Scenario};

// =============================================================================
// Particle System Benchmarks
// =============================================================================

fn bench_particles(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenario/particles");

    for count in [1_000, 10_000, 50_000] {
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("tick", count), &count, |b, &n| {
            let mut scenario = ParticleScenario::with_config(ParticleConfig {
                particle_count: n,
                ..Default::default()
            });
            scenario.setup().expect("particle setup");

            b.iter(|| scenario.update().expect("particle tick"));
        });
    }

    group.finish();
}

criterion_group!(scenarios, bench_particles);
criterion_main!(scenarios);
