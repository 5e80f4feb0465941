//! Benchmarks for the particle effect engine.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use aspirin_synthesis::{
    compute::{EffectKind, ParticleSystem},
    schema::CanvasConfig,
};

fn bench_particle_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("particle_step");

    for count in [150, 300, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter_batched(
                || {
                    let mut ps = ParticleSystem::new(CanvasConfig::default(), Some(42));
                    ps.emit(EffectKind::Crystal, count);
                    ps
                },
                |mut ps| {
                    black_box(ps.step());
                    ps
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_emit(c: &mut Criterion) {
    let mut group = c.benchmark_group("emit");

    for kind in [EffectKind::Heat, EffectKind::Filter, EffectKind::Crystal] {
        group.bench_function(format!("{kind:?}"), |b| {
            let mut ps = ParticleSystem::new(CanvasConfig::default(), Some(42));
            b.iter(|| {
                ps.emit(black_box(kind), 300);
                ps.clear();
            });
        });
    }

    group.finish();
}

fn bench_drain(c: &mut Criterion) {
    c.bench_function("drain_heat_200", |b| {
        b.iter_batched(
            || {
                let mut ps = ParticleSystem::new(CanvasConfig::default(), Some(7));
                ps.emit(EffectKind::Heat, 200);
                ps
            },
            |mut ps| while ps.step() {},
            criterion::BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_particle_step, bench_emit, bench_drain);
criterion_main!(benches);
