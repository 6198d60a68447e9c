use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use fastrand::Rng;
use swarmfit::{
    test_functions::{Rastrigin, Sphere},
    Swarm, SwarmConfig,
};

fn pso_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("pso");
    for n in [2, 5, 10, 20] {
        group.bench_with_input(BenchmarkId::new("Sphere", n), &n, |b, &ndim| {
            b.iter(|| {
                let config = SwarmConfig::new([ndim]).with_exit_error(1e-3);
                let mut swarm = Swarm::new(config, &Sphere, &(), &mut Rng::with_seed(0)).unwrap();
                swarm.optimise(500, &Sphere, &()).unwrap();
            });
        });
        group.bench_with_input(BenchmarkId::new("Rastrigin", n), &n, |b, &ndim| {
            b.iter(|| {
                let config = SwarmConfig::new([ndim])
                    .with_limits(-5.12, 5.12)
                    .with_exit_error(1e-2);
                let mut swarm =
                    Swarm::new(config, &Rastrigin, &(), &mut Rng::with_seed(0)).unwrap();
                swarm.optimise(500, &Rastrigin, &()).unwrap();
            });
        });
    }
    group.finish();
}

fn update_step_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("pso: update_step");
    for n_particles in [10, 50, 200] {
        group.bench_with_input(
            BenchmarkId::new("classifier(16, 8, 4)", n_particles),
            &n_particles,
            |b, &n_particles| {
                let config = SwarmConfig::classifier(16, 8, 4).with_n_particles(n_particles);
                let mut swarm = Swarm::new(config, &Sphere, &(), &mut Rng::with_seed(0)).unwrap();
                b.iter(|| swarm.update_step(&Sphere, &()).unwrap());
            },
        );
    }
    group.finish();
}

criterion_group!(benches, pso_benchmark, update_step_benchmark);
criterion_main!(benches);
