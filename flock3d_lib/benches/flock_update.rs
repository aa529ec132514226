use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use flock3d_lib::{
    flock::Flock,
    options::{RunOptions, UpdateMode},
};

fn run_options(prey_count: usize, update_mode: UpdateMode) -> RunOptions {
    RunOptions {
        prey_count,
        predator_count: 3,
        seed: Some(17),
        update_mode,
        ..Default::default()
    }
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("flock update");

    for prey_count in [100, 400, 1000] {
        for mode in [UpdateMode::Simultaneous, UpdateMode::Sequential] {
            let ro = run_options(prey_count, mode);
            let mut flock = Flock::new(&ro);

            group.bench_with_input(
                BenchmarkId::new(format!("{:?}", mode), prey_count),
                &ro,
                |b, ro| b.iter(|| flock.update(black_box(ro), None)),
            );
        }
    }

    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
