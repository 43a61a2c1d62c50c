use criterion::{black_box, criterion_group, criterion_main, Criterion};
use drive_mdp::mdp::{converge_policy, rollout, solve, Action, DrivingMdp, SolverConfig};

fn bench_rollout(c: &mut Criterion) {
    let mdp = DrivingMdp::default();
    let mut group = c.benchmark_group("rollout");
    for &horizon in &[59, 1_000] {
        group.bench_function(format!("horizon_{}", horizon), |b| {
            b.iter(|| rollout(black_box(&mdp), black_box([0.0; 3]), horizon))
        });
    }
    group.finish();
}

fn bench_convergence(c: &mut Criterion) {
    let mdp = DrivingMdp::undiscounted();
    c.bench_function("converge_policy", |b| {
        b.iter(|| converge_policy(black_box(&mdp), [0.0; 3], [Action::DontDrive; 3], 1000))
    });
}

fn bench_solve(c: &mut Criterion) {
    let mdp = DrivingMdp::default();
    let config = SolverConfig::default();
    c.bench_function("solve_to_tolerance", |b| {
        b.iter(|| solve(black_box(&mdp), black_box(&config)))
    });
}

criterion_group!(benches, bench_rollout, bench_convergence, bench_solve);
criterion_main!(benches);
