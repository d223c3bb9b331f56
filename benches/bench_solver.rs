use criterion::{criterion_group, criterion_main, Criterion};

use twophase::cubie::CubieCube;
use twophase::moves::Move::*;
use twophase::solver::solve;

fn cc_apply_moves() {
    let cc = CubieCube::default();
    let _ = cc.apply_moves(&[R, U, R3, U3]);
}

fn cc_multiply() {
    let mut cc = CubieCube::default();
    let other = CubieCube::from(&vec![R, U, R3, U3]);
    cc.multiply(other);
}

fn bench_moves(c: &mut Criterion) {
    let mut group = c.benchmark_group("CubieCube Moves");
    group.bench_function("apply_moves", |b| b.iter(cc_apply_moves));
    group.bench_function("multiply", |b| b.iter(cc_multiply));
    group.finish();
}

fn bench_solver(c: &mut Criterion) {
    c.bench_function("Solver", |b| {
        b.iter(|| {
            solve(
                "RLLBUFUUUBDURRBBUBRLRRFDFDDLLLUDFLRRDDFRLFDBUBFFLBBDUF",
                20,
                3.0,
            )
            .unwrap()
        })
    });
}

criterion_group!(benches, bench_solver, bench_moves);
criterion_main!(benches);
