//! Benchmarks for pattern compilation and relaxation.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use amigurumi::prelude::*;

/// A ball grown to `max` stitches per round, then closed again.
fn ball(max: usize) -> PatternDef {
    let mut def = PatternDef::with_loop().round(expand(Operation::MagicRing, 6));

    let mut width = 6;
    while width < max {
        let mut round = Vec::with_capacity(width + 6);
        for i in 0..width {
            round.push(Operation::SingleCrochet);
            if (i + 1) % (width / 6) == 0 {
                round.push(Operation::Increase);
            }
        }
        width = round.len();
        def.add_round(round);
    }

    for _ in 0..3 {
        def.add_round(vec![Operation::SingleCrochet; width]);
    }

    while width > 6 {
        let mut round = Vec::new();
        let step = width / 6;
        for _ in 0..6 {
            round.extend(std::iter::repeat(Operation::SingleCrochet).take(step - 2));
            round.push(Operation::Decrease);
        }
        width -= 6;
        def.add_round(round);
    }
    def.add_round(vec![Operation::FinishOff]);
    def
}

fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");
    for max in [24, 48, 96] {
        let def = ball(max);
        group.bench_with_input(BenchmarkId::from_parameter(max), &def, |b, def| {
            b.iter(|| PatternGraph::from_pattern(def).unwrap())
        });
    }
    group.finish();
}

fn bench_relax(c: &mut Criterion) {
    let mut group = c.benchmark_group("relax_100_ticks");
    group.sample_size(20);
    for max in [24, 48] {
        let graph = PatternGraph::from_pattern(&ball(max)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(max), &graph, |b, graph| {
            b.iter(|| {
                let mut solver = MeshSolver::new(graph, &[], SolverOptions::default()).unwrap();
                solver.run(100, 1.0 / 60.0);
                solver
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_compile, bench_relax);
criterion_main!(benches);
