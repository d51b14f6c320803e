use criterion::BenchmarkId;
use criterion::Criterion;
use criterion::criterion_group;
use criterion::criterion_main;
use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;

use gridpath::frontier::FrontierKind;
use gridpath::grid::Coord;
use gridpath::problem::GridProblem;
use gridpath::run::Algorithm;
use gridpath::run::SearchConfig;

const WALL_PROBABILITY: f64 = 0.25;

fn boards() -> Vec<(String, GridProblem)> {
    let mut boards = vec![];
    let sizes = [
        GridProblem::default(),
        GridProblem::new_initial(100, 100, Coord::new(0, 0), Coord::new(99, 99)).unwrap(),
    ];
    for base in sizes {
        let (rows, cols) = base.grid().dimensions();
        for i in 0..3 {
            let mut rng = ChaCha8Rng::seed_from_u64(i);
            boards.push((
                format!("{rows}x{cols}:{i}"),
                base.randomize(&mut rng, WALL_PROBABILITY),
            ));
        }
    }
    boards
}

fn compare_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("Grid Search");

    for (instance_name, problem) in boards() {
        for algorithm in Algorithm::ALL {
            for frontier in [FrontierKind::Heap, FrontierKind::Sorted] {
                let config = SearchConfig { frontier };
                group.bench_with_input(
                    BenchmarkId::new(format!("{algorithm} ({frontier})"), &instance_name),
                    &problem,
                    |b, p| b.iter(|| algorithm.search(p, &config).unwrap().visited().len()),
                );
            }
        }
    }
    group.finish();
}

criterion_group!(benches, compare_search);
criterion_main!(benches);
