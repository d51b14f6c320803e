use std::marker::PhantomData;

use num_traits::Zero;

use crate::cost::Cost;
use crate::cost::GridCost;
use crate::cost::STEP_COST;
use crate::frontier::Frontier;
use crate::frontier::HeapFrontier;
use crate::frontier::SortedFrontier;
use crate::grid::Coord;
use crate::grid::GridError;
use crate::problem::GridProblem;
use crate::problem::Heuristic;
use crate::problem::ManhattanDistance;
use crate::search::SearchOutcome;
use crate::search::SearchState;

/// Heuristic search.
///
/// Finalises cells by increasing `f = g + h`. Equal `f` values go to the lower
/// row-major position, same as [`DijkstraSearch`](super::dijkstra::DijkstraSearch).
/// Iterating yields the visited cells in order.
#[derive(Debug)]
pub struct AStarSearch<'p, H = ManhattanDistance, F = HeapFrontier<GridCost>>
where
    H: Heuristic,
    F: Frontier<GridCost>,
{
    problem: &'p GridProblem,
    /// Scores, parents and the closed set.
    state: SearchState,
    /// Cells not finalised yet, by `f`.
    open: F,
    visited: Vec<Coord>,
    done: bool,

    _phantom_heuristic: PhantomData<H>,
}

impl<'p, H, F> AStarSearch<'p, H, F>
where
    H: Heuristic,
    F: Frontier<GridCost>,
{
    pub fn new(problem: &'p GridProblem) -> Result<Self, GridError> {
        problem.validate().inspect_err(|e| log::warn!("Refusing to search: {e}"))?;

        let grid = problem.grid();
        let start = problem.start();
        let mut state = SearchState::new(grid);
        let mut open = F::with_grid(grid);

        let s = &mut state[start];
        s.g = GridCost::zero();
        s.h = H::h(&start, &problem.finish());
        s.f = s.g.saturating_add(s.h);
        s.distance = s.g;
        open.update(grid.order(&start), start, s.f);

        Ok(Self {
            problem,
            state,
            open,
            visited: Vec::with_capacity(grid.len()),
            done: false,
            _phantom_heuristic: PhantomData,
        })
    }

    /// The heuristic of `c`, computed on first use.
    #[inline(always)]
    fn h(&mut self, c: Coord) -> GridCost {
        let finish = self.problem.finish();
        let s = &mut self.state[c];
        if !s.h.valid() {
            s.h = H::h(&c, &finish);
        }
        s.h
    }

    /// Finalises the next cell.
    ///
    /// Returns `None` once the finish has been visited or nothing reachable
    /// is left.
    #[must_use]
    pub fn expand_next(&mut self) -> Option<Coord> {
        if self.done {
            return None;
        }
        let problem = self.problem;
        let grid = problem.grid();

        while let Some((f, current)) = self.open.pop_min() {
            if grid.is_wall(&current) {
                continue;
            }
            if !f.valid() {
                // Everything left is unreachable.
                break;
            }
            debug_assert_eq!(f, self.state[current].f);

            self.state[current].visited = true;
            self.visited.push(current);
            log::trace!("A* visits {current} at f={f}");

            if current == problem.finish() {
                self.done = true;
                return Some(current);
            }

            let g = self.state[current].g.saturating_add(STEP_COST);
            for neighbour in self.state.unvisited_neighbours(grid, &current) {
                if g < self.state[neighbour].g {
                    let h = self.h(neighbour);
                    let n = &mut self.state[neighbour];
                    n.reach(current, g);
                    n.g = g;
                    n.f = g.saturating_add(h);
                    self.open.update(grid.order(&neighbour), neighbour, n.f);
                }
            }
            return Some(current);
        }

        self.done = true;
        None
    }

    /// Runs the search to completion.
    #[must_use]
    pub fn run(mut self) -> SearchOutcome {
        while self.expand_next().is_some() {}
        self.into_outcome()
    }

    #[must_use]
    pub fn into_outcome(self) -> SearchOutcome {
        let outcome = SearchOutcome {
            start: self.problem.start(),
            finish: self.problem.finish(),
            visited: self.visited,
            state: self.state,
        };
        log::debug!(
            "A* visited {} cells, finish {}",
            outcome.visited().len(),
            if outcome.found() { "reached" } else { "unreachable" }
        );
        outcome
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }
}

impl<H, F> Iterator for AStarSearch<'_, H, F>
where
    H: Heuristic,
    F: Frontier<GridCost>,
{
    type Item = Coord;
    fn next(&mut self) -> Option<Self::Item> {
        self.expand_next()
    }
}

/// A* with the Manhattan distance over a binary heap.
pub fn astar(problem: &GridProblem) -> Result<SearchOutcome, GridError> {
    Ok(AStarSearch::<ManhattanDistance, HeapFrontier<GridCost>>::new(problem)?.run())
}

/// A* with the Manhattan distance, re-sorting the whole working set at every
/// step.
pub fn astar_sorted(problem: &GridProblem) -> Result<SearchOutcome, GridError> {
    Ok(AStarSearch::<ManhattanDistance, SortedFrontier<GridCost>>::new(problem)?.run())
}

#[cfg(test)]
mod tests {
    use super::*;

    use indoc::indoc;
    use rand_chacha::ChaCha8Rng;
    use rand_chacha::rand_core::SeedableRng;

    use crate::algorithms::dijkstra::dijkstra;
    use crate::algorithms::test_support::check_outcome;
    use crate::algorithms::test_support::coords;
    use crate::algorithms::test_support::path_len;

    /// No estimate at all, turning A* into Dijkstra.
    #[derive(Debug)]
    struct Blind;
    impl Heuristic for Blind {
        fn h(_s: &Coord, _goal: &Coord) -> GridCost {
            0
        }
    }

    #[test]
    fn open_5x5() {
        let problem =
            GridProblem::new_initial(5, 5, Coord::new(0, 0), Coord::new(4, 4)).unwrap();
        let outcome = astar(&problem).unwrap();
        check_outcome(&problem, &outcome);
        assert_eq!(outcome.distance(), Some(8));
        assert_eq!(path_len(&outcome), 9);
        // With no walls every cell on the way has f = 8, visited row by row
        assert_eq!(outcome.visited().len(), 25);
        assert_eq!(outcome.visited()[..5], coords(&[(0, 0), (0, 1), (0, 2), (0, 3), (0, 4)]));
    }

    #[test]
    fn goes_straight_when_it_can() {
        let problem = GridProblem::try_from(indoc! {"
            .....
            S...F
            .....
        "})
        .unwrap();
        let outcome = astar(&problem).unwrap();
        check_outcome(&problem, &outcome);
        assert_eq!(
            outcome.visited(),
            coords(&[(1, 0), (1, 1), (1, 2), (1, 3), (1, 4)])
        );
        assert_eq!(outcome.path(), outcome.visited());
    }

    #[test]
    fn scores_stay_consistent() {
        let problem = GridProblem::try_from(indoc! {"
            S.#..
            .##.#
            ....F
        "})
        .unwrap();
        let outcome = astar(&problem).unwrap();
        check_outcome(&problem, &outcome);
        assert_eq!(outcome.distance(), Some(6));

        let state = outcome.state();
        for c in outcome.visited() {
            let s = state[*c];
            assert_eq!(s.distance, s.g);
            assert_eq!(s.h, c.manhattan_distance(&problem.finish()));
            assert_eq!(s.f, s.g + s.h);
        }
    }

    #[test]
    fn adjacent_finish() {
        let problem = GridProblem::try_from("....\n..SF").unwrap();
        let outcome = astar(&problem).unwrap();
        check_outcome(&problem, &outcome);
        assert_eq!(outcome.visited(), coords(&[(1, 2), (1, 3)]));
        assert_eq!(outcome.path().len(), 2);
    }

    #[test]
    fn separated_by_a_wall() {
        let problem = GridProblem::try_from(indoc! {"
            S....
            #####
            ....F
        "})
        .unwrap();
        let outcome = astar(&problem).unwrap();
        check_outcome(&problem, &outcome);
        assert!(!outcome.found());
        assert_eq!(outcome.path(), vec![problem.finish()]);
        assert_eq!(outcome.visited().len(), 5);
    }

    #[test]
    fn agrees_with_dijkstra() {
        let base = GridProblem::default();
        for seed in 0..30 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let problem = base.randomize(&mut rng, 0.3);
            let a = astar(&problem).unwrap();
            let d = dijkstra(&problem).unwrap();
            check_outcome(&problem, &a);
            check_outcome(&problem, &d);
            assert_eq!(a.distance(), d.distance());
            assert_eq!(a.path().len(), d.path().len());
            assert!(a.visited().len() <= d.visited().len());
        }
    }

    #[test]
    fn blind_astar_is_dijkstra() {
        let base = GridProblem::new_initial(10, 10, Coord::new(2, 3), Coord::new(8, 7)).unwrap();
        for seed in 0..10 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let problem = base.randomize(&mut rng, 0.2);
            let blind = AStarSearch::<Blind, HeapFrontier<GridCost>>::new(&problem)
                .unwrap()
                .run();
            let d = dijkstra(&problem).unwrap();
            assert_eq!(blind.visited(), d.visited());
            assert_eq!(blind.path(), d.path());
        }
    }

    #[test]
    fn frontiers_agree() {
        let base = GridProblem::new_initial(12, 15, Coord::new(6, 0), Coord::new(3, 14)).unwrap();
        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let problem = base.randomize(&mut rng, 0.3);
            let heap = astar(&problem).unwrap();
            let sorted = astar_sorted(&problem).unwrap();
            check_outcome(&problem, &sorted);
            assert_eq!(heap.visited(), sorted.visited());
            assert_eq!(heap.path(), sorted.path());
        }
    }

    #[test]
    fn repeated_runs_match() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let problem = GridProblem::default().randomize(&mut rng, 0.25);
        let first = astar(&problem).unwrap();
        let second = astar(&problem).unwrap();
        assert_eq!(first.visited(), second.visited());
        assert_eq!(first.path(), second.path());
        assert_eq!(first.distance(), second.distance());
    }

    #[test]
    fn iterating_yields_visited_order() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let problem = GridProblem::default().randomize(&mut rng, 0.2);
        let mut search = AStarSearch::<ManhattanDistance, HeapFrontier<GridCost>>::new(&problem).unwrap();
        let first: Vec<Coord> = search.by_ref().take(10).collect();
        let rest: Vec<Coord> = search.collect();
        let outcome = astar(&problem).unwrap();
        assert_eq!([first, rest].concat(), outcome.visited());
    }
}
