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
use crate::search::SearchOutcome;
use crate::search::SearchState;

/// Uniform-cost search.
///
/// Finalises cells by increasing distance from the start, ties going to the
/// lower row-major position. Iterating yields the visited cells in order.
#[derive(Debug)]
pub struct DijkstraSearch<'p, F = HeapFrontier<GridCost>>
where
    F: Frontier<GridCost>,
{
    problem: &'p GridProblem,
    /// Distances, parents and the closed set.
    state: SearchState,
    /// Cells not finalised yet, by distance.
    open: F,
    visited: Vec<Coord>,
    done: bool,
}

impl<'p, F> DijkstraSearch<'p, F>
where
    F: Frontier<GridCost>,
{
    pub fn new(problem: &'p GridProblem) -> Result<Self, GridError> {
        problem.validate().inspect_err(|e| log::warn!("Refusing to search: {e}"))?;

        let grid = problem.grid();
        let start = problem.start();
        let mut state = SearchState::new(grid);
        let mut open = F::with_grid(grid);

        state[start].distance = GridCost::zero();
        open.update(grid.order(&start), start, GridCost::zero());

        Ok(Self {
            problem,
            state,
            open,
            visited: Vec::with_capacity(grid.len()),
            done: false,
        })
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

        while let Some((distance, current)) = self.open.pop_min() {
            if grid.is_wall(&current) {
                continue;
            }
            if !distance.valid() {
                // Everything left is unreachable.
                break;
            }
            debug_assert_eq!(distance, self.state[current].distance);

            self.state[current].visited = true;
            self.visited.push(current);
            log::trace!("Dijkstra visits {current} at {distance}");

            if current == problem.finish() {
                self.done = true;
                return Some(current);
            }

            let new_distance = distance.saturating_add(STEP_COST);
            for neighbour in self.state.unvisited_neighbours(grid, &current) {
                if new_distance < self.state[neighbour].distance {
                    self.state[neighbour].reach(current, new_distance);
                    self.open
                        .update(grid.order(&neighbour), neighbour, new_distance);
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
            "Dijkstra visited {} cells, finish {}",
            outcome.visited().len(),
            if outcome.found() { "reached" } else { "unreachable" }
        );
        outcome
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }
}

impl<F> Iterator for DijkstraSearch<'_, F>
where
    F: Frontier<GridCost>,
{
    type Item = Coord;
    fn next(&mut self) -> Option<Self::Item> {
        self.expand_next()
    }
}

/// Dijkstra over a binary heap.
pub fn dijkstra(problem: &GridProblem) -> Result<SearchOutcome, GridError> {
    Ok(DijkstraSearch::<HeapFrontier<GridCost>>::new(problem)?.run())
}

/// Dijkstra re-sorting the whole working set at every step.
pub fn dijkstra_sorted(problem: &GridProblem) -> Result<SearchOutcome, GridError> {
    Ok(DijkstraSearch::<SortedFrontier<GridCost>>::new(problem)?.run())
}

#[cfg(test)]
mod tests {
    use super::*;

    use indoc::indoc;
    use rand_chacha::ChaCha8Rng;
    use rand_chacha::rand_core::SeedableRng;

    use crate::algorithms::test_support::check_outcome;
    use crate::algorithms::test_support::coords;
    use crate::algorithms::test_support::path_len;

    #[test]
    fn open_5x5() {
        let problem =
            GridProblem::new_initial(5, 5, Coord::new(0, 0), Coord::new(4, 4)).unwrap();
        let outcome = dijkstra(&problem).unwrap();
        check_outcome(&problem, &outcome);
        assert_eq!(outcome.distance(), Some(8));
        assert_eq!(path_len(&outcome), 9);
        // Every cell is at most 8 away
        assert_eq!(outcome.visited().len(), 25);
    }

    #[test]
    fn visits_by_distance_then_position() {
        let problem = GridProblem::try_from(indoc! {"
            ...
            .S.
            ..F
        "})
        .unwrap();
        let outcome = dijkstra(&problem).unwrap();
        check_outcome(&problem, &outcome);
        assert_eq!(
            outcome.visited(),
            coords(&[(1, 1), (0, 1), (1, 0), (1, 2), (2, 1), (0, 0), (0, 2), (2, 0), (2, 2)])
        );
        // (2,2) is first reached from (1,2) as it's expanded before (2,1)
        assert_eq!(outcome.path(), coords(&[(1, 1), (1, 2), (2, 2)]));
    }

    #[test]
    fn adjacent_finish() {
        let problem = GridProblem::try_from("SF..\n....").unwrap();
        let outcome = dijkstra(&problem).unwrap();
        check_outcome(&problem, &outcome);
        assert_eq!(outcome.visited().last(), Some(&problem.finish()));
        assert_eq!(outcome.path(), coords(&[(0, 0), (0, 1)]));
    }

    #[test]
    fn walls_are_never_visited() {
        let problem = GridProblem::try_from(indoc! {"
            S.#..
            .##.#
            ....F
        "})
        .unwrap();
        let outcome = dijkstra(&problem).unwrap();
        check_outcome(&problem, &outcome);
        assert_eq!(outcome.distance(), Some(6));
    }

    #[test]
    fn separated_by_a_wall() {
        let problem = GridProblem::try_from(indoc! {"
            S.#..
            ..#..
            ..#.F
        "})
        .unwrap();
        let outcome = dijkstra(&problem).unwrap();
        check_outcome(&problem, &outcome);
        assert!(!outcome.found());
        assert_eq!(outcome.path(), vec![problem.finish()]);
        // Only the start's side of the wall is explored
        assert_eq!(outcome.visited().len(), 6);
    }

    #[test]
    fn finish_on_a_wall_is_rejected() {
        use crate::grid::Cell;
        use crate::grid::Grid;
        use crate::grid::Marker;

        let grid = Grid::new_from_map(vec![vec![Cell::Empty, Cell::Empty, Cell::Wall]]).unwrap();
        assert_eq!(
            GridProblem::new(grid, Coord::new(0, 0), Coord::new(0, 2)),
            Err(GridError::WallMarker {
                marker: Marker::Finish,
                coord: Coord::new(0, 2)
            })
        );

        // Editing can't turn the finish into a wall either
        let mut problem = GridProblem::try_from("S.F").unwrap();
        assert_eq!(problem.toggle_wall(&problem.finish()), Ok(false));
        assert_eq!(dijkstra(&problem).unwrap().distance(), Some(2));
    }

    #[test]
    fn iterating_yields_visited_order() {
        let problem = GridProblem::default();
        let stepped: Vec<Coord> = DijkstraSearch::<HeapFrontier<GridCost>>::new(&problem)
            .unwrap()
            .collect();
        let outcome = dijkstra(&problem).unwrap();
        assert_eq!(stepped, outcome.visited());
        assert_eq!(outcome.distance(), Some(40));
    }

    #[test]
    fn frontiers_agree() {
        let base = GridProblem::new_initial(12, 15, Coord::new(0, 0), Coord::new(11, 14)).unwrap();
        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let problem = base.randomize(&mut rng, 0.3);
            let heap = dijkstra(&problem).unwrap();
            let sorted = dijkstra_sorted(&problem).unwrap();
            check_outcome(&problem, &heap);
            check_outcome(&problem, &sorted);
            assert_eq!(heap.visited(), sorted.visited());
            assert_eq!(heap.path(), sorted.path());
        }
    }

    #[test]
    fn repeated_runs_match() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let problem = GridProblem::default().randomize(&mut rng, 0.25);
        let first = dijkstra(&problem).unwrap();
        let second = dijkstra(&problem).unwrap();
        assert_eq!(first.visited(), second.visited());
        assert_eq!(first.path(), second.path());
        assert_eq!(first.distance(), second.distance());
    }
}
