use std::time::Duration;

use derive_more::Display;
use hrsw::Stopwatch;
use human_duration::human_duration;
use thousands::Separable;

use crate::algorithms::astar::astar;
use crate::algorithms::astar::astar_sorted;
use crate::algorithms::dijkstra::dijkstra;
use crate::algorithms::dijkstra::dijkstra_sorted;
use crate::cost::GridCost;
use crate::frontier::FrontierKind;
use crate::grid::Coord;
use crate::grid::GridError;
use crate::problem::GridProblem;
use crate::search::SearchOutcome;

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Algorithm {
    #[display("Dijkstra")]
    Dijkstra,
    #[display("A*")]
    #[value(name = "astar")]
    AStar,
}

impl Algorithm {
    pub const ALL: [Algorithm; 2] = [Algorithm::Dijkstra, Algorithm::AStar];

    /// Runs the search to completion.
    pub fn search(
        &self,
        problem: &GridProblem,
        config: &SearchConfig,
    ) -> Result<SearchOutcome, GridError> {
        match (self, config.frontier) {
            (Algorithm::Dijkstra, FrontierKind::Heap) => dijkstra(problem),
            (Algorithm::Dijkstra, FrontierKind::Sorted) => dijkstra_sorted(problem),
            (Algorithm::AStar, FrontierKind::Heap) => astar(problem),
            (Algorithm::AStar, FrontierKind::Sorted) => astar_sorted(problem),
        }
    }

    /// Runs and times the search.
    pub fn run(
        &self,
        problem: &GridProblem,
        config: &SearchConfig,
    ) -> Result<SearchReport, GridError> {
        let (rows, cols) = problem.grid().dimensions();
        log::debug!(
            "Running {self} ({}) on {rows}x{cols} from {} to {}",
            config.frontier,
            problem.start(),
            problem.finish()
        );

        let mut stopwatch = Stopwatch::new_started();
        let outcome = self.search(problem, config)?;
        stopwatch.stop();

        Ok(SearchReport {
            algorithm: *self,
            frontier: config.frontier,
            outcome,
            elapsed: stopwatch.elapsed(),
        })
    }
}

/// Library-side knobs for a run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchConfig {
    pub frontier: FrontierKind,
}

/// A finished, timed run.
#[derive(Clone, Debug)]
pub struct SearchReport {
    algorithm: Algorithm,
    frontier: FrontierKind,
    outcome: SearchOutcome,
    elapsed: Duration,
}

impl SearchReport {
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn frontier(&self) -> FrontierKind {
        self.frontier
    }

    pub fn outcome(&self) -> &SearchOutcome {
        &self.outcome
    }

    pub fn visited(&self) -> &[Coord] {
        self.outcome.visited()
    }

    pub fn path(&self) -> Vec<Coord> {
        self.outcome.path()
    }

    pub fn distance(&self) -> Option<GridCost> {
        self.outcome.distance()
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Wall time in milliseconds, fractional.
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }
}

impl std::fmt::Display for SearchReport {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} ({}): visited {} cells, ",
            self.algorithm,
            self.frontier,
            self.outcome.visited().len().separate_with_commas()
        )?;
        match self.distance() {
            Some(d) => write!(
                f,
                "path of {} cells (distance {})",
                self.outcome.path().len().separate_with_commas(),
                d.separate_with_commas()
            )?,
            None => write!(f, "finish unreachable")?,
        }
        write!(f, " in {}", human_duration(&self.elapsed))
    }
}
