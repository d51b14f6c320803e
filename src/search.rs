use smallvec::SmallVec;

use crate::cost::Cost;
use crate::cost::GridCost;
use crate::grid::Coord;
use crate::grid::Grid;

/// What a search knows about a single cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CellState {
    /// Best known cost from the start. Final once `visited`.
    ///
    /// A* keeps it equal to `g`.
    pub distance: GridCost,
    pub g: GridCost,
    pub h: GridCost,
    pub f: GridCost,
    /// Predecessor on the best known path.
    pub previous: Option<Coord>,
    pub visited: bool,
}

impl Default for CellState {
    fn default() -> Self {
        Self {
            distance: GridCost::infinity(),
            g: GridCost::infinity(),
            h: GridCost::infinity(),
            f: GridCost::infinity(),
            previous: None,
            visited: false,
        }
    }
}

impl CellState {
    /// Gives this cell a better path through a new parent.
    #[inline(always)]
    pub(crate) fn reach(&mut self, parent: Coord, distance: GridCost) {
        debug_assert!(!self.visited, "Visited cells are final");
        debug_assert!(distance < self.distance);
        self.previous = Some(parent);
        self.distance = distance;
    }
}

/// Per-run search state, one [`CellState`] per grid cell.
///
/// Searches allocate their own, so runs never see each other's leftovers and
/// the grid itself stays untouched.
#[derive(Clone, PartialEq, Eq)]
pub struct SearchState {
    rows: usize,
    cols: usize,
    cells: Vec<CellState>,
}

impl SearchState {
    #[must_use]
    pub fn new(grid: &Grid) -> Self {
        let (rows, cols) = grid.dimensions();
        Self {
            rows,
            cols,
            cells: vec![CellState::default(); rows * cols],
        }
    }

    #[inline(always)]
    fn offset(&self, c: &Coord) -> usize {
        assert!(c.row < self.rows && c.col < self.cols, "{c} is out of bounds");
        c.row * self.cols + c.col
    }

    #[inline(always)]
    pub fn is_visited(&self, c: &Coord) -> bool {
        self[*c].visited
    }

    pub fn visited_count(&self) -> usize {
        self.cells.iter().filter(|s| s.visited).count()
    }

    /// The neighbours of `c` that haven't been finalised yet.
    pub fn unvisited_neighbours(&self, grid: &Grid, c: &Coord) -> SmallVec<[Coord; 4]> {
        let mut neighbours = grid.neighbours(c);
        neighbours.retain(|n| !self.is_visited(n));
        neighbours
    }

    /// Walks the predecessor links back from `finish`.
    ///
    /// Returns the cells in start→finish order. When `finish` was never
    /// reached the path only holds `finish`.
    #[must_use]
    pub fn path_to(&self, finish: Coord) -> Vec<Coord> {
        let mut path = vec![finish];
        let mut current = finish;
        while let Some(previous) = self[current].previous {
            debug_assert!(
                path.len() <= self.cells.len(),
                "Predecessor links must not loop"
            );
            path.push(previous);
            current = previous;
        }

        path.reverse();
        path
    }
}

impl std::ops::Index<Coord> for SearchState {
    type Output = CellState;

    #[inline(always)]
    fn index(&self, c: Coord) -> &Self::Output {
        &self.cells[self.offset(&c)]
    }
}

impl std::ops::IndexMut<Coord> for SearchState {
    #[inline(always)]
    fn index_mut(&mut self, c: Coord) -> &mut CellState {
        let i = self.offset(&c);
        &mut self.cells[i]
    }
}

impl std::fmt::Debug for SearchState {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "SearchState{{({}x{}, {} visited)}}",
            self.rows,
            self.cols,
            self.visited_count()
        )
    }
}

/// The result of running a search to completion.
#[derive(Clone, Debug)]
pub struct SearchOutcome {
    pub(crate) start: Coord,
    pub(crate) finish: Coord,
    pub(crate) visited: Vec<Coord>,
    pub(crate) state: SearchState,
}

impl SearchOutcome {
    /// Cells in the order they were finalised. Never contains walls.
    #[inline(always)]
    pub fn visited(&self) -> &[Coord] {
        &self.visited
    }

    #[inline(always)]
    pub fn state(&self) -> &SearchState {
        &self.state
    }

    #[inline(always)]
    pub fn start(&self) -> Coord {
        self.start
    }

    #[inline(always)]
    pub fn finish(&self) -> Coord {
        self.finish
    }

    /// The shortest path to the finish, see [`SearchState::path_to`].
    #[must_use]
    pub fn path(&self) -> Vec<Coord> {
        self.state.path_to(self.finish)
    }

    /// Whether the finish was reached.
    pub fn found(&self) -> bool {
        self.state.is_visited(&self.finish)
    }

    /// Cost of the shortest path, if there's one.
    pub fn distance(&self) -> Option<GridCost> {
        self.found().then(|| self.state[self.finish].distance)
    }
}
