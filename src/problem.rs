use derive_more::Display;
use thiserror::Error;

use crate::cost::GridCost;
use crate::grid::Cell;
use crate::grid::CellParseError;
use crate::grid::Coord;
use crate::grid::Grid;
use crate::grid::GridError;
use crate::grid::MAX_ELEMENTS_DISPLAYED;
use crate::grid::Marker;

pub const DEFAULT_ROWS: usize = 20;
pub const DEFAULT_COLS: usize = 50;
pub const DEFAULT_START: Coord = Coord::new(10, 5);
pub const DEFAULT_FINISH: Coord = Coord::new(10, 45);

// Simple colours
const WHITE: [u8; 3] = [u8::MAX, u8::MAX, u8::MAX];
const BLACK: [u8; 3] = [u8::MIN, u8::MIN, u8::MIN];
const GREEN: [u8; 3] = [u8::MIN, u8::MAX, u8::MIN];
const BLUE: [u8; 3] = [u8::MIN, u8::MIN, u8::MAX];

/// An estimate of the cost between two cells.
pub trait Heuristic: std::fmt::Debug {
    fn h(s: &Coord, goal: &Coord) -> GridCost;
}

/// Admissible and consistent for 4-connected unit-cost grids.
#[derive(Debug)]
pub struct ManhattanDistance;

impl Heuristic for ManhattanDistance {
    #[inline(always)]
    fn h(s: &Coord, goal: &Coord) -> GridCost {
        s.manhattan_distance(goal)
    }
}

/// A grid with one start and one finish.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridProblem {
    grid: Grid,
    start: Coord,
    finish: Coord,
}

impl GridProblem {
    pub fn new(grid: Grid, start: Coord, finish: Coord) -> Result<Self, GridError> {
        let problem = Self {
            grid,
            start,
            finish,
        };
        problem.validate()?;
        Ok(problem)
    }

    /// An empty board with the given markers.
    pub fn new_initial(
        rows: usize,
        cols: usize,
        start: Coord,
        finish: Coord,
    ) -> Result<Self, GridError> {
        Self::new(Grid::new_empty_with_dimensions(rows, cols)?, start, finish)
    }

    #[inline(always)]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }
    #[inline(always)]
    pub fn start(&self) -> Coord {
        self.start
    }
    #[inline(always)]
    pub fn finish(&self) -> Coord {
        self.finish
    }
    #[inline(always)]
    pub fn is_start(&self, c: &Coord) -> bool {
        self.start == *c
    }
    #[inline(always)]
    pub fn is_finish(&self, c: &Coord) -> bool {
        self.finish == *c
    }

    /// Checks the markers against the grid.
    pub fn validate(&self) -> Result<(), GridError> {
        self.grid.check_bounds(&self.start)?;
        self.grid.check_bounds(&self.finish)?;
        if self.start == self.finish {
            return Err(GridError::SameStartFinish(self.start));
        }
        for (marker, coord) in [(Marker::Start, self.start), (Marker::Finish, self.finish)] {
            if self.grid.is_wall(&coord) {
                return Err(GridError::WallMarker { marker, coord });
            }
        }
        Ok(())
    }

    /// Flips a cell between empty and wall.
    ///
    /// Markers can't become walls, toggling them does nothing. Returns whether
    /// the cell changed.
    pub fn toggle_wall(&mut self, c: &Coord) -> Result<bool, GridError> {
        self.grid.check_bounds(c)?;
        if self.is_start(c) || self.is_finish(c) {
            return Ok(false);
        }
        let toggled = match self.grid.at(c) {
            Cell::Empty => Cell::Wall,
            Cell::Wall => Cell::Empty,
        };
        self.grid.set(c, toggled);
        Ok(true)
    }

    /// Moves the start, knocking down any wall at `c`.
    pub fn move_start(&mut self, c: &Coord) -> Result<(), GridError> {
        self.move_marker(Marker::Start, c)
    }

    /// Moves the finish, knocking down any wall at `c`.
    pub fn move_finish(&mut self, c: &Coord) -> Result<(), GridError> {
        self.move_marker(Marker::Finish, c)
    }

    fn move_marker(&mut self, marker: Marker, c: &Coord) -> Result<(), GridError> {
        self.grid.check_bounds(c)?;
        let other = match marker {
            Marker::Start => self.finish,
            Marker::Finish => self.start,
        };
        if other == *c {
            return Err(GridError::SameStartFinish(*c));
        }

        self.grid.set(c, Cell::Empty);
        match marker {
            Marker::Start => self.start = *c,
            Marker::Finish => self.finish = *c,
        }
        log::debug!("Moved {marker} to {c}");
        Ok(())
    }

    /// Removes every wall, keeping the markers.
    pub fn clear_walls(&mut self) {
        for line in self.grid.map.iter_mut() {
            line.fill(Cell::Empty);
        }
    }

    /// A copy of this problem with walls sprinkled with `wall_probability`.
    ///
    /// Existing walls are kept and markers are never covered. Probabilities are
    /// clamped to `[0, 1]`, non-finite ones add no walls.
    pub fn randomize<R: rand::Rng>(&self, r: &mut R, wall_probability: f64) -> GridProblem {
        let p = if wall_probability.is_finite() {
            wall_probability.clamp(0.0, 1.0)
        } else {
            log::warn!("Ignoring wall probability {wall_probability}");
            0.0
        };
        let mut problem = self.clone();
        for c in self.grid.all_cells() {
            if self.is_start(&c) || self.is_finish(&c) {
                continue;
            }
            if r.random_bool(p) {
                problem.grid.set(&c, Cell::Wall);
            }
        }
        debug_assert!(problem.validate().is_ok());
        problem
    }
}

impl Default for GridProblem {
    /// The starting board, also what "clear board" goes back to.
    fn default() -> Self {
        Self {
            grid: Grid {
                map: vec![vec![Cell::Empty; DEFAULT_COLS]; DEFAULT_ROWS],
            },
            start: DEFAULT_START,
            finish: DEFAULT_FINISH,
        }
    }
}

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
pub enum GridProblemCell {
    Cell(Cell),
    #[display("S")]
    Start,
    #[display("F")]
    Finish,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridProblemCellParseError {
    #[error("Invalid cell {e}")]
    InvalidCell { e: CellParseError },
}

impl std::convert::TryFrom<char> for GridProblemCell {
    type Error = GridProblemCellParseError;

    fn try_from(ch: char) -> Result<Self, Self::Error> {
        match ch {
            'S' => Ok(GridProblemCell::Start),
            'F' | 'G' => Ok(GridProblemCell::Finish),
            ch => {
                let cell =
                    Cell::try_from(ch).map_err(|e| GridProblemCellParseError::InvalidCell { e })?;
                Ok(GridProblemCell::Cell(cell))
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum GridProblemParseError {
    #[error("Empty input")]
    EmptyInput,
    #[error("Invalid cell {e} found at ({row},{col})")]
    InvalidCell {
        e: GridProblemCellParseError,
        row: usize,
        col: usize,
    },
    #[error("No {0} found")]
    MissingMarker(Marker),
    #[error("Found a second {marker} at {second} (first at {first})")]
    DuplicateMarker {
        marker: Marker,
        first: Coord,
        second: Coord,
    },
    #[error("Invalid grid: {0}")]
    InvalidGrid(#[from] GridError),
    #[error("I/O error when loading '{p}': {e}")]
    IOError {
        p: std::path::PathBuf,
        e: std::io::Error,
    },
    #[error("Image error when loading '{p}': {e}")]
    ImageError {
        p: std::path::PathBuf,
        e: image::ImageError,
    },
}

/// Collects markers while a problem is being parsed.
#[derive(Default)]
struct MarkerScan {
    start: Option<Coord>,
    finish: Option<Coord>,
}

impl MarkerScan {
    fn see(&mut self, marker: Marker, c: Coord) -> Result<(), GridProblemParseError> {
        let slot = match marker {
            Marker::Start => &mut self.start,
            Marker::Finish => &mut self.finish,
        };
        if let Some(first) = *slot {
            return Err(GridProblemParseError::DuplicateMarker {
                marker,
                first,
                second: c,
            });
        }
        *slot = Some(c);
        Ok(())
    }

    fn into_problem(self, grid: Grid) -> Result<GridProblem, GridProblemParseError> {
        let start = self
            .start
            .ok_or(GridProblemParseError::MissingMarker(Marker::Start))?;
        let finish = self
            .finish
            .ok_or(GridProblemParseError::MissingMarker(Marker::Finish))?;
        Ok(GridProblem::new(grid, start, finish)?)
    }
}

impl std::convert::TryFrom<&str> for GridProblem {
    type Error = GridProblemParseError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let lines: Vec<&str> = s.lines().collect();

        if lines.is_empty() {
            return Err(GridProblemParseError::EmptyInput);
        }
        if lines[0].is_empty() {
            return Err(GridProblemParseError::EmptyInput);
        }

        let mut markers = MarkerScan::default();
        let mut map = Vec::with_capacity(lines.len());
        for (row, line) in lines.iter().enumerate() {
            let mut cells = Vec::with_capacity(line.len());
            for (col, ch) in line.chars().enumerate() {
                let cell = GridProblemCell::try_from(ch)
                    .map_err(|e| GridProblemParseError::InvalidCell { e, row, col })?;

                cells.push(match cell {
                    GridProblemCell::Start => {
                        markers.see(Marker::Start, Coord::new(row, col))?;
                        Cell::Empty
                    }
                    GridProblemCell::Finish => {
                        markers.see(Marker::Finish, Coord::new(row, col))?;
                        Cell::Empty
                    }
                    GridProblemCell::Cell(c) => c,
                });
            }
            map.push(cells);
        }

        markers.into_problem(Grid::new_from_map(map)?)
    }
}

impl std::convert::TryFrom<&std::path::Path> for GridProblem {
    type Error = GridProblemParseError;

    /// Black pixels are walls, blue the start and green the finish.
    fn try_from(p: &std::path::Path) -> Result<Self, Self::Error> {
        use image::ImageReader;
        use image::Rgb;

        let img = ImageReader::open(p)
            .map_err(|e| GridProblemParseError::IOError {
                p: p.to_path_buf(),
                e,
            })?
            .decode()
            .map_err(|e| GridProblemParseError::ImageError {
                p: p.to_path_buf(),
                e,
            })?
            .into_rgb8();

        let rows = img.height() as usize;
        let cols = img.width() as usize;
        let mut markers = MarkerScan::default();
        let mut map = vec![vec![Cell::Empty; cols]; rows];

        for (x, y, px) in img.enumerate_pixels() {
            let px: &Rgb<u8> = px;
            let c = Coord::new(y as usize, x as usize);
            map[c.row][c.col] = match px.0 {
                BLACK => Cell::Wall,
                WHITE => Cell::Empty,
                GREEN => {
                    markers.see(Marker::Finish, c)?;
                    Cell::Empty
                }
                BLUE => {
                    markers.see(Marker::Start, c)?;
                    Cell::Empty
                }
                _ => Cell::Empty,
            };
        }

        markers.into_problem(Grid::new_from_map(map)?)
    }
}

impl std::fmt::Display for GridProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let (rows, cols) = self.grid.dimensions();
        writeln!(
            f,
            "GridProblem({rows}x{cols}) (s:{}, f:{}):",
            self.start, self.finish
        )?;
        for (row, line) in self.grid.map.iter().enumerate().take(MAX_ELEMENTS_DISPLAYED) {
            for (col, cell) in line.iter().enumerate().take(MAX_ELEMENTS_DISPLAYED) {
                let c = Coord::new(row, col);
                if self.is_start(&c) {
                    write!(f, "{}", GridProblemCell::Start)?;
                } else if self.is_finish(&c) {
                    write!(f, "{}", GridProblemCell::Finish)?;
                } else {
                    write!(f, "{cell}")?;
                }
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
