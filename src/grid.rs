use derive_more::Display;
use smallvec::SmallVec;
use thiserror::Error;

use crate::cost::GridCost;

pub(crate) const MAX_ELEMENTS_DISPLAYED: usize = 120;

/// A position in the grid.
///
/// Grids are row-major and 0-indexed. Rows grow downwards.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[display("({row},{col})")]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    #[inline(always)]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// The distance of following straight lines.
    ///
    /// ```
    /// use gridpath::grid::Coord;
    /// assert_eq!(Coord::new(0, 0).manhattan_distance(&Coord::new(4, 4)), 8);
    /// assert_eq!(Coord::new(3, 1).manhattan_distance(&Coord::new(1, 2)), 3);
    /// ```
    #[inline(always)]
    pub fn manhattan_distance(&self, other: &Coord) -> GridCost {
        (self.row.abs_diff(other.row) + self.col.abs_diff(other.col)) as GridCost
    }

    #[inline(always)]
    pub fn is_adjacent(&self, other: &Coord) -> bool {
        self.manhattan_distance(other) == 1
    }
}

/// Orthogonal moves.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
pub enum Direction {
    #[display("↑")]
    Up, // row--
    #[display("↓")]
    Down, // row++
    #[display("←")]
    Left, // col--
    #[display("→")]
    Right, // col++
}

impl Direction {
    /// Expansion order.
    ///
    /// Both searches break ties by position, but which neighbour gets reached
    /// first (and keeps the parent link on equal costs) follows this order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Moves `c` one step, or `None` when leaving a `rows`x`cols` grid.
    #[inline(always)]
    pub fn apply(&self, c: &Coord, rows: usize, cols: usize) -> Option<Coord> {
        #[rustfmt::skip]
        let (row, col) = match self {
            Direction::Up    => (c.row.checked_sub(1)?, c.col),
            Direction::Down  => (c.row + 1,             c.col),
            Direction::Left  => (c.row,                 c.col.checked_sub(1)?),
            Direction::Right => (c.row,                 c.col + 1),
        };
        (row < rows && col < cols).then_some(Coord { row, col })
    }
}

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    #[display(".")]
    Empty,
    #[display("#")]
    Wall,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CellParseError {
    #[error("Invalid character '{0}' found.")]
    InvalidCharacter(char),
}

impl std::convert::TryFrom<char> for Cell {
    type Error = CellParseError;

    fn try_from(ch: char) -> Result<Self, Self::Error> {
        match ch {
            ' ' | '.' | '░' => Ok(Cell::Empty),
            '#' | '█' => Ok(Cell::Wall),
            ch => Err(CellParseError::InvalidCharacter(ch)),
        }
    }
}

/// Which of the two markers a problem carries.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
pub enum Marker {
    #[display("start")]
    Start,
    #[display("finish")]
    Finish,
}

/// Malformed grids and problems.
///
/// These are programming errors of whoever builds the grid, so searches refuse
/// to run on them instead of producing a wrong answer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("Grid has no cells")]
    Empty,
    #[error("Row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("{coord} is outside the {rows}x{cols} grid")]
    OutOfBounds {
        coord: Coord,
        rows: usize,
        cols: usize,
    },
    #[error("The {marker} at {coord} is a wall")]
    WallMarker { marker: Marker, coord: Coord },
    #[error("Start and finish are both at {0}")]
    SameStartFinish(Coord),
}

/// The static part of the board, walls and empty cells.
#[derive(Clone, PartialEq, Eq)]
pub struct Grid {
    pub(crate) map: Vec<Vec<Cell>>,
}

impl Grid {
    pub fn new_from_map(map: Vec<Vec<Cell>>) -> Result<Self, GridError> {
        let expected = map.first().map_or(0, Vec::len);
        if expected == 0 {
            return Err(GridError::Empty);
        }
        if let Some((row, line)) = map
            .iter()
            .enumerate()
            .find(|(_, line)| line.len() != expected)
        {
            return Err(GridError::Ragged {
                row,
                expected,
                found: line.len(),
            });
        }

        Ok(Self { map })
    }

    /// An all-empty grid.
    ///
    /// Dimensions must be positive.
    pub fn new_empty_with_dimensions(rows: usize, cols: usize) -> Result<Self, GridError> {
        Self::new_from_map(vec![vec![Cell::Empty; cols]; rows])
    }

    /// `(rows, cols)`
    #[inline(always)]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.map.len(), self.map[0].len())
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        let (rows, cols) = self.dimensions();
        rows * cols
    }

    /// Grids are never empty, see [`Grid::new_from_map`].
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        false
    }

    #[inline(always)]
    pub fn contains(&self, c: &Coord) -> bool {
        let (rows, cols) = self.dimensions();
        c.row < rows && c.col < cols
    }

    pub(crate) fn check_bounds(&self, c: &Coord) -> Result<(), GridError> {
        if self.contains(c) {
            return Ok(());
        }
        let (rows, cols) = self.dimensions();
        Err(GridError::OutOfBounds {
            coord: *c,
            rows,
            cols,
        })
    }

    #[inline(always)]
    pub fn at(&self, c: &Coord) -> Cell {
        debug_assert!(self.contains(c), "{c} is out of bounds");
        self.map[c.row][c.col]
    }

    #[inline(always)]
    pub fn is_wall(&self, c: &Coord) -> bool {
        self.at(c) == Cell::Wall
    }

    #[inline(always)]
    pub(crate) fn set(&mut self, c: &Coord, cell: Cell) {
        self.map[c.row][c.col] = cell;
    }

    pub fn wall_count(&self) -> usize {
        self.map
            .iter()
            .flatten()
            .filter(|&&cell| cell == Cell::Wall)
            .count()
    }

    /// Position of `c` in [`Grid::all_cells`].
    #[inline(always)]
    pub fn order(&self, c: &Coord) -> usize {
        let (_rows, cols) = self.dimensions();
        c.row * cols + c.col
    }

    /// Every cell, row by row.
    pub fn all_cells(&self) -> impl Iterator<Item = Coord> + '_ {
        let (rows, cols) = self.dimensions();
        (0..rows).flat_map(move |row| (0..cols).map(move |col| Coord { row, col }))
    }

    /// Gets the in-bounds neighbours of a cell, in [`Direction::ALL`] order.
    ///
    /// Walls are included.
    pub fn neighbours(&self, c: &Coord) -> SmallVec<[Coord; 4]> {
        let (rows, cols) = self.dimensions();
        Direction::ALL
            .iter()
            .filter_map(|d| d.apply(c, rows, cols))
            .collect()
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let (rows, cols) = self.dimensions();
        writeln!(f, "Grid({rows}x{cols}):")?;
        for line in self.map.iter().take(MAX_ELEMENTS_DISPLAYED) {
            for cell in line.iter().take(MAX_ELEMENTS_DISPLAYED) {
                write!(f, "{cell}")?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

impl std::fmt::Debug for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Grid{:?}", self.dimensions())
    }
}
