//! Text rendering of a board with a finished search drawn over it.

use derive_more::Display;
use owo_colors::OwoColorize;

use crate::grid::Cell;
use crate::grid::Coord;
use crate::grid::MAX_ELEMENTS_DISPLAYED;
use crate::problem::GridProblem;
use crate::search::SearchOutcome;

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
pub enum OverlayCell {
    #[display(".")]
    Empty,
    #[display("#")]
    Wall,
    #[display("o")]
    Visited,
    #[display("*")]
    Path,
    #[display("S")]
    Start,
    #[display("F")]
    Finish,
}

impl OverlayCell {
    fn write_colored(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            OverlayCell::Empty => write!(f, "{}", self.dimmed()),
            OverlayCell::Wall => write!(f, "{}", self.white().bold()),
            OverlayCell::Visited => write!(f, "{}", self.cyan()),
            OverlayCell::Path => write!(f, "{}", self.yellow().bold()),
            OverlayCell::Start => write!(f, "{}", self.green().bold()),
            OverlayCell::Finish => write!(f, "{}", self.red().bold()),
        }
    }
}

/// A board with the visited cells and path of a run laid over it.
///
/// Markers win over the path, which wins over the visited cells.
#[derive(Clone, Debug)]
pub struct Overlay {
    cols: usize,
    cells: Vec<OverlayCell>,
}

impl Overlay {
    #[must_use]
    pub fn new(problem: &GridProblem, outcome: Option<&SearchOutcome>) -> Self {
        let grid = problem.grid();
        let (_, cols) = grid.dimensions();
        let mut cells: Vec<OverlayCell> = grid
            .all_cells()
            .map(|c| match grid.at(&c) {
                Cell::Empty => OverlayCell::Empty,
                Cell::Wall => OverlayCell::Wall,
            })
            .collect();

        if let Some(outcome) = outcome {
            for c in outcome.visited() {
                cells[grid.order(c)] = OverlayCell::Visited;
            }
            if outcome.found() {
                for c in outcome.path() {
                    cells[grid.order(&c)] = OverlayCell::Path;
                }
            }
        }
        cells[grid.order(&problem.start())] = OverlayCell::Start;
        cells[grid.order(&problem.finish())] = OverlayCell::Finish;

        Self { cols, cells }
    }

    pub fn at(&self, c: &Coord) -> OverlayCell {
        assert!(c.col < self.cols, "{c} is out of bounds");
        self.cells[c.row * self.cols + c.col]
    }

    /// The same overlay, styled for a terminal.
    pub fn colored(&self) -> ColoredOverlay<'_> {
        ColoredOverlay(self)
    }

    fn write_with(
        &self,
        f: &mut std::fmt::Formatter,
        write_cell: impl Fn(&OverlayCell, &mut std::fmt::Formatter) -> std::fmt::Result,
    ) -> std::fmt::Result {
        for line in self.cells.chunks(self.cols).take(MAX_ELEMENTS_DISPLAYED) {
            for cell in line.iter().take(MAX_ELEMENTS_DISPLAYED) {
                write_cell(cell, f)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl std::fmt::Display for Overlay {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.write_with(f, |cell, f| write!(f, "{cell}"))
    }
}

pub struct ColoredOverlay<'o>(&'o Overlay);

impl std::fmt::Display for ColoredOverlay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.0.write_with(f, OverlayCell::write_colored)
    }
}
