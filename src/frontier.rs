//! The working set of a search.
//!
//! A frontier hands out cells by increasing key. Equal keys go out by order
//! index, the cell's row-major position in [`Grid::all_cells`], so every
//! implementation produces exactly the same sequence.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use derive_more::Display;

use crate::cost::Cost;
use crate::grid::Coord;
use crate::grid::Grid;

pub trait Frontier<C: Cost>: std::fmt::Debug {
    /// A working set with every cell of `grid` at an infinite key.
    fn with_grid(grid: &Grid) -> Self
    where
        Self: Sized;

    /// Lowers the key of a cell still in the working set.
    fn update(&mut self, order: usize, coord: Coord, key: C);

    /// Removes the cell with the lowest `(key, order)`.
    ///
    /// Frontiers may stop early once only infinite keys remain, as searches
    /// stop there anyway.
    fn pop_min(&mut self) -> Option<(C, Coord)>;
}

#[derive(Copy, Clone, Debug, Display, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum FrontierKind {
    /// Binary heap with lazy deletion.
    #[default]
    #[display("heap")]
    Heap,
    /// Re-sorts the whole working set before every removal.
    #[display("sorted")]
    Sorted,
}

/// The plain working set: every cell, sorted again before each removal.
///
/// Quadratic, but trivially correct. Useful to cross-check faster frontiers.
#[derive(Debug)]
pub struct SortedFrontier<C: Cost> {
    /// Order indices of the cells still in the working set.
    remaining: Vec<usize>,
    keys: Vec<C>,
    coords: Vec<Coord>,
}

impl<C: Cost> Frontier<C> for SortedFrontier<C> {
    fn with_grid(grid: &Grid) -> Self {
        let coords: Vec<Coord> = grid.all_cells().collect();
        Self {
            remaining: (0..coords.len()).collect(),
            keys: vec![C::infinity(); coords.len()],
            coords,
        }
    }

    fn update(&mut self, order: usize, coord: Coord, key: C) {
        debug_assert_eq!(self.coords[order], coord);
        debug_assert!(key < self.keys[order], "Keys only go down");
        self.keys[order] = key;
    }

    fn pop_min(&mut self) -> Option<(C, Coord)> {
        if self.remaining.is_empty() {
            return None;
        }
        let keys = &self.keys;
        self.remaining.sort_by_key(|&o| (keys[o], o));
        let o = self.remaining.remove(0);
        Some((self.keys[o], self.coords[o]))
    }
}

/// A binary heap keyed by `(key, order)`.
///
/// Decreasing a key pushes a new entry, outdated ones are skipped when they
/// surface. Cells start out of the heap since their key is infinite.
#[derive(Debug)]
pub struct HeapFrontier<C: Cost> {
    open: BinaryHeap<Reverse<(C, usize, Coord)>>,
    /// Current key of every cell, indexed by order.
    keys: Vec<C>,
    removed: Vec<bool>,
}

impl<C: Cost> HeapFrontier<C> {
    #[inline(always)]
    #[cfg(not(feature = "verify"))]
    fn verify(&self) {}

    #[inline(always)]
    #[cfg(feature = "verify")]
    fn verify(&self) {
        // Every cell with a finite key that's still around has a live entry.
        for (o, key) in self.keys.iter().enumerate() {
            if self.removed[o] || !key.valid() {
                continue;
            }
            debug_assert!(
                self.open
                    .iter()
                    .any(|Reverse((k, order, _))| *order == o && k == key),
                "Cell #{o} with key {key} has no entry in the heap"
            );
        }
    }
}

impl<C: Cost> Frontier<C> for HeapFrontier<C> {
    fn with_grid(grid: &Grid) -> Self {
        Self {
            open: BinaryHeap::new(),
            keys: vec![C::infinity(); grid.len()],
            removed: vec![false; grid.len()],
        }
    }

    fn update(&mut self, order: usize, coord: Coord, key: C) {
        debug_assert!(!self.removed[order], "{coord} already left the frontier");
        debug_assert!(key < self.keys[order], "Keys only go down");
        self.keys[order] = key;
        self.open.push(Reverse((key, order, coord)));
        self.verify();
    }

    fn pop_min(&mut self) -> Option<(C, Coord)> {
        while let Some(Reverse((key, order, coord))) = self.open.pop() {
            if self.removed[order] || key != self.keys[order] {
                continue;
            }
            self.removed[order] = true;
            self.verify();
            return Some((key, coord));
        }
        None
    }
}
