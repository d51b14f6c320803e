//! Implementation of search algorithms.
//!
//! Both searches finalise cells one at a time and can be driven as iterators
//! over the visited cells, or run to completion.

pub mod astar;
pub mod dijkstra;
