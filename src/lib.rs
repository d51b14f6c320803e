use shadow_rs::shadow;

shadow!(build);

// Board
// -----
pub mod cost;
pub mod grid;
pub mod problem;

// Search internals
// ----------------
pub mod frontier;
pub mod search;

// Algorithms
// ----------
pub mod algorithms;
pub mod run;

// Front-end
// ---------
pub mod render;
