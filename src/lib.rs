//! Black/white sliding-tile puzzle solver
//!
//! A puzzle is a row of black (`b`) and white (`w`) tiles with a single
//! blank (`x`). A move swaps the blank with any tile; the goal is all black
//! tiles, the blank, then all white tiles. The search engine solves it with
//! breadth-first, depth-first, uniform-cost, greedy or A* search.

pub mod cli;
pub mod error;
pub mod puzzle;
pub mod render;
pub mod search;

pub use error::{Error, Result};
pub use puzzle::{validate, CostModel, Tile, TileSequence};
pub use search::{
    ExhaustReason, Outcome, SearchConfig, SearchEngine, SearchStats, Solution, Step, Strategy,
};

/// Validates `puzzle` and runs one search over it.
pub fn solve(puzzle: &str, config: SearchConfig) -> Result<Outcome> {
    let initial = TileSequence::parse(puzzle)?;
    Ok(SearchEngine::new(config).run(initial))
}
