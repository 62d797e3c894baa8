//! FCC Ball Puzzle Solver Library
//!
//! Exact-tiling search over containers on the face-centered cubic lattice.
//! Two engines implement the same streaming contract: a depth-first
//! backtracking search with bitmask state and an Algorithm X exact-cover
//! search. Both consume the shared lattice, piece, candidate, and signature
//! layers and emit `tick` / `solution` / `done` events through an
//! [`EventSink`].

pub mod bitset;
pub mod candidates;
pub mod canonical;
pub mod container;
pub mod dfs;
pub mod dlx;
pub mod events;
pub mod inventory;
pub mod lattice;
pub mod persistence;
pub mod pieces;
pub mod render;
pub mod solution;

use container::Container;
use events::{CollectSink, EventSink, SolveEvent, SolveOptions};
use inventory::PieceCounts;
use pieces::PieceLibrary;

/// A solver engine: one search strategy behind the shared streaming
/// contract. `solve` emits any number of tick and solution events followed
/// by one done event; a sink returning `false` cancels the stream.
pub trait Engine {
    fn name(&self) -> &'static str;

    fn solve(
        &self,
        container: &Container,
        inventory: &PieceCounts,
        library: &PieceLibrary,
        options: &SolveOptions,
        sink: &mut dyn EventSink,
    );
}

/// Looks up an engine by its registry name.
pub fn engine(name: &str) -> Option<&'static dyn Engine> {
    match name {
        "dfs" => Some(&dfs::DfsEngine),
        "dlx" => Some(&dlx::DlxEngine),
        _ => None,
    }
}

/// Names of the available engines.
pub const ENGINE_NAMES: [&str; 2] = ["dfs", "dlx"];

/// Runs a solve to completion and returns the full event stream.
pub fn solve_collect(
    engine: &dyn Engine,
    container: &Container,
    inventory: &PieceCounts,
    library: &PieceLibrary,
    options: &SolveOptions,
) -> Vec<SolveEvent> {
    let mut sink = CollectSink::default();
    engine.solve(container, inventory, library, options, &mut sink);
    sink.events
}
