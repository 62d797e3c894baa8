//! Engine protocol: solve options, the event stream, and tie-shuffling.
//!
//! Every engine produces the same stream shape: any number of `tick` and
//! `solution` events followed by exactly one `done` event, all carrying a
//! relative-time field in milliseconds since the solve started. Engines
//! yield control only at event boundaries; a sink returning `false` cancels
//! the search.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::solution::SolutionRecord;

/// Structural caps. Any positive value is an active limit; 0 is unlimited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caps {
    #[serde(rename = "maxNodes", default)]
    pub max_nodes: u64,
    #[serde(rename = "maxDepth", default)]
    pub max_depth: u32,
    #[serde(rename = "maxRows", default)]
    pub max_rows: u64,
}

/// DFS ordering heuristics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flags {
    #[serde(rename = "mrvPieces", default)]
    pub mrv_pieces: bool,
    #[serde(rename = "supportBias", default)]
    pub support_bias: bool,
}

/// Hole-pruning mode for the DFS engine. Only meaningful for uniform
/// 4-cell libraries, where an empty component smaller than 4 is unfillable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HolePruning {
    #[default]
    None,
    /// Prune when any connected empty component has fewer than 4 cells.
    Lt4,
    /// Prune unless the empty cells form a single component.
    SingleComponent,
}

/// Row-ordering shuffle policy for the DLX engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShufflePolicy {
    #[default]
    None,
    /// Shuffle only rows that tie under the deterministic base order.
    TiesOnly,
    /// Shuffle the whole candidate row list.
    Full,
}

/// Options accepted by `Engine::solve`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SolveOptions {
    /// Seed for every tie-shuffle and internal RNG.
    pub seed: u64,
    /// Stop after this many distinct solutions (post-deduplication).
    pub max_results: u64,
    /// Wall-clock cap in seconds; 0 is unlimited.
    pub time_limit: f64,
    pub caps: Caps,
    /// Tick cadence in milliseconds; 0 emits no ticks.
    pub progress_interval_ms: u64,
    pub flags: Flags,
    pub hole_pruning: HolePruning,
    /// Depth-0 anchor symmetry break (DFS): keep one orientation per
    /// canonical class for the lowest available piece. A search-space
    /// reduction that can sacrifice completeness on some containers.
    pub anchor_rule: bool,
    /// When positive, rotate the depth-0 piece preference every this many
    /// combinations.
    pub pivot_cycle: u64,
    pub shuffle: ShufflePolicy,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            seed: 0,
            max_results: 1,
            time_limit: 0.0,
            caps: Caps::default(),
            progress_interval_ms: 0,
            flags: Flags::default(),
            hole_pruning: HolePruning::default(),
            anchor_rule: false,
            pivot_cycle: 0,
            shuffle: ShufflePolicy::default(),
        }
    }
}

/// Why a solve terminated. Budget stops are normal terminations, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopCause {
    /// Search space exhausted.
    Exhausted,
    /// The requested number of solutions was emitted.
    MaxResults,
    TimeLimit,
    MaxNodes,
    MaxRows,
}

/// Periodic progress counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickMetrics {
    pub nodes: u64,
    pub pruned: u64,
    pub depth: u32,
    #[serde(rename = "bestDepth")]
    pub best_depth: u32,
    pub solutions: u64,
    /// DLX only: rows built so far.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub rows: Option<u64>,
    /// DLX only: currently active columns.
    #[serde(rename = "activeCols", skip_serializing_if = "Option::is_none", default)]
    pub active_cols: Option<u64>,
}

/// Final counters carried by the `done` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoneMetrics {
    pub solutions: u64,
    pub nodes: u64,
    pub pruned: u64,
    #[serde(rename = "bestDepth")]
    pub best_depth: u32,
    #[serde(rename = "symGroup")]
    pub sym_group: usize,
    pub seed: u64,
    /// Combinations attempted by the outer loop.
    pub combinations: u64,
    pub stop: StopCause,
    /// True when the depth cap pruned at least one branch.
    #[serde(rename = "depthCapped", default)]
    pub depth_capped: bool,
    /// DLX only: total matrix rows built.
    #[serde(rename = "rowsBuilt", skip_serializing_if = "Option::is_none", default)]
    pub rows_built: Option<u64>,
    /// DLX only: row construction hit `caps.maxRows`.
    #[serde(rename = "cappedByRows", default)]
    pub capped_by_rows: bool,
}

/// One event in the solve stream. `t_ms` is milliseconds since solve start;
/// within one stream the times are monotonically non-decreasing and `done`
/// is last.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SolveEvent {
    Tick { t_ms: u64, metrics: TickMetrics },
    Solution { t_ms: u64, solution: SolutionRecord },
    Done { t_ms: u64, metrics: DoneMetrics },
}

impl SolveEvent {
    pub fn t_ms(&self) -> u64 {
        match self {
            SolveEvent::Tick { t_ms, .. }
            | SolveEvent::Solution { t_ms, .. }
            | SolveEvent::Done { t_ms, .. } => *t_ms,
        }
    }
}

/// Consumer of a solve stream. Returning `false` cancels the search; the
/// engine unwinds without emitting further events.
pub trait EventSink {
    fn emit(&mut self, event: SolveEvent) -> bool;
}

impl<F: FnMut(SolveEvent) -> bool> EventSink for F {
    fn emit(&mut self, event: SolveEvent) -> bool {
        self(event)
    }
}

/// Sink that stores every event.
#[derive(Debug, Default)]
pub struct CollectSink {
    pub events: Vec<SolveEvent>,
}

impl EventSink for CollectSink {
    fn emit(&mut self, event: SolveEvent) -> bool {
        self.events.push(event);
        true
    }
}

/// Deterministically shuffles a slice with a generator seeded only by
/// `seed`: equal seeds give equal permutations on every platform.
pub fn tie_shuffle<T>(items: &mut [T], seed: u64) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    items.shuffle(&mut rng);
}

/// Shuffles only runs of items that compare equal under `key`, leaving the
/// relative order of distinct keys untouched.
pub fn tie_shuffle_by<T, K: Eq, F: Fn(&T) -> K>(items: &mut [T], seed: u64, key: F) {
    let mut start = 0;
    while start < items.len() {
        let mut end = start + 1;
        while end < items.len() && key(&items[end]) == key(&items[start]) {
            end += 1;
        }
        if end - start > 1 {
            tie_shuffle(&mut items[start..end], seed);
        }
        start = end;
    }
}
