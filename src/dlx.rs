//! Exact-cover engine (Algorithm X).
//!
//! The cover matrix has one column per container cell plus one column per
//! piece slot (one slot for each available unit of a piece, enforcing the
//! per-piece cap). Rows are canonically-deduplicated candidate placements
//! expanded across the slots of their piece. The column/row incidence is
//! kept in index vectors with active flags; cover and uncover walk them in
//! reverse order, which gives the same set-cover semantics as the classic
//! dancing-links representation.

use std::time::Instant;

use log::{debug, info};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::candidates::{CandidateSet, DedupMode};
use crate::container::Container;
use crate::events::{
    tie_shuffle, tie_shuffle_by, DoneMetrics, EventSink, ShufflePolicy, SolveEvent, SolveOptions,
    StopCause, TickMetrics,
};
use crate::inventory::{enumerate_combinations, PieceCounts};
use crate::pieces::{label_char, PieceLibrary};
use crate::solution::{build_record, PlacementRecord, SignatureSet};
use crate::Engine;

/// The exact-cover engine.
pub struct DlxEngine;

impl Engine for DlxEngine {
    fn name(&self) -> &'static str {
        "dlx"
    }

    fn solve(
        &self,
        container: &Container,
        inventory: &PieceCounts,
        library: &PieceLibrary,
        options: &SolveOptions,
        sink: &mut dyn EventSink,
    ) {
        let start = Instant::now();
        let combinations =
            enumerate_combinations(inventory, library, container.len(), &[]);
        info!(
            "dlx solve: {} cells, {} symmetries, {} combinations",
            container.len(),
            container.symmetry_group().len(),
            combinations.len()
        );

        let mut run = DlxRun {
            container,
            options,
            start,
            signatures: SignatureSet::default(),
            rng: ChaCha8Rng::seed_from_u64(options.seed),
            nodes: 0,
            pruned: 0,
            best_depth: 0,
            solutions: 0,
            rows_built: 0,
            capped_by_rows: false,
            last_tick_ms: 0,
            partial: Vec::new(),
        };

        let mut cause = StopCause::Exhausted;
        let mut cancelled = false;

        if options.max_results == 0 {
            cause = StopCause::MaxResults;
        } else {
            for (combo_index, combo) in combinations.iter().enumerate() {
                let candidates = CandidateSet::generate(
                    container,
                    library,
                    combo,
                    DedupMode::CanonicalAndDominance,
                    options.caps.max_rows,
                );
                let mut matrix = Matrix::build(container, combo, &candidates, options.caps.max_rows);
                run.rows_built += matrix.rows() as u64;
                run.capped_by_rows |= candidates.capped || matrix.capped;
                debug!(
                    "dlx combination {combo_index}: {} candidates, {} rows",
                    candidates.len(),
                    matrix.rows()
                );
                run.partial.clear();
                match run.search(&mut matrix, &candidates, 0, sink) {
                    Flow::Continue => {}
                    Flow::Stop(stop) => {
                        cause = stop;
                        break;
                    }
                    Flow::Cancelled => {
                        cancelled = true;
                        break;
                    }
                }
            }
        }

        if !cancelled {
            sink.emit(SolveEvent::Done {
                t_ms: start.elapsed().as_millis() as u64,
                metrics: DoneMetrics {
                    solutions: run.solutions,
                    nodes: run.nodes,
                    pruned: run.pruned,
                    best_depth: run.best_depth,
                    sym_group: container.symmetry_group().len(),
                    seed: options.seed,
                    combinations: combinations.len() as u64,
                    stop: cause,
                    depth_capped: false,
                    rows_built: Some(run.rows_built),
                    capped_by_rows: run.capped_by_rows,
                },
            });
        }
    }
}

enum Flow {
    Continue,
    Stop(StopCause),
    Cancelled,
}

/// Cover matrix for one combination. Columns `0..cell_cols` are container
/// cells; the rest are piece slots.
struct Matrix {
    cell_cols: usize,
    col_rows: Vec<Vec<usize>>,
    row_cols: Vec<Vec<usize>>,
    /// Candidate index behind each row.
    row_cand: Vec<usize>,
    col_active: Vec<bool>,
    row_active: Vec<bool>,
    /// Active rows per column.
    col_count: Vec<usize>,
    active_cell_cols: usize,
    active_cols: usize,
    capped: bool,
}

impl Matrix {
    fn build(
        container: &Container,
        combo: &PieceCounts,
        candidates: &CandidateSet,
        max_rows: u64,
    ) -> Self {
        let cell_cols = container.len();

        // One slot column per available unit of each piece.
        let mut slot_base = vec![usize::MAX; crate::pieces::NUM_PIECES];
        let mut num_cols = cell_cols;
        for (piece, count) in combo.iter_nonzero() {
            slot_base[piece] = num_cols;
            num_cols += count as usize;
        }

        let mut col_rows: Vec<Vec<usize>> = vec![Vec::new(); num_cols];
        let mut row_cols: Vec<Vec<usize>> = Vec::new();
        let mut row_cand: Vec<usize> = Vec::new();
        let mut capped = false;

        'expand: for (ci, candidate) in candidates.candidates.iter().enumerate() {
            for slot in 0..combo.get(candidate.piece) as usize {
                if max_rows > 0 && row_cols.len() as u64 >= max_rows {
                    capped = true;
                    break 'expand;
                }
                let row = row_cols.len();
                let mut cols: Vec<usize> = candidate.covered.iter_ones().collect();
                cols.push(slot_base[candidate.piece] + slot);
                for &c in &cols {
                    col_rows[c].push(row);
                }
                row_cols.push(cols);
                row_cand.push(ci);
            }
        }

        let col_count: Vec<usize> = col_rows.iter().map(|rows| rows.len()).collect();
        let row_active = vec![true; row_cand.len()];
        Self {
            cell_cols,
            col_rows,
            row_cols,
            row_cand,
            col_active: vec![true; num_cols],
            row_active,
            col_count,
            active_cell_cols: cell_cols,
            active_cols: num_cols,
            capped,
        }
    }

    fn rows(&self) -> usize {
        self.row_cand.len()
    }

    /// MRV over active cell columns; lowest index wins ties.
    fn choose_column(&self) -> Option<usize> {
        let mut best: Option<(usize, usize)> = None;
        for col in 0..self.cell_cols {
            if !self.col_active[col] {
                continue;
            }
            let count = self.col_count[col];
            if best.map_or(true, |(held, _)| count < held) {
                best = Some((count, col));
                if count == 0 {
                    break;
                }
            }
        }
        best.map(|(_, col)| col)
    }

    /// Removes a column and every active row intersecting it, recording the
    /// removed rows for `uncover`.
    fn cover(&mut self, col: usize, removed: &mut Vec<usize>) {
        debug_assert!(self.col_active[col]);
        self.col_active[col] = false;
        self.active_cols -= 1;
        if col < self.cell_cols {
            self.active_cell_cols -= 1;
        }
        for i in 0..self.col_rows[col].len() {
            let row = self.col_rows[col][i];
            if self.row_active[row] {
                self.row_active[row] = false;
                removed.push(row);
                for j in 0..self.row_cols[row].len() {
                    let c = self.row_cols[row][j];
                    self.col_count[c] -= 1;
                }
            }
        }
    }

    /// Restores a cover in exact reverse order.
    fn uncover(&mut self, col: usize, removed: &[usize]) {
        for &row in removed.iter().rev() {
            self.row_active[row] = true;
            for j in 0..self.row_cols[row].len() {
                let c = self.row_cols[row][j];
                self.col_count[c] += 1;
            }
        }
        self.col_active[col] = true;
        self.active_cols += 1;
        if col < self.cell_cols {
            self.active_cell_cols += 1;
        }
    }
}

struct DlxRun<'a> {
    container: &'a Container,
    options: &'a SolveOptions,
    start: Instant,
    signatures: SignatureSet,
    rng: ChaCha8Rng,
    nodes: u64,
    pruned: u64,
    best_depth: u32,
    solutions: u64,
    rows_built: u64,
    capped_by_rows: bool,
    last_tick_ms: u64,
    partial: Vec<usize>,
}

impl DlxRun<'_> {
    fn search(
        &mut self,
        matrix: &mut Matrix,
        candidates: &CandidateSet,
        depth: u32,
        sink: &mut dyn EventSink,
    ) -> Flow {
        let caps = self.options.caps;
        if self.options.time_limit > 0.0
            && self.start.elapsed().as_secs_f64() >= self.options.time_limit
        {
            return Flow::Stop(StopCause::TimeLimit);
        }
        if caps.max_nodes > 0 && self.nodes >= caps.max_nodes {
            return Flow::Stop(StopCause::MaxNodes);
        }
        if !self.maybe_tick(matrix, depth, sink) {
            return Flow::Cancelled;
        }
        self.best_depth = self.best_depth.max(depth);

        if matrix.active_cell_cols == 0 {
            return self.emit_solution(matrix, candidates, sink);
        }

        let Some(col) = matrix.choose_column() else {
            return Flow::Continue;
        };
        if matrix.col_count[col] == 0 {
            self.pruned += 1;
            return Flow::Continue;
        }

        let mut rows: Vec<usize> = matrix.col_rows[col]
            .iter()
            .copied()
            .filter(|&r| matrix.row_active[r])
            .collect();
        match self.options.shuffle {
            ShufflePolicy::None => {}
            ShufflePolicy::TiesOnly => {
                let seed = self.rng.next_u64();
                tie_shuffle_by(&mut rows, seed, |&r| {
                    candidates.candidates[matrix.row_cand[r]].piece
                });
            }
            ShufflePolicy::Full => {
                let seed = self.rng.next_u64();
                tie_shuffle(&mut rows, seed);
            }
        }

        for row in rows {
            if !matrix.row_active[row] {
                continue;
            }
            self.nodes += 1;
            self.partial.push(row);
            let cols: Vec<usize> = matrix.row_cols[row].clone();
            let mut removed: Vec<(usize, Vec<usize>)> = Vec::with_capacity(cols.len());
            for &c in &cols {
                let mut gone = Vec::new();
                matrix.cover(c, &mut gone);
                removed.push((c, gone));
            }

            let flow = self.search(matrix, candidates, depth + 1, sink);

            for (c, gone) in removed.into_iter().rev() {
                matrix.uncover(c, &gone);
            }
            self.partial.pop();

            if !matches!(flow, Flow::Continue) {
                return flow;
            }
        }
        Flow::Continue
    }

    fn emit_solution(
        &mut self,
        matrix: &Matrix,
        candidates: &CandidateSet,
        sink: &mut dyn EventSink,
    ) -> Flow {
        let placements: Vec<PlacementRecord> = self
            .partial
            .iter()
            .map(|&row| {
                let candidate = &candidates.candidates[matrix.row_cand[row]];
                PlacementRecord {
                    piece: label_char(candidate.piece),
                    ori: candidate.ori,
                    t: candidate.t,
                    coordinates: candidate.cells.clone(),
                }
            })
            .collect();
        let record = build_record("dlx", self.container, placements);

        if !self.signatures.insert(&record.sid_state_canon_sha256) {
            return Flow::Continue;
        }
        self.solutions += 1;
        if !sink.emit(SolveEvent::Solution {
            t_ms: self.start.elapsed().as_millis() as u64,
            solution: record,
        }) {
            return Flow::Cancelled;
        }
        if self.solutions >= self.options.max_results {
            return Flow::Stop(StopCause::MaxResults);
        }
        Flow::Continue
    }

    fn maybe_tick(&mut self, matrix: &Matrix, depth: u32, sink: &mut dyn EventSink) -> bool {
        let interval = self.options.progress_interval_ms;
        if interval == 0 {
            return true;
        }
        let now = self.start.elapsed().as_millis() as u64;
        if now.saturating_sub(self.last_tick_ms) < interval {
            return true;
        }
        self.last_tick_ms = now;
        sink.emit(SolveEvent::Tick {
            t_ms: now,
            metrics: TickMetrics {
                nodes: self.nodes,
                pruned: self.pruned,
                depth,
                best_depth: self.best_depth,
                solutions: self.solutions,
                rows: Some(matrix.rows() as u64),
                active_cols: Some(matrix.active_cols as u64),
            },
        })
    }
}
