//! Depth-first backtracking engine.
//!
//! The search object owns the occupancy bitset, placement stack, remaining
//! piece counts, and the transposition table; recursion mutates and
//! restores them in place. The outer loop walks piece combinations in
//! enumeration order, sharing the emitted-signature set across the whole
//! run so rotation-equivalent solutions are emitted once.

use std::time::Instant;

use log::{debug, info};
use rustc_hash::FxHashSet;

use crate::bitset::BitSet;
use crate::candidates::{CandidateSet, DedupMode};
use crate::canonical::canon_under;
use crate::container::Container;
use crate::events::{
    DoneMetrics, EventSink, HolePruning, SolveEvent, SolveOptions, StopCause, TickMetrics,
};
use crate::inventory::{enumerate_combinations, PieceCounts};
use crate::lattice::Cell;
use crate::pieces::{label_char, PieceLibrary};
use crate::solution::{build_record, PlacementRecord, SignatureSet};
use crate::Engine;

/// The DFS engine.
pub struct DfsEngine;

impl Engine for DfsEngine {
    fn name(&self) -> &'static str {
        "dfs"
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
            "dfs solve: {} cells, {} symmetries, {} combinations",
            container.len(),
            container.symmetry_group().len(),
            combinations.len()
        );

        let mut run = DfsRun {
            container,
            options,
            start,
            signatures: SignatureSet::default(),
            nodes: 0,
            pruned: 0,
            best_depth: 0,
            solutions: 0,
            depth_capped: false,
            last_tick_ms: 0,
            combo_index: 0,
            occupied: BitSet::new(container.len()),
            remaining: PieceCounts::default(),
            stack: Vec::new(),
            seen_masks: FxHashSet::default(),
        };

        let mut cause = StopCause::Exhausted;
        let mut cancelled = false;

        if options.max_results == 0 {
            cause = StopCause::MaxResults;
        } else {
            for (combo_index, combo) in combinations.iter().enumerate() {
                debug!("dfs combination {combo_index}: {combo:?}");
                let candidates =
                    CandidateSet::generate(container, library, combo, DedupMode::None, 0);
                run.combo_index = combo_index;
                run.occupied = BitSet::new(container.len());
                run.remaining = combo.clone();
                run.stack.clear();
                run.seen_masks.clear();
                match run.dfs(0, &candidates, sink) {
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
                    depth_capped: run.depth_capped,
                    rows_built: None,
                    capped_by_rows: false,
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

struct DfsRun<'a> {
    container: &'a Container,
    options: &'a SolveOptions,
    start: Instant,
    signatures: SignatureSet,
    nodes: u64,
    pruned: u64,
    best_depth: u32,
    solutions: u64,
    depth_capped: bool,
    last_tick_ms: u64,
    combo_index: usize,
    occupied: BitSet,
    remaining: PieceCounts,
    stack: Vec<usize>,
    seen_masks: FxHashSet<BitSet>,
}

impl DfsRun<'_> {
    fn dfs(&mut self, depth: u32, candidates: &CandidateSet, sink: &mut dyn EventSink) -> Flow {
        let caps = self.options.caps;
        if self.options.time_limit > 0.0
            && self.start.elapsed().as_secs_f64() >= self.options.time_limit
        {
            return Flow::Stop(StopCause::TimeLimit);
        }
        if caps.max_nodes > 0 && self.nodes >= caps.max_nodes {
            return Flow::Stop(StopCause::MaxNodes);
        }
        if !self.maybe_tick(depth, sink) {
            return Flow::Cancelled;
        }
        self.best_depth = self.best_depth.max(depth);

        if self.occupied == *self.container.full_mask() {
            return self.emit_solution(candidates, sink);
        }

        if caps.max_depth > 0 && depth >= caps.max_depth {
            // Prune below the cap but keep exploring elsewhere.
            self.depth_capped = true;
            self.pruned += 1;
            return Flow::Continue;
        }

        let empty = self.occupied.complement();
        let Some(target) = self.select_target(candidates, &empty) else {
            return Flow::Continue;
        };
        let order = self.order_candidates(depth, target, candidates);

        for idx in order {
            let candidate = &candidates.candidates[idx];
            self.remaining.decrement(candidate.piece);
            self.occupied.union_with(&candidate.covered);
            self.stack.push(idx);
            self.nodes += 1;

            let flow = if !self.seen_masks.insert(self.occupied.clone()) {
                self.pruned += 1;
                Flow::Continue
            } else if !self.holes_ok() {
                self.pruned += 1;
                Flow::Continue
            } else {
                self.dfs(depth + 1, candidates, sink)
            };

            self.stack.pop();
            self.occupied.difference_with(&candidate.covered);
            self.remaining.increment(candidate.piece);

            if !matches!(flow, Flow::Continue) {
                return flow;
            }
        }
        Flow::Continue
    }

    /// Builds the placement order for one target cell: feasible candidates
    /// in (piece, ori) base order, optionally re-ranked by support bias,
    /// with a seeded shuffle breaking remaining ties. Depth 0 additionally
    /// applies the anchor symmetry break and the pivot rotation.
    fn order_candidates(
        &self,
        depth: u32,
        target: usize,
        candidates: &CandidateSet,
    ) -> Vec<usize> {
        let mut order: Vec<usize> = candidates.covers_by_cell[target]
            .iter()
            .copied()
            .filter(|&i| self.is_feasible(&candidates.candidates[i]))
            .collect();

        if self.options.flags.support_bias {
            let score = |i: usize| -> i64 {
                let candidate = &candidates.candidates[i];
                let mut contact = candidate.covered.clone();
                contact.union_with(&self.occupied);
                let mut neighbors = BitSet::new(self.container.len());
                for bit in candidate.covered.iter_ones() {
                    neighbors.union_with(self.container.neighbor_mask(bit));
                }
                neighbors.intersect_with(&contact);
                neighbors.count_ones() as i64
            };
            order.sort_by_key(|&i| {
                let c = &candidates.candidates[i];
                (-score(i), c.piece, c.ori)
            });
            crate::events::tie_shuffle_by(&mut order, self.options.seed, |&i| {
                let c = &candidates.candidates[i];
                (score(i), c.piece, c.ori)
            });
        } else {
            crate::events::tie_shuffle_by(&mut order, self.options.seed, |&i| {
                let c = &candidates.candidates[i];
                (c.piece, c.ori)
            });
        }

        if depth == 0 {
            if self.options.anchor_rule && target == 0 {
                order = self.anchor_filter(order, target, candidates);
            }
            if self.options.pivot_cycle > 0 && !order.is_empty() {
                let step = self.combo_index as u64 / self.options.pivot_cycle;
                let rot = ((step + self.options.seed) % order.len() as u64) as usize;
                order.rotate_left(rot);
            }
        }
        order
    }

    #[inline]
    fn is_feasible(&self, candidate: &crate::candidates::Candidate) -> bool {
        self.remaining.get(candidate.piece) > 0 && !self.occupied.intersects(&candidate.covered)
    }

    /// Depth-0 symmetry break: among candidates of the lowest available
    /// piece, keep one representative per canonical covered-shape class.
    fn anchor_filter(
        &self,
        order: Vec<usize>,
        target: usize,
        candidates: &CandidateSet,
    ) -> Vec<usize> {
        let Some(lowest) = order
            .iter()
            .map(|&i| candidates.candidates[i].piece)
            .min()
        else {
            return order;
        };
        let anchor = self.container.cell(target);
        let mut seen: FxHashSet<Vec<Cell>> = FxHashSet::default();
        order
            .into_iter()
            .filter(|&i| {
                let candidate = &candidates.candidates[i];
                if candidate.piece != lowest {
                    return true;
                }
                let relative: Vec<Cell> = candidate
                    .cells
                    .iter()
                    .map(|&(x, y, z)| (x - anchor.0, y - anchor.1, z - anchor.2))
                    .collect();
                seen.insert(canon_under(&relative, self.container.symmetry_group()))
            })
            .collect()
    }

    /// Lowest-indexed empty cell, refined by MRV (fewest feasible
    /// candidates) and support bias (most occupied neighbours).
    fn select_target(&self, candidates: &CandidateSet, empty: &BitSet) -> Option<usize> {
        let flags = &self.options.flags;
        if !flags.mrv_pieces && !flags.support_bias {
            return empty.first_one();
        }
        let mut best: Option<((u64, i64, usize), usize)> = None;
        for cell in empty.iter_ones() {
            let feasible = if flags.mrv_pieces {
                candidates.covers_by_cell[cell]
                    .iter()
                    .filter(|&&i| self.is_feasible(&candidates.candidates[i]))
                    .count() as u64
            } else {
                0
            };
            let support = if flags.support_bias {
                let mut nbrs = self.container.neighbor_mask(cell).clone();
                nbrs.intersect_with(&self.occupied);
                nbrs.count_ones() as i64
            } else {
                0
            };
            let key = (feasible, -support, cell);
            if best.as_ref().map_or(true, |(held, _)| key < *held) {
                best = Some((key, cell));
            }
        }
        best.map(|(_, cell)| cell)
    }

    /// Flood-fills the empty cells and applies the configured hole rule.
    fn holes_ok(&self) -> bool {
        let mode = self.options.hole_pruning;
        if mode == HolePruning::None {
            return true;
        }
        let mut remaining = self.occupied.complement();
        let mut components = 0u32;
        let mut frontier: Vec<usize> = Vec::new();
        while let Some(seed) = remaining.first_one() {
            components += 1;
            if mode == HolePruning::SingleComponent && components > 1 {
                return false;
            }
            let mut size = 0usize;
            remaining.clear(seed);
            frontier.push(seed);
            while let Some(cell) = frontier.pop() {
                size += 1;
                let mut nbrs = self.container.neighbor_mask(cell).clone();
                nbrs.intersect_with(&remaining);
                for next in nbrs.iter_ones() {
                    remaining.clear(next);
                    frontier.push(next);
                }
            }
            if mode == HolePruning::Lt4 && size < 4 {
                return false;
            }
        }
        true
    }

    fn emit_solution(&mut self, candidates: &CandidateSet, sink: &mut dyn EventSink) -> Flow {
        let placements: Vec<PlacementRecord> = self
            .stack
            .iter()
            .map(|&idx| {
                let candidate = &candidates.candidates[idx];
                PlacementRecord {
                    piece: label_char(candidate.piece),
                    ori: candidate.ori,
                    t: candidate.t,
                    coordinates: candidate.cells.clone(),
                }
            })
            .collect();
        let record = build_record("dfs", self.container, placements);

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

    /// Emits a tick when the configured interval has elapsed. Returns false
    /// when the sink cancelled the stream.
    fn maybe_tick(&mut self, depth: u32, sink: &mut dyn EventSink) -> bool {
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
                rows: None,
                active_cols: None,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::canonical_state_signature;
    use crate::pieces::label_index;
    use crate::solution::verify_record;
    use crate::solve_collect;

    fn counts(pairs: &[(char, u32)]) -> PieceCounts {
        let mut c = PieceCounts::default();
        for &(label, n) in pairs {
            c.set(label_index(label).unwrap(), n);
        }
        c
    }

    fn square() -> Container {
        Container::new(vec![(0, 0, 0), (1, 0, 0), (0, 1, 0), (1, 1, 0)])
    }

    fn solutions_of(events: &[SolveEvent]) -> Vec<crate::solution::SolutionRecord> {
        events
            .iter()
            .filter_map(|e| match e {
                SolveEvent::Solution { solution, .. } => Some(solution.clone()),
                _ => None,
            })
            .collect()
    }

    fn done_of(events: &[SolveEvent]) -> DoneMetrics {
        match events.last().expect("stream must not be empty") {
            SolveEvent::Done { metrics, .. } => metrics.clone(),
            other => panic!("last event must be done, got {other:?}"),
        }
    }

    #[test]
    fn test_exact_fit_single_piece() {
        // Scenario: a 4-cell container covered by one A piece.
        let container = square();
        let events = solve_collect(
            &DfsEngine,
            &container,
            &counts(&[('A', 1)]),
            PieceLibrary::standard(),
            &SolveOptions::default(),
        );
        let sols = solutions_of(&events);
        assert_eq!(sols.len(), 1);
        let sol = &sols[0];
        assert_eq!(sol.placements.len(), 1);
        assert_eq!(sol.placements[0].piece, 'A');
        let mut covered = sol.placements[0].coordinates.clone();
        covered.sort_unstable();
        assert_eq!(covered, container.cells());
        assert_eq!(
            sol.sid_state_canon_sha256,
            canonical_state_signature(container.cells(), container.symmetry_group())
        );
        assert_eq!(verify_record(sol, &container, PieceLibrary::standard()), Ok(()));
        assert_eq!(done_of(&events).solutions, 1);
    }

    #[test]
    fn test_split_container_two_pieces() {
        // Scenario: two disjoint 2x2 patches, each takes one A piece.
        let container = Container::new(vec![
            (0, 0, 0),
            (1, 0, 0),
            (0, 1, 0),
            (1, 1, 0),
            (10, 0, 0),
            (11, 0, 0),
            (10, 1, 0),
            (11, 1, 0),
        ]);
        let events = solve_collect(
            &DfsEngine,
            &container,
            &counts(&[('A', 2)]),
            PieceLibrary::standard(),
            &SolveOptions {
                max_results: 4,
                ..SolveOptions::default()
            },
        );
        let sols = solutions_of(&events);
        assert!(!sols.is_empty());
        for sol in &sols {
            assert_eq!(sol.placements.len(), 2);
            assert!(sol.placements.iter().all(|p| p.piece == 'A'));
            assert_eq!(verify_record(sol, &container, PieceLibrary::standard()), Ok(()));
        }
        let mut sigs: Vec<&str> = sols.iter().map(|s| s.sid_state_canon_sha256.as_str()).collect();
        sigs.sort_unstable();
        let distinct = sigs.len();
        sigs.dedup();
        assert_eq!(sigs.len(), distinct, "emitted signatures must be distinct");
    }

    #[test]
    fn test_insufficient_inventory_finds_nothing() {
        // Scenario: 8 cells but only one 4-cell piece.
        let container = Container::new(vec![
            (0, 0, 0),
            (1, 0, 0),
            (0, 1, 0),
            (1, 1, 0),
            (10, 0, 0),
            (11, 0, 0),
            (10, 1, 0),
            (11, 1, 0),
        ]);
        let events = solve_collect(
            &DfsEngine,
            &container,
            &counts(&[('A', 1)]),
            PieceLibrary::standard(),
            &SolveOptions::default(),
        );
        assert!(solutions_of(&events).is_empty());
        let done = done_of(&events);
        assert_eq!(done.solutions, 0);
        assert_eq!(done.stop, StopCause::Exhausted);
    }

    #[test]
    fn test_runs_are_deterministic() {
        // Scenario: identical inputs and seed give identical streams
        // (timestamps aside).
        let container = square();
        let options = SolveOptions {
            seed: 42,
            max_results: 5,
            ..SolveOptions::default()
        };
        let run = || {
            solve_collect(
                &DfsEngine,
                &container,
                &counts(&[('A', 1), ('E', 1)]),
                PieceLibrary::standard(),
                &options,
            )
        };
        let (a, b) = (run(), run());
        assert_eq!(solutions_of(&a), solutions_of(&b));
        let (da, db) = (done_of(&a), done_of(&b));
        assert_eq!(da.solutions, db.solutions);
        assert_eq!(da.nodes, db.nodes);
        assert_eq!(da.pruned, db.pruned);
    }

    #[test]
    fn test_empty_container_has_one_empty_solution() {
        let container = Container::new(Vec::new());
        let events = solve_collect(
            &DfsEngine,
            &container,
            &PieceCounts::default(),
            PieceLibrary::standard(),
            &SolveOptions::default(),
        );
        let sols = solutions_of(&events);
        assert_eq!(sols.len(), 1);
        assert!(sols[0].placements.is_empty());
    }

    #[test]
    fn test_zero_inventory_on_nonempty_container() {
        let container = square();
        let events = solve_collect(
            &DfsEngine,
            &container,
            &PieceCounts::default(),
            PieceLibrary::standard(),
            &SolveOptions::default(),
        );
        assert!(solutions_of(&events).is_empty());
        let done = done_of(&events);
        assert_eq!(done.solutions, 0);
        assert_eq!(done.combinations, 0);
    }

    #[test]
    fn test_indivisible_container_size_is_unsolvable() {
        let container = Container::new(vec![(0, 0, 0), (1, 0, 0), (0, 1, 0)]);
        let events = solve_collect(
            &DfsEngine,
            &container,
            &counts(&[('A', 1)]),
            PieceLibrary::standard(),
            &SolveOptions::default(),
        );
        assert!(solutions_of(&events).is_empty());
        assert_eq!(done_of(&events).solutions, 0);
    }

    #[test]
    fn test_max_results_zero_emits_only_done() {
        let container = square();
        let events = solve_collect(
            &DfsEngine,
            &container,
            &counts(&[('A', 1)]),
            PieceLibrary::standard(),
            &SolveOptions {
                max_results: 0,
                ..SolveOptions::default()
            },
        );
        assert_eq!(events.len(), 1);
        let done = done_of(&events);
        assert_eq!(done.solutions, 0);
        assert_eq!(done.stop, StopCause::MaxResults);
    }

    #[test]
    fn test_tiny_time_limit_stops_with_time_cause() {
        // Scenario: the budget elapses before any solution.
        let container = square();
        let events = solve_collect(
            &DfsEngine,
            &container,
            &counts(&[('A', 1)]),
            PieceLibrary::standard(),
            &SolveOptions {
                time_limit: 1e-9,
                ..SolveOptions::default()
            },
        );
        assert!(solutions_of(&events).is_empty());
        let done = done_of(&events);
        assert_eq!(done.solutions, 0);
        assert_eq!(done.stop, StopCause::TimeLimit);
    }

    #[test]
    fn test_node_cap_stops_search() {
        let container = Container::new(vec![
            (0, 0, 0),
            (1, 0, 0),
            (0, 1, 0),
            (1, 1, 0),
            (2, 0, 0),
            (2, 1, 0),
            (3, 0, 0),
            (3, 1, 0),
        ]);
        let events = solve_collect(
            &DfsEngine,
            &container,
            &counts(&[('A', 2), ('B', 2), ('E', 2)]),
            PieceLibrary::standard(),
            &SolveOptions {
                max_results: 100,
                caps: crate::events::Caps {
                    max_nodes: 1,
                    ..Default::default()
                },
                ..SolveOptions::default()
            },
        );
        let done = done_of(&events);
        assert_eq!(done.stop, StopCause::MaxNodes);
        assert!(done.nodes <= 2);
    }

    #[test]
    fn test_symmetric_solutions_collapse_to_one() {
        // Scenario: the square admits several rotated placements of the
        // same tiling; dedup leaves exactly one emitted solution.
        let container = square();
        let events = solve_collect(
            &DfsEngine,
            &container,
            &counts(&[('A', 1)]),
            PieceLibrary::standard(),
            &SolveOptions {
                max_results: 10,
                ..SolveOptions::default()
            },
        );
        assert_eq!(solutions_of(&events).len(), 1);
    }

    #[test]
    fn test_hole_pruning_modes_do_not_lose_solutions() {
        let container = Container::new(vec![
            (0, 0, 0),
            (1, 0, 0),
            (0, 1, 0),
            (1, 1, 0),
            (10, 0, 0),
            (11, 0, 0),
            (10, 1, 0),
            (11, 1, 0),
        ]);
        for mode in [HolePruning::None, HolePruning::Lt4] {
            let events = solve_collect(
                &DfsEngine,
                &container,
                &counts(&[('A', 2)]),
                PieceLibrary::standard(),
                &SolveOptions {
                    hole_pruning: mode,
                    ..SolveOptions::default()
                },
            );
            assert_eq!(solutions_of(&events).len(), 1, "mode {mode:?}");
        }
    }

    #[test]
    fn test_single_component_pruning_rejects_split_voids() {
        // Three disjoint patches: covering the first leaves the empty cells
        // split in two, so strict connectivity pruning abandons the branch.
        let cells: Vec<Cell> = [0, 10, 20]
            .iter()
            .flat_map(|&x| [(x, 0, 0), (x + 1, 0, 0), (x, 1, 0), (x + 1, 1, 0)])
            .collect();
        let container = Container::new(cells);
        let events = solve_collect(
            &DfsEngine,
            &container,
            &counts(&[('A', 3)]),
            PieceLibrary::standard(),
            &SolveOptions {
                hole_pruning: HolePruning::SingleComponent,
                ..SolveOptions::default()
            },
        );
        assert!(solutions_of(&events).is_empty());
        assert!(done_of(&events).pruned > 0);

        let unrestricted = solve_collect(
            &DfsEngine,
            &container,
            &counts(&[('A', 3)]),
            PieceLibrary::standard(),
            &SolveOptions::default(),
        );
        assert_eq!(solutions_of(&unrestricted).len(), 1);
    }

    #[test]
    fn test_heuristic_flags_preserve_results() {
        let container = square();
        for flags in [
            crate::events::Flags {
                mrv_pieces: true,
                support_bias: false,
            },
            crate::events::Flags {
                mrv_pieces: false,
                support_bias: true,
            },
            crate::events::Flags {
                mrv_pieces: true,
                support_bias: true,
            },
        ] {
            let events = solve_collect(
                &DfsEngine,
                &container,
                &counts(&[('A', 1)]),
                PieceLibrary::standard(),
                &SolveOptions {
                    flags,
                    ..SolveOptions::default()
                },
            );
            assert_eq!(solutions_of(&events).len(), 1, "flags {flags:?}");
        }
    }

    #[test]
    fn test_anchor_rule_still_finds_the_square_solution() {
        let container = square();
        let events = solve_collect(
            &DfsEngine,
            &container,
            &counts(&[('A', 1)]),
            PieceLibrary::standard(),
            &SolveOptions {
                anchor_rule: true,
                ..SolveOptions::default()
            },
        );
        assert_eq!(solutions_of(&events).len(), 1);
    }

    #[test]
    fn test_cancellation_stops_stream() {
        let container = square();
        let mut events = 0u32;
        let mut sink = |_: SolveEvent| {
            events += 1;
            false
        };
        DfsEngine.solve(
            &container,
            &counts(&[('A', 1)]),
            PieceLibrary::standard(),
            &SolveOptions::default(),
            &mut sink,
        );
        assert_eq!(events, 1, "stream ends at the first rejected event");
    }

    #[test]
    fn test_event_times_are_monotonic() {
        let container = square();
        let events = solve_collect(
            &DfsEngine,
            &container,
            &counts(&[('A', 1)]),
            PieceLibrary::standard(),
            &SolveOptions {
                progress_interval_ms: 1,
                ..SolveOptions::default()
            },
        );
        let times: Vec<u64> = events.iter().map(|e| e.t_ms()).collect();
        assert!(times.windows(2).all(|w| w[0] <= w[1]));
        assert!(matches!(events.last(), Some(SolveEvent::Done { .. })));
    }
}
