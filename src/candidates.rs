//! Candidate placement generation.
//!
//! A candidate is a piece orientation translated so that every covered cell
//! lies inside the container. The generator walks pieces in label order,
//! orientations in index order, and anchor cells in container order, so the
//! candidate list is deterministic. A per-cell reverse index
//! (`covers_by_cell`) supports target-cell lookups in both engines.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::bitset::BitSet;
use crate::canonical::canon_fixed;
use crate::container::Container;
use crate::inventory::PieceCounts;
use crate::lattice::Cell;
use crate::pieces::PieceLibrary;

/// A legal placement of one piece inside the container.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Label index of the piece.
    pub piece: usize,
    /// Orientation index within the piece's orientation list.
    pub ori: usize,
    /// Translation applied to the orientation.
    pub t: Cell,
    /// Covered cells, sorted ascending.
    pub cells: Vec<Cell>,
    /// Covered cells as container-bit mask.
    pub covered: BitSet,
}

/// How aggressively duplicate candidates are removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupMode {
    /// Keep every distinct (piece, orientation, translation).
    None,
    /// Keep one representative per (piece, canonical covered-set) class.
    Canonical,
    /// Canonical reduction plus dominance: among candidates covering the
    /// identical cell-set, keep the best-scoring one.
    CanonicalAndDominance,
}

/// The candidate list for one (container, combination) pair, immutable
/// during search.
#[derive(Debug)]
pub struct CandidateSet {
    pub candidates: Vec<Candidate>,
    /// For every container-cell index, the candidate indices covering it.
    pub covers_by_cell: Vec<Vec<usize>>,
    /// True when generation stopped early at `max_candidates`.
    pub capped: bool,
}

impl CandidateSet {
    /// Enumerates legal placements for every piece with a positive count.
    ///
    /// `max_candidates` bounds the list when positive; hitting the bound
    /// sets `capped`.
    pub fn generate(
        container: &Container,
        library: &PieceLibrary,
        counts: &PieceCounts,
        dedup: DedupMode,
        max_candidates: u64,
    ) -> Self {
        let mut candidates: Vec<Candidate> = Vec::new();
        let mut seen_translations: FxHashSet<(usize, usize, Cell)> = FxHashSet::default();
        let mut seen_canonical: FxHashSet<(usize, Vec<Cell>)> = FxHashSet::default();
        let mut capped = false;

        'pieces: for (piece_idx, _) in counts.iter_nonzero() {
            let piece = library.piece(piece_idx);
            for (ori_idx, orientation) in piece.orientations.iter().enumerate() {
                for &anchor in container.cells() {
                    for &atom in orientation {
                        let t = (anchor.0 - atom.0, anchor.1 - atom.1, anchor.2 - atom.2);
                        if !seen_translations.insert((piece_idx, ori_idx, t)) {
                            continue;
                        }
                        let Some(candidate) =
                            try_place(container, piece_idx, ori_idx, orientation, t)
                        else {
                            continue;
                        };
                        if dedup != DedupMode::None
                            && !seen_canonical.insert((piece_idx, canon_fixed(&candidate.cells)))
                        {
                            continue;
                        }
                        candidates.push(candidate);
                        if max_candidates > 0 && candidates.len() as u64 >= max_candidates {
                            capped = true;
                            break 'pieces;
                        }
                    }
                }
            }
        }

        if dedup == DedupMode::CanonicalAndDominance {
            candidates = reduce_dominated(candidates, counts);
        }

        let mut covers_by_cell = vec![Vec::new(); container.len()];
        for (idx, candidate) in candidates.iter().enumerate() {
            for bit in candidate.covered.iter_ones() {
                covers_by_cell[bit].push(idx);
            }
        }

        Self {
            candidates,
            covers_by_cell,
            capped,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Translates an orientation and checks containment.
fn try_place(
    container: &Container,
    piece: usize,
    ori: usize,
    orientation: &[Cell],
    t: Cell,
) -> Option<Candidate> {
    let mut cells = Vec::with_capacity(orientation.len());
    let mut covered = BitSet::new(container.len());
    for &(x, y, z) in orientation {
        let cell = (x + t.0, y + t.1, z + t.2);
        let idx = container.index_of(cell)?;
        covered.set(idx);
        cells.push(cell);
    }
    cells.sort_unstable();
    Some(Candidate {
        piece,
        ori,
        t,
        cells,
        covered,
    })
}

/// Among candidates covering the identical cell-set, keeps the one with the
/// lowest (piece availability, piece, orientation) score; every other
/// candidate in the group is dominated in the cover matrix.
fn reduce_dominated(candidates: Vec<Candidate>, counts: &PieceCounts) -> Vec<Candidate> {
    let mut best: FxHashMap<BitSet, (u32, usize, usize)> = FxHashMap::default();
    for candidate in &candidates {
        let score = (counts.get(candidate.piece), candidate.piece, candidate.ori);
        best.entry(candidate.covered.clone())
            .and_modify(|held| {
                if score < *held {
                    *held = score;
                }
            })
            .or_insert(score);
    }
    candidates
        .into_iter()
        .filter(|c| best[&c.covered] == (counts.get(c.piece), c.piece, c.ori))
        .collect()
}
