//! Solution records, signatures, and verification.
//!
//! Both engines emit the same record shape. The canonical state signature
//! hashes the occupied cell-set canonicalised under the container's own
//! symmetry group, so rotation-equivalent solutions collapse to one
//! signature; the engines keep a run-wide set of emitted signatures and
//! suppress duplicates. The state and route hashes are opaque per-engine
//! identifiers kept for debugging.

use std::collections::BTreeMap;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::canonical::{canonical_state_signature, opaque_sha256};
use crate::container::Container;
use crate::lattice::Cell;
use crate::pieces::{label_index, PieceLibrary};

/// Signature marker used by stub records for runs with no solution.
pub const NO_SOLUTION: &str = "no_solution";

/// One placed piece inside a solution record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementRecord {
    pub piece: char,
    pub ori: usize,
    /// Translation applied to the orientation's cells.
    pub t: Cell,
    /// Covered cells, sorted ascending.
    pub coordinates: Vec<Cell>,
}

/// A complete solution as emitted on the event stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionRecord {
    #[serde(rename = "containerCidSha256")]
    pub container_cid_sha256: String,
    pub lattice: String,
    #[serde(rename = "piecesUsed")]
    pub pieces_used: BTreeMap<char, u32>,
    pub placements: Vec<PlacementRecord>,
    pub sid_state_sha256: String,
    pub sid_route_sha256: String,
    pub sid_state_canon_sha256: String,
}

/// Builds the final record for a completed assignment: fills the pieces-used
/// counts and all three signature fields.
pub fn build_record(
    engine: &str,
    container: &Container,
    placements: Vec<PlacementRecord>,
) -> SolutionRecord {
    let mut pieces_used: BTreeMap<char, u32> = BTreeMap::new();
    for p in &placements {
        *pieces_used.entry(p.piece).or_insert(0) += 1;
    }

    let occupied: Vec<Cell> = placements
        .iter()
        .flat_map(|p| p.coordinates.iter().copied())
        .collect();

    let route: Vec<String> = placements
        .iter()
        .map(|p| format!("{}|{}|{},{},{}", p.piece, p.ori, p.t.0, p.t.1, p.t.2))
        .collect();
    let mut state = route.clone();
    state.sort_unstable();

    SolutionRecord {
        container_cid_sha256: container.cid().to_string(),
        lattice: "fcc".to_string(),
        pieces_used,
        placements,
        sid_state_sha256: opaque_sha256(&format!("{engine}|state|{}", state.join(";"))),
        sid_route_sha256: opaque_sha256(&format!("{engine}|route|{}", route.join(";"))),
        sid_state_canon_sha256: canonical_state_signature(&occupied, container.symmetry_group()),
    }
}

/// Stub record for a run that finished with zero solutions: empty
/// placements, opaque signatures marked `no_solution`, and the canonical
/// signature computed over the empty occupied set.
pub fn stub_record(container: &Container, pieces_used: BTreeMap<char, u32>) -> SolutionRecord {
    SolutionRecord {
        container_cid_sha256: container.cid().to_string(),
        lattice: "fcc".to_string(),
        pieces_used,
        placements: Vec::new(),
        sid_state_sha256: NO_SOLUTION.to_string(),
        sid_route_sha256: NO_SOLUTION.to_string(),
        sid_state_canon_sha256: canonical_state_signature(&[], container.symmetry_group()),
    }
}

/// Run-wide set of emitted canonical signatures.
#[derive(Debug, Default)]
pub struct SignatureSet(FxHashSet<String>);

impl SignatureSet {
    /// Records a signature; returns true when it was not seen before.
    pub fn insert(&mut self, signature: &str) -> bool {
        self.0.insert(signature.to_string())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Reasons a solution record fails verification.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerifyError {
    #[error("record lattice is {0:?}, expected \"fcc\"")]
    WrongLattice(String),
    #[error("record container CID {stored} does not match {actual}")]
    CidMismatch { stored: String, actual: String },
    #[error("unknown piece label {0:?}")]
    UnknownPiece(char),
    #[error("piece {piece} orientation index {ori} out of range")]
    BadOrientation { piece: char, ori: usize },
    #[error("placement of piece {piece} does not match orientation {ori} translated by {t:?}")]
    CoordinateMismatch { piece: char, ori: usize, t: Cell },
    #[error("cell {0:?} lies outside the container")]
    OutsideContainer(Cell),
    #[error("cell {0:?} is covered more than once")]
    OverlappingCell(Cell),
    #[error("placements cover {covered} of {expected} container cells")]
    IncompleteCover { covered: usize, expected: usize },
    #[error("piecesUsed does not match the placement list")]
    PiecesUsedMismatch,
    #[error("stored canonical signature does not match recomputation")]
    SignatureMismatch,
}

/// Checks a solution record against its container and piece library:
/// placements must partition the container, match their stored orientation
/// and translation, and the canonical signature must recompute to the
/// stored value.
pub fn verify_record(
    record: &SolutionRecord,
    container: &Container,
    library: &PieceLibrary,
) -> Result<(), VerifyError> {
    if record.lattice != "fcc" {
        return Err(VerifyError::WrongLattice(record.lattice.clone()));
    }
    if record.container_cid_sha256 != container.cid() {
        return Err(VerifyError::CidMismatch {
            stored: record.container_cid_sha256.clone(),
            actual: container.cid().to_string(),
        });
    }

    let mut covered = vec![false; container.len()];
    let mut covered_count = 0usize;
    let mut used: BTreeMap<char, u32> = BTreeMap::new();

    for placement in &record.placements {
        let piece_idx =
            label_index(placement.piece).ok_or(VerifyError::UnknownPiece(placement.piece))?;
        let orientations = &library.piece(piece_idx).orientations;
        let orientation = orientations
            .get(placement.ori)
            .ok_or(VerifyError::BadOrientation {
                piece: placement.piece,
                ori: placement.ori,
            })?;

        let (dx, dy, dz) = placement.t;
        let mut expected: Vec<Cell> = orientation
            .iter()
            .map(|&(x, y, z)| (x + dx, y + dy, z + dz))
            .collect();
        expected.sort_unstable();
        let mut stored = placement.coordinates.clone();
        stored.sort_unstable();
        if expected != stored {
            return Err(VerifyError::CoordinateMismatch {
                piece: placement.piece,
                ori: placement.ori,
                t: placement.t,
            });
        }

        for &cell in &expected {
            let idx = container
                .index_of(cell)
                .ok_or(VerifyError::OutsideContainer(cell))?;
            if covered[idx] {
                return Err(VerifyError::OverlappingCell(cell));
            }
            covered[idx] = true;
            covered_count += 1;
        }
        *used.entry(placement.piece).or_insert(0) += 1;
    }

    if covered_count != container.len() {
        return Err(VerifyError::IncompleteCover {
            covered: covered_count,
            expected: container.len(),
        });
    }
    if used != record.pieces_used {
        return Err(VerifyError::PiecesUsedMismatch);
    }

    let occupied: Vec<Cell> = record
        .placements
        .iter()
        .flat_map(|p| p.coordinates.iter().copied())
        .collect();
    let recomputed = canonical_state_signature(&occupied, container.symmetry_group());
    if recomputed != record.sid_state_canon_sha256 {
        return Err(VerifyError::SignatureMismatch);
    }
    Ok(())
}
