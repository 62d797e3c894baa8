//! Orbit canonicalisation of cell-sets and the hashes derived from it.
//!
//! Two cell-sets are related by a lattice rotation plus translation exactly
//! when their canonical forms are equal. The container CID hashes the
//! canonical form under the full 24-rotation group; solution signatures hash
//! the canonical form under the container's own symmetry group.

use std::fmt::Write as _;

use sha2::{Digest, Sha256};

use crate::lattice::{rotate, rotations, Cell, Rotation};

/// Translates a set so its lexicographically smallest cell is the origin,
/// then sorts it.
fn normalize(mut cells: Vec<Cell>) -> Vec<Cell> {
    cells.sort_unstable();
    if let Some(&(mx, my, mz)) = cells.first() {
        for c in &mut cells {
            *c = (c.0 - mx, c.1 - my, c.2 - mz);
        }
    }
    cells
}

/// Canonical representative of a cell-set under an arbitrary rotation group.
///
/// Every rotated image is translation-normalised and sorted; the
/// lexicographically smallest image wins.
pub fn canon_under(cells: &[Cell], group: &[Rotation]) -> Vec<Cell> {
    let mut best: Option<Vec<Cell>> = None;
    for m in group {
        let rotated: Vec<Cell> = cells.iter().map(|&c| rotate(m, c)).collect();
        let candidate = normalize(rotated);
        match &best {
            Some(current) if *current <= candidate => {}
            _ => best = Some(candidate),
        }
    }
    best.unwrap_or_default()
}

/// Canonical representative under the full 24-rotation group.
pub fn canon(cells: &[Cell]) -> Vec<Cell> {
    canon_under(cells, rotations())
}

/// Rotation-only canonical representative: the lexicographically smallest
/// sorted image of the set under the 24 rotations, with no translation
/// normalisation. Distinguishes placements at different positions while
/// merging exact duplicates, which is what candidate row reduction needs.
pub fn canon_fixed(cells: &[Cell]) -> Vec<Cell> {
    let mut best: Option<Vec<Cell>> = None;
    for m in rotations() {
        let mut rotated: Vec<Cell> = cells.iter().map(|&c| rotate(m, c)).collect();
        rotated.sort_unstable();
        match &best {
            Some(current) if *current <= rotated => {}
            _ => best = Some(rotated),
        }
    }
    best.unwrap_or_default()
}

/// Serialises a cell list as `i,j,k;i,j,k;...` for hashing.
fn serialize_cells(cells: &[Cell]) -> String {
    let mut out = String::new();
    for (n, (i, j, k)) in cells.iter().enumerate() {
        if n > 0 {
            out.push(';');
        }
        let _ = write!(out, "{i},{j},{k}");
    }
    out
}

fn sha256_hex(data: &[u8]) -> String {
    let digest = Sha256::digest(data);
    let mut out = String::with_capacity(64);
    for byte in digest {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

/// Content identifier of a container: SHA-256 over the canonical form of its
/// cells, prefixed with the lattice tag. Rendered as `sha256:<64-hex>`.
pub fn cid_sha256(cells: &[Cell]) -> String {
    let canonical = canon(cells);
    let payload = format!("fcc|{}", serialize_cells(&canonical));
    format!("sha256:{}", sha256_hex(payload.as_bytes()))
}

/// Canonical state signature: SHA-256 of the occupied set canonicalised
/// under the given symmetry group (the container's own group for solution
/// deduplication). Bare 64-hex string.
pub fn canonical_state_signature(occupied: &[Cell], group: &[Rotation]) -> String {
    let canonical = canon_under(occupied, group);
    sha256_hex(serialize_cells(&canonical).as_bytes())
}

/// SHA-256 of an arbitrary byte string, as 64-hex. Used for the opaque
/// per-engine state/route hashes.
pub fn opaque_sha256(data: &str) -> String {
    sha256_hex(data.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::rotations;

    fn sample() -> Vec<Cell> {
        vec![(0, 0, 0), (1, 0, 0), (0, 1, 0), (1, 0, -1)]
    }

    #[test]
    fn test_canon_is_idempotent() {
        let c = canon(&sample());
        assert_eq!(canon(&c), c);
    }

    #[test]
    fn test_canon_invariant_under_rotation() {
        let base = canon(&sample());
        for m in rotations() {
            let rotated: Vec<Cell> = sample().iter().map(|&c| rotate(m, c)).collect();
            assert_eq!(canon(&rotated), base);
        }
    }

    #[test]
    fn test_canon_invariant_under_translation() {
        let shifted: Vec<Cell> = sample().iter().map(|&(x, y, z)| (x + 7, y - 3, z + 2)).collect();
        assert_eq!(canon(&shifted), canon(&sample()));
    }

    #[test]
    fn test_canon_starts_at_origin() {
        let c = canon(&sample());
        assert_eq!(c[0], (0, 0, 0));
        assert!(c.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_canon_of_empty_set_is_empty() {
        assert!(canon(&[]).is_empty());
    }

    #[test]
    fn test_canon_fixed_distinguishes_translates() {
        let here = vec![(0, 0, 0), (1, 0, 0)];
        let there = vec![(5, 0, 0), (6, 0, 0)];
        assert_ne!(canon_fixed(&here), canon_fixed(&there));
        assert_eq!(canon(&here), canon(&there));
    }

    #[test]
    fn test_canon_fixed_invariant_under_rotation() {
        let base = canon_fixed(&sample());
        for m in rotations() {
            let rotated: Vec<Cell> = sample().iter().map(|&c| rotate(m, c)).collect();
            assert_eq!(canon_fixed(&rotated), base);
        }
    }

    #[test]
    fn test_cid_invariant_under_rotation_and_translation() {
        let base = cid_sha256(&sample());
        for m in rotations() {
            let moved: Vec<Cell> = sample()
                .iter()
                .map(|&c| rotate(m, c))
                .map(|(x, y, z)| (x - 4, y + 1, z + 9))
                .collect();
            assert_eq!(cid_sha256(&moved), base);
        }
    }

    #[test]
    fn test_cid_format() {
        let cid = cid_sha256(&sample());
        assert!(cid.starts_with("sha256:"));
        assert_eq!(cid.len(), "sha256:".len() + 64);
    }

    #[test]
    fn test_distinct_shapes_get_distinct_cids() {
        let line = vec![(0, 0, 0), (1, 0, 0), (2, 0, 0), (3, 0, 0)];
        assert_ne!(cid_sha256(&line), cid_sha256(&sample()));
    }

    #[test]
    fn test_signature_identifies_rotated_states() {
        let group = rotations();
        let sig = canonical_state_signature(&sample(), group);
        for m in group {
            let rotated: Vec<Cell> = sample().iter().map(|&c| rotate(m, c)).collect();
            assert_eq!(canonical_state_signature(&rotated, group), sig);
        }
    }

    #[test]
    fn test_signature_of_empty_set_is_stable() {
        let group = rotations();
        assert_eq!(
            canonical_state_signature(&[], group),
            canonical_state_signature(&[], group)
        );
        assert_eq!(canonical_state_signature(&[], group).len(), 64);
    }
}
