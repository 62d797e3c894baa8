//! Piece inventories and the combination enumerator.
//!
//! An inventory maps each label in the closed A..Y alphabet to a count,
//! stored as a fixed-length array. When the inventory holds more pieces
//! than the container needs, the enumerator produces the concrete piece
//! multisets (combinations) whose total cell count matches the container;
//! the engines then consume one combination at a time.

use std::collections::BTreeMap;
use std::fmt;

use itertools::Itertools;

use crate::persistence::LoadError;
use crate::pieces::{label_char, label_index, PieceLibrary, NUM_PIECES};

/// Per-label piece counts, indexed A = 0 .. Y = 24.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct PieceCounts(pub [u32; NUM_PIECES]);

impl PieceCounts {
    #[inline]
    pub fn get(&self, index: usize) -> u32 {
        self.0[index]
    }

    #[inline]
    pub fn set(&mut self, index: usize, count: u32) {
        self.0[index] = count;
    }

    #[inline]
    pub fn decrement(&mut self, index: usize) {
        debug_assert!(self.0[index] > 0);
        self.0[index] -= 1;
    }

    #[inline]
    pub fn increment(&mut self, index: usize) {
        self.0[index] += 1;
    }

    /// Total number of pieces.
    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    /// Labels with a non-zero count, in label order.
    pub fn iter_nonzero(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, &n)| n > 0)
            .map(|(i, &n)| (i, n))
    }

    /// True when every count of `self` is at most the matching count of `other`.
    pub fn fits_within(&self, other: &PieceCounts) -> bool {
        self.0.iter().zip(&other.0).all(|(a, b)| a <= b)
    }

    /// Renders as a letter-keyed map for records and logs.
    pub fn to_map(&self) -> BTreeMap<char, u32> {
        self.iter_nonzero().map(|(i, n)| (label_char(i), n)).collect()
    }

    /// Builds counts from letter keys, rejecting labels outside A..Y.
    pub fn from_map<'a, I>(entries: I) -> Result<Self, LoadError>
    where
        I: IntoIterator<Item = (&'a str, u32)>,
    {
        let mut counts = PieceCounts::default();
        for (key, count) in entries {
            let mut chars = key.chars();
            let (label, rest) = (chars.next(), chars.next());
            match (label, rest) {
                (Some(c), None) => match label_index(c) {
                    Some(idx) => counts.0[idx] += count,
                    None => return Err(LoadError::UnknownPiece(key.to_string())),
                },
                _ => return Err(LoadError::UnknownPiece(key.to_string())),
            }
        }
        Ok(counts)
    }
}

impl fmt::Debug for PieceCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.to_map()).finish()
    }
}

/// Parses an inline inventory such as `A=2,B=1`. Empty segments are
/// ignored; labels must be single letters in A..Y and counts non-negative.
pub fn parse_inline(input: &str) -> Result<PieceCounts, LoadError> {
    let mut counts = PieceCounts::default();
    for token in input.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let (name, value) = token
            .split_once('=')
            .ok_or_else(|| LoadError::BadInventoryToken(token.to_string()))?;
        let name = name.trim();
        let mut chars = name.chars();
        let label = match (chars.next(), chars.next()) {
            (Some(c), None) => c.to_ascii_uppercase(),
            _ => return Err(LoadError::UnknownPiece(name.to_string())),
        };
        let idx = label_index(label).ok_or_else(|| LoadError::UnknownPiece(name.to_string()))?;
        let count: u32 = value
            .trim()
            .parse()
            .map_err(|_| LoadError::BadInventoryToken(token.to_string()))?;
        counts.0[idx] += count;
    }
    Ok(counts)
}

/// Above this many pieces-needed the enumerator stops expanding multisets
/// and falls back to a single greedy assignment.
const SMALL_MODE_LIMIT: u32 = 10;

/// Enumerates piece combinations whose total cell count equals the
/// container size.
///
/// Returns an empty list when the container size is not a multiple of the
/// piece size or the inventory cannot reach it. When the inventory total
/// already equals the pieces needed, the sole combination is the inventory
/// itself. Small problems expand every multiset; larger ones return one
/// greedy assignment in ascending label order. `preferred` combinations
/// that occur in the result are moved to the front, in the order given.
pub fn enumerate_combinations(
    inventory: &PieceCounts,
    library: &PieceLibrary,
    container_size: usize,
    preferred: &[PieceCounts],
) -> Vec<PieceCounts> {
    let piece_size = library.piece_size();
    if piece_size == 0 || container_size % piece_size != 0 {
        return Vec::new();
    }
    let pieces_needed = (container_size / piece_size) as u32;

    if inventory.total() == pieces_needed {
        return vec![inventory.clone()];
    }

    let mut combos: Vec<PieceCounts> = if pieces_needed <= SMALL_MODE_LIMIT {
        let labels: Vec<usize> = inventory.iter_nonzero().map(|(i, _)| i).collect();
        labels
            .iter()
            .copied()
            .combinations_with_replacement(pieces_needed as usize)
            .map(|combo| {
                let mut counts = PieceCounts::default();
                for idx in combo {
                    counts.0[idx] += 1;
                }
                counts
            })
            .filter(|counts| counts.fits_within(inventory))
            .collect()
    } else {
        greedy_assignment(inventory, pieces_needed).into_iter().collect()
    };

    // Deterministic reordering only; nothing is filtered out.
    for want in preferred.iter().rev() {
        if let Some(pos) = combos.iter().position(|c| c == want) {
            let combo = combos.remove(pos);
            combos.insert(0, combo);
        }
    }
    combos
}

/// Takes as many pieces as possible of each label in ascending order until
/// the needed count is met.
fn greedy_assignment(inventory: &PieceCounts, pieces_needed: u32) -> Option<PieceCounts> {
    let mut counts = PieceCounts::default();
    let mut left = pieces_needed;
    for (idx, available) in inventory.iter_nonzero() {
        if left == 0 {
            break;
        }
        let take = available.min(left);
        counts.0[idx] = take;
        left -= take;
    }
    (left == 0).then_some(counts)
}
