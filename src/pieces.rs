//! Piece definitions and orientation expansion.
//!
//! Each piece is a label from the closed alphabet A..Y plus a 4-cell base
//! shape in FCC coordinates. Applying the 24 lattice rotations to the base,
//! normalising each image by translation, and deduplicating yields the
//! piece's distinct orientations. The sorted position of an orientation is
//! its stable `ori` index, carried through to solution records.

use std::sync::OnceLock;

use crate::lattice::{rotate, rotations, Cell};

/// Number of pieces in the closed A..Y alphabet.
pub const NUM_PIECES: usize = 25;

/// The base shapes, indexed by label position (A = 0 .. Y = 24).
pub const BASE_SHAPES: [[Cell; 4]; NUM_PIECES] = [
    [(0, 0, 0), (1, 0, 0), (0, 1, 0), (1, 1, 0)], // A
    [(0, 0, 0), (1, 0, 0), (0, 1, 0), (0, 0, 1)], // B
    [(0, 0, 0), (1, 0, 0), (2, 0, 0), (1, 1, 0)], // C
    [(0, 0, 0), (1, 0, 0), (1, 1, 0), (2, 1, 0)], // D
    [(0, 0, 0), (1, 0, 0), (0, 1, 0), (1, 0, 1)], // E
    [(0, 0, 0), (1, 0, 0), (1, 1, 0), (1, 0, 1)], // F
    [(0, 0, 0), (1, 0, 0), (2, 0, 0), (3, 0, 0)], // G
    [(0, 0, 0), (1, 0, 0), (0, 1, 0), (0, 1, 1)], // H
    [(0, 0, 0), (1, 0, 0), (1, 1, 0), (0, 1, 1)], // I
    [(0, 0, 0), (1, 0, 0), (0, 1, 0), (2, 0, 0)], // J
    [(0, 0, 0), (1, 0, 0), (1, 1, 0), (1, 1, 1)], // K
    [(0, 0, 0), (1, 0, 0), (0, 1, 0), (1, 1, 1)], // L
    [(0, 0, 0), (1, 0, 0), (2, 0, 0), (0, 1, 0)], // M
    [(0, 0, 0), (1, 0, 0), (2, 0, 0), (1, 0, 1)], // N
    [(0, 0, 0), (1, 0, 0), (1, 1, 0), (0, 0, 1)], // O
    [(0, 0, 0), (1, 0, 0), (0, 1, 0), (0, 0, 2)], // P
    [(0, 0, 0), (1, 0, 0), (2, 0, 0), (2, 1, 0)], // Q
    [(0, 0, 0), (1, 0, 0), (2, 0, 0), (0, 0, 1)], // R
    [(0, 0, 0), (1, 0, 0), (1, 1, 0), (2, 0, 0)], // S
    [(0, 0, 0), (1, 0, 0), (0, 1, 0), (2, 1, 0)], // T
    [(0, 0, 0), (1, 0, 0), (2, 0, 0), (1, 1, 1)], // U
    [(0, 0, 0), (1, 0, 0), (1, 1, 0), (0, 1, 0)], // V
    [(0, 0, 0), (1, 0, 0), (0, 1, 0), (1, 0, 2)], // W
    [(0, 0, 0), (1, 0, 0), (2, 0, 0), (0, 1, 1)], // X
    [(0, 0, 0), (1, 0, 0), (1, 1, 0), (0, 2, 0)], // Y
];

/// Converts a label index (0..25) to its letter.
#[inline]
pub fn label_char(index: usize) -> char {
    debug_assert!(index < NUM_PIECES);
    (b'A' + index as u8) as char
}

/// Converts a letter to its label index, if it is in A..Y.
#[inline]
pub fn label_index(label: char) -> Option<usize> {
    let idx = (label as u32).wrapping_sub('A' as u32) as usize;
    (idx < NUM_PIECES).then_some(idx)
}

/// A piece: label, base shape, and its expanded orientation list.
#[derive(Debug, Clone)]
pub struct PieceDef {
    pub label: char,
    pub base: Vec<Cell>,
    pub orientations: Vec<Vec<Cell>>,
}

/// The piece library consumed by the engines: one definition per label.
#[derive(Debug, Clone)]
pub struct PieceLibrary {
    pieces: Vec<PieceDef>,
}

impl PieceLibrary {
    /// Builds a library from base shapes in label order.
    pub fn from_shapes<I>(shapes: I) -> Self
    where
        I: IntoIterator<Item = Vec<Cell>>,
    {
        let pieces = shapes
            .into_iter()
            .enumerate()
            .map(|(i, base)| PieceDef {
                label: label_char(i),
                orientations: expand_orientations(&base),
                base,
            })
            .collect();
        Self { pieces }
    }

    /// The standard A..Y library, built once and cached.
    pub fn standard() -> &'static PieceLibrary {
        static LIB: OnceLock<PieceLibrary> = OnceLock::new();
        LIB.get_or_init(|| PieceLibrary::from_shapes(BASE_SHAPES.iter().map(|s| s.to_vec())))
    }

    #[inline]
    pub fn piece(&self, index: usize) -> &PieceDef {
        &self.pieces[index]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Cell count shared by every piece (4 for the standard library).
    pub fn piece_size(&self) -> usize {
        self.pieces.first().map_or(0, |p| p.base.len())
    }

    pub fn iter(&self) -> impl Iterator<Item = &PieceDef> {
        self.pieces.iter()
    }
}

/// Translates coordinates so the componentwise minimum is the origin, then
/// sorts them. Two orientations differing only by translation collapse to
/// the same normal form.
fn normalize_to_origin(mut cells: Vec<Cell>) -> Vec<Cell> {
    if let (Some(mx), Some(my), Some(mz)) = (
        cells.iter().map(|c| c.0).min(),
        cells.iter().map(|c| c.1).min(),
        cells.iter().map(|c| c.2).min(),
    ) {
        for c in &mut cells {
            *c = (c.0 - mx, c.1 - my, c.2 - mz);
        }
    }
    cells.sort_unstable();
    cells
}

/// Generates the distinct orientations of a base shape.
///
/// All 24 lattice rotations are applied, each image is normalised to the
/// origin, and duplicates are removed. The surviving shapes are sorted so
/// orientation indices are stable across runs.
pub fn expand_orientations(base: &[Cell]) -> Vec<Vec<Cell>> {
    let mut orientations: Vec<Vec<Cell>> = rotations()
        .iter()
        .map(|m| normalize_to_origin(base.iter().map(|&c| rotate(m, c)).collect()))
        .collect();
    orientations.sort();
    orientations.dedup();
    orientations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_round_trip() {
        for i in 0..NUM_PIECES {
            assert_eq!(label_index(label_char(i)), Some(i));
        }
        assert_eq!(label_index('Z'), None);
        assert_eq!(label_index('a'), None);
    }

    #[test]
    fn test_standard_library_shape() {
        let lib = PieceLibrary::standard();
        assert_eq!(lib.len(), NUM_PIECES);
        assert_eq!(lib.piece_size(), 4);
        for (i, piece) in lib.iter().enumerate() {
            assert_eq!(piece.label, label_char(i));
            assert!(!piece.orientations.is_empty());
            assert!(piece.orientations.len() <= 24);
        }
    }

    #[test]
    fn test_orientations_are_sorted_and_distinct() {
        for piece in PieceLibrary::standard().iter() {
            assert!(piece.orientations.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_orientations_normalised_to_origin() {
        for piece in PieceLibrary::standard().iter() {
            for ori in &piece.orientations {
                assert_eq!(ori.iter().map(|c| c.0).min(), Some(0));
                assert_eq!(ori.iter().map(|c| c.1).min(), Some(0));
                assert_eq!(ori.iter().map(|c| c.2).min(), Some(0));
            }
        }
    }

    #[test]
    fn test_expansion_is_idempotent() {
        // Re-expanding any orientation reproduces the same orientation set:
        // the set is closed under further rotation.
        for piece in PieceLibrary::standard().iter() {
            let expected = &piece.orientations;
            for ori in expected {
                assert_eq!(&expand_orientations(ori), expected);
            }
        }
    }

    #[test]
    fn test_straight_line_has_six_orientations() {
        // A 4-in-line maps onto each of the 12 neighbour directions, and
        // opposite directions normalise to the same shape.
        let g = label_index('G').unwrap();
        assert_eq!(PieceLibrary::standard().piece(g).orientations.len(), 6);
    }

    #[test]
    fn test_base_shape_appears_among_orientations() {
        for piece in PieceLibrary::standard().iter() {
            let normal = normalize_to_origin(piece.base.clone());
            assert!(piece.orientations.contains(&normal));
        }
    }
}
