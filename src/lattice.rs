//! FCC lattice primitives: neighbour set and rotation group.
//!
//! Cells live on the face-centered cubic lattice under its rhombohedral
//! basis, so every integer triple is a valid site and nearest neighbours
//! differ by one of 12 fixed vectors. The proper rotations preserving the
//! lattice form a group of order 24; it is enumerated once at startup by
//! searching for integer matrices that permute the neighbour set.

use std::sync::OnceLock;

/// A site on the FCC lattice (rhombohedral integer coordinates).
pub type Cell = (i32, i32, i32);

/// An integer 3x3 rotation matrix, stored row-major.
pub type Rotation = [[i32; 3]; 3];

/// The 12 rhombohedral FCC neighbour vectors.
pub const NEIGHBORS: [Cell; 12] = [
    (1, 0, 0),
    (0, 1, 0),
    (0, 0, 1),
    (-1, 1, 0),
    (0, -1, 1),
    (1, 0, -1),
    (-1, 0, 0),
    (0, -1, 0),
    (0, 0, -1),
    (1, -1, 0),
    (0, 1, -1),
    (-1, 0, 1),
];

/// Applies a rotation matrix to a cell.
#[inline]
pub fn rotate(m: &Rotation, c: Cell) -> Cell {
    let (x, y, z) = c;
    (
        m[0][0] * x + m[0][1] * y + m[0][2] * z,
        m[1][0] * x + m[1][1] * y + m[1][2] * z,
        m[2][0] * x + m[2][1] * y + m[2][2] * z,
    )
}

#[inline]
fn det3(m: &Rotation) -> i32 {
    let [[a, b, c], [d, e, f], [g, h, i]] = *m;
    a * (e * i - f * h) - b * (d * i - f * g) + c * (d * h - e * g)
}

/// The 24 proper rotations of the FCC lattice.
///
/// Enumerated by trying every ordered triple of neighbour vectors as matrix
/// columns, keeping those with determinant +1 that carry the neighbour set
/// into itself, and deduplicating. The table is computed once and cached.
pub fn rotations() -> &'static [Rotation; 24] {
    static TABLE: OnceLock<[Rotation; 24]> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut found: Vec<Rotation> = Vec::with_capacity(24);
        for &c1 in &NEIGHBORS {
            for &c2 in &NEIGHBORS {
                for &c3 in &NEIGHBORS {
                    let m: Rotation = [
                        [c1.0, c2.0, c3.0],
                        [c1.1, c2.1, c3.1],
                        [c1.2, c2.2, c3.2],
                    ];
                    if det3(&m) != 1 {
                        continue;
                    }
                    if !NEIGHBORS.iter().all(|&v| NEIGHBORS.contains(&rotate(&m, v))) {
                        continue;
                    }
                    if !found.contains(&m) {
                        found.push(m);
                    }
                }
            }
        }
        found
            .try_into()
            .unwrap_or_else(|v: Vec<Rotation>| panic!("expected 24 FCC rotations, got {}", v.len()))
    })
}

/// Identity rotation matrix.
pub const IDENTITY: Rotation = [[1, 0, 0], [0, 1, 0], [0, 0, 1]];

/// Returns true when two cells are FCC nearest neighbours.
#[inline]
pub fn are_neighbors(a: Cell, b: Cell) -> bool {
    NEIGHBORS.contains(&(b.0 - a.0, b.1 - a.1, b.2 - a.2))
}
