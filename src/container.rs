//! Container representation: ordered cells, neighbour masks, symmetry group.
//!
//! The container's cell ordering defines each cell's bit index, so every
//! occupancy mask in the engines is relative to one `Container` instance.
//! The symmetry group and per-cell neighbour masks are computed once at
//! construction and shared read-only by both engines.

use rustc_hash::FxHashMap;

use crate::bitset::BitSet;
use crate::canonical::cid_sha256;
use crate::lattice::{rotate, rotations, Cell, Rotation, NEIGHBORS};

/// A finite set of FCC cells with a fixed ordering.
#[derive(Debug, Clone)]
pub struct Container {
    cells: Vec<Cell>,
    index: FxHashMap<Cell, usize>,
    neighbor_masks: Vec<BitSet>,
    full_mask: BitSet,
    symmetry: Vec<Rotation>,
    cid: String,
}

impl Container {
    /// Builds a container from its cells. The cells are sorted
    /// lexicographically and deduplicated; the sorted position is the bit
    /// index used by every occupancy mask.
    pub fn new(cells: Vec<Cell>) -> Self {
        let mut cells = cells;
        cells.sort_unstable();
        cells.dedup();

        let index: FxHashMap<Cell, usize> =
            cells.iter().enumerate().map(|(i, &c)| (c, i)).collect();

        let neighbor_masks = cells
            .iter()
            .map(|&(x, y, z)| {
                BitSet::from_indices(
                    cells.len(),
                    NEIGHBORS
                        .iter()
                        .filter_map(|&(dx, dy, dz)| index.get(&(x + dx, y + dy, z + dz)).copied()),
                )
            })
            .collect();

        let symmetry = rotations()
            .iter()
            .filter(|m| maps_cells_to_themselves(&cells, &index, m))
            .copied()
            .collect();

        let cid = cid_sha256(&cells);
        let full_mask = BitSet::full(cells.len());

        Self {
            cells,
            index,
            neighbor_masks,
            full_mask,
            symmetry,
            cid,
        }
    }

    /// Number of cells `S`.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The ordered cells; position equals bit index.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Cell at a bit index.
    #[inline]
    pub fn cell(&self, index: usize) -> Cell {
        self.cells[index]
    }

    /// Bit index of a cell, if the cell is in the container.
    #[inline]
    pub fn index_of(&self, cell: Cell) -> Option<usize> {
        self.index.get(&cell).copied()
    }

    #[inline]
    pub fn contains(&self, cell: Cell) -> bool {
        self.index.contains_key(&cell)
    }

    /// Mask with every container bit set.
    #[inline]
    pub fn full_mask(&self) -> &BitSet {
        &self.full_mask
    }

    /// Container-cell indices adjacent to `index` under the FCC neighbour set.
    #[inline]
    pub fn neighbor_mask(&self, index: usize) -> &BitSet {
        &self.neighbor_masks[index]
    }

    /// The rotations that map this container's cell-set to itself.
    #[inline]
    pub fn symmetry_group(&self) -> &[Rotation] {
        &self.symmetry
    }

    /// Content identifier, `sha256:<64-hex>` over the canonical cell form.
    #[inline]
    pub fn cid(&self) -> &str {
        &self.cid
    }
}

fn maps_cells_to_themselves(
    cells: &[Cell],
    index: &FxHashMap<Cell, usize>,
    m: &Rotation,
) -> bool {
    cells.iter().all(|&c| index.contains_key(&rotate(m, c)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::IDENTITY;

    fn square() -> Container {
        Container::new(vec![(0, 0, 0), (1, 0, 0), (0, 1, 0), (1, 1, 0)])
    }

    #[test]
    fn test_cells_are_sorted_and_indexed() {
        let c = Container::new(vec![(1, 1, 0), (0, 0, 0), (1, 0, 0), (0, 1, 0)]);
        assert_eq!(c.cells(), square().cells());
        for (i, &cell) in c.cells().iter().enumerate() {
            assert_eq!(c.index_of(cell), Some(i));
            assert_eq!(c.cell(i), cell);
        }
        assert_eq!(c.index_of((5, 5, 5)), None);
    }

    #[test]
    fn test_duplicates_collapse() {
        let c = Container::new(vec![(0, 0, 0), (0, 0, 0), (1, 0, 0)]);
        assert_eq!(c.len(), 2);
    }

    #[test]
    fn test_neighbor_masks_follow_fcc_adjacency() {
        let c = square();
        // (0,0,0) is adjacent to (1,0,0) and (0,1,0) but not (1,1,0) in the
        // rhombohedral basis.
        let origin = c.index_of((0, 0, 0)).unwrap();
        let mask = c.neighbor_mask(origin);
        assert!(mask.test(c.index_of((1, 0, 0)).unwrap()));
        assert!(mask.test(c.index_of((0, 1, 0)).unwrap()));
        assert!(!mask.test(c.index_of((1, 1, 0)).unwrap()));
        assert!(!mask.test(origin));
    }

    #[test]
    fn test_symmetry_group_contains_identity() {
        assert!(square().symmetry_group().contains(&IDENTITY));
    }

    #[test]
    fn test_symmetry_group_order_divides_24() {
        // A subgroup of the 24-element rotation group.
        let n = square().symmetry_group().len();
        assert!(n >= 1 && 24 % n == 0, "group order {n}");
    }

    #[test]
    fn test_asymmetric_container_has_trivial_group() {
        let c = Container::new(vec![
            (0, 0, 0),
            (1, 0, 0),
            (2, 0, 0),
            (0, 1, 0),
            (0, 0, 2),
        ]);
        assert_eq!(c.symmetry_group(), &[IDENTITY]);
    }

    #[test]
    fn test_cid_matches_recomputation() {
        let c = square();
        assert_eq!(c.cid(), cid_sha256(c.cells()));
    }

    #[test]
    fn test_empty_container() {
        let c = Container::new(Vec::new());
        assert!(c.is_empty());
        assert_eq!(c.full_mask().count_ones(), 0);
        assert_eq!(c.symmetry_group().len(), 24);
    }
}
