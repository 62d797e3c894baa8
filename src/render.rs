//! Human-readable text rendering of solutions.
//!
//! Displays z-slices of the container's bounding box, one per block, with
//! rows from the highest y down. Covered cells show their piece letter,
//! empty container cells show '.', and positions outside the container are
//! blank.

use rustc_hash::FxHashMap;

use crate::container::Container;
use crate::lattice::Cell;
use crate::solution::SolutionRecord;

/// Formats a solution record as stacked z-slices.
pub fn format_solution(container: &Container, record: &SolutionRecord) -> String {
    if container.is_empty() {
        return "(empty container)\n".to_string();
    }

    let mut by_cell: FxHashMap<Cell, char> = FxHashMap::default();
    for placement in &record.placements {
        for &cell in &placement.coordinates {
            by_cell.insert(cell, placement.piece);
        }
    }

    let cells = container.cells();
    let (x_min, x_max) = min_max(cells.iter().map(|c| c.0));
    let (y_min, y_max) = min_max(cells.iter().map(|c| c.1));
    let (z_min, z_max) = min_max(cells.iter().map(|c| c.2));

    let mut out = String::new();
    for z in z_min..=z_max {
        if z > z_min {
            out.push('\n');
        }
        out.push_str(&format!("z={z}\n"));
        for y in (y_min..=y_max).rev() {
            let mut row = String::new();
            for x in x_min..=x_max {
                let cell = (x, y, z);
                if let Some(&piece) = by_cell.get(&cell) {
                    row.push(piece);
                } else if container.contains(cell) {
                    row.push('.');
                } else {
                    row.push(' ');
                }
            }
            out.push_str(row.trim_end());
            out.push('\n');
        }
    }
    out
}

fn min_max(values: impl Iterator<Item = i32>) -> (i32, i32) {
    values.fold((i32::MAX, i32::MIN), |(lo, hi), v| (lo.min(v), hi.max(v)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solution::{build_record, PlacementRecord};

    fn square() -> Container {
        Container::new(vec![(0, 0, 0), (1, 0, 0), (0, 1, 0), (1, 1, 0)])
    }

    #[test]
    fn test_full_square_render() {
        let container = square();
        let record = build_record(
            "dfs",
            &container,
            vec![PlacementRecord {
                piece: 'A',
                ori: 0,
                t: (0, 0, 0),
                coordinates: container.cells().to_vec(),
            }],
        );
        let out = format_solution(&container, &record);
        insta::assert_snapshot!(out, @r"
        z=0
        AA
        AA
        ");
    }

    #[test]
    fn test_empty_cells_render_as_dots() {
        let container = square();
        let record = build_record("dfs", &container, Vec::new());
        assert_eq!(format_solution(&container, &record), "z=0\n..\n..\n");
    }

    #[test]
    fn test_gaps_outside_container_are_blank() {
        let container = Container::new(vec![(0, 0, 0), (2, 0, 0)]);
        let record = build_record("dfs", &container, Vec::new());
        assert_eq!(format_solution(&container, &record), "z=0\n. .\n");
    }

    #[test]
    fn test_two_slices_are_separated() {
        let container = Container::new(vec![(0, 0, 0), (0, 0, 1)]);
        let record = build_record("dfs", &container, Vec::new());
        assert_eq!(format_solution(&container, &record), "z=0\n.\n\nz=1\n.\n");
    }

    #[test]
    fn test_empty_container_render() {
        let container = Container::new(Vec::new());
        let record = build_record("dfs", &container, Vec::new());
        assert_eq!(format_solution(&container, &record), "(empty container)\n");
    }
}
