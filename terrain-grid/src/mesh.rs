//! Two-triangle-per-cell mesh over a grid lattice.
use crate::grid::Lattice;
use serde::Serialize;

/// Which half of a quad cell a triangle covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Half {
    /// Corners `(i,j) (i+1,j) (i+1,j+1)`.
    First = 1,
    /// Corners `(i,j) (i+1,j+1) (i,j+1)`.
    Second = 2,
}

/// Stable identifier of a triangle within the lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CellId {
    pub i: usize,
    pub j: usize,
    pub half: Half,
}

impl std::fmt::Display for CellId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}_{}", self.i, self.j, self.half as u8)
    }
}

/// Triangle as lattice index pairs, counter-clockwise in grid axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Triangle {
    pub corners: [(usize, usize); 3],
    pub cell: CellId,
}

impl Triangle {
    /// Corner positions in source units; `None` when a corner is absent.
    pub fn positions(&self, lattice: &Lattice) -> Option<[[f64; 3]; 3]> {
        let [a, b, c] = self.corners;
        Some([
            lattice.get(a.0, a.1)?.position(),
            lattice.get(b.0, b.1)?.position(),
            lattice.get(c.0, c.1)?.position(),
        ])
    }

    /// Unnormalised face normal from the corner winding.
    pub fn normal(&self, lattice: &Lattice) -> Option<[f64; 3]> {
        let [p1, p2, p3] = self.positions(lattice)?;
        let u = [p2[0] - p1[0], p2[1] - p1[1], p2[2] - p1[2]];
        let v = [p3[0] - p1[0], p3[1] - p1[1], p3[2] - p1[2]];
        Some([
            u[1] * v[2] - u[2] * v[1],
            u[2] * v[0] - u[0] * v[2],
            u[0] * v[1] - u[1] * v[0],
        ])
    }
}

/// Split every complete cell along its low-low to high-high diagonal.
/// Cells with a missing corner are skipped.
pub fn triangulate(lattice: &Lattice) -> Vec<Triangle> {
    let (x_count, y_count) = (lattice.x_count(), lattice.y_count());
    if x_count < 2 || y_count < 2 {
        return Vec::new();
    }

    let mut triangles = Vec::with_capacity(2 * (x_count - 1) * (y_count - 1));
    for i in 0..x_count - 1 {
        for j in 0..y_count - 1 {
            let p1 = (i, j);
            let p2 = (i + 1, j);
            let p3 = (i + 1, j + 1);
            let p4 = (i, j + 1);

            let complete = [p1, p2, p3, p4]
                .iter()
                .all(|&(a, b)| lattice.get(a, b).is_some());
            if !complete {
                continue;
            }

            triangles.push(Triangle {
                corners: [p1, p2, p3],
                cell: CellId { i, j, half: Half::First },
            });
            triangles.push(Triangle {
                corners: [p1, p3, p4],
                cell: CellId { i, j, half: Half::Second },
            });
        }
    }
    triangles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{GridNode, build_grid};
    use crate::interpolation::NodeSource;
    use crate::point::{PointSet, SourcePoint};

    fn flat_lattice(x_count: usize, y_count: usize) -> Lattice {
        let mut lattice = Lattice::empty(x_count, y_count).unwrap();
        for i in 0..x_count {
            for j in 0..y_count {
                let node = GridNode {
                    i,
                    j,
                    x: i as f64,
                    y: j as f64,
                    elevation: 0.0,
                    source: NodeSource::Exact,
                };
                lattice.insert(node).unwrap();
            }
        }
        lattice
    }

    #[test]
    fn emits_two_triangles_per_cell() {
        for (x, y) in [(2, 2), (3, 5), (7, 4)] {
            let triangles = triangulate(&flat_lattice(x, y));
            assert_eq!(triangles.len(), 2 * (x - 1) * (y - 1));
        }
    }

    #[test]
    fn degenerate_lattices_have_no_cells() {
        assert!(triangulate(&flat_lattice(1, 5)).is_empty());
        assert!(triangulate(&flat_lattice(5, 1)).is_empty());
        assert!(triangulate(&Lattice::empty(0, 0).unwrap()).is_empty());
    }

    #[test]
    fn split_and_tags_follow_fixed_diagonal() {
        let triangles = triangulate(&flat_lattice(2, 2));
        assert_eq!(triangles[0].corners, [(0, 0), (1, 0), (1, 1)]);
        assert_eq!(triangles[0].cell.to_string(), "0_0_1");
        assert_eq!(triangles[1].corners, [(0, 0), (1, 1), (0, 1)]);
        assert_eq!(triangles[1].cell.to_string(), "0_0_2");
    }

    #[test]
    fn each_cell_uses_four_distinct_adjacent_nodes() {
        let triangles = triangulate(&flat_lattice(4, 3));
        for pair in triangles.chunks(2) {
            let mut corners: Vec<(usize, usize)> =
                pair.iter().flat_map(|t| t.corners).collect();
            corners.sort();
            corners.dedup();
            assert_eq!(corners.len(), 4);
            let CellId { i, j, .. } = pair[0].cell;
            assert!(corners.iter().all(|&(a, b)| a - i <= 1 && b - j <= 1));
        }
    }

    #[test]
    fn winding_is_counter_clockwise() {
        let lattice = flat_lattice(3, 3);
        for triangle in triangulate(&lattice) {
            let normal = triangle.normal(&lattice).unwrap();
            assert!(normal[2] > 0.0, "{} is clockwise", triangle.cell);
        }
    }

    #[test]
    fn cells_with_missing_corners_are_skipped() {
        let full = flat_lattice(3, 2);
        let mut sparse = Lattice::empty(3, 2).unwrap();
        for node in full.nodes().copied().filter(|n| (n.i, n.j) != (2, 1)) {
            sparse.insert(node).unwrap();
        }
        let triangles = triangulate(&sparse);
        assert_eq!(triangles.len(), 2);
        assert!(triangles.iter().all(|t| t.cell.i == 0));
    }

    #[test]
    fn square_scenario_yields_two_triangles() {
        let points = PointSet::new(vec![
            SourcePoint::new(0.0, 0.0, 10.0),
            SourcePoint::new(10.0, 0.0, 12.0),
            SourcePoint::new(0.0, 10.0, 11.0),
            SourcePoint::new(10.0, 10.0, 13.0),
        ]);
        let grid = build_grid(&points, 10.0).unwrap();
        let triangles = triangulate(&grid.lattice);
        assert_eq!(triangles.len(), 2);
        assert_eq!(
            triangles[0].positions(&grid.lattice).unwrap()[2],
            [10.0, 10.0, 13.0]
        );
    }
}
