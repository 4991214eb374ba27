use crate::field::AssignmentField;
use crate::grid::Grid;
use crate::tables::{CORNER_OFFSETS, EDGE_CORNERS, EDGE_TABLE, TRI_TABLE};

/// Level separating "owned by the seed" (1) from "not owned" (0).
pub const ISO_LEVEL: f64 = 0.5;

/// Extracts the boundary of the region owned by `seed` as a triangle soup.
///
/// The ownership test is a binary scalar field, so every crossing lands on the middle
/// of its lattice edge and the result is a staircase surface. The returned buffer holds
/// three vertices per triangle as `[x, y, z, x, y, z, ...]`; it is empty when the grid
/// never resolves the seed.
///
/// Triangles come out wound with their normals pointing into the region;
/// [`crate::refine::fix_winding`] flips them.
pub fn extract_cell(seed: usize, grid: &Grid, field: &AssignmentField) -> Vec<f64> {
    let mut soup = Vec::new();
    let Some((lo, hi)) = seed_extent(seed, grid, field) else {
        return soup;
    };

    // Any cube touching an owned vertex lies in this range; owned vertices never sit on
    // the padding layer, so the range stays inside the lattice.
    for z in lo[2].saturating_sub(1)..=hi[2].min(grid.vertices[2] - 2) {
        for y in lo[1].saturating_sub(1)..=hi[1].min(grid.vertices[1] - 2) {
            for x in lo[0].saturating_sub(1)..=hi[0].min(grid.vertices[0] - 2) {
                polygonize_cube(seed, [x, y, z], grid, field, &mut soup);
            }
        }
    }
    soup
}

/// Lattice bounding range `(min, max)` of the vertices owned by `seed`.
fn seed_extent(seed: usize, grid: &Grid, field: &AssignmentField) -> Option<([usize; 3], [usize; 3])> {
    let [nx, ny, _] = grid.vertices;
    let mut lo = [usize::MAX; 3];
    let mut hi = [0usize; 3];
    let mut found = false;

    for (i, _) in field
        .values()
        .iter()
        .enumerate()
        .filter(|&(_, &v)| v as usize == seed)
    {
        let p = [i % nx, (i / nx) % ny, i / (nx * ny)];
        for a in 0..3 {
            lo[a] = lo[a].min(p[a]);
            hi[a] = hi[a].max(p[a]);
        }
        found = true;
    }
    found.then_some((lo, hi))
}

fn polygonize_cube(seed: usize, cube: [usize; 3], grid: &Grid, field: &AssignmentField, soup: &mut Vec<f64>) {
    let mut corner_index = [0usize; 8];
    let mut corner_value = [0.0f64; 8];
    let mut code = 0usize;

    for (k, offset) in CORNER_OFFSETS.iter().enumerate() {
        let idx = grid.index(cube[0] + offset[0], cube[1] + offset[1], cube[2] + offset[2]);
        corner_index[k] = idx;
        if field.get(idx) == Some(seed) {
            corner_value[k] = 1.0;
            code |= 1 << k;
        }
    }

    let edges = EDGE_TABLE[code];
    if edges == 0 {
        return;
    }

    let mut edge_points = [[0.0f64; 3]; 12];
    for (e, &[a, b]) in EDGE_CORNERS.iter().enumerate() {
        if edges & (1 << e) == 0 {
            continue;
        }
        // Interpolate from the lower lattice vertex so shared edges match exactly.
        let (a, b) = if corner_index[a] <= corner_index[b] { (a, b) } else { (b, a) };
        let pa = corner_position(grid, cube, a);
        let pb = corner_position(grid, cube, b);
        let t = crossing(corner_value[a], corner_value[b]);
        edge_points[e] = [
            pa[0] + t * (pb[0] - pa[0]),
            pa[1] + t * (pb[1] - pa[1]),
            pa[2] + t * (pb[2] - pa[2]),
        ];
    }

    for &e in TRI_TABLE[code].iter().take_while(|&&e| e >= 0) {
        soup.extend_from_slice(&edge_points[e as usize]);
    }
}

#[inline]
fn corner_position(grid: &Grid, cube: [usize; 3], corner: usize) -> [f64; 3] {
    let o = CORNER_OFFSETS[corner];
    grid.position(cube[0] + o[0], cube[1] + o[1], cube[2] + o[2])
}

/// Interpolation parameter of the iso crossing between two corner values.
#[inline]
fn crossing(v0: f64, v1: f64) -> f64 {
    if v0 == v1 {
        return 0.5;
    }
    (ISO_LEVEL - v0) / (v1 - v0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::BoundingBox;

    #[test]
    fn test_crossing_is_midpoint_for_binary_values() {
        assert_eq!(crossing(0.0, 1.0), 0.5);
        assert_eq!(crossing(1.0, 0.0), 0.5);
        assert_eq!(crossing(1.0, 1.0), 0.5);
    }

    #[test]
    fn test_single_vertex_region() {
        // One owned vertex yields a closed octahedron: 8 triangles.
        let bounds = BoundingBox::new([2.0, 2.0, 2.0]);
        let grid = Grid::with_cells(&bounds, [2, 2, 2]).unwrap();
        let mut values = vec![crate::field::UNASSIGNED; grid.vertex_count()];
        values[grid.index(2, 2, 2)] = 0;
        let field = AssignmentField::from_values(values, &grid).unwrap();

        let soup = extract_cell(0, &grid, &field);
        assert_eq!(soup.len(), 8 * 3 * 3);

        let center = grid.position(2, 2, 2);
        for v in soup.chunks(3) {
            let d: f64 = (0..3).map(|a| (v[a] - center[a]).abs()).sum();
            assert!((d - 0.5).abs() < 1e-12);
        }
    }

    #[test]
    fn test_unknown_seed_is_empty() {
        let bounds = BoundingBox::new([4.0, 4.0, 4.0]);
        let grid = Grid::new(&bounds, 4.0).unwrap();
        let field = AssignmentField::evaluate(&[[0.0, 0.0, 0.0]], &grid, &bounds);
        assert!(extract_cell(1, &grid, &field).is_empty());
        assert!(!extract_cell(0, &grid, &field).is_empty());
    }

    #[test]
    fn test_single_seed_surface_hugs_box() {
        let bounds = BoundingBox::new([4.0, 4.0, 4.0]);
        let grid = Grid::new(&bounds, 4.0).unwrap();
        let field = AssignmentField::evaluate(&[[0.3, -0.2, 0.1]], &grid, &bounds);
        let soup = extract_cell(0, &grid, &field);

        // Crossings sit half a step beyond the outermost owned vertices.
        let limit = 2.0 + 0.5 * grid.step[0];
        assert!(soup.iter().all(|c| c.abs() <= limit + 1e-12));
        assert!(soup.chunks(3).all(|v| v.iter().any(|c| (c.abs() - limit).abs() < 1e-12)));
    }
}
