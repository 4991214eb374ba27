use crate::bounds::BoundingBox;
use crate::error::{Error, Result};
use crate::grid::Grid;
use rayon::prelude::*;

/// Marker stored for lattice vertices outside the box.
pub const UNASSIGNED: u32 = u32::MAX;

/// Slack added to the box when deciding whether a lattice vertex is inside it, so the
/// vertices sitting on the box walls are not lost to rounding.
pub const BOUNDARY_EPSILON: f64 = 1e-6;

/// Nearest-seed index for every vertex of a [`Grid`], flattened x fastest.
#[derive(Clone, Debug, PartialEq)]
pub struct AssignmentField {
    values: Vec<u32>,
}

impl AssignmentField {
    /// Assigns every lattice vertex inside the box to its nearest seed in the Manhattan
    /// metric. On ties the seed with the lowest index wins.
    ///
    /// Vertices outside the box, and every vertex when `seeds` is empty, are left
    /// [`UNASSIGNED`]. Each z-slab of the lattice is evaluated independently.
    pub fn evaluate(seeds: &[[f64; 3]], grid: &Grid, bounds: &BoundingBox) -> AssignmentField {
        let [nx, ny, _] = grid.vertices;
        let slab = nx * ny;
        let mut values = vec![UNASSIGNED; grid.vertex_count()];

        if !seeds.is_empty() {
            values
                .par_chunks_mut(slab)
                .enumerate()
                .for_each(|(z, slab_values)| {
                    for y in 0..ny {
                        for x in 0..nx {
                            let p = grid.position(x, y, z);
                            if bounds.contains(&p, BOUNDARY_EPSILON) {
                                slab_values[x + y * nx] = nearest_seed(seeds, &p) as u32;
                            }
                        }
                    }
                });
        }

        AssignmentField { values }
    }

    /// Wraps precomputed values for `grid`, e.g. a field produced elsewhere.
    pub fn from_values(values: Vec<u32>, grid: &Grid) -> Result<AssignmentField> {
        if values.len() != grid.vertex_count() {
            return Err(Error::FieldMismatch {
                expected: grid.vertex_count(),
                actual: values.len(),
            });
        }
        Ok(AssignmentField { values })
    }

    pub fn values(&self) -> &[u32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Seed owning the vertex at flat index `index`, if any.
    #[inline]
    pub fn get(&self, index: usize) -> Option<usize> {
        match self.values.get(index) {
            Some(&v) if v != UNASSIGNED => Some(v as usize),
            _ => None,
        }
    }

    /// Seed owning the lattice vertex `(x, y, z)`, if any.
    pub fn seed_at(&self, grid: &Grid, x: usize, y: usize, z: usize) -> Option<usize> {
        self.get(grid.index(x, y, z))
    }

    pub fn assigned_count(&self) -> usize {
        self.values.iter().filter(|&&v| v != UNASSIGNED).count()
    }

    /// Number of vertices owned by each seed.
    pub fn histogram(&self, seed_count: usize) -> Vec<usize> {
        let mut counts = vec![0; seed_count];
        for &v in &self.values {
            if let Some(c) = counts.get_mut(v as usize) {
                *c += 1;
            }
        }
        counts
    }
}

/// Index of the seed closest to `p` in the L1 metric, first one wins on ties.
pub fn nearest_seed(seeds: &[[f64; 3]], p: &[f64; 3]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (i, s) in seeds.iter().enumerate() {
        let d = manhattan(s, p);
        if d < best_dist {
            best_dist = d;
            best = i;
        }
    }
    best
}

#[inline]
pub fn manhattan(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    (a[0] - b[0]).abs() + (a[1] - b[1]).abs() + (a[2] - b[2]).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_grid() -> (BoundingBox, Grid) {
        let bounds = BoundingBox::new([4.0, 4.0, 4.0]);
        let grid = Grid::new(&bounds, 4.0).unwrap();
        (bounds, grid)
    }

    #[test]
    fn test_padding_is_unassigned() {
        let (bounds, grid) = small_grid();
        let field = AssignmentField::evaluate(&[[0.0, 0.0, 0.0]], &grid, &bounds);
        assert_eq!(field.len(), grid.vertex_count());

        // 5 vertices per axis lie on or inside the box.
        assert_eq!(field.assigned_count(), 5 * 5 * 5);
        assert_eq!(field.seed_at(&grid, 0, 3, 3), None);
        assert_eq!(field.seed_at(&grid, 1, 1, 1), Some(0));
        assert_eq!(field.seed_at(&grid, 5, 5, 5), Some(0));
        assert_eq!(field.seed_at(&grid, 6, 5, 5), None);
    }

    #[test]
    fn test_nearest_in_manhattan_metric() {
        // Euclidean would pick seed 1 for the origin (sqrt(2) < 1.6); Manhattan picks seed 0.
        let seeds = [[1.6, 0.0, 0.0], [1.0, 1.0, 0.0]];
        assert_eq!(nearest_seed(&seeds, &[0.0, 0.0, 0.0]), 0);
        assert_eq!(manhattan(&seeds[1], &[0.0, 0.0, 0.0]), 2.0);
    }

    #[test]
    fn test_ties_resolve_to_lowest_index() {
        let seeds = [[1.0, 0.0, 0.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        assert_eq!(nearest_seed(&seeds, &[0.0, 0.0, 0.0]), 0);

        let reordered = [seeds[2], seeds[1], seeds[0]];
        assert_eq!(nearest_seed(&reordered, &[0.0, 0.0, 0.0]), 0);
    }

    #[test]
    fn test_no_seeds_leaves_field_unassigned() {
        let (bounds, grid) = small_grid();
        let field = AssignmentField::evaluate(&[], &grid, &bounds);
        assert_eq!(field.assigned_count(), 0);
        assert!(field.values().iter().all(|&v| v == UNASSIGNED));
    }

    #[test]
    fn test_from_values_checks_length() {
        let (_, grid) = small_grid();
        let err = AssignmentField::from_values(vec![0; 10], &grid).unwrap_err();
        assert_eq!(
            err,
            Error::FieldMismatch {
                expected: grid.vertex_count(),
                actual: 10,
            }
        );
        assert!(AssignmentField::from_values(vec![UNASSIGNED; grid.vertex_count()], &grid).is_ok());
    }

    #[test]
    fn test_histogram_sums_to_assigned() {
        let (bounds, grid) = small_grid();
        let seeds = [[-1.0, -1.0, -1.0], [1.0, 1.0, 1.0], [1.5, -1.5, 0.0]];
        let field = AssignmentField::evaluate(&seeds, &grid, &bounds);
        let hist = field.histogram(seeds.len());
        assert_eq!(hist.iter().sum::<usize>(), field.assigned_count());
        assert!(hist.iter().all(|&c| c > 0));
    }

    #[test]
    fn test_matches_sequential_scan() {
        let (bounds, grid) = small_grid();
        let seeds = [[-1.2, 0.3, 0.9], [0.4, -1.1, -0.2], [1.7, 1.7, 1.7], [0.0, 0.0, -1.9]];
        let field = AssignmentField::evaluate(&seeds, &grid, &bounds);
        let [nx, ny, nz] = grid.vertices;
        for z in 0..nz {
            for y in 0..ny {
                for x in 0..nx {
                    let p = grid.position(x, y, z);
                    let expected = bounds
                        .contains(&p, BOUNDARY_EPSILON)
                        .then(|| nearest_seed(&seeds, &p));
                    assert_eq!(field.seed_at(&grid, x, y, z), expected);
                }
            }
        }
    }
}
