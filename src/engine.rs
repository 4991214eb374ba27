use crate::bounds::BoundingBox;
use crate::error::Result;
use crate::extract::extract_cell;
use crate::field::AssignmentField;
use crate::grid::Grid;
use crate::mesh::CellMesh;
use crate::params::Params;
use crate::refine::{refine, RefineOptions};
use crate::sampler::SeedSampler;
use rayon::prelude::*;
use tracing::{debug, trace};

/// Aggregate counts over the cells of one decomposition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RebuildStats {
    /// Seeds that produced a mesh.
    pub cell_count: usize,
    pub triangle_count: usize,
    pub vertex_count: usize,
}

impl RebuildStats {
    pub fn from_cells(cells: &[Option<CellMesh>]) -> Self {
        cells.iter().flatten().fold(Self::default(), |acc, cell| Self {
            cell_count: acc.cell_count + 1,
            triangle_count: acc.triangle_count + cell.triangle_count(),
            vertex_count: acc.vertex_count + cell.vertex_count(),
        })
    }
}

/// Result of decomposing a box into Manhattan Voronoi cells.
///
/// `cells[i]` holds the mesh of seed `i`, or `None` when the grid could not resolve it.
/// A decomposition is immutable; a new one replaces it wholesale on every rebuild.
#[derive(Clone, Debug)]
pub struct Decomposition {
    pub bounds: BoundingBox,
    pub seeds: Vec<[f64; 3]>,
    pub grid: Grid,
    pub field: AssignmentField,
    pub cells: Vec<Option<CellMesh>>,
    pub stats: RebuildStats,
}

impl Decomposition {
    pub fn count_seeds(&self) -> usize {
        self.seeds.len()
    }

    pub fn count_cells(&self) -> usize {
        self.stats.cell_count
    }

    pub fn get_cell(&self, index: usize) -> Option<&CellMesh> {
        self.cells.get(index).and_then(Option::as_ref)
    }
}

/// Decomposes `bounds` into one solid per seed.
///
/// Builds the grid, evaluates the nearest-seed field once, then extracts and refines
/// every seed's surface. Seeds are processed in parallel but collected in index order,
/// so the output only depends on the inputs.
pub fn decompose(
    bounds: &BoundingBox,
    seeds: &[[f64; 3]],
    density: f64,
    options: &RefineOptions,
) -> Result<Decomposition> {
    let grid = Grid::new(bounds, density)?;
    debug!(
        cells = ?grid.cells,
        vertices = grid.vertex_count(),
        seeds = seeds.len(),
        "grid built"
    );

    let field = AssignmentField::evaluate(seeds, &grid, bounds);
    debug!(assigned = field.assigned_count(), "distance field evaluated");

    let cells: Vec<Option<CellMesh>> = (0..seeds.len())
        .into_par_iter()
        .map(|i| {
            let soup = extract_cell(i, &grid, &field);
            let cell = refine(i, soup, options, bounds);
            if cell.is_none() {
                trace!(seed = i, "seed produced no surface");
            }
            cell
        })
        .collect();

    let stats = RebuildStats::from_cells(&cells);
    debug!(
        cells = stats.cell_count,
        triangles = stats.triangle_count,
        vertices = stats.vertex_count,
        smoothing = options.iterations,
        "decomposition complete"
    );

    Ok(Decomposition {
        bounds: *bounds,
        seeds: seeds.to_vec(),
        grid,
        field,
        cells,
        stats,
    })
}

/// Samples seeds for `params` and decomposes the box.
///
/// Parameters are sanitized first, so any `Params` value is accepted.
pub fn rebuild<S: SeedSampler + ?Sized>(params: &Params, sampler: &S) -> Result<Decomposition> {
    let params = params.sanitized();
    let bounds = params.bounds();
    let seeds = sampler.generate_seeds(params.point_count, &bounds, params.seed);
    decompose(&bounds, &seeds, params.density, &RefineOptions::from(&params))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::Mulberry32Sampler;

    #[test]
    fn test_no_seeds_gives_no_cells() {
        let bounds = BoundingBox::new([4.0, 4.0, 4.0]);
        let d = decompose(&bounds, &[], 8.0, &RefineOptions::default()).unwrap();
        assert!(d.cells.is_empty());
        assert_eq!(d.stats, RebuildStats::default());
    }

    #[test]
    fn test_stats_match_cells() {
        let params = Params { point_count: 6, density: 12.0, smoothing: 1, ..Params::default() };
        let d = rebuild(&params, &Mulberry32Sampler).unwrap();
        assert_eq!(d.cells.len(), 6);
        let triangles: usize = d.cells.iter().flatten().map(|c| c.triangle_count()).sum();
        let vertices: usize = d.cells.iter().flatten().map(|c| c.vertex_count()).sum();
        assert_eq!(d.stats.triangle_count, triangles);
        assert_eq!(d.stats.vertex_count, vertices);
        assert_eq!(d.count_cells(), d.cells.iter().filter(|c| c.is_some()).count());
        for (i, cell) in d.cells.iter().enumerate() {
            if let Some(cell) = cell {
                assert_eq!(cell.seed(), i);
            }
        }
    }

    #[test]
    fn test_rebuild_is_idempotent() {
        let params = Params { point_count: 5, density: 10.0, ..Params::default() };
        let a = rebuild(&params, &Mulberry32Sampler).unwrap();
        let b = rebuild(&params, &Mulberry32Sampler).unwrap();
        assert_eq!(a.seeds, b.seeds);
        assert_eq!(a.cells, b.cells);
        assert_eq!(a.stats, b.stats);
    }

    #[test]
    fn test_rebuild_sanitizes_params() {
        let params = Params { dims: [0.0, 0.0, 0.0], point_count: 0, density: 0.0, ..Params::default() };
        let d = rebuild(&params, &Mulberry32Sampler).unwrap();
        assert_eq!(d.bounds.dims, [2.0, 2.0, 2.0]);
        assert_eq!(d.count_seeds(), 1);
        assert_eq!(d.count_cells(), 1);
    }

    #[test]
    fn test_invalid_density_fails_fast() {
        let bounds = BoundingBox::new([4.0, 4.0, 4.0]);
        assert!(decompose(&bounds, &[[0.0, 0.0, 0.0]], f64::NAN, &RefineOptions::default()).is_err());
    }
}
