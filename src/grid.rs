use crate::bounds::BoundingBox;
use crate::error::{Error, Result};

/// A padded vertex lattice covering a [`BoundingBox`].
///
/// The lattice has `cells + 1` vertices per axis inside the box plus [`Grid::PADDING`]
/// extra layers on each side. The padding vertices always lie outside the box, so every
/// region touching a box wall still gets a closed surface.
#[derive(Clone, Debug)]
pub struct Grid {
    /// Number of cells spanning the box along each axis.
    pub cells: [usize; 3],
    /// Number of lattice vertices along each axis, padding included.
    pub vertices: [usize; 3],
    /// Distance between neighbouring vertices along each axis.
    pub step: [f64; 3],
    /// Position of the first (padding) vertex along each axis.
    pub origin: [f64; 3],
    /// Vertex coordinates along each axis.
    pub coords: [Vec<f64>; 3],
}

impl Grid {
    /// Layers of cells added beyond the box on every side.
    pub const PADDING: usize = 1;

    /// Builds the grid for a box and a density.
    ///
    /// `density` is the number of cells along the longest axis. The other axes get as
    /// many cells as keeps them closest to cubic, but never fewer than two.
    pub fn new(bounds: &BoundingBox, density: f64) -> Result<Grid> {
        bounds.validate()?;
        if !density.is_finite() || density <= 0.0 {
            return Err(Error::InvalidDensity(density));
        }

        let target_cells = density.round().max(1.0);
        let cell_size = bounds.max_dim() / target_cells;
        let cells = bounds.dims.map(|d| ((d / cell_size).round() as usize).max(2));
        Self::with_cells(bounds, cells)
    }

    /// Builds a grid with explicit per-axis cell counts.
    pub fn with_cells(bounds: &BoundingBox, cells: [usize; 3]) -> Result<Grid> {
        bounds.validate()?;
        if let Some(axis) = cells.iter().position(|&c| c == 0) {
            return Err(Error::DegenerateGrid { axis, cells: 0 });
        }

        let pad = Self::PADDING;
        let half = bounds.half_extents();
        let vertices = cells.map(|c| c + 1 + 2 * pad);
        let step = [0, 1, 2].map(|a| bounds.dims[a] / cells[a] as f64);
        let origin = [0, 1, 2].map(|a| -half[a] - pad as f64 * step[a]);
        let coords = [0, 1, 2].map(|a| {
            (0..vertices[a])
                .map(|i| origin[a] + i as f64 * step[a])
                .collect::<Vec<f64>>()
        });

        Ok(Grid {
            cells,
            vertices,
            step,
            origin,
            coords,
        })
    }

    /// Total number of lattice vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices[0] * self.vertices[1] * self.vertices[2]
    }

    /// Flat index of a vertex, x fastest, then y, then z.
    #[inline]
    pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
        x + y * self.vertices[0] + z * self.vertices[0] * self.vertices[1]
    }

    /// Position of a lattice vertex.
    #[inline]
    pub fn position(&self, x: usize, y: usize, z: usize) -> [f64; 3] {
        [self.coords[0][x], self.coords[1][y], self.coords[2][z]]
    }
}
