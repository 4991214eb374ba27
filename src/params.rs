use crate::bounds::{BoundingBox, MIN_BOX_DIM};
use serde::{Deserialize, Serialize};

/// Lowest grid density (cells along the longest box axis) the engine accepts.
pub const MIN_DENSITY: f64 = 6.0;

/// User-facing parameters of one decomposition.
///
/// Hosts are expected to call [`Params::sanitized`] before handing parameters to the
/// engine; [`crate::rebuild`] does so itself.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Box edge lengths along x, y and z.
    pub dims: [f64; 3],
    /// Number of seed points.
    pub point_count: usize,
    /// Value fed to the seed sampler.
    pub seed: u32,
    /// Number of grid cells along the longest box axis.
    pub density: f64,
    /// Laplacian smoothing passes.
    pub smoothing: u32,
    /// Weld duplicate vertices into an indexed mesh. Forced on when smoothing.
    pub weld: bool,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            dims: [10.0, 10.0, 10.0],
            point_count: 12,
            seed: 1,
            density: 24.0,
            smoothing: 2,
            weld: true,
        }
    }
}

impl Params {
    /// Returns a copy clamped to the minimums the engine relies on.
    pub fn sanitized(&self) -> Self {
        let clamp_min = |v: f64, min: f64| if v.is_finite() { v.max(min) } else { min };
        Self {
            dims: self.dims.map(|d| clamp_min(d, MIN_BOX_DIM)),
            point_count: self.point_count.max(1),
            seed: self.seed,
            density: clamp_min(self.density, MIN_DENSITY),
            smoothing: self.smoothing,
            weld: self.weld,
        }
    }

    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::new(self.dims)
    }

    /// The part of the parameters that decides which seeds exist.
    pub fn composition(&self) -> Composition {
        Composition {
            point_count: self.point_count,
            seed: self.seed,
            dims: self.dims,
        }
    }
}

/// Identity of a seed generation: seed indices only mean the same cell while this
/// key is unchanged.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Composition {
    pub point_count: usize,
    pub seed: u32,
    pub dims: [f64; 3],
}
