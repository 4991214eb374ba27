use crate::error::{Error, Result};

/// Smallest edge length a box may have once parameters are sanitized.
pub const MIN_BOX_DIM: f64 = 2.0;

/// Axis-aligned box centred at the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub dims: [f64; 3],
}

impl BoundingBox {
    pub fn new(dims: [f64; 3]) -> Self {
        Self { dims }
    }

    /// Checks that every dimension is finite and strictly positive.
    pub fn validate(&self) -> Result<()> {
        for (axis, &value) in self.dims.iter().enumerate() {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidDimension { axis, value });
            }
        }
        Ok(())
    }

    pub fn half_extents(&self) -> [f64; 3] {
        [self.dims[0] * 0.5, self.dims[1] * 0.5, self.dims[2] * 0.5]
    }

    pub fn min(&self) -> [f64; 3] {
        let h = self.half_extents();
        [-h[0], -h[1], -h[2]]
    }

    pub fn max(&self) -> [f64; 3] {
        self.half_extents()
    }

    pub fn max_dim(&self) -> f64 {
        self.dims[0].max(self.dims[1]).max(self.dims[2])
    }

    /// Inclusive containment test with the box inflated by `epsilon` on every side.
    pub fn contains(&self, point: &[f64; 3], epsilon: f64) -> bool {
        let h = self.half_extents();
        (0..3).all(|a| point[a].abs() <= h[a] + epsilon)
    }

    /// Clamps a point component-wise onto the box.
    pub fn clamp(&self, point: [f64; 3]) -> [f64; 3] {
        let h = self.half_extents();
        [
            point[0].clamp(-h[0], h[0]),
            point[1].clamp(-h[1], h[1]),
            point[2].clamp(-h[2], h[2]),
        ]
    }
}
