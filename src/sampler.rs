use crate::bounds::BoundingBox;
use rand::prelude::*;
use rand::rngs::StdRng;

/// Produces the seed points of a decomposition.
///
/// Implementations must be deterministic: the same `(count, bounds, seed_value)` always
/// yields the same ordered points, since seed indices are the identity of the cells.
pub trait SeedSampler: Send + Sync {
    fn generate_seeds(&self, count: usize, bounds: &BoundingBox, seed_value: u32) -> Vec<[f64; 3]>;
}

/// Small 32-bit generator with a single word of state.
///
/// Its output stream matches the common `mulberry32` generator bit for bit, so seed
/// layouts can be reproduced outside of Rust.
#[derive(Clone, Debug)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Next float in `[0, 1)`, with 32 bits of precision.
    pub fn next_unit(&mut self) -> f64 {
        self.next_u32() as f64 / 4294967296.0
    }
}

impl RngCore for Mulberry32 {
    fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6d2b_79f5);
        let t = self.state;
        let mut r = (t ^ (t >> 15)).wrapping_mul(1 | t);
        r ^= r.wrapping_add((r ^ (r >> 7)).wrapping_mul(61 | r));
        r ^ (r >> 14)
    }

    fn next_u64(&mut self) -> u64 {
        let lo = self.next_u32() as u64;
        let hi = self.next_u32() as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Mulberry32 {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }
}

/// Default sampler: uniform points from [`Mulberry32`], drawn x, y, z per seed.
#[derive(Clone, Copy, Debug, Default)]
pub struct Mulberry32Sampler;

impl SeedSampler for Mulberry32Sampler {
    fn generate_seeds(&self, count: usize, bounds: &BoundingBox, seed_value: u32) -> Vec<[f64; 3]> {
        let mut rng = Mulberry32::new(seed_value);
        let h = bounds.half_extents();
        (0..count)
            .map(|_| {
                let x = (rng.next_unit() * 2.0 - 1.0) * h[0];
                let y = (rng.next_unit() * 2.0 - 1.0) * h[1];
                let z = (rng.next_unit() * 2.0 - 1.0) * h[2];
                [x, y, z]
            })
            .collect()
    }
}

/// Uniform points drawn from `rand`'s standard generator.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdRngSampler;

impl SeedSampler for StdRngSampler {
    fn generate_seeds(&self, count: usize, bounds: &BoundingBox, seed_value: u32) -> Vec<[f64; 3]> {
        let mut rng = StdRng::seed_from_u64(seed_value as u64);
        let min = bounds.min();
        let d = bounds.dims;
        (0..count)
            .map(|_| {
                let x = min[0] + rng.r#gen::<f64>() * d[0];
                let y = min[1] + rng.r#gen::<f64>() * d[1];
                let z = min[2] + rng.r#gen::<f64>() * d[2];
                [x, y, z]
            })
            .collect()
    }
}
