use crate::engine::{rebuild, RebuildStats};
use crate::error::Result;
use crate::mesh::CellMesh;
use crate::params::Params;
use crate::registry::{CellRegistry, VisibilityChange};
use crate::sampler::{Mulberry32Sampler, SeedSampler};

/// Long-lived state behind an interactive view: the current parameters, the seeds and
/// cells of the latest rebuild, and the visibility registry.
///
/// All mutation goes through `&mut self`; hosts that share a session between threads
/// wrap it in a `Mutex`.
pub struct Session<S: SeedSampler = Mulberry32Sampler> {
    params: Params,
    sampler: S,
    seeds: Vec<[f64; 3]>,
    stats: RebuildStats,
    registry: CellRegistry,
}

impl Default for Session<Mulberry32Sampler> {
    fn default() -> Self {
        Self::new(Mulberry32Sampler)
    }
}

impl<S: SeedSampler> Session<S> {
    /// Creates a session with default parameters and nothing built yet.
    pub fn new(sampler: S) -> Self {
        Self {
            params: Params::default(),
            sampler,
            seeds: Vec::new(),
            stats: RebuildStats::default(),
            registry: CellRegistry::new(),
        }
    }

    /// Sanitizes `params`, rebuilds every cell and installs the result.
    ///
    /// The hidden set is kept when only density or smoothing changed. On error the
    /// previous cells stay in place.
    pub fn apply(&mut self, params: Params) -> Result<RebuildStats> {
        let params = params.sanitized();
        let decomposition = rebuild(&params, &self.sampler)?;
        self.registry.install(decomposition.cells, params.composition());
        self.seeds = decomposition.seeds;
        self.stats = decomposition.stats;
        self.params = params;
        Ok(self.stats)
    }

    /// Rebuilds with the current parameters.
    pub fn rebuild(&mut self) -> Result<RebuildStats> {
        self.apply(self.params.clone())
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn seeds(&self) -> &[[f64; 3]] {
        &self.seeds
    }

    pub fn stats(&self) -> RebuildStats {
        self.stats
    }

    pub fn registry(&self) -> &CellRegistry {
        &self.registry
    }

    pub fn get_cell(&self, seed: usize) -> Option<&CellMesh> {
        self.registry.get_cell(seed)
    }

    pub fn hide(&mut self, seed: usize) -> Vec<VisibilityChange> {
        self.registry.hide(seed)
    }

    pub fn unhide_all(&mut self) -> Vec<VisibilityChange> {
        self.registry.unhide_all()
    }

    pub fn undo(&mut self) -> Vec<VisibilityChange> {
        self.registry.undo()
    }

    pub fn redo(&mut self) -> Vec<VisibilityChange> {
        self.registry.redo()
    }
}
