use crate::error::Error;
use crate::params::Params;
use crate::registry::VisibilityChange;
use crate::session::Session;
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen_rayon::init_thread_pool;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn init_threads(n: usize) -> js_sys::Promise {
    init_thread_pool(n)
}

/// JavaScript entry point: a decomposition session with visibility history.
///
/// Visibility methods return the cells to animate as a flat `Int32Array` of
/// `[seed, hidden, seed, hidden, ...]` pairs, where `hidden` is `1` or `0`.
#[wasm_bindgen]
pub struct VoronoiBlocks {
    inner: Session,
}

impl Default for VoronoiBlocks {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl VoronoiBlocks {
    #[wasm_bindgen(constructor)]
    pub fn new() -> VoronoiBlocks {
        VoronoiBlocks {
            inner: Session::default(),
        }
    }

    /// Sets all parameters and rebuilds. Values are clamped to the supported minimums.
    #[allow(clippy::too_many_arguments)]
    pub fn set_params(
        &mut self,
        x: f64,
        y: f64,
        z: f64,
        point_count: usize,
        seed: u32,
        density: f64,
        smoothing: u32,
    ) -> Result<(), JsValue> {
        let params = Params {
            dims: [x, y, z],
            point_count,
            seed,
            density,
            smoothing,
            weld: self.inner.params().weld,
        };
        self.inner.apply(params).map(|_| ()).map_err(to_js)
    }

    /// Switches between indexed (welded) and flat triangle output, then rebuilds.
    pub fn set_weld(&mut self, weld: bool) -> Result<(), JsValue> {
        let params = Params { weld, ..self.inner.params().clone() };
        self.inner.apply(params).map(|_| ()).map_err(to_js)
    }

    pub fn rebuild(&mut self) -> Result<(), JsValue> {
        self.inner.rebuild().map(|_| ()).map_err(to_js)
    }

    #[wasm_bindgen(getter)]
    pub fn count_seeds(&self) -> usize {
        self.inner.seeds().len()
    }

    #[wasm_bindgen(getter)]
    pub fn count_cells(&self) -> usize {
        self.inner.stats().cell_count
    }

    #[wasm_bindgen(getter)]
    pub fn count_triangles(&self) -> usize {
        self.inner.stats().triangle_count
    }

    #[wasm_bindgen(getter)]
    pub fn count_vertices(&self) -> usize {
        self.inner.stats().vertex_count
    }

    /// Seed positions as `[x, y, z, x, y, z, ...]`.
    #[wasm_bindgen(getter)]
    pub fn seeds(&self) -> Vec<f64> {
        self.inner.seeds().iter().flatten().copied().collect()
    }

    /// Vertex positions of a cell, relative to its centroid.
    pub fn cell_positions(&self, seed: usize) -> Option<Vec<f64>> {
        self.inner.get_cell(seed).map(|c| c.positions().to_vec())
    }

    /// Triangle indices of a cell, or `undefined` for flat output and missing cells.
    pub fn cell_indices(&self, seed: usize) -> Option<Vec<u32>> {
        self.inner.get_cell(seed).and_then(|c| c.indices().map(<[u32]>::to_vec))
    }

    pub fn cell_centroid(&self, seed: usize) -> Option<Vec<f64>> {
        self.inner.get_cell(seed).map(|c| c.centroid().to_vec())
    }

    pub fn cell_explode_direction(&self, seed: usize) -> Option<Vec<f64>> {
        self.inner.get_cell(seed).map(|c| c.explode_direction().to_vec())
    }

    pub fn is_hidden(&self, seed: usize) -> bool {
        self.inner.registry().is_hidden(seed)
    }

    pub fn target_scale(&self, seed: usize) -> f64 {
        self.inner.registry().target_scale(seed)
    }

    pub fn hide(&mut self, seed: usize) -> Vec<i32> {
        encode_changes(&self.inner.hide(seed))
    }

    pub fn unhide_all(&mut self) -> Vec<i32> {
        encode_changes(&self.inner.unhide_all())
    }

    pub fn undo(&mut self) -> Vec<i32> {
        encode_changes(&self.inner.undo())
    }

    pub fn redo(&mut self) -> Vec<i32> {
        encode_changes(&self.inner.redo())
    }

    #[wasm_bindgen(getter)]
    pub fn can_undo(&self) -> bool {
        self.inner.registry().can_undo()
    }

    #[wasm_bindgen(getter)]
    pub fn can_redo(&self) -> bool {
        self.inner.registry().can_redo()
    }
}

fn encode_changes(changes: &[VisibilityChange]) -> Vec<i32> {
    changes
        .iter()
        .flat_map(|c| [c.seed as i32, c.hidden as i32])
        .collect()
}

fn to_js(err: Error) -> JsValue {
    JsValue::from_str(&err.to_string())
}
