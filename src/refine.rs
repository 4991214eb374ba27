use crate::bounds::BoundingBox;
use crate::mesh::CellMesh;
use crate::params::Params;
use std::collections::HashMap;

/// Vertices closer than this (per component) are merged by [`weld`].
pub const WELD_TOLERANCE: f64 = 1e-4;

/// Fraction of the way each vertex moves towards its neighbour average per pass.
pub const SMOOTHING_FACTOR: f64 = 0.5;

/// Directions shorter than this count as zero when normalizing the explode direction.
const EXPLODE_EPSILON: f64 = 1e-9;

/// How raw cell surfaces are post-processed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RefineOptions {
    /// Laplacian smoothing passes.
    pub iterations: u32,
    /// Weld into an indexed mesh. Smoothing welds regardless.
    pub weld: bool,
}

impl Default for RefineOptions {
    fn default() -> Self {
        Self { iterations: 0, weld: true }
    }
}

impl From<&Params> for RefineOptions {
    fn from(params: &Params) -> Self {
        Self {
            iterations: params.smoothing,
            weld: params.weld,
        }
    }
}

/// Vertex and optional index buffers of a mesh being refined.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshBuffers {
    pub positions: Vec<f64>,
    pub indices: Option<Vec<u32>>,
}

impl MeshBuffers {
    /// Wraps a triangle soup (three vertices per triangle, no index buffer).
    pub fn from_soup(positions: Vec<f64>) -> Self {
        Self { positions, indices: None }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        match &self.indices {
            Some(indices) => indices.len() / 3,
            None => self.positions.len() / 9,
        }
    }
}

/// Runs the full refinement pipeline on the raw surface of one seed.
///
/// Returns `None` for an empty soup: the seed simply has no cell.
pub fn refine(seed: usize, soup: Vec<f64>, options: &RefineOptions, bounds: &BoundingBox) -> Option<CellMesh> {
    if soup.is_empty() {
        return None;
    }

    let mut mesh = MeshBuffers::from_soup(soup);
    if options.weld || options.iterations > 0 {
        mesh = weld(&mesh, WELD_TOLERANCE);
    }
    smooth(&mut mesh, options.iterations);
    clamp_to_box(&mut mesh.positions, bounds);
    fix_winding(&mut mesh);
    Some(finalize(seed, mesh))
}

/// Merges vertices that fall in the same `tolerance`-sized bucket.
///
/// The first vertex of each bucket is kept as its representative and the result is
/// always indexed. Welding an already welded mesh leaves it unchanged.
pub fn weld(mesh: &MeshBuffers, tolerance: f64) -> MeshBuffers {
    let scale = 1.0 / tolerance;
    let count = mesh.vertex_count();
    let mut lookup: HashMap<[i64; 3], u32> = HashMap::with_capacity(count);
    let mut remap = Vec::with_capacity(count);
    let mut positions = Vec::new();

    for v in mesh.positions.chunks_exact(3) {
        let key = [
            (v[0] * scale).round() as i64,
            (v[1] * scale).round() as i64,
            (v[2] * scale).round() as i64,
        ];
        let next = (positions.len() / 3) as u32;
        let index = *lookup.entry(key).or_insert_with(|| {
            positions.extend_from_slice(v);
            next
        });
        remap.push(index);
    }

    let indices = match &mesh.indices {
        Some(indices) => indices.iter().map(|&i| remap[i as usize]).collect(),
        None => remap,
    };

    MeshBuffers {
        positions,
        indices: Some(indices),
    }
}

/// Undirected vertex adjacency derived from the triangles of an index buffer.
pub fn adjacency(vertex_count: usize, indices: &[u32]) -> Vec<Vec<u32>> {
    let mut neighbors = vec![Vec::new(); vertex_count];
    for t in indices.chunks_exact(3) {
        for (a, b) in [(t[0], t[1]), (t[1], t[2]), (t[2], t[0])] {
            neighbors[a as usize].push(b);
            neighbors[b as usize].push(a);
        }
    }
    for n in &mut neighbors {
        n.sort_unstable();
        n.dedup();
    }
    neighbors
}

/// Laplacian smoothing with factor [`SMOOTHING_FACTOR`].
///
/// All vertices of a pass move together: positions are read from the previous pass and
/// written to a second buffer. Vertices without neighbours stay put. Unindexed meshes
/// have no shared topology and are left untouched.
pub fn smooth(mesh: &mut MeshBuffers, iterations: u32) {
    let Some(indices) = &mesh.indices else {
        return;
    };
    if iterations == 0 {
        return;
    }

    let neighbors = adjacency(mesh.vertex_count(), indices);
    let mut current = std::mem::take(&mut mesh.positions);
    let mut next = current.clone();

    for _ in 0..iterations {
        for (i, adjacent) in neighbors.iter().enumerate() {
            if adjacent.is_empty() {
                next[i * 3..i * 3 + 3].copy_from_slice(&current[i * 3..i * 3 + 3]);
                continue;
            }
            let mut mean = [0.0; 3];
            for &j in adjacent {
                let j = j as usize;
                mean[0] += current[j * 3];
                mean[1] += current[j * 3 + 1];
                mean[2] += current[j * 3 + 2];
            }
            let inv = 1.0 / adjacent.len() as f64;
            for a in 0..3 {
                let p = current[i * 3 + a];
                next[i * 3 + a] = p + SMOOTHING_FACTOR * (mean[a] * inv - p);
            }
        }
        std::mem::swap(&mut current, &mut next);
    }

    mesh.positions = current;
}

/// Clamps every vertex onto the box.
pub fn clamp_to_box(positions: &mut [f64], bounds: &BoundingBox) {
    for v in positions.chunks_exact_mut(3) {
        let c = bounds.clamp([v[0], v[1], v[2]]);
        v.copy_from_slice(&c);
    }
}

/// Reverses the orientation of every triangle by swapping its second and third corner.
///
/// The cube tables wind triangles with normals facing into the region; after this pass
/// they face outwards.
pub fn fix_winding(mesh: &mut MeshBuffers) {
    match &mut mesh.indices {
        Some(indices) => {
            for t in indices.chunks_exact_mut(3) {
                t.swap(1, 2);
            }
        }
        None => {
            for t in mesh.positions.chunks_exact_mut(9) {
                let (head, tail) = t.split_at_mut(6);
                head[3..6].swap_with_slice(&mut tail[..3]);
            }
        }
    }
}

/// Centres the mesh on its bounding box and derives the cell's placement metadata.
pub fn finalize(seed: usize, mesh: MeshBuffers) -> CellMesh {
    let MeshBuffers { mut positions, indices } = mesh;

    let mut min = [f64::INFINITY; 3];
    let mut max = [f64::NEG_INFINITY; 3];
    for v in positions.chunks_exact(3) {
        for a in 0..3 {
            min[a] = min[a].min(v[a]);
            max[a] = max[a].max(v[a]);
        }
    }
    let centroid = if positions.is_empty() {
        [0.0; 3]
    } else {
        [0, 1, 2].map(|a| (min[a] + max[a]) * 0.5)
    };

    for v in positions.chunks_exact_mut(3) {
        for a in 0..3 {
            v[a] -= centroid[a];
        }
    }

    CellMesh {
        seed,
        positions,
        indices,
        centroid,
        explode_direction: normalize_or_zero(centroid),
    }
}

fn normalize_or_zero(v: [f64; 3]) -> [f64; 3] {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if len <= EXPLODE_EPSILON {
        return [0.0; 3];
    }
    [v[0] / len, v[1] / len, v[2] / len]
}
