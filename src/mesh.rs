/// A refined surface enclosing the region of one seed.
///
/// `positions` are stored relative to `centroid` (the centre of the mesh's bounding
/// box), so scaling the cell about its own position keeps it in place.
#[derive(Clone, Debug, PartialEq)]
pub struct CellMesh {
    pub(crate) seed: usize,
    // Flat array of vertices [x, y, z, x, y, z, ...], relative to the centroid
    pub(crate) positions: Vec<f64>,
    // Three indices per triangle; None for an unwelded triangle soup
    pub(crate) indices: Option<Vec<u32>>,
    pub(crate) centroid: [f64; 3],
    pub(crate) explode_direction: [f64; 3],
}

impl CellMesh {
    /// Index of the seed this cell belongs to.
    pub fn seed(&self) -> usize {
        self.seed
    }

    pub fn positions(&self) -> &[f64] {
        &self.positions
    }

    pub fn indices(&self) -> Option<&[u32]> {
        self.indices.as_deref()
    }

    pub fn is_indexed(&self) -> bool {
        self.indices.is_some()
    }

    /// Centre of the cell's bounding box, in box coordinates.
    pub fn centroid(&self) -> [f64; 3] {
        self.centroid
    }

    /// Unit vector from the box centre towards the cell, or zero for a centred cell.
    pub fn explode_direction(&self) -> [f64; 3] {
        self.explode_direction
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

    /// Vertex positions translated back into box coordinates.
    pub fn world_positions(&self) -> Vec<f64> {
        self.positions
            .chunks_exact(3)
            .flat_map(|v| [v[0] + self.centroid[0], v[1] + self.centroid[1], v[2] + self.centroid[2]])
            .collect()
    }

    /// Corner indices of every triangle, whether or not the mesh is indexed.
    pub fn triangles(&self) -> Vec<[usize; 3]> {
        match &self.indices {
            Some(indices) => indices
                .chunks_exact(3)
                .map(|t| [t[0] as usize, t[1] as usize, t[2] as usize])
                .collect(),
            None => (0..self.triangle_count()).map(|t| [t * 3, t * 3 + 1, t * 3 + 2]).collect(),
        }
    }

    /// Enclosed volume via the divergence theorem; positive when the triangles wind
    /// counter-clockwise seen from outside.
    pub fn signed_volume(&self) -> f64 {
        let p = &self.positions;
        let vertex = |i: usize| [p[i * 3], p[i * 3 + 1], p[i * 3 + 2]];
        let mut volume = 0.0;
        for [a, b, c] in self.triangles() {
            let (v0, v1, v2) = (vertex(a), vertex(b), vertex(c));
            volume += v0[0] * (v1[1] * v2[2] - v1[2] * v2[1])
                + v0[1] * (v1[2] * v2[0] - v1[0] * v2[2])
                + v0[2] * (v1[0] * v2[1] - v1[1] * v2[0]);
        }
        volume / 6.0
    }
}
