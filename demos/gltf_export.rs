//! Writes every cell of a decomposition to a binary glTF file, one node per cell.
//!
//! Usage: `cargo run --example gltf_export [params.json] [explode]`

use gltf::json;
use gltf::json::validation::{Checked, USize64};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use voroblock::{CellMesh, Mulberry32Sampler, Params, Session};

struct CellRange {
    pos_offset: usize,
    pos_len: usize,
    ind_offset: usize,
    ind_len: usize,
    vertex_count: usize,
    index_count: usize,
    min: [f32; 3],
    max: [f32; 3],
    translation: [f32; 3],
    seed: usize,
}

struct GltfBuilder {
    buffer_data: Vec<u8>,
    cells: Vec<CellRange>,
}

impl GltfBuilder {
    fn new() -> Self {
        Self {
            buffer_data: Vec::new(),
            cells: Vec::new(),
        }
    }

    fn pad(&mut self) {
        while self.buffer_data.len() % 4 != 0 {
            self.buffer_data.push(0);
        }
    }

    /// Adds a cell with its vertices relative to the centroid, pushed out along the
    /// explode direction by `explode`.
    fn add_cell(&mut self, cell: &CellMesh, explode: f64) -> Result<(), Box<dyn std::error::Error>> {
        self.pad();
        let pos_offset = self.buffer_data.len();
        let mut min = [f32::MAX; 3];
        let mut max = [f32::MIN; 3];
        for v in cell.positions().chunks(3) {
            for i in 0..3 {
                let c = v[i] as f32;
                min[i] = min[i].min(c);
                max[i] = max[i].max(c);
                self.buffer_data.write_all(&c.to_le_bytes())?;
            }
        }
        let pos_len = self.buffer_data.len() - pos_offset;

        // Flat output has no index buffer, so emit the implicit one.
        let indices: Vec<u32> = match cell.indices() {
            Some(indices) => indices.to_vec(),
            None => (0..cell.vertex_count() as u32).collect(),
        };
        self.pad();
        let ind_offset = self.buffer_data.len();
        for i in &indices {
            self.buffer_data.write_all(&i.to_le_bytes())?;
        }
        let ind_len = self.buffer_data.len() - ind_offset;

        let c = cell.centroid();
        let d = cell.explode_direction();
        let translation = [0, 1, 2].map(|a| (c[a] + d[a] * explode) as f32);

        self.cells.push(CellRange {
            pos_offset,
            pos_len,
            ind_offset,
            ind_len,
            vertex_count: cell.vertex_count(),
            index_count: indices.len(),
            min,
            max,
            translation,
            seed: cell.seed(),
        });
        Ok(())
    }

    fn save(mut self, filename: &str) -> Result<(), Box<dyn std::error::Error>> {
        self.pad();

        let mut buffer_views = Vec::new();
        let mut accessors = Vec::new();
        let mut meshes = Vec::new();
        let mut nodes = Vec::new();

        for (i, cell) in self.cells.iter().enumerate() {
            buffer_views.push(json::buffer::View {
                buffer: json::Index::new(0),
                byte_length: USize64(cell.pos_len as u64),
                byte_offset: Some(USize64(cell.pos_offset as u64)),
                byte_stride: Some(json::buffer::Stride(12)),
                name: None,
                target: Some(Checked::Valid(json::buffer::Target::ArrayBuffer)),
                extensions: Default::default(),
                extras: Default::default(),
            });
            buffer_views.push(json::buffer::View {
                buffer: json::Index::new(0),
                byte_length: USize64(cell.ind_len as u64),
                byte_offset: Some(USize64(cell.ind_offset as u64)),
                byte_stride: None,
                name: None,
                target: Some(Checked::Valid(json::buffer::Target::ElementArrayBuffer)),
                extensions: Default::default(),
                extras: Default::default(),
            });

            let pos_accessor = accessors.len() as u32;
            accessors.push(json::Accessor {
                buffer_view: Some(json::Index::new(2 * i as u32)),
                byte_offset: Some(USize64(0)),
                count: USize64(cell.vertex_count as u64),
                component_type: Checked::Valid(json::accessor::GenericComponentType(
                    json::accessor::ComponentType::F32,
                )),
                extensions: Default::default(),
                extras: Default::default(),
                type_: Checked::Valid(json::accessor::Type::Vec3),
                min: Some(json::Value::from(Vec::from(cell.min))),
                max: Some(json::Value::from(Vec::from(cell.max))),
                name: None,
                normalized: false,
                sparse: None,
            });
            accessors.push(json::Accessor {
                buffer_view: Some(json::Index::new(2 * i as u32 + 1)),
                byte_offset: Some(USize64(0)),
                count: USize64(cell.index_count as u64),
                component_type: Checked::Valid(json::accessor::GenericComponentType(
                    json::accessor::ComponentType::U32,
                )),
                extensions: Default::default(),
                extras: Default::default(),
                type_: Checked::Valid(json::accessor::Type::Scalar),
                min: None,
                max: None,
                name: None,
                normalized: false,
                sparse: None,
            });

            let primitive = json::mesh::Primitive {
                attributes: {
                    let mut map = BTreeMap::new();
                    map.insert(
                        Checked::Valid(json::mesh::Semantic::Positions),
                        json::Index::new(pos_accessor),
                    );
                    map
                },
                extensions: Default::default(),
                extras: Default::default(),
                indices: Some(json::Index::new(pos_accessor + 1)),
                material: Some(json::Index::new(0)),
                mode: Checked::Valid(json::mesh::Mode::Triangles),
                targets: None,
            };
            meshes.push(json::Mesh {
                extensions: Default::default(),
                extras: Default::default(),
                name: Some(format!("cell_{}", cell.seed)),
                primitives: vec![primitive],
                weights: None,
            });
            nodes.push(json::Node {
                camera: None,
                children: None,
                extensions: Default::default(),
                extras: Default::default(),
                matrix: None,
                mesh: Some(json::Index::new(i as u32)),
                name: Some(format!("cell_{}", cell.seed)),
                rotation: None,
                scale: None,
                skin: None,
                translation: Some(cell.translation),
                weights: None,
            });
        }

        let material = json::Material {
            name: Some("Stone".to_string()),
            pbr_metallic_roughness: json::material::PbrMetallicRoughness {
                base_color_factor: json::material::PbrBaseColorFactor([0.8, 0.78, 0.72, 1.0]),
                metallic_factor: json::material::StrengthFactor(0.0),
                roughness_factor: json::material::StrengthFactor(0.8),
                ..Default::default()
            },
            ..Default::default()
        };

        let buffer = json::Buffer {
            byte_length: USize64(self.buffer_data.len() as u64),
            uri: None,
            extensions: Default::default(),
            extras: Default::default(),
            name: None,
        };

        let scene_nodes = (0..nodes.len() as u32).map(json::Index::new).collect();
        let root = json::Root {
            accessors,
            asset: json::Asset {
                generator: Some("voroblock example".to_string()),
                version: "2.0".to_string(),
                ..Default::default()
            },
            buffers: vec![buffer],
            buffer_views,
            materials: vec![material],
            meshes,
            nodes,
            scene: Some(json::Index::new(0)),
            scenes: vec![json::Scene {
                extensions: Default::default(),
                extras: Default::default(),
                name: None,
                nodes: scene_nodes,
            }],
            ..Default::default()
        };

        let json_string = json::serialize::to_string(&root)?;
        let mut json_bytes = json_string.into_bytes();
        while json_bytes.len() % 4 != 0 {
            json_bytes.push(0x20);
        }

        let total_length = 12 + 8 + json_bytes.len() as u32 + 8 + self.buffer_data.len() as u32;

        let mut file = File::create(filename)?;
        file.write_all(b"glTF")?;
        file.write_all(&2u32.to_le_bytes())?;
        file.write_all(&total_length.to_le_bytes())?;

        file.write_all(&(json_bytes.len() as u32).to_le_bytes())?;
        file.write_all(b"JSON")?;
        file.write_all(&json_bytes)?;

        file.write_all(&(self.buffer_data.len() as u32).to_le_bytes())?;
        file.write_all(b"BIN\0")?;
        file.write_all(&self.buffer_data)?;

        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let mut args = std::env::args().skip(1);
    let params: Params = match args.next() {
        Some(path) => serde_json::from_reader(File::open(path)?)?,
        None => Params::default(),
    };
    let explode: f64 = match args.next() {
        Some(v) => v.parse()?,
        None => 1.5,
    };

    let mut session = Session::new(Mulberry32Sampler);
    let stats = session.apply(params)?;
    println!(
        "{} cells, {} triangles, {} vertices",
        stats.cell_count, stats.triangle_count, stats.vertex_count
    );

    let mut builder = GltfBuilder::new();
    for cell in session.registry().cells().iter().flatten() {
        builder.add_cell(cell, explode)?;
    }

    let filename = "voroblock.glb";
    builder.save(filename)?;
    println!("Output saved to {}", filename);
    Ok(())
}
