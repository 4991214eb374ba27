//! # voroblock
//!
//! `voroblock` decomposes a box into solid Voronoi cells under the Manhattan (L1) metric
//! and extracts a closed triangle surface for every cell. It is designed to be used in
//! Rust as well as compiled to WebAssembly (WASM).
//!
//! ## Pipeline
//!
//! 1. **Grid**: a padded vertex lattice is laid over the box, its resolution set by a
//!    density parameter.
//! 2. **Distance field**: every lattice vertex inside the box is assigned to its nearest
//!    seed in the L1 metric, ties going to the lowest seed index.
//! 3. **Extraction**: for each seed, the boundary of its region is extracted with
//!    marching cubes over the binary "owned by this seed" field.
//! 4. **Refinement**: duplicate vertices are welded, the staircase surface is relaxed
//!    with Laplacian smoothing, clamped back into the box and rewound to face outwards.
//!
//! The L1 metric is intentional: cells come out with axis-aligned, faceted faces that
//! look nothing like Euclidean Voronoi cells. The result is a discretized approximation
//! whose fidelity is bounded by the grid resolution.
//!
//! ## Visibility
//!
//! A [`CellRegistry`] keeps the meshes of the current rebuild together with a set of
//! hidden cells and an undo/redo history of that set, reporting only the cells whose
//! visibility actually changes.
//!
//! ## Main Interface
//!
//! [`rebuild`] turns [`Params`] into a [`Decomposition`]; [`Session`] adds persistent
//! visibility on top. JavaScript hosts use the `VoronoiBlocks` class.

mod bounds;
mod engine;
mod error;
mod extract;
mod field;
mod grid;
mod history;
mod mesh;
mod params;
mod registry;
mod sampler;
mod session;
pub mod refine;
pub mod tables;
mod wasm;

pub use bounds::BoundingBox;
pub use bounds::MIN_BOX_DIM;
pub use engine::decompose;
pub use engine::rebuild;
pub use engine::Decomposition;
pub use engine::RebuildStats;
pub use error::Error;
pub use error::Result;
pub use extract::extract_cell;
pub use extract::ISO_LEVEL;
pub use field::manhattan;
pub use field::nearest_seed;
pub use field::AssignmentField;
pub use field::BOUNDARY_EPSILON;
pub use field::UNASSIGNED;
pub use grid::Grid;
pub use history::HiddenSet;
pub use history::History;
pub use history::HISTORY_LIMIT;
pub use mesh::CellMesh;
pub use params::Composition;
pub use params::Params;
pub use params::MIN_DENSITY;
pub use refine::RefineOptions;
pub use registry::CellRegistry;
pub use registry::VisibilityChange;
pub use sampler::Mulberry32;
pub use sampler::Mulberry32Sampler;
pub use sampler::SeedSampler;
pub use sampler::StdRngSampler;
pub use session::Session;
pub use wasm::VoronoiBlocks;
