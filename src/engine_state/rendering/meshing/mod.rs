//! Mesh generation for voxel rendering.
//!
//! This module converts chunk snapshots into per-stack geometry. Each of the
//! eight 16-block-tall stacks of a chunk becomes one `MeshRecord`.
//!
//! # Architecture
//! - `MeshRecord`: geometry for one stack, tagged with a fresh handle id
//! - `Face`: one quad of one voxel, with its four corners
//! - `BlockPalette`: per-id draw information resolved once from the definition tables
//! - `culled_stack`: the face-culling mesher
//!
//! # Usage
//! ```no_run
//! use chunk_pipeline::engine_state::rendering::meshing::{culled_stack, BlockPalette};
//! use chunk_pipeline::engine_state::voxels::{chunk::ChunkSnapshot, definitions::DefinitionTables};
//!
//! let definitions = DefinitionTables::default_content()?;
//! let palette = BlockPalette::from_definitions(&definitions);
//! # let snapshot: ChunkSnapshot = unimplemented!();
//! let record = culled_stack(&snapshot, &palette, 0)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod mesh;

pub use mesh::*;
