//! Background tasks for the rendering system.
//!
//! # Available Tasks
//! - `ChunkMeshGenerationTask`: Builds the mesh record of one chunk stack,
//!   run by the `MeshBuilder` worker

pub mod chunk_mesh_generation_task;
