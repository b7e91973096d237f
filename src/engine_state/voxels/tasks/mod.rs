//! # Voxel Task System
//!
//! This module contains the terrain side of the background work: the
//! `ChunkGenerationTask` and the `TerrainGenerator` worker that runs it.

pub mod chunk_generation_task;
