//! # Voxel Engine Core
//!
//! This module contains the voxel data model and the terrain side of the
//! chunk pipeline.
//!
//! ## Architecture
//!
//! * **Block**: the packed per-voxel record, block definitions, draw types and faces
//! * **Biome**: noise and layer parameters for terrain columns
//! * **Definitions**: the frozen master tables and their per-worker duplicates
//! * **Chunk**: a 16x128x16 column of records plus its eight mesh slots
//! * **World**: the `ChunkRegistry` of resident chunks
//! * **Tasks**: the background terrain generator
//!
//! ## Data Flow
//!
//! 1. A chunk position is pushed to the terrain generator
//! 2. The generator builds a `Chunk` from noise and its private definitions copy
//! 3. The pipeline director commits the chunk to the registry
//! 4. Snapshots of the chunk and its neighbours are sent to the mesh builder
//!
//! ## Thread Safety
//!
//! Nothing in this module is shared between threads. Chunks move from the
//! generator to the consuming thread by value; snapshots are immutable and
//! shared behind an `Arc`.

pub mod biome;
pub mod block;
pub mod chunk;
pub mod definitions;
pub mod position;
pub mod tasks;
pub mod world;
