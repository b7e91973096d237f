//! # Chunk Module
//!
//! This module provides the `Chunk` struct: one 16x128x16 column of the world,
//! its block records and the mesh handles of its eight vertical stacks.
//!
//! ## Mesh Slots
//!
//! Each 16-block-tall stack has one slot that is either empty or owns a
//! `MeshHandle`. Storing a handle into an occupied slot releases the previous
//! handle first, so re-meshing never leaks render resources.
//!
//! ## Snapshots
//!
//! The mesh builder never sees a `Chunk`. It works on a `ChunkSnapshot`: an
//! immutable copy of the chunk's grid plus copies of the grids of whichever
//! cardinal neighbours were resident when the snapshot was taken.

use crate::{
    core::error::GridError,
    engine_state::{
        rendering::{MeshHandle, MeshStorage},
        voxels::{block::block_record::BlockRecord, position::{CardinalDirection, ChunkPosition}},
    },
};

use chunk_grid::{ChunkGrid, CHUNK_HEIGHT};

pub mod chunk_grid;

/// Height of one mesh stack in blocks.
pub const STACK_HEIGHT: i32 = 16;
/// Number of mesh stacks per chunk.
pub const MESH_STACK_COUNT: usize = (CHUNK_HEIGHT / STACK_HEIGHT) as usize;

/// Represents a 16x128x16 column of voxel blocks in the world.
///
/// Chunks are created by the terrain generator and owned by the chunk
/// registry for the rest of their life.
#[derive(Debug)]
pub struct Chunk {
    /// The position of this chunk in chunk coordinates (not block coordinates).
    position: ChunkPosition,

    grid: ChunkGrid,

    /// One slot per stack, bottom stack first.
    meshes: [Option<MeshHandle>; MESH_STACK_COUNT],
}

impl Chunk {
    /// Creates a chunk filled with air and no meshes.
    pub fn new(position: ChunkPosition) -> Self {
        Self::with_grid(position, ChunkGrid::new())
    }

    pub fn with_grid(position: ChunkPosition, grid: ChunkGrid) -> Self {
        Chunk {
            position,
            grid,
            meshes: Default::default(),
        }
    }

    pub fn position(&self) -> ChunkPosition {
        self.position
    }

    pub fn grid(&self) -> &ChunkGrid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut ChunkGrid {
        &mut self.grid
    }

    /// Gets the record at the specified chunk-relative coordinates.
    pub fn get_block(&self, x: i32, y: i32, z: i32) -> Result<BlockRecord, GridError> {
        self.grid.get(x, y, z)
    }

    pub fn set_block(&mut self, x: i32, y: i32, z: i32, record: BlockRecord) -> Result<(), GridError> {
        self.grid.set(x, y, z, record)
    }

    /// Checks that `stack_index` names one of the eight mesh slots.
    pub fn check_stack(stack_index: usize) -> Result<(), GridError> {
        if stack_index < MESH_STACK_COUNT {
            Ok(())
        } else {
            Err(GridError::StackOutOfBounds { stack: stack_index })
        }
    }

    /// Stores `handle` in a mesh slot.
    ///
    /// If the slot already holds a handle, that handle is released through
    /// `storage` before the new one is stored.
    ///
    /// # Arguments
    /// * `stack_index` - Which stack the handle belongs to, 0..8
    /// * `handle` - The new mesh handle
    /// * `storage` - Where the previous handle, if any, is released
    ///
    /// # Returns
    /// `GridError::StackOutOfBounds` for a bad stack; the new handle is released in that case
    pub fn set_mesh(
        &mut self,
        stack_index: usize,
        handle: MeshHandle,
        storage: &mut dyn MeshStorage,
    ) -> Result<(), GridError> {
        if let Err(err) = Self::check_stack(stack_index) {
            storage.release(handle);
            return Err(err);
        }

        if let Some(previous) = self.meshes[stack_index].take() {
            storage.release(previous);
        }
        self.meshes[stack_index] = Some(handle);
        Ok(())
    }

    /// Empties a mesh slot, releasing its handle.
    ///
    /// # Returns
    /// Whether the slot held a handle
    pub fn clear_mesh(
        &mut self,
        stack_index: usize,
        storage: &mut dyn MeshStorage,
    ) -> Result<bool, GridError> {
        Self::check_stack(stack_index)?;
        match self.meshes[stack_index].take() {
            Some(previous) => {
                storage.release(previous);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn get_mesh(&self, stack_index: usize) -> Result<Option<&MeshHandle>, GridError> {
        Self::check_stack(stack_index)?;
        Ok(self.meshes[stack_index].as_ref())
    }

    /// Releases every mesh handle the chunk holds.
    pub fn release_meshes(&mut self, storage: &mut dyn MeshStorage) {
        for slot in self.meshes.iter_mut() {
            if let Some(handle) = slot.take() {
                storage.release(handle);
            }
        }
    }

    pub fn meshed_stack_count(&self) -> usize {
        self.meshes.iter().filter(|slot| slot.is_some()).count()
    }
}

/// An immutable copy of a chunk grid and its resident neighbours' grids.
#[derive(Debug, Clone)]
pub struct ChunkSnapshot {
    pub position: ChunkPosition,
    pub grid: ChunkGrid,
    neighbors: [Option<ChunkGrid>; 4],
}

impl ChunkSnapshot {
    pub fn new(position: ChunkPosition, grid: ChunkGrid) -> Self {
        ChunkSnapshot {
            position,
            grid,
            neighbors: Default::default(),
        }
    }

    pub fn with_neighbor(mut self, direction: CardinalDirection, grid: ChunkGrid) -> Self {
        self.neighbors[direction as usize] = Some(grid);
        self
    }

    pub fn neighbor(&self, direction: CardinalDirection) -> Option<&ChunkGrid> {
        self.neighbors[direction as usize].as_ref()
    }
}
