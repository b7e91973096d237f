//! # World Module
//!
//! This module provides the `ChunkRegistry`, the map from chunk position to
//! resident chunk.
//!
//! ## Ownership
//!
//! The registry lives on the consuming thread and is the only owner of
//! resident chunks. Workers never see it; the mesh builder receives
//! `ChunkSnapshot` copies instead.
//!
//! ## Updates
//!
//! Storing a chunk at a position that is already resident copies the new
//! block records into the existing chunk rather than replacing it, so the
//! mesh handles already attached to that chunk survive a data refresh.

use std::{collections::HashMap, sync::Arc};

use log::debug;

use super::{
    chunk::{Chunk, ChunkSnapshot},
    position::{CardinalDirection, ChunkPosition},
};
use crate::{core::error::GridError, engine_state::rendering::MeshStorage};

/// Map from chunk position to chunk, with O(1) average lookup.
///
/// # Examples
///
/// ```
/// use chunk_pipeline::engine_state::voxels::{chunk::Chunk, position::ChunkPosition, world::ChunkRegistry};
///
/// let mut registry = ChunkRegistry::new();
/// registry.add_or_update(Chunk::new(ChunkPosition::new(0, 0)))?;
///
/// assert!(registry.has(ChunkPosition::new(0, 0)));
/// assert!(registry.get(ChunkPosition::new(1, 0)).is_none());
/// # Ok::<(), chunk_pipeline::core::error::GridError>(())
/// ```
#[derive(Debug, Default)]
pub struct ChunkRegistry {
    chunks: HashMap<ChunkPosition, Chunk>,
}

impl ChunkRegistry {
    pub fn new() -> Self {
        ChunkRegistry {
            chunks: HashMap::new(),
        }
    }

    /// Stores a freshly generated chunk.
    ///
    /// # Arguments
    /// * `chunk` - The chunk to store
    ///
    /// # Returns
    /// `true` if the position was not resident before, `false` if an existing
    /// chunk's records were refreshed in place
    pub fn add_or_update(&mut self, chunk: Chunk) -> Result<bool, GridError> {
        let position = chunk.position();

        match self.chunks.get_mut(&position) {
            Some(existing) => {
                existing.grid_mut().bulk_replace(&chunk.grid().bulk_copy())?;
                debug!("Updated chunk {} in place", position);
                Ok(false)
            }
            None => {
                self.chunks.insert(position, chunk);
                debug!("Stored chunk {}", position);
                Ok(true)
            }
        }
    }

    pub fn get(&self, position: ChunkPosition) -> Option<&Chunk> {
        self.chunks.get(&position)
    }

    pub fn get_mut(&mut self, position: ChunkPosition) -> Option<&mut Chunk> {
        self.chunks.get_mut(&position)
    }

    pub fn has(&self, position: ChunkPosition) -> bool {
        self.chunks.contains_key(&position)
    }

    /// Removes a chunk and releases its mesh handles.
    ///
    /// # Returns
    /// Whether a chunk was resident at `position`
    pub fn unload(&mut self, position: ChunkPosition, storage: &mut dyn MeshStorage) -> bool {
        match self.chunks.remove(&position) {
            Some(mut chunk) => {
                chunk.release_meshes(storage);
                debug!("Unloaded chunk {}", position);
                true
            }
            None => false,
        }
    }

    /// Copies a chunk's grid and the grids of its resident cardinal neighbours.
    pub fn snapshot(&self, position: ChunkPosition) -> Option<Arc<ChunkSnapshot>> {
        let chunk = self.chunks.get(&position)?;

        let snapshot = CardinalDirection::ALL.into_iter().fold(
            ChunkSnapshot::new(position, chunk.grid().clone()),
            |snapshot, direction| match position
                .neighbor(direction)
                .and_then(|neighbor| self.chunks.get(&neighbor))
            {
                Some(neighbor) => snapshot.with_neighbor(direction, neighbor.grid().clone()),
                None => snapshot,
            },
        );

        Some(Arc::new(snapshot))
    }

    /// Resident cardinal neighbours of `position`.
    pub fn resident_neighbors(&self, position: ChunkPosition) -> Vec<ChunkPosition> {
        CardinalDirection::ALL
            .into_iter()
            .filter_map(|direction| position.neighbor(direction))
            .filter(|neighbor| self.has(*neighbor))
            .collect()
    }

    pub fn positions(&self) -> impl Iterator<Item = ChunkPosition> + '_ {
        self.chunks.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}
