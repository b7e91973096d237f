//! Mesh records produced by the mesh builder.

use std::sync::atomic::{AtomicU64, Ordering};

use super::face::{Face, FACE_INDICES};
use crate::engine_state::voxels::{block::block_definition::AtlasRect, position::ChunkPosition};

static NEXT_HANDLE_ID: AtomicU64 = AtomicU64::new(1);

/// Returns a process-wide unique mesh handle id. Never returns 0.
pub fn next_handle_id() -> u64 {
    NEXT_HANDLE_ID.fetch_add(1, Ordering::Relaxed)
}

/// Geometry for one 16-tall stack of one chunk.
///
/// Vertex positions are flat `x, y, z` triples in chunk-local space (y is
/// absolute within the column); texture coordinates are flat `u, v` pairs, one
/// pair per vertex. Every face contributes four vertices and six indices.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshRecord {
    pub handle_id: u64,
    pub chunk_position: ChunkPosition,
    pub stack_index: usize,
    pub vertex_positions: Vec<f32>,
    pub texture_coordinates: Vec<f32>,
    pub indices: Vec<u32>,
}

impl MeshRecord {
    /// Creates a record with no geometry and a fresh handle id.
    pub fn empty(chunk_position: ChunkPosition, stack_index: usize) -> Self {
        MeshRecord {
            handle_id: next_handle_id(),
            chunk_position,
            stack_index,
            vertex_positions: Vec::new(),
            texture_coordinates: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// True when the stack has nothing visible.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_positions.len() / 3
    }

    pub fn face_count(&self) -> usize {
        self.indices.len() / FACE_INDICES.len()
    }

    /// Appends one quad.
    ///
    /// # Arguments
    /// * `face` - The quad to append
    /// * `rect` - Atlas rectangle the quad's texture is taken from
    pub fn add_face(&mut self, face: &Face, rect: AtlasRect) {
        let base = self.vertex_count() as u32;

        for corner in face.corners() {
            self.vertex_positions
                .extend_from_slice(&[corner.x as f32, corner.y as f32, corner.z as f32]);
        }
        for uv in Face::texture_coordinates(rect) {
            self.texture_coordinates.extend_from_slice(&uv);
        }
        self.indices
            .extend(FACE_INDICES.iter().map(|index| base + index));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::block_side::BlockSide;

    #[test]
    fn handle_ids_are_unique() {
        let first = MeshRecord::empty(ChunkPosition::new(0, 0), 0);
        let second = MeshRecord::empty(ChunkPosition::new(0, 0), 0);
        assert_ne!(first.handle_id, second.handle_id);
        assert_ne!(first.handle_id, 0);
    }

    #[test]
    fn faces_offset_their_indices_by_existing_vertices() {
        let mut record = MeshRecord::empty(ChunkPosition::new(1, 1), 2);
        assert!(record.is_empty());

        record.add_face(&Face::new(0, 32, 0, 1, BlockSide::Top), AtlasRect::FULL);
        record.add_face(&Face::new(1, 32, 0, 1, BlockSide::Top), AtlasRect::FULL);

        assert_eq!(record.face_count(), 2);
        assert_eq!(record.vertex_count(), 8);
        assert_eq!(record.texture_coordinates.len(), 16);
        assert_eq!(record.indices, vec![0, 1, 2, 2, 3, 0, 4, 5, 6, 6, 7, 4]);
    }
}
