//! # Chunk Positions
//!
//! Chunks are addressed by a 2D integer coordinate; each step along X or Z
//! moves 16 world units. `CardinalDirection` names the four horizontal
//! neighbours so the neighbour rules live in one loop instead of four
//! hand-written checks.

use cgmath::Vector2;
use serde::{Deserialize, Serialize};

use super::chunk::chunk_grid::CHUNK_DIMENSION;
use crate::core::error::GridError;

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub struct ChunkPosition {
    pub x: i32,
    pub z: i32,
}

impl ChunkPosition {
    pub const fn new(x: i32, z: i32) -> Self {
        ChunkPosition { x, z }
    }

    /// The chunk one step away in `direction`, or `None` past the `i32` edge.
    pub fn neighbor(self, direction: CardinalDirection) -> Option<Self> {
        let offset = direction.offset();
        Some(ChunkPosition::new(
            self.x.checked_add(offset.x)?,
            self.z.checked_add(offset.y)?,
        ))
    }

    /// World-space X/Z of this chunk's (0, 0) column.
    ///
    /// # Returns
    /// `GridError::ChunkOutOfRange` when the chunk's columns cannot be
    /// addressed with `i32` world coordinates
    pub fn world_origin(self) -> Result<(i32, i32), GridError> {
        let out_of_range = || GridError::ChunkOutOfRange {
            x: self.x,
            z: self.z,
        };
        let origin_x = self.x.checked_mul(CHUNK_DIMENSION).ok_or_else(out_of_range)?;
        let origin_z = self.z.checked_mul(CHUNK_DIMENSION).ok_or_else(out_of_range)?;
        Ok((origin_x, origin_z))
    }
}

impl std::fmt::Display for ChunkPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// The four horizontal neighbours of a chunk.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum CardinalDirection {
    /// Towards negative Z.
    Front = 0,
    /// Towards positive Z.
    Back = 1,
    /// Towards negative X.
    Left = 2,
    /// Towards positive X.
    Right = 3,
}

impl CardinalDirection {
    pub const ALL: [CardinalDirection; 4] = [
        CardinalDirection::Front,
        CardinalDirection::Back,
        CardinalDirection::Left,
        CardinalDirection::Right,
    ];

    /// Step in (x, z).
    pub fn offset(self) -> Vector2<i32> {
        match self {
            CardinalDirection::Front => Vector2::new(0, -1),
            CardinalDirection::Back => Vector2::new(0, 1),
            CardinalDirection::Left => Vector2::new(-1, 0),
            CardinalDirection::Right => Vector2::new(1, 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbors_step_one_chunk() {
        let origin = ChunkPosition::new(2, -3);
        assert_eq!(origin.neighbor(CardinalDirection::Front), Some(ChunkPosition::new(2, -4)));
        assert_eq!(origin.neighbor(CardinalDirection::Back), Some(ChunkPosition::new(2, -2)));
        assert_eq!(origin.neighbor(CardinalDirection::Left), Some(ChunkPosition::new(1, -3)));
        assert_eq!(origin.neighbor(CardinalDirection::Right), Some(ChunkPosition::new(3, -3)));
    }

    #[test]
    fn neighbors_stop_at_the_i32_edge() {
        let corner = ChunkPosition::new(i32::MAX, i32::MIN);
        assert_eq!(corner.neighbor(CardinalDirection::Right), None);
        assert_eq!(corner.neighbor(CardinalDirection::Front), None);
        assert_eq!(
            corner.neighbor(CardinalDirection::Left),
            Some(ChunkPosition::new(i32::MAX - 1, i32::MIN))
        );
        assert_eq!(
            corner.neighbor(CardinalDirection::Back),
            Some(ChunkPosition::new(i32::MAX, i32::MIN + 1))
        );
    }

    #[test]
    fn world_origin_scales_by_chunk_width() {
        assert_eq!(ChunkPosition::new(-1, 2).world_origin(), Ok((-16, 32)));

        let last = i32::MAX / CHUNK_DIMENSION;
        let first = i32::MIN / CHUNK_DIMENSION;
        assert_eq!(
            ChunkPosition::new(last, first).world_origin(),
            Ok((last * CHUNK_DIMENSION, i32::MIN))
        );
    }

    #[test]
    fn far_chunks_have_no_world_origin() {
        let beyond = i32::MAX / CHUNK_DIMENSION + 1;
        assert_eq!(
            ChunkPosition::new(beyond, 0).world_origin(),
            Err(GridError::ChunkOutOfRange { x: beyond, z: 0 })
        );
        assert_eq!(
            ChunkPosition::new(0, i32::MIN).world_origin(),
            Err(GridError::ChunkOutOfRange { x: 0, z: i32::MIN })
        );
    }
}
