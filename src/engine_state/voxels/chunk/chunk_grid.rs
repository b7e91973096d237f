//! # Chunk Grid
//!
//! Flat storage for the 16x128x16 block records of one chunk.
//!
//! ## Index Layout
//!
//! `index = y * 256 + z * 16 + x`
//!
//! Y is outermost, so a 16-tall mesh stack is one contiguous run of
//! `16 * 256` records. Every accessor is bounds-checked and reports the
//! offending coordinate or index instead of returning a default.

use cgmath::Point3;

use crate::{core::error::GridError, engine_state::voxels::block::block_record::BlockRecord};

/// Width of a chunk along X and Z.
pub const CHUNK_DIMENSION: i32 = 16;
/// Height of a chunk along Y.
pub const CHUNK_HEIGHT: i32 = 128;
/// Records in one horizontal slice.
pub const CHUNK_PLANE_SIZE: usize = (CHUNK_DIMENSION * CHUNK_DIMENSION) as usize;
/// Records in a whole chunk.
pub const CHUNK_SIZE: usize = CHUNK_PLANE_SIZE * CHUNK_HEIGHT as usize;

#[derive(Clone, PartialEq, Eq)]
pub struct ChunkGrid {
    records: Box<[BlockRecord]>,
}

impl std::fmt::Debug for ChunkGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let solid = self.records.iter().filter(|record| !record.is_air()).count();
        f.debug_struct("ChunkGrid")
            .field("non_air_records", &solid)
            .finish()
    }
}

impl Default for ChunkGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl ChunkGrid {
    /// Creates a grid filled with air.
    pub fn new() -> Self {
        ChunkGrid {
            records: vec![BlockRecord::AIR; CHUNK_SIZE].into_boxed_slice(),
        }
    }

    /// Builds a grid from a full array of records.
    ///
    /// # Returns
    /// The grid, or `GridError::WrongLength` if `records` is not exactly `CHUNK_SIZE` long
    pub fn from_records(records: Vec<BlockRecord>) -> Result<Self, GridError> {
        if records.len() != CHUNK_SIZE {
            return Err(GridError::WrongLength {
                expected: CHUNK_SIZE,
                actual: records.len(),
            });
        }

        Ok(ChunkGrid {
            records: records.into_boxed_slice(),
        })
    }

    pub fn contains(x: i32, y: i32, z: i32) -> bool {
        (0..CHUNK_DIMENSION).contains(&x)
            && (0..CHUNK_HEIGHT).contains(&y)
            && (0..CHUNK_DIMENSION).contains(&z)
    }

    /// Maps chunk-local coordinates to their flat index.
    ///
    /// # Arguments
    /// * `x` - 0..16
    /// * `y` - 0..128
    /// * `z` - 0..16
    ///
    /// # Returns
    /// `y * 256 + z * 16 + x`, or `GridError::PositionOutOfBounds`
    pub fn position_to_index(x: i32, y: i32, z: i32) -> Result<usize, GridError> {
        if !Self::contains(x, y, z) {
            return Err(GridError::PositionOutOfBounds { x, y, z });
        }

        Ok(y as usize * CHUNK_PLANE_SIZE + z as usize * CHUNK_DIMENSION as usize + x as usize)
    }

    /// Inverse of `position_to_index`.
    pub fn index_to_position(index: usize) -> Result<Point3<i32>, GridError> {
        if index >= CHUNK_SIZE {
            return Err(GridError::IndexOutOfBounds { index });
        }

        let dimension = CHUNK_DIMENSION as usize;
        let y = index / CHUNK_PLANE_SIZE;
        let z = (index % CHUNK_PLANE_SIZE) / dimension;
        let x = index % dimension;
        Ok(Point3::new(x as i32, y as i32, z as i32))
    }

    pub fn get(&self, x: i32, y: i32, z: i32) -> Result<BlockRecord, GridError> {
        let index = Self::position_to_index(x, y, z)?;
        Ok(self.records[index])
    }

    pub fn get_index(&self, index: usize) -> Result<BlockRecord, GridError> {
        self.records
            .get(index)
            .copied()
            .ok_or(GridError::IndexOutOfBounds { index })
    }

    pub fn set(&mut self, x: i32, y: i32, z: i32, record: BlockRecord) -> Result<(), GridError> {
        let index = Self::position_to_index(x, y, z)?;
        self.records[index] = record;
        Ok(())
    }

    pub fn set_index(&mut self, index: usize, record: BlockRecord) -> Result<(), GridError> {
        match self.records.get_mut(index) {
            Some(slot) => {
                *slot = record;
                Ok(())
            }
            None => Err(GridError::IndexOutOfBounds { index }),
        }
    }

    /// Replaces every record at once.
    ///
    /// The length is checked before anything is written, so a rejected call
    /// leaves the grid exactly as it was.
    pub fn bulk_replace(&mut self, records: &[BlockRecord]) -> Result<(), GridError> {
        if records.len() != CHUNK_SIZE {
            return Err(GridError::WrongLength {
                expected: CHUNK_SIZE,
                actual: records.len(),
            });
        }

        self.records.copy_from_slice(records);
        Ok(())
    }

    /// Returns an independent copy of every record.
    pub fn bulk_copy(&self) -> Vec<BlockRecord> {
        self.records.to_vec()
    }

    /// Read-only view of the records in index order.
    pub fn records(&self) -> &[BlockRecord] {
        &self.records
    }

    /// Raw bytes of the grid, used to compare grids for byte identity.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.records)
    }
}
