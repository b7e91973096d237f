//! # Block Record Module
//!
//! A block record is the 32-bit value stored for every voxel of a chunk grid.
//!
//! ## Layout
//!
//! | bits  | field    | range   |
//! |-------|----------|---------|
//! | 31-16 | block id | 0-65535 |
//! | 15-12 | light    | 0-15    |
//! | 11-8  | state    | 0-15    |
//! | 7-0   | reserved | -       |
//!
//! Id 0 is always air. Every setter clears only the bits owned by its field
//! before OR-ing the new value in, so the other fields (reserved bits included)
//! pass through untouched.

use crate::core::error::{BlockField, EncodingError};

const ID_SHIFT: u32 = 16;
const ID_MASK: u32 = 0xFFFF;

const LIGHT_SHIFT: u32 = 12;
const LIGHT_MASK: u32 = 0xF;

const STATE_SHIFT: u32 = 8;
const STATE_MASK: u32 = 0xF;

/// Largest block id a record can carry.
pub const MAX_BLOCK_ID: u32 = ID_MASK;
/// Largest light level a record can carry.
pub const MAX_LIGHT: u32 = LIGHT_MASK;
/// Largest state value a record can carry.
pub const MAX_STATE: u32 = STATE_MASK;

/// A packed voxel record.
///
/// `#[repr(transparent)]` keeps a grid of records castable to raw bytes, which
/// is how determinism of generated terrain is checked.
///
/// # Examples
///
/// ```
/// use chunk_pipeline::BlockRecord;
///
/// let record = BlockRecord::AIR.with_id(3)?.with_light(15)?;
/// assert_eq!(record.id(), 3);
/// assert_eq!(record.light(), 15);
/// assert_eq!(record.state(), 0);
/// # Ok::<(), chunk_pipeline::core::error::EncodingError>(())
/// ```
#[repr(transparent)]
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BlockRecord(u32);

impl BlockRecord {
    /// An air voxel with no light and no state.
    pub const AIR: BlockRecord = BlockRecord(0);

    /// Wraps an already packed value.
    pub const fn from_raw(raw: u32) -> Self {
        BlockRecord(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    pub const fn id(self) -> u32 {
        (self.0 >> ID_SHIFT) & ID_MASK
    }

    pub const fn light(self) -> u32 {
        (self.0 >> LIGHT_SHIFT) & LIGHT_MASK
    }

    pub const fn state(self) -> u32 {
        (self.0 >> STATE_SHIFT) & STATE_MASK
    }

    pub const fn is_air(self) -> bool {
        self.id() == 0
    }

    /// Returns a copy of this record with its block id replaced.
    ///
    /// # Arguments
    /// * `id` - The new block id, 0..=65535
    ///
    /// # Returns
    /// The updated record, or `EncodingError::FieldOutOfRange` naming the id field
    pub fn with_id(self, id: u32) -> Result<Self, EncodingError> {
        self.with_field(BlockField::Id, id, ID_SHIFT, ID_MASK)
    }

    /// Returns a copy of this record with its light level replaced (0..=15).
    pub fn with_light(self, light: u32) -> Result<Self, EncodingError> {
        self.with_field(BlockField::Light, light, LIGHT_SHIFT, LIGHT_MASK)
    }

    /// Returns a copy of this record with its state replaced (0..=15).
    pub fn with_state(self, state: u32) -> Result<Self, EncodingError> {
        self.with_field(BlockField::State, state, STATE_SHIFT, STATE_MASK)
    }

    fn with_field(
        self,
        field: BlockField,
        value: u32,
        shift: u32,
        mask: u32,
    ) -> Result<Self, EncodingError> {
        if value > mask {
            return Err(EncodingError::FieldOutOfRange {
                field,
                value,
                max: mask,
            });
        }

        let cleared = self.0 & !(mask << shift);
        Ok(BlockRecord(cleared | (value << shift)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn air_is_all_zero() {
        assert_eq!(BlockRecord::AIR.raw(), 0);
        assert!(BlockRecord::AIR.is_air());
        assert_eq!(BlockRecord::default(), BlockRecord::AIR);
    }

    #[test]
    fn fields_land_in_their_documented_bits() {
        let record = BlockRecord::AIR
            .with_id(0xABCD)
            .unwrap()
            .with_light(0x7)
            .unwrap()
            .with_state(0x3)
            .unwrap();

        assert_eq!(record.raw(), 0xABCD_7300);
    }

    #[test]
    fn random_round_trips_preserve_every_field() {
        let mut rng = fastrand::Rng::with_seed(0x5EED);

        for _ in 0..10_000 {
            let id = rng.u32(0..=MAX_BLOCK_ID);
            let light = rng.u32(0..=MAX_LIGHT);
            let state = rng.u32(0..=MAX_STATE);

            let record = BlockRecord::AIR
                .with_id(id)
                .unwrap()
                .with_light(light)
                .unwrap()
                .with_state(state)
                .unwrap();

            assert_eq!((record.id(), record.light(), record.state()), (id, light, state));
            assert_eq!(record.raw() & 0xFF, 0);
        }
    }

    #[test]
    fn setting_one_field_leaves_the_others_alone() {
        let mut rng = fastrand::Rng::with_seed(42);

        for _ in 0..10_000 {
            let original = BlockRecord::from_raw(rng.u32(..));

            let new_id = rng.u32(0..=MAX_BLOCK_ID);
            let updated = original.with_id(new_id).unwrap();
            assert_eq!(updated.id(), new_id);
            assert_eq!(updated.raw() & 0xFFFF, original.raw() & 0xFFFF);

            let new_light = rng.u32(0..=MAX_LIGHT);
            let updated = original.with_light(new_light).unwrap();
            assert_eq!(updated.light(), new_light);
            assert_eq!(updated.raw() & !0xF000, original.raw() & !0xF000);

            let new_state = rng.u32(0..=MAX_STATE);
            let updated = original.with_state(new_state).unwrap();
            assert_eq!(updated.state(), new_state);
            assert_eq!(updated.raw() & !0x0F00, original.raw() & !0x0F00);
        }
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        assert_eq!(
            BlockRecord::AIR.with_id(65536),
            Err(EncodingError::FieldOutOfRange {
                field: BlockField::Id,
                value: 65536,
                max: 65535
            })
        );
        assert_eq!(
            BlockRecord::AIR.with_light(16),
            Err(EncodingError::FieldOutOfRange {
                field: BlockField::Light,
                value: 16,
                max: 15
            })
        );
        assert_eq!(
            BlockRecord::AIR.with_state(u32::MAX),
            Err(EncodingError::FieldOutOfRange {
                field: BlockField::State,
                value: u32::MAX,
                max: 15
            })
        );
    }
}
