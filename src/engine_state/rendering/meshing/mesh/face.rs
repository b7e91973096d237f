use cgmath::{Point3, Vector3};

use crate::engine_state::voxels::block::{block_definition::AtlasRect, block_side::BlockSide};

/// Represents a single quad face of a voxel in the mesh.
///
/// Corners are ordered lower-left, lower-right, upper-right, upper-left as
/// seen from outside the voxel, which makes both triangles of the quad wind
/// counter-clockwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    /// Lower-left corner of the face in chunk coordinates
    pub ll: Point3<i32>,
    /// Lower-right corner of the face in chunk coordinates
    pub lr: Point3<i32>,
    /// Upper-right corner of the face in chunk coordinates
    pub ur: Point3<i32>,
    /// Upper-left corner of the face in chunk coordinates
    pub ul: Point3<i32>,
    /// Id of the block this face belongs to
    pub block_id: u32,
    /// Which side of the block this face represents
    pub block_side: BlockSide,
}

/// Two counter-clockwise triangles over the corners `[ll, lr, ur, ul]`.
pub const FACE_INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

impl Face {
    /// Creates the face of the voxel at `(x, y, z)` facing `block_side`.
    ///
    /// # Arguments
    /// * `x`, `y`, `z` - The voxel's chunk-local coordinates (y is absolute within the column)
    /// * `block_id` - The voxel's block id
    /// * `block_side` - Which side of the voxel to build
    pub fn new(x: i32, y: i32, z: i32, block_id: u32, block_side: BlockSide) -> Self {
        let origin = Point3::new(x, y, z);
        let [ll, lr, ur, ul] = Self::corner_offsets(block_side).map(|offset| origin + offset);

        Face {
            ll,
            lr,
            ur,
            ul,
            block_id,
            block_side,
        }
    }

    fn corner_offsets(block_side: BlockSide) -> [Vector3<i32>; 4] {
        match block_side {
            BlockSide::Front => [
                Vector3::new(1, 0, 0),
                Vector3::new(0, 0, 0),
                Vector3::new(0, 1, 0),
                Vector3::new(1, 1, 0),
            ],
            BlockSide::Back => [
                Vector3::new(0, 0, 1),
                Vector3::new(1, 0, 1),
                Vector3::new(1, 1, 1),
                Vector3::new(0, 1, 1),
            ],
            BlockSide::Left => [
                Vector3::new(0, 0, 0),
                Vector3::new(0, 0, 1),
                Vector3::new(0, 1, 1),
                Vector3::new(0, 1, 0),
            ],
            BlockSide::Right => [
                Vector3::new(1, 0, 1),
                Vector3::new(1, 0, 0),
                Vector3::new(1, 1, 0),
                Vector3::new(1, 1, 1),
            ],
            BlockSide::Bottom => [
                Vector3::new(0, 0, 0),
                Vector3::new(1, 0, 0),
                Vector3::new(1, 0, 1),
                Vector3::new(0, 0, 1),
            ],
            BlockSide::Top => [
                Vector3::new(0, 1, 1),
                Vector3::new(1, 1, 1),
                Vector3::new(1, 1, 0),
                Vector3::new(0, 1, 0),
            ],
        }
    }

    pub fn corners(&self) -> [Point3<i32>; 4] {
        [self.ll, self.lr, self.ur, self.ul]
    }

    /// Texture coordinates for the corners, in corner order.
    ///
    /// The bottom edge of the quad maps to the bottom (max v) of the atlas rectangle.
    pub fn texture_coordinates(rect: AtlasRect) -> [[f32; 2]; 4] {
        [
            [rect.min_u, rect.max_v],
            [rect.max_u, rect.max_v],
            [rect.max_u, rect.min_v],
            [rect.min_u, rect.min_v],
        ]
    }
}
