//! # Block Side Module
//!
//! This module defines the six faces of a voxel block, in the order block
//! definitions list their face textures.

use cgmath::Vector3;

/// Represents the six possible faces of a voxel block.
///
/// The discriminant doubles as the index into a block definition's texture
/// arrays: `[Front, Back, Left, Right, Bottom, Top]`.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The front face (facing negative Z)
    Front = 0,

    /// The back face (facing positive Z)
    Back = 1,

    /// The left face (facing negative X)
    Left = 2,

    /// The right face (facing positive X)
    Right = 3,

    /// The bottom face (facing negative Y)
    Bottom = 4,

    /// The top face (facing positive Y)
    Top = 5,
}

impl BlockSide {
    /// Returns an array containing all six block faces in texture order.
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::Front,
            BlockSide::Back,
            BlockSide::Left,
            BlockSide::Right,
            BlockSide::Bottom,
            BlockSide::Top,
        ]
    }

    /// Unit step from a voxel to the neighbour this face touches.
    pub fn normal(self) -> Vector3<i32> {
        match self {
            BlockSide::Front => Vector3::new(0, 0, -1),
            BlockSide::Back => Vector3::new(0, 0, 1),
            BlockSide::Left => Vector3::new(-1, 0, 0),
            BlockSide::Right => Vector3::new(1, 0, 0),
            BlockSide::Bottom => Vector3::new(0, -1, 0),
            BlockSide::Top => Vector3::new(0, 1, 0),
        }
    }

}
