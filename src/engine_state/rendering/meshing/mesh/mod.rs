//! Mesh data and the face-culling mesher.
//!
//! # Architecture
//! - [`MeshRecord`]: vertex positions, texture coordinates and indices for one stack
//! - [`Face`]: a single voxel face with counter-clockwise corners
//! - [`culled_stack`]: emits every face whose neighbour does not hide it

mod culled;
mod face;
mod mesh;

pub use culled::{culled_stack, culled_stack_with_masks, BlockPalette, OcclusionMasks};
pub use face::Face;
pub use mesh::*;
