//! # Block Module
//!
//! This module provides the block-related building blocks of the voxel engine:
//! the packed per-voxel record, block definitions, draw types and block faces.

pub mod block_definition;
pub mod block_record;
pub mod block_side;
pub mod draw_type;

/// Name of the block every table registers first, with id 0.
pub const AIR_BLOCK_NAME: &str = "core:air";
