//! # Draw Type Module
//!
//! How a block is drawn. Only `Block` currently produces geometry and only
//! `Block` hides the faces of its neighbours; the other variants are carried
//! through definitions so content can declare them ahead of renderer support.

use std::convert::TryFrom;

use num_derive::FromPrimitive;
use serde::{Deserialize, Serialize};

use crate::core::error::DefinitionError;

/// Enumerates the ways a block can be drawn.
///
/// The `FromPrimitive` derive allows conversion from the integer values used
/// in definition documents.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum DrawType {
    Air = 0,
    Block = 1,
    BlockBox = 2,
    Torch = 3,
    LiquidSource = 4,
    LiquidFlow = 5,
    Glass = 6,
    Plant = 7,
    Leaves = 8,
}

impl DrawType {
    /// Converts an integer draw type value.
    ///
    /// # Returns
    /// The matching `DrawType`, or `DefinitionError::InvalidDrawType` for values above 8
    pub fn from_int(value: u8) -> Result<Self, DefinitionError> {
        num_traits::FromPrimitive::from_u8(value).ok_or(DefinitionError::InvalidDrawType(value))
    }

    /// Whether blocks of this type hide the faces of adjacent blocks.
    pub fn is_occluding(self) -> bool {
        self == DrawType::Block
    }
}

impl Default for DrawType {
    fn default() -> Self {
        DrawType::Block
    }
}

impl TryFrom<u8> for DrawType {
    type Error = DefinitionError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        DrawType::from_int(value)
    }
}

impl From<DrawType> for u8 {
    fn from(draw_type: DrawType) -> Self {
        draw_type as u8
    }
}
