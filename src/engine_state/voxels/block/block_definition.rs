//! # Block Definition Module
//!
//! Static properties of one kind of block: its names, how it is drawn, its
//! face textures and the gameplay flags the rest of the game reads. The id
//! is not part of the document; `DefinitionTables` assigns it on registration.

use serde::{Deserialize, Serialize};

use super::{block_side::BlockSide, draw_type::DrawType};
use crate::core::error::DefinitionError;

/// Largest light level a block may emit.
pub const MAX_BLOCK_LIGHT: u32 = 15;
/// Largest liquid flow distance and viscosity.
pub const MAX_LIQUID_SCALE: u32 = 8;

/// A rectangle inside the texture atlas, in normalized coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AtlasRect {
    pub min_u: f32,
    pub min_v: f32,
    pub max_u: f32,
    pub max_v: f32,
}

impl AtlasRect {
    /// The whole atlas.
    pub const FULL: AtlasRect = AtlasRect {
        min_u: 0.0,
        min_v: 0.0,
        max_u: 1.0,
        max_v: 1.0,
    };

    pub const fn new(min_u: f32, min_v: f32, max_u: f32, max_v: f32) -> Self {
        AtlasRect {
            min_u,
            min_v,
            max_u,
            max_v,
        }
    }

    /// Cell `column` of an atlas made of `columns` equally wide textures in one row.
    pub fn atlas_cell(column: u32, columns: u32) -> Self {
        let width = 1.0 / columns.max(1) as f32;
        let min_u = column as f32 * width;
        AtlasRect::new(min_u, 0.0, min_u + width, 1.0)
    }
}

/// Everything known about one block kind.
///
/// # Examples
///
/// ```
/// use chunk_pipeline::engine_state::voxels::block::block_definition::BlockDefinition;
///
/// let glass = BlockDefinition::new("core:glass")
///     .with_readable_name("Glass")
///     .with_textures(["glass.png"; 6].map(String::from));
/// assert!(glass.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BlockDefinition {
    pub internal_name: String,
    pub readable_name: String,
    #[serde(skip)]
    id: u32,
    pub draw_type: DrawType,
    /// Texture file per face, in `BlockSide` order. Empty for air.
    pub textures: Vec<String>,
    /// Atlas rectangle per face, in `BlockSide` order. Empty means the whole atlas.
    pub texture_rects: Vec<AtlasRect>,
    pub walkable: bool,
    pub liquid: bool,
    pub liquid_flow: u32,
    pub liquid_viscosity: u32,
    pub climbable: bool,
    pub sneak_jump_climbable: bool,
    pub falling: bool,
    pub clear: bool,
    pub damage_per_second: u32,
    pub light: u32,
}

impl Default for BlockDefinition {
    fn default() -> Self {
        BlockDefinition {
            internal_name: String::new(),
            readable_name: String::new(),
            id: 0,
            draw_type: DrawType::Block,
            textures: Vec::new(),
            texture_rects: Vec::new(),
            walkable: true,
            liquid: false,
            liquid_flow: 0,
            liquid_viscosity: 0,
            climbable: false,
            sneak_jump_climbable: false,
            falling: false,
            clear: false,
            damage_per_second: 0,
            light: 0,
        }
    }
}

impl BlockDefinition {
    pub fn new(internal_name: impl Into<String>) -> Self {
        BlockDefinition {
            internal_name: internal_name.into(),
            ..Default::default()
        }
    }

    /// The built-in air block. Always id 0.
    pub fn air() -> Self {
        BlockDefinition {
            readable_name: String::from("Air"),
            draw_type: DrawType::Air,
            walkable: false,
            clear: true,
            ..BlockDefinition::new(super::AIR_BLOCK_NAME)
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub(crate) fn assign_id(&mut self, id: u32) {
        self.id = id;
    }

    pub fn with_readable_name(mut self, readable_name: impl Into<String>) -> Self {
        self.readable_name = readable_name.into();
        self
    }

    pub fn with_draw_type(mut self, draw_type: DrawType) -> Self {
        self.draw_type = draw_type;
        self
    }

    pub fn with_textures(mut self, textures: [String; 6]) -> Self {
        self.textures = textures.to_vec();
        self
    }

    pub fn with_texture_rects(mut self, rects: [AtlasRect; 6]) -> Self {
        self.texture_rects = rects.to_vec();
        self
    }

    pub fn with_liquid(mut self, flow: u32, viscosity: u32) -> Self {
        self.liquid = true;
        self.liquid_flow = flow;
        self.liquid_viscosity = viscosity;
        self
    }

    pub fn with_light(mut self, light: u32) -> Self {
        self.light = light;
        self
    }

    pub fn with_walkable(mut self, walkable: bool) -> Self {
        self.walkable = walkable;
        self
    }

    /// Atlas rectangle used for the texture coordinates of `side`.
    pub fn texture_rect(&self, side: BlockSide) -> AtlasRect {
        self.texture_rects
            .get(side as usize)
            .copied()
            .unwrap_or(AtlasRect::FULL)
    }

    /// Checks the definition before it is admitted into a table.
    ///
    /// # Returns
    /// `Ok(())`, or the first problem found:
    /// * `DefinitionError::Malformed` for a missing name or a texture list that is not six faces long
    /// * `DefinitionError::InvalidProperty` for liquid or light values outside their ranges
    pub fn validate(&self) -> Result<(), DefinitionError> {
        if self.internal_name.is_empty() {
            return Err(DefinitionError::Malformed(String::from(
                "block definition is missing an internal name",
            )));
        }

        if self.draw_type != DrawType::Air && self.textures.len() != 6 {
            return Err(DefinitionError::Malformed(format!(
                "block ({}) must have 6 face textures, found {}",
                self.internal_name,
                self.textures.len()
            )));
        }

        if !self.texture_rects.is_empty() && self.texture_rects.len() != 6 {
            return Err(DefinitionError::Malformed(format!(
                "block ({}) must have 0 or 6 texture rectangles, found {}",
                self.internal_name,
                self.texture_rects.len()
            )));
        }

        if self.liquid {
            self.check_range("liquid_flow", self.liquid_flow, 1, MAX_LIQUID_SCALE)?;
            self.check_range("liquid_viscosity", self.liquid_viscosity, 1, MAX_LIQUID_SCALE)?;
        }

        self.check_range("light", self.light, 0, MAX_BLOCK_LIGHT)
    }

    fn check_range(
        &self,
        property: &'static str,
        value: u32,
        min: u32,
        max: u32,
    ) -> Result<(), DefinitionError> {
        if (min..=max).contains(&value) {
            Ok(())
        } else {
            Err(DefinitionError::InvalidProperty {
                block: self.internal_name.clone(),
                property,
                value,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn textured(name: &str) -> BlockDefinition {
        BlockDefinition::new(name).with_textures(["a.png"; 6].map(String::from))
    }

    #[test]
    fn air_needs_no_textures() {
        let air = BlockDefinition::air();
        assert_eq!(air.draw_type, DrawType::Air);
        assert!(air.validate().is_ok());
    }

    #[test]
    fn solid_blocks_need_six_textures() {
        let missing = BlockDefinition::new("core:bad");
        assert!(matches!(missing.validate(), Err(DefinitionError::Malformed(_))));

        let mut five = textured("core:bad");
        five.textures.pop();
        assert!(matches!(five.validate(), Err(DefinitionError::Malformed(_))));
    }

    #[test]
    fn liquid_ranges_are_enforced() {
        assert!(textured("core:water").with_liquid(8, 1).validate().is_ok());
        assert_eq!(
            textured("core:water").with_liquid(9, 1).validate(),
            Err(DefinitionError::InvalidProperty {
                block: String::from("core:water"),
                property: "liquid_flow",
                value: 9
            })
        );
        assert!(textured("core:water").with_liquid(4, 0).validate().is_err());
    }

    #[test]
    fn light_above_fifteen_is_rejected() {
        assert!(textured("core:torch").with_light(15).validate().is_ok());
        assert!(textured("core:torch").with_light(16).validate().is_err());
    }

    #[test]
    fn missing_rects_fall_back_to_the_whole_atlas() {
        let block = textured("core:stone");
        assert_eq!(block.texture_rect(BlockSide::Top), AtlasRect::FULL);

        let rect = AtlasRect::atlas_cell(1, 4);
        let block = block.with_texture_rects([rect; 6]);
        assert_eq!(block.texture_rect(BlockSide::Bottom), rect);
        assert_eq!(rect.min_u, 0.25);
        assert_eq!(rect.max_u, 0.5);
    }

    #[test]
    fn documents_default_missing_fields() {
        let block: BlockDefinition = serde_json::from_str(
            r#"{ "internal_name": "core:sand", "textures": ["s","s","s","s","s","s"], "falling": true }"#,
        )
        .unwrap();

        assert!(block.falling);
        assert!(block.walkable);
        assert_eq!(block.draw_type, DrawType::Block);
        assert!(block.validate().is_ok());
    }
}
