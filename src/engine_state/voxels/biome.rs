//! # Biome Module
//!
//! A biome describes how terrain columns are shaped: the noise that drives
//! surface height and the blocks used for the surface, the layer beneath it
//! and the stone below that.

use serde::{Deserialize, Serialize};

use crate::core::error::DefinitionError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BiomeDefinition {
    pub name: String,
    /// Horizontal noise frequency, in cycles per world unit.
    pub frequency: f64,
    pub octaves: usize,
    /// Surface height where the noise samples zero.
    pub base_height: f64,
    /// Surface height swing for a full-amplitude noise sample.
    pub height_variation: f64,
    pub surface_block: String,
    pub subsurface_block: String,
    pub stone_block: String,
}

impl Default for BiomeDefinition {
    fn default() -> Self {
        BiomeDefinition {
            name: String::new(),
            frequency: 0.01,
            octaves: 3,
            base_height: 60.0,
            height_variation: 20.0,
            surface_block: String::from("core:grass"),
            subsurface_block: String::from("core:dirt"),
            stone_block: String::from("core:stone"),
        }
    }
}

impl BiomeDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        BiomeDefinition {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_noise(mut self, frequency: f64, octaves: usize) -> Self {
        self.frequency = frequency;
        self.octaves = octaves;
        self
    }

    pub fn with_layers(
        mut self,
        surface: impl Into<String>,
        subsurface: impl Into<String>,
        stone: impl Into<String>,
    ) -> Self {
        self.surface_block = surface.into();
        self.subsurface_block = subsurface.into();
        self.stone_block = stone.into();
        self
    }

    pub fn validate(&self) -> Result<(), DefinitionError> {
        if self.name.is_empty() {
            return Err(DefinitionError::Malformed(String::from(
                "biome definition is missing a name",
            )));
        }
        if !self.frequency.is_finite() || self.frequency <= 0.0 {
            return Err(DefinitionError::Malformed(format!(
                "biome ({}) has a non-positive frequency",
                self.name
            )));
        }
        if self.octaves == 0 {
            return Err(DefinitionError::Malformed(format!(
                "biome ({}) needs at least one octave",
                self.name
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_gentle_plains() {
        let biome = BiomeDefinition::new("core:plains");
        assert_eq!(biome.frequency, 0.01);
        assert_eq!(biome.octaves, 3);
        assert!(biome.validate().is_ok());
    }

    #[test]
    fn degenerate_noise_is_rejected() {
        assert!(BiomeDefinition::new("a").with_noise(0.0, 3).validate().is_err());
        assert!(BiomeDefinition::new("a").with_noise(0.01, 0).validate().is_err());
        assert!(BiomeDefinition::default().validate().is_err());
    }
}
