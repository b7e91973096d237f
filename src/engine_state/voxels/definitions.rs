//! # Definition Tables
//!
//! Block and biome definitions, keyed by name, with block ids handed out in
//! registration order.
//!
//! ## Lifecycle
//!
//! 1. **Load**: a master table is built on the main thread. `core:air` is
//!    always present with id 0; every other block gets the next free id.
//! 2. **Freeze**: `freeze()` closes the table to further registration.
//! 3. **Duplicate**: each worker receives its own deep copy from
//!    `thread_safe_duplicate()` when it starts. Duplicates are frozen and
//!    cannot be registered into, so workers read them without any locking.

use std::collections::HashMap;

use log::debug;
use serde::Deserialize;

use super::{
    biome::BiomeDefinition,
    block::{block_definition::BlockDefinition, block_record::MAX_BLOCK_ID, AIR_BLOCK_NAME},
};
use crate::core::error::DefinitionError;

const DEFAULT_CONTENT: &str = include_str!("default_content.json");

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct DefinitionDocument {
    #[serde(default)]
    blocks: Vec<BlockDefinition>,
    #[serde(default)]
    biomes: Vec<BiomeDefinition>,
}

#[derive(Clone, Debug)]
pub struct DefinitionTables {
    blocks: HashMap<String, BlockDefinition>,
    /// Block names indexed by id.
    names_by_id: Vec<String>,
    biomes: HashMap<String, BiomeDefinition>,
    frozen: bool,
    duplicate: bool,
}

impl Default for DefinitionTables {
    fn default() -> Self {
        Self::new()
    }
}

impl DefinitionTables {
    /// Creates an unfrozen master table holding only `core:air`.
    pub fn new() -> Self {
        let mut air = BlockDefinition::air();
        air.assign_id(0);

        let mut blocks = HashMap::new();
        blocks.insert(String::from(AIR_BLOCK_NAME), air);

        DefinitionTables {
            blocks,
            names_by_id: vec![String::from(AIR_BLOCK_NAME)],
            biomes: HashMap::new(),
            frozen: false,
            duplicate: false,
        }
    }

    /// Builds an unfrozen master table from a JSON document of the form
    /// `{ "blocks": [...], "biomes": [...] }`.
    ///
    /// Blocks are registered in document order, so their ids follow the
    /// document. The caller freezes the result once loading is complete.
    pub fn from_json_str(json: &str) -> Result<Self, DefinitionError> {
        let document: DefinitionDocument = serde_json::from_str(json)
            .map_err(|err| DefinitionError::Malformed(err.to_string()))?;

        let mut tables = DefinitionTables::new();
        for block in document.blocks {
            tables.register_block(block)?;
        }
        for biome in document.biomes {
            tables.register_biome(biome)?;
        }
        Ok(tables)
    }

    /// Air, stone, dirt, grass and the `core:plains` biome.
    pub fn default_content() -> Result<Self, DefinitionError> {
        Self::from_json_str(DEFAULT_CONTENT)
    }

    /// Registers a block and assigns it the next free id.
    ///
    /// # Arguments
    /// * `definition` - The block to add; its `internal_name` must be unused
    ///
    /// # Returns
    /// The assigned id, or an error if the table is frozen, is a worker duplicate,
    /// already holds the name, has run out of ids, or the definition fails validation
    pub fn register_block(&mut self, mut definition: BlockDefinition) -> Result<u32, DefinitionError> {
        self.check_writable()?;
        definition.validate()?;

        if self.blocks.contains_key(&definition.internal_name) {
            return Err(DefinitionError::DuplicateName(definition.internal_name));
        }

        let id = self.names_by_id.len() as u32;
        if id > MAX_BLOCK_ID {
            return Err(DefinitionError::OutOfIds);
        }

        definition.assign_id(id);
        debug!("Registered block {} with id {}", definition.internal_name, id);

        self.names_by_id.push(definition.internal_name.clone());
        self.blocks.insert(definition.internal_name.clone(), definition);
        Ok(id)
    }

    pub fn register_biome(&mut self, definition: BiomeDefinition) -> Result<(), DefinitionError> {
        self.check_writable()?;
        definition.validate()?;

        if self.biomes.contains_key(&definition.name) {
            return Err(DefinitionError::DuplicateName(definition.name));
        }

        debug!("Registered biome {}", definition.name);
        self.biomes.insert(definition.name.clone(), definition);
        Ok(())
    }

    fn check_writable(&self) -> Result<(), DefinitionError> {
        if self.duplicate {
            return Err(DefinitionError::ModifiedDuplicate);
        }
        if self.frozen {
            return Err(DefinitionError::Frozen);
        }
        Ok(())
    }

    /// Closes the table to registration. Freezing twice is harmless.
    pub fn freeze(&mut self) {
        if !self.frozen {
            debug!(
                "Froze definition tables with {} blocks and {} biomes",
                self.blocks.len(),
                self.biomes.len()
            );
        }
        self.frozen = true;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn is_duplicate(&self) -> bool {
        self.duplicate
    }

    /// Returns a deep, independently owned copy for a worker thread.
    ///
    /// # Returns
    /// The copy, or `DefinitionError::NotFrozen` / `DefinitionError::Empty` if the
    /// table is still loading or holds nothing besides air
    pub fn thread_safe_duplicate(&self) -> Result<Self, DefinitionError> {
        if !self.frozen {
            return Err(DefinitionError::NotFrozen);
        }
        if self.is_empty() {
            return Err(DefinitionError::Empty);
        }

        let mut copy = self.clone();
        copy.duplicate = true;
        Ok(copy)
    }

    pub fn block_by_name(&self, name: &str) -> Result<&BlockDefinition, DefinitionError> {
        self.blocks
            .get(name)
            .ok_or_else(|| DefinitionError::UnknownName(name.to_string()))
    }

    pub fn block_by_id(&self, id: u32) -> Result<&BlockDefinition, DefinitionError> {
        let name = self
            .names_by_id
            .get(id as usize)
            .ok_or(DefinitionError::UnknownId(id))?;
        self.block_by_name(name)
    }

    pub fn id_of(&self, name: &str) -> Result<u32, DefinitionError> {
        self.block_by_name(name).map(BlockDefinition::id)
    }

    pub fn biome(&self, name: &str) -> Result<&BiomeDefinition, DefinitionError> {
        self.biomes
            .get(name)
            .ok_or_else(|| DefinitionError::UnknownName(name.to_string()))
    }

    /// Block names in id order, air first.
    pub fn block_names(&self) -> Vec<&str> {
        self.names_by_id.iter().map(String::as_str).collect()
    }

    /// Block definitions in id order, air first.
    pub fn blocks(&self) -> impl Iterator<Item = &BlockDefinition> + '_ {
        self.names_by_id
            .iter()
            .filter_map(move |name| self.blocks.get(name))
    }

    /// Number of registered blocks, air included.
    pub fn len(&self) -> usize {
        self.names_by_id.len()
    }

    /// True while nothing besides air and no biome is registered.
    pub fn is_empty(&self) -> bool {
        self.names_by_id.len() <= 1 && self.biomes.is_empty()
    }
}
