//! # Chunk Generation Task
//!
//! This module defines the `ChunkGenerationTask`, which turns a requested
//! chunk position into a populated `Chunk`, and the `TerrainGenerator`
//! worker that runs it in the background.
//!
//! ## Terrain Shape
//!
//! Each of the 256 columns samples fractal Perlin noise at its world X/Z to
//! get a surface height `h`. Going up the column:
//!
//! | y                | block      |
//! |------------------|------------|
//! | `y < h - 6`      | stone      |
//! | `h - 6 <= y < h - 1` | subsurface |
//! | `h - 1 <= y < h` | surface    |
//! | `y >= h`         | air        |
//!
//! Block ids are resolved once from the worker's definitions duplicate when
//! the task is built, never per voxel.

use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

use crate::{
    core::{config::GeneratorConfig, error::Result},
    engine_state::{
        task_management::{task::Task, TaskWorker},
        voxels::{
            block::block_record::BlockRecord,
            chunk::{
                chunk_grid::{ChunkGrid, CHUNK_DIMENSION, CHUNK_HEIGHT},
                Chunk,
            },
            definitions::DefinitionTables,
            position::ChunkPosition,
        },
    },
};

/// Depth of the subsurface band, counted from the surface height down.
const SUBSURFACE_DEPTH: i32 = 6;

/// A task that generates chunk data on the terrain worker thread.
pub struct ChunkGenerationTask {
    /// This worker's private copy of the definition tables.
    definitions: DefinitionTables,
    noise: Fbm<Perlin>,
    base_height: f64,
    height_variation: f64,
    stone: BlockRecord,
    subsurface: BlockRecord,
    surface: BlockRecord,
}

impl ChunkGenerationTask {
    /// Creates a new chunk generation task.
    ///
    /// # Arguments
    /// * `definitions` - A thread-safe duplicate of the master tables; the task owns it
    /// * `config` - Seed and the name of the biome that shapes every column
    ///
    /// # Returns
    /// The task, or a `DefinitionError` if the biome or any of its layer blocks is unknown
    pub fn new(definitions: DefinitionTables, config: &GeneratorConfig) -> Result<Self> {
        let biome = definitions.biome(&config.active_biome)?;

        let stone = BlockRecord::AIR.with_id(definitions.id_of(&biome.stone_block)?)?;
        let subsurface = BlockRecord::AIR.with_id(definitions.id_of(&biome.subsurface_block)?)?;
        let surface = BlockRecord::AIR.with_id(definitions.id_of(&biome.surface_block)?)?;

        let noise = Fbm::<Perlin>::new(config.seed)
            .set_octaves(biome.octaves)
            .set_frequency(biome.frequency);

        let base_height = biome.base_height;
        let height_variation = biome.height_variation;

        Ok(ChunkGenerationTask {
            definitions,
            noise,
            base_height,
            height_variation,
            stone,
            subsurface,
            surface,
        })
    }

    pub fn definitions(&self) -> &DefinitionTables {
        &self.definitions
    }

    /// Surface height of the column at world `(x, z)`, clamped to 1..=128.
    pub fn surface_height(&self, world_x: i32, world_z: i32) -> i32 {
        let sample = self.noise.get([world_x as f64, world_z as f64]);
        let height = (self.base_height + sample * self.height_variation).round() as i32;
        height.clamp(1, CHUNK_HEIGHT)
    }

    /// The record at height `y` of a column whose surface is at `height`.
    fn layer_at(&self, y: i32, height: i32) -> BlockRecord {
        if y < height - SUBSURFACE_DEPTH {
            self.stone
        } else if y < height - 1 {
            self.subsurface
        } else if y < height {
            self.surface
        } else {
            BlockRecord::AIR
        }
    }

    /// Generates the chunk at `position`.
    pub fn generate(&self, position: ChunkPosition) -> Result<Chunk> {
        let (origin_x, origin_z) = position.world_origin()?;
        let mut grid = ChunkGrid::new();

        for z in 0..CHUNK_DIMENSION {
            for x in 0..CHUNK_DIMENSION {
                let height = self.surface_height(origin_x + x, origin_z + z);
                for y in 0..height {
                    grid.set(x, y, z, self.layer_at(y, height))?;
                }
            }
        }

        Ok(Chunk::with_grid(position, grid))
    }
}

impl Task for ChunkGenerationTask {
    type Request = ChunkPosition;
    type Output = Chunk;
    const NAME: &'static str = "terrain generator";

    fn process(&mut self, position: ChunkPosition) -> Result<Chunk> {
        self.generate(position)
    }
}

/// The background terrain worker.
///
/// Requests are chunk positions; updates are populated chunks, in request order.
pub struct TerrainGenerator {
    worker: TaskWorker<ChunkGenerationTask>,
}

impl TerrainGenerator {
    /// Duplicates the frozen master tables and starts the worker thread.
    ///
    /// # Arguments
    /// * `master` - The frozen master definition tables
    /// * `config` - Generator configuration
    ///
    /// # Returns
    /// The running generator, or an error if the tables cannot be duplicated, the
    /// active biome is not defined, or the thread cannot be spawned
    pub fn start(master: &DefinitionTables, config: &GeneratorConfig) -> Result<Self> {
        let task = ChunkGenerationTask::new(master.thread_safe_duplicate()?, config)?;
        let worker = TaskWorker::spawn(task, config.idle_interval())?;
        Ok(TerrainGenerator { worker })
    }

    /// Queues a chunk for generation.
    ///
    /// # Returns
    /// `GridError::ChunkOutOfRange` for a chunk whose world coordinates overflow
    /// `i32`, which is never sent to the worker
    pub fn push_request(&self, position: ChunkPosition) -> Result<()> {
        position.world_origin()?;
        self.worker.push_request(position)
    }

    pub fn has_update(&mut self) -> Result<bool> {
        self.worker.has_update()
    }

    pub fn get_update(&mut self) -> Result<Chunk> {
        self.worker.get_update()
    }

    pub fn is_alive(&self) -> bool {
        self.worker.is_alive()
    }

    pub fn stop(&self) {
        self.worker.stop();
    }

    pub fn join(&mut self) {
        self.worker.join();
    }
}
