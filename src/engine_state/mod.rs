//! # Engine State Module
//!
//! The service owner of the chunk pipeline.
//!
//! ## Key Components
//!
//! * `EngineState` - Owns the configuration, the frozen master definition
//!   tables, the chunk registry, both background workers, the pipeline
//!   director and the mesh storage
//! * `pipeline_director` - The per-tick flow between workers and registry
//! * `rendering` - Mesh records, mesh storage and the mesh builder worker
//! * `task_management` - The generic background worker
//! * `voxels` - Block records, definitions, chunks, the registry and the
//!   terrain generator worker
//!
//! ## Lifecycle
//!
//! Definitions are loaded and registered first. `EngineState::start` freezes
//! them, hands each worker its own duplicate and starts both threads. From
//! then on the consuming thread calls `request_chunk` and `tick`. Dropping the
//! engine stops and joins both workers.

use log::info;

use pipeline_director::{PipelineDirector, TickReport};
use rendering::{tasks::chunk_mesh_generation_task::MeshBuilder, InMemoryMeshStorage, MeshStorage};
use voxels::{
    definitions::DefinitionTables, position::ChunkPosition,
    tasks::chunk_generation_task::TerrainGenerator, world::ChunkRegistry,
};

use crate::core::{config::EngineConfig, error::Result};

pub mod pipeline_director;
pub mod rendering;
pub mod task_management;
pub mod voxels;

/// The main state container for the chunk pipeline.
///
/// # Examples
///
/// ```no_run
/// use chunk_pipeline::{DefinitionTables, EngineConfig, EngineState, ChunkPosition};
///
/// let mut engine = EngineState::start(
///     EngineConfig::default(),
///     DefinitionTables::default_content()?,
/// )?;
/// engine.request_chunk(ChunkPosition::new(0, 0))?;
///
/// // Main loop
/// while !engine.is_meshed(ChunkPosition::new(0, 0)) {
///     engine.tick()?;
/// }
/// # Ok::<(), chunk_pipeline::EngineError>(())
/// ```
pub struct EngineState<S: MeshStorage = InMemoryMeshStorage> {
    config: EngineConfig,
    /// The frozen master tables the workers were duplicated from
    definitions: DefinitionTables,
    registry: ChunkRegistry,
    generator: TerrainGenerator,
    mesher: MeshBuilder,
    director: PipelineDirector,
    mesh_storage: S,
}

impl EngineState<InMemoryMeshStorage> {
    /// Starts the pipeline with in-process mesh storage.
    ///
    /// # Arguments
    /// * `config` - Engine configuration
    /// * `definitions` - The master definition tables; frozen here if they are not already
    ///
    /// # Returns
    /// The running engine, or the error that kept a worker from starting
    pub fn start(config: EngineConfig, definitions: DefinitionTables) -> Result<Self> {
        Self::with_storage(config, definitions, InMemoryMeshStorage::new())
    }
}

impl<S: MeshStorage> EngineState<S> {
    /// Starts the pipeline with a caller-provided mesh storage.
    pub fn with_storage(
        config: EngineConfig,
        mut definitions: DefinitionTables,
        mesh_storage: S,
    ) -> Result<Self> {
        definitions.freeze();

        let generator = TerrainGenerator::start(&definitions, &config.generator)?;
        let mesher = MeshBuilder::start(&definitions, &config.mesher)?;

        info!(
            "Engine started with {} block definitions, biome {}",
            definitions.len(),
            config.generator.active_biome
        );

        Ok(EngineState {
            config,
            definitions,
            registry: ChunkRegistry::new(),
            generator,
            mesher,
            director: PipelineDirector::new(),
            mesh_storage,
        })
    }

    /// Asks the terrain generator for the chunk at `position`.
    ///
    /// The chunk shows up in the registry on a later `tick`.
    pub fn request_chunk(&self, position: ChunkPosition) -> Result<()> {
        self.generator.push_request(position)
    }

    /// Runs one pipeline tick.
    pub fn tick(&mut self) -> Result<TickReport> {
        self.director.tick(
            &mut self.registry,
            &mut self.generator,
            &mut self.mesher,
            &mut self.mesh_storage,
        )
    }

    /// Removes a chunk and releases its meshes.
    ///
    /// Mesh records for the chunk that are still in flight are discarded when
    /// they arrive.
    pub fn unload_chunk(&mut self, position: ChunkPosition) -> bool {
        self.registry.unload(position, &mut self.mesh_storage)
    }

    /// True when the chunk is resident and every stack requested for it has
    /// come back from the mesher.
    ///
    /// Stacks with nothing visible are settled without holding a mesh.
    pub fn is_meshed(&self, position: ChunkPosition) -> bool {
        self.registry.has(position) && self.director.meshes_in_flight(position) == 0
    }

    /// Mesh requests sent for the chunk and not yet answered.
    pub fn meshes_in_flight(&self, position: ChunkPosition) -> usize {
        self.director.meshes_in_flight(position)
    }

    pub fn registry(&self) -> &ChunkRegistry {
        &self.registry
    }

    pub fn mesh_storage(&self) -> &S {
        &self.mesh_storage
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn definitions(&self) -> &DefinitionTables {
        &self.definitions
    }

    /// Sum of every tick's report so far.
    pub fn totals(&self) -> TickReport {
        self.director.totals()
    }

    /// Whether both worker threads are still running.
    pub fn workers_alive(&self) -> bool {
        self.generator.is_alive() && self.mesher.is_alive()
    }

    /// Stops both workers and waits for their threads to end.
    pub fn stop(&mut self) {
        self.generator.stop();
        self.mesher.stop();
        self.generator.join();
        self.mesher.join();
    }
}
