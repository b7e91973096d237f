#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Chunk Pipeline
//!
//! The chunk data pipeline of a block-based voxel world: compact block
//! records, fixed-size chunk grids, background terrain generation and
//! background per-stack meshing with face culling, coordinated once per tick
//! on the consuming thread.
//!
//! ## Key Modules
//!
//! * `core` - Error taxonomy and configuration
//! * `engine_state` - The engine, its workers, the chunk registry and the
//!   voxel and mesh data types
//!
//! ## Architecture
//!
//! Two long-lived worker threads sit behind request/result channels:
//! * The terrain generator turns chunk positions into populated chunks
//! * The mesh builder turns chunk snapshots into one mesh record per stack
//!
//! Each worker owns a duplicate of the frozen definition tables and shares no
//! other state with the consuming thread. The pipeline director drains both
//! workers every tick, commits chunks to the registry, requests remeshes of
//! new chunks and their resident neighbours, and stores finished meshes.
//!
//! ## Usage
//!
//! ```no_run
//! fn main() {
//!     chunk_pipeline::run();
//! }
//! ```

use std::thread;

use log::{error, info};
use web_time::Instant;

pub mod core;
pub mod engine_state;

pub use crate::core::{
    config::EngineConfig,
    error::{EngineError, Result},
};
pub use engine_state::{
    pipeline_director::{PipelineDirector, TickReport},
    rendering::{meshing::MeshRecord, InMemoryMeshStorage, MeshHandle, MeshStorage},
    voxels::{
        block::block_record::BlockRecord,
        chunk::{chunk_grid::ChunkGrid, Chunk, ChunkSnapshot},
        definitions::DefinitionTables,
        position::ChunkPosition,
        world::ChunkRegistry,
    },
    EngineState,
};

/// Runs the demo pipeline: generates and meshes the square of chunks within
/// the configured view radius of the origin, then shuts down.
///
/// Ticking stops once every requested chunk is meshed or `max_ticks` have run.
///
/// The first command line argument, if present, is the path of a JSON
/// configuration file.
pub fn run() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    if let Err(err) = run_pipeline() {
        error!("Pipeline failed: {}", err);
    }
}

fn load_config() -> Result<EngineConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            info!("Loading configuration from {}", path);
            Ok(EngineConfig::load(path)?)
        }
        None => Ok(EngineConfig::default()),
    }
}

/// Every chunk position within `radius` of the origin, row by row.
fn view_square(radius: i32) -> Vec<ChunkPosition> {
    let radius = radius.max(0);
    let mut positions = Vec::new();
    for z in -radius..=radius {
        for x in -radius..=radius {
            positions.push(ChunkPosition::new(x, z));
        }
    }
    positions
}

fn run_pipeline() -> Result<()> {
    let config = load_config()?;
    let definitions = DefinitionTables::default_content()?;
    let max_ticks = config.max_ticks;
    let tick_interval = config.tick_interval();
    let positions = view_square(config.view_radius);

    let mut engine = EngineState::start(config, definitions)?;

    let stopwatch = Instant::now();
    for &position in &positions {
        engine.request_chunk(position)?;
    }

    let mut ticks = 0;
    while ticks < max_ticks {
        engine.tick()?;
        ticks += 1;

        if positions
            .iter()
            .all(|&position| engine.is_meshed(position))
        {
            break;
        }
        thread::sleep(tick_interval);
    }

    let totals = engine.totals();
    let meshed = positions
        .iter()
        .filter(|&&position| engine.is_meshed(position))
        .count();

    info!(
        "{}/{} chunks meshed after {} ticks in {:?}",
        meshed,
        positions.len(),
        ticks,
        stopwatch.elapsed()
    );
    info!(
        "Committed {} chunks, issued {} mesh requests, stored {} meshes, cleared {} stacks, discarded {} records",
        totals.chunks_committed,
        totals.mesh_requests,
        totals.meshes_applied,
        totals.stacks_cleared,
        totals.records_discarded
    );
    info!("{} meshes resident", engine.mesh_storage().len());

    engine.stop();
    Ok(())
}
