//! # Pipeline Director
//!
//! Runs once per tick on the consuming thread and moves work between the two
//! background workers and the chunk registry.
//!
//! ## Tick Phases
//!
//! 1. **Generator drain**: every finished chunk is committed to the registry.
//!    Then the chunk and each resident cardinal neighbour get a full remesh
//!    (all eight stacks). A new chunk can expose or hide faces on the boundary
//!    it shares with a neighbour that is already meshed.
//! 2. **Mesher drain**: every finished mesh record is stored in its chunk's
//!    slot. Records for chunks that are no longer resident are discarded.
//!
//! Mesh requests for a chunk are only issued after its data is in the
//! registry, so the mesher never works from data older than what neighbour
//! lookups will later see.
//!
//! The director counts the mesh requests in flight per chunk. A chunk is
//! settled once every stack it asked for has come back, whether as geometry
//! or as an empty record.

use std::collections::HashMap;

use log::debug;

use crate::{
    core::error::Result,
    engine_state::{
        rendering::{
            meshing::MeshRecord, tasks::chunk_mesh_generation_task::MeshBuilder, MeshStorage,
        },
        voxels::{
            chunk::MESH_STACK_COUNT, position::ChunkPosition,
            tasks::chunk_generation_task::TerrainGenerator, world::ChunkRegistry,
        },
    },
};

/// What one tick did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// Chunks moved from the generator into the registry.
    pub chunks_committed: usize,
    /// Stack mesh requests sent to the mesh builder.
    pub mesh_requests: usize,
    /// Non-empty mesh records stored in a slot.
    pub meshes_applied: usize,
    /// Empty mesh records that cleared a slot.
    pub stacks_cleared: usize,
    /// Mesh records for chunks that were no longer resident.
    pub records_discarded: usize,
}

impl TickReport {
    /// True when the tick found nothing to do.
    pub fn is_idle(&self) -> bool {
        *self == TickReport::default()
    }

    fn accumulate(&mut self, other: &TickReport) {
        self.chunks_committed += other.chunks_committed;
        self.mesh_requests += other.mesh_requests;
        self.meshes_applied += other.meshes_applied;
        self.stacks_cleared += other.stacks_cleared;
        self.records_discarded += other.records_discarded;
    }
}

/// Where a mesh record ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshOutcome {
    Applied,
    Cleared,
    Discarded,
}

/// Drives the per-tick flow between the workers and the registry.
#[derive(Debug, Default)]
pub struct PipelineDirector {
    totals: TickReport,
    /// Mesh requests sent but not yet answered, per chunk
    in_flight: HashMap<ChunkPosition, usize>,
}

impl PipelineDirector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of every tick so far.
    pub fn totals(&self) -> TickReport {
        self.totals
    }

    /// Mesh records still expected for the chunk at `position`.
    pub fn meshes_in_flight(&self, position: ChunkPosition) -> usize {
        self.in_flight.get(&position).copied().unwrap_or(0)
    }

    /// Mesh records still expected across all chunks.
    pub fn total_in_flight(&self) -> usize {
        self.in_flight.values().sum()
    }

    fn settle(&mut self, position: ChunkPosition) {
        if let Some(count) = self.in_flight.get_mut(&position) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.in_flight.remove(&position);
            }
        }
    }

    /// Runs both drain phases once.
    ///
    /// The phases are independent: a failure while draining the generator
    /// still lets the mesher drain run, so meshes for chunks already in the
    /// registry keep landing while one worker is down.
    ///
    /// # Arguments
    /// * `registry` - The resident chunks
    /// * `generator` - Source of finished chunks
    /// * `mesher` - Destination of mesh requests and source of mesh records
    /// * `storage` - Where mesh geometry is uploaded and released
    ///
    /// # Returns
    /// What the tick did, or the generator phase's error, or else the mesher
    /// phase's error. The work done before an error still counts towards `totals()`.
    pub fn tick(
        &mut self,
        registry: &mut ChunkRegistry,
        generator: &mut TerrainGenerator,
        mesher: &mut MeshBuilder,
        storage: &mut dyn MeshStorage,
    ) -> Result<TickReport> {
        let mut report = TickReport::default();

        let generated = self.drain_generator(registry, generator, mesher, &mut report);
        let meshed = self.drain_mesher(registry, mesher, storage, &mut report);

        if !report.is_idle() {
            debug!("Tick: {:?}", report);
        }
        self.totals.accumulate(&report);

        generated?;
        meshed?;
        Ok(report)
    }

    fn drain_generator(
        &mut self,
        registry: &mut ChunkRegistry,
        generator: &mut TerrainGenerator,
        mesher: &MeshBuilder,
        report: &mut TickReport,
    ) -> Result<()> {
        while generator.has_update()? {
            let chunk = generator.get_update()?;
            let position = chunk.position();
            registry.add_or_update(chunk)?;
            report.chunks_committed += 1;

            for target in remesh_targets(registry, position) {
                let sent = request_full_remesh(registry, mesher, target)?;
                *self.in_flight.entry(target).or_default() += sent;
                report.mesh_requests += sent;
            }
        }
        Ok(())
    }

    fn drain_mesher(
        &mut self,
        registry: &mut ChunkRegistry,
        mesher: &mut MeshBuilder,
        storage: &mut dyn MeshStorage,
        report: &mut TickReport,
    ) -> Result<()> {
        while mesher.has_update()? {
            let record = mesher.get_update()?;
            self.settle(record.chunk_position);
            match apply_mesh_record(registry, storage, record)? {
                MeshOutcome::Applied => report.meshes_applied += 1,
                MeshOutcome::Cleared => report.stacks_cleared += 1,
                MeshOutcome::Discarded => report.records_discarded += 1,
            }
        }
        Ok(())
    }
}

/// Chunks to remesh after the chunk at `position` was committed: the chunk
/// itself, followed by each cardinal neighbour that is already resident.
pub fn remesh_targets(registry: &ChunkRegistry, position: ChunkPosition) -> Vec<ChunkPosition> {
    let mut targets = vec![position];
    targets.extend(registry.resident_neighbors(position));
    targets
}

/// Sends all eight stacks of the chunk at `position` to the mesher.
///
/// # Returns
/// The number of requests sent; zero if the chunk is not resident
fn request_full_remesh(
    registry: &ChunkRegistry,
    mesher: &MeshBuilder,
    position: ChunkPosition,
) -> Result<usize> {
    let snapshot = match registry.snapshot(position) {
        Some(snapshot) => snapshot,
        None => return Ok(0),
    };

    for stack_index in 0..MESH_STACK_COUNT {
        mesher.push_request(snapshot.clone(), stack_index)?;
    }
    Ok(MESH_STACK_COUNT)
}

/// Stores a finished mesh record in its chunk's slot.
///
/// Non-empty records are uploaded and replace the slot's handle, releasing
/// the previous one. Empty records clear the slot. Records for chunks that
/// are not resident are dropped without touching `storage`.
pub fn apply_mesh_record(
    registry: &mut ChunkRegistry,
    storage: &mut dyn MeshStorage,
    record: MeshRecord,
) -> Result<MeshOutcome> {
    let chunk = match registry.get_mut(record.chunk_position) {
        Some(chunk) => chunk,
        None => {
            debug!(
                "Discarded mesh for unloaded chunk {} stack {}",
                record.chunk_position, record.stack_index
            );
            return Ok(MeshOutcome::Discarded);
        }
    };

    let stack_index = record.stack_index;
    if record.is_empty() {
        chunk.clear_mesh(stack_index, storage)?;
        return Ok(MeshOutcome::Cleared);
    }

    let handle = storage.upload(record);
    chunk.set_mesh(stack_index, handle, storage)?;
    Ok(MeshOutcome::Applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{
            config::{GeneratorConfig, MesherConfig},
            error::{EngineError, WorkerError},
        },
        engine_state::{
            rendering::InMemoryMeshStorage,
            voxels::{
                block::block_record::BlockRecord, chunk::Chunk, definitions::DefinitionTables,
                position::CardinalDirection,
            },
        },
    };
    use std::{thread, time::Duration};
    use web_time::Instant;

    fn record_with_geometry(position: ChunkPosition, stack_index: usize) -> MeshRecord {
        let mut record = MeshRecord::empty(position, stack_index);
        record.vertex_positions.extend_from_slice(&[0.0; 12]);
        record.texture_coordinates.extend_from_slice(&[0.0; 8]);
        record.indices.extend_from_slice(&[0, 1, 2, 2, 3, 0]);
        record
    }

    #[test]
    fn lone_chunk_remeshes_only_itself() {
        let mut registry = ChunkRegistry::new();
        let origin = ChunkPosition::new(0, 0);
        registry.add_or_update(Chunk::new(origin)).unwrap();

        assert_eq!(remesh_targets(&registry, origin), vec![origin]);
    }

    #[test]
    fn new_neighbour_invalidates_the_existing_chunk() {
        let mut registry = ChunkRegistry::new();
        let a = ChunkPosition::new(0, 0);
        let b = a.neighbor(CardinalDirection::Back).unwrap();

        registry.add_or_update(Chunk::new(a)).unwrap();
        registry.add_or_update(Chunk::new(b)).unwrap();

        assert_eq!(remesh_targets(&registry, b), vec![b, a]);
    }

    #[test]
    fn all_four_resident_neighbours_are_remeshed() {
        let mut registry = ChunkRegistry::new();
        let centre = ChunkPosition::new(5, 5);
        for direction in CardinalDirection::ALL {
            registry
                .add_or_update(Chunk::new(centre.neighbor(direction).unwrap()))
                .unwrap();
        }
        registry
            .add_or_update(Chunk::new(ChunkPosition::new(6, 6)))
            .unwrap();
        registry.add_or_update(Chunk::new(centre)).unwrap();

        let targets = remesh_targets(&registry, centre);
        assert_eq!(targets.len(), 5);
        assert_eq!(targets[0], centre);
        assert!(!targets.contains(&ChunkPosition::new(6, 6)));
    }

    #[test]
    fn records_for_unloaded_chunks_are_discarded() {
        let mut registry = ChunkRegistry::new();
        let mut storage = InMemoryMeshStorage::new();

        let outcome = apply_mesh_record(
            &mut registry,
            &mut storage,
            record_with_geometry(ChunkPosition::new(9, 9), 0),
        )
        .unwrap();

        assert_eq!(outcome, MeshOutcome::Discarded);
        assert_eq!(storage.upload_count(), 0);
    }

    #[test]
    fn remeshing_a_stack_replaces_and_releases() {
        let mut registry = ChunkRegistry::new();
        let mut storage = InMemoryMeshStorage::new();
        let position = ChunkPosition::new(0, 0);
        registry.add_or_update(Chunk::new(position)).unwrap();

        let first = record_with_geometry(position, 3);
        let first_id = first.handle_id;
        assert_eq!(
            apply_mesh_record(&mut registry, &mut storage, first).unwrap(),
            MeshOutcome::Applied
        );

        let second = record_with_geometry(position, 3);
        let second_id = second.handle_id;
        apply_mesh_record(&mut registry, &mut storage, second).unwrap();

        assert!(!storage.contains(first_id));
        assert!(storage.contains(second_id));
        assert_eq!(
            registry
                .get(position)
                .unwrap()
                .get_mesh(3)
                .unwrap()
                .map(|handle| handle.id()),
            Some(second_id)
        );
    }

    #[test]
    fn empty_records_clear_the_slot() {
        let mut registry = ChunkRegistry::new();
        let mut storage = InMemoryMeshStorage::new();
        let position = ChunkPosition::new(0, 0);
        registry.add_or_update(Chunk::new(position)).unwrap();

        apply_mesh_record(&mut registry, &mut storage, record_with_geometry(position, 1)).unwrap();
        let outcome =
            apply_mesh_record(&mut registry, &mut storage, MeshRecord::empty(position, 1)).unwrap();

        assert_eq!(outcome, MeshOutcome::Cleared);
        assert!(storage.is_empty());
        assert!(registry.get(position).unwrap().get_mesh(1).unwrap().is_none());
    }

    #[test]
    fn settling_counts_down_to_zero() {
        let mut director = PipelineDirector::new();
        let position = ChunkPosition::new(1, 2);
        director.in_flight.insert(position, 2);

        director.settle(position);
        assert_eq!(director.meshes_in_flight(position), 1);
        director.settle(position);
        assert_eq!(director.meshes_in_flight(position), 0);
        director.settle(position);
        assert_eq!(director.total_in_flight(), 0);
    }

    #[test]
    fn a_dead_generator_does_not_stall_the_mesher() {
        let mut master = DefinitionTables::default_content().unwrap();
        master.freeze();
        let stone = BlockRecord::AIR
            .with_id(master.id_of("core:stone").unwrap())
            .unwrap();

        let mut generator = TerrainGenerator::start(&master, &GeneratorConfig::default()).unwrap();
        let mut mesher =
            MeshBuilder::start(&master, &MesherConfig { idle_interval_ms: 1 }).unwrap();
        let mut registry = ChunkRegistry::new();
        let mut storage = InMemoryMeshStorage::new();
        let mut director = PipelineDirector::new();

        let position = ChunkPosition::new(0, 0);
        let mut chunk = Chunk::new(position);
        chunk.set_block(4, 4, 4, stone).unwrap();
        registry.add_or_update(chunk).unwrap();

        let sent = request_full_remesh(&registry, &mesher, position).unwrap();
        director.in_flight.insert(position, sent);
        generator.join();

        let deadline = Instant::now() + Duration::from_secs(5);
        while director.meshes_in_flight(position) > 0 {
            assert!(Instant::now() < deadline, "mesh records never arrived");
            assert!(matches!(
                director.tick(&mut registry, &mut generator, &mut mesher, &mut storage),
                Err(EngineError::Worker(WorkerError::NotAlive { .. }))
            ));
            thread::sleep(Duration::from_millis(1));
        }

        let totals = director.totals();
        assert_eq!(totals.meshes_applied, 1);
        assert_eq!(totals.stacks_cleared, MESH_STACK_COUNT - 1);
        assert!(registry.get(position).unwrap().get_mesh(0).unwrap().is_some());
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn idle_reports() {
        assert!(TickReport::default().is_idle());
        let busy = TickReport {
            meshes_applied: 1,
            ..TickReport::default()
        };
        assert!(!busy.is_idle());
    }
}
