//! Task for generating mesh data for chunk stacks in a background thread.
//!
//! This module contains the `ChunkMeshGenerationTask`, which meshes one stack
//! of a chunk snapshot per request, and the `MeshBuilder` worker that runs it.
//! Keeping this off the consuming thread keeps ticks short while chunks are
//! being meshed.

use std::sync::Arc;

use crate::{
    core::{config::MesherConfig, error::Result},
    engine_state::{
        rendering::meshing::{culled_stack_with_masks, BlockPalette, MeshRecord, OcclusionMasks},
        task_management::{task::Task, TaskWorker},
        voxels::{
            chunk::{Chunk, ChunkSnapshot},
            definitions::DefinitionTables,
            position::ChunkPosition,
        },
    },
};

/// One stack of one chunk to mesh.
///
/// The eight requests of a full remesh share one snapshot.
#[derive(Debug, Clone)]
pub struct MeshRequest {
    pub snapshot: Arc<ChunkSnapshot>,
    pub stack_index: usize,
}

impl MeshRequest {
    pub fn position(&self) -> ChunkPosition {
        self.snapshot.position
    }
}

/// Occlusion masks of the snapshot most recently meshed.
struct MaskCache {
    /// Held so the allocation cannot be reused while the masks are cached.
    snapshot: Arc<ChunkSnapshot>,
    masks: OcclusionMasks,
}

/// A task that generates mesh records on the mesh worker thread.
pub struct ChunkMeshGenerationTask {
    /// This worker's private copy of the definition tables.
    definitions: DefinitionTables,
    palette: BlockPalette,
    cache: Option<MaskCache>,
}

impl ChunkMeshGenerationTask {
    /// Creates a new chunk mesh generation task.
    ///
    /// # Arguments
    /// * `definitions` - A thread-safe duplicate of the master tables; the task owns it
    pub fn new(definitions: DefinitionTables) -> Self {
        let palette = BlockPalette::from_definitions(&definitions);
        ChunkMeshGenerationTask {
            definitions,
            palette,
            cache: None,
        }
    }

    pub fn definitions(&self) -> &DefinitionTables {
        &self.definitions
    }
}

impl Task for ChunkMeshGenerationTask {
    type Request = MeshRequest;
    type Output = MeshRecord;
    const NAME: &'static str = "mesh builder";

    /// The stacks of one remesh arrive back to back with one shared snapshot,
    /// so the occlusion masks are rebuilt only when the snapshot changes.
    fn process(&mut self, request: MeshRequest) -> Result<MeshRecord> {
        Chunk::check_stack(request.stack_index)?;

        let cache = match self.cache.take() {
            Some(cache) if Arc::ptr_eq(&cache.snapshot, &request.snapshot) => cache,
            _ => MaskCache {
                masks: OcclusionMasks::build(&request.snapshot, &self.palette)?,
                snapshot: request.snapshot,
            },
        };

        let record = culled_stack_with_masks(
            &cache.snapshot,
            &cache.masks,
            &self.palette,
            request.stack_index,
        );
        self.cache = Some(cache);
        record
    }
}

/// The background mesh worker.
///
/// Requests are stacks of chunk snapshots; updates are mesh records, one per
/// request and in request order. A record with no geometry means the stack
/// has nothing visible.
pub struct MeshBuilder {
    worker: TaskWorker<ChunkMeshGenerationTask>,
}

impl MeshBuilder {
    /// Duplicates the frozen master tables and starts the worker thread.
    pub fn start(master: &DefinitionTables, config: &MesherConfig) -> Result<Self> {
        let task = ChunkMeshGenerationTask::new(master.thread_safe_duplicate()?);
        let worker = TaskWorker::spawn(task, config.idle_interval())?;
        Ok(MeshBuilder { worker })
    }

    /// Queues one stack for meshing.
    ///
    /// # Returns
    /// `GridError::StackOutOfBounds` for a bad stack, which is never sent to the worker
    pub fn push_request(&self, snapshot: Arc<ChunkSnapshot>, stack_index: usize) -> Result<()> {
        Chunk::check_stack(stack_index)?;
        self.worker.push_request(MeshRequest {
            snapshot,
            stack_index,
        })
    }

    pub fn has_update(&mut self) -> Result<bool> {
        self.worker.has_update()
    }

    pub fn get_update(&mut self) -> Result<MeshRecord> {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::error::{EngineError, GridError},
        engine_state::voxels::{block::block_record::BlockRecord, chunk::chunk_grid::ChunkGrid},
    };

    fn master() -> DefinitionTables {
        let mut master = DefinitionTables::default_content().unwrap();
        master.freeze();
        master
    }

    #[test]
    fn process_meshes_the_requested_stack() {
        let mut task = ChunkMeshGenerationTask::new(master().thread_safe_duplicate().unwrap());
        let stone = task.definitions().id_of("core:stone").unwrap();

        let mut grid = ChunkGrid::new();
        grid.set(8, 100, 8, BlockRecord::AIR.with_id(stone).unwrap())
            .unwrap();
        let snapshot = Arc::new(ChunkSnapshot::new(ChunkPosition::new(4, 4), grid));

        let record = task
            .process(MeshRequest {
                snapshot: snapshot.clone(),
                stack_index: 6,
            })
            .unwrap();
        assert_eq!(record.face_count(), 6);
        assert_eq!(record.chunk_position, ChunkPosition::new(4, 4));

        let empty = task
            .process(MeshRequest {
                snapshot,
                stack_index: 0,
            })
            .unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn masks_are_reused_across_the_stacks_of_one_snapshot() {
        let mut task = ChunkMeshGenerationTask::new(master().thread_safe_duplicate().unwrap());
        let stone = BlockRecord::AIR
            .with_id(task.definitions().id_of("core:stone").unwrap())
            .unwrap();

        let mut grid = ChunkGrid::new();
        grid.set(8, 100, 8, stone).unwrap();
        let first = Arc::new(ChunkSnapshot::new(ChunkPosition::new(0, 0), grid.clone()));

        for stack_index in [6, 0, 6] {
            task.process(MeshRequest {
                snapshot: first.clone(),
                stack_index,
            })
            .unwrap();
            let cached = task.cache.as_ref().unwrap();
            assert!(Arc::ptr_eq(&cached.snapshot, &first));
        }

        // Same position, new content: the old masks must not leak into it.
        grid.set(8, 101, 8, stone).unwrap();
        let second = Arc::new(ChunkSnapshot::new(ChunkPosition::new(0, 0), grid));
        let record = task
            .process(MeshRequest {
                snapshot: second.clone(),
                stack_index: 6,
            })
            .unwrap();
        assert!(Arc::ptr_eq(&task.cache.as_ref().unwrap().snapshot, &second));
        assert_eq!(record.face_count(), 10);

        let record = task
            .process(MeshRequest {
                snapshot: first,
                stack_index: 6,
            })
            .unwrap();
        assert_eq!(record.face_count(), 6);
    }

    #[test]
    fn a_bad_stack_keeps_the_cached_masks() {
        let mut task = ChunkMeshGenerationTask::new(master().thread_safe_duplicate().unwrap());
        let snapshot = Arc::new(ChunkSnapshot::new(ChunkPosition::new(0, 0), ChunkGrid::new()));

        task.process(MeshRequest {
            snapshot: snapshot.clone(),
            stack_index: 0,
        })
        .unwrap();
        assert!(task
            .process(MeshRequest {
                snapshot: snapshot.clone(),
                stack_index: 8,
            })
            .is_err());
        assert!(Arc::ptr_eq(&task.cache.as_ref().unwrap().snapshot, &snapshot));
    }

    #[test]
    fn bad_stacks_are_rejected_before_queueing() {
        let builder = MeshBuilder::start(&master(), &MesherConfig::default()).unwrap();
        let snapshot = Arc::new(ChunkSnapshot::new(ChunkPosition::new(0, 0), ChunkGrid::new()));

        assert!(matches!(
            builder.push_request(snapshot, 8),
            Err(EngineError::Grid(GridError::StackOutOfBounds { stack: 8 }))
        ));
    }
}
