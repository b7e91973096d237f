//! # Rendering Module
//!
//! The boundary between the chunk pipeline and whatever draws its geometry.
//!
//! ## Key Components
//!
//! * `MeshStorage` - The renderer collaborator. It takes ownership of uploaded
//!   geometry and hands back a `MeshHandle`; releasing the handle frees the geometry.
//! * `InMemoryMeshStorage` - A process-local `MeshStorage` used by the demo and the tests.
//! * `meshing` - Turns chunk snapshots into per-stack mesh records.
//! * `tasks` - The background mesh builder worker.
//!
//! A `MeshHandle` is not `Clone`. A chunk mesh slot owns at most
//! one handle, and giving the handle back to `MeshStorage::release` is the only
//! way the geometry behind it is freed.

use std::collections::HashMap;

use log::trace;

pub mod meshing;
pub mod tasks;

use meshing::MeshRecord;

/// Opaque, uniquely owned reference to geometry held by a `MeshStorage`.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct MeshHandle {
    id: u64,
}

impl MeshHandle {
    /// Wraps a storage-assigned id. Only `MeshStorage` implementations should call this.
    pub fn new(id: u64) -> Self {
        MeshHandle { id }
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

/// A sink for chunk geometry, typically backed by GPU buffers.
pub trait MeshStorage {
    /// Takes ownership of a non-empty record's geometry.
    fn upload(&mut self, record: MeshRecord) -> MeshHandle;

    /// Frees the geometry behind `handle`.
    fn release(&mut self, handle: MeshHandle);
}

/// Keeps uploaded records in a map keyed by their handle id.
#[derive(Debug, Default)]
pub struct InMemoryMeshStorage {
    meshes: HashMap<u64, MeshRecord>,
    uploads: usize,
    releases: usize,
}

impl InMemoryMeshStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, handle: &MeshHandle) -> Option<&MeshRecord> {
        self.meshes.get(&handle.id)
    }

    pub fn contains(&self, handle_id: u64) -> bool {
        self.meshes.contains_key(&handle_id)
    }

    /// Number of meshes currently held.
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    pub fn upload_count(&self) -> usize {
        self.uploads
    }

    pub fn release_count(&self) -> usize {
        self.releases
    }
}

impl MeshStorage for InMemoryMeshStorage {
    fn upload(&mut self, record: MeshRecord) -> MeshHandle {
        let handle = MeshHandle::new(record.handle_id);
        trace!(
            "Uploaded mesh {} for chunk {} stack {}",
            record.handle_id,
            record.chunk_position,
            record.stack_index
        );
        self.meshes.insert(record.handle_id, record);
        self.uploads += 1;
        handle
    }

    fn release(&mut self, handle: MeshHandle) {
        if self.meshes.remove(&handle.id).is_some() {
            trace!("Released mesh {}", handle.id);
        }
        self.releases += 1;
    }
}
