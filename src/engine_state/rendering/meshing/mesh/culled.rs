//! Face-culled meshing of a single chunk stack.
//!
//! A face is emitted when the voxel on its other side does not occlude it.
//! Only `DrawType::Block` voxels occlude and only they produce geometry.
//! Neighbours below y = 0 or above the column count as air. Neighbours across
//! the chunk's horizontal boundary are read from the snapshot's neighbour
//! grids; when that neighbour chunk is not resident the face is emitted.

use bitvec::prelude::BitVec;

use super::{face::Face, mesh::MeshRecord};
use crate::{
    core::error::{DefinitionError, GridError, Result},
    engine_state::voxels::{
        block::{
            block_definition::AtlasRect, block_record::BlockRecord, block_side::BlockSide,
            draw_type::DrawType,
        },
        chunk::{
            chunk_grid::{ChunkGrid, CHUNK_DIMENSION, CHUNK_HEIGHT, CHUNK_SIZE},
            ChunkSnapshot, MESH_STACK_COUNT, STACK_HEIGHT,
        },
        definitions::DefinitionTables,
        position::CardinalDirection,
    },
};

#[derive(Clone, Debug)]
struct PaletteEntry {
    draw_type: DrawType,
    rects: [AtlasRect; 6],
}

/// Per-id draw information, resolved once from a definitions duplicate.
#[derive(Clone, Debug, Default)]
pub struct BlockPalette {
    entries: Vec<PaletteEntry>,
}

impl BlockPalette {
    pub fn from_definitions(definitions: &DefinitionTables) -> Self {
        let entries = definitions
            .blocks()
            .map(|block| PaletteEntry {
                draw_type: block.draw_type,
                rects: BlockSide::all().map(|side| block.texture_rect(side)),
            })
            .collect();

        BlockPalette { entries }
    }

    fn entry(&self, id: u32) -> std::result::Result<&PaletteEntry, DefinitionError> {
        self.entries
            .get(id as usize)
            .ok_or(DefinitionError::UnknownId(id))
    }

    /// Whether `record` hides the faces of the voxels next to it.
    pub fn occludes(&self, record: BlockRecord) -> std::result::Result<bool, DefinitionError> {
        Ok(self.entry(record.id())?.draw_type.is_occluding())
    }

    /// One bit per record, set where the record occludes.
    fn solid_mask(&self, grid: &ChunkGrid) -> std::result::Result<BitVec, DefinitionError> {
        let mut mask = BitVec::repeat(false, CHUNK_SIZE);
        for (index, record) in grid.records().iter().enumerate() {
            if self.occludes(*record)? {
                mask.set(index, true);
            }
        }
        Ok(mask)
    }
}

/// Occlusion bits of a snapshot's grid and of its resident neighbours' grids.
///
/// Depends only on the snapshot, so the eight stacks of one remesh can share
/// a single set.
pub struct OcclusionMasks {
    own: BitVec,
    neighbors: [Option<BitVec>; 4],
}

impl OcclusionMasks {
    pub fn build(snapshot: &ChunkSnapshot, palette: &BlockPalette) -> Result<Self> {
        let own = palette.solid_mask(&snapshot.grid)?;

        let mut neighbors: [Option<BitVec>; 4] = Default::default();
        for direction in CardinalDirection::ALL {
            if let Some(grid) = snapshot.neighbor(direction) {
                neighbors[direction as usize] = Some(palette.solid_mask(grid)?);
            }
        }

        Ok(OcclusionMasks { own, neighbors })
    }

    /// Whether the voxel at chunk-local `(x, y, z)` occludes. Coordinates may
    /// step one voxel outside the chunk horizontally.
    fn is_occluding(&self, x: i32, y: i32, z: i32) -> bool {
        if !(0..CHUNK_HEIGHT).contains(&y) {
            return false;
        }

        let (mask, local_x, local_z) = if x < 0 {
            (self.neighbor(CardinalDirection::Left), x + CHUNK_DIMENSION, z)
        } else if x >= CHUNK_DIMENSION {
            (self.neighbor(CardinalDirection::Right), x - CHUNK_DIMENSION, z)
        } else if z < 0 {
            (self.neighbor(CardinalDirection::Front), x, z + CHUNK_DIMENSION)
        } else if z >= CHUNK_DIMENSION {
            (self.neighbor(CardinalDirection::Back), x, z - CHUNK_DIMENSION)
        } else {
            (Some(&self.own), x, z)
        };

        match (mask, ChunkGrid::position_to_index(local_x, y, local_z)) {
            (Some(mask), Ok(index)) => mask[index],
            _ => false,
        }
    }

    fn neighbor(&self, direction: CardinalDirection) -> Option<&BitVec> {
        self.neighbors[direction as usize].as_ref()
    }
}

/// Builds the geometry of one stack of a chunk snapshot.
///
/// Builds the snapshot's occlusion masks first; see `culled_stack_with_masks`
/// to reuse them across stacks.
///
/// # Arguments
/// * `snapshot` - The chunk grid and the grids of its resident neighbours
/// * `palette` - Draw information for every block id in the grids
/// * `stack_index` - Which 16-tall stack to mesh, 0..8
///
/// # Returns
/// A record with a fresh handle id, possibly with no geometry. Fails with
/// `GridError::StackOutOfBounds` for a bad stack or `DefinitionError::UnknownId`
/// for a record whose id is not in the palette.
pub fn culled_stack(
    snapshot: &ChunkSnapshot,
    palette: &BlockPalette,
    stack_index: usize,
) -> Result<MeshRecord> {
    if stack_index >= MESH_STACK_COUNT {
        return Err(GridError::StackOutOfBounds { stack: stack_index }.into());
    }

    let masks = OcclusionMasks::build(snapshot, palette)?;
    culled_stack_with_masks(snapshot, &masks, palette, stack_index)
}

/// `culled_stack` with masks already built from `snapshot`.
pub fn culled_stack_with_masks(
    snapshot: &ChunkSnapshot,
    masks: &OcclusionMasks,
    palette: &BlockPalette,
    stack_index: usize,
) -> Result<MeshRecord> {
    if stack_index >= MESH_STACK_COUNT {
        return Err(GridError::StackOutOfBounds { stack: stack_index }.into());
    }

    let mut record = MeshRecord::empty(snapshot.position, stack_index);

    let bottom = stack_index as i32 * STACK_HEIGHT;
    for y in bottom..bottom + STACK_HEIGHT {
        for z in 0..CHUNK_DIMENSION {
            for x in 0..CHUNK_DIMENSION {
                let block = snapshot.grid.get(x, y, z)?;
                if block.is_air() {
                    continue;
                }

                let entry = palette.entry(block.id())?;
                if entry.draw_type != DrawType::Block {
                    continue;
                }

                for side in BlockSide::all() {
                    let normal = side.normal();
                    if !masks.is_occluding(x + normal.x, y + normal.y, z + normal.z) {
                        let face = Face::new(x, y, z, block.id(), side);
                        record.add_face(&face, entry.rects[side as usize]);
                    }
                }
            }
        }
    }

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::error::EngineError,
        engine_state::voxels::{
            block::block_definition::BlockDefinition, chunk::ChunkSnapshot,
            position::ChunkPosition,
        },
    };

    struct Content {
        palette: BlockPalette,
        stone: BlockRecord,
        glass: BlockRecord,
    }

    fn content() -> Content {
        let mut definitions = DefinitionTables::default_content().unwrap();
        let glass_id = definitions
            .register_block(
                BlockDefinition::new("test:glass")
                    .with_draw_type(DrawType::Glass)
                    .with_textures(["glass.png"; 6].map(String::from)),
            )
            .unwrap();

        Content {
            stone: BlockRecord::AIR
                .with_id(definitions.id_of("core:stone").unwrap())
                .unwrap(),
            glass: BlockRecord::AIR.with_id(glass_id).unwrap(),
            palette: BlockPalette::from_definitions(&definitions),
        }
    }

    fn snapshot_with(voxels: &[(i32, i32, i32, BlockRecord)]) -> ChunkSnapshot {
        let mut grid = ChunkGrid::new();
        for &(x, y, z, record) in voxels {
            grid.set(x, y, z, record).unwrap();
        }
        ChunkSnapshot::new(ChunkPosition::new(0, 0), grid)
    }

    #[test]
    fn lone_voxel_emits_six_faces() {
        let content = content();
        let snapshot = snapshot_with(&[(5, 20, 5, content.stone)]);

        let record = culled_stack(&snapshot, &content.palette, 1).unwrap();
        assert_eq!(record.face_count(), 6);
        assert_eq!(record.vertex_count(), 24);
        assert_eq!(record.indices.len(), 36);
        assert_eq!(record.stack_index, 1);
    }

    #[test]
    fn shared_face_is_emitted_by_neither_voxel() {
        let content = content();
        let snapshot = snapshot_with(&[(5, 20, 5, content.stone), (6, 20, 5, content.stone)]);

        let record = culled_stack(&snapshot, &content.palette, 1).unwrap();
        assert_eq!(record.face_count(), 10);
    }

    #[test]
    fn vertical_neighbours_cull_across_stacks() {
        let content = content();
        let snapshot = snapshot_with(&[(0, 15, 0, content.stone), (0, 16, 0, content.stone)]);

        let lower = culled_stack(&snapshot, &content.palette, 0).unwrap();
        let upper = culled_stack(&snapshot, &content.palette, 1).unwrap();
        assert_eq!(lower.face_count(), 5);
        assert_eq!(upper.face_count(), 5);
    }

    #[test]
    fn column_floor_and_ceiling_count_as_air() {
        let content = content();
        let snapshot = snapshot_with(&[(3, 0, 3, content.stone), (3, 127, 3, content.stone)]);

        assert_eq!(culled_stack(&snapshot, &content.palette, 0).unwrap().face_count(), 6);
        assert_eq!(culled_stack(&snapshot, &content.palette, 7).unwrap().face_count(), 6);
    }

    #[test]
    fn glass_neither_draws_nor_hides() {
        let content = content();
        let snapshot = snapshot_with(&[(5, 20, 5, content.stone), (6, 20, 5, content.glass)]);

        let record = culled_stack(&snapshot, &content.palette, 1).unwrap();
        assert_eq!(record.face_count(), 6);
    }

    #[test]
    fn boundary_faces_consult_resident_neighbours() {
        let content = content();
        let lone = snapshot_with(&[(15, 20, 0, content.stone)]);
        assert_eq!(culled_stack(&lone, &content.palette, 1).unwrap().face_count(), 6);

        let mut right = ChunkGrid::new();
        right.set(0, 20, 0, content.stone).unwrap();
        let mut front = ChunkGrid::new();
        front.set(15, 20, 15, content.stone).unwrap();

        let neighboured = snapshot_with(&[(15, 20, 0, content.stone)])
            .with_neighbor(CardinalDirection::Right, right)
            .with_neighbor(CardinalDirection::Front, front);
        assert_eq!(
            culled_stack(&neighboured, &content.palette, 1).unwrap().face_count(),
            4
        );
    }

    #[test]
    fn empty_stack_gives_an_empty_record() {
        let content = content();
        let snapshot = snapshot_with(&[(5, 20, 5, content.stone)]);

        let record = culled_stack(&snapshot, &content.palette, 4).unwrap();
        assert!(record.is_empty());
        assert_eq!(record.chunk_position, ChunkPosition::new(0, 0));
    }

    #[test]
    fn bad_stack_and_unknown_ids_are_errors() {
        let content = content();
        let snapshot = snapshot_with(&[]);
        assert!(matches!(
            culled_stack(&snapshot, &content.palette, MESH_STACK_COUNT),
            Err(EngineError::Grid(GridError::StackOutOfBounds { stack: 8 }))
        ));

        let unknown = BlockRecord::AIR.with_id(999).unwrap();
        let snapshot = snapshot_with(&[(0, 0, 0, unknown)]);
        assert!(matches!(
            culled_stack(&snapshot, &content.palette, 0),
            Err(EngineError::Definition(DefinitionError::UnknownId(999)))
        ));
    }

    #[test]
    fn vertices_stay_in_chunk_local_space() {
        let content = content();
        let snapshot = snapshot_with(&[(15, 127, 15, content.stone)]);

        let record = culled_stack(&snapshot, &content.palette, 7).unwrap();
        for vertex in record.vertex_positions.chunks(3) {
            assert!((15.0..=16.0).contains(&vertex[0]));
            assert!((127.0..=128.0).contains(&vertex[1]));
            assert!((15.0..=16.0).contains(&vertex[2]));
        }
    }
}
