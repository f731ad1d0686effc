//! Terrain and ore assignment from a world seed
//!
//! Two entry points share one column-fill routine: `generate_chunk` for
//! on-demand materialization by the streaming scheduler, and `WorldGenJob`
//! for budgeted whole-world pre-generation that persists each finished
//! chunk as it goes.

use crate::core::types::Result;
use crate::persist::chunk_store::ChunkStore;
use crate::terrain::noise::{blended_noise, hash01};
use crate::world::block::BlockId;
use crate::world::chunk::{CHUNK_SIZE, CHUNK_VOLUME, Chunk, ChunkCoord};
use crate::world::world::WorldMeta;

/// Seed offset separating the ore hash stream from the height noise
const ORE_SEED_OFFSET: i32 = 999;

/// Per-voxel ore roll below this value becomes coal
const COAL_THRESHOLD: f32 = 0.02;

/// Per-voxel ore roll below this value (and not coal) becomes iron
const IRON_THRESHOLD: f32 = 0.03;

/// Dirt layer thickness beneath the surface block
const DIRT_DEPTH: i32 = 4;

/// Deterministic terrain generator for one world
///
/// Pure function of (x, z, seed): two generators built from the same seed
/// and world height produce identical output, which is what lets evicted,
/// unsaved chunks be re-derived instead of persisted.
#[derive(Clone, Debug)]
pub struct TerrainGenerator {
    seed: i32,
    world_height: i32,
    base_height: i32,
    amplitude: i32,
    sea_level: i32,
}

impl TerrainGenerator {
    /// Create a generator for a world of the given height
    pub fn new(seed: i32, world_height: i32) -> Self {
        Self {
            seed,
            world_height,
            base_height: world_height / 4,
            amplitude: world_height / 2,
            sea_level: (world_height / 3).max(3),
        }
    }

    pub fn from_meta(meta: &WorldMeta) -> Self {
        Self::new(meta.seed, meta.size.height)
    }

    pub fn seed(&self) -> i32 {
        self.seed
    }

    pub fn sea_level(&self) -> i32 {
        self.sea_level
    }

    /// Surface height of the column at world (x, z), clamped to
    /// [1, world_height - 1]
    pub fn surface_height(&self, x: i32, z: i32) -> i32 {
        let noise = blended_noise(x, z, self.seed);
        let h = self.base_height + (noise * self.amplitude as f32).round() as i32;
        h.clamp(1, self.world_height - 1)
    }

    /// Material at world (x, y, z) given the column's surface height.
    ///
    /// y = 0 is always the indestructible boundary. Ore promotion rolls a
    /// second hash stream keyed on (x, y xor z); coal wins over iron.
    pub fn block_for(&self, x: i32, y: i32, z: i32, surface: i32) -> BlockId {
        if y == 0 {
            return BlockId::BEDROCK;
        }
        if y >= surface {
            return BlockId::AIR;
        }
        if y == surface - 1 {
            return if surface - 1 < self.sea_level - 2 {
                BlockId::SAND
            } else {
                BlockId::GRASS
            };
        }
        if y >= surface - 1 - DIRT_DEPTH {
            return BlockId::DIRT;
        }
        let roll = hash01(x, y ^ z, self.seed + ORE_SEED_OFFSET);
        if roll < COAL_THRESHOLD {
            BlockId::COAL_ORE
        } else if roll < IRON_THRESHOLD {
            BlockId::IRON_ORE
        } else {
            BlockId::STONE
        }
    }

    /// Fill one chunk-local column of a chunk
    fn fill_column(&self, chunk: &mut Chunk, lx: i32, lz: i32) {
        let (ox, oy, oz) = chunk.coord.block_origin();
        let (wx, wz) = (ox + lx, oz + lz);
        let surface = self.surface_height(wx, wz);
        for ly in 0..CHUNK_SIZE {
            chunk.set_generated(lx, ly, lz, self.block_for(wx, oy + ly, wz, surface));
        }
    }

    /// Synchronously fill a whole chunk
    pub fn generate_chunk(&self, coord: ChunkCoord) -> Chunk {
        let mut chunk = Chunk::new(coord);
        for lz in 0..CHUNK_SIZE {
            for lx in 0..CHUNK_SIZE {
                self.fill_column(&mut chunk, lx, lz);
            }
        }
        chunk
    }
}

/// Resumable whole-world generation under a caller-supplied block budget
///
/// Chunks are traversed x fastest, then z, then y; each finished chunk is
/// saved through the chunk store immediately, so an interrupted job leaves
/// a consistent prefix on disk. Progress is monotonic in blocks generated.
pub struct WorldGenJob {
    generator: TerrainGenerator,
    chunks_x: i32,
    chunks_y: i32,
    chunks_z: i32,
    /// Index of the chunk currently being generated, in traversal order
    chunk_index: i64,
    /// Next column within the current chunk, x fastest
    column_index: i32,
    current: Option<Chunk>,
    blocks_done: u64,
    total_blocks: u64,
}

/// Chunks needed to cover `blocks` along one axis, rounding up.
/// Signed `div_ceil` is not available on stable.
fn chunks_along(blocks: i32) -> i32 {
    (blocks.max(0) + CHUNK_SIZE - 1).div_euclid(CHUNK_SIZE)
}

impl WorldGenJob {
    pub fn new(meta: &WorldMeta) -> Self {
        let chunks_x = chunks_along(meta.size.width);
        let chunks_y = chunks_along(meta.size.height);
        let chunks_z = chunks_along(meta.size.depth);
        let total_chunks = chunks_x as u64 * chunks_y as u64 * chunks_z as u64;
        Self {
            generator: TerrainGenerator::from_meta(meta),
            chunks_x,
            chunks_y,
            chunks_z,
            chunk_index: 0,
            column_index: 0,
            current: None,
            blocks_done: 0,
            total_blocks: total_chunks * CHUNK_VOLUME as u64,
        }
    }

    pub fn total_chunks(&self) -> i64 {
        self.chunks_x as i64 * self.chunks_y as i64 * self.chunks_z as i64
    }

    fn coord_for(&self, index: i64) -> ChunkCoord {
        let per_layer = (self.chunks_x * self.chunks_z) as i64;
        ChunkCoord::new(
            (index % self.chunks_x as i64) as i32,
            (index / per_layer) as i32,
            ((index / self.chunks_x as i64) % self.chunks_z as i64) as i32,
        )
    }

    /// Fraction of all blocks generated so far, in [0, 1]
    pub fn progress(&self) -> f32 {
        if self.total_blocks == 0 {
            return 1.0;
        }
        self.blocks_done as f32 / self.total_blocks as f32
    }

    pub fn is_complete(&self) -> bool {
        self.chunk_index >= self.total_chunks()
    }

    /// Generate at least one column and up to `block_budget` blocks,
    /// persisting each chunk as it completes. Returns true once the whole
    /// world has been generated.
    ///
    /// A column of 16 blocks is the smallest unit of work, so budgets
    /// below that are rounded up to one column and every call makes
    /// forward progress.
    pub fn step(&mut self, store: &ChunkStore, block_budget: u64) -> Result<bool> {
        let mut budget = block_budget.max(CHUNK_SIZE as u64);
        let columns_per_chunk = CHUNK_SIZE * CHUNK_SIZE;

        while budget >= CHUNK_SIZE as u64 && !self.is_complete() {
            let coord = self.coord_for(self.chunk_index);
            let chunk = self.current.get_or_insert_with(|| Chunk::new(coord));

            let lx = self.column_index % CHUNK_SIZE;
            let lz = self.column_index / CHUNK_SIZE;
            self.generator.fill_column(chunk, lx, lz);

            self.column_index += 1;
            self.blocks_done += CHUNK_SIZE as u64;
            budget -= CHUNK_SIZE as u64;

            if self.column_index == columns_per_chunk {
                let finished = self.current.take();
                if let Some(finished) = finished {
                    store.save(&finished)?;
                }
                self.column_index = 0;
                self.chunk_index += 1;
            }
        }

        if self.is_complete() {
            log::debug!("world generation complete: {} blocks", self.blocks_done);
        }
        Ok(self.is_complete())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::world::{GameMode, WorldSize};
    use tempfile::TempDir;

    fn gen64(seed: i32) -> TerrainGenerator {
        TerrainGenerator::new(seed, 64)
    }

    /// Stack the four chunks of a chunk column into per-block lookups
    fn column_blocks(generator: &TerrainGenerator, wx: i32, wz: i32) -> Vec<BlockId> {
        let lx = wx.rem_euclid(CHUNK_SIZE);
        let lz = wz.rem_euclid(CHUNK_SIZE);
        let (cx, cz) = (wx.div_euclid(CHUNK_SIZE), wz.div_euclid(CHUNK_SIZE));
        (0..4)
            .flat_map(|cy| {
                let chunk = generator.generate_chunk(ChunkCoord::new(cx, cy, cz));
                (0..CHUNK_SIZE).map(move |ly| chunk.get(lx, ly, lz)).collect::<Vec<_>>()
            })
            .collect()
    }

    #[test]
    fn test_surface_height_deterministic_and_clamped() {
        let a = gen64(1);
        let b = gen64(1);
        for x in (-100..100).step_by(9) {
            for z in (-100..100).step_by(7) {
                let h = a.surface_height(x, z);
                assert_eq!(h, b.surface_height(x, z));
                assert!((1..64).contains(&h));
            }
        }
    }

    #[test]
    fn test_surface_height_varies_with_seed() {
        let a = gen64(1);
        let b = gen64(2);
        let differs = (0..64).any(|x| a.surface_height(x, 0) != b.surface_height(x, 0));
        assert!(differs);
    }

    #[test]
    fn test_sea_level_floor() {
        assert_eq!(TerrainGenerator::new(0, 64).sea_level(), 21);
        assert_eq!(TerrainGenerator::new(0, 8).sea_level(), 3);
    }

    #[test]
    fn test_bedrock_plane() {
        let generator = gen64(1);
        let chunk = generator.generate_chunk(ChunkCoord::new(0, 0, 0));
        for lz in 0..CHUNK_SIZE {
            for lx in 0..CHUNK_SIZE {
                assert_eq!(chunk.get(lx, 0, lz), BlockId::BEDROCK);
            }
        }
    }

    #[test]
    fn test_column_single_air_region() {
        let generator = gen64(1);
        for (wx, wz) in [(0, 0), (7, 13), (100, 200), (33, 5)] {
            let blocks = column_blocks(&generator, wx, wz);
            let surface = generator.surface_height(wx, wz);

            assert_eq!(blocks[0], BlockId::BEDROCK);
            for (y, block) in blocks.iter().enumerate() {
                if (y as i32) >= surface {
                    assert_eq!(*block, BlockId::AIR, "solid above surface at y={}", y);
                } else {
                    assert_ne!(*block, BlockId::AIR, "air below surface at y={}", y);
                }
            }
        }
    }

    #[test]
    fn test_surface_layering() {
        // Scenario: seed 1, height 64. Some column has grass at surface-1
        // and dirt for the four voxels beneath it.
        let generator = gen64(1);
        let mut found = false;
        for wx in 0..16 {
            for wz in 0..16 {
                let surface = generator.surface_height(wx, wz);
                if surface - 1 < generator.sea_level() - 2 || surface < 7 {
                    continue;
                }
                let blocks = column_blocks(&generator, wx, wz);
                assert_eq!(blocks[(surface - 1) as usize], BlockId::GRASS);
                for y in (surface - 1 - DIRT_DEPTH)..(surface - 1) {
                    assert_eq!(blocks[y as usize], BlockId::DIRT, "y={}", y);
                }
                found = true;
            }
        }
        assert!(found, "no grass-topped column in the test area");
    }

    #[test]
    fn test_sand_below_sea_level() {
        let generator = gen64(1);
        // Force the rule directly: any surface shallower than sea level - 2
        // must top with sand.
        let shallow = generator.sea_level() - 3;
        assert_eq!(
            generator.block_for(10, shallow - 1, 10, shallow),
            BlockId::SAND
        );
        let deep = generator.sea_level() + 5;
        assert_eq!(generator.block_for(10, deep - 1, 10, deep), BlockId::GRASS);
    }

    #[test]
    fn test_ore_exclusive_and_present() {
        let generator = gen64(1);
        let mut coal = 0u32;
        let mut iron = 0u32;
        let mut stone = 0u32;
        for wx in 0..64 {
            for wz in 0..64 {
                let surface = generator.surface_height(wx, wz);
                for y in 1..(surface - 1 - DIRT_DEPTH) {
                    match generator.block_for(wx, y, wz, surface) {
                        BlockId::COAL_ORE => coal += 1,
                        BlockId::IRON_ORE => iron += 1,
                        BlockId::STONE => stone += 1,
                        other => panic!("unexpected deep block {:?}", other),
                    }
                }
            }
        }
        let total = (coal + iron + stone) as f32;
        assert!(total > 0.0);
        // Thresholds are 2% coal, 1% iron; allow generous slack
        assert!((coal as f32 / total) < 0.05, "coal rate too high");
        assert!((iron as f32 / total) < 0.04, "iron rate too high");
        assert!(coal > 0, "no coal in 64x64 sample");
        assert!(iron > 0, "no iron in 64x64 sample");
    }

    #[test]
    fn test_generate_chunk_reproducible() {
        let generator = gen64(7);
        let a = generator.generate_chunk(ChunkCoord::new(2, 1, 3));
        let b = generator.generate_chunk(ChunkCoord::new(2, 1, 3));
        assert_eq!(a.blocks()[..], b.blocks()[..]);
        assert!(!a.modified, "fresh generation must not need saving");
        assert!(a.dirty, "fresh generation needs meshing");
    }

    fn small_meta() -> WorldMeta {
        WorldMeta::new(
            "job",
            GameMode::Sandbox,
            WorldSize {
                width: 32,
                height: 32,
                depth: 32,
            },
            5,
        )
    }

    #[test]
    fn test_world_gen_job_budgeted() {
        let dir = TempDir::new().unwrap();
        let store = ChunkStore::new(dir.path());
        let meta = small_meta();
        let mut job = WorldGenJob::new(&meta);

        // 8 chunks of 4096 blocks; a 1000-block budget forces many steps
        let mut last_progress = 0.0;
        let mut steps = 0;
        while !job.step(&store, 1000).unwrap() {
            steps += 1;
            assert!(job.progress() >= last_progress, "progress went backwards");
            last_progress = job.progress();
            assert!(steps < 10_000, "job failed to terminate");
        }

        assert!(job.is_complete());
        assert!((job.progress() - 1.0).abs() < 1e-6);
        assert!(steps > 8, "budget was not actually limiting");
    }

    #[test]
    fn test_world_gen_job_persists_all_chunks() {
        let dir = TempDir::new().unwrap();
        let store = ChunkStore::new(dir.path());
        let meta = small_meta();
        let mut job = WorldGenJob::new(&meta);
        while !job.step(&store, 100_000).unwrap() {}

        let generator = TerrainGenerator::from_meta(&meta);
        for cy in 0..2 {
            for cz in 0..2 {
                for cx in 0..2 {
                    let coord = ChunkCoord::new(cx, cy, cz);
                    let loaded = store.load(coord).unwrap().expect("chunk file missing");
                    let fresh = generator.generate_chunk(coord);
                    assert_eq!(
                        loaded.blocks()[..],
                        fresh.blocks()[..],
                        "stepped and synchronous generation diverged at {:?}",
                        coord
                    );
                }
            }
        }
    }

    #[test]
    fn test_job_rounds_partial_chunks_up() {
        // A 20-block axis needs two chunks, not one
        let meta = WorldMeta::new(
            "odd",
            GameMode::Sandbox,
            WorldSize {
                width: 20,
                height: 20,
                depth: 20,
            },
            3,
        );
        assert_eq!(WorldGenJob::new(&meta).total_chunks(), 8);
        assert_eq!(WorldGenJob::new(&small_meta()).total_chunks(), 8);
    }

    #[test]
    fn test_sub_column_budget_still_progresses() {
        let dir = TempDir::new().unwrap();
        let store = ChunkStore::new(dir.path());
        let meta = WorldMeta::new(
            "tiny",
            GameMode::Sandbox,
            WorldSize {
                width: 16,
                height: 16,
                depth: 16,
            },
            9,
        );
        let mut job = WorldGenJob::new(&meta);

        // A budget below one column is rounded up, so the job terminates
        let mut steps = 0;
        while !job.step(&store, 8).unwrap() {
            steps += 1;
            assert!(steps <= 256, "job stalled under a sub-column budget");
        }
        assert!(job.is_complete());
        assert!(store.load(ChunkCoord::new(0, 0, 0)).unwrap().is_some());
    }

    #[test]
    fn test_world_gen_job_zero_size() {
        let dir = TempDir::new().unwrap();
        let store = ChunkStore::new(dir.path());
        let meta = WorldMeta::new(
            "empty",
            GameMode::Sandbox,
            WorldSize {
                width: 0,
                height: 0,
                depth: 0,
            },
            0,
        );
        let mut job = WorldGenJob::new(&meta);
        assert!(job.is_complete());
        assert!(job.step(&store, 1000).unwrap());
        assert_eq!(job.progress(), 1.0);
    }
}
