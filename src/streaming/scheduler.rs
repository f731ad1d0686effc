//! Streaming scheduler
//!
//! Single-threaded, budgeted chunk streaming. Each tick recomputes the
//! active set if the observer changed column, enqueues chunks that need
//! loading or remeshing, services a bounded number of them, and evicts
//! chunks that have drifted outside the retention band.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::core::types::{Result, Vec3};
use crate::mesh::mesher::{ChunkMesh, build_chunk_mesh, validate};
use crate::persist::chunk_store::ChunkStore;
use crate::streaming::active_set::ActiveRegion;
use crate::terrain::generator::TerrainGenerator;
use crate::world::block::MaterialRegistry;
use crate::world::chunk::ChunkCoord;
use crate::world::world::World;

/// Streaming tuning knobs
#[derive(Clone, Copy, Debug)]
pub struct StreamingConfig {
    /// Horizontal active radius, in chunk columns
    pub radius: i32,
    /// Chunks materialized and meshed per tick
    pub mesh_budget_per_tick: usize,
    /// Chunk snapshots a joining peer applies per tick
    pub sync_chunk_budget: usize,
    /// Extra columns past the radius a chunk may drift before eviction
    pub evict_margin: i32,
    /// Whether missing chunks are produced locally (disk or generator).
    /// Clients leave this off and receive chunks over the wire instead.
    pub materialize: bool,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            radius: 4,
            mesh_budget_per_tick: 2,
            sync_chunk_budget: 5,
            evict_margin: 2,
            materialize: true,
        }
    }
}

/// Drives chunk residency and meshing around a single observer
pub struct StreamingScheduler {
    config: StreamingConfig,
    active: ActiveRegion,
    queue: VecDeque<ChunkCoord>,
    /// Guards against double-enqueueing a chunk across ticks
    pending: HashSet<ChunkCoord>,
    meshes: HashMap<ChunkCoord, ChunkMesh>,
    /// Chunks whose last mesh failed validation: logged once and not
    /// retried until an edit dirties them again
    invalid_logged: HashSet<ChunkCoord>,
    force_refresh: bool,
}

impl StreamingScheduler {
    pub fn new(config: StreamingConfig) -> Self {
        Self {
            active: ActiveRegion::new(config.radius),
            config,
            queue: VecDeque::new(),
            pending: HashSet::new(),
            meshes: HashMap::new(),
            invalid_logged: HashSet::new(),
            force_refresh: false,
        }
    }

    pub fn config(&self) -> &StreamingConfig {
        &self.config
    }

    pub fn active(&self) -> &ActiveRegion {
        &self.active
    }

    /// Published mesh for a chunk, if one has been built and validated
    pub fn mesh(&self, coord: ChunkCoord) -> Option<&ChunkMesh> {
        self.meshes.get(&coord)
    }

    pub fn meshes(&self) -> impl Iterator<Item = (&ChunkCoord, &ChunkMesh)> {
        self.meshes.iter()
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Force the active set and eviction pass to run on the next tick
    /// even if the observer has not moved
    pub fn refresh(&mut self) {
        self.force_refresh = true;
    }

    /// Run one streaming tick for the observer at `observer_pos`
    pub fn tick(
        &mut self,
        world: &mut World,
        generator: &TerrainGenerator,
        store: Option<&ChunkStore>,
        registry: &MaterialRegistry,
        observer_pos: Vec3,
    ) -> Result<()> {
        let observer = ChunkCoord::from_world_pos(observer_pos);
        let force = std::mem::take(&mut self.force_refresh);
        let recomputed = self.active.update(observer, world.max_chunk_y(), force);

        self.enqueue_work(world);
        self.service_queue(world, generator, store, registry)?;
        if recomputed {
            self.evict(world, store)?;
        }
        Ok(())
    }

    /// Scan the active set for chunks that need materializing or remeshing
    fn enqueue_work(&mut self, world: &World) {
        for coord in self.active.iter() {
            if self.pending.contains(&coord) {
                continue;
            }
            let needs_work = match world.chunk(coord) {
                // A chunk whose mesh failed validation stays unpublished
                // until a new edit dirties it, rather than burning budget
                // on the same rebuild every tick
                Some(chunk) if self.invalid_logged.contains(&coord) => chunk.dirty,
                Some(chunk) => chunk.dirty || !self.meshes.contains_key(&coord),
                None => self.config.materialize,
            };
            if needs_work {
                self.pending.insert(coord);
                self.queue.push_back(coord);
            }
        }
    }

    fn service_queue(
        &mut self,
        world: &mut World,
        generator: &TerrainGenerator,
        store: Option<&ChunkStore>,
        registry: &MaterialRegistry,
    ) -> Result<()> {
        let mut serviced = 0;
        while serviced < self.config.mesh_budget_per_tick {
            let Some(coord) = self.queue.pop_front() else {
                break;
            };
            self.pending.remove(&coord);
            // Stale entries from a previous active set are dropped for free
            if !self.active.contains(coord) {
                continue;
            }

            if world.chunk(coord).is_none() {
                if !self.config.materialize {
                    continue;
                }
                let chunk = match store {
                    Some(store) => store.load(coord)?,
                    None => None,
                };
                let chunk = match chunk {
                    Some(chunk) => chunk,
                    None => generator.generate_chunk(coord),
                };
                world.insert_chunk(chunk);
            }

            let mesh = build_chunk_mesh(world, coord, registry)?;
            if let Some(chunk) = world.chunk_mut(coord) {
                chunk.dirty = false;
            }
            if validate(&mesh) {
                self.meshes.insert(coord, mesh);
                self.invalid_logged.remove(&coord);
            } else {
                if self.invalid_logged.insert(coord) {
                    log::warn!("mesh for chunk {:?} failed validation, not publishing", coord);
                }
                self.meshes.remove(&coord);
            }
            serviced += 1;
        }
        Ok(())
    }

    /// Unload chunks beyond the retention band, saving modified ones first
    fn evict(&mut self, world: &mut World, store: Option<&ChunkStore>) -> Result<()> {
        let Some(center) = self.active.center() else {
            return Ok(());
        };
        let keep = self.active.radius() + self.config.evict_margin;
        let keep2 = keep * keep;

        let evicted: Vec<ChunkCoord> = world
            .loaded_coords()
            .copied()
            .filter(|c| {
                let dx = c.x - center.x;
                let dz = c.z - center.z;
                dx * dx + dz * dz > keep2
            })
            .collect();

        for coord in evicted {
            if let Some(chunk) = world.unload_chunk(coord) {
                if chunk.modified {
                    if let Some(store) = store {
                        store.save(&chunk)?;
                    }
                }
            }
            self.meshes.remove(&coord);
            self.pending.remove(&coord);
            self.invalid_logged.remove(&coord);
        }
        Ok(())
    }
}
