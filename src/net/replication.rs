//! Replication state machine
//!
//! The host floods a joining client with every loaded chunk followed by a
//! sync sentinel; the client buffers snapshots and applies a bounded
//! number per tick so a large world does not stall a frame. After sync,
//! block edits travel as individual `BlockSet` messages and are applied
//! with the same validation on every peer, so replicas stay identical.

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use crate::core::types::{Result, Vec3};
use crate::net::message::{Message, PlayerId};
use crate::net::session::Session;
use crate::world::block::{BlockId, MaterialRegistry};
use crate::world::chunk::{CHUNK_VOLUME, ChunkCoord};
use crate::world::world::World;

/// Minimum gap between outgoing player state messages
const STATE_INTERVAL: Duration = Duration::from_millis(50);

/// Last known pose of another player
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RemotePlayer {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub status: u8,
}

/// Per-peer replication state
pub struct Replicator {
    syncing: bool,
    sync_complete_seen: bool,
    /// Chunk snapshots received but not yet applied
    snapshots: VecDeque<(ChunkCoord, Vec<u8>)>,
    applied_snapshots: usize,
    players: HashMap<PlayerId, RemotePlayer>,
    roster: Vec<(PlayerId, String)>,
    last_state_send: Option<Instant>,
    sync_chunk_budget: usize,
}

impl Replicator {
    pub fn new(sync_chunk_budget: usize) -> Self {
        Self {
            syncing: false,
            sync_complete_seen: false,
            snapshots: VecDeque::new(),
            applied_snapshots: 0,
            players: HashMap::new(),
            roster: Vec::new(),
            last_state_send: None,
            sync_chunk_budget: sync_chunk_budget.max(1),
        }
    }

    /// Enter the joining state. The host never syncs from anyone.
    pub fn begin_sync(&mut self, session: &dyn Session) {
        if session.is_host() {
            return;
        }
        self.syncing = true;
        self.sync_complete_seen = false;
        self.snapshots.clear();
        self.applied_snapshots = 0;
    }

    pub fn is_syncing(&self) -> bool {
        self.syncing
    }

    /// Fraction of the received snapshots applied so far. Only meaningful
    /// while syncing; 1.0 once sync has finished.
    pub fn sync_progress(&self) -> f32 {
        if !self.syncing {
            return 1.0;
        }
        let total = self.applied_snapshots + self.snapshots.len();
        if total == 0 {
            0.0
        } else {
            self.applied_snapshots as f32 / total as f32
        }
    }

    pub fn players(&self) -> &HashMap<PlayerId, RemotePlayer> {
        &self.players
    }

    pub fn roster(&self) -> &[(PlayerId, String)] {
        &self.roster
    }

    /// Drain inbound messages and advance the sync state machine
    pub fn tick(
        &mut self,
        session: &mut dyn Session,
        world: &mut World,
        registry: &MaterialRegistry,
    ) -> Result<()> {
        while let Some((from, message)) = session.try_recv() {
            self.handle(from, message, world, registry);
        }

        // Apply buffered snapshots under budget so huge worlds stream in
        // over several ticks instead of stalling one
        for _ in 0..self.sync_chunk_budget {
            let Some((coord, blocks)) = self.snapshots.pop_front() else {
                break;
            };
            world.get_or_create_chunk(coord).copy_from_snapshot(&blocks);
            self.applied_snapshots += 1;
        }

        if self.syncing && self.sync_complete_seen && self.snapshots.is_empty() {
            self.syncing = false;
            log::info!("world sync complete, {} chunks applied", self.applied_snapshots);
        }
        Ok(())
    }

    fn handle(&mut self, from: PlayerId, message: Message, world: &mut World, registry: &MaterialRegistry) {
        match message {
            Message::ChunkData { cx, cy, cz, blocks } => {
                if blocks.len() != CHUNK_VOLUME {
                    log::warn!(
                        "dropping chunk snapshot ({}, {}, {}) with bad payload length {}",
                        cx,
                        cy,
                        cz,
                        blocks.len()
                    );
                    return;
                }
                self.snapshots.push_back((ChunkCoord::new(cx, cy, cz), blocks));
            }
            Message::WorldSyncComplete => {
                self.sync_complete_seen = true;
            }
            Message::BlockSet { x, y, z, id } => {
                apply_block_set(world, registry, x, y, z, BlockId(id));
            }
            Message::PlayerState { x, y, z, yaw, pitch, status } => {
                self.players.insert(
                    from,
                    RemotePlayer {
                        position: Vec3::new(x, y, z),
                        yaw,
                        pitch,
                        status,
                    },
                );
            }
            Message::PlayerList { players } => {
                self.players.retain(|id, _| players.iter().any(|(p, _)| p == id));
                self.roster = players;
            }
        }
    }

    /// Apply a local edit and replicate it. Returns what the broken block
    /// drops, if anything.
    pub fn apply_local_edit(
        &mut self,
        session: &mut dyn Session,
        world: &mut World,
        registry: &MaterialRegistry,
        x: i32,
        y: i32,
        z: i32,
        id: BlockId,
    ) -> Result<Option<BlockId>> {
        let previous = world.block_at(x, y, z);
        if !apply_block_set(world, registry, x, y, z, id) {
            return Ok(None);
        }
        session.send(&Message::BlockSet { x, y, z, id: id.0 })?;

        if id.is_air() && !previous.is_air() {
            return Ok(registry.get(previous).drop_item);
        }
        Ok(None)
    }

    /// Flood every loaded chunk to the other side, then the sentinel.
    /// Returns the number of chunks sent.
    pub fn send_world_sync(&mut self, session: &mut dyn Session, world: &World) -> Result<usize> {
        let mut sent = 0;
        for chunk in world.chunks() {
            session.send(&Message::ChunkData {
                cx: chunk.coord.x,
                cy: chunk.coord.y,
                cz: chunk.coord.z,
                blocks: chunk.blocks().to_vec(),
            })?;
            sent += 1;
        }
        session.send(&Message::WorldSyncComplete)?;
        log::info!("sent world sync, {} chunks", sent);
        Ok(sent)
    }

    pub fn broadcast_player_list(
        &mut self,
        session: &mut dyn Session,
        players: Vec<(PlayerId, String)>,
    ) -> Result<()> {
        session.send(&Message::PlayerList { players: players.clone() })?;
        self.roster = players;
        Ok(())
    }

    /// Send the local player's pose, rate-limited to one message per
    /// `STATE_INTERVAL`. Returns whether a message went out.
    #[allow(clippy::too_many_arguments)]
    pub fn maybe_send_player_state(
        &mut self,
        session: &mut dyn Session,
        position: Vec3,
        yaw: f32,
        pitch: f32,
        status: u8,
        now: Instant,
    ) -> Result<bool> {
        if let Some(last) = self.last_state_send {
            if now.duration_since(last) < STATE_INTERVAL {
                return Ok(false);
            }
        }
        session.send(&Message::PlayerState {
            x: position.x,
            y: position.y,
            z: position.z,
            yaw,
            pitch,
            status,
        })?;
        self.last_state_send = Some(now);
        Ok(true)
    }
}

/// Shared edit validation: placement into air and edits of breakable
/// blocks are allowed, everything else (bedrock, water) is rejected.
/// Running the same rule on every peer keeps replicas identical.
pub fn apply_block_set(
    world: &mut World,
    registry: &MaterialRegistry,
    x: i32,
    y: i32,
    z: i32,
    id: BlockId,
) -> bool {
    let existing = world.block_at(x, y, z);
    if !existing.is_air() && !registry.get(existing).breakable {
        return false;
    }
    world.set_block(x, y, z, id)
}
