//! Per-player world state
//!
//! The current format is a versioned, LZ4-compressed rkyv record. Older
//! saves used plain JSON; those are still accepted read-only through a
//! best-effort adapter chain: binary, then legacy JSON, then a spawn-safe
//! default. Loading never fails hard.

use std::fs;
use std::path::{Path, PathBuf};

use rkyv::{Archive, Deserialize, Serialize};

use crate::core::error::Error;
use crate::core::types::Result;
use crate::world::block::{BlockId, MaterialRegistry};

/// Current player record format version
pub const PLAYER_RECORD_VERSION: u32 = 2;

/// Maximum persisted hotbar slots
pub const MAX_HOTBAR_SLOTS: usize = 9;

/// Placeholder file stem for empty usernames
const DEFAULT_FILE_STEM: &str = "player";

/// Versioned player state as stored on disk
#[derive(Archive, Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct PlayerRecord {
    pub version: u32,
    pub username: String,
    pub position: [f32; 3],
    pub yaw: f32,
    pub pitch: f32,
    /// Selected hotbar index
    pub hotbar_index: u8,
    /// Hotbar slots in order: (item id, count); (0, 0) is an empty slot
    pub slots: Vec<(u8, u32)>,
}

impl PlayerRecord {
    /// A fresh record for a player with no saved state
    pub fn spawn_default(username: impl Into<String>) -> Self {
        Self {
            version: PLAYER_RECORD_VERSION,
            username: username.into(),
            position: [0.0, 0.0, 0.0],
            yaw: 0.0,
            pitch: 0.0,
            hotbar_index: 0,
            slots: Vec::new(),
        }
    }
}

/// Replace characters the host filesystem rejects with underscores.
/// An empty result falls back to a fixed placeholder.
pub fn sanitize_username(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_control() || matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|') {
                '_'
            } else {
                c
            }
        })
        .collect();
    if cleaned.is_empty() {
        DEFAULT_FILE_STEM.to_string()
    } else {
        cleaned
    }
}

/// Legacy JSON save file shape; every field is optional
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct LegacyPlayerFile {
    username: String,
    position: [f32; 3],
    yaw: f32,
    pitch: f32,
    selected_slot: u8,
    hotbar: Vec<LegacySlot>,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct LegacySlot {
    item: String,
    count: u32,
}

/// Player persistence rooted at `<world>/players`
pub struct PlayerStore {
    dir: PathBuf,
}

impl PlayerStore {
    pub fn new(world_dir: impl AsRef<Path>) -> Self {
        Self {
            dir: world_dir.as_ref().join("players"),
        }
    }

    fn dat_path(&self, username: &str) -> PathBuf {
        self.dir.join(format!("{}.dat", sanitize_username(username)))
    }

    fn legacy_path(&self, username: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_username(username)))
    }

    /// Save a player record as compressed binary
    pub fn save(&self, record: &PlayerRecord) -> Result<()> {
        let mut record = record.clone();
        record.version = PLAYER_RECORD_VERSION;
        record.slots.truncate(MAX_HOTBAR_SLOTS);

        let bytes = rkyv::to_bytes::<rkyv::rancor::Error>(&record)
            .map_err(|e| Error::Codec(e.to_string()))?;
        let compressed = lz4_flex::compress_prepend_size(&bytes);

        fs::create_dir_all(&self.dir)?;
        fs::write(self.dat_path(&record.username), compressed)?;
        Ok(())
    }

    /// Load a player's state. Tries the binary record, then the legacy
    /// JSON file, then a spawn-safe default. Never fails.
    pub fn load(&self, username: &str, registry: &MaterialRegistry) -> PlayerRecord {
        match self.load_binary(username) {
            Ok(Some(record)) => return record,
            Ok(None) => {}
            Err(e) => log::warn!("player record for '{}' unreadable: {}", username, e),
        }
        if let Some(record) = self.load_legacy(username, registry) {
            return record;
        }
        PlayerRecord::spawn_default(username)
    }

    fn load_binary(&self, username: &str) -> Result<Option<PlayerRecord>> {
        let path = self.dat_path(username);
        if !path.exists() {
            return Ok(None);
        }
        let compressed = fs::read(&path)?;
        let bytes = lz4_flex::decompress_size_prepended(&compressed)
            .map_err(|e| Error::Codec(format!("LZ4 decompression failed: {}", e)))?;
        let archived = rkyv::access::<ArchivedPlayerRecord, rkyv::rancor::Error>(&bytes)
            .map_err(|e| Error::Codec(e.to_string()))?;
        let record = rkyv::deserialize::<PlayerRecord, rkyv::rancor::Error>(archived)
            .map_err(|e| Error::Codec(e.to_string()))?;
        if record.version != PLAYER_RECORD_VERSION {
            return Err(Error::Persist(format!(
                "unsupported player record version {}",
                record.version
            )));
        }
        Ok(Some(record))
    }

    /// Best-effort read of the legacy JSON format. Item names resolve
    /// against the registry exactly first, then case-insensitively; a slot
    /// that resolves to nothing is left empty.
    fn load_legacy(&self, username: &str, registry: &MaterialRegistry) -> Option<PlayerRecord> {
        let path = self.legacy_path(username);
        let data = fs::read_to_string(&path).ok()?;
        let legacy: LegacyPlayerFile = match serde_json::from_str(&data) {
            Ok(parsed) => parsed,
            Err(e) => {
                log::warn!("legacy player file {} unparseable: {}", path.display(), e);
                return None;
            }
        };

        let slots = legacy
            .hotbar
            .iter()
            .take(MAX_HOTBAR_SLOTS)
            .map(|slot| {
                let material = registry
                    .by_name(&slot.item)
                    .or_else(|| registry.by_name_ignore_case(&slot.item));
                match material {
                    Some(m) if !m.id.is_air() => (m.id.0, slot.count),
                    _ => (BlockId::AIR.0, 0),
                }
            })
            .collect();

        log::info!("migrated legacy player file {}", path.display());
        Some(PlayerRecord {
            version: PLAYER_RECORD_VERSION,
            username: if legacy.username.is_empty() {
                username.to_string()
            } else {
                legacy.username
            },
            position: legacy.position,
            yaw: legacy.yaw,
            pitch: legacy.pitch,
            hotbar_index: legacy.selected_slot,
            slots,
        })
    }
}
