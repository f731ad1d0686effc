//! Wire message set and codec

use rkyv::{Archive, Deserialize, Serialize};

use crate::core::error::Error;
use crate::core::types::Result;

/// Peer identifier assigned by the host; the host is always id 0
pub type PlayerId = i32;

/// Everything that crosses the wire
#[derive(Archive, Deserialize, Serialize, Debug, Clone, PartialEq)]
pub enum Message {
    /// Periodic pose update for one player
    PlayerState {
        x: f32,
        y: f32,
        z: f32,
        yaw: f32,
        pitch: f32,
        /// Animation/stance bits (walking, flying, ...)
        status: u8,
    },
    /// A single authoritative block edit at world coordinates
    BlockSet { x: i32, y: i32, z: i32, id: u8 },
    /// Full block payload of one chunk, sent during world sync
    ChunkData {
        cx: i32,
        cy: i32,
        cz: i32,
        blocks: Vec<u8>,
    },
    /// Sentinel marking the end of the initial chunk flood
    WorldSyncComplete,
    /// Current roster of connected players
    PlayerList { players: Vec<(PlayerId, String)> },
}

pub fn encode(message: &Message) -> Result<Vec<u8>> {
    let bytes = rkyv::to_bytes::<rkyv::rancor::Error>(message)
        .map_err(|e| Error::Codec(e.to_string()))?;
    Ok(bytes.to_vec())
}

pub fn decode(bytes: &[u8]) -> Result<Message> {
    let archived = rkyv::access::<ArchivedMessage, rkyv::rancor::Error>(bytes)
        .map_err(|e| Error::Codec(e.to_string()))?;
    rkyv::deserialize::<Message, rkyv::rancor::Error>(archived)
        .map_err(|e| Error::Codec(e.to_string()))
}
