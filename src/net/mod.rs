//! Host-authoritative replication
//!
//! The host owns the world. Peers exchange a small message set: periodic
//! player state, individual block edits, and a one-shot chunk flood that
//! brings a joining client up to date.

pub mod message;
pub mod replication;
pub mod session;

pub use message::{Message, PlayerId, decode, encode};
pub use replication::{RemotePlayer, Replicator};
pub use session::{ChannelSession, LocalSession, Session, channel_pair};
