//! Session transports
//!
//! A session is the replication layer's view of the link: it delivers
//! encoded messages to the other side and surfaces whatever has arrived.
//! `LocalSession` backs single-player, `ChannelSession` carries an
//! in-process host/client pair over channels.

use std::sync::mpsc::{Receiver, Sender, TryRecvError, channel};

use crate::core::error::Error;
use crate::core::types::Result;
use crate::net::message::{Message, PlayerId, decode, encode};

/// Transport seam between the replication layer and the wire
pub trait Session {
    /// Send a message to every other peer
    fn send(&mut self, message: &Message) -> Result<()>;

    /// Next inbound message and its sender, if one is waiting
    fn try_recv(&mut self) -> Option<(PlayerId, Message)>;

    fn is_host(&self) -> bool;

    fn local_player_id(&self) -> PlayerId;
}

/// Single-player session: the local player is the host and there is no
/// one to talk to
pub struct LocalSession;

impl Session for LocalSession {
    fn send(&mut self, _message: &Message) -> Result<()> {
        Ok(())
    }

    fn try_recv(&mut self) -> Option<(PlayerId, Message)> {
        None
    }

    fn is_host(&self) -> bool {
        true
    }

    fn local_player_id(&self) -> PlayerId {
        0
    }
}

/// One end of an in-process peer link. Messages are encoded on send so
/// the full wire codec is exercised even without a socket.
pub struct ChannelSession {
    local_id: PlayerId,
    host: bool,
    tx: Sender<(PlayerId, Vec<u8>)>,
    rx: Receiver<(PlayerId, Vec<u8>)>,
}

/// Build a connected host/client session pair
pub fn channel_pair(host_id: PlayerId, client_id: PlayerId) -> (ChannelSession, ChannelSession) {
    let (host_tx, client_rx) = channel();
    let (client_tx, host_rx) = channel();
    (
        ChannelSession {
            local_id: host_id,
            host: true,
            tx: host_tx,
            rx: host_rx,
        },
        ChannelSession {
            local_id: client_id,
            host: false,
            tx: client_tx,
            rx: client_rx,
        },
    )
}

impl Session for ChannelSession {
    fn send(&mut self, message: &Message) -> Result<()> {
        let bytes = encode(message)?;
        self.tx
            .send((self.local_id, bytes))
            .map_err(|_| Error::Net("peer disconnected".to_string()))
    }

    fn try_recv(&mut self) -> Option<(PlayerId, Message)> {
        loop {
            match self.rx.try_recv() {
                Ok((from, bytes)) => match decode(&bytes) {
                    Ok(message) => return Some((from, message)),
                    Err(e) => {
                        // Drop undecodable frames rather than wedging the link
                        log::warn!("dropping undecodable message from {}: {}", from, e);
                    }
                },
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return None,
            }
        }
    }

    fn is_host(&self) -> bool {
        self.host
    }

    fn local_player_id(&self) -> PlayerId {
        self.local_id
    }
}
