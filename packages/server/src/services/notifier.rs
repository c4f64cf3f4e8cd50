use std::collections::HashMap;
use std::sync::RwLock;

use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::models::{event::ServerEvent, player::PlayerId, room::Room};

/// Outbound fan-out to connected players.
///
/// Each live connection registers an unbounded sender under its player id.
/// Bots and players whose socket went away simply have no entry.
#[derive(Default)]
pub struct Notifier {
    peers: RwLock<HashMap<PlayerId, UnboundedSender<ServerEvent>>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, player_id: PlayerId, sender: UnboundedSender<ServerEvent>) {
        if let Ok(mut peers) = self.peers.write() {
            peers.insert(player_id, sender);
        }
    }

    pub fn unregister(&self, player_id: &str) {
        if let Ok(mut peers) = self.peers.write() {
            peers.remove(player_id);
        }
    }

    /// Sends to one player; returns false if nobody is listening.
    pub fn send_to(&self, player_id: &str, event: ServerEvent) -> bool {
        let Ok(peers) = self.peers.read() else {
            return false;
        };
        match peers.get(player_id) {
            Some(sender) => sender.send(event).is_ok(),
            None => {
                debug!(%player_id, "no connection for private event");
                false
            }
        }
    }

    pub fn broadcast(&self, room: &Room, event: ServerEvent) {
        let Ok(peers) = self.peers.read() else {
            return;
        };
        for player in room.players.iter().filter(|p| !p.is_bot) {
            if let Some(sender) = peers.get(&player.id) {
                let _ = sender.send(event.clone());
            }
        }
    }

    pub fn broadcast_room(&self, room: &Room) {
        self.broadcast(room, ServerEvent::snapshot(room));
    }
}
