use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::ServerError;
use crate::models::{GameId, ServerMessage};

/// Outbound side of one client socket
pub trait ClientHandle: Send + Sync {
    /// Identifier of the socket this handle writes to
    fn session_id(&self) -> &str;
    fn is_open(&self) -> bool;
    fn send(&self, message: &ServerMessage) -> Result<(), ServerError>;
}

/// A registered identity in a game
#[derive(Clone)]
pub struct Connection {
    pub username: String,
    pub game_id: GameId,
    pub handle: Arc<dyn ClientHandle>,
}

type ConnectionKey = (GameId, String);

/// Live connections, keyed by game and identity.
///
/// Every method takes the map lock only briefly; messages are sent after it
/// is released.
#[derive(Default)]
pub struct SessionRegistry {
    connections: Mutex<HashMap<ConnectionKey, Connection>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `username` in `game_id`, replacing any earlier handle
    pub fn add(&self, username: &str, game_id: GameId, handle: Arc<dyn ClientHandle>) {
        let connection = Connection {
            username: username.to_string(),
            game_id,
            handle,
        };
        let mut connections = self.connections.lock().unwrap_or_else(PoisonError::into_inner);
        if connections
            .insert((game_id, username.to_string()), connection)
            .is_some()
        {
            debug!("Replaced connection for {} in game {}", username, game_id);
        }
    }

    pub fn remove(&self, game_id: GameId, username: &str) -> bool {
        let mut connections = self.connections.lock().unwrap_or_else(PoisonError::into_inner);
        connections.remove(&(game_id, username.to_string())).is_some()
    }

    /// Forget every registration made through socket `session_id`
    pub fn drop_session(&self, session_id: &str) -> usize {
        let mut connections = self.connections.lock().unwrap_or_else(PoisonError::into_inner);
        let before = connections.len();
        connections.retain(|_, conn| conn.handle.session_id() != session_id);
        before - connections.len()
    }

    /// Send `message` to every open connection in `game_id` except `exclude`.
    ///
    /// Closed connections and failed sends are pruned; the rest still get the
    /// message. Returns how many connections received it.
    pub fn broadcast(&self, game_id: GameId, exclude: Option<&str>, message: &ServerMessage) -> usize {
        let targets: Vec<Connection> = {
            let connections = self.connections.lock().unwrap_or_else(PoisonError::into_inner);
            connections
                .values()
                .filter(|conn| conn.game_id == game_id)
                .filter(|conn| Some(conn.username.as_str()) != exclude)
                .cloned()
                .collect()
        };

        let mut delivered = 0;
        let mut dead = Vec::new();
        for conn in targets {
            if !conn.handle.is_open() {
                dead.push(conn);
                continue;
            }
            match conn.handle.send(message) {
                Ok(()) => delivered += 1,
                Err(e) => {
                    warn!("Send to {} in game {} failed: {}", conn.username, game_id, e);
                    dead.push(conn);
                }
            }
        }

        if !dead.is_empty() {
            self.prune(&dead);
        }
        debug!("Broadcast to game {} reached {} connections", game_id, delivered);
        delivered
    }

    /// Drop every closed connection across all games
    pub fn sweep(&self) -> usize {
        let mut connections = self.connections.lock().unwrap_or_else(PoisonError::into_inner);
        let before = connections.len();
        connections.retain(|_, conn| conn.handle.is_open());
        let pruned = before - connections.len();
        if pruned > 0 {
            info!("Swept {} closed connections", pruned);
        }
        pruned
    }

    pub fn clear(&self) {
        self.connections
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn is_registered(&self, game_id: GameId, username: &str) -> bool {
        let connections = self.connections.lock().unwrap_or_else(PoisonError::into_inner);
        connections.contains_key(&(game_id, username.to_string()))
    }

    pub fn connection_count(&self, game_id: GameId) -> usize {
        let connections = self.connections.lock().unwrap_or_else(PoisonError::into_inner);
        connections.values().filter(|conn| conn.game_id == game_id).count()
    }

    /// Games with at least one registered connection
    pub fn active_games(&self) -> Vec<GameId> {
        let connections = self.connections.lock().unwrap_or_else(PoisonError::into_inner);
        let mut games: Vec<GameId> = connections.keys().map(|(game_id, _)| *game_id).collect();
        games.sort_unstable();
        games.dedup();
        games
    }

    /// Remove `dead` entries, skipping any that were re-registered by another
    /// socket since the snapshot was taken
    fn prune(&self, dead: &[Connection]) {
        let mut connections = self.connections.lock().unwrap_or_else(PoisonError::into_inner);
        for conn in dead {
            let key = (conn.game_id, conn.username.clone());
            let same_session = connections
                .get(&key)
                .is_some_and(|current| current.handle.session_id() == conn.handle.session_id());
            if same_session {
                info!("Pruned closed connection {} from game {}", conn.username, conn.game_id);
                connections.remove(&key);
            }
        }
    }
}
