use std::sync::Arc;

use crate::service::GameService;
use crate::session::{GameLocks, SessionRegistry};
use crate::store::{AuthStore, GameStore, MemoryAuthStore, MemoryGameStore};
use crate::websocket::GameCommandHandler;

/// Application state shared between connections
pub struct AppState {
    pub sessions: Arc<SessionRegistry>,
    pub commands: GameCommandHandler,
    pub service: GameService,
}

impl AppState {
    pub fn new(games: Arc<dyn GameStore>, auth: Arc<dyn AuthStore>) -> Self {
        let sessions = Arc::new(SessionRegistry::new());
        let locks = Arc::new(GameLocks::new());
        Self {
            commands: GameCommandHandler::new(
                Arc::clone(&games),
                Arc::clone(&auth),
                Arc::clone(&sessions),
                Arc::clone(&locks),
            ),
            service: GameService::new(games, auth, Arc::clone(&sessions), locks),
            sessions,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(MemoryGameStore::new()),
            Arc::new(MemoryAuthStore::new()),
        )
    }
}
