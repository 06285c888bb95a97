use log::info;
use std::sync::Arc;

use crate::error::ServerError;
use crate::game::utils::{color_from_str, color_to_string};
use crate::models::{GameId, GameRecord};
use crate::session::locks::acquire;
use crate::session::{GameLocks, SessionRegistry};
use crate::store::{AuthStore, GameStore};

/// Lobby operations: sessions, game creation and seat claims
pub struct GameService {
    games: Arc<dyn GameStore>,
    auth: Arc<dyn AuthStore>,
    sessions: Arc<SessionRegistry>,
    locks: Arc<GameLocks>,
}

impl GameService {
    pub fn new(
        games: Arc<dyn GameStore>,
        auth: Arc<dyn AuthStore>,
        sessions: Arc<SessionRegistry>,
        locks: Arc<GameLocks>,
    ) -> Self {
        Self {
            games,
            auth,
            sessions,
            locks,
        }
    }

    /// Issue a token for `username`
    pub fn login(&self, username: &str) -> Result<String, ServerError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ServerError::BadRequest("username is required".to_string()));
        }
        info!("Issuing token for {}", username);
        Ok(self.auth.create_auth(username))
    }

    pub fn logout(&self, auth_token: &str) -> Result<(), ServerError> {
        if self.auth.delete_auth(auth_token) {
            Ok(())
        } else {
            Err(ServerError::Authentication)
        }
    }

    pub fn list_games(&self, auth_token: &str) -> Result<Vec<GameRecord>, ServerError> {
        self.authenticate(auth_token)?;
        self.games.list_games()
    }

    pub fn create_game(&self, auth_token: &str, game_name: &str) -> Result<GameId, ServerError> {
        self.authenticate(auth_token)?;
        if game_name.trim().is_empty() {
            return Err(ServerError::BadRequest("gameName is required".to_string()));
        }
        let game_id = self.games.create_game(game_name)?;
        info!("Created game {} ({})", game_id, game_name);
        Ok(game_id)
    }

    /// Claim the empty `player_color` seat of `game_id`
    pub fn join_game(&self, auth_token: &str, game_id: GameId, player_color: &str) -> Result<(), ServerError> {
        let username = self.authenticate(auth_token)?;
        let color = color_from_str(player_color)
            .ok_or_else(|| ServerError::BadRequest(format!("invalid color {}", player_color)))?;

        if self.games.get_game(game_id)?.is_none() {
            return Err(ServerError::NotFound);
        }
        let lock = self.locks.get(game_id);
        let _guard = acquire(&lock);

        let mut record = self.games.get_game(game_id)?.ok_or(ServerError::NotFound)?;
        let seat = record.seat_mut(color);
        if seat.is_some() {
            return Err(ServerError::AlreadyTaken(color_to_string(color)));
        }
        *seat = Some(username.clone());
        self.games.update_game(&record)?;
        info!("{} took the {} seat in game {}", username, color_to_string(color), game_id);
        Ok(())
    }

    /// Wipe every game, token and live registration
    pub fn clear(&self) -> Result<(), ServerError> {
        self.games.clear()?;
        self.auth.clear();
        self.sessions.clear();
        info!("Cleared all data");
        Ok(())
    }

    fn authenticate(&self, auth_token: &str) -> Result<String, ServerError> {
        self.auth
            .resolve_identity(auth_token)
            .ok_or(ServerError::Authentication)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryAuthStore, MemoryGameStore};

    fn service() -> GameService {
        service_with_locks(Arc::new(GameLocks::new()))
    }

    fn service_with_locks(locks: Arc<GameLocks>) -> GameService {
        GameService::new(
            Arc::new(MemoryGameStore::new()),
            Arc::new(MemoryAuthStore::new()),
            Arc::new(SessionRegistry::new()),
            locks,
        )
    }

    #[test]
    fn lobby_requires_a_token() {
        let service = service();
        assert!(matches!(
            service.create_game("nope", "g"),
            Err(ServerError::Authentication)
        ));
        assert!(matches!(service.list_games("nope"), Err(ServerError::Authentication)));
        assert!(matches!(service.logout("nope"), Err(ServerError::Authentication)));
    }

    #[test]
    fn seats_can_be_claimed_once() {
        let service = service();
        let alice = service.login("alice").unwrap();
        let bob = service.login("bob").unwrap();
        let id = service.create_game(&alice, "friendly").unwrap();

        service.join_game(&alice, id, "white").unwrap();
        assert!(matches!(
            service.join_game(&bob, id, "WHITE"),
            Err(ServerError::AlreadyTaken(_))
        ));
        service.join_game(&bob, id, "BLACK").unwrap();

        let games = service.list_games(&bob).unwrap();
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].white_username.as_deref(), Some("alice"));
        assert_eq!(games[0].black_username.as_deref(), Some("bob"));
    }

    #[test]
    fn bad_join_requests() {
        let service = service();
        let alice = service.login("alice").unwrap();
        let id = service.create_game(&alice, "g").unwrap();
        assert!(matches!(
            service.join_game(&alice, id, "purple"),
            Err(ServerError::BadRequest(_))
        ));
        assert!(matches!(
            service.join_game(&alice, id + 1, "white"),
            Err(ServerError::NotFound)
        ));
        assert!(matches!(service.create_game(&alice, "  "), Err(ServerError::BadRequest(_))));
        assert!(matches!(service.login(""), Err(ServerError::BadRequest(_))));
    }

    #[test]
    fn clear_wipes_games_and_tokens() {
        let service = service();
        let alice = service.login("alice").unwrap();
        service.create_game(&alice, "g").unwrap();
        service.clear().unwrap();
        assert!(matches!(service.list_games(&alice), Err(ServerError::Authentication)));
        let again = service.login("alice").unwrap();
        assert!(service.list_games(&again).unwrap().is_empty());
    }

    #[test]
    fn clear_keeps_held_game_locks_exclusive() {
        let locks = Arc::new(GameLocks::new());
        let service = service_with_locks(Arc::clone(&locks));
        let alice = service.login("alice").unwrap();
        let game_id = service.create_game(&alice, "g").unwrap();

        let held = locks.get(game_id);
        let _guard = acquire(&held);
        service.clear().unwrap();

        assert!(locks.get(game_id).try_lock().is_err());
    }

    #[test]
    fn joining_unknown_games_creates_no_lock() {
        let locks = Arc::new(GameLocks::new());
        let service = service_with_locks(Arc::clone(&locks));
        let alice = service.login("alice").unwrap();
        for game_id in 1..50 {
            assert!(matches!(
                service.join_game(&alice, game_id, "white"),
                Err(ServerError::NotFound)
            ));
        }
        assert!(locks.is_empty());
    }
}
