use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use crate::error::ServerError;
use crate::models::{GameId, GameRecord};

/// Persistence for game records
pub trait GameStore: Send + Sync {
    /// Create a fresh game and return its id
    fn create_game(&self, game_name: &str) -> Result<GameId, ServerError>;
    fn get_game(&self, game_id: GameId) -> Result<Option<GameRecord>, ServerError>;
    /// Games ordered by id
    fn list_games(&self) -> Result<Vec<GameRecord>, ServerError>;
    /// Overwrite an existing record
    fn update_game(&self, record: &GameRecord) -> Result<(), ServerError>;
    fn clear(&self) -> Result<(), ServerError>;
}

struct GameTable {
    games: BTreeMap<GameId, GameRecord>,
    next_id: GameId,
}

/// Game records held in process memory
pub struct MemoryGameStore {
    table: Mutex<GameTable>,
}

impl Default for MemoryGameStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryGameStore {
    pub fn new() -> Self {
        Self {
            table: Mutex::new(GameTable {
                games: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }
}

impl GameStore for MemoryGameStore {
    fn create_game(&self, game_name: &str) -> Result<GameId, ServerError> {
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        let game_id = table.next_id;
        table.next_id += 1;
        table.games.insert(game_id, GameRecord::new(game_id, game_name));
        Ok(game_id)
    }

    fn get_game(&self, game_id: GameId) -> Result<Option<GameRecord>, ServerError> {
        let table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(table.games.get(&game_id).cloned())
    }

    fn list_games(&self) -> Result<Vec<GameRecord>, ServerError> {
        let table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(table.games.values().cloned().collect())
    }

    fn update_game(&self, record: &GameRecord) -> Result<(), ServerError> {
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        match table.games.get_mut(&record.game_id) {
            Some(existing) => {
                *existing = record.clone();
                Ok(())
            }
            None => Err(ServerError::Storage(format!(
                "game {} does not exist",
                record.game_id
            ))),
        }
    }

    fn clear(&self) -> Result<(), ServerError> {
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        table.games.clear();
        table.next_id = 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_start_at_one_and_increase() {
        let store = MemoryGameStore::new();
        assert_eq!(store.create_game("a").unwrap(), 1);
        assert_eq!(store.create_game("b").unwrap(), 2);

        let names: Vec<_> = store
            .list_games()
            .unwrap()
            .into_iter()
            .map(|g| g.game_name)
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn update_replaces_record() {
        let store = MemoryGameStore::new();
        let id = store.create_game("a").unwrap();
        let mut record = store.get_game(id).unwrap().unwrap();
        record.white_username = Some("alice".into());
        store.update_game(&record).unwrap();
        assert_eq!(store.get_game(id).unwrap().unwrap(), record);
    }

    #[test]
    fn update_of_unknown_game_fails() {
        let store = MemoryGameStore::new();
        let record = GameRecord::new(42, "ghost");
        assert!(matches!(
            store.update_game(&record),
            Err(ServerError::Storage(_))
        ));
    }

    #[test]
    fn clear_resets_ids() {
        let store = MemoryGameStore::new();
        store.create_game("a").unwrap();
        store.clear().unwrap();
        assert!(store.get_game(1).unwrap().is_none());
        assert_eq!(store.create_game("b").unwrap(), 1);
    }
}
