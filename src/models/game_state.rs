use serde::{Deserialize, Serialize};
use std::fmt;

use crate::game::{ChessGame, Color};

/// Store-assigned game identifier
pub type GameId = u32;

/// Persisted state for one game
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    #[serde(rename = "gameID")]
    pub game_id: GameId,
    pub white_username: Option<String>,
    pub black_username: Option<String>,
    pub game_name: String,
    pub game: ChessGame,
}

/// What a connected identity is to a game, derived from the seats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Player(Color),
    Observer,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Player(color) => write!(f, "{}", color),
            Role::Observer => write!(f, "OBSERVER"),
        }
    }
}

impl GameRecord {
    pub fn new(game_id: GameId, game_name: impl Into<String>) -> Self {
        Self {
            game_id,
            white_username: None,
            black_username: None,
            game_name: game_name.into(),
            game: ChessGame::new(),
        }
    }

    pub fn seat(&self, color: Color) -> Option<&str> {
        match color {
            Color::White => self.white_username.as_deref(),
            Color::Black => self.black_username.as_deref(),
        }
    }

    pub fn seat_mut(&mut self, color: Color) -> &mut Option<String> {
        match color {
            Color::White => &mut self.white_username,
            Color::Black => &mut self.black_username,
        }
    }

    /// Role of `username`; white wins if one identity holds both seats
    pub fn role_of(&self, username: &str) -> Role {
        if self.seat(Color::White) == Some(username) {
            Role::Player(Color::White)
        } else if self.seat(Color::Black) == Some(username) {
            Role::Player(Color::Black)
        } else {
            Role::Observer
        }
    }

    pub fn is_player(&self, username: &str) -> bool {
        self.role_of(username) != Role::Observer
    }
}
