use actix::Message;
use serde::{Deserialize, Serialize};

use crate::game::utils::get_game_status;
use crate::game::{ChessGame, ChessMove};
use crate::models::game_state::GameId;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandType {
    Connect,
    MakeMove,
    Leave,
    Resign,
}

/// Command sent from client to server
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ClientMessage {
    pub command_type: CommandType,
    #[serde(default)]
    pub auth_token: String,
    #[serde(rename = "gameID")]
    pub game_id: GameId,
    #[serde(rename = "move", default, skip_serializing_if = "Option::is_none")]
    pub chess_move: Option<ChessMove>,
}

impl ClientMessage {
    pub fn new(command_type: CommandType, auth_token: impl Into<String>, game_id: GameId) -> Self {
        Self {
            command_type,
            auth_token: auth_token.into(),
            game_id,
            chess_move: None,
        }
    }

    pub fn make_move(auth_token: impl Into<String>, game_id: GameId, chess_move: ChessMove) -> Self {
        Self {
            chess_move: Some(chess_move),
            ..Self::new(CommandType::MakeMove, auth_token, game_id)
        }
    }
}

/// Message sent from server to client
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "serverMessageType", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerMessage {
    LoadGame {
        game: ChessGame,
        status: String,
    },
    Notification {
        message: String,
    },
    Error {
        #[serde(rename = "errorMessage")]
        error_message: String,
    },
}

impl ServerMessage {
    pub fn load_game(game: &ChessGame) -> Self {
        ServerMessage::LoadGame {
            game: game.clone(),
            status: get_game_status(game),
        }
    }

    pub fn notification(message: impl Into<String>) -> Self {
        ServerMessage::Notification {
            message: message.into(),
        }
    }

    pub fn error(error_message: impl Into<String>) -> Self {
        ServerMessage::Error {
            error_message: error_message.into(),
        }
    }
}

/// Message type for WebSocket communication
#[derive(Message)]
#[rtype(result = "()")]
pub struct ChessWebSocketMessage(pub String);
