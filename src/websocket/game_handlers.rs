use log::{info, warn};
use std::sync::Arc;

use crate::error::ServerError;
use crate::game::utils::color_to_string;
use crate::game::Color;
use crate::models::{ClientMessage, CommandType, GameRecord, ServerMessage};
use crate::session::locks::acquire;
use crate::session::{ClientHandle, GameLocks, SessionRegistry};
use crate::store::{AuthStore, GameStore};

/// Applies client commands to game records and fans the results out.
///
/// Every command runs under its game's lock, from the first read of the
/// record to the last broadcast.
pub struct GameCommandHandler {
    games: Arc<dyn GameStore>,
    auth: Arc<dyn AuthStore>,
    sessions: Arc<SessionRegistry>,
    locks: Arc<GameLocks>,
}

impl GameCommandHandler {
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

    /// Run one command. Failures go back to `origin` only.
    pub fn handle_message(&self, origin: &Arc<dyn ClientHandle>, msg: ClientMessage) {
        info!("Processing {:?} for game {}", msg.command_type, msg.game_id);

        // Only known games get a lock entry; the command re-reads under it.
        let result = self
            .resolve(&msg)
            .and_then(|_| self.dispatch(origin, &msg));

        if let Err(e) = result {
            warn!("{:?} for game {} rejected: {}", msg.command_type, msg.game_id, e);
            self.send_error(origin, &e);
        }
    }

    fn dispatch(&self, origin: &Arc<dyn ClientHandle>, msg: &ClientMessage) -> Result<(), ServerError> {
        let lock = self.locks.get(msg.game_id);
        let _guard = acquire(&lock);

        match msg.command_type {
            CommandType::Connect => self.handle_connect(origin, msg),
            CommandType::MakeMove => self.handle_move(msg),
            CommandType::Leave => self.handle_leave(msg),
            CommandType::Resign => self.handle_resign(msg),
        }
    }

    pub fn send_error(&self, origin: &Arc<dyn ClientHandle>, err: &ServerError) {
        if let Err(e) = origin.send(&ServerMessage::error(err.client_message())) {
            warn!("Failed to deliver error to {}: {}", origin.session_id(), e);
        }
    }

    fn resolve(&self, msg: &ClientMessage) -> Result<(String, GameRecord), ServerError> {
        let username = self
            .auth
            .resolve_identity(&msg.auth_token)
            .ok_or(ServerError::Authentication)?;
        let record = self
            .games
            .get_game(msg.game_id)?
            .ok_or(ServerError::NotFound)?;
        Ok((username, record))
    }

    fn handle_connect(&self, origin: &Arc<dyn ClientHandle>, msg: &ClientMessage) -> Result<(), ServerError> {
        let (username, record) = self.resolve(msg)?;
        let role = record.role_of(&username);
        info!("{} joining game {} as {}", username, record.game_id, role);

        self.sessions.add(&username, record.game_id, Arc::clone(origin));
        origin.send(&ServerMessage::load_game(&record.game))?;

        let notification =
            ServerMessage::notification(format!("{} has joined the game as {}", username, role));
        self.sessions.broadcast(record.game_id, Some(&username), &notification);
        Ok(())
    }

    fn handle_move(&self, msg: &ClientMessage) -> Result<(), ServerError> {
        let (username, mut record) = self.resolve(msg)?;
        let chess_move = msg
            .chess_move
            .ok_or_else(|| ServerError::BadRequest("move is required".to_string()))?;

        if record.game.is_game_over() {
            return Err(ServerError::IllegalMove("game is already over".to_string()));
        }

        let turn = record.game.team_turn();
        if record.seat(turn) != Some(username.as_str()) {
            return Err(ServerError::IllegalMove("it is not your turn".to_string()));
        }

        let mover = record.game.board().get_piece(chess_move.start_position);
        if mover.map(|piece| piece.color) != Some(turn) {
            return Err(ServerError::IllegalMove("invalid move".to_string()));
        }

        let legal = record
            .game
            .valid_moves(chess_move.start_position)
            .unwrap_or_default();
        if !legal.contains(&chess_move) {
            return Err(ServerError::IllegalMove("invalid move".to_string()));
        }

        record.game.make_move(chess_move)?;
        info!("{} played {} in game {}", username, chess_move, record.game_id);

        let next = record.game.team_turn();
        let opponent = opponent_name(&record, next);
        let text = if record.game.is_in_checkmate(next) {
            record.game.set_game_over();
            format!("{} is checkmated! {} wins!", opponent, username)
        } else if record.game.is_in_stalemate(next) {
            record.game.set_game_over();
            format!("Stalemate caused by {}'s move! It's a tie!", username)
        } else if record.game.is_in_check(next) {
            format!(
                "{} moved {} to {}, {} is now in check!",
                username, chess_move.start_position, chess_move.end_position, opponent
            )
        } else {
            format!(
                "{} moved {} to {}",
                username, chess_move.start_position, chess_move.end_position
            )
        };

        self.games.update_game(&record)?;

        self.sessions
            .broadcast(record.game_id, None, &ServerMessage::notification(text));
        self.sessions
            .broadcast(record.game_id, None, &ServerMessage::load_game(&record.game));
        Ok(())
    }

    fn handle_leave(&self, msg: &ClientMessage) -> Result<(), ServerError> {
        let (username, mut record) = self.resolve(msg)?;

        let mut vacated = false;
        for color in [Color::White, Color::Black] {
            if record.seat(color) == Some(username.as_str()) {
                *record.seat_mut(color) = None;
                vacated = true;
            }
        }
        if vacated {
            self.games.update_game(&record)?;
        }

        self.sessions.remove(record.game_id, &username);
        info!("{} left game {}", username, record.game_id);

        let notification = ServerMessage::notification(format!("{} has left the game.", username));
        self.sessions
            .broadcast(record.game_id, Some(&username), &notification);
        Ok(())
    }

    fn handle_resign(&self, msg: &ClientMessage) -> Result<(), ServerError> {
        let (username, mut record) = self.resolve(msg)?;

        if !record.is_player(&username) {
            return Err(ServerError::Authorization(
                "cannot resign as observer".to_string(),
            ));
        }
        if record.game.is_game_over() {
            return Err(ServerError::IllegalMove("game is already over".to_string()));
        }

        record.game.set_game_over();
        self.games.update_game(&record)?;
        info!("{} resigned game {}", username, record.game_id);

        let notification = ServerMessage::notification(format!("{} resigned.", username));
        self.sessions.broadcast(record.game_id, None, &notification);
        Ok(())
    }
}

/// Seated identity for `color`, or the color itself if the seat is empty
fn opponent_name(record: &GameRecord, color: Color) -> String {
    record
        .seat(color)
        .map(str::to_string)
        .unwrap_or_else(|| color_to_string(color))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryAuthStore, MemoryGameStore};
    use crate::testing::RecordingHandle;

    #[test]
    fn rejected_commands_leave_no_lock_behind() {
        let games = Arc::new(MemoryGameStore::new());
        let auth = Arc::new(MemoryAuthStore::new());
        let locks = Arc::new(GameLocks::new());
        let handler = GameCommandHandler::new(
            games.clone(),
            auth.clone(),
            Arc::new(SessionRegistry::new()),
            Arc::clone(&locks),
        );
        let handle = RecordingHandle::new();
        let origin: Arc<dyn ClientHandle> = handle.clone();

        let token = auth.create_auth("mallory");
        for game_id in 0..500 {
            handler.handle_message(&origin, ClientMessage::new(CommandType::Connect, "forged", game_id));
            handler.handle_message(&origin, ClientMessage::new(CommandType::Resign, &token, game_id));
        }
        assert_eq!(handle.take().len(), 1000);
        assert!(locks.is_empty());

        let game_id = games.create_game("real").unwrap();
        handler.handle_message(&origin, ClientMessage::new(CommandType::Connect, &token, game_id));
        assert_eq!(locks.len(), 1);
    }
}
