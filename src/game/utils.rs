use crate::game::board::Color;
use crate::game::engine::ChessGame;

/// Convert a color to its wire representation
pub fn color_to_string(color: Color) -> String {
    match color {
        Color::White => "WHITE".to_string(),
        Color::Black => "BLACK".to_string(),
    }
}

/// Parse a seat color, case-insensitively
pub fn color_from_str(value: &str) -> Option<Color> {
    match value.to_ascii_uppercase().as_str() {
        "WHITE" => Some(Color::White),
        "BLACK" => Some(Color::Black),
        _ => None,
    }
}

/// Get the game status as a string, judged for the side to move
pub fn get_game_status(game: &ChessGame) -> String {
    let side = game.team_turn();
    if game.is_in_checkmate(side) {
        "checkmate".to_string()
    } else if game.is_in_stalemate(side) {
        "stalemate".to_string()
    } else if game.is_game_over() {
        // ended without mate or stalemate, i.e. by resignation
        "game_over".to_string()
    } else if game.is_in_check(side) {
        "check".to_string()
    } else {
        "in_progress".to_string()
    }
}
