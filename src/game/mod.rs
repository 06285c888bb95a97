//! Chess rules: board storage, move generation and the game engine.

pub mod board;
pub mod engine;
pub mod moves;
pub mod utils;

pub use board::{Board, Color, Piece, PieceType, Position};
pub use engine::{ChessGame, InvalidMoveError};
pub use moves::ChessMove;
