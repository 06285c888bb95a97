use serde::{Deserialize, Serialize};

use crate::game::board::{Board, Color, Piece, Position};
use crate::game::moves::{piece_moves, ChessMove};

/// Reasons the engine refuses a move
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidMoveError {
    #[error("no piece at {0}")]
    NoPiece(Position),

    #[error("it is {0}'s turn")]
    WrongTurn(Color),

    #[error("illegal move {0}")]
    Illegal(ChessMove),

    #[error("move {0} leaves the king in check")]
    LeavesKingInCheck(ChessMove),
}

/// Board plus whose turn it is and whether play has ended.
///
/// `game_over` is bookkeeping for callers; `make_move` does not consult it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChessGame {
    board: Board,
    team_turn: Color,
    game_over: bool,
}

impl Default for ChessGame {
    fn default() -> Self {
        Self::new()
    }
}

impl ChessGame {
    pub fn new() -> Self {
        Self {
            board: Board::standard(),
            team_turn: Color::White,
            game_over: false,
        }
    }

    pub fn team_turn(&self) -> Color {
        self.team_turn
    }

    pub fn set_team_turn(&mut self, color: Color) {
        self.team_turn = color;
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn set_board(&mut self, board: Board) {
        self.board = board;
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn set_game_over(&mut self) {
        self.game_over = true;
    }

    /// Legal moves for the piece on `start`, or `None` if the square is empty.
    ///
    /// Each candidate is played on a scratch copy of the board so the live
    /// board is never touched.
    pub fn valid_moves(&self, start: Position) -> Option<Vec<ChessMove>> {
        let piece = self.board.get_piece(start)?;
        let moves = piece_moves(&self.board, start)
            .into_iter()
            .filter(|candidate| {
                let after = apply(&self.board, piece, candidate);
                !king_attacked(&after, piece.color)
            })
            .collect();
        Some(moves)
    }

    /// Play `chess_move` for the side to move and pass the turn.
    ///
    /// Nothing is committed unless every check passes.
    pub fn make_move(&mut self, chess_move: ChessMove) -> Result<(), InvalidMoveError> {
        let start = chess_move.start_position;
        let piece = self
            .board
            .get_piece(start)
            .ok_or(InvalidMoveError::NoPiece(start))?;

        if piece.color != self.team_turn {
            return Err(InvalidMoveError::WrongTurn(self.team_turn));
        }

        let legal = self.valid_moves(start).unwrap_or_default();
        if !legal.contains(&chess_move) {
            return Err(InvalidMoveError::Illegal(chess_move));
        }

        let after = apply(&self.board, piece, &chess_move);
        if king_attacked(&after, piece.color) {
            return Err(InvalidMoveError::LeavesKingInCheck(chess_move));
        }

        self.board = after;
        self.team_turn = self.team_turn.opposite();
        Ok(())
    }

    /// Whether `color`'s king is attacked. A board without that king is
    /// never in check.
    pub fn is_in_check(&self, color: Color) -> bool {
        king_attacked(&self.board, color)
    }

    pub fn is_in_checkmate(&self, color: Color) -> bool {
        self.is_in_check(color) && !self.has_legal_move(color)
    }

    pub fn is_in_stalemate(&self, color: Color) -> bool {
        !self.is_in_check(color) && !self.has_legal_move(color)
    }

    fn has_legal_move(&self, color: Color) -> bool {
        self.board
            .pieces()
            .filter(|(_, piece)| piece.color == color)
            .any(|(pos, _)| self.valid_moves(pos).is_some_and(|moves| !moves.is_empty()))
    }
}

/// Copy of `board` with `chess_move` played by `piece`
fn apply(board: &Board, piece: Piece, chess_move: &ChessMove) -> Board {
    let mut next = *board;
    next.clear_piece(chess_move.start_position);
    let placed = match chess_move.promotion_piece {
        Some(promotion) => Piece::new(piece.color, promotion),
        None => piece,
    };
    next.add_piece(chess_move.end_position, placed);
    next
}

fn king_attacked(board: &Board, color: Color) -> bool {
    let Some(king) = board.find_king(color) else {
        return false;
    };
    board
        .pieces()
        .filter(|(_, piece)| piece.color != color)
        .any(|(pos, _)| {
            piece_moves(board, pos)
                .iter()
                .any(|candidate| candidate.end_position == king)
        })
}
