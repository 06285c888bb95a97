use serde::{Deserialize, Serialize};
use std::fmt;

use crate::game::board::{Board, Color, Piece, PieceType, Position, PROMOTION_TYPES};

/// A move from one square to another, with the promotion choice for a pawn
/// landing on the far rank
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct ChessMove {
    pub start_position: Position,
    pub end_position: Position,
    #[serde(default)]
    pub promotion_piece: Option<PieceType>,
}

impl ChessMove {
    pub fn new(start: Position, end: Position, promotion: Option<PieceType>) -> Self {
        Self {
            start_position: start,
            end_position: end,
            promotion_piece: promotion,
        }
    }
}

impl fmt::Display for ChessMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.start_position, self.end_position)?;
        if let Some(promotion) = self.promotion_piece {
            write!(f, "={:?}", promotion)?;
        }
        Ok(())
    }
}

const DIAGONALS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const STRAIGHTS: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
const ALL_DIRECTIONS: [(i8, i8); 8] = [
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
    (0, 1),
    (0, -1),
    (1, 0),
    (-1, 0),
];
const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
];

/// Pseudo-legal moves for the piece standing on `from`.
///
/// Respects board edges and occupancy but not whether the mover's own king
/// ends up attacked. An empty square yields no moves.
pub fn piece_moves(board: &Board, from: Position) -> Vec<ChessMove> {
    let Some(piece) = board.get_piece(from) else {
        return Vec::new();
    };

    match piece.piece_type {
        PieceType::Bishop => slide(board, from, piece.color, &DIAGONALS, true),
        PieceType::Rook => slide(board, from, piece.color, &STRAIGHTS, true),
        PieceType::Queen => slide(board, from, piece.color, &ALL_DIRECTIONS, true),
        PieceType::King => slide(board, from, piece.color, &ALL_DIRECTIONS, false),
        PieceType::Knight => knight_moves(board, from, piece.color),
        PieceType::Pawn => pawn_moves(board, from, piece.color),
    }
}

/// Walk each direction until the edge, an own piece (excluded) or an enemy
/// piece (included). `repeat == false` limits every walk to one step.
fn slide(
    board: &Board,
    from: Position,
    color: Color,
    directions: &[(i8, i8)],
    repeat: bool,
) -> Vec<ChessMove> {
    let mut moves = Vec::new();
    for &(d_row, d_col) in directions {
        let mut current = from;
        while let Some(next) = current.offset(d_row, d_col) {
            match board.get_piece(next) {
                Some(Piece { color: other, .. }) if other == color => break,
                Some(_) => {
                    moves.push(ChessMove::new(from, next, None));
                    break;
                }
                None => moves.push(ChessMove::new(from, next, None)),
            }
            if !repeat {
                break;
            }
            current = next;
        }
    }
    moves
}

fn knight_moves(board: &Board, from: Position, color: Color) -> Vec<ChessMove> {
    KNIGHT_OFFSETS
        .iter()
        .filter_map(|&(d_row, d_col)| from.offset(d_row, d_col))
        .filter(|target| {
            board
                .get_piece(*target)
                .map_or(true, |occupant| occupant.color != color)
        })
        .map(|target| ChessMove::new(from, target, None))
        .collect()
}

fn pawn_moves(board: &Board, from: Position, color: Color) -> Vec<ChessMove> {
    let mut moves = Vec::new();
    let forward = color.forward();

    if let Some(one) = from.offset(forward, 0) {
        if board.get_piece(one).is_none() {
            push_pawn_move(&mut moves, from, one, color);

            if from.row == color.pawn_rank() {
                if let Some(two) = one.offset(forward, 0) {
                    if board.get_piece(two).is_none() {
                        push_pawn_move(&mut moves, from, two, color);
                    }
                }
            }
        }
    }

    for d_col in [-1, 1] {
        if let Some(target) = from.offset(forward, d_col) {
            if let Some(occupant) = board.get_piece(target) {
                if occupant.color != color {
                    push_pawn_move(&mut moves, from, target, color);
                }
            }
        }
    }

    moves
}

/// A pawn landing on the far rank fans out into one move per promotion type
fn push_pawn_move(moves: &mut Vec<ChessMove>, from: Position, to: Position, color: Color) {
    if to.row == color.promotion_rank() {
        moves.extend(
            PROMOTION_TYPES
                .iter()
                .map(|promotion| ChessMove::new(from, to, Some(*promotion))),
        );
    } else {
        moves.push(ChessMove::new(from, to, None));
    }
}
