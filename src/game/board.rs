use serde::{Deserialize, Serialize};
use std::fmt;

/// Side of the board
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Rank a pawn of this color starts on
    pub fn pawn_rank(self) -> u8 {
        match self {
            Color::White => 2,
            Color::Black => 7,
        }
    }

    /// Rank a pawn of this color promotes on
    pub fn promotion_rank(self) -> u8 {
        match self {
            Color::White => 8,
            Color::Black => 1,
        }
    }

    /// Row direction pawns of this color advance in
    pub fn forward(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "WHITE"),
            Color::Black => write!(f, "BLACK"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum PieceType {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

/// Promotion choices offered when a pawn reaches the far rank
pub const PROMOTION_TYPES: [PieceType; 4] = [
    PieceType::Queen,
    PieceType::Rook,
    PieceType::Bishop,
    PieceType::Knight,
];

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Piece {
    pub color: Color,
    pub piece_type: PieceType,
}

impl Piece {
    pub const fn new(color: Color, piece_type: PieceType) -> Self {
        Self { color, piece_type }
    }
}

/// A square on the board, row and column both counted from 1
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    /// Build a position, returning `None` when it falls off the board
    pub fn new(row: u8, col: u8) -> Option<Self> {
        if (1..=8).contains(&row) && (1..=8).contains(&col) {
            Some(Self { row, col })
        } else {
            None
        }
    }

    /// Step by a signed offset, returning `None` when it leaves the board
    pub fn offset(self, d_row: i8, d_col: i8) -> Option<Self> {
        let row = self.row as i8 + d_row;
        let col = self.col as i8 + d_col;
        if row < 1 || col < 1 {
            return None;
        }
        Self::new(row as u8, col as u8)
    }

    pub fn is_valid(self) -> bool {
        (1..=8).contains(&self.row) && (1..=8).contains(&self.col)
    }

    fn index(self) -> (usize, usize) {
        (self.row as usize - 1, self.col as usize - 1)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = (b'a' + self.col.saturating_sub(1)) as char;
        write!(f, "{}{}", file, self.row)
    }
}

const BACK_RANK: [PieceType; 8] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
];

/// 8x8 piece storage with no knowledge of the rules.
///
/// `squares[0]` is rank 1 and `squares[r][0]` is the a-file. The board is
/// `Copy` so the engine can test candidate moves on a scratch copy.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
}

impl Board {
    /// An empty board
    pub fn new() -> Self {
        Self::default()
    }

    /// A board in the standard opening layout
    pub fn standard() -> Self {
        let mut board = Self::new();
        board.reset();
        board
    }

    /// Piece on a square. Off-board positions are always empty.
    pub fn get_piece(&self, pos: Position) -> Option<Piece> {
        if !pos.is_valid() {
            return None;
        }
        let (r, c) = pos.index();
        self.squares[r][c]
    }

    /// Put a piece on a square, replacing whatever was there
    pub fn add_piece(&mut self, pos: Position, piece: Piece) {
        if pos.is_valid() {
            let (r, c) = pos.index();
            self.squares[r][c] = Some(piece);
        }
    }

    pub fn clear_piece(&mut self, pos: Position) {
        if pos.is_valid() {
            let (r, c) = pos.index();
            self.squares[r][c] = None;
        }
    }

    pub fn reset(&mut self) {
        self.squares = [[None; 8]; 8];
        for (i, piece_type) in BACK_RANK.iter().enumerate() {
            self.squares[0][i] = Some(Piece::new(Color::White, *piece_type));
            self.squares[1][i] = Some(Piece::new(Color::White, PieceType::Pawn));
            self.squares[6][i] = Some(Piece::new(Color::Black, PieceType::Pawn));
            self.squares[7][i] = Some(Piece::new(Color::Black, *piece_type));
        }
    }

    /// All occupied squares, rank 1 first
    pub fn pieces(&self) -> impl Iterator<Item = (Position, Piece)> + '_ {
        self.squares.iter().enumerate().flat_map(|(r, rank)| {
            rank.iter().enumerate().filter_map(move |(c, square)| {
                square.map(|piece| {
                    (
                        Position {
                            row: r as u8 + 1,
                            col: c as u8 + 1,
                        },
                        piece,
                    )
                })
            })
        })
    }

    /// Square holding the king of `color`, if it is on the board
    pub fn find_king(&self, color: Color) -> Option<Position> {
        self.pieces()
            .find(|(_, piece)| piece.color == color && piece.piece_type == PieceType::King)
            .map(|(pos, _)| pos)
    }
}
