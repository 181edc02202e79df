//! Type definitions for chess game logic
//!
//! Provides newtype coordinates and tagged piece types shared by the rules
//! adapter, the notation extractor and the game session. Every board read goes
//! through these types; nothing in the crate hands out untyped piece data.

use crate::game::error::GameError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Board coordinate representing a file (column) on the chessboard
///
/// Values range from 0 (file 'a') to 7 (file 'h').
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct File(u8);

impl File {
    /// Create a file from its index, rejecting anything outside 0-7
    pub fn new(index: u8) -> Option<Self> {
        (index < 8).then_some(File(index))
    }

    /// Create a file from a character ('a'..='h', case-insensitive)
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let file = File::from_char('e').unwrap(); // File 4
    /// ```
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            c @ 'a'..='h' => Some(File(c as u8 - b'a')),
            _ => None,
        }
    }

    /// Convert file to character ('a'..='h')
    pub fn to_char(self) -> char {
        (b'a' + self.0) as char
    }

    /// Get the file index (0-7)
    pub fn index(self) -> u8 {
        self.0
    }
}

/// Board coordinate representing a rank (row) on the chessboard
///
/// Values range from 0 (rank 1) to 7 (rank 8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rank(u8);

impl Rank {
    /// Create a rank from its index, rejecting anything outside 0-7
    pub fn new(index: u8) -> Option<Self> {
        (index < 8).then_some(Rank(index))
    }

    /// Create a rank from a number (1-8)
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let rank = Rank::from_number(4).unwrap(); // Rank 3 (0-indexed)
    /// ```
    pub fn from_number(n: u8) -> Option<Self> {
        if (1..=8).contains(&n) {
            Some(Rank(n - 1))
        } else {
            None
        }
    }

    /// Create a rank from a digit character ('1'..='8')
    pub fn from_char(c: char) -> Option<Self> {
        Rank::from_number(c.to_digit(10)? as u8)
    }

    /// Convert rank to number (1-8)
    pub fn to_number(self) -> u8 {
        self.0 + 1
    }

    /// Get the rank index (0-7)
    pub fn index(self) -> u8 {
        self.0
    }
}

/// Board square position (file, rank)
///
/// The only way to obtain a `Square` is through a bounds-checked constructor,
/// so every value in circulation is on the 8x8 board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    pub file: File,
    pub rank: Rank,
}

impl Square {
    /// Create a square from file and rank indices (0-7 each)
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let square = Square::new(4, 3).unwrap(); // e4
    /// ```
    pub fn new(file: u8, rank: u8) -> Option<Self> {
        Some(Square {
            file: File::new(file)?,
            rank: Rank::new(rank)?,
        })
    }

    /// Create a square from algebraic notation (e.g., "e4")
    ///
    /// Exactly two characters are accepted; anything else is `None`.
    pub fn from_algebraic(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        let file = File::from_char(chars.next()?)?;
        let rank = Rank::from_char(chars.next()?)?;
        if chars.next().is_some() {
            return None;
        }
        Some(Square { file, rank })
    }

    /// Convert square to algebraic notation (e.g., "e4")
    pub fn to_algebraic(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file.to_char(), self.rank.to_number())
    }
}

impl FromStr for Square {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Square::from_algebraic(s.trim()).ok_or_else(|| GameError::InvalidSquare {
            input: s.to_string(),
        })
    }
}

/// Chess piece kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceType {
    King,
    Queen,
    Bishop,
    Knight,
    Rook,
    Pawn,
}

impl PieceType {
    /// Lowercase letter used for promotions in coordinate form (`e7e8q`)
    pub fn to_char(self) -> char {
        match self {
            PieceType::King => 'k',
            PieceType::Queen => 'q',
            PieceType::Bishop => 'b',
            PieceType::Knight => 'n',
            PieceType::Rook => 'r',
            PieceType::Pawn => 'p',
        }
    }

    /// Parse a promotion letter; kings and pawns are not promotion targets
    pub fn from_promotion_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'q' => Some(PieceType::Queen),
            'r' => Some(PieceType::Rook),
            'b' => Some(PieceType::Bishop),
            'n' => Some(PieceType::Knight),
            _ => None,
        }
    }
}

/// Side colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PieceColor {
    #[default]
    White,
    Black,
}

impl PieceColor {
    pub fn opposite(self) -> Self {
        match self {
            PieceColor::White => PieceColor::Black,
            PieceColor::Black => PieceColor::White,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PieceColor::White => "White",
            PieceColor::Black => "Black",
        }
    }
}

/// A piece on the board: always a `{kind, color}` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceType,
    pub color: PieceColor,
}

/// Board snapshot indexed `[rank][file]`, rank 0 = rank 1
pub type BoardGrid = [[Option<Piece>; 8]; 8];

/// A chess move
///
/// `notation` is the SAN record supplied by the rules engine when the move is
/// generated or applied; it is never guessed from the coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceType>,
    pub notation: Option<String>,
}

impl Move {
    pub fn new(from: Square, to: Square, promotion: Option<PieceType>) -> Self {
        Self {
            from,
            to,
            promotion,
            notation: None,
        }
    }

    pub fn with_notation(mut self, notation: impl Into<String>) -> Self {
        self.notation = Some(notation.into());
        self
    }

    /// Coordinate form, e.g. `e2e4` or `e7e8q`
    pub fn coordinate_text(&self) -> String {
        match self.promotion {
            Some(promo) => format!("{}{}{}", self.from, self.to, promo.to_char()),
            None => format!("{}{}", self.from, self.to),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.coordinate_text())
    }
}

/// Status flags projected from a position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameStatus {
    pub in_check: bool,
    pub is_checkmate: bool,
    pub is_stalemate: bool,
    pub is_draw: bool,
    pub turn: PieceColor,
}

impl GameStatus {
    /// Status of a fresh game: White to move, no flags set
    pub fn initial() -> Self {
        Self {
            in_check: false,
            is_checkmate: false,
            is_stalemate: false,
            is_draw: false,
            turn: PieceColor::White,
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.is_checkmate || self.is_stalemate || self.is_draw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_to_char() {
        assert_eq!(File(0).to_char(), 'a');
        assert_eq!(File(4).to_char(), 'e');
        assert_eq!(File(7).to_char(), 'h');
        assert_eq!(File::new(8), None);
    }

    #[test]
    fn test_rank_from_number() {
        assert_eq!(Rank::from_number(1), Some(Rank(0)));
        assert_eq!(Rank::from_number(4), Some(Rank(3)));
        assert_eq!(Rank::from_number(8), Some(Rank(7)));
        assert_eq!(Rank::from_number(0), None);
        assert_eq!(Rank::from_number(9), None);
    }

    #[test]
    fn test_square_algebraic() {
        let square = Square::from_algebraic("e4").unwrap();
        assert_eq!(square.file.index(), 4);
        assert_eq!(square.rank.index(), 3);
        assert_eq!(square.to_algebraic(), "e4");

        let square2: Square = "A1".parse().unwrap();
        assert_eq!(square2, Square::new(0, 0).unwrap());
    }

    #[test]
    fn test_square_rejects_out_of_range() {
        //! Squares outside the 8x8 board never reach the session
        assert!(Square::from_algebraic("i1").is_none());
        assert!(Square::from_algebraic("a9").is_none());
        assert!(Square::from_algebraic("a10").is_none());
        assert!(Square::from_algebraic("").is_none());
        assert!(Square::new(8, 0).is_none());
        assert!(matches!(
            "z0".parse::<Square>(),
            Err(GameError::InvalidSquare { .. })
        ));
    }

    #[test]
    fn test_move_coordinate_text() {
        let e2 = Square::from_algebraic("e2").unwrap();
        let e4 = Square::from_algebraic("e4").unwrap();
        assert_eq!(Move::new(e2, e4, None).to_string(), "e2e4");

        let e7 = Square::from_algebraic("e7").unwrap();
        let e8 = Square::from_algebraic("e8").unwrap();
        assert_eq!(
            Move::new(e7, e8, Some(PieceType::Queen)).coordinate_text(),
            "e7e8q"
        );
    }

    #[test]
    fn test_color_opposite() {
        assert_eq!(PieceColor::White.opposite(), PieceColor::Black);
        assert_eq!(PieceColor::Black.opposite(), PieceColor::White);
    }
}
