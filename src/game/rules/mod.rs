//! Chess rules module - legality oracle behind a narrow trait
//!
//! The session never inspects a position directly. Every legality query, move
//! application and status projection goes through [`RulesEngine`], so the
//! orchestration code stays free of chess knowledge and tests can run the
//! whole flow against the production implementation.
//!
//! # Module Structure
//!
//! - `standard` - [`StandardRules`], the `shakmaty`-backed implementation

pub mod standard;


pub use standard::{ChessPosition, StandardRules};

use crate::game::types::{BoardGrid, GameStatus, Move, Piece, PieceColor, PieceType, Square};
use std::collections::BTreeSet;

/// Legality oracle consumed by the game session
///
/// Implementations are cheap to clone and thread-safe, so a presentation
/// layer can hand a copy plus a position snapshot to a spawned task.
pub trait RulesEngine: Clone + Send + Sync + 'static {
    /// Opaque position value; owned by the session, produced only here
    type Position: Clone + Send + Sync + 'static;

    /// Standard starting position
    fn start_position(&self) -> Self::Position;

    /// Destinations reachable by the piece on `from`; empty when the square is
    /// empty or holds a piece of the side not to move
    fn legal_destinations(&self, position: &Self::Position, from: Square) -> BTreeSet<Square>;

    /// Every legal move, each carrying its SAN notation
    fn legal_moves(&self, position: &Self::Position) -> Vec<Move>;

    /// Apply a move, returning the successor position and the SAN of the move
    ///
    /// `None` means the move is not legal. A missing promotion on a
    /// promoting move is treated as a queen.
    fn apply_move(
        &self,
        position: &Self::Position,
        from: Square,
        to: Square,
        promotion: Option<PieceType>,
    ) -> Option<(Self::Position, String)>;

    fn status(&self, position: &Self::Position) -> GameStatus;

    /// Textual position encoding (FEN)
    fn encode(&self, position: &Self::Position) -> String;

    /// SAN of every move played since the start position, in order
    fn flat_history(&self, position: &Self::Position) -> Vec<String>;

    fn piece_at(&self, position: &Self::Position, square: Square) -> Option<Piece>;

    fn turn(&self, position: &Self::Position) -> PieceColor;

    /// Whether the draw is due to insufficient mating material
    fn is_insufficient_material(&self, _position: &Self::Position) -> bool {
        false
    }

    /// 8x8 snapshot indexed `[rank][file]`
    fn board(&self, position: &Self::Position) -> BoardGrid {
        let mut grid: BoardGrid = [[None; 8]; 8];
        for (rank, row) in grid.iter_mut().enumerate() {
            for (file, cell) in row.iter_mut().enumerate() {
                if let Some(square) = Square::new(file as u8, rank as u8) {
                    *cell = self.piece_at(position, square);
                }
            }
        }
        grid
    }
}
