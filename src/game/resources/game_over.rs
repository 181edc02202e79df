//! Game over state tracking and result management
//!
//! Projects the rules engine's status flags onto a single result value and
//! renders the status line shown to the player.
//!
//! # Game Over Conditions
//!
//! ## Checkmate
//! - **WhiteWon**: Black is in check with no legal moves
//! - **BlackWon**: White is in check with no legal moves
//!
//! ## Draw Conditions
//! - **Stalemate**: Side to move has no legal moves but is NOT in check
//! - **InsufficientMaterial**: Neither side can deliver checkmate (e.g., K vs K)
//! - **Draw**: Fifty-move rule or threefold repetition

use crate::game::types::{GameStatus, PieceColor};

/// The game's end state, `Playing` until a terminal position is reached
#[derive(Default, Debug, PartialEq, Eq, Clone, Copy)]
pub enum GameOverState {
    /// Game is still in progress
    #[default]
    Playing,

    /// White won by checkmate
    WhiteWon,

    /// Black won by checkmate
    BlackWon,

    /// Draw by stalemate
    Stalemate,

    /// Draw by insufficient material
    InsufficientMaterial,

    /// Draw by the fifty-move rule or repetition
    Draw,
}

impl GameOverState {
    /// Project status flags onto a result
    ///
    /// `insufficient_material` only distinguishes the kind of draw; it has no
    /// effect unless `status.is_draw` is set.
    pub fn from_status(status: &GameStatus, insufficient_material: bool) -> Self {
        if status.is_checkmate {
            // The side to move is the side that got mated
            match status.turn {
                PieceColor::White => GameOverState::BlackWon,
                PieceColor::Black => GameOverState::WhiteWon,
            }
        } else if status.is_stalemate {
            GameOverState::Stalemate
        } else if status.is_draw && insufficient_material {
            GameOverState::InsufficientMaterial
        } else if status.is_draw {
            GameOverState::Draw
        } else {
            GameOverState::Playing
        }
    }

    /// Check if the game has ended
    pub fn is_game_over(&self) -> bool {
        !matches!(self, GameOverState::Playing)
    }

    /// Get a human-readable message describing the game result
    pub fn message(&self) -> &str {
        match self {
            GameOverState::Playing => "Game in progress",
            GameOverState::WhiteWon => "White wins by checkmate!",
            GameOverState::BlackWon => "Black wins by checkmate!",
            GameOverState::Stalemate => "Draw by stalemate",
            GameOverState::InsufficientMaterial => "Draw by insufficient material",
            GameOverState::Draw => "Draw",
        }
    }

    /// Get the winner of the game, if there is one
    pub fn winner(&self) -> Option<PieceColor> {
        match self {
            GameOverState::WhiteWon => Some(PieceColor::White),
            GameOverState::BlackWon => Some(PieceColor::Black),
            _ => None,
        }
    }

    pub fn is_draw(&self) -> bool {
        matches!(
            self,
            GameOverState::Stalemate | GameOverState::InsufficientMaterial | GameOverState::Draw
        )
    }

    pub fn is_checkmate(&self) -> bool {
        matches!(self, GameOverState::WhiteWon | GameOverState::BlackWon)
    }
}

/// One-line status shown above the board
///
/// Checkmate takes precedence over stalemate, stalemate over other draws,
/// and check over the plain turn indicator.
pub fn status_message(status: &GameStatus) -> String {
    if status.is_checkmate {
        format!("Checkmate! {} wins", status.turn.opposite().name())
    } else if status.is_stalemate {
        "Stalemate - Draw".to_string()
    } else if status.is_draw {
        "Draw".to_string()
    } else if status.in_check {
        format!("{} is in check!", status.turn.name())
    } else {
        format!("{}'s turn", status.turn.name())
    }
}
