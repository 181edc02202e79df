//! Turn phase state machine for the game session
//!
//! Tracks where the session is within the current ply so that human input is
//! only acted on when it can be, and the opponent is only asked once.

use super::game_over::GameOverState;

/// Session phase
///
/// ```text
///              select own piece
///   Idle ─────────────────────────► PieceSelected
///    ▲  ◄──────── deselect / miss ──────┘   │ legal destination
///    │                                      ▼
///    │◄──── opponent move applied ── AwaitingOpponent
///    │      or protocol failure             │
///    │                                      ▼ terminal position
///    └──────────── reset() ─────────── GameOver(result)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TurnPhase {
    /// Waiting for the human to select a piece
    #[default]
    Idle,

    /// A piece is selected and its legal destinations are known
    PieceSelected,

    /// The opponent is to move; selection events are dropped
    AwaitingOpponent,

    /// Terminal position reached; only `reset()` leaves this phase
    GameOver(GameOverState),
}

impl TurnPhase {
    /// Check if this phase acts on square selections
    pub fn accepts_input(&self) -> bool {
        matches!(self, TurnPhase::Idle | TurnPhase::PieceSelected)
    }

    pub fn is_awaiting_opponent(&self) -> bool {
        matches!(self, TurnPhase::AwaitingOpponent)
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self, TurnPhase::GameOver(_))
    }

    /// Whether moving from `self` to `next` is part of the state machine
    ///
    /// `reset()` is not a transition: it replaces the phase outright.
    pub fn can_transition_to(&self, next: TurnPhase) -> bool {
        match (self, next) {
            (TurnPhase::Idle, TurnPhase::Idle) => true,
            (TurnPhase::Idle, TurnPhase::PieceSelected) => true,
            (TurnPhase::Idle, TurnPhase::AwaitingOpponent) => true,
            (TurnPhase::PieceSelected, TurnPhase::Idle) => true,
            (TurnPhase::PieceSelected, TurnPhase::PieceSelected) => true, // Re-select
            (TurnPhase::PieceSelected, TurnPhase::AwaitingOpponent) => true,
            (TurnPhase::PieceSelected, TurnPhase::GameOver(_)) => true,
            (TurnPhase::AwaitingOpponent, TurnPhase::Idle) => true,
            (TurnPhase::AwaitingOpponent, TurnPhase::GameOver(_)) => true,
            (TurnPhase::GameOver(_), _) => false, // Terminal state
            _ => false,
        }
    }

    /// Transition to the next phase
    ///
    /// # Panics
    /// In debug builds, panics if the transition is invalid
    pub fn transition_to(&mut self, next: TurnPhase) {
        debug_assert!(
            self.can_transition_to(next),
            "Invalid turn state transition: {:?} -> {:?}",
            self,
            next
        );
        *self = next;
    }
}
