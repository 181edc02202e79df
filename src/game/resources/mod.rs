//! Game session resources - the state the session owns between calls
//!
//! Each resource is a plain value with no chess knowledge of its own. The
//! [`crate::game::session::GameSession`] owns one of each and keeps them
//! consistent with the current position.
//!
//! # Resource Categories
//!
//! ## Turn Management
//! - [`TurnPhase`] - Session state machine (Idle, PieceSelected, AwaitingOpponent, GameOver)
//! - [`PendingOpponentMove`] - Guard allowing at most one outstanding opponent request
//!
//! ## Player Interaction
//! - [`Selection`] - Currently selected square and its legal destinations
//!
//! ## Game History
//! - [`HistoryEntry`] - Ply-paired move list entries
//!
//! ## Game Status
//! - [`GameOverState`] - Win/draw conditions and status texts

pub mod game_over;
pub mod history;
pub mod pending;
pub mod selection;
pub mod turn_state;


pub use game_over::{status_message, GameOverState};
pub use history::{pair_flat_history, HistoryEntry};
pub use pending::{OpponentTicket, PendingOpponentMove};
pub use selection::Selection;
pub use turn_state::TurnPhase;
