//! Chess game logic module - session orchestration and move acquisition
//!
//! Implements a game of chess between a human and a language-model opponent,
//! with clean separation between the rules engine, the opponent protocol and
//! the session state machine.
//!
//! # Module Organization
//!
//! - `types` - Squares, pieces, moves and status flags
//! - `error` - `GameError` and `ServiceError`
//! - `notation` - Move extraction from free-form text
//! - `rules` - Rules engine seam and the standard chess implementation
//! - `ai` - Opponent configuration, request composition, move service, acquisition
//! - `resources` - Turn phase, selection, history pairing, game result
//! - `session` - `GameSession`, the single owner of game state
//!
//! # Flow
//!
//! 1. Square selections go to [`GameSession::select_or_act`]
//! 2. A completed human ply with the opponent to move enters `AwaitingOpponent`
//! 3. [`GameSession::play_opponent_turn`] composes, calls, extracts, validates, applies
//! 4. Status and history are projected from the position on every read

pub mod ai;
pub mod error;
pub mod notation;
pub mod resources;
pub mod rules;
pub mod session;
pub mod types;

pub use error::{GameError, GameResult, ServiceError};
pub use session::{GameSession, OpponentRequest, SelectionOutcome};
