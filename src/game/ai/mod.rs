//! Language-model opponent
//!
//! The opponent's moves come from an external service that answers in free
//! text. This module turns a position into a request, bounds the wait for the
//! answer and validates whatever comes back before it can touch the game.
//!
//! # Architecture
//!
//! - `OpponentConfig`: game mode, difficulty, teaching mode and timeout
//! - `prompts`: pure request composition per difficulty
//! - `MoveService`: async seam to the service, `ChatCompletionService` in production
//! - `acquire_move`: one compose/call/extract/validate/apply attempt
//! - `advisor`: move explanations and suggestions for the human

pub mod acquisition;
pub mod advisor;
pub mod prompts;
pub mod resource;
pub mod service;

// Re-export for convenience
pub use acquisition::{acquire_move, extract_explanation, AcquiredMove};
pub use advisor::{explain_move, suggest_move, Suggestion};
pub use prompts::{compose_move_request, compose_suggestion, compose_teaching_explanation, ServiceRequest};
pub use resource::{AIDifficulty, GameMode, OpponentConfig, DEFAULT_SERVICE_TIMEOUT};
pub use service::{ChatCompletionService, MoveService};
