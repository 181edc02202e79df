//! Advisory requests: explaining a played move and suggesting the next one
//!
//! Both use the same service and timeout as move acquisition but never touch
//! the game state.

use super::acquisition::call_service;
use super::prompts::{compose_suggestion, compose_teaching_explanation};
use super::resource::AIDifficulty;
use super::service::MoveService;
use crate::game::error::{GameError, GameResult};
use crate::game::notation::{locate_move, resolve_token, MoveToken};
use crate::game::rules::RulesEngine;
use crate::game::types::Move;
use std::time::Duration;
use tracing::info;

/// A move recommended for the human player
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    /// Token exactly as extracted from the response
    pub token: MoveToken,
    /// The matching legal move, if the suggestion is playable
    pub resolved: Option<Move>,
    /// Response text with the move removed
    pub explanation: String,
}

/// Ask for an explanation of `last_move`, played to reach `position`
pub async fn explain_move<R: RulesEngine>(
    rules: &R,
    position: &R::Position,
    service: &dyn MoveService,
    last_move: &str,
    difficulty: AIDifficulty,
    timeout: Duration,
) -> GameResult<String> {
    let request = compose_teaching_explanation(&rules.encode(position), last_move, difficulty);
    info!("[AI] Requesting explanation of {}", last_move);
    call_service(service, &request, timeout).await
}

/// Ask for a move suggestion for the side to move in `position`
pub async fn suggest_move<R: RulesEngine>(
    rules: &R,
    position: &R::Position,
    service: &dyn MoveService,
    difficulty: AIDifficulty,
    timeout: Duration,
) -> GameResult<Suggestion> {
    let side = rules.turn(position);
    let request = compose_suggestion(&rules.encode(position), side, difficulty);
    info!("[AI] Requesting suggestion for {}", side.name());

    let response = call_service(service, &request, timeout).await?;
    let (token, span) = locate_move(&response).ok_or_else(|| GameError::UnparsableResponse {
        response: response.clone(),
    })?;

    let explanation = format!("{}{}", &response[..span.start], &response[span.end..])
        .trim()
        .to_string();
    let resolved = resolve_token(&rules.legal_moves(position), &token);

    Ok(Suggestion {
        token,
        resolved,
        explanation,
    })
}
