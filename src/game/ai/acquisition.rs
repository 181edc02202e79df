//! Opponent move acquisition
//!
//! One attempt per opponent ply: compose, call, extract, validate, apply.
//! Each step has exactly one failure kind and nothing is retried; the caller
//! decides what to do with the error.
//!
//! ```text
//! compose_move_request ──► MoveService::complete ──► extract_move
//!                                 │ (timeout)              │
//!                          ServiceUnavailable      UnparsableResponse
//!                                                          │
//!                         RulesEngine::apply_move ◄── resolve_token
//!                                 │                        │
//!                           RejectedApply         IllegalMoveProposed
//! ```

use super::prompts::{compose_move_request, ServiceRequest};
use super::resource::AIDifficulty;
use super::service::MoveService;
use crate::game::error::{GameError, GameResult, ServiceError};
use crate::game::notation::{extract_move, resolve_token};
use crate::game::rules::RulesEngine;
use crate::game::types::Move;
use std::time::Duration;
use tracing::{debug, info};

/// A validated opponent move together with the position it produces
#[derive(Debug, Clone)]
pub struct AcquiredMove<P> {
    pub mv: Move,
    /// SAN as recorded by the rules engine
    pub notation: String,
    /// Rationale from the response, when one was requested and supplied
    pub explanation: Option<String>,
    pub position: P,
}

/// Ask the move service for a move in `position` and apply it
///
/// `position` is a snapshot; the caller's copy is never modified.
pub async fn acquire_move<R: RulesEngine>(
    rules: &R,
    position: &R::Position,
    service: &dyn MoveService,
    difficulty: AIDifficulty,
    explain: bool,
    timeout: Duration,
) -> GameResult<AcquiredMove<R::Position>> {
    let fen = rules.encode(position);
    let request = compose_move_request(&fen, difficulty, explain);
    info!("[AI] Requesting {} move for {}", difficulty, fen);

    let response = call_service(service, &request, timeout).await?;
    debug!("[AI] Raw response: {:?}", response);

    let token = extract_move(&response).ok_or_else(|| GameError::UnparsableResponse {
        response: response.clone(),
    })?;

    let legal = rules.legal_moves(position);
    let mv = resolve_token(&legal, &token).ok_or_else(|| GameError::IllegalMoveProposed {
        token: token.to_string(),
    })?;

    let (next, notation) = rules
        .apply_move(position, mv.from, mv.to, mv.promotion)
        .ok_or_else(|| GameError::RejectedApply {
            from: mv.from.to_string(),
            to: mv.to.to_string(),
        })?;

    info!("[AI] Opponent plays {} ({})", notation, mv);

    let explanation = if explain {
        extract_explanation(&response)
    } else {
        None
    };

    Ok(AcquiredMove {
        mv: mv.with_notation(notation.clone()),
        notation,
        explanation,
        position: next,
    })
}

/// Call the service with an upper bound on the wait
///
/// Elapsing the bound drops the in-flight call and reports the service as
/// unavailable.
pub(crate) async fn call_service(
    service: &dyn MoveService,
    request: &ServiceRequest,
    timeout: Duration,
) -> GameResult<String> {
    match tokio::time::timeout(timeout, service.complete(request)).await {
        Ok(Ok(text)) => Ok(text.trim().to_string()),
        Ok(Err(err)) => Err(err.into()),
        Err(_) => Err(ServiceError::Timeout(timeout).into()),
    }
}

/// Text after the first line break of the trimmed response, lines joined by
/// spaces; `None` when nothing is left
pub fn extract_explanation(response: &str) -> Option<String> {
    let (_, rest) = response.trim().split_once('\n')?;
    let joined = rest
        .split('\n')
        .map(|line| line.trim_end_matches('\r'))
        .collect::<Vec<_>>()
        .join(" ");
    let explanation = joined.trim();
    (!explanation.is_empty()).then(|| explanation.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::rules::StandardRules;
    use crate::game::types::{PieceType, Square};
    use async_trait::async_trait;

    struct Fixed(&'static str);

    #[async_trait]
    impl MoveService for Fixed {
        async fn complete(&self, _request: &ServiceRequest) -> Result<String, ServiceError> {
            Ok(self.0.to_string())
        }
    }

    struct Stalled;

    #[async_trait]
    impl MoveService for Stalled {
        async fn complete(&self, _request: &ServiceRequest) -> Result<String, ServiceError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok("e7e5".to_string())
        }
    }

    fn after_e4() -> (StandardRules, <StandardRules as RulesEngine>::Position) {
        let rules = StandardRules::new();
        let (position, _) = rules
            .apply_move(
                &rules.start_position(),
                Square::from_algebraic("e2").unwrap(),
                Square::from_algebraic("e4").unwrap(),
                None,
            )
            .unwrap();
        (rules, position)
    }

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn test_acquire_coordinate_move() {
        let (rules, position) = after_e4();
        let acquired = acquire_move(
            &rules,
            &position,
            &Fixed("e7e5"),
            AIDifficulty::Intermediate,
            false,
            TIMEOUT,
        )
        .await
        .unwrap();

        assert_eq!(acquired.notation, "e5");
        assert_eq!(acquired.mv.coordinate_text(), "e7e5");
        assert!(acquired.explanation.is_none());
        assert_eq!(rules.flat_history(&acquired.position), vec!["e4", "e5"]);
        // Snapshot untouched
        assert_eq!(rules.flat_history(&position), vec!["e4"]);
    }

    #[tokio::test]
    async fn test_acquire_with_explanation() {
        let (rules, position) = after_e4();
        let acquired = acquire_move(
            &rules,
            &position,
            &Fixed("e7e5\nDeveloping the center pawn."),
            AIDifficulty::Beginner,
            true,
            TIMEOUT,
        )
        .await
        .unwrap();

        assert_eq!(acquired.notation, "e5");
        assert_eq!(
            acquired.explanation.as_deref(),
            Some("Developing the center pawn.")
        );
    }

    #[tokio::test]
    async fn test_acquire_algebraic_fallback() {
        let (rules, position) = after_e4();
        let acquired = acquire_move(
            &rules,
            &position,
            &Fixed("I'll answer with Nc6."),
            AIDifficulty::Advanced,
            false,
            TIMEOUT,
        )
        .await
        .unwrap();
        assert_eq!(acquired.notation, "Nc6");
    }

    #[tokio::test]
    async fn test_acquire_algebraic_underpromotion() {
        let rules = StandardRules::new();
        let position = rules
            .position_from_fen("8/5P2/8/8/8/8/k7/4K3 w - - 0 1")
            .unwrap();
        let acquired = acquire_move(
            &rules,
            &position,
            &Fixed("f8=N"),
            AIDifficulty::Intermediate,
            false,
            TIMEOUT,
        )
        .await
        .unwrap();

        assert_eq!(acquired.mv.promotion, Some(PieceType::Knight));
        assert_eq!(acquired.notation, "f8=N");
    }

    #[tokio::test]
    async fn test_acquire_failure_kinds() {
        let (rules, position) = after_e4();
        let run = |text: &'static str| {
            let rules = rules;
            let position = position.clone();
            async move {
                acquire_move(
                    &rules,
                    &position,
                    &Fixed(text),
                    AIDifficulty::Intermediate,
                    false,
                    TIMEOUT,
                )
                .await
            }
        };

        assert!(matches!(
            run("I am unable to comply.").await,
            Err(GameError::UnparsableResponse { .. })
        ));
        match run("e2e4").await {
            Err(GameError::IllegalMoveProposed { token }) => assert_eq!(token, "e2e4"),
            other => panic!("Expected IllegalMoveProposed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_stalled_service_times_out() {
        let (rules, position) = after_e4();
        let result = acquire_move(
            &rules,
            &position,
            &Stalled,
            AIDifficulty::Intermediate,
            false,
            Duration::from_millis(50),
        )
        .await;
        assert!(matches!(result, Err(GameError::ServiceUnavailable { .. })));
    }

    #[test]
    fn test_extract_explanation() {
        assert_eq!(extract_explanation("e7e5"), None);
        assert_eq!(extract_explanation("e7e5\n   \n"), None);
        assert_eq!(
            extract_explanation("  e7e5\nControls d4.\nPrepares Nf6.  "),
            Some("Controls d4. Prepares Nf6.".to_string())
        );
    }
}
