//! Error types for game module
//!
//! Provides the error kinds surfaced by the move-acquisition protocol and the
//! game session, plus the transport errors of the move-generation service.

use std::time::Duration;

/// Errors that can occur in game logic
///
/// The first four variants are the protocol failures: all of them are
/// recovered at the session boundary and kept as the latest error for display.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// The external move service failed, timed out or is not configured
    #[error("Move service unavailable: {message}")]
    ServiceUnavailable { message: String },

    /// No move token could be found in the service response
    #[error("Could not parse a move from the opponent's response: {response:?}")]
    UnparsableResponse { response: String },

    /// The extracted token is not a legal move in the current position
    #[error("Opponent proposed an illegal move: {token}")]
    IllegalMoveProposed { token: String },

    /// The rules engine refused to apply a move believed to be legal
    #[error("Rules engine rejected move {from}{to}")]
    RejectedApply { from: String, to: String },

    /// Square text outside the 8x8 board
    #[error("Invalid square: {input:?}")]
    InvalidSquare { input: String },
}

impl From<ServiceError> for GameError {
    fn from(err: ServiceError) -> Self {
        GameError::ServiceUnavailable {
            message: err.to_string(),
        }
    }
}

/// Errors raised while talking to the move-generation service
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The credential environment variable is unset or empty
    #[error("API key is not configured. Please set {var} in your environment or .env file")]
    MissingCredential { var: String },

    /// Transport-level failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("Service returned {status}: {body}")]
    Status { status: u16, body: String },

    /// No answer within the configured bound
    #[error("No response within {0:?}")]
    Timeout(Duration),
}

/// Result type alias for game operations
pub type GameResult<T> = Result<T, GameError>;
