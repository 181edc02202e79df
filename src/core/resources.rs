//! Core resources for application-wide configuration
//!
//! [`GameSettings`] is what gets persisted between runs. Every field has a
//! default, so a settings file written by an older build still loads.

use crate::game::ai::{AIDifficulty, GameMode, OpponentConfig, DEFAULT_SERVICE_TIMEOUT};
use crate::game::types::PieceColor;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// OpenAI-compatible chat-completions endpoint used when none is configured
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Model requested when none is configured
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Environment variable holding the API key unless configured otherwise
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// User preferences that survive restarts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    /// Opponent strength
    pub difficulty: AIDifficulty,

    /// Whether the opponent explains its moves
    pub teaching_mode: bool,

    /// Color played by the opponent
    pub ai_color: PieceColor,

    /// Move service connection
    pub service: ServiceSettings,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            difficulty: AIDifficulty::default(),
            teaching_mode: false,
            ai_color: PieceColor::Black,
            service: ServiceSettings::default(),
        }
    }
}

impl GameSettings {
    /// Opponent configuration for a new session
    pub fn opponent_config(&self) -> OpponentConfig {
        OpponentConfig {
            mode: GameMode::VsAI {
                ai_color: self.ai_color,
            },
            difficulty: self.difficulty,
            teaching_mode: self.teaching_mode,
            service_timeout: self.service.timeout(),
        }
    }
}

/// Where and how to reach the move service
///
/// The API key itself is never stored; only the name of the environment
/// variable it is read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    pub endpoint: String,
    pub model: String,
    pub api_key_env: String,
    /// Upper bound on one service call, in seconds
    pub timeout_secs: u64,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            timeout_secs: DEFAULT_SERVICE_TIMEOUT.as_secs(),
        }
    }
}

impl ServiceSettings {
    /// Call timeout; zero is not a usable bound and maps to one second
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}
