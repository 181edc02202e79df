//! Opponent configuration: game mode, difficulty and explanation settings
//!
//! These values control when the opponent is asked for a move and how the
//! request is phrased. Changes take effect on the next request; a request
//! already in flight keeps the settings it was composed with.
//!
//! # Difficulty Levels
//!
//! Difficulty is expressed through the instruction text and the sampling
//! temperature sent to the move service:
//!
//! | Difficulty   | Temperature | Directive                      |
//! |--------------|-------------|--------------------------------|
//! | Beginner     | 0.7         | Simple, conservative moves     |
//! | Intermediate | 0.5         | Balanced play, basic tactics   |
//! | Advanced     | 0.3         | Deep calculation, best moves   |

use crate::game::types::PieceColor;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Upper bound on a single move-service call unless configured otherwise
pub const DEFAULT_SERVICE_TIMEOUT: Duration = Duration::from_secs(30);

/// Opponent configuration owned by the game session
///
/// # Examples
///
/// ```rust,ignore
/// let config = OpponentConfig {
///     mode: GameMode::VsAI { ai_color: PieceColor::White },
///     difficulty: AIDifficulty::Advanced,
///     ..OpponentConfig::default()
/// };
/// let session = GameSession::with_config(StandardRules, config);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct OpponentConfig {
    /// Which color the opponent plays
    pub mode: GameMode,

    /// Playing strength requested from the move service
    pub difficulty: AIDifficulty,

    /// When on, the opponent is asked to justify each move in 1-2 sentences
    pub teaching_mode: bool,

    /// Bound on each call to the move service; elapsing counts as unavailable
    pub service_timeout: Duration,
}

impl Default for OpponentConfig {
    /// Opponent plays Black at intermediate strength, no explanations
    fn default() -> Self {
        Self {
            mode: GameMode::VsAI {
                ai_color: PieceColor::Black,
            },
            difficulty: AIDifficulty::Intermediate,
            teaching_mode: false,
            service_timeout: DEFAULT_SERVICE_TIMEOUT,
        }
    }
}

impl OpponentConfig {
    pub fn ai_color(&self) -> PieceColor {
        self.mode.ai_color()
    }

    pub fn human_color(&self) -> PieceColor {
        self.mode.ai_color().opposite()
    }
}

/// Game mode selection
///
/// Only human-versus-opponent games are supported; the variant names which
/// color the move service controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    /// Human vs AI opponent
    VsAI {
        /// The color the AI will play
        ai_color: PieceColor,
    },
}

impl GameMode {
    /// Get the AI player's color
    pub fn ai_color(self) -> PieceColor {
        match self {
            GameMode::VsAI { ai_color } => ai_color,
        }
    }
}

/// Opponent strength tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AIDifficulty {
    /// Simple, straightforward moves; occasionally suboptimal on purpose
    Beginner,

    /// Balanced play with awareness of forks, pins and skewers
    #[default]
    Intermediate,

    /// Strong play with deep calculation
    Advanced,
}

impl AIDifficulty {
    /// Sampling temperature sent with move requests
    ///
    /// Stronger tiers sample more deterministically.
    pub fn temperature(self) -> f32 {
        match self {
            AIDifficulty::Beginner => 0.7,
            AIDifficulty::Intermediate => 0.5,
            AIDifficulty::Advanced => 0.3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AIDifficulty::Beginner => "beginner",
            AIDifficulty::Intermediate => "intermediate",
            AIDifficulty::Advanced => "advanced",
        }
    }
}

impl fmt::Display for AIDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AIDifficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" | "easy" => Ok(AIDifficulty::Beginner),
            "intermediate" | "medium" => Ok(AIDifficulty::Intermediate),
            "advanced" | "hard" => Ok(AIDifficulty::Advanced),
            other => Err(format!(
                "unknown difficulty '{other}' (expected beginner, intermediate or advanced)"
            )),
        }
    }
}
