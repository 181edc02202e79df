//! Integration tests for settings-driven session setup
//!
//! Verifies that a persisted settings file produces the expected opponent
//! configuration and that the session honours it from the first ply.

use llmchess::core::{load_settings, save_settings, GameSettings, ServiceSettings};
use llmchess::game::ai::{AIDifficulty, ChatCompletionService};
use llmchess::game::rules::StandardRules;
use llmchess::game::types::PieceColor;
use llmchess::game::GameSession;
use std::time::Duration;

#[test]
fn test_settings_file_configures_session() {
    //! A saved file with the opponent on White starts the game on its turn
    let dir = std::env::temp_dir().join(format!("llmchess-core-{}", uuid::Uuid::new_v4()));
    let path = dir.join("settings.json");

    let saved = GameSettings {
        difficulty: AIDifficulty::Beginner,
        teaching_mode: true,
        ai_color: PieceColor::White,
        service: ServiceSettings {
            timeout_secs: 12,
            ..ServiceSettings::default()
        },
    };
    save_settings(&path, &saved).unwrap();

    let loaded = load_settings(&path);
    assert_eq!(loaded, saved);

    let session = GameSession::with_config(StandardRules::new(), loaded.opponent_config());
    assert_eq!(session.human_color(), PieceColor::Black);
    assert!(session.is_awaiting_opponent());
    assert_eq!(session.config().service_timeout, Duration::from_secs(12));
    assert!(session.config().teaching_mode);

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn test_service_built_from_settings_uses_configured_model() {
    let settings = ServiceSettings {
        model: "gpt-4o".to_string(),
        api_key_env: format!("LLMCHESS_UNSET_{}", uuid::Uuid::new_v4().simple()),
        ..ServiceSettings::default()
    };
    let service = ChatCompletionService::from_settings(&settings);
    assert_eq!(service.model(), "gpt-4o");
}
