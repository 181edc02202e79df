//! Request composition for the move service
//!
//! Every function here is pure: same inputs, same request.

use super::resource::AIDifficulty;
use crate::game::types::PieceColor;
use serde::Serialize;

const MOVE_SYSTEM_ROLE: &str =
    "You are a chess engine. Respond with chess moves in UCI notation (e.g., \"e2e4\").";
const TEACHER_SYSTEM_ROLE: &str = "You are a chess teacher helping students learn the game.";
const COACH_SYSTEM_ROLE: &str = "You are a chess coach helping players improve.";

/// Response cap for a bare move
const MOVE_MAX_TOKENS: u32 = 50;
/// Response cap for a move followed by a short rationale
const EXPLAINED_MOVE_MAX_TOKENS: u32 = 150;
/// Response cap for teaching and suggestion answers
const ADVISORY_MAX_TOKENS: u32 = 200;

const TEACHING_TEMPERATURE: f32 = 0.7;
const SUGGESTION_TEMPERATURE: f32 = 0.6;

/// Payload handed to a [`super::MoveService`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceRequest {
    /// Fixed role description sent ahead of the instruction
    pub system: String,
    /// The instruction text itself
    pub instruction: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

fn difficulty_directive(difficulty: AIDifficulty) -> &'static str {
    match difficulty {
        AIDifficulty::Beginner => {
            "You are playing chess at a BEGINNER level. Make simple, straightforward moves. \
             Focus on developing pieces and basic principles. Avoid complex tactics and deep \
             calculations. Sometimes make slightly suboptimal moves to keep the game accessible."
        }
        AIDifficulty::Intermediate => {
            "You are playing chess at an INTERMEDIATE level. Play a balanced game with some \
             tactical awareness. Look for basic tactics like forks, pins, and skewers. Make \
             solid moves but don't calculate too deeply."
        }
        AIDifficulty::Advanced => {
            "You are playing chess at an ADVANCED level. Play strong chess with deep \
             calculation. Look for complex tactics, combinations, and strategic plans. \
             Calculate multiple moves ahead and find the best moves available."
        }
    }
}

fn audience(difficulty: AIDifficulty) -> &'static str {
    match difficulty {
        AIDifficulty::Beginner => "a beginner",
        AIDifficulty::Intermediate => "a club player",
        AIDifficulty::Advanced => "an experienced player",
    }
}

/// Build the request for the opponent's next move
///
/// With `explain` set, the service is asked for the move on the first line
/// and a 1-2 sentence rationale on the next.
pub fn compose_move_request(fen: &str, difficulty: AIDifficulty, explain: bool) -> ServiceRequest {
    let mut instruction = format!(
        "You are playing chess against a human opponent. The current board position in FEN notation is:\n{fen}\n\n{}\n",
        difficulty_directive(difficulty)
    );

    if explain {
        instruction.push_str(
            "\nIMPORTANT: Teaching mode is ON. After providing your move, explain your reasoning \
             in 1-2 sentences. Focus on the strategic or tactical idea behind the move.\n",
        );
    }

    instruction.push_str(
        "\nRespond with ONLY a valid chess move in UCI notation (e.g., \"e2e4\" or \"g1f3\"). \
         Do not include any other text unless teaching mode is enabled, in which case provide \
         the move followed by a brief explanation on a new line.\n\nYour move:",
    );

    ServiceRequest {
        system: MOVE_SYSTEM_ROLE.to_string(),
        instruction,
        temperature: difficulty.temperature(),
        max_tokens: if explain {
            EXPLAINED_MOVE_MAX_TOKENS
        } else {
            MOVE_MAX_TOKENS
        },
    }
}

/// Build a request explaining a move that has already been played
pub fn compose_teaching_explanation(
    fen: &str,
    last_move: &str,
    difficulty: AIDifficulty,
) -> ServiceRequest {
    let instruction = format!(
        "You are teaching chess to {}. The current board position is:\n{fen}\n\n\
         The last move played was: {last_move}\n\n\
         Explain this move and its purpose. What strategic or tactical idea does it demonstrate? \
         Keep the explanation clear and educational, suitable for someone learning chess.\n\n\
         Explanation:",
        audience(difficulty)
    );

    ServiceRequest {
        system: TEACHER_SYSTEM_ROLE.to_string(),
        instruction,
        temperature: TEACHING_TEMPERATURE,
        max_tokens: ADVISORY_MAX_TOKENS,
    }
}

/// Build a request suggesting a move for `side_to_move`
pub fn compose_suggestion(
    fen: &str,
    side_to_move: PieceColor,
    difficulty: AIDifficulty,
) -> ServiceRequest {
    let instruction = format!(
        "You are helping {} improve at chess. The current board position is:\n{fen}\n\n\
         It is {}'s turn to move.\n\n\
         Suggest the best move and explain why it's good. Consider:\n\
         - Piece development\n\
         - King safety\n\
         - Tactical opportunities\n\
         - Strategic plans\n\n\
         Provide the move in UCI notation followed by a brief explanation.\n\n\
         Suggestion:",
        audience(difficulty),
        side_to_move.name()
    );

    ServiceRequest {
        system: COACH_SYSTEM_ROLE.to_string(),
        instruction,
        temperature: SUGGESTION_TEMPERATURE,
        max_tokens: ADVISORY_MAX_TOKENS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    #[test]
    fn test_move_request_embeds_position() {
        let request = compose_move_request(START_FEN, AIDifficulty::Intermediate, false);
        assert!(request.instruction.contains(START_FEN));
        assert!(request.instruction.contains("INTERMEDIATE"));
        assert!(request.instruction.ends_with("Your move:"));
        assert_eq!(request.system, MOVE_SYSTEM_ROLE);
    }

    #[test]
    fn test_move_request_varies_by_difficulty() {
        let beginner = compose_move_request(START_FEN, AIDifficulty::Beginner, false);
        let advanced = compose_move_request(START_FEN, AIDifficulty::Advanced, false);

        assert!(beginner.instruction.contains("BEGINNER"));
        assert!(advanced.instruction.contains("ADVANCED"));
        assert_ne!(beginner.instruction, advanced.instruction);
        assert_eq!(beginner.temperature, 0.7);
        assert_eq!(advanced.temperature, 0.3);
    }

    #[test]
    fn test_explanation_changes_instruction_and_cap() {
        //! Only the explanation flag adds the rationale directive
        let plain = compose_move_request(START_FEN, AIDifficulty::Beginner, false);
        let explained = compose_move_request(START_FEN, AIDifficulty::Beginner, true);

        assert!(!plain.instruction.contains("Teaching mode is ON"));
        assert!(explained.instruction.contains("Teaching mode is ON"));
        assert_eq!(plain.max_tokens, 50);
        assert_eq!(explained.max_tokens, 150);
    }

    #[test]
    fn test_composition_is_deterministic() {
        assert_eq!(
            compose_move_request(START_FEN, AIDifficulty::Advanced, true),
            compose_move_request(START_FEN, AIDifficulty::Advanced, true)
        );
    }

    #[test]
    fn test_teaching_explanation_request() {
        let request = compose_teaching_explanation(START_FEN, "Nf3", AIDifficulty::Beginner);
        assert!(request.instruction.contains("The last move played was: Nf3"));
        assert!(request.instruction.contains("a beginner"));
        assert_eq!(request.system, TEACHER_SYSTEM_ROLE);
        assert_eq!(request.temperature, 0.7);
        assert_eq!(request.max_tokens, 200);
    }

    #[test]
    fn test_suggestion_request() {
        let request = compose_suggestion(START_FEN, PieceColor::Black, AIDifficulty::Advanced);
        assert!(request.instruction.contains("It is Black's turn to move."));
        assert!(request.instruction.contains(START_FEN));
        assert_eq!(request.system, COACH_SYSTEM_ROLE);
        assert_eq!(request.temperature, 0.6);
    }
}
