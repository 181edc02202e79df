use anyhow::{Context, Result};
use clap::Parser;
use llmchess::core::{load_settings, save_settings, settings_path};
use llmchess::game::ai::{AIDifficulty, ChatCompletionService};
use llmchess::game::rules::StandardRules;
use llmchess::game::types::{PieceColor, Square};
use llmchess::game::{GameSession, SelectionOutcome};
use std::io::Write as _;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

/// Play chess against a language model in the terminal
#[derive(Parser, Debug)]
#[command(name = "llmchess", version, about)]
struct Args {
    /// Opponent strength: beginner, intermediate or advanced
    #[arg(long)]
    difficulty: Option<AIDifficulty>,

    /// Ask the opponent to explain each move
    #[arg(long)]
    teaching: bool,

    /// Color played by the opponent: white or black
    #[arg(long, value_parser = parse_color)]
    ai_color: Option<PieceColor>,

    /// Model name sent to the service
    #[arg(long)]
    model: Option<String>,

    /// Chat-completions endpoint URL
    #[arg(long)]
    endpoint: Option<String>,

    /// Seconds to wait for the service before giving up
    #[arg(long)]
    timeout: Option<u64>,

    /// Settings file (defaults to the platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Persist the effective settings after applying overrides
    #[arg(long)]
    save: bool,
}

fn parse_color(s: &str) -> Result<PieceColor, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "white" | "w" => Ok(PieceColor::White),
        "black" | "b" => Ok(PieceColor::Black),
        other => Err(format!("unknown color '{other}' (expected white or black)")),
    }
}

const HELP: &str = "\
Commands:
  <square>          select a piece or a destination, e.g. e2 then e4
  <from><to>        shorthand for two selections, e.g. e2e4
  new               start a new game
  retry             ask the opponent again after a failed move
  explain           explain the last move played
  suggest           suggest a move for you
  dismiss           hide the opponent's explanation
  teach on|off      toggle move explanations
  level <name>      beginner, intermediate or advanced
  help              show this text
  quit              leave";

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let path = args.config.clone().unwrap_or_else(settings_path);
    let mut settings = load_settings(&path);

    if let Some(difficulty) = args.difficulty {
        settings.difficulty = difficulty;
    }
    if args.teaching {
        settings.teaching_mode = true;
    }
    if let Some(color) = args.ai_color {
        settings.ai_color = color;
    }
    if let Some(model) = args.model {
        settings.service.model = model;
    }
    if let Some(endpoint) = args.endpoint {
        settings.service.endpoint = endpoint;
    }
    if let Some(timeout) = args.timeout {
        settings.service.timeout_secs = timeout;
    }
    if args.save {
        save_settings(&path, &settings)
            .with_context(|| format!("failed to save settings to {}", path.display()))?;
    }

    let service = ChatCompletionService::from_settings(&settings.service);
    let mut session = GameSession::with_config(StandardRules::new(), settings.opponent_config());

    println!("You play {}. Type 'help' for commands.", session.human_color().name());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        if session.is_awaiting_opponent() {
            println!("Opponent ({}) is thinking...", service.model());
            if let Some(Err(err)) = session.play_opponent_turn(&service).await {
                println!("Opponent failed: {err}. Type 'retry' to ask again.");
            }
        }

        render(&session)?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));

        match command.to_ascii_lowercase().as_str() {
            "" => {}
            "quit" | "exit" => break,
            "help" => println!("{HELP}"),
            "new" => session.reset(),
            "retry" => {
                if !session.retry_opponent_turn() {
                    println!("Nothing to retry.");
                }
            }
            "dismiss" => session.dismiss_explanation(),
            "teach" => session.set_teaching_mode(rest.trim().eq_ignore_ascii_case("on")),
            "level" => match rest.parse::<AIDifficulty>() {
                Ok(difficulty) => session.set_difficulty(difficulty),
                Err(err) => println!("{err}"),
            },
            "explain" => match session.explain_last_move(&service).await {
                Ok(Some(text)) => println!("\n{text}\n"),
                Ok(None) => println!("No move has been played yet."),
                Err(err) => println!("Explanation failed: {err}"),
            },
            "suggest" => match session.suggest_move(&service).await {
                Ok(suggestion) => {
                    let label = suggestion
                        .resolved
                        .as_ref()
                        .and_then(|m| m.notation.clone())
                        .unwrap_or_else(|| suggestion.token.to_string());
                    println!("\nSuggested: {label}\n{}\n", suggestion.explanation);
                }
                Err(err) => println!("Suggestion failed: {err}"),
            },
            text => handle_squares(&mut session, text),
        }
    }

    Ok(())
}

/// Feed one square, or a from/to pair, to the session
fn handle_squares(session: &mut GameSession, text: &str) {
    let squares: Vec<&str> = match text.len() {
        2 => vec![text],
        4 if text.is_ascii() => vec![&text[..2], &text[2..]],
        _ => {
            println!("Unknown command '{text}'. Type 'help' for commands.");
            return;
        }
    };

    for square in squares {
        let square = match square.parse::<Square>() {
            Ok(square) => square,
            Err(err) => {
                println!("{err}");
                return;
            }
        };
        match session.select_or_act(square) {
            SelectionOutcome::Ignored => println!("Nothing to do on {square}."),
            SelectionOutcome::Rejected => println!("That move was rejected."),
            _ => {}
        }
    }
}

fn render(session: &GameSession) -> std::io::Result<()> {
    let board = session.board();
    let selection = session.selection();
    let highlighted: Vec<Square> = session
        .last_move()
        .map(|m| vec![m.from, m.to])
        .unwrap_or_default();

    println!();
    for rank in (0..8u8).rev() {
        let mut row = format!("{} ", rank + 1);
        for file in 0..8u8 {
            let Some(square) = Square::new(file, rank) else {
                continue;
            };
            let glyph = match board[rank as usize][file as usize] {
                Some(piece) => match piece.color {
                    PieceColor::White => piece.kind.to_char().to_ascii_uppercase(),
                    PieceColor::Black => piece.kind.to_char(),
                },
                None if selection.is_target(square) => '*',
                None => '.',
            };
            let (open, close) = if selection.selected_square == Some(square) {
                ('[', ']')
            } else if highlighted.contains(&square) {
                ('(', ')')
            } else {
                (' ', ' ')
            };
            row.push(open);
            row.push(glyph);
            row.push(close);
        }
        println!("{row}");
    }
    println!("   a  b  c  d  e  f  g  h\n");

    for entry in session.history() {
        println!(
            "{:>3}. {:<8} {}",
            entry.ply_number,
            entry.white_notation.as_deref().unwrap_or(""),
            entry.black_notation.as_deref().unwrap_or("")
        );
    }

    println!("\n{}", session.status_message());
    if let Some(err) = session.last_error() {
        println!("Last error: {err}");
    }
    if let Some(explanation) = session.explanation() {
        println!("Opponent: {explanation}");
    }
    print!("> ");
    std::io::stdout().flush()
}
