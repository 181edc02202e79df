//! Game session - the authoritative state of one game
//!
//! A [`GameSession`] owns the position, the turn phase, the current selection
//! and the opponent bookkeeping. Presentation code drives it with square
//! selections and reads everything else back through getters; status and
//! history are derived from the position on every read.
//!
//! # Opponent turns
//!
//! When a human move leaves the opponent to move, the session enters
//! `AwaitingOpponent` and waits to be driven:
//!
//! ```rust,ignore
//! // Simple: await in place
//! session.play_opponent_turn(&service).await;
//!
//! // Or hand the work to a task and keep feeding (ignored) input meanwhile
//! if let Some(request) = session.begin_opponent_turn() {
//!     let service = Arc::clone(&service);
//!     let ticket = request.ticket;
//!     let handle = tokio::spawn(async move {
//!         request.acquire(service.as_ref()).await
//!     });
//!     match handle.await {
//!         Ok(result) => session.resolve_opponent_turn(ticket, result),
//!         // The task died: give the turn back so it can be retried
//!         Err(_) => session.abandon_opponent_turn(ticket),
//!     };
//! }
//! ```

use crate::game::ai::{
    acquire_move, explain_move, suggest_move, AIDifficulty, AcquiredMove, MoveService,
    OpponentConfig, Suggestion,
};
use crate::game::error::{GameError, GameResult};
use crate::game::notation::{resolve_token, MoveToken};
use crate::game::resources::{
    pair_flat_history, status_message, GameOverState, HistoryEntry, OpponentTicket,
    PendingOpponentMove, Selection, TurnPhase,
};
use crate::game::rules::{RulesEngine, StandardRules};
use crate::game::types::{BoardGrid, GameStatus, Move, Piece, PieceColor, Square};
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// What a square selection did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// Dropped: wrong phase, not the human's turn, or nothing to select
    Ignored,
    /// A piece of the side to move is now selected
    Selected(Square),
    /// The selection was cleared without moving
    Deselected,
    /// A move was applied
    Moved(Move),
    /// The rules engine refused a move it had reported as legal
    Rejected,
}

/// A snapshot handed to whoever performs the opponent's move acquisition
///
/// Owns everything it needs, so it can be moved into a spawned task.
pub struct OpponentRequest<R: RulesEngine> {
    pub ticket: OpponentTicket,
    rules: R,
    position: R::Position,
    difficulty: AIDifficulty,
    explain: bool,
    timeout: Duration,
}

impl<R: RulesEngine> OpponentRequest<R> {
    /// Run one acquisition attempt against `service`
    pub async fn acquire(
        &self,
        service: &dyn MoveService,
    ) -> GameResult<AcquiredMove<R::Position>> {
        acquire_move(
            &self.rules,
            &self.position,
            service,
            self.difficulty,
            self.explain,
            self.timeout,
        )
        .await
    }
}

/// One game between the human and the move service
pub struct GameSession<R: RulesEngine = StandardRules> {
    id: Uuid,
    rules: R,
    position: R::Position,
    config: OpponentConfig,
    phase: TurnPhase,
    selection: Selection,
    last_move: Option<Move>,
    last_error: Option<GameError>,
    explanation: Option<String>,
    pending: PendingOpponentMove,
    /// Bumped by `reset()` so tickets from an abandoned game are refused
    generation: u64,
    /// Bumped by every opponent request
    sequence: u64,
}

impl GameSession<StandardRules> {
    /// Standard chess with the default opponent configuration
    pub fn new() -> Self {
        Self::with_config(StandardRules::new(), OpponentConfig::default())
    }
}

impl Default for GameSession<StandardRules> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RulesEngine> GameSession<R> {
    pub fn with_config(rules: R, config: OpponentConfig) -> Self {
        let position = rules.start_position();
        let mut session = Self {
            id: Uuid::new_v4(),
            rules,
            position,
            config,
            phase: TurnPhase::Idle,
            selection: Selection::default(),
            last_move: None,
            last_error: None,
            explanation: None,
            pending: PendingOpponentMove::default(),
            generation: 0,
            sequence: 0,
        };
        info!(
            session = %session.id,
            "[SESSION] New game: human plays {}, opponent at {} difficulty",
            session.human_color().name(),
            session.config.difficulty
        );
        session.hand_turn_to_opponent_if_due();
        session
    }

    // ------------------------------------------------------------------
    // Human input
    // ------------------------------------------------------------------

    /// Handle a click (or typed square) on `square`
    ///
    /// In `Idle`, selecting a piece of the human's color on the human's turn
    /// selects it. In `PieceSelected`, the same square deselects, a legal
    /// destination moves, another own piece re-selects and anything else
    /// deselects. In every other phase the event is dropped.
    pub fn select_or_act(&mut self, square: Square) -> SelectionOutcome {
        if !self.phase.accepts_input() {
            debug!(session = %self.id, "[INPUT] Ignoring {} while {:?}", square, self.phase);
            return SelectionOutcome::Ignored;
        }
        if self.rules.turn(&self.position) != self.human_color() {
            debug!(session = %self.id, "[INPUT] Ignoring {}: not the human's turn", square);
            return SelectionOutcome::Ignored;
        }

        match self.phase {
            TurnPhase::PieceSelected => self.act_on_selection(square),
            _ => {
                if self.try_select(square) {
                    SelectionOutcome::Selected(square)
                } else {
                    SelectionOutcome::Ignored
                }
            }
        }
    }

    fn act_on_selection(&mut self, square: Square) -> SelectionOutcome {
        let Some(from) = self.selection.selected_square else {
            self.phase.transition_to(TurnPhase::Idle);
            return SelectionOutcome::Ignored;
        };

        if square == from {
            debug!(session = %self.id, "[INPUT] Deselected {}", from);
            self.clear_selection();
            return SelectionOutcome::Deselected;
        }

        if self.selection.is_target(square) {
            return self.apply_human_move(from, square);
        }

        if self.try_select(square) {
            return SelectionOutcome::Selected(square);
        }

        debug!(session = %self.id, "[INPUT] {} is not a destination of {}", square, from);
        self.clear_selection();
        SelectionOutcome::Deselected
    }

    /// Select `square` if it holds a piece of the human's color
    ///
    /// A piece with no legal moves is still selected, with no targets.
    fn try_select(&mut self, square: Square) -> bool {
        let own = self
            .rules
            .piece_at(&self.position, square)
            .is_some_and(|piece| piece.color == self.human_color());
        if !own {
            return false;
        }

        let targets = self.rules.legal_destinations(&self.position, square);
        debug!(
            session = %self.id,
            "[INPUT] Selected {} with {} legal destinations",
            square,
            targets.len()
        );
        self.selection.select(square, targets);
        self.phase.transition_to(TurnPhase::PieceSelected);
        true
    }

    fn clear_selection(&mut self) {
        self.selection.clear();
        self.phase.transition_to(TurnPhase::Idle);
    }

    fn apply_human_move(&mut self, from: Square, to: Square) -> SelectionOutcome {
        // Pawns reaching the back rank become queens
        let token = MoveToken::Coordinate {
            from,
            to,
            promotion: None,
        };
        let promotion = resolve_token(&self.rules.legal_moves(&self.position), &token)
            .and_then(|m| m.promotion);

        match self.rules.apply_move(&self.position, from, to, promotion) {
            Some((next, notation)) => {
                info!(session = %self.id, "[INPUT] Human plays {}", notation);
                let mv = Move::new(from, to, promotion).with_notation(notation);
                self.position = next;
                self.last_move = Some(mv.clone());
                self.selection.clear();
                self.after_ply();
                SelectionOutcome::Moved(mv)
            }
            None => {
                warn!(
                    session = %self.id,
                    "[INPUT] Rules engine rejected {}{} despite listing it as legal",
                    from,
                    to
                );
                self.clear_selection();
                SelectionOutcome::Rejected
            }
        }
    }

    /// Settle the phase after a ply has been applied
    fn after_ply(&mut self) {
        let result = self.game_result();
        if result.is_game_over() {
            info!(session = %self.id, "[SESSION] Game over: {}", result.message());
            self.phase.transition_to(TurnPhase::GameOver(result));
        } else if self.rules.turn(&self.position) == self.config.ai_color() {
            self.phase.transition_to(TurnPhase::AwaitingOpponent);
        } else {
            self.phase.transition_to(TurnPhase::Idle);
        }
    }

    fn hand_turn_to_opponent_if_due(&mut self) {
        if self.rules.turn(&self.position) == self.config.ai_color()
            && !self.game_result().is_game_over()
        {
            self.phase.transition_to(TurnPhase::AwaitingOpponent);
        }
    }

    /// Restore the starting position and forget the previous game
    ///
    /// An opponent request still in flight is abandoned: its ticket no longer
    /// matches and its result will be discarded.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.pending.take();
        self.position = self.rules.start_position();
        self.selection.clear();
        self.last_move = None;
        self.last_error = None;
        self.explanation = None;
        self.phase = TurnPhase::Idle;
        info!(session = %self.id, "[SESSION] Game reset");
        self.hand_turn_to_opponent_if_due();
    }

    // ------------------------------------------------------------------
    // Opponent turn
    // ------------------------------------------------------------------

    /// Start an opponent move acquisition
    ///
    /// Returns `None` unless the session is `AwaitingOpponent` with no request
    /// already outstanding. Clears the previous error.
    pub fn begin_opponent_turn(&mut self) -> Option<OpponentRequest<R>> {
        if !self.phase.is_awaiting_opponent() {
            return None;
        }
        let ticket = OpponentTicket {
            generation: self.generation,
            ply: self.rules.flat_history(&self.position).len(),
            sequence: self.sequence,
        };
        if !self.pending.request(ticket) {
            debug!(session = %self.id, "[AI] Opponent request already outstanding");
            return None;
        }
        self.sequence += 1;

        self.last_error = None;
        info!(
            session = %self.id,
            "[AI] Spawning opponent request for ply {} ({})",
            ticket.ply + 1,
            self.config.difficulty
        );
        Some(OpponentRequest {
            ticket,
            rules: self.rules.clone(),
            position: self.position.clone(),
            difficulty: self.config.difficulty,
            explain: self.config.teaching_mode,
            timeout: self.config.service_timeout,
        })
    }

    /// Commit or record the outcome of an acquisition
    ///
    /// Returns `true` if a move was applied. Results for a ticket that is no
    /// longer outstanding are discarded.
    pub fn resolve_opponent_turn(
        &mut self,
        ticket: OpponentTicket,
        result: GameResult<AcquiredMove<R::Position>>,
    ) -> bool {
        if !self.pending.matches(ticket) {
            warn!(session = %self.id, "[AI] Discarding stale opponent result {:?}", ticket);
            return false;
        }
        self.pending.take();

        match result {
            Ok(acquired) => {
                self.position = acquired.position;
                self.last_move = Some(acquired.mv);
                self.explanation = acquired.explanation;
                self.selection.clear();
                self.after_ply();
                true
            }
            Err(err) => {
                warn!(session = %self.id, "[AI] Opponent move failed: {}", err);
                self.last_error = Some(err);
                self.phase.transition_to(TurnPhase::Idle);
                false
            }
        }
    }

    /// Run one opponent acquisition in place
    ///
    /// `None` when no opponent move was due.
    pub async fn play_opponent_turn(
        &mut self,
        service: &dyn MoveService,
    ) -> Option<GameResult<Move>> {
        let request = self.begin_opponent_turn()?;
        let result = request.acquire(service).await;
        let outcome = result
            .as_ref()
            .map(|acquired| acquired.mv.clone())
            .map_err(|err| err.clone());
        self.resolve_opponent_turn(request.ticket, result);
        Some(outcome)
    }

    /// Give up on an outstanding request whose result will never arrive
    ///
    /// For a dropped [`OpponentRequest`] or a task that panicked. Records
    /// `ServiceUnavailable` and returns to `Idle`, from where
    /// [`retry_opponent_turn`](Self::retry_opponent_turn) asks again. Returns
    /// `false` if `ticket` is not the outstanding request.
    pub fn abandon_opponent_turn(&mut self, ticket: OpponentTicket) -> bool {
        if !self.pending.matches(ticket) {
            warn!(session = %self.id, "[AI] Ignoring abandon for stale ticket {:?}", ticket);
            return false;
        }
        self.pending.take();
        warn!(session = %self.id, "[AI] Opponent request abandoned for ply {}", ticket.ply + 1);
        self.last_error = Some(GameError::ServiceUnavailable {
            message: "opponent request was abandoned before it completed".to_string(),
        });
        self.phase.transition_to(TurnPhase::Idle);
        true
    }

    /// Hand the turn back to the opponent after a failed acquisition
    ///
    /// Nothing is retried automatically; this is the explicit way to ask
    /// again. While `AwaitingOpponent` it also drops an outstanding request,
    /// whose result will then be discarded. Returns `false` when it is not
    /// the opponent's turn.
    pub fn retry_opponent_turn(&mut self) -> bool {
        if self.rules.turn(&self.position) != self.config.ai_color() {
            return false;
        }
        match self.phase {
            TurnPhase::Idle => {
                info!(session = %self.id, "[AI] Retrying opponent move");
                self.phase.transition_to(TurnPhase::AwaitingOpponent);
                true
            }
            TurnPhase::AwaitingOpponent => {
                if let Some(ticket) = self.pending.take() {
                    warn!(session = %self.id, "[AI] Dropping outstanding request {:?}", ticket);
                }
                true
            }
            _ => false,
        }
    }

    // ------------------------------------------------------------------
    // Advisory
    // ------------------------------------------------------------------

    /// Ask the service to explain the last move played
    ///
    /// `Ok(None)` when no move has been played yet. Never changes the game.
    pub async fn explain_last_move(
        &self,
        service: &dyn MoveService,
    ) -> GameResult<Option<String>> {
        let Some(notation) = self.last_move.as_ref().and_then(|m| m.notation.clone()) else {
            return Ok(None);
        };
        explain_move(
            &self.rules,
            &self.position,
            service,
            &notation,
            self.config.difficulty,
            self.config.service_timeout,
        )
        .await
        .map(Some)
    }

    /// Ask the service to suggest a move for the side to move
    pub async fn suggest_move(&self, service: &dyn MoveService) -> GameResult<Suggestion> {
        suggest_move(
            &self.rules,
            &self.position,
            service,
            self.config.difficulty,
            self.config.service_timeout,
        )
        .await
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn rules(&self) -> &R {
        &self.rules
    }

    pub fn position(&self) -> &R::Position {
        &self.position
    }

    pub fn board(&self) -> BoardGrid {
        self.rules.board(&self.position)
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.rules.piece_at(&self.position, square)
    }

    /// Position encoding (FEN)
    pub fn fen(&self) -> String {
        self.rules.encode(&self.position)
    }

    pub fn status(&self) -> GameStatus {
        self.rules.status(&self.position)
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        pair_flat_history(&self.rules.flat_history(&self.position))
    }

    pub fn game_result(&self) -> GameOverState {
        GameOverState::from_status(
            &self.status(),
            self.rules.is_insufficient_material(&self.position),
        )
    }

    pub fn status_message(&self) -> String {
        status_message(&self.status())
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn is_awaiting_opponent(&self) -> bool {
        self.phase.is_awaiting_opponent()
    }

    pub fn last_error(&self) -> Option<&GameError> {
        self.last_error.as_ref()
    }

    pub fn last_move(&self) -> Option<&Move> {
        self.last_move.as_ref()
    }

    /// Rationale attached to the opponent's last move, if any
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    pub fn dismiss_explanation(&mut self) {
        self.explanation = None;
    }

    pub fn config(&self) -> &OpponentConfig {
        &self.config
    }

    pub fn human_color(&self) -> PieceColor {
        self.config.human_color()
    }

    /// Takes effect on the next opponent request
    pub fn set_difficulty(&mut self, difficulty: AIDifficulty) {
        info!(session = %self.id, "[SESSION] Difficulty set to {}", difficulty);
        self.config.difficulty = difficulty;
    }

    /// Takes effect on the next opponent request
    pub fn set_teaching_mode(&mut self, enabled: bool) {
        info!(session = %self.id, "[SESSION] Teaching mode {}", if enabled { "on" } else { "off" });
        self.config.teaching_mode = enabled;
    }
}
