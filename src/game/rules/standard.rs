//! Standard chess rules backed by `shakmaty`
//!
//! `shakmaty` tracks everything FIDE needs except the move record and the
//! repetition count, so [`ChessPosition`] carries both alongside the board.

use super::RulesEngine;
use crate::game::types::{
    File, GameStatus, Move, Piece, PieceColor, PieceType, Rank, Square,
};
use shakmaty::fen::Fen;
use shakmaty::san::SanPlus;
use shakmaty::uci::UciMove;
use shakmaty::{CastlingMode, Chess, Color, EnPassantMode, Position, Role};
use std::collections::BTreeSet;

/// Halfmove clock value at which the fifty-move rule applies
const FIFTY_MOVE_HALFMOVES: u32 = 100;

/// Occurrences of one position that make a threefold repetition
const REPETITION_LIMIT: usize = 3;

/// Position value produced by [`StandardRules`]
#[derive(Debug, Clone)]
pub struct ChessPosition {
    chess: Chess,
    sans: Vec<String>,
    /// Repetition keys of every position reached, current one included
    seen: Vec<String>,
}

impl ChessPosition {
    fn start() -> Self {
        let chess = Chess::default();
        let key = repetition_key(&chess);
        Self {
            chess,
            sans: Vec::new(),
            seen: vec![key],
        }
    }

    fn repetitions(&self) -> usize {
        self.seen
            .last()
            .map(|current| self.seen.iter().filter(|key| *key == current).count())
            .unwrap_or(0)
    }
}

/// Rules engine for standard chess
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardRules;

impl StandardRules {
    pub fn new() -> Self {
        Self
    }

    /// Set up a position from FEN; the move record starts empty
    pub fn position_from_fen(&self, fen: &str) -> Option<ChessPosition> {
        let chess: Chess = fen
            .parse::<Fen>()
            .ok()?
            .into_position(CastlingMode::Standard)
            .ok()?;
        let key = repetition_key(&chess);
        Some(ChessPosition {
            chess,
            sans: Vec::new(),
            seen: vec![key],
        })
    }

    /// Legal moves paired with the `shakmaty` move they came from
    fn generate(&self, position: &ChessPosition) -> Vec<(Move, shakmaty::Move)> {
        position
            .chess
            .legal_moves()
            .into_iter()
            .filter_map(|m| {
                let UciMove::Normal {
                    from,
                    to,
                    promotion,
                } = m.to_uci(CastlingMode::Standard)
                else {
                    return None;
                };
                let mut after = position.chess.clone();
                let san = SanPlus::from_move_and_play_unchecked(&mut after, &m);
                let mv = Move::new(
                    from_shakmaty_square(from)?,
                    from_shakmaty_square(to)?,
                    promotion.map(from_role),
                )
                .with_notation(san.to_string());
                Some((mv, m))
            })
            .collect()
    }
}

impl RulesEngine for StandardRules {
    type Position = ChessPosition;

    fn start_position(&self) -> ChessPosition {
        ChessPosition::start()
    }

    fn legal_destinations(&self, position: &ChessPosition, from: Square) -> BTreeSet<Square> {
        self.generate(position)
            .into_iter()
            .filter(|(mv, _)| mv.from == from)
            .map(|(mv, _)| mv.to)
            .collect()
    }

    fn legal_moves(&self, position: &ChessPosition) -> Vec<Move> {
        self.generate(position).into_iter().map(|(mv, _)| mv).collect()
    }

    fn apply_move(
        &self,
        position: &ChessPosition,
        from: Square,
        to: Square,
        promotion: Option<PieceType>,
    ) -> Option<(ChessPosition, String)> {
        let candidates: Vec<(Move, shakmaty::Move)> = self
            .generate(position)
            .into_iter()
            .filter(|(mv, _)| mv.from == from && mv.to == to)
            .collect();

        let wanted = match promotion {
            Some(promo) => Some(promo),
            None if candidates.iter().any(|(mv, _)| mv.promotion.is_some()) => {
                Some(PieceType::Queen)
            }
            None => None,
        };
        let (_, chosen) = candidates
            .into_iter()
            .find(|(mv, _)| mv.promotion == wanted)?;

        let mut chess = position.chess.clone();
        let san = SanPlus::from_move_and_play_unchecked(&mut chess, &chosen).to_string();

        let mut next = ChessPosition {
            seen: position.seen.clone(),
            sans: position.sans.clone(),
            chess,
        };
        next.sans.push(san.clone());
        next.seen.push(repetition_key(&next.chess));
        Some((next, san))
    }

    fn status(&self, position: &ChessPosition) -> GameStatus {
        let chess = &position.chess;
        let is_checkmate = chess.is_checkmate();
        let is_stalemate = chess.is_stalemate();
        let is_draw = is_stalemate
            || chess.is_insufficient_material()
            || chess.halfmoves() >= FIFTY_MOVE_HALFMOVES
            || position.repetitions() >= REPETITION_LIMIT;

        GameStatus {
            in_check: chess.is_check(),
            is_checkmate,
            is_stalemate,
            is_draw: is_draw && !is_checkmate,
            turn: from_color(chess.turn()),
        }
    }

    fn encode(&self, position: &ChessPosition) -> String {
        Fen::from_position(position.chess.clone(), EnPassantMode::Legal).to_string()
    }

    fn flat_history(&self, position: &ChessPosition) -> Vec<String> {
        position.sans.clone()
    }

    fn piece_at(&self, position: &ChessPosition, square: Square) -> Option<Piece> {
        let piece = position.chess.board().piece_at(to_shakmaty_square(square))?;
        Some(Piece {
            kind: from_role(piece.role),
            color: from_color(piece.color),
        })
    }

    fn turn(&self, position: &ChessPosition) -> PieceColor {
        from_color(position.chess.turn())
    }

    fn is_insufficient_material(&self, position: &ChessPosition) -> bool {
        position.chess.is_insufficient_material()
    }
}

/// FEN without the move counters, so equal placements compare equal
fn repetition_key(chess: &Chess) -> String {
    let fen = Fen::from_position(chess.clone(), EnPassantMode::Legal).to_string();
    fen.split_whitespace().take(4).collect::<Vec<_>>().join(" ")
}

fn to_shakmaty_square(square: Square) -> shakmaty::Square {
    shakmaty::Square::from_coords(
        shakmaty::File::new(u32::from(square.file.index())),
        shakmaty::Rank::new(u32::from(square.rank.index())),
    )
}

fn from_shakmaty_square(square: shakmaty::Square) -> Option<Square> {
    Some(Square {
        file: File::from_char(square.file().char())?,
        rank: Rank::from_char(square.rank().char())?,
    })
}

fn from_role(role: Role) -> PieceType {
    match role {
        Role::Pawn => PieceType::Pawn,
        Role::Knight => PieceType::Knight,
        Role::Bishop => PieceType::Bishop,
        Role::Rook => PieceType::Rook,
        Role::Queen => PieceType::Queen,
        Role::King => PieceType::King,
    }
}

fn from_color(color: Color) -> PieceColor {
    match color {
        Color::White => PieceColor::White,
        Color::Black => PieceColor::Black,
    }
}
