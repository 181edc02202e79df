//! Move notation extraction from free-form text
//!
//! The move service is asked to answer in coordinate form (`e2e4`) but may
//! drift into algebraic form (`Nf3`, `O-O`) or wrap the move in prose. The
//! extractor scans for coordinate form first and falls back to algebraic form,
//! returning the first match of either. It never fails on malformed input; the
//! worst case is `None`.
//!
//! [`resolve_token`] then matches an extracted token against the legal moves
//! reported by the rules engine.

use crate::game::types::{Move, PieceType, Square};
use std::fmt;
use std::ops::Range;

/// A move candidate found in free-form text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveToken {
    /// Origin and destination squares, e.g. `e2e4`, `e2-e4`, `e7e8q`
    Coordinate {
        from: Square,
        to: Square,
        promotion: Option<PieceType>,
    },
    /// Algebraic notation exactly as it appeared, e.g. `Nf3`, `exd5+`, `O-O`
    Algebraic(String),
}

impl MoveToken {
    /// Token for a move in coordinate form
    pub fn from_move(mv: &Move) -> Self {
        MoveToken::Coordinate {
            from: mv.from,
            to: mv.to,
            promotion: mv.promotion,
        }
    }
}

impl fmt::Display for MoveToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveToken::Coordinate {
                from,
                to,
                promotion: Some(promo),
            } => write!(f, "{}{}{}", from, to, promo.to_char()),
            MoveToken::Coordinate { from, to, .. } => write!(f, "{}{}", from, to),
            MoveToken::Algebraic(san) => f.write_str(san),
        }
    }
}

/// Extract the first move token from arbitrary text
///
/// # Examples
///
/// ```rust,ignore
/// assert_eq!(extract_move("e7e5\nDeveloping.").unwrap().to_string(), "e7e5");
/// assert_eq!(extract_move("I'll play Nf3").unwrap().to_string(), "Nf3");
/// assert!(extract_move("I am unable to comply.").is_none());
/// ```
pub fn extract_move(text: &str) -> Option<MoveToken> {
    locate_move(text).map(|(token, _)| token)
}

/// Like [`extract_move`], also returning the byte range the token occupies
pub fn locate_move(text: &str) -> Option<(MoveToken, Range<usize>)> {
    extract_coordinate(text).or_else(|| extract_algebraic(text))
}

fn extract_coordinate(text: &str) -> Option<(MoveToken, Range<usize>)> {
    let bytes = text.as_bytes();
    for start in 0..bytes.len() {
        let Some(from) = square_at(bytes, start) else {
            continue;
        };

        let mut cursor = skip_whitespace(bytes, start + 2);
        if bytes.get(cursor) == Some(&b'-') {
            cursor = skip_whitespace(bytes, cursor + 1);
        }

        if let Some(to) = square_at(bytes, cursor) {
            let (promotion, end) = match promotion_after(bytes, cursor + 2, to) {
                Some((promo, end)) => (Some(promo), end),
                None => (None, cursor + 2),
            };
            let token = MoveToken::Coordinate {
                from,
                to,
                promotion,
            };
            return Some((token, start..end));
        }
    }
    None
}

fn extract_algebraic(text: &str) -> Option<(MoveToken, Range<usize>)> {
    let bytes = text.as_bytes();
    for start in 0..bytes.len() {
        let end = match_san(bytes, start).or_else(|| match_castling(bytes, start));
        if let Some(end) = end {
            // Match boundaries sit on ASCII bytes, so slicing stays on char boundaries.
            let token = MoveToken::Algebraic(text[start..end].to_string());
            return Some((token, start..end));
        }
    }
    None
}

fn square_at(bytes: &[u8], index: usize) -> Option<Square> {
    let file = *bytes.get(index)?;
    let rank = *bytes.get(index + 1)?;
    if !is_file(file) || !is_rank(rank) {
        return None;
    }
    Square::new(file.to_ascii_lowercase() - b'a', rank - b'1')
}

fn is_file(b: u8) -> bool {
    matches!(b.to_ascii_lowercase(), b'a'..=b'h')
}

fn is_rank(b: u8) -> bool {
    matches!(b, b'1'..=b'8')
}

fn is_piece_letter(b: u8) -> bool {
    matches!(
        b.to_ascii_uppercase(),
        b'P' | b'N' | b'B' | b'R' | b'Q' | b'K'
    )
}

fn skip_whitespace(bytes: &[u8], mut index: usize) -> usize {
    while bytes.get(index).is_some_and(|b| b.is_ascii_whitespace()) {
        index += 1;
    }
    index
}

/// Optional promotion suffix (`q`, `=Q`, ...) directly after the destination
///
/// Only accepted on a back-rank destination and when the letter is not the
/// start of a longer word.
fn promotion_after(bytes: &[u8], index: usize, to: Square) -> Option<(PieceType, usize)> {
    let rank = to.rank.to_number();
    if rank != 1 && rank != 8 {
        return None;
    }
    let index = if bytes.get(index) == Some(&b'=') {
        index + 1
    } else {
        index
    };
    let promo = PieceType::from_promotion_char(*bytes.get(index)? as char)?;
    match bytes.get(index + 1) {
        Some(next) if next.is_ascii_alphabetic() => None,
        _ => Some((promo, index + 1)),
    }
}

/// Leftmost-greedy match of `[PNBRQK]?[a-h]?[1-8]?x?[a-h][1-8](=?[QRBN])?[+#]?`
///
/// Each optional part is tried taken-first, then skipped, which reproduces
/// backtracking regex semantics for this grammar. The promotion suffix uses
/// the same back-rank and word-end guard as coordinate form.
fn match_san(bytes: &[u8], start: usize) -> Option<usize> {
    let options = |index: usize, accept: fn(u8) -> bool| -> Vec<usize> {
        match bytes.get(index) {
            Some(&b) if accept(b) => vec![index + 1, index],
            _ => vec![index],
        }
    };

    for piece_end in options(start, is_piece_letter) {
        for file_end in options(piece_end, is_file) {
            for rank_end in options(file_end, is_rank) {
                for capture_end in options(rank_end, |b| b == b'x' || b == b'X') {
                    if let Some(to) = square_at(bytes, capture_end) {
                        let mut end = promotion_after(bytes, capture_end + 2, to)
                            .map_or(capture_end + 2, |(_, end)| end);
                        if matches!(bytes.get(end), Some(b'+') | Some(b'#')) {
                            end += 1;
                        }
                        return Some(end);
                    }
                }
            }
        }
    }
    None
}

fn match_castling(bytes: &[u8], start: usize) -> Option<usize> {
    ["O-O-O", "O-O"].iter().find_map(|token| {
        let end = start + token.len();
        let candidate = bytes.get(start..end)?;
        candidate
            .eq_ignore_ascii_case(token.as_bytes())
            .then_some(end)
    })
}

/// Match a token against the legal moves of the current position
///
/// Coordinate tokens match on squares; a missing promotion letter defaults to
/// a queen. Algebraic tokens match on SAN with check markers ignored, exact
/// case first, then a unique case-insensitive match. An algebraic promotion
/// names its piece; only a bare back-rank destination defaults to a queen.
pub fn resolve_token(legal: &[Move], token: &MoveToken) -> Option<Move> {
    match token {
        MoveToken::Coordinate {
            from,
            to,
            promotion,
        } => {
            let candidates: Vec<&Move> = legal
                .iter()
                .filter(|m| m.from == *from && m.to == *to)
                .collect();
            let chosen = match promotion {
                Some(promo) => candidates
                    .iter()
                    .find(|m| m.promotion == Some(*promo))
                    .copied(),
                None => candidates
                    .iter()
                    .find(|m| m.promotion.is_none())
                    .or_else(|| {
                        candidates
                            .iter()
                            .find(|m| m.promotion == Some(PieceType::Queen))
                    })
                    .copied(),
            };
            chosen.cloned()
        }
        MoveToken::Algebraic(text) => resolve_san(legal, text),
    }
}

fn resolve_san(legal: &[Move], text: &str) -> Option<Move> {
    let wanted = normalize_san(text);
    let san_of = |m: &Move| m.notation.as_deref().map(normalize_san);

    if let Some(found) = legal.iter().find(|m| san_of(m).as_deref() == Some(&wanted)) {
        return Some(found.clone());
    }

    let folded: Vec<&Move> = legal
        .iter()
        .filter(|m| {
            san_of(m)
                .map(|san| san.eq_ignore_ascii_case(&wanted))
                .unwrap_or(false)
        })
        .collect();
    if let [only] = folded.as_slice() {
        return Some((*only).clone());
    }

    // "e8" for a pawn reaching the back rank: take the queen promotion.
    if wanted.contains('=') {
        return None;
    }
    legal
        .iter()
        .find(|m| {
            m.promotion == Some(PieceType::Queen)
                && san_of(m)
                    .and_then(|san| san.strip_suffix("=Q").map(str::to_string))
                    .is_some_and(|base| base == wanted)
        })
        .cloned()
}

/// Canonical comparison form: no check marker, uppercase castling and
/// promotions spelled `=Q`
fn normalize_san(san: &str) -> String {
    let trimmed = san.trim().trim_end_matches(['+', '#']);
    if trimmed.eq_ignore_ascii_case("O-O") || trimmed.eq_ignore_ascii_case("O-O-O") {
        return trimmed.to_ascii_uppercase();
    }

    let bytes = trimmed.as_bytes();
    if let [.., rank, last] = bytes {
        let promo = PieceType::from_promotion_char(*last as char);
        if promo.is_some() && matches!(*rank, b'1' | b'8' | b'=') {
            let base = trimmed[..trimmed.len() - 1].trim_end_matches('=');
            return format!("{}={}", base, last.to_ascii_uppercase() as char);
        }
    }
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn coordinate(from: &str, to: &str) -> MoveToken {
        MoveToken::Coordinate {
            from: sq(from),
            to: sq(to),
            promotion: None,
        }
    }

    // ============================================================================
    // Coordinate form
    // ============================================================================

    #[test]
    fn test_plain_coordinate_move() {
        assert_eq!(extract_move("e2e4"), Some(coordinate("e2", "e4")));
    }

    #[test]
    fn test_coordinate_with_separators() {
        assert_eq!(extract_move("e2-e4"), Some(coordinate("e2", "e4")));
        assert_eq!(extract_move("e2 e4"), Some(coordinate("e2", "e4")));
        assert_eq!(extract_move("g1 - f3"), Some(coordinate("g1", "f3")));
    }

    #[test]
    fn test_coordinate_is_case_insensitive() {
        let token = extract_move("My move: E7E5").unwrap();
        assert_eq!(token, coordinate("e7", "e5"));
        assert_eq!(token.to_string(), "e7e5");
    }

    #[test]
    fn test_coordinate_inside_prose() {
        //! The service often wraps the move in a sentence
        let text = "After careful thought, I will play g8f6 to develop.";
        assert_eq!(extract_move(text), Some(coordinate("g8", "f6")));
    }

    #[test]
    fn test_first_line_move_with_explanation() {
        let text = "e7e5\nDeveloping the center pawn.";
        assert_eq!(extract_move(text), Some(coordinate("e7", "e5")));
    }

    #[test]
    fn test_coordinate_promotion() {
        let token = extract_move("a7a8q").unwrap();
        assert_eq!(
            token,
            MoveToken::Coordinate {
                from: sq("a7"),
                to: sq("a8"),
                promotion: Some(PieceType::Queen),
            }
        );
        assert_eq!(token.to_string(), "a7a8q");

        let token = extract_move("b2b1=N").unwrap();
        assert_eq!(token.to_string(), "b2b1n");
    }

    #[test]
    fn test_promotion_letter_needs_back_rank_and_word_end() {
        assert_eq!(extract_move("e2e4b"), Some(coordinate("e2", "e4")));
        assert_eq!(extract_move("a7a8 queen"), Some(coordinate("a7", "a8")));
        assert_eq!(extract_move("a7a8queen"), Some(coordinate("a7", "a8")));
    }

    // ============================================================================
    // Algebraic fallback
    // ============================================================================

    #[test]
    fn test_algebraic_piece_move() {
        assert_eq!(
            extract_move("I'll play Nf3."),
            Some(MoveToken::Algebraic("Nf3".to_string()))
        );
    }

    #[test]
    fn test_algebraic_pawn_and_capture() {
        assert_eq!(
            extract_move("e4"),
            Some(MoveToken::Algebraic("e4".to_string()))
        );
        assert_eq!(
            extract_move("Best is Bxc6+ winning"),
            Some(MoveToken::Algebraic("Bxc6+".to_string()))
        );
        assert_eq!(
            extract_move("Qh7#"),
            Some(MoveToken::Algebraic("Qh7#".to_string()))
        );
    }

    #[test]
    fn test_algebraic_disambiguation() {
        assert_eq!(
            extract_move("Nbd7"),
            Some(MoveToken::Algebraic("Nbd7".to_string()))
        );
        assert_eq!(
            extract_move("R1e2"),
            Some(MoveToken::Algebraic("R1e2".to_string()))
        );
    }

    #[test]
    fn test_algebraic_promotion_keeps_piece() {
        assert_eq!(
            extract_move("I promote: f8=N"),
            Some(MoveToken::Algebraic("f8=N".to_string()))
        );
        assert_eq!(
            extract_move("exf8=Q+ wins"),
            Some(MoveToken::Algebraic("exf8=Q+".to_string()))
        );
        assert_eq!(
            extract_move("f8r"),
            Some(MoveToken::Algebraic("f8r".to_string()))
        );
        // A following word is prose, not a promotion letter
        assert_eq!(
            extract_move("f8 Nice"),
            Some(MoveToken::Algebraic("f8".to_string()))
        );
    }

    #[test]
    fn test_castling_tokens() {
        assert_eq!(
            extract_move("Castle: O-O-O"),
            Some(MoveToken::Algebraic("O-O-O".to_string()))
        );
        assert_eq!(
            extract_move("o-o"),
            Some(MoveToken::Algebraic("o-o".to_string()))
        );
    }

    #[test]
    fn test_locate_reports_matched_span() {
        let text = "Play E2-E4 now";
        let (token, span) = locate_move(text).unwrap();
        assert_eq!(token.to_string(), "e2e4");
        assert_eq!(&text[span], "E2-E4");

        let text = "Promote with a7a8=Q!";
        let (_, span) = locate_move(text).unwrap();
        assert_eq!(&text[span], "a7a8=Q");
    }

    #[test]
    fn test_no_move_found() {
        assert_eq!(extract_move("I am unable to comply."), None);
        assert_eq!(extract_move(""), None);
        assert_eq!(extract_move("i9j0 z"), None);
    }

    #[test]
    fn test_non_ascii_input_does_not_panic() {
        assert_eq!(extract_move("Ich spiele — Springer"), None);
        assert_eq!(
            extract_move("→ Nf3 ←"),
            Some(MoveToken::Algebraic("Nf3".to_string()))
        );
    }

    // ============================================================================
    // Resolution against legal moves
    // ============================================================================

    fn legal_fixture() -> Vec<Move> {
        vec![
            Move::new(sq("e2"), sq("e4"), None).with_notation("e4"),
            Move::new(sq("g1"), sq("f3"), None).with_notation("Nf3"),
            Move::new(sq("b2"), sq("c3"), None).with_notation("bxc3"),
            Move::new(sq("d2"), sq("c3"), None).with_notation("Bxc3+"),
            Move::new(sq("e1"), sq("g1"), None).with_notation("O-O"),
            Move::new(sq("a7"), sq("a8"), Some(PieceType::Queen)).with_notation("a8=Q"),
            Move::new(sq("a7"), sq("a8"), Some(PieceType::Knight)).with_notation("a8=N"),
        ]
    }

    #[test]
    fn test_resolve_coordinate() {
        let legal = legal_fixture();
        let resolved = resolve_token(&legal, &coordinate("g1", "f3")).unwrap();
        assert_eq!(resolved.notation.as_deref(), Some("Nf3"));
        assert!(resolve_token(&legal, &coordinate("e2", "e5")).is_none());
    }

    #[test]
    fn test_resolve_coordinate_promotion_defaults_to_queen() {
        let legal = legal_fixture();
        let queen = resolve_token(&legal, &coordinate("a7", "a8")).unwrap();
        assert_eq!(queen.promotion, Some(PieceType::Queen));

        let knight = resolve_token(
            &legal,
            &MoveToken::Coordinate {
                from: sq("a7"),
                to: sq("a8"),
                promotion: Some(PieceType::Knight),
            },
        )
        .unwrap();
        assert_eq!(knight.promotion, Some(PieceType::Knight));
    }

    #[test]
    fn test_resolve_algebraic() {
        let legal = legal_fixture();
        let algebraic = |s: &str| MoveToken::Algebraic(s.to_string());

        assert_eq!(
            resolve_token(&legal, &algebraic("Nf3+")).unwrap().from,
            sq("g1")
        );
        assert_eq!(
            resolve_token(&legal, &algebraic("nf3")).unwrap().from,
            sq("g1")
        );
        // Exact case wins over the case-folded bishop capture.
        assert_eq!(
            resolve_token(&legal, &algebraic("bxc3")).unwrap().from,
            sq("b2")
        );
        assert_eq!(
            resolve_token(&legal, &algebraic("Bxc3")).unwrap().from,
            sq("d2")
        );
        assert_eq!(
            resolve_token(&legal, &algebraic("o-o")).unwrap().to,
            sq("g1")
        );
        assert_eq!(
            resolve_token(&legal, &algebraic("a8")).unwrap().promotion,
            Some(PieceType::Queen)
        );
        assert!(resolve_token(&legal, &algebraic("Qh5")).is_none());
    }

    #[test]
    fn test_resolve_algebraic_underpromotion() {
        //! A named promotion piece is honoured, never replaced by a queen
        let legal = legal_fixture();
        let algebraic = |s: &str| MoveToken::Algebraic(s.to_string());

        for text in ["a8=N", "a8N", "a8=n", "a8=N+"] {
            assert_eq!(
                resolve_token(&legal, &algebraic(text)).unwrap().promotion,
                Some(PieceType::Knight),
                "{text}"
            );
        }
        assert_eq!(
            resolve_token(&legal, &algebraic("a8=Q")).unwrap().promotion,
            Some(PieceType::Queen)
        );
        // Rook promotion is not in the legal list
        assert!(resolve_token(&legal, &algebraic("a8=R")).is_none());
    }

    #[test]
    fn test_coordinate_text_round_trip() {
        //! Every legal move survives coordinate text, extraction and resolution
        use crate::game::rules::{RulesEngine, StandardRules};

        let rules = StandardRules::new();
        let positions = [
            rules.start_position(),
            rules
                .position_from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1")
                .unwrap(),
            rules
                .position_from_fen("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1")
                .unwrap(),
            rules
                .position_from_fen("1n5k/P7/8/8/8/8/8/7K w - - 0 1")
                .unwrap(),
            rules
                .position_from_fen("k7/8/8/8/8/8/p7/1N5K b - - 0 1")
                .unwrap(),
        ];

        for position in &positions {
            let legal = rules.legal_moves(position);
            assert!(!legal.is_empty());
            for mv in &legal {
                let token = extract_move(&mv.coordinate_text());
                assert_eq!(token, Some(MoveToken::from_move(mv)), "{mv}");
                let resolved = resolve_token(&legal, &MoveToken::from_move(mv));
                assert_eq!(resolved.as_ref(), Some(mv), "{mv}");
            }
        }
    }
}
