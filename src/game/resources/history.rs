//! Ply-paired move list
//!
//! The rules engine keeps a flat list of SAN strings; presentation wants
//! "1. e4 e5 / 2. Nf3 ...". The pairing is recomputed from the flat list on
//! every read, so there is no second copy to drift out of sync.

/// One full move: White's ply and, once played, Black's reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Full-move number, starting at 1
    pub ply_number: u32,
    pub white_notation: Option<String>,
    pub black_notation: Option<String>,
}

/// Pair a flat SAN list into full moves
///
/// # Examples
///
/// ```rust,ignore
/// let flat = vec!["e4".to_string(), "e5".to_string(), "Nf3".to_string()];
/// let history = pair_flat_history(&flat);
/// assert_eq!(history.len(), 2);
/// assert_eq!(history[1].black_notation, None);
/// ```
pub fn pair_flat_history(flat: &[String]) -> Vec<HistoryEntry> {
    flat.chunks(2)
        .enumerate()
        .map(|(index, pair)| HistoryEntry {
            ply_number: index as u32 + 1,
            white_notation: pair.first().cloned(),
            black_notation: pair.get(1).cloned(),
        })
        .collect()
}
