//! Selection resource for tracking the selected square

use crate::game::types::Square;
use std::collections::BTreeSet;

/// Currently selected square and the destinations legal from it
///
/// `legal_targets` is whatever the rules engine reported at selection time
/// and is cleared whenever the position changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub selected_square: Option<Square>,
    pub legal_targets: BTreeSet<Square>,
}

impl Selection {
    pub fn select(&mut self, square: Square, targets: BTreeSet<Square>) {
        self.selected_square = Some(square);
        self.legal_targets = targets;
    }

    pub fn clear(&mut self) {
        self.selected_square = None;
        self.legal_targets.clear();
    }

    pub fn is_selected(&self) -> bool {
        self.selected_square.is_some()
    }

    pub fn is_target(&self, square: Square) -> bool {
        self.legal_targets.contains(&square)
    }
}
