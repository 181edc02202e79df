/// Identifies one opponent request
///
/// A ticket is only honoured while the session is still in the game and at
/// the ply it was issued for; `reset()` bumps the generation so late answers
/// from an abandoned game are dropped. `sequence` tells apart repeated
/// requests for the same ply after one was abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OpponentTicket {
    pub generation: u64,
    pub ply: usize,
    pub sequence: u64,
}

#[derive(Debug, Default)]
pub struct PendingOpponentMove {
    pending: Option<OpponentTicket>,
}

impl PendingOpponentMove {
    pub fn request(&mut self, ticket: OpponentTicket) -> bool {
        if self.pending.is_some() {
            return false;
        }
        self.pending = Some(ticket);
        true
    }

    pub fn take(&mut self) -> Option<OpponentTicket> {
        self.pending.take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Whether `ticket` is the outstanding request
    pub fn matches(&self, ticket: OpponentTicket) -> bool {
        self.pending == Some(ticket)
    }
}
