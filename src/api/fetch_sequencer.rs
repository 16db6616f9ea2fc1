use std::fmt;

use crate::error::TabularError;

/// Sequence number handed out when a fetch starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    #[must_use]
    pub fn sequence(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Orders the fetches of one view state.
///
/// Only the completion of the most recently issued ticket may be applied, and
/// only once, so a slow or replayed response can never overwrite the result
/// of a newer request.
#[derive(Debug, Clone, Default)]
pub struct FetchSequencer {
    latest: u64,
    completed: u64,
}

impl FetchSequencer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self) -> RequestTicket {
        self.latest += 1;
        RequestTicket(self.latest)
    }

    #[must_use]
    pub fn is_latest(&self, ticket: RequestTicket) -> bool {
        ticket.0 == self.latest
    }

    /// Claims `ticket` for completion.
    ///
    /// Returns `false` when a newer ticket was issued or `ticket` was already
    /// completed.
    pub fn complete(&mut self, ticket: RequestTicket) -> bool {
        if ticket.0 != self.latest || ticket.0 <= self.completed {
            return false;
        }
        self.completed = ticket.0;
        true
    }

    /// Latest ticket issued, if any.
    #[must_use]
    pub fn latest(&self) -> Option<RequestTicket> {
        (self.latest > 0).then_some(RequestTicket(self.latest))
    }
}

/// What happened to a completed fetch.
#[derive(Debug)]
pub enum FetchOutcome {
    /// The result replaced the view's data.
    Applied { row_count: usize },
    /// A newer fetch was issued meanwhile, or the ticket was already
    /// completed; the result was dropped.
    Superseded {
        ticket: RequestTicket,
        latest: RequestTicket,
    },
    /// The fetch failed; the view keeps its previous data.
    Failed(TabularError),
}

impl FetchOutcome {
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }

    #[must_use]
    pub fn is_superseded(&self) -> bool {
        matches!(self, Self::Superseded { .. })
    }

    #[must_use]
    pub fn error(&self) -> Option<&TabularError> {
        match self {
            Self::Failed(error) => Some(error),
            _ => None,
        }
    }
}
