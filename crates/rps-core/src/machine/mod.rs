//! Match store and state machine.

mod state_machine;
mod store;

pub use state_machine::MatchStateMachine;
pub use store::MatchStore;

use crate::protocol::MatchEvent;
pub use custody_core::Payout;
use serde::{Deserialize, Serialize};

/// Committed effect of a successful transition
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub event: MatchEvent,
    /// Transfers to execute after the record mutation; empty for start and join
    pub payouts: Vec<Payout>,
}

/// A transition whose payouts have been applied, with its place in commit order
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Committed {
    /// 1-based position among all committed transitions
    pub seq: u64,
    /// Clock reading at commit
    pub at: u64,
    pub transition: Transition,
}

impl Transition {
    fn event_only(event: MatchEvent) -> Self {
        Self {
            event,
            payouts: Vec::new(),
        }
    }
}
