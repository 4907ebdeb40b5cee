//! Protocol types and events.

mod events;
mod types;

pub use custody_core::Address;
pub use events::MatchEvent;
pub use types::{Match, MatchId, MatchPhase, MatchView, Opponent};
