//! RPS Escrow Core Library
//!
//! This crate provides the commitment scheme, resolution rule, match store and
//! match state machine for a two-party, stake-backed Rock-Paper-Scissors match,
//! plus the escrow boundary that ties the state machine to a value custody.

pub mod clock;
pub mod config;
pub mod crypto;
pub mod error;
pub mod escrow;
pub mod games;
pub mod machine;
pub mod protocol;

pub use clock::{Clock, TickClock, WallClock};
pub use config::{ConfigError, EscrowConfig};
pub use crypto::{derive_match_id, derive_move_commitment, MoveCommitment, Secret};
pub use error::{ErrorKind, MatchError};
pub use escrow::MatchEscrow;
pub use games::{Move, Outcome};
pub use machine::{Committed, MatchStateMachine, MatchStore, Payout, Transition};
pub use protocol::{Address, Match, MatchEvent, MatchId, MatchPhase, MatchView, Opponent};
