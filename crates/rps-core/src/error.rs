//! Rejection reasons for match transitions.

use crate::protocol::{Address, MatchId};
use custody_core::CustodyError;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Every failed transition leaves state untouched and reports one of these.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MatchError {
    // Validation
    #[error("Match id must be non-zero")]
    ZeroMatchId,

    #[error("Commitment must be non-zero")]
    ZeroCommitment,

    #[error("Caller must be a non-zero address")]
    ZeroCaller,

    #[error("Invalid move {0}: expected 1 (Rock), 2 (Paper) or 3 (Scissors)")]
    InvalidMove(i64),

    #[error("Stake {stake} outside allowed range [{min}, {max}]")]
    StakeOutOfRange { stake: u64, min: u64, max: u64 },

    #[error("Deadline window {window} is below the minimum of {min} ticks")]
    DeadlineWindowTooShort { window: u64, min: u64 },

    #[error("Deadline window {window} overflows the clock at {now}")]
    DeadlineOverflow { now: u64, window: u64 },

    #[error("Stake {offered} does not match the required {required}")]
    StakeMismatch { offered: u64, required: u64 },

    // State conflict
    #[error("Match {0} is already in progress")]
    MatchOccupied(MatchId),

    #[error("Match {0} not found")]
    MatchNotFound(MatchId),

    #[error("Match {0} has already been joined")]
    AlreadyJoined(MatchId),

    #[error("Match {0} has not been joined yet")]
    NotJoined(MatchId),

    #[error("Pot overflow for match {0}")]
    PotOverflow(MatchId),

    // Authorization
    #[error("{caller} is not the starter of match {match_id}")]
    NotStarter { caller: Address, match_id: MatchId },

    // Cryptographic mismatch
    #[error("Revealed secret and move do not match the commitment")]
    CommitmentMismatch,

    // Timing
    #[error("Deadline {deadline} not reached (now {now})")]
    DeadlineNotReached { now: u64, deadline: u64 },

    // Value custody
    #[error(transparent)]
    Custody(#[from] CustodyError),
}

/// Failure category of a [`MatchError`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    StateConflict,
    Authorization,
    CommitmentMismatch,
    Timing,
    Custody,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::StateConflict => "state_conflict",
            ErrorKind::Authorization => "authorization",
            ErrorKind::CommitmentMismatch => "commitment_mismatch",
            ErrorKind::Timing => "timing",
            ErrorKind::Custody => "custody",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl MatchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MatchError::ZeroMatchId
            | MatchError::ZeroCommitment
            | MatchError::ZeroCaller
            | MatchError::InvalidMove(_)
            | MatchError::StakeOutOfRange { .. }
            | MatchError::DeadlineWindowTooShort { .. }
            | MatchError::DeadlineOverflow { .. }
            | MatchError::StakeMismatch { .. } => ErrorKind::Validation,
            MatchError::MatchOccupied(_)
            | MatchError::MatchNotFound(_)
            | MatchError::AlreadyJoined(_)
            | MatchError::NotJoined(_)
            | MatchError::PotOverflow(_) => ErrorKind::StateConflict,
            MatchError::NotStarter { .. } => ErrorKind::Authorization,
            MatchError::CommitmentMismatch => ErrorKind::CommitmentMismatch,
            MatchError::DeadlineNotReached { .. } => ErrorKind::Timing,
            MatchError::Custody(_) => ErrorKind::Custody,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let id = MatchId::from_bytes([1; 32]);
        assert_eq!(MatchError::InvalidMove(4).kind(), ErrorKind::Validation);
        assert_eq!(MatchError::MatchOccupied(id).kind(), ErrorKind::StateConflict);
        assert_eq!(
            MatchError::NotStarter {
                caller: Address::ZERO,
                match_id: id
            }
            .kind(),
            ErrorKind::Authorization
        );
        assert_eq!(MatchError::CommitmentMismatch.kind(), ErrorKind::CommitmentMismatch);
        assert_eq!(
            MatchError::DeadlineNotReached { now: 1, deadline: 2 }.kind(),
            ErrorKind::Timing
        );
        assert_eq!(
            MatchError::from(CustodyError::Unavailable("down".into())).kind(),
            ErrorKind::Custody
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            MatchError::StakeOutOfRange { stake: 5, min: 10, max: 20 }.to_string(),
            "Stake 5 outside allowed range [10, 20]"
        );
        assert_eq!(ErrorKind::StateConflict.to_string(), "state_conflict");
    }
}
