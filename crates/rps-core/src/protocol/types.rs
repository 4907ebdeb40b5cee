//! Protocol types.

use crate::crypto::MoveCommitment;
use crate::games::Move;
use custody_core::encoding::{self, HexError};
use custody_core::Address;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 256-bit match identifier, chosen by the starter
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(#[serde(with = "encoding::hex_array")] [u8; 32]);

impl MatchId {
    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl FromStr for MatchId {
    type Err = HexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(encoding::parse_hex(s)?))
    }
}

impl fmt::Debug for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MatchId({})", hex::encode(&self.0[..8]))
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", encoding::to_hex(&self.0))
    }
}

/// The party who matched the starter's stake, and their move in the clear
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opponent {
    pub address: Address,
    #[serde(rename = "move")]
    pub mv: Move,
}

/// Lifecycle phase of a live match
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPhase {
    /// Started, waiting for an opponent
    Started,
    /// Joined, waiting for the starter's reveal
    Joined,
}

/// A live match record
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub commitment: MoveCommitment,
    pub starter: Address,
    /// Set exactly when the match has been joined
    pub opponent: Option<Opponent>,
    /// Value held for this match: the starter's stake, then the full pot once joined
    pub stake: u64,
    /// Clock value from which an unjoined match may be forfeited
    pub deadline: u64,
}

impl Match {
    pub fn phase(&self) -> MatchPhase {
        match self.opponent {
            Some(_) => MatchPhase::Joined,
            None => MatchPhase::Started,
        }
    }

    pub fn is_joined(&self) -> bool {
        self.opponent.is_some()
    }
}

/// Flat, zero-valued view of a match slot as exposed to queries.
///
/// Absent matches read as all zeros; `joiner_move` is 0 until joined.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchView {
    pub match_id: MatchId,
    pub commitment: MoveCommitment,
    pub starter: Address,
    pub joiner: Address,
    pub joiner_move: u8,
    pub stake: u64,
    pub deadline: u64,
}

impl MatchView {
    pub fn new(match_id: MatchId, record: Option<&Match>) -> Self {
        let Some(record) = record else {
            return Self {
                match_id,
                ..Self::default()
            };
        };
        let (joiner, joiner_move) = record
            .opponent
            .map(|o| (o.address, o.mv.code()))
            .unwrap_or((Address::ZERO, 0));

        Self {
            match_id,
            commitment: record.commitment,
            starter: record.starter,
            joiner,
            joiner_move,
            stake: record.stake,
            deadline: record.deadline,
        }
    }

    /// Whether the slot is free for a new match
    pub fn is_empty(&self) -> bool {
        self.starter.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Match {
        Match {
            commitment: MoveCommitment::from_bytes([7; 32]),
            starter: Address::from_bytes([1; 20]),
            opponent: None,
            stake: 100,
            deadline: 110,
        }
    }

    #[test]
    fn test_match_phase() {
        let mut record = sample();
        assert_eq!(record.phase(), MatchPhase::Started);

        record.opponent = Some(Opponent {
            address: Address::from_bytes([2; 20]),
            mv: Move::Paper,
        });
        assert_eq!(record.phase(), MatchPhase::Joined);
        assert!(record.is_joined());
    }

    #[test]
    fn test_view_of_absent_match_is_zeroed() {
        let id = MatchId::from_bytes([9; 32]);
        let view = MatchView::new(id, None);

        assert!(view.is_empty());
        assert!(view.commitment.is_zero());
        assert!(view.joiner.is_zero());
        assert_eq!(view.joiner_move, 0);
        assert_eq!(view.stake, 0);
        assert_eq!(view.deadline, 0);
        assert_eq!(view.match_id, id);
    }

    #[test]
    fn test_view_of_joined_match() {
        let mut record = sample();
        record.opponent = Some(Opponent {
            address: Address::from_bytes([2; 20]),
            mv: Move::Scissors,
        });
        record.stake = 200;

        let view = MatchView::new(MatchId::from_bytes([9; 32]), Some(&record));

        assert_eq!(view.joiner, Address::from_bytes([2; 20]));
        assert_eq!(view.joiner_move, 3);
        assert_eq!(view.stake, 200);
    }

    #[test]
    fn test_match_id_hex_roundtrip() {
        let id = MatchId::from_bytes([0xcd; 32]);
        let json = serde_json::to_string(&id).unwrap();
        let back: MatchId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
        assert_eq!(id.to_string().parse::<MatchId>().unwrap(), id);
    }
}
