//! Events emitted by successful transitions.

use crate::games::Move;
use crate::protocol::{Address, MatchId};
use serde::{Deserialize, Serialize};

/// Exactly one event is emitted per successful transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum MatchEvent {
    MatchStarted {
        caller: Address,
        match_id: MatchId,
    },
    MatchJoined {
        caller: Address,
        match_id: MatchId,
        #[serde(rename = "move")]
        mv: Move,
    },
    NoWinner {
        starter: Address,
        joiner: Address,
        #[serde(rename = "move")]
        mv: Move,
    },
    WinnerIs {
        winner: Address,
        winner_move: Move,
        loser: Address,
        loser_move: Move,
    },
    ForfeitClaimed {
        caller: Address,
        match_id: MatchId,
    },
}

impl MatchEvent {
    pub fn name(&self) -> &'static str {
        match self {
            MatchEvent::MatchStarted { .. } => "MatchStarted",
            MatchEvent::MatchJoined { .. } => "MatchJoined",
            MatchEvent::NoWinner { .. } => "NoWinner",
            MatchEvent::WinnerIs { .. } => "WinnerIs",
            MatchEvent::ForfeitClaimed { .. } => "ForfeitClaimed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_is_tagged_by_name() {
        let event = MatchEvent::WinnerIs {
            winner: Address::from_bytes([2; 20]),
            winner_move: Move::Paper,
            loser: Address::from_bytes([1; 20]),
            loser_move: Move::Rock,
        };

        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["event"], "WinnerIs");
        assert_eq!(json["winner_move"], 2);
        assert_eq!(json["loser_move"], 1);
        assert_eq!(event.name(), "WinnerIs");
    }

    #[test]
    fn test_joined_event_uses_move_key() {
        let event = MatchEvent::MatchJoined {
            caller: Address::from_bytes([2; 20]),
            match_id: MatchId::from_bytes([3; 32]),
            mv: Move::Scissors,
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["move"], 3);
    }
}
