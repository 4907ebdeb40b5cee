//! Rock-Paper-Scissors resolution rule.

use crate::error::MatchError;
use crate::machine::Payout;
use crate::protocol::Address;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rock-Paper-Scissors move. Wire code is 1..=3; 0 means "no move".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum Move {
    Rock = 1,
    Paper = 2,
    Scissors = 3,
}

impl Move {
    pub const ALL: [Move; 3] = [Move::Rock, Move::Paper, Move::Scissors];

    /// Numeric wire code
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Check if this move beats the other
    pub fn beats(self, other: Move) -> bool {
        resolve(self, other) == Outcome::StarterWins
    }

    /// Parse a wire code of any width; anything but 1..=3 is rejected.
    pub fn from_code(code: i64) -> Result<Self, MatchError> {
        match code {
            1 => Ok(Move::Rock),
            2 => Ok(Move::Paper),
            3 => Ok(Move::Scissors),
            other => Err(MatchError::InvalidMove(other)),
        }
    }

    fn index(self) -> usize {
        match self {
            Move::Rock => 0,
            Move::Paper => 1,
            Move::Scissors => 2,
        }
    }
}

impl TryFrom<u8> for Move {
    type Error = MatchError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Move::from_code(i64::from(code))
    }
}

impl From<Move> for u8 {
    fn from(mv: Move) -> u8 {
        mv.code()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Rock => write!(f, "Rock"),
            Move::Paper => write!(f, "Paper"),
            Move::Scissors => write!(f, "Scissors"),
        }
    }
}

/// Result of comparing the starter's revealed move with the joiner's move
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    StarterWins,
    JoinerWins,
    Tie,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::StarterWins => "starter wins",
            Outcome::JoinerWins => "joiner wins",
            Outcome::Tie => "tie",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

use Outcome::{JoinerWins as J, StarterWins as S, Tie as T};

/// Rows: starter move, columns: joiner move (Rock, Paper, Scissors).
const OUTCOMES: [[Outcome; 3]; 3] = [
    // Rock:      R  P  S
    [T, J, S],
    // Paper:
    [S, T, J],
    // Scissors:
    [J, S, T],
];

/// Decide a match by table lookup.
pub fn resolve(starter: Move, joiner: Move) -> Outcome {
    OUTCOMES[starter.index()][joiner.index()]
}

/// Split the pot according to `outcome`.
///
/// A tie returns each party's original stake (half the pot); otherwise the
/// winner takes the whole pot and the loser receives nothing.
pub fn settle(outcome: Outcome, pot: u64, starter: Address, joiner: Address) -> Vec<Payout> {
    match outcome {
        Outcome::Tie => {
            let half = pot / 2;
            vec![
                Payout {
                    to: starter,
                    amount: half,
                },
                Payout {
                    to: joiner,
                    amount: pot - half,
                },
            ]
        }
        Outcome::StarterWins => vec![Payout {
            to: starter,
            amount: pot,
        }],
        Outcome::JoinerWins => vec![Payout {
            to: joiner,
            amount: pot,
        }],
    }
}
