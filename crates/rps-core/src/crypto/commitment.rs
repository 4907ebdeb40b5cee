//! Move commitments and match-id derivation.

use crate::games::Move;
use crate::protocol::{Address, MatchId};
use custody_core::encoding::{self, HexError};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Domain separator for move commitments.
const MOVE_COMMITMENT_DOMAIN: &[u8] = b"RPS_ESCROW_MOVE_V1";

/// Domain separator for derived match identifiers.
const MATCH_ID_DOMAIN: &[u8] = b"RPS_ESCROW_MATCH_V1";

/// Secret for the commit-reveal scheme
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Secret(#[serde(with = "encoding::hex_array")] [u8; 32]);

impl Secret {
    /// Create a new random secret
    pub fn random() -> Self {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Derive a secret from an arbitrary passphrase
    pub fn from_phrase(phrase: &str) -> Self {
        Self(Sha256::digest(phrase.as_bytes()).into())
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl FromStr for Secret {
    type Err = HexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(encoding::parse_hex(s)?))
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret({}..)", hex::encode(&self.0[..4]))
    }
}

/// Commitment = H(domain || secret || move || identity)
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MoveCommitment(#[serde(with = "encoding::hex_array")] [u8; 32]);

impl MoveCommitment {
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

    /// Verify that `identity` revealing `secret` and `mv` produces this commitment
    pub fn verify(&self, secret: &Secret, mv: Move, identity: &Address) -> bool {
        *self == derive_move_commitment(secret, mv, identity)
    }
}

impl FromStr for MoveCommitment {
    type Err = HexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(encoding::parse_hex(s)?))
    }
}

impl fmt::Debug for MoveCommitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MoveCommitment({})", hex::encode(&self.0[..8]))
    }
}

impl fmt::Display for MoveCommitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", encoding::to_hex(&self.0))
    }
}

/// Bind a move to the committing party.
///
/// Pure and reproducible off-line by anyone holding the three inputs. The
/// identity is part of the preimage, so a commitment observed on the wire
/// cannot be replayed by a different caller.
pub fn derive_move_commitment(secret: &Secret, mv: Move, identity: &Address) -> MoveCommitment {
    let mut hasher = Sha256::new();
    hasher.update(MOVE_COMMITMENT_DOMAIN);
    hasher.update(secret.as_bytes());
    hasher.update([mv.code()]);
    hasher.update(identity.as_bytes());
    MoveCommitment(hasher.finalize().into())
}

/// Derive a collision-resistant match identifier for `identity`.
pub fn derive_match_id(secret: &Secret, identity: &Address) -> MatchId {
    let mut hasher = Sha256::new();
    hasher.update(MATCH_ID_DOMAIN);
    hasher.update(secret.as_bytes());
    hasher.update(identity.as_bytes());
    MatchId::from_bytes(hasher.finalize().into())
}
