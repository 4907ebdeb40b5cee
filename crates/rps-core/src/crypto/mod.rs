//! Commitment scheme for the asymmetric commit-reveal protocol.
//!
//! - Secret: the starter's private 32-byte blinding value
//! - MoveCommitment: H(domain || secret || move || identity)
//! - derive_match_id: H(domain || secret || identity)

mod commitment;

pub use commitment::{derive_match_id, derive_move_commitment, MoveCommitment, Secret};
