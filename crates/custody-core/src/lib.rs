//! Custody Core Library
//!
//! Shared value-custody primitives for stake-backed games:
//! - Account identities (Address) and their hex encoding
//! - Custody trait, payouts and the in-memory InMemoryCustody ledger

pub mod account;
pub mod encoding;
pub mod ledger;

pub use account::Address;
pub use encoding::HexError;
pub use ledger::{Custody, CustodyError, InMemoryCustody, Payout, Receipt};
