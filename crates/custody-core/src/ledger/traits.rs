//! Custody trait definition.

use crate::account::Address;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from custody operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CustodyError {
    #[error("Insufficient funds for {account}: needed {needed}, available {available}")]
    InsufficientFunds {
        account: Address,
        needed: u64,
        available: u64,
    },

    #[error("Escrow pool holds {held}, cannot release {requested}")]
    InsufficientEscrow { requested: u64, held: u64 },

    #[error("Balance overflow for {0}")]
    Overflow(Address),

    #[error("Custody backend unavailable: {0}")]
    Unavailable(String),
}

/// Value owed to an account out of the escrow pool
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    pub to: Address,
    pub amount: u64,
}

/// Record of a completed value movement
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Account the value moved from (deposit) or to (release)
    pub account: Address,
    pub amount: u64,
    /// Account balance after the movement
    pub balance_after: u64,
}

/// Trait for value custody operations
///
/// A custody holds account balances plus one shared escrow pool. Stakes move
/// from an account into the pool on deposit and out of the pool on release.
/// Implementations can be:
/// - InMemoryCustody for testing and the development service
/// - An external ledger or payment channel for production
#[async_trait]
pub trait Custody: Send + Sync {
    /// Move `amount` from `from`'s balance into the escrow pool
    async fn deposit(&self, from: &Address, amount: u64) -> Result<Receipt, CustodyError>;

    /// Move `amount` from the escrow pool to `to`'s balance
    async fn release(&self, to: &Address, amount: u64) -> Result<Receipt, CustodyError>;

    /// Apply every payout or none of them.
    ///
    /// On error the pool and all balances are left exactly as they were.
    async fn release_all(&self, payouts: &[Payout]) -> Result<Vec<Receipt>, CustodyError>;

    /// Spendable balance of an account (zero if unknown)
    async fn balance(&self, account: &Address) -> Result<u64, CustodyError>;

    /// Total value currently held in the escrow pool
    async fn escrowed(&self) -> Result<u64, CustodyError>;
}
