//! In-memory custody ledger.

use super::traits::{Custody, CustodyError, Payout, Receipt};
use crate::account::Address;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

#[derive(Default)]
struct LedgerState {
    balances: HashMap<Address, u64>,
    escrowed: u64,
}

/// In-memory custody for testing and local development
#[derive(Clone, Default)]
pub struct InMemoryCustody {
    state: Arc<Mutex<LedgerState>>,
}

impl InMemoryCustody {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with initial balances
    pub fn with_balances(balances: impl IntoIterator<Item = (Address, u64)>) -> Self {
        let custody = Self::new();
        {
            let mut state = custody.lock();
            state.balances.extend(balances);
        }
        custody
    }

    fn lock(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add funds to an account from outside the ledger
    pub fn credit(&self, account: &Address, amount: u64) -> Result<u64, CustodyError> {
        let mut state = self.lock();
        let balance = state.balances.entry(*account).or_insert(0);
        *balance = balance
            .checked_add(amount)
            .ok_or(CustodyError::Overflow(*account))?;
        Ok(*balance)
    }

    /// Current balance without going through the async trait
    pub fn balance_of(&self, account: &Address) -> u64 {
        self.lock().balances.get(account).copied().unwrap_or(0)
    }

    /// Current escrow pool without going through the async trait
    pub fn escrowed_total(&self) -> u64 {
        self.lock().escrowed
    }
}

#[async_trait]
impl Custody for InMemoryCustody {
    async fn deposit(&self, from: &Address, amount: u64) -> Result<Receipt, CustodyError> {
        let mut state = self.lock();
        let available = state.balances.get(from).copied().unwrap_or(0);
        if available < amount {
            return Err(CustodyError::InsufficientFunds {
                account: *from,
                needed: amount,
                available,
            });
        }
        let escrowed = state
            .escrowed
            .checked_add(amount)
            .ok_or(CustodyError::Overflow(*from))?;

        let balance_after = available - amount;
        state.balances.insert(*from, balance_after);
        state.escrowed = escrowed;
        debug!(account = %from, amount, escrowed, "deposited into escrow");

        Ok(Receipt {
            account: *from,
            amount,
            balance_after,
        })
    }

    async fn release(&self, to: &Address, amount: u64) -> Result<Receipt, CustodyError> {
        let mut state = self.lock();
        if state.escrowed < amount {
            return Err(CustodyError::InsufficientEscrow {
                requested: amount,
                held: state.escrowed,
            });
        }
        let current = state.balances.get(to).copied().unwrap_or(0);
        let balance_after = current
            .checked_add(amount)
            .ok_or(CustodyError::Overflow(*to))?;

        state.escrowed -= amount;
        state.balances.insert(*to, balance_after);
        debug!(account = %to, amount, escrowed = state.escrowed, "released from escrow");

        Ok(Receipt {
            account: *to,
            amount,
            balance_after,
        })
    }

    async fn release_all(&self, payouts: &[Payout]) -> Result<Vec<Receipt>, CustodyError> {
        let mut state = self.lock();
        let requested = payouts
            .iter()
            .fold(0u64, |total, p| total.saturating_add(p.amount));
        if state.escrowed < requested {
            return Err(CustodyError::InsufficientEscrow {
                requested,
                held: state.escrowed,
            });
        }

        // Stage every new balance before touching the ledger
        let mut staged: HashMap<Address, u64> = HashMap::new();
        let mut receipts = Vec::with_capacity(payouts.len());
        for payout in payouts {
            let current = staged
                .get(&payout.to)
                .or_else(|| state.balances.get(&payout.to))
                .copied()
                .unwrap_or(0);
            let balance_after = current
                .checked_add(payout.amount)
                .ok_or(CustodyError::Overflow(payout.to))?;
            staged.insert(payout.to, balance_after);
            receipts.push(Receipt {
                account: payout.to,
                amount: payout.amount,
                balance_after,
            });
        }

        state.escrowed -= requested;
        state.balances.extend(staged);
        debug!(payouts = payouts.len(), requested, escrowed = state.escrowed, "released payouts");
        Ok(receipts)
    }

    async fn balance(&self, account: &Address) -> Result<u64, CustodyError> {
        Ok(self.balance_of(account))
    }

    async fn escrowed(&self) -> Result<u64, CustodyError> {
        Ok(self.escrowed_total())
    }
}
