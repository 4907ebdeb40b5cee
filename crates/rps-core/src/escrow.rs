//! Escrow boundary: one committed state mutation per transition, with value
//! custody on either side of it.
//!
//! Each transition runs start to finish under a single async lock, custody
//! calls included. Value attached to `start`/`join` is deposited first and
//! returned if the transition is rejected. Payouts from `reveal` and
//! `claim_forfeit` are applied all-or-nothing; if custody refuses them the
//! removed record is put back and the call fails with no value moved.

use crate::clock::Clock;
use crate::config::EscrowConfig;
use crate::crypto::{MoveCommitment, Secret};
use crate::error::MatchError;
use crate::games::Move;
use crate::machine::{Committed, MatchStateMachine, Transition};
use crate::protocol::{Address, Match, MatchId, MatchView};
use custody_core::Custody;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::error;

struct EscrowState<C> {
    machine: MatchStateMachine<C>,
    committed: u64,
}

impl<C: Clock> EscrowState<C> {
    fn commit(&mut self, transition: Transition) -> Committed {
        self.committed += 1;
        Committed {
            seq: self.committed,
            at: self.machine.now(),
            transition,
        }
    }
}

/// Match state machine bound to a value custody
pub struct MatchEscrow<K, C> {
    config: EscrowConfig,
    state: Mutex<EscrowState<C>>,
    custody: Arc<K>,
}

impl<K: Custody, C: Clock> MatchEscrow<K, C> {
    pub fn new(config: EscrowConfig, clock: C, custody: Arc<K>) -> Self {
        Self {
            config,
            state: Mutex::new(EscrowState {
                machine: MatchStateMachine::new(config, clock),
                committed: 0,
            }),
            custody,
        }
    }

    pub fn custody(&self) -> &Arc<K> {
        &self.custody
    }

    pub fn config(&self) -> EscrowConfig {
        self.config
    }

    pub async fn now(&self) -> u64 {
        self.state.lock().await.machine.now()
    }

    /// Full record by id, zero-valued if absent
    pub async fn view(&self, match_id: &MatchId) -> MatchView {
        self.state.lock().await.machine.view(match_id)
    }

    /// Value held across all live matches
    pub async fn total_staked(&self) -> u128 {
        self.state.lock().await.machine.total_staked()
    }

    /// Number of transitions committed so far
    pub async fn committed(&self) -> u64 {
        self.state.lock().await.committed
    }

    pub async fn start(
        &self,
        caller: Address,
        match_id: MatchId,
        commitment: MoveCommitment,
        deadline_window: u64,
        value: u64,
    ) -> Result<Committed, MatchError> {
        let mut state = self.state.lock().await;
        self.custody.deposit(&caller, value).await?;
        match state
            .machine
            .start(match_id, commitment, deadline_window, value, caller)
        {
            Ok(transition) => Ok(state.commit(transition)),
            Err(e) => {
                self.refund(caller, value).await;
                Err(e)
            }
        }
    }

    pub async fn join(
        &self,
        caller: Address,
        match_id: MatchId,
        mv: Move,
        value: u64,
    ) -> Result<Committed, MatchError> {
        let mut state = self.state.lock().await;
        self.custody.deposit(&caller, value).await?;
        match state.machine.join(match_id, mv, value, caller) {
            Ok(transition) => Ok(state.commit(transition)),
            Err(e) => {
                self.refund(caller, value).await;
                Err(e)
            }
        }
    }

    pub async fn reveal(
        &self,
        caller: Address,
        match_id: MatchId,
        secret: &Secret,
        mv: Move,
    ) -> Result<Committed, MatchError> {
        let mut state = self.state.lock().await;
        let snapshot = state.machine.get_match(&match_id).cloned();
        let transition = state.machine.reveal(match_id, secret, mv, caller)?;
        self.pay_out(&mut state, match_id, snapshot, transition).await
    }

    pub async fn claim_forfeit(
        &self,
        caller: Address,
        match_id: MatchId,
    ) -> Result<Committed, MatchError> {
        let mut state = self.state.lock().await;
        let snapshot = state.machine.get_match(&match_id).cloned();
        let transition = state.machine.claim_forfeit(match_id, caller)?;
        self.pay_out(&mut state, match_id, snapshot, transition).await
    }

    async fn refund(&self, caller: Address, value: u64) {
        if let Err(e) = self.custody.release(&caller, value).await {
            error!(%caller, value, "failed to return deposit of rejected call: {}", e);
        }
    }

    async fn pay_out(
        &self,
        state: &mut EscrowState<C>,
        match_id: MatchId,
        snapshot: Option<Match>,
        transition: Transition,
    ) -> Result<Committed, MatchError> {
        if let Err(e) = self.custody.release_all(&transition.payouts).await {
            error!(%match_id, "payout refused, match restored: {}", e);
            if let Some(record) = snapshot {
                state.machine.restore(match_id, record)?;
            }
            return Err(e.into());
        }
        Ok(state.commit(transition))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::TickClock;
    use crate::crypto::derive_move_commitment;
    use crate::protocol::MatchEvent;
    use custody_core::{CustodyError, InMemoryCustody};

    const STAKE: u64 = 100;

    fn starter() -> Address {
        Address::from_bytes([0x11; 20])
    }

    fn joiner() -> Address {
        Address::from_bytes([0x22; 20])
    }

    fn setup() -> (MatchEscrow<InMemoryCustody, TickClock>, Arc<InMemoryCustody>, TickClock) {
        let custody = Arc::new(InMemoryCustody::with_balances([(starter(), 1_000), (joiner(), 1_000)]));
        let clock = TickClock::new();
        let config = EscrowConfig::new(10, 500, 10).unwrap();
        let escrow = MatchEscrow::new(config, clock.clone(), custody.clone());
        (escrow, custody, clock)
    }

    fn id() -> MatchId {
        MatchId::from_bytes([0x42; 32])
    }

    fn secret() -> Secret {
        Secret::from_phrase("firstPlayer")
    }

    async fn start(escrow: &MatchEscrow<InMemoryCustody, TickClock>, mv: Move) {
        let commitment = derive_move_commitment(&secret(), mv, &starter());
        escrow.start(starter(), id(), commitment, 100, STAKE).await.unwrap();
    }

    #[tokio::test]
    async fn test_rejected_start_returns_deposit() {
        let (escrow, custody, _) = setup();
        let commitment = derive_move_commitment(&secret(), Move::Rock, &starter());

        let result = escrow.start(starter(), id(), commitment, 100, 501).await;

        assert!(matches!(result, Err(MatchError::StakeOutOfRange { .. })));
        assert_eq!(custody.balance_of(&starter()), 1_000);
        assert_eq!(custody.escrowed_total(), 0);
        assert!(escrow.view(&id()).await.is_empty());
    }

    #[tokio::test]
    async fn test_start_without_funds_fails() {
        let (escrow, custody, _) = setup();
        let poor = Address::from_bytes([0x99; 20]);
        let commitment = derive_move_commitment(&secret(), Move::Rock, &poor);

        let result = escrow.start(poor, id(), commitment, 100, STAKE).await;

        assert!(matches!(
            result,
            Err(MatchError::Custody(CustodyError::InsufficientFunds { .. }))
        ));
        assert_eq!(custody.escrowed_total(), 0);
        assert!(escrow.view(&id()).await.is_empty());
    }

    #[tokio::test]
    async fn test_rejected_join_returns_deposit() {
        let (escrow, custody, _) = setup();
        start(&escrow, Move::Rock).await;

        let result = escrow.join(joiner(), id(), Move::Paper, STAKE + 1).await;

        assert!(matches!(result, Err(MatchError::StakeMismatch { .. })));
        assert_eq!(custody.balance_of(&joiner()), 1_000);
        assert_eq!(custody.escrowed_total(), STAKE);
    }

    #[tokio::test]
    async fn test_joiner_wins_full_pot() {
        let (escrow, custody, _) = setup();
        start(&escrow, Move::Rock).await;
        escrow.join(joiner(), id(), Move::Paper, STAKE).await.unwrap();
        assert_eq!(custody.escrowed_total(), 2 * STAKE);
        assert_eq!(u128::from(custody.escrowed_total()), escrow.total_staked().await);

        let before = custody.balance_of(&joiner());
        let committed = escrow.reveal(starter(), id(), &secret(), Move::Rock).await.unwrap();

        assert_eq!(committed.seq, 3);
        assert_eq!(
            committed.transition.event,
            MatchEvent::WinnerIs {
                winner: joiner(),
                winner_move: Move::Paper,
                loser: starter(),
                loser_move: Move::Rock,
            }
        );
        assert_eq!(custody.balance_of(&joiner()), before + 2 * STAKE);
        assert_eq!(custody.balance_of(&starter()), 1_000 - STAKE);
        assert_eq!(custody.escrowed_total(), 0);
    }

    #[tokio::test]
    async fn test_tie_refunds_both() {
        let (escrow, custody, _) = setup();
        start(&escrow, Move::Scissors).await;
        escrow.join(joiner(), id(), Move::Scissors, STAKE).await.unwrap();

        escrow.reveal(starter(), id(), &secret(), Move::Scissors).await.unwrap();

        assert_eq!(custody.balance_of(&starter()), 1_000);
        assert_eq!(custody.balance_of(&joiner()), 1_000);
        assert_eq!(custody.escrowed_total(), 0);
    }

    #[tokio::test]
    async fn test_forfeit_returns_exact_stake() {
        let (escrow, custody, clock) = setup();
        start(&escrow, Move::Rock).await;

        assert!(matches!(
            escrow.claim_forfeit(starter(), id()).await,
            Err(MatchError::DeadlineNotReached { .. })
        ));
        assert_eq!(custody.balance_of(&starter()), 1_000 - STAKE);

        clock.advance(100);
        escrow.claim_forfeit(starter(), id()).await.unwrap();

        assert_eq!(custody.balance_of(&starter()), 1_000);
        assert_eq!(custody.escrowed_total(), 0);
        assert!(matches!(
            escrow.claim_forfeit(starter(), id()).await,
            Err(MatchError::MatchNotFound(_))
        ));
        assert_eq!(custody.balance_of(&starter()), 1_000);
    }

    #[tokio::test]
    async fn test_failed_reveal_moves_no_value() {
        let (escrow, custody, _) = setup();
        start(&escrow, Move::Rock).await;
        escrow.join(joiner(), id(), Move::Scissors, STAKE).await.unwrap();

        let result = escrow
            .reveal(starter(), id(), &Secret::from_phrase("unknownPlayer"), Move::Rock)
            .await;

        assert_eq!(result, Err(MatchError::CommitmentMismatch));
        assert_eq!(custody.escrowed_total(), 2 * STAKE);
        assert_eq!(escrow.view(&id()).await.stake, 2 * STAKE);
    }

    #[tokio::test]
    async fn test_refused_payout_keeps_match_live() {
        let (escrow, custody, _) = setup();
        start(&escrow, Move::Rock).await;
        escrow.join(joiner(), id(), Move::Paper, STAKE).await.unwrap();
        custody.credit(&joiner(), u64::MAX - custody.balance_of(&joiner())).unwrap();

        let result = escrow.reveal(starter(), id(), &secret(), Move::Rock).await;

        assert_eq!(
            result,
            Err(MatchError::Custody(CustodyError::Overflow(joiner())))
        );
        assert_eq!(escrow.view(&id()).await.stake, 2 * STAKE);
        assert_eq!(custody.escrowed_total(), 2 * STAKE);
        assert_eq!(u128::from(custody.escrowed_total()), escrow.total_staked().await);
        assert_eq!(escrow.committed().await, 2);
    }

    #[tokio::test]
    async fn test_refused_tie_payout_moves_nothing() {
        let (escrow, custody, _) = setup();
        start(&escrow, Move::Paper).await;
        escrow.join(joiner(), id(), Move::Paper, STAKE).await.unwrap();
        custody.credit(&joiner(), u64::MAX - custody.balance_of(&joiner())).unwrap();
        let starter_before = custody.balance_of(&starter());

        assert!(escrow.reveal(starter(), id(), &secret(), Move::Paper).await.is_err());
        assert_eq!(custody.balance_of(&starter()), starter_before);
        assert_eq!(custody.escrowed_total(), 2 * STAKE);

        // Once the joiner can receive again the same reveal settles
        let spare = Address::from_bytes([0x77; 20]);
        custody.deposit(&joiner(), 1_000).await.unwrap();
        custody.release(&spare, 1_000).await.unwrap();

        let committed = escrow.reveal(starter(), id(), &secret(), Move::Paper).await.unwrap();
        assert_eq!(committed.transition.payouts.len(), 2);
        assert_eq!(custody.balance_of(&starter()), starter_before + STAKE);
        assert_eq!(custody.escrowed_total(), 0);
        assert_eq!(escrow.committed().await, 3);
    }

    #[tokio::test]
    async fn test_sequence_counts_only_commits() {
        let (escrow, _, _) = setup();
        start(&escrow, Move::Rock).await;
        assert!(escrow.join(joiner(), id(), Move::Paper, STAKE + 1).await.is_err());

        let committed = escrow.join(joiner(), id(), Move::Paper, STAKE).await.unwrap();

        assert_eq!(committed.seq, 2);
        assert_eq!(committed.at, 0);
    }
}
