//! The four match transitions: start, join, reveal and forfeit-claim.
//!
//! Every transition validates against the current record, performs a single
//! store mutation, and returns the event plus any payouts. Payouts are only
//! computed from a record that has already been removed from the store.

use super::{MatchStore, Transition};
use crate::clock::Clock;
use crate::config::EscrowConfig;
use crate::crypto::{MoveCommitment, Secret};
use crate::error::MatchError;
use crate::games::{resolve, settle, Move, Outcome};
use crate::protocol::{Address, Match, MatchEvent, MatchId, MatchView, Opponent};
use tracing::{debug, info};

/// Escrowed Rock-Paper-Scissors match state machine
pub struct MatchStateMachine<C> {
    config: EscrowConfig,
    store: MatchStore,
    clock: C,
}

impl<C: Clock> MatchStateMachine<C> {
    pub fn new(config: EscrowConfig, clock: C) -> Self {
        Self {
            config,
            store: MatchStore::new(),
            clock,
        }
    }

    pub fn config(&self) -> &EscrowConfig {
        &self.config
    }

    pub fn min_stake(&self) -> u64 {
        self.config.min_stake()
    }

    pub fn max_stake(&self) -> u64 {
        self.config.max_stake()
    }

    pub fn min_deadline_window(&self) -> u64 {
        self.config.min_deadline_window()
    }

    pub fn now(&self) -> u64 {
        self.clock.now()
    }

    pub fn get_match(&self, match_id: &MatchId) -> Option<&Match> {
        self.store.get(match_id)
    }

    /// Full record by id, zero-valued if absent
    pub fn view(&self, match_id: &MatchId) -> MatchView {
        MatchView::new(*match_id, self.store.get(match_id))
    }

    pub fn live_matches(&self) -> usize {
        self.store.len()
    }

    /// Value held across all live matches
    pub fn total_staked(&self) -> u128 {
        self.store.total_staked()
    }

    /// Open a match with the caller's committed move and stake.
    pub fn start(
        &mut self,
        match_id: MatchId,
        commitment: MoveCommitment,
        deadline_window: u64,
        stake: u64,
        caller: Address,
    ) -> Result<Transition, MatchError> {
        self.try_start(match_id, commitment, deadline_window, stake, caller)
            .inspect_err(|e| debug!(%match_id, %caller, "start rejected: {}", e))
    }

    fn try_start(
        &mut self,
        match_id: MatchId,
        commitment: MoveCommitment,
        deadline_window: u64,
        stake: u64,
        caller: Address,
    ) -> Result<Transition, MatchError> {
        if match_id.is_zero() {
            return Err(MatchError::ZeroMatchId);
        }
        if commitment.is_zero() {
            return Err(MatchError::ZeroCommitment);
        }
        if caller.is_zero() {
            return Err(MatchError::ZeroCaller);
        }
        if deadline_window < self.config.min_deadline_window() {
            return Err(MatchError::DeadlineWindowTooShort {
                window: deadline_window,
                min: self.config.min_deadline_window(),
            });
        }
        if !self.config.stake_in_range(stake) {
            return Err(MatchError::StakeOutOfRange {
                stake,
                min: self.config.min_stake(),
                max: self.config.max_stake(),
            });
        }
        let now = self.clock.now();
        let deadline = now
            .checked_add(deadline_window)
            .ok_or(MatchError::DeadlineOverflow {
                now,
                window: deadline_window,
            })?;

        self.store.insert(
            match_id,
            Match {
                commitment,
                starter: caller,
                opponent: None,
                stake,
                deadline,
            },
        )?;

        info!(%match_id, %caller, stake, deadline, "match started");
        Ok(Transition::event_only(MatchEvent::MatchStarted {
            caller,
            match_id,
        }))
    }

    /// Match the starter's stake and play a move in the clear.
    pub fn join(
        &mut self,
        match_id: MatchId,
        mv: Move,
        stake: u64,
        caller: Address,
    ) -> Result<Transition, MatchError> {
        self.try_join(match_id, mv, stake, caller)
            .inspect_err(|e| debug!(%match_id, %caller, "join rejected: {}", e))
    }

    fn try_join(
        &mut self,
        match_id: MatchId,
        mv: Move,
        stake: u64,
        caller: Address,
    ) -> Result<Transition, MatchError> {
        if caller.is_zero() {
            return Err(MatchError::ZeroCaller);
        }

        let pot = self.store.update(&match_id, |record| {
            if record.is_joined() {
                return Err(MatchError::AlreadyJoined(match_id));
            }
            if stake != record.stake {
                return Err(MatchError::StakeMismatch {
                    offered: stake,
                    required: record.stake,
                });
            }
            record.stake = record
                .stake
                .checked_mul(2)
                .ok_or(MatchError::PotOverflow(match_id))?;
            record.opponent = Some(Opponent {
                address: caller,
                mv,
            });
            Ok(record.stake)
        })?;

        info!(%match_id, %caller, %mv, pot, "match joined");
        Ok(Transition::event_only(MatchEvent::MatchJoined {
            caller,
            match_id,
            mv,
        }))
    }

    /// Reveal the starter's committed move, settle the pot and close the match.
    pub fn reveal(
        &mut self,
        match_id: MatchId,
        secret: &Secret,
        mv: Move,
        caller: Address,
    ) -> Result<Transition, MatchError> {
        self.try_reveal(match_id, secret, mv, caller)
            .inspect_err(|e| debug!(%match_id, %caller, "reveal rejected: {}", e))
    }

    fn try_reveal(
        &mut self,
        match_id: MatchId,
        secret: &Secret,
        mv: Move,
        caller: Address,
    ) -> Result<Transition, MatchError> {
        let record = self
            .store
            .get(&match_id)
            .ok_or(MatchError::MatchNotFound(match_id))?;
        let opponent = record.opponent.ok_or(MatchError::NotJoined(match_id))?;
        if caller != record.starter {
            return Err(MatchError::NotStarter { caller, match_id });
        }
        if !record.commitment.verify(secret, mv, &caller) {
            return Err(MatchError::CommitmentMismatch);
        }

        let record = self.store.remove(&match_id)?;

        let outcome = resolve(mv, opponent.mv);
        let payouts = settle(outcome, record.stake, record.starter, opponent.address);
        let event = match outcome {
            Outcome::Tie => MatchEvent::NoWinner {
                starter: record.starter,
                joiner: opponent.address,
                mv,
            },
            Outcome::StarterWins => MatchEvent::WinnerIs {
                winner: record.starter,
                winner_move: mv,
                loser: opponent.address,
                loser_move: opponent.mv,
            },
            Outcome::JoinerWins => MatchEvent::WinnerIs {
                winner: opponent.address,
                winner_move: opponent.mv,
                loser: record.starter,
                loser_move: mv,
            },
        };

        info!(%match_id, %outcome, pot = record.stake, "match resolved");
        Ok(Transition { event, payouts })
    }

    /// Reclaim an unjoined stake once the deadline has passed.
    pub fn claim_forfeit(
        &mut self,
        match_id: MatchId,
        caller: Address,
    ) -> Result<Transition, MatchError> {
        self.try_claim_forfeit(match_id, caller)
            .inspect_err(|e| debug!(%match_id, %caller, "forfeit rejected: {}", e))
    }

    fn try_claim_forfeit(
        &mut self,
        match_id: MatchId,
        caller: Address,
    ) -> Result<Transition, MatchError> {
        let record = self
            .store
            .get(&match_id)
            .ok_or(MatchError::MatchNotFound(match_id))?;
        if record.is_joined() {
            return Err(MatchError::AlreadyJoined(match_id));
        }
        if caller != record.starter {
            return Err(MatchError::NotStarter { caller, match_id });
        }
        let now = self.clock.now();
        if now < record.deadline {
            return Err(MatchError::DeadlineNotReached {
                now,
                deadline: record.deadline,
            });
        }

        let record = self.store.remove(&match_id)?;

        info!(%match_id, %caller, refund = record.stake, "forfeit claimed");
        Ok(Transition {
            event: MatchEvent::ForfeitClaimed { caller, match_id },
            payouts: vec![super::Payout {
                to: record.starter,
                amount: record.stake,
            }],
        })
    }

    /// Put back a record removed by a transition whose payouts could not be applied.
    pub fn restore(&mut self, match_id: MatchId, record: Match) -> Result<(), MatchError> {
        self.store.insert(match_id, record)?;
        debug!(%match_id, "match restored");
        Ok(())
    }
}
