//! Application state management.

use crate::config::ClockMode;
use crate::models::EventRecord;
use chrono::Utc;
use custody_core::InMemoryCustody;
use rps_core::{Clock, Committed, EscrowConfig, MatchEscrow, MatchId, TickClock, WallClock};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

pub type Escrow = MatchEscrow<InMemoryCustody, Arc<dyn Clock>>;

/// Most recent events kept in memory
pub const EVENT_LOG_CAPACITY: usize = 10_000;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    escrow: Arc<Escrow>,
    custody: Arc<InMemoryCustody>,
    /// Present in tick mode; lets the service advance the logical clock
    ticker: Option<TickClock>,
    /// Ordered by commit sequence, oldest first
    events: Arc<Mutex<VecDeque<EventRecord>>>,
    event_capacity: usize,
}

impl AppState {
    /// Create state on a tick clock starting at zero
    pub fn new(config: EscrowConfig) -> Self {
        Self::with_clock_mode(config, ClockMode::Ticks)
    }

    pub fn with_clock_mode(config: EscrowConfig, mode: ClockMode) -> Self {
        let ticker = (mode == ClockMode::Ticks).then(TickClock::new);
        let clock: Arc<dyn Clock> = match &ticker {
            Some(ticker) => Arc::new(ticker.clone()),
            None => Arc::new(WallClock::new()),
        };
        let custody = Arc::new(InMemoryCustody::new());

        Self {
            escrow: Arc::new(MatchEscrow::new(config, clock, custody.clone())),
            custody,
            ticker,
            events: Arc::new(Mutex::new(VecDeque::new())),
            event_capacity: EVENT_LOG_CAPACITY,
        }
    }

    pub fn escrow(&self) -> &Escrow {
        &self.escrow
    }

    pub fn custody(&self) -> &InMemoryCustody {
        &self.custody
    }

    /// Keep only the most recent `capacity` events
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity.max(1);
        self
    }

    fn event_log(&self) -> MutexGuard<'_, VecDeque<EventRecord>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Log a committed transition at its commit position.
    ///
    /// Concurrent handlers can get here out of commit order; the sequence
    /// number assigned by the escrow decides the position.
    pub fn record(&self, match_id: MatchId, committed: &Committed) -> EventRecord {
        let record = EventRecord {
            seq: committed.seq,
            match_id,
            clock: committed.at,
            recorded_at: Utc::now(),
            event: committed.transition.event.clone(),
        };

        let mut events = self.event_log();
        let position = events.partition_point(|e| e.seq < record.seq);
        events.insert(position, record.clone());
        while events.len() > self.event_capacity {
            events.pop_front();
        }
        record
    }

    pub fn events(&self) -> Vec<EventRecord> {
        self.event_log().iter().cloned().collect()
    }

    /// Advance the logical clock. Returns `None` when running on wall time.
    pub fn advance(&self, ticks: u64) -> Option<u64> {
        self.ticker.as_ref().map(|t| t.advance(ticks))
    }

    /// Advance the tick clock by one tick per `interval`, simulating block production
    pub fn spawn_block_producer(&self, interval: Duration) -> Option<tokio::task::JoinHandle<()>> {
        let ticker = self.ticker.clone()?;
        Some(tokio::spawn(async move {
            let mut timer = tokio::time::interval(interval);
            timer.tick().await;
            loop {
                timer.tick().await;
                let now = ticker.advance(1);
                tracing::trace!(now, "block produced");
            }
        }))
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(EscrowConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rps_core::{Address, MatchEvent, Transition};

    fn committed(seq: u64) -> Committed {
        Committed {
            seq,
            at: seq * 10,
            transition: Transition {
                event: MatchEvent::ForfeitClaimed {
                    caller: Address::from_bytes([1; 20]),
                    match_id: MatchId::from_bytes([1; 32]),
                },
                payouts: Vec::new(),
            },
        }
    }

    fn seqs(state: &AppState) -> Vec<u64> {
        state.events().iter().map(|e| e.seq).collect()
    }

    #[test]
    fn test_record_keeps_commit_order() {
        let state = AppState::default();
        let id = MatchId::from_bytes([1; 32]);

        state.record(id, &committed(2));
        state.record(id, &committed(1));
        let record = state.record(id, &committed(3));

        assert_eq!(record.clock, 30);
        assert_eq!(seqs(&state), [1, 2, 3]);
    }

    #[test]
    fn test_event_log_is_bounded() {
        let state = AppState::default().with_event_capacity(2);
        let id = MatchId::from_bytes([1; 32]);

        for seq in 1..=5 {
            state.record(id, &committed(seq));
        }

        assert_eq!(seqs(&state), [4, 5]);
    }

    #[tokio::test]
    async fn test_wall_clock_cannot_be_advanced() {
        let state = AppState::with_clock_mode(EscrowConfig::default(), ClockMode::Wall);
        assert_eq!(state.advance(5), None);

        let state = AppState::default();
        assert_eq!(state.advance(5), Some(5));
        assert_eq!(state.escrow().now().await, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_block_producer_advances_clock() {
        let state = AppState::default();
        let handle = state.spawn_block_producer(Duration::from_millis(100)).unwrap();

        tokio::time::sleep(Duration::from_millis(350)).await;
        handle.abort();

        assert_eq!(state.escrow().now().await, 3);
    }
}
