//! Request and response types.

use chrono::{DateTime, Utc};
use rps_core::{Address, MatchEvent, MatchId, MoveCommitment, Payout, Secret};
use serde::{Deserialize, Serialize};

// ============ Requests ============

#[derive(Deserialize)]
pub struct StartRequest {
    pub caller: Address,
    pub commitment: MoveCommitment,
    pub deadline_window: u64,
    /// Value attached to the call; becomes the stake
    pub value: u64,
}

#[derive(Deserialize)]
pub struct JoinRequest {
    pub caller: Address,
    /// Raw wire code, checked by `Move::from_code`
    #[serde(rename = "move")]
    pub mv: i64,
    pub value: u64,
}

#[derive(Deserialize)]
pub struct RevealRequest {
    pub caller: Address,
    pub secret: Secret,
    #[serde(rename = "move")]
    pub mv: i64,
}

#[derive(Deserialize)]
pub struct ForfeitRequest {
    pub caller: Address,
}

#[derive(Deserialize)]
pub struct MoveCommitmentRequest {
    pub secret: Secret,
    #[serde(rename = "move")]
    pub mv: i64,
    pub identity: Address,
}

#[derive(Deserialize)]
pub struct MatchIdRequest {
    pub secret: Secret,
    pub identity: Address,
}

#[derive(Deserialize)]
pub struct TickRequest {
    pub ticks: u64,
}

#[derive(Deserialize)]
pub struct FundRequest {
    pub amount: u64,
}

// ============ Responses ============

#[derive(Serialize)]
pub struct ConfigResponse {
    pub min_stake: u64,
    pub max_stake: u64,
    pub min_deadline_window: u64,
}

#[derive(Serialize)]
pub struct ClockResponse {
    pub now: u64,
}

#[derive(Serialize)]
pub struct CommitmentResponse {
    pub commitment: MoveCommitment,
}

#[derive(Serialize)]
pub struct MatchIdResponse {
    pub match_id: MatchId,
}

#[derive(Serialize)]
pub struct AccountResponse {
    pub address: Address,
    pub balance: u64,
}

/// Logged event of a successful transition
#[derive(Clone, Debug, Serialize)]
pub struct EventRecord {
    pub seq: u64,
    pub match_id: MatchId,
    /// Logical clock when the transition committed
    pub clock: u64,
    pub recorded_at: DateTime<Utc>,
    pub event: MatchEvent,
}

#[derive(Serialize)]
pub struct TransitionResponse {
    /// Position in commit order; matches the event log
    pub seq: u64,
    pub event: MatchEvent,
    pub payouts: Vec<Payout>,
}

#[derive(Serialize)]
pub struct EventsResponse {
    pub events: Vec<EventRecord>,
}
