//! Match store: the only path to match records.

use crate::error::MatchError;
use crate::protocol::{Match, MatchId};
use std::collections::HashMap;

/// Mapping from match id to live match record
#[derive(Debug, Default)]
pub struct MatchStore {
    matches: HashMap<MatchId, Match>,
}

impl MatchStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &MatchId) -> Option<&Match> {
        self.matches.get(id)
    }

    /// Insert a new record; fails while the slot is occupied
    pub fn insert(&mut self, id: MatchId, record: Match) -> Result<(), MatchError> {
        if self.matches.contains_key(&id) {
            return Err(MatchError::MatchOccupied(id));
        }
        self.matches.insert(id, record);
        Ok(())
    }

    /// Apply `mutator` to a copy of the record and write it back only on success.
    pub fn update<T, F>(&mut self, id: &MatchId, mutator: F) -> Result<T, MatchError>
    where
        F: FnOnce(&mut Match) -> Result<T, MatchError>,
    {
        let slot = self
            .matches
            .get_mut(id)
            .ok_or(MatchError::MatchNotFound(*id))?;
        let mut draft = slot.clone();
        let value = mutator(&mut draft)?;
        *slot = draft;
        Ok(value)
    }

    /// Delete a record, returning it
    pub fn remove(&mut self, id: &MatchId) -> Result<Match, MatchError> {
        self.matches
            .remove(id)
            .ok_or(MatchError::MatchNotFound(*id))
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Sum of value held across all live matches
    pub fn total_staked(&self) -> u128 {
        self.matches.values().map(|m| u128::from(m.stake)).sum()
    }
}
