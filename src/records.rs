//! Best times and replays kept in memory
//!
//! Reference collaborator for match outcomes: answers "what does this player
//! have to beat" before a match and applies the intents after it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::sim::{MatchHost, Player, ReplayStoreRequest, ScoreUpdateRequest};

/// A player's best winning time on one level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestTime {
    pub username: String,
    pub level: u32,
    /// Close percentage the time was set with
    pub close_percent: u32,
    pub best_time_ms: u64,
}

/// Best times per (player, level) plus every stored replay
#[derive(Debug, Clone, Default)]
pub struct Records {
    best: BTreeMap<(String, u32), BestTime>,
    replays: Vec<ReplayStoreRequest>,
}

impl Records {
    pub fn new() -> Self {
        Self::default()
    }

    /// Best time for `username` on `level`, if they have won it before
    pub fn best_time(&self, username: &str, level: u32) -> Option<u64> {
        self.best
            .get(&(username.to_owned(), level))
            .map(|entry| entry.best_time_ms)
    }

    /// Player context for the next match on `level`
    pub fn player(&self, username: &str, level: u32) -> Player {
        Player::new(username).with_prior_best(self.best_time(username, level))
    }

    pub fn replays(&self) -> &[ReplayStoreRequest] {
        &self.replays
    }

    /// Replays recorded by `username`, oldest first
    pub fn replays_for<'a>(&'a self, username: &'a str) -> impl Iterator<Item = &'a ReplayStoreRequest> {
        self.replays.iter().filter(move |r| r.username == username)
    }

    /// Forget a player's times and replays
    pub fn remove_player(&mut self, username: &str) {
        self.best.retain(|(name, _), _| name != username);
        self.replays.retain(|r| r.username != username);
        log::info!("Removed records for {}", username);
    }

    pub fn clear(&mut self) {
        self.best.clear();
        self.replays.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.best.is_empty() && self.replays.is_empty()
    }
}

impl MatchHost for Records {
    fn report_score(&mut self, request: &ScoreUpdateRequest) {
        let key = (request.username.clone(), request.level);
        // Only ever lower a stored time
        if self
            .best
            .get(&key)
            .is_some_and(|entry| entry.best_time_ms <= request.best_time_ms)
        {
            log::debug!("Ignoring non-improving time for {}", request.username);
            return;
        }
        log::info!(
            "New best for {} on level {}: {} ms",
            request.username,
            request.level,
            request.best_time_ms
        );
        self.best.insert(
            key,
            BestTime {
                username: request.username.clone(),
                level: request.level,
                close_percent: request.close_percent,
                best_time_ms: request.best_time_ms,
            },
        );
    }

    fn store_replay(&mut self, request: &ReplayStoreRequest) {
        log::debug!(
            "Stored replay for {} ({} samples, {} lines)",
            request.username,
            request.replay.positions.len(),
            request.replay.lines.len()
        );
        self.replays.push(request.clone());
    }
}
