#![deny(warnings)]

//! Record store for level results.
//!
//! The store owns the one domain rule the engine does not: at most one
//! stored result per (player, level), first submission wins. A second
//! submission fails with a distinguishable error instead of silently
//! overwriting history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sim_core::{Level, LevelResult, PlayerId};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

/// Store rejection reasons.
#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    /// The player already has a stored result for this level.
    #[error("player {player} has already submitted for level {level}")]
    AlreadySubmitted { player: PlayerId, level: u8 },
}

/// A stored result with its submission timestamp.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoredResult {
    pub result: LevelResult,
    pub submitted_at: DateTime<Utc>,
}

/// One row of the per-level profit leaderboard.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub player: PlayerId,
    pub profit: f64,
    pub output: f64,
}

/// Append-only result storage keyed by (player, level).
pub trait ResultStore {
    /// Store a result, rejecting a second submission for the same
    /// (player, level) with [`StoreError::AlreadySubmitted`].
    fn submit(&mut self, result: LevelResult) -> Result<(), StoreError>;

    /// The stored result for one (player, level), if any.
    fn get(&self, player: &PlayerId, level: Level) -> Option<&StoredResult>;

    /// All stored results for a player, in level order.
    fn results_for(&self, player: &PlayerId) -> Vec<&StoredResult>;

    /// Which levels the player has submitted, in curriculum order.
    fn submission_status(&self, player: &PlayerId) -> Vec<(Level, bool)>;

    /// Players ranked by profit on one level, highest first.
    fn profit_leaderboard(&self, level: Level) -> Vec<LeaderboardEntry>;
}

/// In-memory store. Deployments that need durability can put any
/// key-value or relational backend behind the same trait.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    rows: BTreeMap<(PlayerId, Level), StoredResult>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl ResultStore for MemoryStore {
    fn submit(&mut self, result: LevelResult) -> Result<(), StoreError> {
        let key = (result.player.clone(), result.level);
        if self.rows.contains_key(&key) {
            return Err(StoreError::AlreadySubmitted {
                player: result.player.clone(),
                level: result.level.number(),
            });
        }
        debug!(
            player = %result.player,
            level = result.level.number(),
            profit = result.profit,
            "storing level result"
        );
        self.rows.insert(
            key,
            StoredResult {
                result,
                submitted_at: Utc::now(),
            },
        );
        Ok(())
    }

    fn get(&self, player: &PlayerId, level: Level) -> Option<&StoredResult> {
        self.rows.get(&(player.clone(), level))
    }

    fn results_for(&self, player: &PlayerId) -> Vec<&StoredResult> {
        Level::ALL
            .iter()
            .filter_map(|level| self.get(player, *level))
            .collect()
    }

    fn submission_status(&self, player: &PlayerId) -> Vec<(Level, bool)> {
        Level::ALL
            .iter()
            .map(|level| (*level, self.get(player, *level).is_some()))
            .collect()
    }

    fn profit_leaderboard(&self, level: Level) -> Vec<LeaderboardEntry> {
        let mut entries: Vec<LeaderboardEntry> = self
            .rows
            .iter()
            .filter(|((_, l), _)| *l == level)
            .map(|((player, _), stored)| LeaderboardEntry {
                player: player.clone(),
                profit: stored.result.profit,
                output: stored.result.output,
            })
            .collect();
        entries.sort_by(|a, b| b.profit.total_cmp(&a.profit));
        entries
    }
}
