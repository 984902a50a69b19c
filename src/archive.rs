use crate::game::{GameState, Party, PhaseName};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;

/// The record kept of a finished game.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GameStats {
    pub players: Vec<String>,
    pub started: DateTime<Utc>,
    pub finished: DateTime<Utc>,
    /// The terminal phase the game ended in.
    pub outcome: PhaseName,
    pub winner: Party,
}

impl GameStats {
    /// Summarises a finished game, or returns `None` if it is still going.
    pub fn new(game: &GameState, started: DateTime<Utc>, finished: DateTime<Utc>) -> Option<Self> {
        let outcome = game.phase_name().filter(|phase| phase.is_terminal())?;
        Some(Self {
            players: game.players().iter().map(|p| p.name.clone()).collect(),
            started,
            finished,
            outcome,
            winner: outcome.winner()?,
        })
    }
}

/// Finished games, keyed by a monotonically increasing id.
#[derive(Clone)]
pub struct Archive {
    db: sled::Db,
    tree: sled::Tree,
}

impl Archive {
    pub fn open(db: &sled::Db) -> sled::Result<Self> {
        Ok(Self {
            db: db.clone(),
            tree: db.open_tree("archive")?,
        })
    }

    pub fn record(&self, stats: &GameStats) -> Result<u64, Box<dyn Error>> {
        let id = self.db.generate_id()?;
        self.tree.insert(id.to_be_bytes(), serde_json::to_vec(stats)?)?;
        log::info!("archived game {}: {:?}", id, stats.outcome);
        Ok(id)
    }

    /// All archived games, oldest first. Unreadable records are skipped.
    pub fn past_games(&self) -> Vec<(u64, GameStats)> {
        self.tree
            .iter()
            .filter_map(|entry| {
                let (key, value) = entry.ok()?;
                let id = u64::from_be_bytes(key.as_ref().try_into().ok()?);
                match serde_json::from_slice(&value) {
                    Ok(stats) => Some((id, stats)),
                    Err(err) => {
                        log::warn!("skipping unreadable archive entry {}: {}", id, err);
                        None
                    }
                }
            })
            .collect()
    }
}
