//! Pity counters persisted to a JSON file.
//!
//! Every increment and reset rewrites the whole file (write to a temporary
//! sibling, then rename), so a crash never leaves a half-written document.
//! A failed write reverts the in-memory counter before the error returns.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use cf_core::PlayerId;

use crate::error::StoreResult;
use crate::ports::PityStore;

#[derive(Debug, Serialize, Deserialize)]
struct PityRecord {
    player: PlayerId,
    pool: String,
    count: u32,
}

type Counters = HashMap<(PlayerId, String), u32>;

/// Durable pity counters.
#[derive(Debug)]
pub struct FilePityStore {
    path: PathBuf,
    counters: Mutex<Counters>,
}

impl FilePityStore {
    /// Open `path`, starting empty if the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let counters = if path.exists() {
            let text = fs::read_to_string(&path)?;
            let records: Vec<PityRecord> = serde_json::from_str(&text)?;
            records
                .into_iter()
                .map(|r| ((r.player, r.pool), r.count))
                .collect()
        } else {
            Counters::new()
        };
        Ok(Self {
            path,
            counters: Mutex::new(counters),
        })
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn counters(&self) -> MutexGuard<'_, Counters> {
        self.counters
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn save(&self, counters: &Counters) -> StoreResult<()> {
        let mut records: Vec<PityRecord> = counters
            .iter()
            .map(|((player, pool), count)| PityRecord {
                player: *player,
                pool: pool.clone(),
                count: *count,
            })
            .collect();
        records.sort_by(|a, b| {
            a.player
                .0
                .cmp(&b.player.0)
                .then_with(|| a.pool.cmp(&b.pool))
        });

        let json = serde_json::to_string_pretty(&records)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Set a counter and persist, restoring the old value if the write fails.
    fn persist(
        &self,
        counters: &mut Counters,
        player: PlayerId,
        pool: &str,
        value: u32,
    ) -> StoreResult<()> {
        let key = (player, pool.to_string());
        let previous = counters.insert(key.clone(), value);
        if let Err(err) = self.save(counters) {
            match previous {
                Some(old) => counters.insert(key, old),
                None => counters.remove(&key),
            };
            tracing::warn!(%player, pool, error = %err, "failed to persist pity counter");
            return Err(err);
        }
        Ok(())
    }
}

impl PityStore for FilePityStore {
    fn increment(&self, player: PlayerId, pool: &str) -> StoreResult<u32> {
        let mut counters = self.counters();
        let next = counters
            .get(&(player, pool.to_string()))
            .copied()
            .unwrap_or(0)
            .saturating_add(1);
        self.persist(&mut counters, player, pool, next)?;
        Ok(next)
    }

    fn reset(&self, player: PlayerId, pool: &str) -> StoreResult<()> {
        let mut counters = self.counters();
        self.persist(&mut counters, player, pool, 0)
    }

    fn decrement(&self, player: PlayerId, pool: &str) -> StoreResult<()> {
        let mut counters = self.counters();
        let Some(current) = counters.get(&(player, pool.to_string())).copied() else {
            return Ok(());
        };
        self.persist(&mut counters, player, pool, current.saturating_sub(1))
    }

    fn count(&self, player: PlayerId, pool: &str) -> StoreResult<u32> {
        Ok(self
            .counters()
            .get(&(player, pool.to_string()))
            .copied()
            .unwrap_or(0))
    }
}
