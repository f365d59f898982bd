//! Leaderboard storage.
//!
//! [`LocalLeaderboard`] keeps the best scores per difficulty in a JSON file.
//! [`FallbackLeaderboard`] wraps any other implementation and answers from a
//! local cache once the wrapped service has failed, so a flaky backend never
//! loses a finished game.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::ServiceError;
use crate::types::Difficulty;

/// Entries kept per difficulty by the local board.
pub const LOCAL_CAPACITY: usize = 10;

/// Country and city recorded for scores that could only be saved locally.
pub const LOCAL_ORIGIN: &str = "Local";

/// One leaderboard entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub player_id: String,
    pub name: String,
    pub score: u64,
    /// Elapsed play time as `HH:MM:SS`.
    pub time: String,
    #[serde(default)]
    pub elapsed_ms: u64,
    pub difficulty: Difficulty,
    /// Calendar date of the game, `YYYY-MM-DD`.
    pub date: String,
    pub country: String,
    pub city: String,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
}

impl PlayerRecord {
    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.player_id.trim().is_empty() {
            return Err(ServiceError::InvalidRecord("missing player id".to_string()));
        }
        if self.name.trim().is_empty() {
            return Err(ServiceError::InvalidRecord("missing player name".to_string()));
        }
        Ok(())
    }

    /// Leaderboard order: higher score first, faster game breaks ties.
    fn rank(a: &Self, b: &Self) -> Ordering {
        b.score
            .cmp(&a.score)
            .then_with(|| a.elapsed_ms.cmp(&b.elapsed_ms))
    }
}

pub trait LeaderboardService {
    /// Best `count` records for a difficulty, best first.
    fn fetch_top_players(
        &mut self,
        count: usize,
        difficulty: Difficulty,
    ) -> Result<Vec<PlayerRecord>, ServiceError>;

    /// Best known record of a player, if any.
    fn fetch_player(&mut self, player_id: &str) -> Result<Option<PlayerRecord>, ServiceError>;

    /// Store a finished game and return the record as stored.
    fn submit_score(&mut self, record: PlayerRecord) -> Result<PlayerRecord, ServiceError>;
}

/// Default location of the scores file under the user's config directory.
pub fn default_scores_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("bonus-tetris")
        .join("scores.json")
}

/// Top scores per difficulty, optionally persisted as JSON.
#[derive(Debug, Clone)]
pub struct LocalLeaderboard {
    path: Option<PathBuf>,
    records: Vec<PlayerRecord>,
    capacity: usize,
}

impl Default for LocalLeaderboard {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl LocalLeaderboard {
    pub fn in_memory() -> Self {
        Self {
            path: None,
            records: Vec::new(),
            capacity: LOCAL_CAPACITY,
        }
    }

    /// Load the board from `path`. A missing or empty file is an empty board.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ServiceError> {
        let path = path.into();
        let mut records: Vec<PlayerRecord> = match fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => Vec::new(),
            Ok(text) => serde_json::from_str(&text)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(err) => return Err(err.into()),
        };
        records.sort_by(PlayerRecord::rank);
        debug!(path = %path.display(), records = records.len(), "loaded leaderboard");
        Ok(Self {
            path: Some(path),
            records,
            capacity: LOCAL_CAPACITY,
        })
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self.trim();
        self
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn records(&self) -> &[PlayerRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Insert without persisting. Keeps only the best record per player and difficulty.
    fn insert(&mut self, record: PlayerRecord) {
        let existing = self
            .records
            .iter()
            .position(|r| r.player_id == record.player_id && r.difficulty == record.difficulty);
        match existing {
            Some(i) if PlayerRecord::rank(&record, &self.records[i]) == Ordering::Less => {
                self.records[i] = record;
            }
            Some(_) => {}
            None => self.records.push(record),
        }
        self.records.sort_by(PlayerRecord::rank);
        self.trim();
    }

    fn trim(&mut self) {
        let capacity = self.capacity;
        let mut kept: HashMap<Difficulty, usize> = HashMap::new();
        self.records.retain(|r| {
            let n = kept.entry(r.difficulty).or_insert(0);
            *n += 1;
            *n <= capacity
        });
    }

    fn save(&self) -> Result<(), ServiceError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(&self.records)?;
        fs::write(path, json)?;
        Ok(())
    }
}

impl LeaderboardService for LocalLeaderboard {
    fn fetch_top_players(
        &mut self,
        count: usize,
        difficulty: Difficulty,
    ) -> Result<Vec<PlayerRecord>, ServiceError> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.difficulty == difficulty)
            .take(count)
            .cloned()
            .collect())
    }

    fn fetch_player(&mut self, player_id: &str) -> Result<Option<PlayerRecord>, ServiceError> {
        Ok(self.records.iter().find(|r| r.player_id == player_id).cloned())
    }

    fn submit_score(&mut self, record: PlayerRecord) -> Result<PlayerRecord, ServiceError> {
        record.validate()?;
        self.insert(record.clone());
        self.save()?;
        Ok(record)
    }
}

/// Health of the wrapped service as last observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceStatus {
    pub available: bool,
    pub health_checked: bool,
}

/// Wraps a leaderboard service with an in-process cache.
///
/// The wrapped service is health-checked on first use. After any failure it
/// is considered unavailable until [`recheck`](Self::recheck) succeeds, and
/// every call is answered from the cache instead.
#[derive(Debug)]
pub struct FallbackLeaderboard<R> {
    remote: R,
    cache: LocalLeaderboard,
    available: bool,
    health_checked: bool,
}

impl<R: LeaderboardService> FallbackLeaderboard<R> {
    pub fn new(remote: R) -> Self {
        Self::with_cache(remote, LocalLeaderboard::in_memory())
    }

    pub fn with_cache(remote: R, cache: LocalLeaderboard) -> Self {
        Self {
            remote,
            cache,
            available: true,
            health_checked: false,
        }
    }

    pub fn status(&self) -> ServiceStatus {
        ServiceStatus {
            available: self.available,
            health_checked: self.health_checked,
        }
    }

    pub fn is_available(&mut self) -> bool {
        self.ensure_checked();
        self.available
    }

    /// Forget the previous health check and query the wrapped service again.
    pub fn recheck(&mut self) -> bool {
        self.health_checked = false;
        self.available = true;
        self.is_available()
    }

    pub fn cache(&self) -> &LocalLeaderboard {
        &self.cache
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn remote_mut(&mut self) -> &mut R {
        &mut self.remote
    }

    fn ensure_checked(&mut self) {
        if self.health_checked {
            return;
        }
        self.health_checked = true;
        match self.remote.fetch_top_players(1, Difficulty::default()) {
            Ok(_) => self.available = true,
            Err(err) => self.mark_unavailable("health check", &err),
        }
    }

    fn mark_unavailable(&mut self, operation: &str, err: &ServiceError) {
        if self.available {
            warn!(operation, %err, "leaderboard service unavailable, using local cache");
        }
        self.available = false;
    }

    fn save_locally(&mut self, mut record: PlayerRecord) -> Result<PlayerRecord, ServiceError> {
        record.country = LOCAL_ORIGIN.to_string();
        record.city = LOCAL_ORIGIN.to_string();
        info!(player = %record.name, score = record.score, "score saved locally");
        self.cache.submit_score(record)
    }
}

impl<R: LeaderboardService> LeaderboardService for FallbackLeaderboard<R> {
    fn fetch_top_players(
        &mut self,
        count: usize,
        difficulty: Difficulty,
    ) -> Result<Vec<PlayerRecord>, ServiceError> {
        self.ensure_checked();
        if self.available {
            match self.remote.fetch_top_players(count, difficulty) {
                Ok(players) => {
                    for player in &players {
                        self.cache.insert(player.clone());
                    }
                    return Ok(players);
                }
                Err(err) => self.mark_unavailable("fetch_top_players", &err),
            }
        }
        self.cache.fetch_top_players(count, difficulty)
    }

    fn fetch_player(&mut self, player_id: &str) -> Result<Option<PlayerRecord>, ServiceError> {
        self.ensure_checked();
        if self.available {
            match self.remote.fetch_player(player_id) {
                Ok(player) => return Ok(player),
                Err(err) => self.mark_unavailable("fetch_player", &err),
            }
        }
        self.cache.fetch_player(player_id)
    }

    fn submit_score(&mut self, record: PlayerRecord) -> Result<PlayerRecord, ServiceError> {
        record.validate()?;
        self.ensure_checked();
        if !self.available {
            return self.save_locally(record);
        }
        match self.remote.submit_score(record.clone()) {
            Ok(stored) => {
                self.cache.insert(stored.clone());
                Ok(stored)
            }
            Err(err) => {
                self.mark_unavailable("submit_score", &err);
                self.save_locally(record)
            }
        }
    }
}
