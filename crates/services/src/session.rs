//! Player identity.
//!
//! The player id outlives a single run: it is stored in a small text file next
//! to the scores so the leaderboard recognises a returning player.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::core::format_elapsed;
use crate::error::ServiceError;
use crate::geo::{lookup_or_unknown, GeoLocation, GeoLocator};
use crate::leaderboard::{default_scores_path, LeaderboardService, PlayerRecord};
use crate::types::Difficulty;

/// File name of the stored player id.
pub const PLAYER_ID_FILE: &str = "player_id";

/// Default location of the stored player id, next to the scores file.
pub fn default_player_id_path() -> PathBuf {
    default_scores_path().with_file_name(PLAYER_ID_FILE)
}

/// Fresh `player_<millis>_<random>` id.
pub fn generate_player_id() -> String {
    format!(
        "player_{}_{}",
        chrono::Utc::now().timestamp_millis(),
        rand::random::<f64>()
    )
}

/// Player id, display name and cached location for one run of the program.
#[derive(Debug, Clone)]
pub struct SessionContext {
    player_id: String,
    name: String,
    difficulty: Difficulty,
    location: Option<GeoLocation>,
}

impl SessionContext {
    /// New session with a fresh id that is not stored anywhere.
    pub fn new(difficulty: Difficulty) -> Self {
        Self::with_player_id(generate_player_id(), difficulty)
    }

    /// Session for the id stored at `path`. The first run generates the id
    /// and writes it there.
    pub fn load_or_create(path: &Path, difficulty: Difficulty) -> Result<Self, ServiceError> {
        let stored = match fs::read_to_string(path) {
            Ok(text) => text.trim().to_string(),
            Err(err) if err.kind() == io::ErrorKind::NotFound => String::new(),
            Err(err) => return Err(err.into()),
        };
        if !stored.is_empty() {
            debug!(player_id = %stored, "player id loaded");
            return Ok(Self::with_player_id(stored, difficulty));
        }

        let session = Self::new(difficulty);
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, session.player_id())?;
        info!(player_id = %session.player_id, path = %path.display(), "new player id");
        Ok(session)
    }

    pub fn with_player_id(player_id: impl Into<String>, difficulty: Difficulty) -> Self {
        Self {
            player_id: player_id.into(),
            name: String::new(),
            difficulty,
            location: None,
        }
    }

    pub fn player_id(&self) -> &str {
        &self.player_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into().trim().to_string();
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
    }

    /// Restore the display name of a returning player. Returns true if one was found.
    pub fn initialize(
        &mut self,
        leaderboard: &mut dyn LeaderboardService,
    ) -> Result<bool, ServiceError> {
        match leaderboard.fetch_player(&self.player_id)? {
            Some(record) => {
                debug!(player = %record.name, "restored player");
                self.name = record.name;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Location of this player, looked up once and cached.
    pub fn geolocation(&mut self, locator: &mut dyn GeoLocator) -> &GeoLocation {
        self.location
            .get_or_insert_with(|| lookup_or_unknown(locator))
    }

    /// Build the leaderboard entry for a finished game.
    pub fn build_record(
        &mut self,
        score: u64,
        elapsed_ms: u64,
        locator: &mut dyn GeoLocator,
    ) -> Result<PlayerRecord, ServiceError> {
        if self.name.is_empty() {
            return Err(ServiceError::InvalidRecord("missing player name".to_string()));
        }
        let location = self.geolocation(locator).clone();
        Ok(PlayerRecord {
            player_id: self.player_id.clone(),
            name: self.name.clone(),
            score,
            time: format_elapsed(elapsed_ms),
            elapsed_ms,
            difficulty: self.difficulty,
            date: chrono::Utc::now().format("%Y-%m-%d").to_string(),
            country: location.country,
            city: location.city,
            latitude: location.latitude,
            longitude: location.longitude,
        })
    }
}
