//! Settings file for the terminal runner.
//!
//! A JSON document with optional `game` and `input` sections:
//!
//! ```json
//! { "game": { "difficulty": "HARD", "width": 12 }, "input": { "key_release_timeout_ms": 200 } }
//! ```
//!
//! Missing sections and fields keep their defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::GameConfig;
use crate::input::RepeatConfig;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub game: GameConfig,
    pub input: RepeatConfig,
}

impl Settings {
    pub fn from_json(text: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(text).context("invalid settings JSON")?;
        settings.game.validate()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading settings from {}", path.display()))?;
        Self::from_json(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Difficulty, BOARD_HEIGHT};

    #[test]
    fn partial_settings_keep_defaults() {
        let settings =
            Settings::from_json(r#"{ "game": { "difficulty": "HARD", "width": 12 } }"#).unwrap();
        assert_eq!(settings.game.difficulty, Difficulty::Hard);
        assert_eq!(settings.game.width, 12);
        assert_eq!(settings.game.height, BOARD_HEIGHT);
        assert_eq!(settings.input, RepeatConfig::default());
    }

    #[test]
    fn invalid_board_is_rejected() {
        assert!(Settings::from_json(r#"{ "game": { "width": 2 } }"#).is_err());
        assert!(Settings::from_json("[]").is_err());
    }
}
