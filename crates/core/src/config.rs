//! Runtime game configuration.
//!
//! Defaults come from the constants in `types`; every field may be overridden
//! from JSON (missing fields keep their default).

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::pieces::spawn_footprint;
use crate::types::{
    Difficulty, AUTO_DROP_MS, BOARD_HEIGHT, BOARD_WIDTH, BONUS_BANNER_MS,
    BONUS_ELIGIBILITY_PERCENT, LINE_SCORE_MS, MAX_BOARD_SIDE, MIN_BOARD_SIDE,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub width: u16,
    pub height: u16,
    pub difficulty: Difficulty,
    /// Auto-drop fires once the drop counter exceeds this many milliseconds.
    pub drop_interval_ms: u32,
    pub bonus_eligibility_percent: f64,
    pub bonus_banner_ms: u32,
    pub line_score_ms: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
            difficulty: Difficulty::default(),
            drop_interval_ms: AUTO_DROP_MS,
            bonus_eligibility_percent: BONUS_ELIGIBILITY_PERCENT,
            bonus_banner_ms: BONUS_BANNER_MS,
            line_score_ms: LINE_SCORE_MS,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < MIN_BOARD_SIDE || self.height < MIN_BOARD_SIDE {
            return Err(ConfigError::BoardTooSmall {
                width: self.width,
                height: self.height,
                min: MIN_BOARD_SIDE,
            });
        }
        if self.width > MAX_BOARD_SIDE || self.height > MAX_BOARD_SIDE {
            return Err(ConfigError::BoardTooLarge {
                width: self.width,
                height: self.height,
                max: MAX_BOARD_SIDE,
            });
        }
        let (min_width, min_height) = spawn_footprint(self.difficulty);
        if self.width < min_width || self.height < min_height {
            return Err(ConfigError::PiecesDoNotFit {
                difficulty: self.difficulty,
                width: self.width,
                height: self.height,
                min_width,
                min_height,
            });
        }
        if !(0.0..=100.0).contains(&self.bonus_eligibility_percent) {
            return Err(ConfigError::EligibilityOutOfRange(
                self.bonus_eligibility_percent,
            ));
        }
        if self.drop_interval_ms == 0 {
            return Err(ConfigError::ZeroDropInterval);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = GameConfig::default();
        assert_eq!((config.width, config.height), (16, 28));
        assert_eq!(config.difficulty, Difficulty::Medium);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let small = GameConfig {
            width: 3,
            ..GameConfig::default()
        };
        assert!(matches!(
            small.validate(),
            Err(ConfigError::BoardTooSmall { width: 3, .. })
        ));

        let huge = GameConfig {
            width: 40_000,
            ..GameConfig::default()
        };
        assert!(matches!(
            huge.validate(),
            Err(ConfigError::BoardTooLarge { width: 40_000, .. })
        ));

        let pct = GameConfig {
            bonus_eligibility_percent: 101.0,
            ..GameConfig::default()
        };
        assert_eq!(
            pct.validate(),
            Err(ConfigError::EligibilityOutOfRange(101.0))
        );

        let nan = GameConfig {
            bonus_eligibility_percent: f64::NAN,
            ..GameConfig::default()
        };
        assert!(nan.validate().is_err());

        let zero = GameConfig {
            drop_interval_ms: 0,
            ..GameConfig::default()
        };
        assert_eq!(zero.validate(), Err(ConfigError::ZeroDropInterval));
    }

    #[test]
    fn test_narrowest_board_per_tier() {
        for (difficulty, min_width) in [
            (Difficulty::Easy, 4),
            (Difficulty::Medium, 5),
            (Difficulty::Hard, 5),
        ] {
            let fits = GameConfig {
                width: min_width,
                height: MIN_BOARD_SIDE,
                difficulty,
                ..GameConfig::default()
            };
            assert!(fits.validate().is_ok(), "{difficulty:?}");

            let narrow = GameConfig {
                width: min_width - 1,
                ..fits.clone()
            };
            if min_width - 1 >= MIN_BOARD_SIDE {
                assert!(matches!(
                    narrow.validate(),
                    Err(ConfigError::PiecesDoNotFit { .. })
                ));
            } else {
                assert!(narrow.validate().is_err());
            }
        }
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: GameConfig =
            serde_json::from_str(r#"{"difficulty":"HARD","width":10}"#).unwrap();
        assert_eq!(config.difficulty, Difficulty::Hard);
        assert_eq!(config.width, 10);
        assert_eq!(config.height, BOARD_HEIGHT);
        assert_eq!(config.drop_interval_ms, AUTO_DROP_MS);
    }
}
