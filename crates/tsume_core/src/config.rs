//! # Game Configuration
//!
//! All tuning constants live here so rules never reach for globals.
//!
//! ## Usage
//! ```rust
//! use tsume_core::config::GameConfig;
//!
//! let config = GameConfig::default();
//! let tight = GameConfig::from_json_str(r#"{ "rules": { "max_turns": 3 } }"#).unwrap();
//! assert_eq!(tight.rules.max_turns, 3);
//! assert_eq!(tight.court, config.court);
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::court::CourtConfig;
use crate::error::{ConfigError, Result};
use crate::scenario::start_row;
use crate::unit::TEAM_SIZE;

/// Turn, defense and mode constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    /// Completed passes allowed per possession.
    pub max_turns: u32,
    /// Streak at which defenders switch to rim and arc denial.
    pub advanced_defense_streak: u32,
    /// Ball-carrier distance to the basket within which a defender takes the rim.
    pub rim_denial_radius: i32,
    /// Arc cells within this distance of the ball carrier are denied.
    pub arc_denial_radius: i32,
    /// Countdown for time-attack games, in seconds.
    pub time_attack_seconds: u32,
    /// End the possession when the new ball carrier is locked up right after a pass,
    /// before the supports reposition. Entering action choice is always checked.
    pub lockup_after_pass: bool,
    /// Rankings kept per mode.
    pub leaderboard_capacity: usize,
    /// Longest name stored on a ranking.
    pub ranking_name_len: usize,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            max_turns: 4,
            advanced_defense_streak: 5,
            rim_denial_radius: 4,
            arc_denial_radius: 3,
            time_attack_seconds: 60,
            lockup_after_pass: true,
            leaderboard_capacity: 100,
            ranking_name_len: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub court: CourtConfig,
    pub rules: RuleConfig,
}

impl GameConfig {
    /// The shipped ruleset.
    pub fn standard() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let cfg: GameConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let cfg = Self::from_json_str(&text)?;
        log::debug!("Loaded game config from {:?}", path);
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        let court = &self.court;
        if court.grid_size < 2 {
            return Err(ConfigError::InvalidCourt(format!("grid size {} too small", court.grid_size)));
        }
        if !court.is_playable(court.basket) {
            return Err(ConfigError::InvalidCourt(format!("basket {} is not playable", court.basket)));
        }
        if let Some(cell) = court.arc.iter().chain(&court.layup).find(|c| !court.is_playable(**c)) {
            return Err(ConfigError::InvalidCourt(format!("zone cell {} is not playable", cell)));
        }
        let start = start_row(court);
        if start == court.reserved_row {
            return Err(ConfigError::InvalidCourt(format!("ball handler row {} is not playable", start)));
        }
        let free = court.playable_cells().filter(|&c| !court.is_basket(c)).count();
        if free < 2 * TEAM_SIZE {
            return Err(ConfigError::InvalidCourt(format!(
                "{} free cells cannot hold {} units",
                free,
                2 * TEAM_SIZE
            )));
        }
        if self.rules.max_turns == 0 {
            return Err(ConfigError::InvalidRules("max_turns must be at least 1".to_string()));
        }
        if self.rules.ranking_name_len == 0 {
            return Err(ConfigError::InvalidRules("ranking_name_len must be at least 1".to_string()));
        }
        Ok(())
    }
}
