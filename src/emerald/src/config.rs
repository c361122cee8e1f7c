//! Reward and reader configuration
//!
//! Every field has a default, so a config file only needs the weights it
//! changes. Files ending in `.json` are parsed as JSON, anything else as YAML.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Weights and shaping constants of the reward function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    /// Per badge
    pub badge: f64,
    /// Once the Pokedex is obtained
    pub pokedex: f64,
    /// Once the PokeNav is obtained
    pub pokenav: f64,
    /// Once the player is champion
    pub champion: f64,
    /// Per visited town or city
    pub visit_city: f64,
    /// Per unit of money above the starting amount
    pub money_gained: f64,
    /// Per unit of money below the starting amount
    pub money_lost: f64,
    /// Per species seen
    pub seen_pokemon: f64,
    /// Per species caught
    pub caught_pokemon: f64,
    /// Per trainer flag set
    pub trainer_beat: f64,
    /// Per script flag transition
    pub event: f64,
    /// Exponent applied to total gained experience, in `(0, 1]`
    pub exp_shape: f64,
    /// Multiplier applied after the exponent
    pub exp_scale: f64,
    /// Money a new game starts with
    pub starting_money: u32,
    /// Money deltas at or above this are treated as a bad read
    pub money_glitch_threshold: u32,
    /// Towns visited before the player can move (the spawn town)
    pub starting_towns: u32,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            badge: 10.0,
            pokedex: 10.0,
            pokenav: 10.0,
            champion: 100.0,
            visit_city: 5.0,
            // A gain weight above twice the loss weight lets the agent farm
            // money by buying and selling at the mart
            money_gained: 0.0,
            money_lost: 0.0,
            seen_pokemon: 0.2,
            caught_pokemon: 1.0,
            trainer_beat: 1.0,
            event: 1.0,
            exp_shape: 0.3,
            exp_scale: 0.75,
            starting_money: 3000,
            money_glitch_threshold: 100_000,
            starting_towns: 1,
        }
    }
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

impl RewardConfig {
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a YAML or JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = read_file(path)?;
        if is_json(path) {
            Self::from_json(&contents)
        } else {
            Self::from_yaml(&contents)
        }
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Reject weights that would poison the reward with NaN or infinity
    pub fn validate(&self) -> Result<(), ConfigError> {
        let weights = [
            ("badge", self.badge),
            ("pokedex", self.pokedex),
            ("pokenav", self.pokenav),
            ("champion", self.champion),
            ("visit_city", self.visit_city),
            ("money_gained", self.money_gained),
            ("money_lost", self.money_lost),
            ("seen_pokemon", self.seen_pokemon),
            ("caught_pokemon", self.caught_pokemon),
            ("trainer_beat", self.trainer_beat),
            ("event", self.event),
            ("exp_scale", self.exp_scale),
        ];
        for (field, value) in weights {
            if !value.is_finite() {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("{value} is not finite"),
                });
            }
        }

        if !(self.exp_shape > 0.0 && self.exp_shape <= 1.0) {
            return Err(ConfigError::Invalid {
                field: "exp_shape",
                reason: format!("{} is outside (0, 1]", self.exp_shape),
            });
        }

        Ok(())
    }
}

/// What the reader decodes beyond the reward inputs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Decode PC items and bag pockets
    pub parse_items: bool,
}

impl ReaderConfig {
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(contents)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = read_file(path)?;
        if is_json(path) {
            Ok(serde_json::from_str(&contents)?)
        } else {
            Self::from_yaml(&contents)
        }
    }
}
