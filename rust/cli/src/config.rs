//! Layered configuration: defaults, then the TOML file named by
//! `SEQUENCE_CONFIG`, then `SEQUENCE_*` environment variables. Command-line
//! flags are applied on top by [`Config::apply_overrides`].
//!
//! The file may also carry `[p1_weights]` / `[p2_weights]` tables that
//! replace the preset of that player's heuristic bot:
//!
//! ```toml
//! p1 = "defensive"
//!
//! [p1_weights]
//! block_win = 9000.0
//! jack_save = 20.0
//! ```

use serde::{Deserialize, Serialize};
use sequence_ai::heuristic::HeuristicBot;
use sequence_ai::{Bot, Strategy, Weights, create_bot};
use sequence_engine::player::Player;
use sequence_engine::game::{
    DEFAULT_HAND_SIZE, DEFAULT_MAX_TURNS, DEFAULT_SEQUENCES_TO_WIN, GameConfig,
};
use std::fs;
use thiserror::Error;

pub const CONFIG_ENV: &str = "SEQUENCE_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub seed: Option<u64>,
    pub hand_size: usize,
    pub sequences_to_win: usize,
    pub max_turns: u32,
    pub p1: Strategy,
    pub p2: Strategy,
    /// Custom weights for player one; missing keys take the balanced value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p1_weights: Option<Weights>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p2_weights: Option<Weights>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: None,
            hand_size: DEFAULT_HAND_SIZE,
            sequences_to_win: DEFAULT_SEQUENCES_TO_WIN,
            max_turns: DEFAULT_MAX_TURNS,
            p1: Strategy::Balanced,
            p2: Strategy::Balanced,
            p1_weights: None,
            p2_weights: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfigSources {
    pub seed: ValueSource,
    pub hand_size: ValueSource,
    pub sequences_to_win: ValueSource,
    pub max_turns: ValueSource,
    pub p1: ValueSource,
    pub p2: ValueSource,
    pub p1_weights: ValueSource,
    pub p2_weights: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            seed: ValueSource::Default,
            hand_size: ValueSource::Default,
            sequences_to_win: ValueSource::Default,
            max_turns: ValueSource::Default,
            p1: ValueSource::Default,
            p2: ValueSource::Default,
            p1_weights: ValueSource::Default,
            p2_weights: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: Config,
    pub sources: ConfigSources,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Command-line values that take precedence over every other layer.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub seed: Option<u64>,
    pub hand_size: Option<usize>,
    pub sequences_to_win: Option<usize>,
    pub max_turns: Option<u32>,
    pub p1: Option<Strategy>,
    pub p2: Option<Strategy>,
}

impl Config {
    pub fn apply_overrides(&mut self, o: &Overrides) -> Result<(), ConfigError> {
        if o.seed.is_some() {
            self.seed = o.seed;
        }
        if let Some(v) = o.hand_size {
            self.hand_size = v;
        }
        if let Some(v) = o.sequences_to_win {
            self.sequences_to_win = v;
        }
        if let Some(v) = o.max_turns {
            self.max_turns = v;
        }
        if let Some(v) = o.p1 {
            self.p1 = v;
        }
        if let Some(v) = o.p2 {
            self.p2 = v;
        }
        validate(self)
    }

    pub fn strategy(&self, player: Player) -> Strategy {
        match player {
            Player::One => self.p1,
            Player::Two => self.p2,
        }
    }

    fn custom_weights(&self, player: Player) -> Option<Weights> {
        match player {
            Player::One => self.p1_weights,
            Player::Two => self.p2_weights,
        }
    }

    /// Weights `player`'s moves are scored with: the custom table, else the
    /// strategy preset, else balanced (random bot).
    pub fn weights_for(&self, player: Player) -> Weights {
        self.custom_weights(player)
            .or_else(|| self.strategy(player).weights())
            .unwrap_or_default()
    }

    /// Bot for `player`. A custom table turns a heuristic strategy into a
    /// `heuristic-<strategy>-custom` bot; the random bot ignores it.
    pub fn bot_for(&self, player: Player) -> Box<dyn Bot> {
        let strategy = self.strategy(player);
        match self.custom_weights(player) {
            Some(w) if strategy != Strategy::Random => Box::new(HeuristicBot::with_weights(
                format!("heuristic-{strategy}-custom"),
                w,
            )),
            _ => create_bot(strategy),
        }
    }

    /// Engine configuration for one game seeded with `seed`.
    pub fn game_config(&self, seed: u64) -> GameConfig {
        GameConfig {
            deck_seed: Some(seed),
            hand_size: self.hand_size,
            sequences_to_win: self.sequences_to_win,
            max_turns: self.max_turns,
        }
    }
}

pub fn load() -> Result<Config, ConfigError> {
    load_with_sources().map(|resolved| resolved.config)
}

/// Defaults, config file and environment, with overrides applied last.
pub fn resolve(overrides: &Overrides) -> Result<Config, ConfigError> {
    let mut cfg = load()?;
    cfg.apply_overrides(overrides)?;
    Ok(cfg)
}

pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let mut cfg = Config::default();
    let mut sources = ConfigSources::default();

    if let Ok(path) = std::env::var(CONFIG_ENV)
        && !path.is_empty()
    {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
        if let Some(v) = f.hand_size {
            cfg.hand_size = v;
            sources.hand_size = ValueSource::File;
        }
        if let Some(v) = f.sequences_to_win {
            cfg.sequences_to_win = v;
            sources.sequences_to_win = ValueSource::File;
        }
        if let Some(v) = f.max_turns {
            cfg.max_turns = v;
            sources.max_turns = ValueSource::File;
        }
        if let Some(v) = f.p1 {
            cfg.p1 = parse_strategy(&v)?;
            sources.p1 = ValueSource::File;
        }
        if let Some(v) = f.p2 {
            cfg.p2 = parse_strategy(&v)?;
            sources.p2 = ValueSource::File;
        }
        if let Some(w) = f.p1_weights {
            cfg.p1_weights = Some(w);
            sources.p1_weights = ValueSource::File;
        }
        if let Some(w) = f.p2_weights {
            cfg.p2_weights = Some(w);
            sources.p2_weights = ValueSource::File;
        }
    }

    if let Some(v) = env_value("SEQUENCE_SEED") {
        cfg.seed = Some(parse_env(&v, "SEQUENCE_SEED")?);
        sources.seed = ValueSource::Env;
    }
    if let Some(v) = env_value("SEQUENCE_HAND_SIZE") {
        cfg.hand_size = parse_env(&v, "SEQUENCE_HAND_SIZE")?;
        sources.hand_size = ValueSource::Env;
    }
    if let Some(v) = env_value("SEQUENCE_SEQUENCES_TO_WIN") {
        cfg.sequences_to_win = parse_env(&v, "SEQUENCE_SEQUENCES_TO_WIN")?;
        sources.sequences_to_win = ValueSource::Env;
    }
    if let Some(v) = env_value("SEQUENCE_MAX_TURNS") {
        cfg.max_turns = parse_env(&v, "SEQUENCE_MAX_TURNS")?;
        sources.max_turns = ValueSource::Env;
    }
    if let Some(v) = env_value("SEQUENCE_P1") {
        cfg.p1 = parse_strategy(&v)?;
        sources.p1 = ValueSource::Env;
    }
    if let Some(v) = env_value("SEQUENCE_P2") {
        cfg.p2 = parse_strategy(&v)?;
        sources.p2 = ValueSource::Env;
    }

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

#[derive(Debug, Deserialize)]
struct FileConfig {
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    hand_size: Option<usize>,
    #[serde(default)]
    sequences_to_win: Option<usize>,
    #[serde(default)]
    max_turns: Option<u32>,
    #[serde(default)]
    p1: Option<String>,
    #[serde(default)]
    p2: Option<String>,
    #[serde(default)]
    p1_weights: Option<Weights>,
    #[serde(default)]
    p2_weights: Option<Weights>,
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn parse_env<T: std::str::FromStr>(raw: &str, key: &str) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::Invalid(format!("{key} has invalid value '{raw}'")))
}

fn parse_strategy(raw: &str) -> Result<Strategy, ConfigError> {
    raw.parse()
        .map_err(|e: sequence_ai::ParseStrategyError| ConfigError::Invalid(e.to_string()))
}

fn validate(cfg: &Config) -> Result<(), ConfigError> {
    for (table, weights) in [("p1_weights", cfg.p1_weights), ("p2_weights", cfg.p2_weights)] {
        if let Some(key) = weights.and_then(|w| w.first_non_finite()) {
            return Err(ConfigError::Invalid(format!("{table}.{key} must be finite")));
        }
    }
    cfg.game_config(0)
        .validate()
        .map_err(|e| match e {
            sequence_engine::errors::GameError::InvalidConfig(msg) => ConfigError::Invalid(msg),
            other => ConfigError::Invalid(other.to_string()),
        })
}
