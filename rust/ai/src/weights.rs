//! Named weight vectors for the heuristic bot.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Scoring weights. Every sub-score of the evaluator is one of these times a
/// count or a flag.
///
/// Deserializing a partial table fills the missing keys from
/// [`Weights::BALANCED`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    /// Placement completes at least one new sequence
    pub win_sequence: f64,
    pub extend_4: f64,
    pub extend_3: f64,
    pub extend_2: f64,
    /// Lone chip with no neighbours in any direction
    pub new_potential: f64,
    pub corner_use: f64,
    pub block_win: f64,
    pub block_4: f64,
    pub block_3: f64,
    pub block_2: f64,
    /// Penalty for spending a Jack
    pub jack_save: f64,
    /// Fraction of `jack_save` charged when no non-Jack move is critical
    pub jack_relief: f64,
    pub center_bonus: f64,
    pub flexibility: f64,
}

impl Weights {
    pub const BALANCED: Weights = Weights {
        win_sequence: 10000.0,
        extend_4: 450.0,
        extend_3: 90.0,
        extend_2: 28.0,
        new_potential: 12.0,
        corner_use: 22.0,
        block_win: 6000.0,
        block_4: 400.0,
        block_3: 80.0,
        block_2: 20.0,
        jack_save: 12.0,
        jack_relief: 0.5,
        center_bonus: 4.0,
        flexibility: 7.0,
    };

    pub const AGGRESSIVE: Weights = Weights {
        win_sequence: 10000.0,
        extend_4: 500.0,
        extend_3: 100.0,
        extend_2: 30.0,
        new_potential: 15.0,
        corner_use: 25.0,
        block_win: 5000.0,
        block_4: 300.0,
        block_3: 60.0,
        block_2: 15.0,
        jack_save: 10.0,
        jack_relief: 0.5,
        center_bonus: 5.0,
        flexibility: 8.0,
    };

    pub const DEFENSIVE: Weights = Weights {
        win_sequence: 10000.0,
        extend_4: 400.0,
        extend_3: 80.0,
        extend_2: 25.0,
        new_potential: 10.0,
        corner_use: 20.0,
        block_win: 8000.0,
        block_4: 500.0,
        block_3: 100.0,
        block_2: 30.0,
        jack_save: 15.0,
        jack_relief: 0.5,
        center_bonus: 3.0,
        flexibility: 5.0,
    };
}

impl Weights {
    /// Every weight with its key, in declaration order.
    pub fn entries(&self) -> [(&'static str, f64); 14] {
        [
            ("win_sequence", self.win_sequence),
            ("extend_4", self.extend_4),
            ("extend_3", self.extend_3),
            ("extend_2", self.extend_2),
            ("new_potential", self.new_potential),
            ("corner_use", self.corner_use),
            ("block_win", self.block_win),
            ("block_4", self.block_4),
            ("block_3", self.block_3),
            ("block_2", self.block_2),
            ("jack_save", self.jack_save),
            ("jack_relief", self.jack_relief),
            ("center_bonus", self.center_bonus),
            ("flexibility", self.flexibility),
        ]
    }

    /// Key of the first NaN or infinite weight.
    pub fn first_non_finite(&self) -> Option<&'static str> {
        self.entries()
            .into_iter()
            .find(|(_, v)| !v.is_finite())
            .map(|(k, _)| k)
    }
}

impl Default for Weights {
    fn default() -> Self {
        Self::BALANCED
    }
}

/// Bot selection, as named on the command line and in config files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    #[default]
    Balanced,
    Aggressive,
    Defensive,
    /// Uniform choice among legal moves
    Random,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::Balanced,
        Strategy::Aggressive,
        Strategy::Defensive,
        Strategy::Random,
    ];

    /// Strategies backed by a weight preset.
    pub const HEURISTIC: [Strategy; 3] = [
        Strategy::Balanced,
        Strategy::Aggressive,
        Strategy::Defensive,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Balanced => "balanced",
            Strategy::Aggressive => "aggressive",
            Strategy::Defensive => "defensive",
            Strategy::Random => "random",
        }
    }

    /// Weight preset, `None` for the random bot.
    pub fn weights(self) -> Option<Weights> {
        match self {
            Strategy::Balanced => Some(Weights::BALANCED),
            Strategy::Aggressive => Some(Weights::AGGRESSIVE),
            Strategy::Defensive => Some(Weights::DEFENSIVE),
            Strategy::Random => None,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown strategy '{0}' (expected balanced, aggressive, defensive or random)")]
pub struct ParseStrategyError(pub String);

impl FromStr for Strategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Strategy::ALL
            .into_iter()
            .find(|st| st.as_str() == lower)
            .ok_or_else(|| ParseStrategyError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_parses_case_insensitively() {
        assert_eq!("Aggressive".parse::<Strategy>(), Ok(Strategy::Aggressive));
        assert_eq!(" random ".parse::<Strategy>(), Ok(Strategy::Random));
        assert!("greedy".parse::<Strategy>().is_err());
    }

    #[test]
    fn defensive_preset_values_blocking_over_extending() {
        let w = Weights::DEFENSIVE;
        assert!(w.block_win > Weights::BALANCED.block_win);
        assert!(w.extend_4 < Weights::AGGRESSIVE.extend_4);
        assert_eq!(Strategy::Defensive.weights(), Some(w));
        assert_eq!(Strategy::Random.weights(), None);
    }

    #[test]
    fn completing_outweighs_any_block() {
        for st in Strategy::HEURISTIC {
            let w = st.weights().unwrap();
            assert!(w.win_sequence > w.block_win);
        }
    }

    #[test]
    fn partial_table_fills_from_balanced() {
        let w: Weights = serde_json::from_str(r#"{"block_win": 7000.0}"#).unwrap();
        assert_eq!(w.block_win, 7000.0);
        assert_eq!(w.win_sequence, Weights::BALANCED.win_sequence);
        assert_eq!(w.first_non_finite(), None);
        let bad = Weights {
            jack_save: f64::NAN,
            ..Weights::BALANCED
        };
        assert_eq!(bad.first_non_finite(), Some("jack_save"));
    }
}
