//! Engine configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

/// Engine configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineConfig {
    /// Reconciliation matching policy.
    #[serde(default)]
    pub matching: MatchPolicy,
}

/// Tunable policy for the reconciliation matcher.
///
/// Weights apply to the three similarity components of a match score and
/// must sum to exactly 1. All values are decimals so scores stay exact.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchPolicy {
    /// Weight of amount closeness in the composite score.
    #[serde(default = "default_amount_weight")]
    pub amount_weight: Decimal,
    /// Weight of date proximity in the composite score.
    #[serde(default = "default_date_weight")]
    pub date_weight: Decimal,
    /// Weight of description similarity in the composite score.
    #[serde(default = "default_text_weight")]
    pub text_weight: Decimal,
    /// Candidate window: ledger entries dated within this many days of the
    /// bank transaction are considered.
    #[serde(default = "default_date_tolerance_days")]
    pub date_tolerance_days: u32,
    /// Minimum composite score at which the automatic pass applies a match.
    #[serde(default = "default_auto_apply_threshold")]
    pub auto_apply_threshold: Decimal,
}

fn default_amount_weight() -> Decimal {
    Decimal::new(5, 1) // 0.5
}

fn default_date_weight() -> Decimal {
    Decimal::new(3, 1) // 0.3
}

fn default_text_weight() -> Decimal {
    Decimal::new(2, 1) // 0.2
}

fn default_date_tolerance_days() -> u32 {
    5
}

fn default_auto_apply_threshold() -> Decimal {
    Decimal::new(85, 2) // 0.85
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            amount_weight: default_amount_weight(),
            date_weight: default_date_weight(),
            text_weight: default_text_weight(),
            date_tolerance_days: default_date_tolerance_days(),
            auto_apply_threshold: default_auto_apply_threshold(),
        }
    }
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A config file or environment source could not be read or parsed.
    #[error(transparent)]
    Source(#[from] config::ConfigError),

    /// Match weights do not sum to 1.
    #[error("match weights must sum to 1, got {0}")]
    WeightsNotNormalized(Decimal),

    /// A weight is outside the `[0, 1]` range.
    #[error("match weight {name} must be between 0 and 1, got {value}")]
    WeightOutOfRange {
        /// Name of the offending weight field.
        name: &'static str,
        /// The rejected value.
        value: Decimal,
    },

    /// The auto-apply threshold is outside the `[0, 1]` range.
    #[error("auto-apply threshold must be between 0 and 1, got {0}")]
    ThresholdOutOfRange(Decimal),
}

impl MatchPolicy {
    /// Checks that weights are normalized and the threshold is a ratio.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("amount_weight", self.amount_weight),
            ("date_weight", self.date_weight),
            ("text_weight", self.text_weight),
        ] {
            if value < Decimal::ZERO || value > Decimal::ONE {
                return Err(ConfigError::WeightOutOfRange { name, value });
            }
        }

        let sum = self.amount_weight + self.date_weight + self.text_weight;
        if sum != Decimal::ONE {
            return Err(ConfigError::WeightsNotNormalized(sum));
        }

        if self.auto_apply_threshold < Decimal::ZERO || self.auto_apply_threshold > Decimal::ONE {
            return Err(ConfigError::ThresholdOutOfRange(self.auto_apply_threshold));
        }

        Ok(())
    }
}

impl EngineConfig {
    /// Loads configuration from config files and the environment.
    ///
    /// Sources, later ones overriding earlier: `config/default`,
    /// `config/{RUN_MODE}`, then `LEXUM__`-prefixed environment variables
    /// (e.g. `LEXUM__MATCHING__DATE_TOLERANCE_DAYS=7`).
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or the resulting policy
    /// fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("LEXUM").separator("__"))
            .build()?;

        let engine: Self = config.try_deserialize()?;
        engine.matching.validate()?;
        Ok(engine)
    }
}
