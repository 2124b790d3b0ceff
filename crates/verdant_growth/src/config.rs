//! Growth tuning, loaded once at startup.
//!
//! Everything a designer might retune lives here and deserializes from
//! TOML; code holds no magic intervals.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected tuning values.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML text failed to parse.
    #[error("bad growth config: {0}")]
    Toml(#[from] toml::de::Error),

    /// Intervals must be positive.
    #[error("interval {name} must be positive")]
    InvalidInterval {
        /// Which interval was zero.
        name: &'static str,
    },

    /// Longevity bounds must satisfy `min < max`.
    #[error("longevity bounds {min}..{max} are not a valid range")]
    InvalidLongevity {
        /// Configured minimum longevity.
        min: u32,
        /// Configured maximum longevity.
        max: u32,
    },

    /// The death-curve exponent must be positive and finite.
    #[error("death exponent {0} is not positive and finite")]
    InvalidExponent(f32),

    /// World-gen generation bounds must satisfy `min <= max` and `min >= 1`.
    #[error("generated-generation bounds {min}..={max} are not a valid range")]
    InvalidGeneratedRange {
        /// Configured minimum generation count.
        min: u32,
        /// Configured maximum generation count.
        max: u32,
    },

    /// A staged plant definition needs at least one stage.
    #[error("staged plant needs at least one stage")]
    NoStages,
}

/// Timed-growth tuning for one tree species.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthConfig {
    /// Normal delay between growth checks, in milliseconds.
    pub growth_interval_ms: u64,
    /// Longer delay after the world rejects a placement batch.
    pub backoff_interval_ms: u64,
    /// Below this generation a tree never dies.
    pub min_longevity: u32,
    /// At or beyond this generation death is certain.
    pub max_longevity: u32,
    /// Exponent of the death-probability power curve.
    pub death_exponent: f32,
    /// Smallest generation count stamped on world-generated trees.
    pub generated_min_generations: u32,
    /// Largest generation count stamped on world-generated trees.
    pub generated_max_generations: u32,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            growth_interval_ms: 60_000,
            backoff_interval_ms: 180_000,
            min_longevity: 5,
            max_longevity: 12,
            death_exponent: 2.0,
            generated_min_generations: 4,
            generated_max_generations: 9,
        }
    }
}

impl GrowthConfig {
    /// Parses and validates TOML tuning text.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] on parse failure or out-of-range values.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the invariants every other module assumes.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] naming the first violated bound.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.growth_interval_ms == 0 {
            return Err(ConfigError::InvalidInterval { name: "growth_interval_ms" });
        }
        if self.backoff_interval_ms == 0 {
            return Err(ConfigError::InvalidInterval { name: "backoff_interval_ms" });
        }
        if self.min_longevity >= self.max_longevity {
            return Err(ConfigError::InvalidLongevity {
                min: self.min_longevity,
                max: self.max_longevity,
            });
        }
        if !(self.death_exponent.is_finite() && self.death_exponent > 0.0) {
            return Err(ConfigError::InvalidExponent(self.death_exponent));
        }
        if self.generated_min_generations < 1
            || self.generated_min_generations > self.generated_max_generations
        {
            return Err(ConfigError::InvalidGeneratedRange {
                min: self.generated_min_generations,
                max: self.generated_max_generations,
            });
        }
        Ok(())
    }

    /// Probability that a tree at `generation` dies on this check.
    ///
    /// Zero below the minimum longevity, certain at the maximum, a
    /// monotonic power curve in between.
    #[must_use]
    pub fn death_probability(&self, generation: u32) -> f32 {
        if generation < self.min_longevity {
            return 0.0;
        }
        if generation >= self.max_longevity {
            return 1.0;
        }
        let span = (self.max_longevity - self.min_longevity) as f32;
        let progress = (generation - self.min_longevity) as f32 / span;
        progress.powf(self.death_exponent).clamp(0.0, 1.0)
    }
}
