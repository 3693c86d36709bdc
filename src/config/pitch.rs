//! Pitch defaults

use serde::Deserialize;

use super::error::ValidationError;

/// Defaults applied to a pitch when the user gives none.
#[derive(Debug, Clone, Deserialize)]
pub struct PitchConfig {
    /// Requested investment in dollars
    #[serde(default = "default_amount")]
    pub default_amount: i64,

    /// Offered equity percentage
    #[serde(default = "default_equity")]
    pub default_equity: i64,
}

impl PitchConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.default_amount <= 0 {
            return Err(ValidationError::InvalidAmount);
        }
        if !(0..=100).contains(&self.default_equity) {
            return Err(ValidationError::InvalidEquity);
        }
        Ok(())
    }
}

impl Default for PitchConfig {
    fn default() -> Self {
        Self {
            default_amount: default_amount(),
            default_equity: default_equity(),
        }
    }
}

fn default_amount() -> i64 {
    100_000
}

fn default_equity() -> i64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pitch_defaults() {
        let config = PitchConfig::default();
        assert_eq!(config.default_amount, 100_000);
        assert_eq!(config.default_equity, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_bounds() {
        let negative = PitchConfig {
            default_amount: -1,
            ..Default::default()
        };
        assert_eq!(negative.validate(), Err(ValidationError::InvalidAmount));

        let too_much = PitchConfig {
            default_equity: 101,
            ..Default::default()
        };
        assert_eq!(too_much.validate(), Err(ValidationError::InvalidEquity));
    }
}
