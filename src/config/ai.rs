//! Text generation configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Text generation configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// Anthropic API key
    pub anthropic_api_key: Option<String>,

    /// Which generator to use; inferred from the API key when unset
    pub provider: Option<AiProvider>,

    /// Model name passed to Anthropic
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the Anthropic API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries on failure
    #[serde(default = "default_retries")]
    pub max_retries: u32,
}

/// Text generator type
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    Anthropic,
    Offline,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if Anthropic is configured
    pub fn has_anthropic(&self) -> bool {
        self.anthropic_api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// The generator to use: the explicit choice, else Anthropic when a key
    /// is present, else offline templates.
    pub fn resolved_provider(&self) -> AiProvider {
        match self.provider {
            Some(provider) => provider,
            None if self.has_anthropic() => AiProvider::Anthropic,
            None => AiProvider::Offline,
        }
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.resolved_provider() == AiProvider::Anthropic {
            if !self.has_anthropic() {
                return Err(ValidationError::MissingRequired("AI__ANTHROPIC_API_KEY"));
            }
            if self.model.is_empty() {
                return Err(ValidationError::MissingRequired("AI__MODEL"));
            }
            if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
                return Err(ValidationError::InvalidAiBaseUrl);
            }
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            anthropic_api_key: None,
            provider: None,
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
        }
    }
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_base_url() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_timeout() -> u64 {
    120
}

fn default_retries() -> u32 {
    3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_config_defaults() {
        let config = AiConfig::default();
        assert_eq!(config.timeout_secs, 120);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.resolved_provider(), AiProvider::Offline);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_timeout_duration() {
        let config = AiConfig {
            timeout_secs: 60,
            ..Default::default()
        };
        assert_eq!(config.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_key_selects_anthropic() {
        let config = AiConfig {
            anthropic_api_key: Some("sk-ant-xxx".to_string()),
            ..Default::default()
        };
        assert_eq!(config.resolved_provider(), AiProvider::Anthropic);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_explicit_offline_ignores_key() {
        let config = AiConfig {
            anthropic_api_key: Some("sk-ant-xxx".to_string()),
            provider: Some(AiProvider::Offline),
            ..Default::default()
        };
        assert_eq!(config.resolved_provider(), AiProvider::Offline);
    }

    #[test]
    fn test_validation_anthropic_without_key() {
        let config = AiConfig {
            provider: Some(AiProvider::Anthropic),
            anthropic_api_key: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("AI__ANTHROPIC_API_KEY"))
        );
    }

    #[test]
    fn test_validation_bad_base_url() {
        let config = AiConfig {
            anthropic_api_key: Some("sk-ant-xxx".to_string()),
            base_url: "api.anthropic.com".to_string(),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidAiBaseUrl));
    }
}
