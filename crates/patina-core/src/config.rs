use serde::{Deserialize, Serialize};

use crate::error::{PatinaError, Result};
use crate::proximity::DEFAULT_EPSILON;

/// Default radius for "what is influencing this point" queries, in canvas units.
pub const DEFAULT_NEAR_RADIUS: f64 = 1500.0;

pub const DEFAULT_EXTRACTOR_MODEL: &str = "claude-sonnet-4-5-20250929";
pub const DEFAULT_EXTRACTOR_MAX_TOKENS: u32 = 1024;
pub const DEFAULT_API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Root of `config.toml`.
///
/// Every section and field has a default, so a partial file (or none at all)
/// yields a usable configuration.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct RootConfig {
    #[serde(default)]
    pub aggregation: AggregationConfig,
    #[serde(default)]
    pub extractor: ExtractorConfig,
}

impl RootConfig {
    /// Rejects values the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        let agg = &self.aggregation;
        if !agg.epsilon.is_finite() || agg.epsilon <= 0.0 {
            return Err(PatinaError::config(format!(
                "aggregation.epsilon must be a positive number, got {}",
                agg.epsilon
            )));
        }
        if !agg.near_radius.is_finite() || agg.near_radius <= 0.0 {
            return Err(PatinaError::config(format!(
                "aggregation.near_radius must be a positive number, got {}",
                agg.near_radius
            )));
        }
        if self.extractor.max_tokens == 0 {
            return Err(PatinaError::config("extractor.max_tokens must be non-zero"));
        }
        if self.extractor.model.trim().is_empty() {
            return Err(PatinaError::config("extractor.model must not be empty"));
        }
        Ok(())
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct AggregationConfig {
    /// Smoothing constant of the inverse-distance weight.
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
    #[serde(default = "default_near_radius")]
    pub near_radius: f64,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            near_radius: DEFAULT_NEAR_RADIUS,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ExtractorConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Name of the environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            max_tokens: default_max_tokens(),
            api_key_env: default_api_key_env(),
        }
    }
}

fn default_epsilon() -> f64 {
    DEFAULT_EPSILON
}

fn default_near_radius() -> f64 {
    DEFAULT_NEAR_RADIUS
}

fn default_model() -> String {
    DEFAULT_EXTRACTOR_MODEL.to_string()
}

fn default_max_tokens() -> u32 {
    DEFAULT_EXTRACTOR_MAX_TOKENS
}

fn default_api_key_env() -> String {
    DEFAULT_API_KEY_ENV.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: RootConfig = toml::from_str("").unwrap();
        assert_eq!(config, RootConfig::default());
        assert_eq!(config.aggregation.epsilon, 1.0);
        assert_eq!(config.extractor.api_key_env, "ANTHROPIC_API_KEY");
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: RootConfig = toml::from_str(
            r#"
            [aggregation]
            epsilon = 25.0
            "#,
        )
        .unwrap();
        assert_eq!(config.aggregation.epsilon, 25.0);
        assert_eq!(config.aggregation.near_radius, DEFAULT_NEAR_RADIUS);
        assert_eq!(config.extractor.max_tokens, DEFAULT_EXTRACTOR_MAX_TOKENS);
    }

    #[test]
    fn test_validate_rejects_non_positive_epsilon() {
        let mut config = RootConfig::default();
        config.aggregation.epsilon = 0.0;
        assert!(config.validate().unwrap_err().is_config());

        config.aggregation.epsilon = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_max_tokens() {
        let mut config = RootConfig::default();
        config.extractor.max_tokens = 0;
        assert!(config.validate().is_err());
        assert!(RootConfig::default().validate().is_ok());
    }
}
