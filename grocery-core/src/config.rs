//! Generator configuration from environment variables.

use std::env;
use thiserror::Error;

/// Multiplier applied to meal assignments that don't specify one.
pub const DEFAULT_SERVING_MULTIPLIER: f64 = 1.0;

/// Prefix of generated list names: "{prefix} {meal plan name}".
pub const DEFAULT_LIST_NAME_PREFIX: &str = "Grocery List for";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    pub default_serving_multiplier: f64,
    pub list_name_prefix: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            default_serving_multiplier: DEFAULT_SERVING_MULTIPLIER,
            list_name_prefix: DEFAULT_LIST_NAME_PREFIX.to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional:
    /// - `GROCERY_DEFAULT_SERVING_MULTIPLIER`: positive number (default: 1.0)
    /// - `GROCERY_LIST_NAME_PREFIX`: list name prefix (default: "Grocery List for")
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let default_serving_multiplier = match lookup("GROCERY_DEFAULT_SERVING_MULTIPLIER") {
            Some(raw) => parse_multiplier("GROCERY_DEFAULT_SERVING_MULTIPLIER", &raw)?,
            None => DEFAULT_SERVING_MULTIPLIER,
        };

        let list_name_prefix = lookup("GROCERY_LIST_NAME_PREFIX")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_LIST_NAME_PREFIX.to_string());

        Ok(Self {
            default_serving_multiplier,
            list_name_prefix,
        })
    }

    pub fn list_name(&self, meal_plan_name: &str) -> String {
        format!("{} {}", self.list_name_prefix, meal_plan_name)
    }

    /// The multiplier to use for an assignment.
    pub fn serving_multiplier(&self, assigned: Option<f64>) -> f64 {
        assigned.unwrap_or(self.default_serving_multiplier)
    }
}

fn parse_multiplier(name: &str, raw: &str) -> Result<f64, ConfigError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
        .ok_or_else(|| ConfigError::InvalidValue {
            name: name.to_string(),
            value: raw.to_string(),
        })
}
