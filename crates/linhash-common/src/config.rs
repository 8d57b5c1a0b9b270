//! Configuration structures for the linear hashing index and its workload driver.

use crate::error::{LinHashError, Result};
use crate::page::{Key, DEFAULT_PAGE_CAPACITY};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Index configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Number of keys held by one page before an overflow page is chained.
    pub page_capacity: usize,
    /// Maximum tolerated average page accesses per insertion before a split is forced.
    pub cost_max: f64,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            page_capacity: DEFAULT_PAGE_CAPACITY,
            cost_max: 2.0,
        }
    }
}

impl IndexConfig {
    /// Creates a config with the given page capacity and cost threshold.
    pub fn new(page_capacity: usize, cost_max: f64) -> Self {
        Self {
            page_capacity,
            cost_max,
        }
    }

    /// Checks that the parameters describe a usable index.
    pub fn validate(&self) -> Result<()> {
        if self.page_capacity == 0 {
            return Err(LinHashError::InvalidParameter {
                name: "page_capacity".to_string(),
                value: self.page_capacity.to_string(),
            });
        }
        validate_cost_max(self.cost_max)
    }
}

/// Checks a cost threshold: finite and non-negative.
pub fn validate_cost_max(cost_max: f64) -> Result<()> {
    if !cost_max.is_finite() || cost_max < 0.0 {
        return Err(LinHashError::InvalidParameter {
            name: "cost_max".to_string(),
            value: cost_max.to_string(),
        });
    }
    Ok(())
}

/// Key stream parameters for the workload driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkloadConfig {
    /// The stream inserts `2^log2_keys` keys.
    pub log2_keys: u32,
    /// Keys are drawn uniformly from `0..=max_key`.
    pub max_key: Key,
    /// RNG seed; a random seed is chosen when absent.
    pub seed: Option<u64>,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            log2_keys: 16,
            max_key: i32::MAX as Key,
            seed: None,
        }
    }
}

impl WorkloadConfig {
    /// Largest supported stream exponent.
    pub const MAX_LOG2_KEYS: u32 = 40;

    /// Returns the number of keys in the stream.
    pub fn key_count(&self) -> u64 {
        1u64 << self.log2_keys.min(Self::MAX_LOG2_KEYS)
    }

    /// Checks that the stream parameters are in range.
    pub fn validate(&self) -> Result<()> {
        if self.log2_keys > Self::MAX_LOG2_KEYS {
            return Err(LinHashError::InvalidParameter {
                name: "log2_keys".to_string(),
                value: self.log2_keys.to_string(),
            });
        }
        if self.max_key < 0 {
            return Err(LinHashError::InvalidParameter {
                name: "max_key".to_string(),
                value: self.max_key.to_string(),
            });
        }
        Ok(())
    }
}

/// Top-level configuration file layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinHashConfig {
    /// Index parameters.
    pub index: IndexConfig,
    /// Workload parameters.
    pub workload: WorkloadConfig,
}

impl LinHashConfig {
    /// Parses a configuration from JSON text.
    ///
    /// Blank input is a configuration error; `{}` selects every default.
    pub fn from_json(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Err(LinHashError::ConfigError(
                "configuration is empty".to_string(),
            ));
        }
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text).map_err(|e| match e {
            LinHashError::ConfigError(msg) => {
                LinHashError::ConfigError(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Validates both sections.
    pub fn validate(&self) -> Result<()> {
        self.index.validate()?;
        self.workload.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_config_defaults() {
        let config = IndexConfig::default();
        assert_eq!(config.page_capacity, 128);
        assert_eq!(config.cost_max, 2.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_index_config_rejects_zero_capacity() {
        let config = IndexConfig::new(0, 1.0);
        let err = config.validate().unwrap_err();
        assert_eq!(err.to_string(), "Invalid parameter: page_capacity = 0");
    }

    #[test]
    fn test_index_config_rejects_bad_cost() {
        assert!(IndexConfig::new(4, -1.0).validate().is_err());
        assert!(IndexConfig::new(4, f64::NAN).validate().is_err());
        assert!(IndexConfig::new(4, f64::INFINITY).validate().is_err());
        assert!(IndexConfig::new(4, 0.0).validate().is_ok());
    }

    #[test]
    fn test_workload_config_defaults() {
        let config = WorkloadConfig::default();
        assert_eq!(config.log2_keys, 16);
        assert_eq!(config.key_count(), 65_536);
        assert_eq!(config.max_key, 2_147_483_647);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_workload_config_rejects_out_of_range() {
        let config = WorkloadConfig {
            log2_keys: 41,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = WorkloadConfig {
            max_key: -5,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.to_string(), "Invalid parameter: max_key = -5");
    }

    #[test]
    fn test_config_from_partial_json() {
        let config = LinHashConfig::from_json(
            r#"{ "index": { "page_capacity": 4 }, "workload": { "seed": 7 } }"#,
        )
        .unwrap();
        assert_eq!(config.index.page_capacity, 4);
        assert_eq!(config.index.cost_max, 2.0);
        assert_eq!(config.workload.seed, Some(7));
        assert_eq!(config.workload.log2_keys, 16);
    }

    #[test]
    fn test_config_from_empty_json() {
        let config = LinHashConfig::from_json("{}").unwrap();
        assert_eq!(config, LinHashConfig::default());
    }

    #[test]
    fn test_config_from_json_validates() {
        let result = LinHashConfig::from_json(r#"{ "index": { "page_capacity": 0 } }"#);
        assert!(matches!(
            result,
            Err(LinHashError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_config_from_blank_text() {
        for text in ["", "  \n\t"] {
            let err = LinHashConfig::from_json(text).unwrap_err();
            assert!(matches!(err, LinHashError::ConfigError(_)));
            assert_eq!(err.to_string(), "Configuration error: configuration is empty");
        }
    }

    #[test]
    fn test_config_from_malformed_json() {
        let result = LinHashConfig::from_json("{ index: ");
        assert!(matches!(result, Err(LinHashError::Serialization(_))));
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let original = LinHashConfig {
            index: IndexConfig::new(16, 1.5),
            workload: WorkloadConfig {
                log2_keys: 10,
                max_key: 1000,
                seed: Some(42),
            },
        };
        let serialized = serde_json::to_string(&original).unwrap();
        let deserialized = LinHashConfig::from_json(&serialized).unwrap();
        assert_eq!(original, deserialized);
    }

    #[test]
    fn test_config_load_missing_file() {
        let result = LinHashConfig::load("/nonexistent/linhash.json");
        assert!(matches!(result, Err(LinHashError::Io(_))));
    }
}
