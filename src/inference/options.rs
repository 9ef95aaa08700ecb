//! String-keyed inference options.
//!
//! Options arrive as `key=value` text (command lines, property files) or as
//! a JSON object. Values are kept as text and parsed on access so that a
//! malformed number is reported against the key that carried it.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// Iteration budget option key.
pub const NUM_ITERATIONS: &str = "numit";
/// Relaxation labeling initial damping option key.
pub const BETA: &str = "beta";
/// Relaxation labeling per-sweep damping multiplier option key.
pub const DECAY: &str = "decay";
/// Gibbs sampling burn-in option key.
pub const BURN_IN: &str = "burnin";
/// Gibbs sampling chain count option key.
pub const NUM_CHAINS: &str = "numchains";

/// Ordered option map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct InferenceOptions(BTreeMap<String, String>);

impl InferenceOptions {
    /// Creates an empty option map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `key=value` entries separated by commas or whitespace.
    ///
    /// Keys are lower-cased; later entries override earlier ones.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::MalformedEntry` for an entry without `=`
    /// or with an empty key.
    pub fn parse(text: &str) -> Result<Self, ConfigurationError> {
        let mut options = Self::new();
        for entry in text.split(|c: char| c == ',' || c.is_whitespace()) {
            if entry.is_empty() {
                continue;
            }
            let Some((key, value)) = entry.split_once('=') else {
                return Err(ConfigurationError::MalformedEntry {
                    entry: entry.to_string(),
                });
            };
            if key.trim().is_empty() {
                return Err(ConfigurationError::MalformedEntry {
                    entry: entry.to_string(),
                });
            }
            options.set(key, value);
        }
        Ok(options)
    }

    /// Sets an option, replacing any previous value.
    pub fn set(&mut self, key: &str, value: impl fmt::Display) -> &mut Self {
        self.0
            .insert(key.trim().to_ascii_lowercase(), value.to_string().trim().to_string());
        self
    }

    /// Builder-style [`InferenceOptions::set`].
    #[must_use]
    pub fn with(mut self, key: &str, value: impl fmt::Display) -> Self {
        self.set(key, value);
        self
    }

    /// Raw text of an option.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Returns true if the option is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of options.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no option is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Integer option, or `default` when absent.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidNumber` if present but malformed.
    pub fn get_int(&self, key: &str, default: i64) -> Result<i64, ConfigurationError> {
        self.parse_value(key).map(|v| v.unwrap_or(default))
    }

    /// Floating-point option, or `default` when absent.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidNumber` if present but malformed
    /// or not finite.
    pub fn get_float(&self, key: &str, default: f64) -> Result<f64, ConfigurationError> {
        let value = self.parse_value::<f64>(key)?.unwrap_or(default);
        if value.is_finite() {
            Ok(value)
        } else {
            Err(self.invalid(key))
        }
    }

    fn parse_value<T: FromStr>(&self, key: &str) -> Result<Option<T>, ConfigurationError> {
        match self.get(key) {
            None => Ok(None),
            Some(raw) => raw.parse::<T>().map(Some).map_err(|_| self.invalid(key)),
        }
    }

    fn invalid(&self, key: &str) -> ConfigurationError {
        ConfigurationError::InvalidNumber {
            key: key.to_string(),
            value: self.get(key).unwrap_or_default().to_string(),
        }
    }

    /// Iterates over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<'de> Deserialize<'de> for InferenceOptions {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;
        let mut options = Self::new();
        for (key, value) in raw {
            match value {
                serde_json::Value::String(s) => options.set(&key, s),
                serde_json::Value::Number(n) => options.set(&key, n),
                serde_json::Value::Bool(b) => options.set(&key, b),
                other => {
                    return Err(serde::de::Error::custom(format!(
                        "option '{key}' must be a scalar, got {other}"
                    )))
                }
            };
        }
        Ok(options)
    }
}

impl FromStr for InferenceOptions {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
