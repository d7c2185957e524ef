// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Publisher configuration.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Name given to publishers built without an explicit configuration.
pub const DEFAULT_PUBLISHER_NAME: &str = "weather-station";

/// Number of subscriber failures kept by default.
pub const DEFAULT_FAILURE_LOG_CAPACITY: usize = 32;

/// Configuration for a [`Publisher`](crate::Publisher).
///
/// # Examples
///
/// ```
/// use weather_station::PublisherConfig;
///
/// // Defaults
/// let config = PublisherConfig::default();
/// assert_eq!(config.name, "weather-station");
///
/// // Builder style
/// let config = PublisherConfig::new()
///     .with_name("rooftop")
///     .with_failure_log_capacity(8);
///
/// // From JSON, missing fields fall back to defaults
/// let config = PublisherConfig::from_json_str(r#"{"name": "garden"}"#).unwrap();
/// assert_eq!(config.failure_log_capacity, 32);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublisherConfig {
    /// Name attached to every log line of this publisher.
    pub name: String,
    /// How many recent subscriber failures are retained. Zero keeps none.
    pub failure_log_capacity: usize,
}

impl PublisherConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and validates a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) wrapping
    /// [`ConfigError::Json`] for malformed JSON and
    /// [`ConfigError::InvalidValue`] if validation fails.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the name is blank.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "name".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Sets the publisher name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets how many subscriber failures are retained.
    #[must_use]
    pub fn with_failure_log_capacity(mut self, capacity: usize) -> Self {
        self.failure_log_capacity = capacity;
        self
    }
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_PUBLISHER_NAME.to_string(),
            failure_log_capacity: DEFAULT_FAILURE_LOG_CAPACITY,
        }
    }
}
