// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the weather station library.
//!
//! Registration never fails and readings are never validated, so the error
//! surface is small: subscribers report their own failures through
//! [`SubscriberError`], and parsing readings or configuration from JSON
//! reports through [`Error`].

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// A reading could not be parsed from JSON.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Configuration could not be loaded or is invalid.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Failure reported by a single subscriber during a notify pass.
///
/// These never escape a notify pass. The publisher contains them, logs them
/// and hands them back in the [`NotifyReport`](crate::publisher::NotifyReport).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriberError {
    /// The subscriber refused or could not process the reading.
    #[error("reading rejected: {0}")]
    Rejected(String),

    /// The subscriber panicked inside `on_update`.
    #[error("subscriber panicked: {0}")]
    Panicked(String),
}

impl SubscriberError {
    /// Creates a [`SubscriberError::Rejected`] from any message.
    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }
}

/// Errors related to loading a [`PublisherConfig`](crate::publisher::PublisherConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A field holds a value the publisher cannot use.
    #[error("invalid value for {field}: {message}")]
    InvalidValue {
        /// The offending field.
        field: String,
        /// Why the value was refused.
        message: String,
    },
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
