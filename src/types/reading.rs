// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Weather measurement snapshot.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// An immutable snapshot of observed measurements.
///
/// Readings are plain values: the publisher replaces its stored reading
/// wholesale on every publish and hands each subscriber its own copy, so a
/// reading kept by a subscriber never changes underneath it.
///
/// No range validation is applied. Negative humidity or an absurd pressure
/// are passed through untouched; domain checks belong to the driver or to
/// individual subscribers.
///
/// # Examples
///
/// ```
/// use weather_station::Reading;
///
/// let reading = Reading::new(25.0, 34.0, 756.0);
/// assert_eq!(reading.pressure, 756.0);
/// assert_eq!(reading, Reading::new(25.0, 34.0, 756.0));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Air temperature.
    pub temperature: f64,
    /// Relative humidity in percent.
    pub humidity: f64,
    /// Atmospheric pressure.
    pub pressure: f64,
}

impl Reading {
    /// Creates a reading from its three measurements.
    #[must_use]
    pub const fn new(temperature: f64, humidity: f64, pressure: f64) -> Self {
        Self {
            temperature,
            humidity,
            pressure,
        }
    }

    /// Parses a reading from a JSON object such as
    /// `{"temperature": 25.0, "humidity": 34.0, "pressure": 756.0}`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`](crate::Error::Parse) if the input is not a JSON object with all
    /// three numeric fields.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.1}° {:.1}% {:.1}",
            self.temperature, self.humidity, self.pressure
        )
    }
}

impl From<(f64, f64, f64)> for Reading {
    fn from((temperature, humidity, pressure): (f64, f64, f64)) -> Self {
        Self::new(temperature, humidity, pressure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn display_format() {
        let reading = Reading::new(25.0, 34.0, 756.0);
        assert_eq!(reading.to_string(), "25.0° 34.0% 756.0");
    }

    #[test]
    fn out_of_range_values_are_kept() {
        let reading = Reading::new(-80.0, -5.0, 0.0);
        assert_eq!(reading.humidity, -5.0);
        assert_eq!(reading.temperature, -80.0);
    }

    #[test]
    fn from_tuple() {
        let reading: Reading = (30.0, 29.0, 759.0).into();
        assert_eq!(reading, Reading::new(30.0, 29.0, 759.0));
    }

    #[test]
    fn parse_from_json() {
        let reading =
            Reading::from_json_str(r#"{"temperature": 25.0, "humidity": 34.0, "pressure": 756.0}"#)
                .unwrap();
        assert_eq!(reading, Reading::new(25.0, 34.0, 756.0));
    }

    #[test]
    fn parse_rejects_missing_field() {
        let err = Reading::from_json_str(r#"{"temperature": 25.0}"#).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }
}
