// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pressure trend classification.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Direction of the weather derived from two consecutive pressures.
///
/// # Examples
///
/// ```
/// use weather_station::Trend;
///
/// assert_eq!(Trend::classify(760.0, 759.0), Trend::Worsening);
/// assert_eq!(Trend::classify(759.0, 761.0), Trend::Improving);
/// assert_eq!(Trend::classify(761.0, 761.0), Trend::Steady);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trend {
    /// Pressure is rising.
    Improving,
    /// Pressure is unchanged.
    Steady,
    /// Pressure is falling.
    Worsening,
}

impl Trend {
    /// Classifies the move from `last` to `current`.
    ///
    /// Values that cannot be ordered (NaN) classify as [`Trend::Steady`].
    #[must_use]
    pub fn classify(last: f64, current: f64) -> Self {
        match current.partial_cmp(&last) {
            Some(Ordering::Greater) => Self::Improving,
            Some(Ordering::Less) => Self::Worsening,
            Some(Ordering::Equal) | None => Self::Steady,
        }
    }

    /// Returns a short lowercase label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Improving => "improving",
            Self::Steady => "steady",
            Self::Worsening => "worsening",
        }
    }

    /// Returns the forecast sentence shown on a weather display.
    #[must_use]
    pub const fn forecast(&self) -> &'static str {
        match self {
            Self::Improving => "Improving weather on the way!",
            Self::Steady => "More of the same",
            Self::Worsening => "Watch out for cooler, rainy weather",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
