// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Running temperature statistics.

use parking_lot::Mutex;
use serde::Serialize;

use super::Render;
use crate::error::SubscriberError;
use crate::subscription::Subscriber;
use crate::types::Reading;

/// Min/max/average of every temperature seen so far.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TemperatureStats {
    /// Lowest temperature.
    pub min: f64,
    /// Highest temperature.
    pub max: f64,
    /// Mean temperature.
    pub average: f64,
    /// Number of readings folded in.
    pub count: u64,
}

#[derive(Debug, Default)]
struct Accumulator {
    min: f64,
    max: f64,
    sum: f64,
    count: u64,
}

/// Tracks temperature statistics over all received readings.
///
/// # Examples
///
/// ```
/// use weather_station::{Reading, Subscriber};
/// use weather_station::display::Statistics;
///
/// let stats = Statistics::new();
/// stats.on_update(Reading::new(20.0, 50.0, 760.0)).unwrap();
/// stats.on_update(Reading::new(30.0, 40.0, 760.0)).unwrap();
///
/// let summary = stats.summary().unwrap();
/// assert_eq!(summary.average, 25.0);
/// ```
#[derive(Debug, Default)]
pub struct Statistics {
    acc: Mutex<Accumulator>,
}

impl Statistics {
    /// Creates statistics with no readings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the statistics, or `None` before the first reading.
    #[must_use]
    pub fn summary(&self) -> Option<TemperatureStats> {
        let acc = self.acc.lock();
        if acc.count == 0 {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        let average = acc.sum / acc.count as f64;
        Some(TemperatureStats {
            min: acc.min,
            max: acc.max,
            average,
            count: acc.count,
        })
    }
}

impl Subscriber for Statistics {
    fn on_update(&self, reading: Reading) -> Result<(), SubscriberError> {
        let t = reading.temperature;
        let mut acc = self.acc.lock();
        if acc.count == 0 {
            acc.min = t;
            acc.max = t;
        } else {
            acc.min = acc.min.min(t);
            acc.max = acc.max.max(t);
        }
        acc.sum += t;
        acc.count += 1;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "statistics"
    }
}

impl Render for Statistics {
    fn render(&self) -> String {
        match self.summary() {
            Some(s) => format!(
                "Avg/Max/Min temperature = {:.1}/{:.1}/{:.1}",
                s.average, s.max, s.min
            ),
            None => "Avg/Max/Min temperature = waiting for data".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_has_no_summary() {
        assert_eq!(Statistics::new().summary(), None);
    }

    #[test]
    fn negative_temperatures_are_tracked() {
        let stats = Statistics::new();
        for t in [-5.0, -15.0, 10.0] {
            stats.on_update(Reading::new(t, 0.0, 0.0)).unwrap();
        }

        let summary = stats.summary().unwrap();
        assert_eq!(summary.min, -15.0);
        assert_eq!(summary.max, 10.0);
        assert!((summary.average - (-10.0 / 3.0)).abs() < 1e-9);
        assert_eq!(summary.count, 3);
    }

    #[test]
    fn render_text() {
        let stats = Statistics::new();
        stats.on_update(Reading::new(25.0, 34.0, 756.0)).unwrap();
        stats.on_update(Reading::new(30.0, 29.0, 759.0)).unwrap();
        assert_eq!(stats.render(), "Avg/Max/Min temperature = 27.5/30.0/25.0");
    }
}
