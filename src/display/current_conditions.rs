// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Current conditions display.

use parking_lot::RwLock;

use super::Render;
use crate::error::SubscriberError;
use crate::subscription::Subscriber;
use crate::types::Reading;

/// Shows the temperature and humidity of the latest reading.
#[derive(Debug, Default)]
pub struct CurrentConditions {
    latest: RwLock<Option<Reading>>,
}

impl CurrentConditions {
    /// Creates an empty display.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the last reading received.
    #[must_use]
    pub fn latest(&self) -> Option<Reading> {
        *self.latest.read()
    }
}

impl Subscriber for CurrentConditions {
    fn on_update(&self, reading: Reading) -> Result<(), SubscriberError> {
        *self.latest.write() = Some(reading);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "current-conditions"
    }
}

impl Render for CurrentConditions {
    fn render(&self) -> String {
        match self.latest() {
            Some(reading) => format!(
                "Current conditions: {:.1}° and {:.1}% humidity",
                reading.temperature, reading.humidity
            ),
            None => "Current conditions: waiting for data".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_latest() {
        let display = CurrentConditions::new();
        display.on_update(Reading::new(25.0, 34.0, 756.0)).unwrap();
        display.on_update(Reading::new(30.0, 29.0, 759.0)).unwrap();
        assert_eq!(display.latest(), Some(Reading::new(30.0, 29.0, 759.0)));
    }

    #[test]
    fn render_text() {
        let display = CurrentConditions::new();
        assert_eq!(display.render(), "Current conditions: waiting for data");

        display.on_update(Reading::new(25.0, 34.0, 756.0)).unwrap();
        assert_eq!(
            display.render(),
            "Current conditions: 25.0° and 34.0% humidity"
        );
    }
}
