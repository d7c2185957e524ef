// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pressure trend subscriber.

use std::collections::VecDeque;
use std::fmt;

use parking_lot::Mutex;

use super::Render;
use crate::error::SubscriberError;
use crate::subscription::Subscriber;
use crate::types::{Reading, Trend};

/// Baseline pressure both slots start from (standard atmosphere, mmHg).
pub const DEFAULT_BASELINE_PRESSURE: f64 = 760.0;

/// Number of classifications kept by default.
pub const DEFAULT_HISTORY_CAPACITY: usize = 64;

#[derive(Debug)]
struct TrendState {
    last_pressure: f64,
    current_pressure: f64,
    history: VecDeque<Trend>,
    capacity: usize,
}

/// Classifies the weather trend from consecutive pressure readings.
///
/// On every update the current pressure moves to the last slot, the new
/// pressure becomes current, and the pair is classified with
/// [`Trend::classify`]. The result is only meaningful when updates arrive in
/// publish order with none dropped, which is exactly what the
/// [`Publisher`](crate::Publisher) guarantees for a subscriber that stays
/// registered.
///
/// # Examples
///
/// ```
/// use weather_station::{Reading, Subscriber, Trend};
/// use weather_station::display::TrendSubscriber;
///
/// let trend = TrendSubscriber::new();
/// trend.on_update(Reading::new(20.0, 50.0, 759.0)).unwrap();
/// assert_eq!(trend.latest(), Some(Trend::Worsening));
/// ```
pub struct TrendSubscriber {
    state: Mutex<TrendState>,
}

impl TrendSubscriber {
    /// Creates a trend subscriber starting from [`DEFAULT_BASELINE_PRESSURE`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_baseline(DEFAULT_BASELINE_PRESSURE)
    }

    /// Creates a trend subscriber whose last and current pressure both start
    /// at `baseline`.
    #[must_use]
    pub fn with_baseline(baseline: f64) -> Self {
        Self {
            state: Mutex::new(TrendState {
                last_pressure: baseline,
                current_pressure: baseline,
                history: VecDeque::new(),
                capacity: DEFAULT_HISTORY_CAPACITY,
            }),
        }
    }

    /// Sets how many classifications are retained. Zero keeps only
    /// [`latest`](Self::latest).
    #[must_use]
    pub fn with_history_capacity(self, capacity: usize) -> Self {
        {
            let mut state = self.state.lock();
            state.capacity = capacity.max(1);
            while state.history.len() > state.capacity {
                state.history.pop_front();
            }
        }
        self
    }

    /// Returns the most recent classification, if any update arrived.
    #[must_use]
    pub fn latest(&self) -> Option<Trend> {
        self.state.lock().history.back().copied()
    }

    /// Returns retained classifications, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<Trend> {
        self.state.lock().history.iter().copied().collect()
    }

    /// Returns `(last, current)` pressure.
    #[must_use]
    pub fn pressures(&self) -> (f64, f64) {
        let state = self.state.lock();
        (state.last_pressure, state.current_pressure)
    }
}

impl Subscriber for TrendSubscriber {
    fn on_update(&self, reading: Reading) -> Result<(), SubscriberError> {
        let mut state = self.state.lock();
        state.last_pressure = state.current_pressure;
        state.current_pressure = reading.pressure;

        let trend = Trend::classify(state.last_pressure, state.current_pressure);
        if state.history.len() >= state.capacity {
            state.history.pop_front();
        }
        state.history.push_back(trend);

        tracing::trace!(
            last = state.last_pressure,
            current = state.current_pressure,
            trend = %trend,
            "Classified pressure trend"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "trend"
    }
}

impl Render for TrendSubscriber {
    fn render(&self) -> String {
        match self.latest() {
            Some(trend) => format!("Forecast: {}", trend.forecast()),
            None => "Forecast: waiting for data".to_string(),
        }
    }
}

impl Default for TrendSubscriber {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TrendSubscriber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("TrendSubscriber")
            .field("last_pressure", &state.last_pressure)
            .field("current_pressure", &state.current_pressure)
            .field("latest", &state.history.back())
            .finish()
    }
}
