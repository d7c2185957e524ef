// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ready-made subscribers for a weather station display.
//!
//! - [`TrendSubscriber`] - Improving/Steady/Worsening from consecutive pressures
//! - [`CurrentConditions`] - Latest temperature and humidity
//! - [`Statistics`] - Running min/max/average temperature
//!
//! Each of them also implements [`Render`], producing the line a display
//! would show. Drawing that line somewhere is up to the caller.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use weather_station::{Publisher, Reading};
//! use weather_station::display::{CurrentConditions, Render, Statistics, TrendSubscriber};
//!
//! let publisher = Publisher::new();
//! let conditions = Arc::new(CurrentConditions::new());
//! let stats = Arc::new(Statistics::new());
//! let trend = Arc::new(TrendSubscriber::new());
//!
//! publisher.register(conditions.clone());
//! publisher.register(stats.clone());
//! publisher.register(trend.clone());
//!
//! publisher.publish(Reading::new(25.0, 34.0, 756.0));
//!
//! for line in [conditions.render(), stats.render(), trend.render()] {
//!     println!("{line}");
//! }
//! ```

mod current_conditions;
mod forecast;
mod statistics;

pub use current_conditions::CurrentConditions;
pub use forecast::{DEFAULT_BASELINE_PRESSURE, DEFAULT_HISTORY_CAPACITY, TrendSubscriber};
pub use statistics::{Statistics, TemperatureStats};

/// Something that can describe its state as one display line.
pub trait Render {
    /// Returns the display line.
    fn render(&self) -> String;
}
