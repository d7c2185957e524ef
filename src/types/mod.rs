// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types shared by publishers and subscribers.
//!
//! - [`Reading`] - Immutable snapshot of temperature, humidity and pressure
//! - [`Trend`] - Classification of consecutive pressures

mod reading;
mod trend;

pub use reading::Reading;
pub use trend::Trend;
