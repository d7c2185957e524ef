// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Hand-off from synchronous notify passes to async consumers.
//!
//! The [`ReadingBus`] is a subscriber that pushes readings into a tokio
//! broadcast channel, so long-running work happens in its own tasks instead
//! of inside the notify pass.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use weather_station::Publisher;
//! use weather_station::event::ReadingBus;
//!
//! let publisher = Publisher::new();
//! let bus = Arc::new(ReadingBus::new());
//!
//! // Async consumers subscribe to the bus
//! let _rx = bus.subscribe();
//!
//! // The bus itself subscribes to the publisher
//! publisher.register(bus);
//! ```

mod reading_bus;

pub use reading_bus::ReadingBus;
