// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscriber capability and membership.
//!
//! # Overview
//!
//! - [`Subscriber`] - Trait for anything that receives readings
//! - [`SubscriberId`] - Identity of a subscriber, used to unregister
//! - [`FnSubscriber`] - Closure adapter
//! - [`Registry`] - Ordered, duplicate-free membership used by the publisher
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//! use weather_station::{FnSubscriber, Publisher, Reading};
//!
//! let publisher = Publisher::new();
//!
//! let display = Arc::new(FnSubscriber::infallible(|reading| {
//!     println!("Now: {reading}");
//! }));
//! let id = publisher.register(display);
//!
//! publisher.publish(Reading::new(25.0, 34.0, 756.0));
//!
//! // Later, unregister
//! publisher.unregister_id(id);
//! ```

mod registry;
mod subscriber;

pub use registry::{Member, Registry};
pub use subscriber::{FnSubscriber, Subscriber, SubscriberId};
