// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Weather Station - an in-process publish/subscribe broadcaster.
//!
//! A [`Publisher`] holds the latest weather [`Reading`] and pushes it,
//! synchronously and in registration order, to a changing set of
//! [`Subscriber`]s.
//!
//! # Features
//!
//! - **Ordered, duplicate-free membership**: registering twice is a no-op,
//!   unregistering an unknown subscriber is a no-op
//! - **Snapshot delivery**: subscribers may register or unregister from
//!   inside `on_update` without deadlock
//! - **Serialized passes**: concurrent publishes never interleave
//! - **Failure isolation**: an erroring or panicking subscriber is recorded
//!   and skipped, everyone else still receives the reading
//! - **Displays**: trend, current conditions and statistics subscribers
//! - **Async hand-off**: [`event::ReadingBus`] forwards readings to tokio tasks
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use weather_station::{Publisher, Reading, Trend};
//! use weather_station::display::TrendSubscriber;
//!
//! let publisher = Publisher::new();
//!
//! let trend = Arc::new(TrendSubscriber::new());
//! publisher.register(trend.clone());
//!
//! publisher.subscribe(|reading| println!("New reading: {reading}"));
//!
//! for pressure in [760.0, 759.0, 761.0] {
//!     let report = publisher.publish(Reading::new(25.0, 34.0, pressure));
//!     assert!(report.is_clean());
//! }
//!
//! assert_eq!(trend.latest(), Some(Trend::Improving));
//! ```
//!
//! # Failure handling
//!
//! ```
//! use std::sync::Arc;
//! use weather_station::{FnSubscriber, Publisher, Reading, SubscriberError};
//!
//! let publisher = Publisher::new();
//! publisher.register(Arc::new(FnSubscriber::new(|_| {
//!     Err(SubscriberError::rejected("display offline"))
//! })));
//!
//! let report = publisher.publish(Reading::new(25.0, 34.0, 756.0));
//! assert_eq!(report.failures().len(), 1);
//! assert_eq!(publisher.recent_failures().len(), 1);
//! ```

pub mod display;
pub mod error;
pub mod event;
pub mod publisher;
pub mod subscription;
pub mod types;

pub use error::{ConfigError, Error, Result, SubscriberError};
pub use publisher::{NotifyReport, Publisher, PublisherConfig, PublisherId, SubscriberFailure};
pub use subscription::{FnSubscriber, Subscriber, SubscriberId};
pub use types::{Reading, Trend};
