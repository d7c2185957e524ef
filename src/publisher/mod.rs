// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The reading publisher.
//!
//! A [`Publisher`] owns the latest [`Reading`](crate::Reading) and the
//! subscriber membership, and runs notify passes. Each pass reports what
//! happened through a [`NotifyReport`].

mod config;
mod publisher_id;
mod report;
mod subject;

pub use config::{DEFAULT_FAILURE_LOG_CAPACITY, DEFAULT_PUBLISHER_NAME, PublisherConfig};
pub use publisher_id::PublisherId;
pub use report::{NotifyReport, SubscriberFailure};
pub use subject::Publisher;
