// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The subscriber capability and its identity type.
//!
//! - [`Subscriber`] - Trait implemented by anything that wants readings
//! - [`SubscriberId`] - Identity of a registered subscriber
//! - [`FnSubscriber`] - Adapter turning a closure into a subscriber

use std::fmt;

use crate::error::SubscriberError;
use crate::types::Reading;

/// Receives readings pushed by a [`Publisher`](crate::Publisher).
///
/// The contract is push-based: the publisher hands over the full reading and
/// the subscriber never reaches back into the publisher for individual
/// fields.
///
/// # Implementation requirements
///
/// - `on_update` runs synchronously on the publishing thread. Keep it short
///   and non-blocking; hand long work to your own task or thread (see
///   [`ReadingBus`](crate::event::ReadingBus)).
/// - Returning an error or panicking is contained by the publisher and
///   never stops delivery to other subscribers.
/// - Calling `register`/`unregister` on the publisher from inside
///   `on_update` is allowed.
///
/// # Examples
///
/// ```
/// use weather_station::{Reading, Subscriber, SubscriberError};
///
/// struct Printer;
///
/// impl Subscriber for Printer {
///     fn on_update(&self, reading: Reading) -> Result<(), SubscriberError> {
///         println!("{reading}");
///         Ok(())
///     }
///
///     fn name(&self) -> &'static str {
///         "printer"
///     }
/// }
/// ```
pub trait Subscriber: Send + Sync {
    /// Handles one reading from a notify pass.
    ///
    /// # Errors
    ///
    /// Returns a [`SubscriberError`] when the reading could not be handled.
    /// The publisher records it and moves on to the next subscriber.
    fn on_update(&self, reading: Reading) -> Result<(), SubscriberError>;

    /// Returns the name used in logs and failure records.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Identity of a registered subscriber.
///
/// IDs are handed out by the [`Registry`](super::Registry) from a counter
/// when a subscriber is added and are never reused within a registry's
/// lifetime, so an ID kept after unregistering can never match a
/// subscriber registered later. Membership itself is decided by the
/// shared allocation behind the `Arc`: two structurally identical
/// subscribers are different members, while clones of one `Arc` are the
/// same member and share one ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

impl SubscriberId {
    /// Creates a subscriber ID with the given value.
    #[must_use]
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

type UpdateCallback = Box<dyn Fn(Reading) -> Result<(), SubscriberError> + Send + Sync>;

/// A subscriber backed by a closure.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use weather_station::{FnSubscriber, Publisher, Reading};
///
/// let publisher = Publisher::new();
/// let printer = Arc::new(FnSubscriber::infallible(|reading| println!("{reading}")));
/// publisher.register(printer);
/// publisher.publish(Reading::new(25.0, 34.0, 756.0));
/// ```
pub struct FnSubscriber {
    name: &'static str,
    callback: UpdateCallback,
}

impl FnSubscriber {
    /// Wraps a fallible closure.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(Reading) -> Result<(), SubscriberError> + Send + Sync + 'static,
    {
        Self {
            name: "closure",
            callback: Box::new(callback),
        }
    }

    /// Wraps a closure that cannot fail.
    pub fn infallible<F>(callback: F) -> Self
    where
        F: Fn(Reading) + Send + Sync + 'static,
    {
        Self::new(move |reading| {
            callback(reading);
            Ok(())
        })
    }

    /// Sets the name reported in logs and failure records.
    #[must_use]
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }
}

impl Subscriber for FnSubscriber {
    fn on_update(&self, reading: Reading) -> Result<(), SubscriberError> {
        (self.callback)(reading)
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for FnSubscriber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnSubscriber")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct Unit;

    impl Subscriber for Unit {
        fn on_update(&self, _reading: Reading) -> Result<(), SubscriberError> {
            Ok(())
        }
    }

    #[test]
    fn id_display() {
        let id = SubscriberId::new(42);
        assert_eq!(id.to_string(), "Sub(42)");
        assert_eq!(id.value(), 42);
    }

    #[test]
    fn id_ordering_follows_value() {
        assert!(SubscriberId::new(1) < SubscriberId::new(2));
    }

    #[test]
    fn default_name_is_type_name() {
        assert!(Unit.name().ends_with("Unit"));
    }

    #[test]
    fn fn_subscriber_calls_closure() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();
        let sub = FnSubscriber::infallible(move |_| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        sub.on_update(Reading::default()).unwrap();
        sub.on_update(Reading::default()).unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn fn_subscriber_propagates_error() {
        let sub = FnSubscriber::new(|_| Err(SubscriberError::rejected("no"))).named("refuser");
        assert_eq!(sub.name(), "refuser");
        assert_eq!(
            sub.on_update(Reading::default()),
            Err(SubscriberError::Rejected("no".to_string()))
        );
    }
}
