// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The publisher: current reading, membership and notify passes.

use std::any::Any;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use chrono::Utc;
use parking_lot::{Mutex, ReentrantMutex, ReentrantMutexGuard, RwLock};

use super::{DEFAULT_PUBLISHER_NAME, NotifyReport, PublisherConfig, PublisherId, SubscriberFailure};
use crate::error::SubscriberError;
use crate::subscription::{FnSubscriber, Member, Registry, Subscriber, SubscriberId};
use crate::types::Reading;

/// State guarded by the pass lock.
#[derive(Debug, Default)]
struct PassState {
    /// Latest published reading, `None` until the first publish.
    current: Option<Reading>,
    /// Readings waiting for the running pass to finish.
    pending: VecDeque<Reading>,
    /// Set while a pass is delivering on the lock-holding thread.
    in_pass: bool,
    /// Number of passes started so far.
    passes: u64,
}

/// Holds the latest [`Reading`] and broadcasts it to registered subscribers.
///
/// # Delivery guarantees
///
/// - Every pass delivers to a snapshot of the membership taken when the pass
///   starts, in registration order, synchronously on the calling thread.
/// - A subscriber registered while a pass runs is not part of that pass.
/// - A subscriber unregistered while a pass runs may still receive that
///   pass, but none after it.
/// - Passes never interleave. Concurrent `publish` calls from other threads
///   wait for the running pass; a `publish` issued from inside `on_update`
///   is queued and delivered right after the running pass.
/// - A subscriber that returns an error or panics is recorded and skipped;
///   the remaining subscribers still receive the reading.
/// - Identical consecutive readings are delivered every time.
///
/// # Thread Safety
///
/// `Publisher` is `Send + Sync`; share it with `Arc<Publisher>`. Membership
/// sits behind its own `parking_lot::RwLock`, separate from the pass lock,
/// so `register` and `unregister` can be called from inside `on_update`.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use weather_station::{Publisher, Reading, Trend};
/// use weather_station::display::TrendSubscriber;
///
/// let publisher = Publisher::new();
/// let trend = Arc::new(TrendSubscriber::new());
/// publisher.register(trend.clone());
///
/// publisher.publish(Reading::new(25.0, 34.0, 760.0));
/// publisher.publish(Reading::new(26.0, 33.0, 759.0));
/// assert_eq!(trend.latest(), Some(Trend::Worsening));
///
/// publisher.unregister(&trend);
/// assert_eq!(publisher.subscriber_count(), 0);
/// ```
pub struct Publisher {
    id: PublisherId,
    config: PublisherConfig,
    pass: ReentrantMutex<RefCell<PassState>>,
    registry: RwLock<Registry>,
    failures: Mutex<VecDeque<SubscriberFailure>>,
}

impl Publisher {
    /// Creates a publisher with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(PublisherConfig::default())
    }

    /// Creates a publisher with the given configuration.
    ///
    /// A configuration that fails [`PublisherConfig::validate`] is not
    /// rejected: the invalid name is replaced by the default name and a
    /// warning is logged.
    #[must_use]
    pub fn with_config(mut config: PublisherConfig) -> Self {
        let id = PublisherId::new();
        if let Err(error) = config.validate() {
            tracing::warn!(id = %id, error = %error, "Invalid publisher config, using default name");
            config.name = DEFAULT_PUBLISHER_NAME.to_string();
        }
        tracing::debug!(publisher = %config.name, id = %id, "Creating publisher");
        Self {
            id,
            failures: Mutex::new(VecDeque::with_capacity(config.failure_log_capacity)),
            config,
            pass: ReentrantMutex::new(RefCell::new(PassState::default())),
            registry: RwLock::new(Registry::new()),
        }
    }

    // =========================================================================
    // Membership
    // =========================================================================

    /// Registers a subscriber at the end of the delivery order.
    ///
    /// Registering a subscriber that is already a member does nothing, so it
    /// is never notified twice for one pass. Returns the subscriber's
    /// identity either way.
    pub fn register(&self, subscriber: Arc<dyn Subscriber>) -> SubscriberId {
        let name = subscriber.name();
        let mut registry = self.registry.write();
        let before = registry.len();
        let id = registry.add(subscriber);

        if registry.len() == before {
            tracing::debug!(publisher = %self.config.name, id = %self.id, subscriber = %id, subscriber_name = name, "Subscriber already registered");
        } else {
            tracing::debug!(publisher = %self.config.name, id = %self.id, subscriber = %id, subscriber_name = name, "Registered subscriber");
        }
        id
    }

    /// Registers a closure as a subscriber.
    pub fn subscribe<F>(&self, callback: F) -> SubscriberId
    where
        F: Fn(Reading) + Send + Sync + 'static,
    {
        self.register(Arc::new(FnSubscriber::infallible(callback)))
    }

    /// Unregisters a subscriber.
    ///
    /// The subscriber is matched by its `Arc` allocation. Returns `true` if
    /// it was a member. Unregistering a subscriber that is not registered is
    /// a no-op.
    pub fn unregister<S: Subscriber + ?Sized>(&self, subscriber: &Arc<S>) -> bool {
        let removed = self.registry.write().remove_subscriber(subscriber);
        match removed {
            Some(id) => {
                tracing::debug!(publisher = %self.config.name, id = %self.id, subscriber = %id, "Unregistered subscriber");
                true
            }
            None => {
                tracing::trace!(publisher = %self.config.name, id = %self.id, "Ignoring unregister of unknown subscriber");
                false
            }
        }
    }

    /// Unregisters a subscriber by the ID [`register`](Self::register)
    /// returned.
    ///
    /// Returns `true` if it was a member. IDs are never reused, so an ID
    /// kept after its subscriber was unregistered is always a no-op.
    pub fn unregister_id(&self, id: SubscriberId) -> bool {
        let removed = self.registry.write().remove(id);
        if removed {
            tracing::debug!(publisher = %self.config.name, id = %self.id, subscriber = %id, "Unregistered subscriber");
        } else {
            tracing::trace!(publisher = %self.config.name, id = %self.id, subscriber = %id, "Ignoring unregister of unknown subscriber");
        }
        removed
    }

    /// Unregisters every subscriber.
    pub fn clear(&self) {
        self.registry.write().clear();
        tracing::debug!(publisher = %self.config.name, id = %self.id, "Cleared all subscribers");
    }

    /// Returns `true` if `id` is currently registered.
    #[must_use]
    pub fn is_registered(&self, id: SubscriberId) -> bool {
        self.registry.read().contains(id)
    }

    /// Returns the registered identities in delivery order.
    #[must_use]
    pub fn subscriber_ids(&self) -> Vec<SubscriberId> {
        self.registry.read().ids()
    }

    /// Returns the number of registered subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.registry.read().len()
    }

    // =========================================================================
    // Publishing
    // =========================================================================

    /// Replaces the current reading and notifies every subscriber.
    ///
    /// When called from inside a subscriber's `on_update`, the reading is
    /// queued and delivered once the running pass completes; the returned
    /// report is then [deferred](NotifyReport::is_deferred) and empty.
    pub fn publish(&self, reading: Reading) -> NotifyReport {
        let guard = self.pass.lock();
        {
            let mut state = guard.borrow_mut();
            state.pending.push_back(reading);
            if state.in_pass {
                tracing::debug!(
                    publisher = %self.config.name,
                    id = %self.id,
                    queued = state.pending.len(),
                    "Deferring publish until the running pass completes"
                );
                return NotifyReport::deferred();
            }
        }
        self.drain(&guard)
    }

    /// Delivers the current reading again to every subscriber.
    ///
    /// Before the first [`publish`](Self::publish) there is nothing to
    /// deliver and an empty report is returned.
    pub fn notify(&self) -> NotifyReport {
        let guard = self.pass.lock();
        {
            let mut state = guard.borrow_mut();
            let Some(current) = state.current else {
                tracing::trace!(publisher = %self.config.name, id = %self.id, "Nothing published yet, skipping notify");
                return NotifyReport::default();
            };
            state.pending.push_back(current);
            if state.in_pass {
                tracing::debug!(
                    publisher = %self.config.name,
                    id = %self.id,
                    queued = state.pending.len(),
                    "Deferring notify until the running pass completes"
                );
                return NotifyReport::deferred();
            }
        }
        self.drain(&guard)
    }

    /// Returns the latest published reading.
    ///
    /// Called from another thread while a pass is running, this waits for
    /// the pass to finish.
    #[must_use]
    pub fn current(&self) -> Option<Reading> {
        self.pass.lock().borrow().current
    }

    /// Returns how many passes this publisher has run.
    #[must_use]
    pub fn pass_count(&self) -> u64 {
        self.pass.lock().borrow().passes
    }

    /// Runs passes until no reading is pending.
    fn drain(&self, guard: &ReentrantMutexGuard<'_, RefCell<PassState>>) -> NotifyReport {
        let mut report = NotifyReport::default();
        let _in_pass = InPass::enter(guard);

        loop {
            let (reading, pass) = {
                let mut state = guard.borrow_mut();
                let Some(reading) = state.pending.pop_front() else {
                    break;
                };
                state.current = Some(reading);
                state.passes += 1;
                (reading, state.passes)
            };
            // no RefCell borrow may be held while subscribers run
            self.run_pass(reading, pass, &mut report);
        }

        report
    }

    fn run_pass(&self, reading: Reading, pass: u64, report: &mut NotifyReport) {
        let members = self.registry.read().snapshot();
        tracing::debug!(
            publisher = %self.config.name,
            id = %self.id,
            pass,
            members = members.len(),
            "Starting notify pass"
        );
        report.record_pass();

        for member in &members {
            match deliver(member, reading) {
                Ok(()) => {
                    tracing::trace!(publisher = %self.config.name, id = %self.id, pass, subscriber = %member.id(), "Delivered reading");
                    report.record_delivery();
                }
                Err(error) => {
                    tracing::warn!(
                        publisher = %self.config.name,
                        id = %self.id,
                        pass,
                        subscriber = %member.id(),
                        subscriber_name = member.name(),
                        error = %error,
                        "Subscriber failed, continuing notify pass"
                    );
                    let failure = SubscriberFailure {
                        subscriber: member.id(),
                        name: member.name(),
                        pass,
                        error,
                        at: Utc::now(),
                    };
                    self.remember(failure.clone());
                    report.record_failure(failure);
                }
            }
        }
    }

    // =========================================================================
    // Failure log
    // =========================================================================

    /// Returns the most recent subscriber failures, oldest first.
    ///
    /// At most `failure_log_capacity` entries are retained.
    #[must_use]
    pub fn recent_failures(&self) -> Vec<SubscriberFailure> {
        self.failures.lock().iter().cloned().collect()
    }

    /// Empties the failure log.
    pub fn clear_failures(&self) {
        self.failures.lock().clear();
    }

    fn remember(&self, failure: SubscriberFailure) {
        let capacity = self.config.failure_log_capacity;
        if capacity == 0 {
            return;
        }
        let mut failures = self.failures.lock();
        while failures.len() >= capacity {
            failures.pop_front();
        }
        failures.push_back(failure);
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Returns this publisher's unique identifier.
    #[must_use]
    pub fn id(&self) -> PublisherId {
        self.id
    }

    /// Returns the configured name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &PublisherConfig {
        &self.config
    }
}

/// Marks the pass state as delivering until dropped.
///
/// Clears `in_pass` on every exit from [`Publisher::drain`], including an
/// unwind, so a later publish is not mistaken for a nested one.
struct InPass<'a, 'g> {
    guard: &'a ReentrantMutexGuard<'g, RefCell<PassState>>,
}

impl<'a, 'g> InPass<'a, 'g> {
    fn enter(guard: &'a ReentrantMutexGuard<'g, RefCell<PassState>>) -> Self {
        guard.borrow_mut().in_pass = true;
        Self { guard }
    }
}

impl Drop for InPass<'_, '_> {
    fn drop(&mut self) {
        if let Ok(mut state) = self.guard.try_borrow_mut() {
            state.in_pass = false;
        }
    }
}

/// Calls one subscriber, turning a panic into a [`SubscriberError`].
fn deliver(member: &Member, reading: Reading) -> Result<(), SubscriberError> {
    catch_unwind(AssertUnwindSafe(|| member.subscriber().on_update(reading)))
        .unwrap_or_else(|payload| Err(SubscriberError::Panicked(panic_message(payload.as_ref()))))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

impl Default for Publisher {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Publisher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Publisher")
            .field("id", &self.id)
            .field("name", &self.config.name)
            .field("subscriber_count", &self.subscriber_count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn counter_subscriber(counter: &Arc<AtomicU32>) -> Arc<dyn Subscriber> {
        let counter = Arc::clone(counter);
        Arc::new(FnSubscriber::infallible(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }))
    }

    #[test]
    fn new_publisher_has_no_reading() {
        let publisher = Publisher::new();
        assert_eq!(publisher.current(), None);
        assert_eq!(publisher.subscriber_count(), 0);
        assert_eq!(publisher.name(), "weather-station");
    }

    #[test]
    fn publish_replaces_current() {
        let publisher = Publisher::new();
        publisher.publish(Reading::new(25.0, 34.0, 756.0));
        publisher.publish(Reading::new(30.0, 29.0, 759.0));
        assert_eq!(publisher.current(), Some(Reading::new(30.0, 29.0, 759.0)));
        assert_eq!(publisher.pass_count(), 2);
    }

    #[test]
    fn publish_without_subscribers_runs_empty_pass() {
        let publisher = Publisher::new();
        let report = publisher.publish(Reading::default());
        assert_eq!(report.passes(), 1);
        assert_eq!(report.delivered(), 0);
        assert!(report.is_clean());
    }

    #[test]
    fn notify_before_publish_is_empty() {
        let publisher = Publisher::new();
        let counter = Arc::new(AtomicU32::new(0));
        publisher.register(counter_subscriber(&counter));

        let report = publisher.notify();
        assert_eq!(report.passes(), 0);
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn notify_redelivers_current() {
        let publisher = Publisher::new();
        let counter = Arc::new(AtomicU32::new(0));
        publisher.register(counter_subscriber(&counter));

        publisher.publish(Reading::default());
        let report = publisher.notify();

        assert_eq!(report.delivered(), 1);
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn identical_readings_are_not_deduplicated() {
        let publisher = Publisher::new();
        let counter = Arc::new(AtomicU32::new(0));
        publisher.register(counter_subscriber(&counter));

        let reading = Reading::new(20.0, 50.0, 760.0);
        publisher.publish(reading);
        publisher.publish(reading);

        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn subscribe_closure() {
        let publisher = Publisher::new();
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();
        let id = publisher.subscribe(move |_| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert!(publisher.is_registered(id));
        assert_eq!(publisher.subscriber_ids(), vec![id]);

        publisher.publish(Reading::default());
        assert!(publisher.unregister_id(id));
        publisher.publish(Reading::default());

        assert!(!publisher.is_registered(id));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unregister_by_arc_resolves_counter_id() {
        let publisher = Publisher::new();
        let sub: Arc<dyn Subscriber> = Arc::new(FnSubscriber::infallible(|_| {}));
        let id = publisher.register(Arc::clone(&sub));

        assert!(publisher.unregister(&sub));
        assert!(!publisher.is_registered(id));
        assert!(!publisher.unregister_id(id));
    }

    #[test]
    fn unregister_unknown_is_noop() {
        let publisher = Publisher::new();
        let stranger: Arc<dyn Subscriber> = Arc::new(FnSubscriber::infallible(|_| {}));
        assert!(!publisher.unregister(&stranger));
    }

    #[test]
    fn clear_removes_everyone() {
        let publisher = Publisher::new();
        let counter = Arc::new(AtomicU32::new(0));
        publisher.register(counter_subscriber(&counter));
        publisher.register(counter_subscriber(&counter));

        publisher.clear();
        publisher.publish(Reading::default());

        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn failure_log_is_bounded() {
        let config = PublisherConfig::new().with_failure_log_capacity(2);
        let publisher = Publisher::with_config(config);
        publisher.register(Arc::new(FnSubscriber::new(|_| {
            Err(SubscriberError::rejected("always"))
        })));

        for _ in 0..5 {
            publisher.publish(Reading::default());
        }

        let failures = publisher.recent_failures();
        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0].pass, 4);
        assert_eq!(failures[1].pass, 5);

        publisher.clear_failures();
        assert!(publisher.recent_failures().is_empty());
    }

    #[test]
    fn zero_capacity_keeps_no_failures() {
        let config = PublisherConfig::new().with_failure_log_capacity(0);
        let publisher = Publisher::with_config(config);
        publisher.register(Arc::new(FnSubscriber::new(|_| {
            Err(SubscriberError::rejected("always"))
        })));

        let report = publisher.publish(Reading::default());
        assert_eq!(report.failures().len(), 1);
        assert!(publisher.recent_failures().is_empty());
    }

    #[test]
    fn panic_is_reported_with_message() {
        let publisher = Publisher::new();
        publisher.register(Arc::new(
            FnSubscriber::infallible(|_| panic!("sensor exploded")).named("exploder"),
        ));

        let report = publisher.publish(Reading::default());
        let failure = &report.failures()[0];
        assert_eq!(failure.name, "exploder");
        assert_eq!(
            failure.error,
            SubscriberError::Panicked("sensor exploded".to_string())
        );
    }

    /// Fails every update and panics in `name()` once armed.
    struct PanickyName {
        armed: std::sync::atomic::AtomicBool,
    }

    impl Subscriber for PanickyName {
        fn on_update(&self, _reading: Reading) -> Result<(), SubscriberError> {
            Err(SubscriberError::rejected("always"))
        }

        fn name(&self) -> &'static str {
            assert!(!self.armed.load(Ordering::SeqCst), "name unavailable");
            "panicky-name"
        }
    }

    #[test]
    fn unwind_out_of_pass_resets_pass_state() {
        let publisher = Publisher::new();
        let sub = Arc::new(PanickyName {
            armed: std::sync::atomic::AtomicBool::new(false),
        });
        publisher.register(sub.clone());

        sub.armed.store(true, Ordering::SeqCst);
        let unwound = std::panic::catch_unwind(AssertUnwindSafe(|| {
            publisher.publish(Reading::default())
        }));
        assert!(unwound.is_err());

        sub.armed.store(false, Ordering::SeqCst);
        let report = publisher.publish(Reading::default());
        assert!(!report.is_deferred());
        assert_eq!(report.passes(), 1);
        assert_eq!(report.failures().len(), 1);
    }

    #[test]
    fn invalid_config_falls_back_to_default_name() {
        let publisher = Publisher::with_config(PublisherConfig::new().with_name("   "));
        assert_eq!(publisher.name(), DEFAULT_PUBLISHER_NAME);
        assert!(publisher.config().validate().is_ok());
    }

    #[test]
    fn valid_config_is_kept() {
        let config = PublisherConfig::new()
            .with_name("roof")
            .with_failure_log_capacity(4);
        let publisher = Publisher::with_config(config.clone());
        assert_eq!(publisher.config(), &config);
    }

    #[test]
    fn panic_message_variants() {
        let owned: Box<dyn Any + Send> = Box::new(String::from("owned"));
        let other: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(owned.as_ref()), "owned");
        assert_eq!(panic_message(other.as_ref()), "unknown panic");
    }

    #[test]
    fn debug_output() {
        let publisher = Publisher::with_config(PublisherConfig::new().with_name("roof"));
        let debug = format!("{publisher:?}");
        assert!(debug.contains("Publisher"));
        assert!(debug.contains("roof"));
        assert!(debug.contains("subscriber_count"));
    }

    #[test]
    fn publisher_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Publisher>();
    }
}
