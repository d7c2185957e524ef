// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ordered, duplicate-free subscriber membership.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use super::{Subscriber, SubscriberId};

/// One registered subscriber together with its identity.
#[derive(Clone)]
pub struct Member {
    id: SubscriberId,
    subscriber: Arc<dyn Subscriber>,
}

impl Member {
    /// Returns the member's identity.
    #[must_use]
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Returns the subscriber.
    #[must_use]
    pub fn subscriber(&self) -> &Arc<dyn Subscriber> {
        &self.subscriber
    }

    /// Returns the subscriber's name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.subscriber.name()
    }

    /// Returns `true` if this member is the allocation behind `subscriber`.
    fn is<S: ?Sized>(&self, subscriber: &Arc<S>) -> bool {
        same_allocation(&self.subscriber, subscriber)
    }
}

/// Compares the data addresses of two `Arc`s, ignoring vtables.
fn same_allocation<A: ?Sized, B: ?Sized>(a: &Arc<A>, b: &Arc<B>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Member")
            .field("id", &self.id)
            .field("name", &self.name())
            .finish()
    }
}

/// Ordered set of registered subscribers.
///
/// Insertion order is notification order and no subscriber appears twice.
/// Each added subscriber gets a fresh [`SubscriberId`]; IDs start at 1 and
/// are never reused, so a stale ID never matches a later member.
/// The registry is a plain data structure; the
/// [`Publisher`](crate::Publisher) wraps it in a lock.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use weather_station::FnSubscriber;
/// use weather_station::subscription::Registry;
///
/// let mut registry = Registry::new();
/// let sub = Arc::new(FnSubscriber::infallible(|_| {}));
///
/// let id = registry.add(sub.clone());
/// registry.add(sub); // already present, no-op
/// assert_eq!(registry.len(), 1);
///
/// assert!(registry.remove(id));
/// assert!(!registry.remove(id)); // absent, no-op
/// ```
pub struct Registry {
    /// Counter for generating unique subscriber IDs.
    next_id: AtomicU64,
    members: Vec<Member>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            members: Vec::new(),
        }
    }

    /// Generates a new unique subscriber ID.
    fn next_id(&self) -> SubscriberId {
        SubscriberId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Appends `subscriber` unless it is already a member.
    ///
    /// Returns the existing ID if the same `Arc` allocation is already
    /// registered, otherwise a fresh one.
    pub fn add(&mut self, subscriber: Arc<dyn Subscriber>) -> SubscriberId {
        if let Some(id) = self.find(&subscriber) {
            return id;
        }
        let id = self.next_id();
        self.members.push(Member { id, subscriber });
        id
    }

    /// Returns the ID of `subscriber` if it is a member.
    #[must_use]
    pub fn find<S: ?Sized>(&self, subscriber: &Arc<S>) -> Option<SubscriberId> {
        self.members
            .iter()
            .find(|m| m.is(subscriber))
            .map(Member::id)
    }

    /// Removes `subscriber` if it is a member.
    ///
    /// Returns the ID it was registered under, or `None` if it was absent.
    pub fn remove_subscriber<S: ?Sized>(&mut self, subscriber: &Arc<S>) -> Option<SubscriberId> {
        let id = self.find(subscriber)?;
        self.remove(id);
        Some(id)
    }

    /// Removes the member with identity `id`.
    ///
    /// Returns `true` if a member was removed. Removing an absent identity
    /// is a no-op.
    pub fn remove(&mut self, id: SubscriberId) -> bool {
        let Some(pos) = self.members.iter().position(|m| m.id == id) else {
            return false;
        };
        // `remove`, not `swap_remove`: the order is the delivery order
        self.members.remove(pos);
        true
    }

    /// Returns an independent, ordered copy of the current membership.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Member> {
        self.members.clone()
    }

    /// Returns `true` if `id` is a member.
    #[must_use]
    pub fn contains(&self, id: SubscriberId) -> bool {
        self.members.iter().any(|m| m.id == id)
    }

    /// Returns the member identities in delivery order.
    #[must_use]
    pub fn ids(&self) -> Vec<SubscriberId> {
        self.members.iter().map(Member::id).collect()
    }

    /// Returns the number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` if there are no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Removes every member.
    pub fn clear(&mut self) {
        self.members.clear();
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("members", &self.members)
            .finish()
    }
}
