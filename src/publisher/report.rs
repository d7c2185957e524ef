// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Outcome of notify passes.

use chrono::{DateTime, Utc};

use crate::error::SubscriberError;
use crate::subscription::SubscriberId;

/// A subscriber failure contained during a notify pass.
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriberFailure {
    /// Identity of the failing subscriber.
    pub subscriber: SubscriberId,
    /// Name reported by the subscriber.
    pub name: &'static str,
    /// Sequence number of the pass, starting at 1 per publisher.
    pub pass: u64,
    /// What went wrong.
    pub error: SubscriberError,
    /// When the failure was observed.
    pub at: DateTime<Utc>,
}

/// Summary of the notify passes driven by one `publish` or `notify` call.
///
/// A call normally drives exactly one pass. It drives more when subscribers
/// published again from inside `on_update`: those readings are queued and
/// delivered by the outer call once its own pass completes, and the nested
/// call returns a report with [`is_deferred`](Self::is_deferred) set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotifyReport {
    passes: usize,
    delivered: usize,
    failures: Vec<SubscriberFailure>,
    deferred: bool,
}

impl NotifyReport {
    pub(crate) fn deferred() -> Self {
        Self {
            deferred: true,
            ..Self::default()
        }
    }

    pub(crate) fn record_pass(&mut self) {
        self.passes += 1;
    }

    pub(crate) fn record_delivery(&mut self) {
        self.delivered += 1;
    }

    pub(crate) fn record_failure(&mut self, failure: SubscriberFailure) {
        self.failures.push(failure);
    }

    /// Returns how many passes ran.
    #[must_use]
    pub fn passes(&self) -> usize {
        self.passes
    }

    /// Returns how many `on_update` calls succeeded.
    #[must_use]
    pub fn delivered(&self) -> usize {
        self.delivered
    }

    /// Returns the contained failures, in delivery order.
    #[must_use]
    pub fn failures(&self) -> &[SubscriberFailure] {
        &self.failures
    }

    /// Returns `true` if the reading was queued behind a running pass
    /// instead of being delivered by this call.
    #[must_use]
    pub fn is_deferred(&self) -> bool {
        self.deferred
    }

    /// Returns `true` if no subscriber failed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_clean_and_empty() {
        let report = NotifyReport::default();
        assert!(report.is_clean());
        assert!(!report.is_deferred());
        assert_eq!(report.passes(), 0);
        assert_eq!(report.delivered(), 0);
    }

    #[test]
    fn deferred_report() {
        let report = NotifyReport::deferred();
        assert!(report.is_deferred());
        assert_eq!(report.passes(), 0);
    }

    #[test]
    fn records_failures() {
        let mut report = NotifyReport::default();
        report.record_pass();
        report.record_delivery();
        report.record_failure(SubscriberFailure {
            subscriber: SubscriberId::new(1),
            name: "broken",
            pass: 1,
            error: SubscriberError::rejected("bad"),
            at: Utc::now(),
        });

        assert!(!report.is_clean());
        assert_eq!(report.failures().len(), 1);
        assert_eq!(report.failures()[0].name, "broken");
        assert_eq!(report.delivered(), 1);
    }
}
