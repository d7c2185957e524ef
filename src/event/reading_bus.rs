// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Broadcast channel bridging notify passes to async consumers.

use tokio::sync::broadcast;

use crate::error::SubscriberError;
use crate::subscription::Subscriber;
use crate::types::Reading;

/// Default channel capacity for the reading bus.
const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// A subscriber that forwards every reading into a tokio broadcast channel.
///
/// Notify passes are synchronous and must not block. Register a
/// `ReadingBus` with the publisher and do the slow work in async tasks that
/// [`subscribe`](Self::subscribe) to the bus; `on_update` only enqueues.
///
/// # Capacity
///
/// The channel has a fixed capacity (default 256). A receiver that falls
/// behind loses its oldest readings and gets `RecvError::Lagged`. The
/// publisher is never slowed down by a lagging receiver.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use weather_station::{Publisher, Reading};
/// use weather_station::event::ReadingBus;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let publisher = Publisher::new();
/// let bus = Arc::new(ReadingBus::new());
/// let mut rx = bus.subscribe();
/// publisher.register(bus.clone());
///
/// publisher.publish(Reading::new(25.0, 34.0, 756.0));
/// assert_eq!(rx.recv().await.unwrap().pressure, 756.0);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ReadingBus {
    sender: broadcast::Sender<Reading>,
}

impl ReadingBus {
    /// Creates a new bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Creates a new bus with the specified capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Returns a receiver for every reading forwarded after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Reading> {
        self.sender.subscribe()
    }

    /// Returns the number of live receivers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ReadingBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Subscriber for ReadingBus {
    /// Forwards the reading. Having no receivers is not a failure; the
    /// reading is simply dropped.
    fn on_update(&self, reading: Reading) -> Result<(), SubscriberError> {
        match self.sender.send(reading) {
            Ok(receivers) => {
                tracing::trace!(receivers, "Forwarded reading to bus");
            }
            Err(_) => {
                tracing::trace!("No bus receivers, dropping reading");
            }
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "reading-bus"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use tokio::sync::broadcast::error::RecvError;

    use crate::Publisher;

    #[test]
    fn new_bus_has_no_receivers() {
        let bus = ReadingBus::new();
        assert_eq!(bus.receiver_count(), 0);
    }

    #[test]
    fn drop_receiver_decrements_count() {
        let bus = ReadingBus::new();
        let rx = bus.subscribe();
        assert_eq!(bus.receiver_count(), 1);

        drop(rx);
        assert_eq!(bus.receiver_count(), 0);
    }

    #[test]
    fn forwarding_without_receivers_is_ok() {
        let bus = ReadingBus::new();
        assert!(bus.on_update(Reading::default()).is_ok());
    }

    #[test]
    fn clone_shares_same_channel() {
        let bus1 = ReadingBus::new();
        let bus2 = bus1.clone();
        let _rx = bus1.subscribe();
        assert_eq!(bus2.receiver_count(), 1);
    }

    #[tokio::test]
    async fn delivers_in_publish_order() {
        let publisher = Publisher::new();
        let bus = Arc::new(ReadingBus::new());
        let mut rx = bus.subscribe();
        publisher.register(bus.clone());

        for pressure in [760.0, 759.0, 761.0] {
            publisher.publish(Reading::new(20.0, 50.0, pressure));
        }

        assert_eq!(rx.recv().await.unwrap().pressure, 760.0);
        assert_eq!(rx.recv().await.unwrap().pressure, 759.0);
        assert_eq!(rx.recv().await.unwrap().pressure, 761.0);
    }

    #[tokio::test]
    async fn multiple_receivers_each_get_reading() {
        let bus = ReadingBus::new();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.on_update(Reading::new(25.0, 34.0, 756.0)).unwrap();

        assert_eq!(rx1.recv().await.unwrap(), Reading::new(25.0, 34.0, 756.0));
        assert_eq!(rx2.recv().await.unwrap(), Reading::new(25.0, 34.0, 756.0));
    }

    #[tokio::test]
    async fn lagging_receiver_loses_oldest() {
        let bus = ReadingBus::with_capacity(2);
        let mut rx = bus.subscribe();

        for pressure in [1.0, 2.0, 3.0] {
            bus.on_update(Reading::new(0.0, 0.0, pressure)).unwrap();
        }

        assert!(matches!(rx.recv().await, Err(RecvError::Lagged(1))));
        assert_eq!(rx.recv().await.unwrap().pressure, 2.0);
        assert_eq!(rx.recv().await.unwrap().pressure, 3.0);
    }

    #[tokio::test]
    async fn consumer_task_receives_readings() {
        let bus = ReadingBus::new();
        let mut rx = bus.subscribe();

        let consumer = tokio::spawn(async move {
            let mut seen = Vec::new();
            while let Ok(reading) = rx.recv().await {
                seen.push(reading.temperature);
                if seen.len() == 2 {
                    break;
                }
            }
            seen
        });

        bus.on_update(Reading::new(25.0, 34.0, 756.0)).unwrap();
        bus.on_update(Reading::new(30.0, 29.0, 759.0)).unwrap();

        assert_eq!(consumer.await.unwrap(), vec![25.0, 30.0]);
    }
}
