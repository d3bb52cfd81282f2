//! Push-based order subscriptions.
//!
//! One watch channel per order with a live subscriber, published to by the
//! store after every committed write. Watch semantics give subscribers
//! exactly the contract the read path promises: the current snapshot
//! immediately, then the latest snapshot after each change — intermediate
//! states may be skipped, but a subscriber never observes a state older
//! than one it already received. Publishing never blocks the writer.
//!
//! Channels are created by `subscribe` and pruned on publish once every
//! receiver is gone, so the map holds an entry per subscribed order, not
//! per order ever written.
//!
//! Cancellation is explicit: a [`SubscriptionHandle`] can be cancelled from
//! anywhere and wakes a pending [`OrderSubscription::recv`] immediately.

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use carhop_core::ids::OrderId;
use carhop_core::order::Order;

/// Fan-out point for order snapshots, keyed by order id.
#[derive(Default)]
pub struct OrderFeed {
    channels: DashMap<OrderId, watch::Sender<Arc<Order>>>,
}

impl OrderFeed {
    /// Create an empty feed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a fresh snapshot to the order's subscribers.
    ///
    /// A publish with no channel is delivery to nobody and creates
    /// nothing; a channel whose receivers are all gone is dropped here.
    pub fn publish(&self, order: Order) {
        let snapshot = Arc::new(order);
        if let Entry::Occupied(entry) = self.channels.entry(snapshot.id.clone()) {
            if entry.get().receiver_count() == 0 {
                let _ = entry.remove();
            } else {
                let _ = entry.get().send_replace(snapshot);
            }
        }
    }

    /// Open a subscription. `initial` seeds the channel when absent; when
    /// a channel already exists its published state is what the subscriber
    /// sees first. The store reads `initial` under the order's write lock,
    /// so it is never older than the last publish.
    pub fn subscribe(&self, order_id: &OrderId, initial: Arc<Order>) -> OrderSubscription {
        let sender = self
            .channels
            .entry(order_id.clone())
            .or_insert_with(|| watch::channel(initial).0);
        let mut rx = sender.subscribe();
        drop(sender);
        // Force the first recv() to deliver the current snapshot.
        rx.mark_changed();
        debug!(order_id = %order_id, "subscription opened");
        OrderSubscription {
            rx,
            token: CancellationToken::new(),
        }
    }
}

/// A live, cancellable stream of order snapshots.
#[derive(Debug)]
pub struct OrderSubscription {
    rx: watch::Receiver<Arc<Order>>,
    token: CancellationToken,
}

impl OrderSubscription {
    /// A handle that cancels this subscription from anywhere.
    pub fn handle(&self) -> SubscriptionHandle {
        SubscriptionHandle {
            token: self.token.clone(),
        }
    }

    /// Wait for the next snapshot.
    ///
    /// The first call resolves immediately with the current state. Returns
    /// `None` once the subscription is cancelled or the store is gone.
    pub async fn recv(&mut self) -> Option<Arc<Order>> {
        if self.token.is_cancelled() {
            return None;
        }
        tokio::select! {
            () = self.token.cancelled() => None,
            changed = self.rx.changed() => match changed {
                Ok(()) => Some(Arc::clone(&self.rx.borrow_and_update())),
                Err(_) => None,
            },
        }
    }

    /// Cancel from the subscription side.
    pub fn cancel(&self) {
        self.token.cancel();
    }
}

/// Detached cancellation handle for an [`OrderSubscription`].
#[derive(Clone, Debug)]
pub struct SubscriptionHandle {
    token: CancellationToken,
}

impl SubscriptionHandle {
    /// Stop delivery. Any pending `recv()` resolves to `None` immediately.
    pub fn cancel(&self) {
        self.token.cancel();
    }
}
