use crate::queue::{EventQueue, OverflowPolicy, PushOutcome};
use crate::registry::{SubscriberId, SubscriberRegistry};
use log::*;
use std::sync::Arc;

/// Fans a single event out to every currently registered subscriber.
///
/// `publish` runs synchronously inside the calling mutation handler's task:
/// it takes a registry snapshot, enqueues onto each member without waiting on
/// any consumer, and returns. It cannot fail observably; a slow or stalled
/// subscriber never affects the caller or other subscribers.
pub struct Broadcaster {
    registry: Arc<SubscriberRegistry>,
}

impl Broadcaster {
    /// `capacity` of `None` keeps the default contract: unbounded queues,
    /// enqueue always succeeds, growth under an absent consumer accepted as
    /// a known risk. With a capacity, `policy` decides what overflow does.
    pub fn new(capacity: Option<usize>, policy: OverflowPolicy) -> Self {
        Self {
            registry: Arc::new(SubscriberRegistry::new(capacity, policy)),
        }
    }

    /// Registers a new subscriber queue and hands back its owning handle.
    /// Dropping the handle unregisters the queue.
    pub fn subscribe(&self) -> Subscription {
        let (id, queue) = self.registry.register();
        debug!("Registered SSE subscriber {id}");

        Subscription {
            id,
            queue,
            registry: Arc::clone(&self.registry),
        }
    }

    /// Enqueues `message` on every live subscriber queue. Publishing with no
    /// subscribers registered is a no-op.
    pub fn publish(&self, message: &str) {
        let mut overflowed = Vec::new();

        for (id, queue) in self.registry.snapshot() {
            match queue.push(message.to_owned()) {
                PushOutcome::Queued => {}
                PushOutcome::DroppedOldest => {
                    warn!("Subscriber {id} queue full, evicted oldest pending event");
                }
                PushOutcome::DroppedNewest => {
                    warn!("Subscriber {id} queue full, discarded event");
                }
                PushOutcome::Overflowed => overflowed.push(id),
                // Raced an unregister; the queue is already gone.
                PushOutcome::Closed => {}
            }
        }

        // Unregister after iterating so removal never contends with the
        // snapshot above.
        for id in overflowed {
            warn!("Subscriber {id} queue overflowed, disconnecting");
            self.registry.unregister(&id);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry.len()
    }
}

/// One live subscription: the owning handle to a registered queue.
///
/// Held by exactly one stream session for its lifetime. Unregistration is
/// tied to `Drop`, so it runs even when the session's stream future is
/// cancelled mid-await by a closed transport.
pub struct Subscription {
    id: SubscriberId,
    queue: Arc<EventQueue>,
    registry: Arc<SubscriberRegistry>,
}

impl Subscription {
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Waits for the next event in publish order. Returns `None` once the
    /// subscription has been closed (disconnect policy or unregistration).
    pub async fn recv(&mut self) -> Option<String> {
        self.queue.pop().await
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        debug!("Unregistering SSE subscriber {}", self.id);
        self.registry.unregister(&self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn unbounded() -> Broadcaster {
        Broadcaster::new(None, OverflowPolicy::DropOldest)
    }

    #[tokio::test]
    async fn events_arrive_in_publish_order() {
        let broadcaster = unbounded();
        let mut subscription = broadcaster.subscribe();

        broadcaster.publish("Book created: Dune");
        broadcaster.publish("Book updated: Dune Messiah");

        assert_eq!(
            subscription.recv().await.as_deref(),
            Some("Book created: Dune")
        );
        assert_eq!(
            subscription.recv().await.as_deref(),
            Some("Book updated: Dune Messiah")
        );
    }

    #[tokio::test]
    async fn late_subscriber_never_sees_earlier_events() {
        let broadcaster = unbounded();

        broadcaster.publish("before");

        let mut subscription = broadcaster.subscribe();
        broadcaster.publish("after");

        assert_eq!(subscription.recv().await.as_deref(), Some("after"));
    }

    #[tokio::test]
    async fn all_concurrent_subscribers_receive_every_event() {
        let broadcaster = unbounded();
        let mut a = broadcaster.subscribe();
        let mut b = broadcaster.subscribe();

        broadcaster.publish("X");

        assert_eq!(a.recv().await.as_deref(), Some("X"));
        assert_eq!(b.recv().await.as_deref(), Some("X"));

        drop(a);
        broadcaster.publish("Y");

        assert_eq!(b.recv().await.as_deref(), Some("Y"));
        assert_eq!(broadcaster.subscriber_count(), 1);
    }

    #[tokio::test]
    async fn slow_subscriber_does_not_affect_others() {
        let broadcaster = unbounded();
        let mut fast = broadcaster.subscribe();
        let _slow = broadcaster.subscribe(); // never consumes

        for n in 0..100 {
            broadcaster.publish(&format!("event {n}"));
        }

        for n in 0..100 {
            assert_eq!(fast.recv().await.unwrap(), format!("event {n}"));
        }
    }

    #[tokio::test]
    async fn publish_after_unsubscribe_is_harmless() {
        let broadcaster = unbounded();

        let subscription = broadcaster.subscribe();
        drop(subscription);

        for _ in 0..10 {
            broadcaster.publish("Z");
        }

        assert_eq!(broadcaster.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn publish_to_empty_registry_is_a_no_op() {
        let broadcaster = unbounded();
        broadcaster.publish("nobody listening");
        assert_eq!(broadcaster.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn disconnect_policy_unregisters_overflowing_subscriber() {
        let broadcaster = Broadcaster::new(Some(2), OverflowPolicy::DisconnectSubscriber);
        let mut stalled = broadcaster.subscribe();

        broadcaster.publish("1");
        broadcaster.publish("2");
        broadcaster.publish("3"); // overflow: subscriber disconnected

        assert_eq!(broadcaster.subscriber_count(), 0);
        assert_eq!(stalled.recv().await, None);
    }

    #[tokio::test]
    async fn drop_oldest_policy_keeps_only_the_newest_events() {
        let broadcaster = Broadcaster::new(Some(2), OverflowPolicy::DropOldest);
        let mut subscription = broadcaster.subscribe();

        broadcaster.publish("1");
        broadcaster.publish("2");
        broadcaster.publish("3");

        assert_eq!(subscription.recv().await.as_deref(), Some("2"));
        assert_eq!(subscription.recv().await.as_deref(), Some("3"));
        assert_eq!(broadcaster.subscriber_count(), 1);
    }

    #[tokio::test]
    async fn recv_parked_on_empty_queue_wakes_on_publish() {
        let broadcaster = Arc::new(unbounded());
        let mut subscription = broadcaster.subscribe();

        let consumer = tokio::spawn(async move { subscription.recv().await });

        tokio::time::sleep(Duration::from_millis(10)).await;
        broadcaster.publish("wake up");

        assert_eq!(consumer.await.unwrap().as_deref(), Some("wake up"));
    }

    #[tokio::test]
    async fn dropping_a_parked_consumer_releases_its_registration() {
        let broadcaster = Arc::new(unbounded());
        let mut subscription = broadcaster.subscribe();

        // Park the consumer on an empty queue, then cancel it.
        let consumer = tokio::spawn(async move {
            subscription.recv().await;
            subscription
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        consumer.abort();
        let _ = consumer.await;

        broadcaster.publish("Z");
        assert_eq!(broadcaster.subscriber_count(), 0);
    }
}
