use crate::queue::{EventQueue, OverflowPolicy};
use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Unique identifier for a subscriber queue (server-generated).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(Uuid);

impl SubscriberId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The set of currently live subscriber queues.
///
/// Membership is the only state: every queue reachable from an active stream
/// session is a member for exactly as long as that session is open. All three
/// operations are safe to call concurrently from any number of tasks.
pub struct SubscriberRegistry {
    subscribers: DashMap<SubscriberId, Arc<EventQueue>>,
    capacity: Option<usize>,
    policy: OverflowPolicy,
}

impl SubscriberRegistry {
    pub fn new(capacity: Option<usize>, policy: OverflowPolicy) -> Self {
        Self {
            subscribers: DashMap::new(),
            capacity,
            policy,
        }
    }

    /// Creates a new empty queue and adds it to the live set.
    pub fn register(&self) -> (SubscriberId, Arc<EventQueue>) {
        let id = SubscriberId::new();
        let queue = Arc::new(EventQueue::new(self.capacity, self.policy));

        self.subscribers.insert(id, Arc::clone(&queue));
        (id, queue)
    }

    /// Removes a queue from the live set and closes it, waking any parked
    /// consumer. Unregistering an id that is not present is a no-op.
    pub fn unregister(&self, id: &SubscriberId) {
        if let Some((_, queue)) = self.subscribers.remove(id) {
            queue.close();
        }
    }

    /// Current members, captured for fan-out iteration. The snapshot is taken
    /// without blocking registrations on other tasks; a registration racing a
    /// broadcast may or may not be included.
    pub(crate) fn snapshot(&self) -> Vec<(SubscriberId, Arc<EventQueue>)> {
        self.subscribers
            .iter()
            .map(|entry| (*entry.key(), Arc::clone(entry.value())))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_adds_and_unregister_removes() {
        let registry = SubscriberRegistry::new(None, OverflowPolicy::DropOldest);

        let (id, _queue) = registry.register();
        assert_eq!(registry.len(), 1);

        registry.unregister(&id);
        assert!(registry.is_empty());
    }

    #[test]
    fn unregister_unknown_id_is_a_no_op() {
        let registry = SubscriberRegistry::new(None, OverflowPolicy::DropOldest);

        let (id, _queue) = registry.register();
        registry.unregister(&id);
        registry.unregister(&id);

        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn unregister_closes_the_queue() {
        let registry = SubscriberRegistry::new(None, OverflowPolicy::DropOldest);

        let (id, queue) = registry.register();
        registry.unregister(&id);

        assert_eq!(queue.pop().await, None);
    }

    #[test]
    fn snapshot_reflects_current_membership() {
        let registry = SubscriberRegistry::new(None, OverflowPolicy::DropOldest);

        let (first, _q1) = registry.register();
        let (_second, _q2) = registry.register();
        assert_eq!(registry.snapshot().len(), 2);

        registry.unregister(&first);
        let snapshot = registry.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_ne!(snapshot[0].0, first);
    }
}
