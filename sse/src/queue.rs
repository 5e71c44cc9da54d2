//! The per-subscriber event queue.
//!
//! A plain `Mutex<VecDeque>` paired with a `tokio::sync::Notify` rather than
//! an mpsc channel: the sending side must be able to evict the oldest
//! pending item (drop-oldest policy) and to close the queue from the
//! publisher's task (disconnect policy), neither of which a channel sender
//! can do.

use std::collections::VecDeque;
use std::fmt;
use std::pin::pin;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};
use tokio::sync::Notify;

/// What to do when a bounded queue is full and another event arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverflowPolicy {
    /// Evict the oldest pending event to make room for the new one.
    DropOldest,
    /// Discard the incoming event; pending events are kept.
    DropNewest,
    /// Close the queue and unregister the subscriber. Unlike a plain
    /// `close()`, pending events are discarded as well: the subscriber has
    /// already proven too slow to drain them, so `pop` returns `None`
    /// immediately.
    DisconnectSubscriber,
}

impl FromStr for OverflowPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "drop-oldest" => Ok(OverflowPolicy::DropOldest),
            "drop-newest" => Ok(OverflowPolicy::DropNewest),
            "disconnect" => Ok(OverflowPolicy::DisconnectSubscriber),
            _ => Err(format!("unknown overflow policy: {s}")),
        }
    }
}

impl fmt::Display for OverflowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverflowPolicy::DropOldest => write!(f, "drop-oldest"),
            OverflowPolicy::DropNewest => write!(f, "drop-newest"),
            OverflowPolicy::DisconnectSubscriber => write!(f, "disconnect"),
        }
    }
}

/// Result of a single enqueue attempt, reported back to the broadcaster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PushOutcome {
    Queued,
    DroppedOldest,
    DroppedNewest,
    /// The queue hit capacity under the disconnect policy and is now closed.
    Overflowed,
    /// The queue was already closed; the event was discarded.
    Closed,
}

struct State {
    items: VecDeque<String>,
    closed: bool,
}

/// An ordered FIFO buffer of pending events, owned by one stream session.
///
/// `push` never blocks. `pop` parks until an event arrives or the queue is
/// closed, and is safe to cancel: dropping the `pop` future leaves the queue
/// intact.
pub struct EventQueue {
    state: Mutex<State>,
    notify: Notify,
    capacity: Option<usize>,
    policy: OverflowPolicy,
}

impl EventQueue {
    pub(crate) fn new(capacity: Option<usize>, policy: OverflowPolicy) -> Self {
        Self {
            state: Mutex::new(State {
                items: VecDeque::new(),
                closed: false,
            }),
            notify: Notify::new(),
            capacity,
            policy,
        }
    }

    // A poisoned lock only happens if a holder panicked; the queue state is
    // a plain VecDeque and stays usable, so recover the guard.
    fn lock(&self) -> MutexGuard<'_, State> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Enqueues an event without blocking, applying the overflow policy when
    /// a capacity is configured and reached.
    pub(crate) fn push(&self, item: String) -> PushOutcome {
        let mut state = self.lock();

        if state.closed {
            return PushOutcome::Closed;
        }

        if let Some(capacity) = self.capacity {
            if state.items.len() >= capacity {
                match self.policy {
                    OverflowPolicy::DropOldest => {
                        state.items.pop_front();
                        state.items.push_back(item);
                        drop(state);
                        self.notify.notify_one();
                        return PushOutcome::DroppedOldest;
                    }
                    OverflowPolicy::DropNewest => {
                        return PushOutcome::DroppedNewest;
                    }
                    OverflowPolicy::DisconnectSubscriber => {
                        state.closed = true;
                        state.items.clear();
                        drop(state);
                        self.notify.notify_waiters();
                        return PushOutcome::Overflowed;
                    }
                }
            }
        }

        state.items.push_back(item);
        drop(state);
        self.notify.notify_one();
        PushOutcome::Queued
    }

    /// Waits for the next event. Returns `None` once the queue is closed and
    /// drained.
    pub async fn pop(&self) -> Option<String> {
        let mut notified = pin!(self.notify.notified());
        loop {
            // Register interest before checking state so a close() racing the
            // check cannot strand this waiter.
            notified.as_mut().enable();
            {
                let mut state = self.lock();
                if let Some(item) = state.items.pop_front() {
                    return Some(item);
                }
                if state.closed {
                    return None;
                }
            }
            notified.as_mut().await;
            notified.set(self.notify.notified());
        }
    }

    /// Closes the queue and wakes any parked `pop`. Pending events are still
    /// delivered before `pop` starts returning `None`.
    pub(crate) fn close(&self) {
        let mut state = self.lock();
        state.closed = true;
        drop(state);
        self.notify.notify_waiters();
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.lock().items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const UNBOUNDED: Option<usize> = None;

    #[tokio::test]
    async fn delivers_in_fifo_order() {
        let queue = EventQueue::new(UNBOUNDED, OverflowPolicy::DropOldest);

        queue.push("first".to_string());
        queue.push("second".to_string());

        assert_eq!(queue.pop().await.as_deref(), Some("first"));
        assert_eq!(queue.pop().await.as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn pop_wakes_when_an_event_arrives() {
        let queue = std::sync::Arc::new(EventQueue::new(UNBOUNDED, OverflowPolicy::DropOldest));

        let consumer = {
            let queue = queue.clone();
            tokio::spawn(async move { queue.pop().await })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        queue.push("late".to_string());

        assert_eq!(consumer.await.unwrap().as_deref(), Some("late"));
    }

    #[tokio::test]
    async fn close_unblocks_a_parked_pop() {
        let queue = std::sync::Arc::new(EventQueue::new(UNBOUNDED, OverflowPolicy::DropOldest));

        let consumer = {
            let queue = queue.clone();
            tokio::spawn(async move { queue.pop().await })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        queue.close();

        assert_eq!(consumer.await.unwrap(), None);
    }

    #[tokio::test]
    async fn pending_events_drain_before_close_is_observed() {
        let queue = EventQueue::new(UNBOUNDED, OverflowPolicy::DropOldest);

        queue.push("pending".to_string());
        queue.close();

        assert_eq!(queue.pop().await.as_deref(), Some("pending"));
        assert_eq!(queue.pop().await, None);
    }

    #[tokio::test]
    async fn drop_oldest_evicts_head_at_capacity() {
        let queue = EventQueue::new(Some(2), OverflowPolicy::DropOldest);

        queue.push("a".to_string());
        queue.push("b".to_string());
        assert_eq!(queue.push("c".to_string()), PushOutcome::DroppedOldest);

        assert_eq!(queue.pop().await.as_deref(), Some("b"));
        assert_eq!(queue.pop().await.as_deref(), Some("c"));
    }

    #[tokio::test]
    async fn drop_newest_discards_incoming_at_capacity() {
        let queue = EventQueue::new(Some(2), OverflowPolicy::DropNewest);

        queue.push("a".to_string());
        queue.push("b".to_string());
        assert_eq!(queue.push("c".to_string()), PushOutcome::DroppedNewest);

        assert_eq!(queue.pop().await.as_deref(), Some("a"));
        assert_eq!(queue.pop().await.as_deref(), Some("b"));
        assert_eq!(queue.len(), 0);
    }

    #[tokio::test]
    async fn disconnect_closes_the_queue_at_capacity() {
        let queue = EventQueue::new(Some(1), OverflowPolicy::DisconnectSubscriber);

        queue.push("a".to_string());
        assert_eq!(queue.push("b".to_string()), PushOutcome::Overflowed);

        assert_eq!(queue.pop().await, None);
        assert_eq!(queue.push("c".to_string()), PushOutcome::Closed);
    }

    #[test]
    fn overflow_policy_parses_from_config_strings() {
        assert_eq!(
            "drop-oldest".parse::<OverflowPolicy>().unwrap(),
            OverflowPolicy::DropOldest
        );
        assert_eq!(
            "drop-newest".parse::<OverflowPolicy>().unwrap(),
            OverflowPolicy::DropNewest
        );
        assert_eq!(
            "disconnect".parse::<OverflowPolicy>().unwrap(),
            OverflowPolicy::DisconnectSubscriber
        );
        assert!("block".parse::<OverflowPolicy>().is_err());
    }
}
