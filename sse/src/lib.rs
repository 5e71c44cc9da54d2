//! Server-Sent Events (SSE) infrastructure for real-time mutation updates.
//!
//! This crate implements the in-process publish/subscribe broadcaster that
//! bridges synchronous mutation handlers to any number of concurrently open,
//! long-lived streaming connections.
//!
//! # Architecture
//!
//! - **One queue per subscriber**: each open stream session owns exactly one
//!   FIFO [`queue::EventQueue`], created when the session starts and closed
//!   when it ends.
//! - **Registry of live queues**: a `DashMap`-backed
//!   [`registry::SubscriberRegistry`] holds the current membership; taking a
//!   fan-out snapshot is safe concurrently with sessions starting and ending.
//! - **Fire-and-forget publish**: [`Broadcaster::publish`] enqueues onto
//!   every member without waiting on any consumer and never surfaces an
//!   error to the mutation caller.
//! - **Ephemeral delivery**: nothing is persisted. A subscriber that
//!   connects after an event was published never sees it, and a restart
//!   loses all in-flight queues.
//! - **Bounded-queue hardening**: queues are unbounded by default (enqueue
//!   always succeeds). An optional capacity plus an explicit
//!   [`queue::OverflowPolicy`] turns on drop-oldest, drop-newest, or
//!   disconnect-subscriber behavior for slow consumers.
//!
//! # Delivery guarantees
//!
//! Events published while a subscriber is registered are delivered to that
//! subscriber in publish order (FIFO per queue). No ordering exists across
//! subscribers, and a registration racing a publish may or may not receive
//! that specific event.
//!
//! # Lifecycle
//!
//! [`Broadcaster::subscribe`] returns a [`Subscription`] whose `Drop` impl
//! unregisters the queue, so cleanup runs even when the surrounding stream
//! future is cancelled mid-await by a closed transport.

pub mod broadcaster;
pub mod event_handler;
pub mod queue;
pub mod registry;

pub use broadcaster::{Broadcaster, Subscription};
pub use event_handler::SseEventHandler;
pub use queue::OverflowPolicy;
