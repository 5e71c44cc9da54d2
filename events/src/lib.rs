//! Event system infrastructure for Bookshelf.
//!
//! This crate decouples the domain layer, which knows when a book changed,
//! from the infrastructure that announces the change (the SSE broadcaster).
//!
//! - **BookEvent**: one completed mutation, carried as structured fields
//!   (operation + entity id + title) rather than an ad hoc string, so
//!   subscribers that want more than display text can parse it.
//! - **EventHandler**: trait implemented by infrastructure that reacts to
//!   events.
//! - **EventPublisher**: fans an event out to every registered handler.
//!
//! This crate has no dependencies on the other internal crates, which keeps
//! the dependency graph acyclic.

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// A type alias that represents any Entity's internal id field data type.
/// This matches the definition in the entity crate to maintain compatibility.
pub type Id = Uuid;

/// A completed mutation on a book. Immutable once constructed; exists only
/// in transit between the domain layer and whatever handlers are registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookEvent {
    Created { id: Id, title: String },
    Updated { id: Id, title: String },
    PartiallyUpdated { id: Id, title: String },
    Deleted { id: Id, title: String },
}

impl BookEvent {
    pub fn id(&self) -> Id {
        match self {
            BookEvent::Created { id, .. }
            | BookEvent::Updated { id, .. }
            | BookEvent::PartiallyUpdated { id, .. }
            | BookEvent::Deleted { id, .. } => *id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            BookEvent::Created { title, .. }
            | BookEvent::Updated { title, .. }
            | BookEvent::PartiallyUpdated { title, .. }
            | BookEvent::Deleted { title, .. } => title,
        }
    }
}

/// Canonical human-readable rendering, used verbatim as the SSE payload.
/// Deletion is rendered by title like every other operation; the id remains
/// available on the structured event for consumers that need it.
impl fmt::Display for BookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookEvent::Created { title, .. } => write!(f, "Book created: {title}"),
            BookEvent::Updated { title, .. } => write!(f, "Book updated: {title}"),
            BookEvent::PartiallyUpdated { title, .. } => {
                write!(f, "Book partially updated: {title}")
            }
            BookEvent::Deleted { title, .. } => write!(f, "Book deleted: {title}"),
        }
    }
}

/// Trait for handling book events.
/// Implementations perform side effects like pushing SSE notifications.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: &BookEvent);
}

/// Publishes events to registered handlers.
/// Handlers are called sequentially in registration order.
#[derive(Clone, Default)]
pub struct EventPublisher {
    handlers: Arc<Vec<Arc<dyn EventHandler>>>,
}

impl EventPublisher {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Vec::new()),
        }
    }

    /// Register a new event handler.
    /// Note: This creates a new publisher instance with the additional handler.
    /// Store the returned publisher in your application state.
    pub fn with_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        let mut handlers = (*self.handlers).clone();
        handlers.push(handler);
        self.handlers = Arc::new(handlers);
        self
    }

    /// Publish an event to all registered handlers in registration order.
    pub async fn publish(&self, event: BookEvent) {
        for handler in self.handlers.iter() {
            handler.handle(&event).await;
        }
    }
}
