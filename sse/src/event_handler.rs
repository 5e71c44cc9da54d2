use crate::Broadcaster;
use async_trait::async_trait;
use events::{BookEvent, EventHandler};
use log::*;
use std::sync::Arc;

/// Handles book events by rendering them to their canonical text and
/// broadcasting to every connected subscriber.
///
/// The domain layer publishes structured events; this handler is the single
/// place where they become SSE payload text.
pub struct SseEventHandler {
    broadcaster: Arc<Broadcaster>,
}

impl SseEventHandler {
    pub fn new(broadcaster: Arc<Broadcaster>) -> Self {
        Self { broadcaster }
    }
}

#[async_trait]
impl EventHandler for SseEventHandler {
    async fn handle(&self, event: &BookEvent) {
        let message = event.to_string();
        debug!("Broadcasting book event for {}: {message}", event.id());

        self.broadcaster.publish(&message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OverflowPolicy;

    #[tokio::test]
    async fn handled_event_reaches_a_subscriber_as_text() {
        let broadcaster = Arc::new(Broadcaster::new(None, OverflowPolicy::DropOldest));
        let mut subscription = broadcaster.subscribe();

        let handler = SseEventHandler::new(Arc::clone(&broadcaster));
        handler
            .handle(&BookEvent::Created {
                id: events::Id::new_v4(),
                title: "Dune".to_string(),
            })
            .await;

        assert_eq!(
            subscription.recv().await.as_deref(),
            Some("Book created: Dune")
        );
    }
}
