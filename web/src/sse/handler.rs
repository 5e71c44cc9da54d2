use crate::extractors::authenticated_user::AuthenticatedUser;
use async_stream::stream;
use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use log::*;
use service::AppState;
use sse::Subscription;
use std::convert::Infallible;

/// SSE handler that establishes a long-lived connection for real-time book
/// mutation events. Each connection gets its own subscriber queue; events
/// published while the connection is open arrive in publish order.
///
/// The `Subscription` owns the registry entry, so when the client disconnects
/// and axum drops the stream, the queue is unregistered automatically.
pub(crate) async fn stream_events(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    debug!("Establishing SSE connection for user {}", user.id);

    live_event_stream(app_state.broadcaster.subscribe())
}

/// Drains a subscription into an SSE response, one `data:` frame per event.
fn live_event_stream(
    mut subscription: Subscription,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = stream! {
        // recv() returns None once the subscription is closed server-side
        // (e.g. the disconnect overflow policy kicked in).
        while let Some(text) = subscription.recv().await {
            yield Ok(Event::default().data(text));
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::routing::get;
    use axum::Router;
    use futures::StreamExt;
    use sse::{Broadcaster, OverflowPolicy};
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn subscribe(
        State(broadcaster): State<Arc<Broadcaster>>,
    ) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
        live_event_stream(broadcaster.subscribe())
    }

    #[tokio::test]
    async fn delivered_events_use_sse_wire_framing() {
        let broadcaster = Arc::new(Broadcaster::new(None, OverflowPolicy::DropOldest));
        let app = Router::new()
            .route("/stream", get(subscribe))
            .with_state(Arc::clone(&broadcaster));

        let response = app
            .oneshot(Request::get("/stream").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/event-stream"
        );
        assert_eq!(broadcaster.subscriber_count(), 1);

        broadcaster.publish("Book created: Dune");

        let mut body = response.into_body().into_data_stream();
        let first_chunk = body.next().await.unwrap().unwrap();
        assert_eq!(&first_chunk[..], b"data: Book created: Dune\n\n");
    }

    #[tokio::test]
    async fn dropping_the_response_releases_the_subscription() {
        let broadcaster = Arc::new(Broadcaster::new(None, OverflowPolicy::DropOldest));
        let app = Router::new()
            .route("/stream", get(subscribe))
            .with_state(Arc::clone(&broadcaster));

        let response = app
            .oneshot(Request::get("/stream").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(broadcaster.subscriber_count(), 1);

        drop(response);
        assert_eq!(broadcaster.subscriber_count(), 0);
    }
}
