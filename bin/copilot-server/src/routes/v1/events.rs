//! Server-sent store change notifications.
//!
//! Every event is unnamed so `EventSource.onmessage` receives it. The data
//! is the JSON-encoded change; a subscriber that fell behind gets a single
//! `{"kind":"lagged","skipped":n}` event and should re-read the store.

use std::convert::Infallible;
use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::routing::get;
use futures::{Stream, StreamExt};
use serde_json::json;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tracing::{debug, warn};
use utoipa::OpenApi;

use copilot_core::{StoreChange, TaskStore};

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(paths(events))]
pub struct EventsApi;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/events", get(events))
}

#[utoipa::path(
    get,
    path = "/v1/events",
    tag = "events",
    responses((status = 200, description = "text/event-stream of store changes"))
)]
pub async fn events(State(state): State<Arc<AppState>>) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    debug!("event subscriber connected");
    let stream = BroadcastStream::new(state.store.subscribe()).map(|change| Ok::<_, Infallible>(to_event(change)));
    Sse::new(stream).keep_alive(KeepAlive::default())
}

fn to_event(change: Result<StoreChange, BroadcastStreamRecvError>) -> Event {
    let data = match change {
        Ok(change) => serde_json::to_string(&change),
        Err(BroadcastStreamRecvError::Lagged(skipped)) => {
            warn!(skipped, "event subscriber lagged");
            serde_json::to_string(&json!({ "kind": "lagged", "skipped": skipped }))
        }
    };
    // Serializing these shapes cannot fail; an empty event still prompts a re-read.
    Event::default().data(data.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use copilot_types::TaskStatus;

    #[test]
    fn change_events_carry_json() {
        let event = to_event(Ok(StoreChange::Set {
            id: "t-1".into(),
            status: TaskStatus::Processing,
        }));
        let text = format!("{event:?}");
        assert!(text.contains("t-1"));
    }
}
