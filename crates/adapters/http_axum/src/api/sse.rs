//! Server-Sent Events (SSE) stream of coordinator updates.

use axum::extract::{Path, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::WatchStream;

use meteobridge_app::ports::{ConfigEntryRepository, DataSourceFactory};

use super::{loaded, parse_id};
use crate::error::ApiError;
use crate::state::AppState;
use crate::views::CoordinatorView;

/// `GET /api/entries/{id}/stream`: SSE stream of coordinator state changes.
///
/// Sends the current state first, then one `data:` frame per refresh. The
/// stream ends when the client disconnects or the entry is unloaded.
///
/// # Errors
///
/// Fails like the other entry endpoints when the entry is unknown or not
/// loaded.
pub async fn stream<R, F>(
    State(state): State<AppState<R, F>>,
    Path(id): Path<String>,
) -> Result<Sse<impl tokio_stream::Stream<Item = Result<Event, std::convert::Infallible>>>, ApiError>
where
    R: ConfigEntryRepository,
    F: DataSourceFactory,
{
    let context = loaded(&state, parse_id(&id)?).await?;
    let updates = WatchStream::new(context.coordinator().subscribe());
    drop(context);

    let events = updates.filter_map(|snapshot| {
        match serde_json::to_string(&CoordinatorView::from(&snapshot)) {
            Ok(json) => Some(Ok(Event::default().event("coordinator").data(json))),
            Err(err) => {
                tracing::warn!(%err, "failed to serialize coordinator state for SSE stream");
                None
            }
        }
    });

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}
