//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod entities;
#[allow(clippy::missing_errors_doc)]
pub mod entries;
pub mod sse;

use std::str::FromStr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};

use meteobridge_app::entry::EntryContext;
use meteobridge_app::ports::{ConfigEntryRepository, DataSourceFactory};
use meteobridge_domain::id::EntryId;

use crate::error::ApiError;
use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<R, F>() -> Router<AppState<R, F>>
where
    R: ConfigEntryRepository,
    F: DataSourceFactory,
{
    Router::new()
        .route(
            "/entries",
            get(entries::list::<R, F>).post(entries::create::<R, F>),
        )
        .route(
            "/entries/{id}",
            get(entries::get::<R, F>)
                .put(entries::update::<R, F>)
                .delete(entries::delete::<R, F>),
        )
        .route("/entries/{id}/reload", post(entries::reload::<R, F>))
        .route("/entries/{id}/refresh", post(entries::refresh::<R, F>))
        .route("/entries/{id}/coordinator", get(entries::coordinator::<R, F>))
        .route("/entries/{id}/sensors", get(entities::sensors::<R, F>))
        .route("/entries/{id}/weather", get(entities::weather::<R, F>))
        .route(
            "/entries/{id}/forecast/{kind}",
            get(entities::forecast::<R, F>),
        )
        .route("/entries/{id}/stream", get(sse::stream::<R, F>))
}

fn parse_id(id: &str) -> Result<EntryId, ApiError> {
    EntryId::from_str(id).map_err(|_| ApiError::InvalidId)
}

/// Runtime context of a loaded entry; 404 for unknown entries, 409 for
/// entries that exist but are not loaded.
async fn loaded<R, F>(
    state: &AppState<R, F>,
    id: EntryId,
) -> Result<Arc<EntryContext<F::Source>>, ApiError>
where
    R: ConfigEntryRepository,
    F: DataSourceFactory,
{
    if let Some(context) = state.manager.context(id).await {
        return Ok(context);
    }
    state.manager.entry(id).await?;
    Err(ApiError::NotLoaded)
}
