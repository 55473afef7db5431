//! JSON REST handlers for config entries and their coordinators.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use meteobridge_app::ports::{ConfigEntryRepository, DataSourceFactory};
use meteobridge_domain::connection::ConnectionConfig;

use super::{loaded, parse_id};
use crate::error::ApiError;
use crate::state::AppState;
use crate::views::{CoordinatorView, EntryView};

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<EntryView>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the update endpoint.
pub enum UpdateResponse {
    /// Saved; the entry reloads shortly.
    Accepted(Json<EntryView>),
}

impl IntoResponse for UpdateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Accepted(json) => (StatusCode::ACCEPTED, json).into_response(),
        }
    }
}

/// Possible responses from the delete endpoint.
pub enum DeleteResponse {
    NoContent,
}

impl IntoResponse for DeleteResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// `GET /api/entries`
pub async fn list<R, F>(State(state): State<AppState<R, F>>) -> Result<Json<Vec<EntryView>>, ApiError>
where
    R: ConfigEntryRepository,
    F: DataSourceFactory,
{
    let entries = state.manager.entries().await?;
    Ok(Json(entries.into_iter().map(EntryView::from).collect()))
}

/// `POST /api/entries`: config flow.
///
/// The entry is created even when its first setup fails; the returned state
/// tells whether it loaded.
pub async fn create<R, F>(
    State(state): State<AppState<R, F>>,
    Json(input): Json<ConnectionConfig>,
) -> Result<CreateResponse, ApiError>
where
    R: ConfigEntryRepository,
    F: DataSourceFactory,
{
    let (entry, _) = state.manager.create_entry(input).await?;
    let status = state.manager.entry(entry.id).await?;
    Ok(CreateResponse::Created(Json(EntryView::from(status))))
}

/// `GET /api/entries/{id}`
pub async fn get<R, F>(
    State(state): State<AppState<R, F>>,
    Path(id): Path<String>,
) -> Result<Json<EntryView>, ApiError>
where
    R: ConfigEntryRepository,
    F: DataSourceFactory,
{
    let id = parse_id(&id)?;
    let status = state.manager.entry(id).await?;
    Ok(Json(EntryView::from(status)))
}

/// `PUT /api/entries/{id}`: options flow, followed by a delayed reload.
pub async fn update<R, F>(
    State(state): State<AppState<R, F>>,
    Path(id): Path<String>,
    Json(input): Json<ConnectionConfig>,
) -> Result<UpdateResponse, ApiError>
where
    R: ConfigEntryRepository,
    F: DataSourceFactory,
{
    let id = parse_id(&id)?;
    state.manager.reconfigure_entry(id, input).await?;
    let status = state.manager.entry(id).await?;
    Ok(UpdateResponse::Accepted(Json(EntryView::from(status))))
}

/// `DELETE /api/entries/{id}`
pub async fn delete<R, F>(
    State(state): State<AppState<R, F>>,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError>
where
    R: ConfigEntryRepository,
    F: DataSourceFactory,
{
    let id = parse_id(&id)?;
    state.manager.remove_entry(id).await?;
    Ok(DeleteResponse::NoContent)
}

/// `POST /api/entries/{id}/reload`
pub async fn reload<R, F>(
    State(state): State<AppState<R, F>>,
    Path(id): Path<String>,
) -> Result<Json<EntryView>, ApiError>
where
    R: ConfigEntryRepository,
    F: DataSourceFactory,
{
    let id = parse_id(&id)?;
    state.manager.reload_entry(id).await?;
    let status = state.manager.entry(id).await?;
    Ok(Json(EntryView::from(status)))
}

/// `POST /api/entries/{id}/refresh`: refresh now, outside the schedule.
///
/// A failed refresh is reported in the returned coordinator view, not as an
/// HTTP error.
pub async fn refresh<R, F>(
    State(state): State<AppState<R, F>>,
    Path(id): Path<String>,
) -> Result<Json<CoordinatorView>, ApiError>
where
    R: ConfigEntryRepository,
    F: DataSourceFactory,
{
    let id = parse_id(&id)?;
    let context = loaded(&state, id).await?;
    if let Err(err) = context.coordinator().refresh().await {
        tracing::debug!(entry_id = %id, error = %err, "manual refresh failed");
    }
    Ok(Json(CoordinatorView::from(&context.coordinator().state())))
}

/// `GET /api/entries/{id}/coordinator`
pub async fn coordinator<R, F>(
    State(state): State<AppState<R, F>>,
    Path(id): Path<String>,
) -> Result<Json<CoordinatorView>, ApiError>
where
    R: ConfigEntryRepository,
    F: DataSourceFactory,
{
    let id = parse_id(&id)?;
    let context = loaded(&state, id).await?;
    Ok(Json(CoordinatorView::from(&context.coordinator().state())))
}
