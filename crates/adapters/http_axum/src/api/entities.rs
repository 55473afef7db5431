//! JSON REST handlers for the sensor and weather entities of an entry.

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;

use meteobridge_app::platforms::{SensorState, WeatherState};
use meteobridge_app::ports::{ConfigEntryRepository, DataSourceFactory};
use meteobridge_domain::weather::ForecastItem;

use super::{loaded, parse_id};
use crate::error::ApiError;
use crate::state::AppState;

/// Forecast granularity in `/forecast/{kind}`.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForecastKind {
    Daily,
    Hourly,
}

/// `GET /api/entries/{id}/sensors`
pub async fn sensors<R, F>(
    State(state): State<AppState<R, F>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<SensorState>>, ApiError>
where
    R: ConfigEntryRepository,
    F: DataSourceFactory,
{
    let context = loaded(&state, parse_id(&id)?).await?;
    let snapshot = context.coordinator().state();
    Ok(Json(
        context
            .sensors()
            .iter()
            .map(|sensor| sensor.state(&snapshot))
            .collect(),
    ))
}

/// `GET /api/entries/{id}/weather`
///
/// 404 when the entry's variant has no weather entity.
pub async fn weather<R, F>(
    State(state): State<AppState<R, F>>,
    Path(id): Path<String>,
) -> Result<Json<WeatherState>, ApiError>
where
    R: ConfigEntryRepository,
    F: DataSourceFactory,
{
    let id = parse_id(&id)?;
    let context = loaded(&state, id).await?;
    let weather = context.weather().ok_or_else(|| no_weather(id))?;
    Ok(Json(weather.state(&context.coordinator().state())))
}

/// `GET /api/entries/{id}/forecast/{daily|hourly}`
pub async fn forecast<R, F>(
    State(state): State<AppState<R, F>>,
    Path((id, kind)): Path<(String, ForecastKind)>,
) -> Result<Json<Vec<ForecastItem>>, ApiError>
where
    R: ConfigEntryRepository,
    F: DataSourceFactory,
{
    let id = parse_id(&id)?;
    let context = loaded(&state, id).await?;
    let weather = context.weather().ok_or_else(|| no_weather(id))?;
    let snapshot = context.coordinator().state();
    let items = match kind {
        ForecastKind::Daily => weather.daily_forecast(&snapshot),
        ForecastKind::Hourly => weather.hourly_forecast(&snapshot),
    };
    Ok(Json(items))
}

fn no_weather(id: meteobridge_domain::id::EntryId) -> ApiError {
    ApiError::Domain(
        meteobridge_domain::error::NotFoundError {
            entity: "WeatherEntity",
            id: id.to_string(),
        }
        .into(),
    )
}
