//! Dashboard HTTP API
//!
//! JSON endpoints the frontend consumes: location search, weather snapshot
//! fetch, and favorites CRUD. Domain errors carry user-facing messages and
//! are mapped to HTTP statuses here.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::{
    cache::SnapshotCache,
    client::WeatherClient,
    error::ProviderError,
    favorites::FavoritesStore,
    models::{FavoriteLocation, Location, WeatherSnapshot},
};

/// Shared state behind the API handlers
pub struct AppState {
    pub client: WeatherClient,
    pub favorites: FavoritesStore,
    pub cache: SnapshotCache,
    /// Snapshot freshness window
    pub snapshot_ttl: Duration,
}

/// Error payload the frontend shows in its notification/panel
#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<ProviderError> for ApiError {
    fn from(err: ProviderError) -> Self {
        let status = match err {
            ProviderError::LocationNotFound => StatusCode::NOT_FOUND,
            ProviderError::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            // upstream auth and malformed payloads are our problem, not the caller's
            ProviderError::InvalidApiKey
            | ProviderError::Upstream { .. }
            | ProviderError::Network { .. }
            | ProviderError::InvalidResponse { .. } => StatusCode::BAD_GATEWAY,
        };
        Self {
            status,
            message: err.user_message(),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        error!("Internal error: {:#}", err);
        Self::internal("Something went wrong. Please try again.")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                message: self.message,
            }),
        )
            .into_response()
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/search", get(search))
        .route("/weather", get(weather))
        .route("/favorites", get(list_favorites))
        .route("/favorites", post(add_favorite))
        .route("/favorites/{id}", delete(remove_favorite))
        .with_state(state)
}

#[derive(Deserialize)]
struct SearchParams {
    q: String,
}

async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Location>>, ApiError> {
    let locations = state.client.search(&params.q).await?;
    Ok(Json(locations))
}

#[derive(Deserialize)]
struct WeatherParams {
    lat: f64,
    lon: f64,
}

async fn weather(
    State(state): State<Arc<AppState>>,
    Query(params): Query<WeatherParams>,
) -> Result<Json<WeatherSnapshot>, ApiError> {
    let cache_key = Location::snapshot_cache_key(params.lat, params.lon);

    if let Ok(Some(snapshot)) = state.cache.get::<WeatherSnapshot>(&cache_key).await {
        return Ok(Json(snapshot));
    }

    let snapshot = state.client.fetch_weather(params.lat, params.lon).await?;

    // a cache write failure only costs the next request a refetch
    if let Err(e) = state
        .cache
        .put(&cache_key, snapshot.clone(), state.snapshot_ttl)
        .await
    {
        error!("Failed to cache snapshot: {:#}", e);
    }

    Ok(Json(snapshot))
}

async fn list_favorites(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<FavoriteLocation>>, ApiError> {
    Ok(Json(state.favorites.list().await?))
}

async fn add_favorite(
    State(state): State<Arc<AppState>>,
    Json(favorite): Json<FavoriteLocation>,
) -> Result<StatusCode, ApiError> {
    state.favorites.add(favorite).await?;
    Ok(StatusCode::CREATED)
}

async fn remove_favorite(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.favorites.remove(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
