//! Skycast - weather dashboard service
//!
//! This library provides the dashboard's data operations: geocoded location
//! search, weather fetching with per-day forecast aggregation, persisted
//! favorite locations, and device position resolution, behind a thin HTTP API.

pub mod aggregate;
pub mod api;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod favorites;
pub mod geolocation;
pub mod models;
pub mod web;

// Re-export core types for public API
pub use aggregate::{ForecastSample, aggregate_daily, hourly_window};
pub use cache::SnapshotCache;
pub use client::{SearchGate, WeatherClient};
pub use config::SkycastConfig;
pub use error::{GeolocationError, ProviderError};
pub use favorites::FavoritesStore;
pub use geolocation::{GeolocationAdapter, Position, PositionOptions, PositionSource};
pub use models::{
    CurrentConditions, DailySummary, FavoriteLocation, HourlySample, Location, WeatherSnapshot,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
