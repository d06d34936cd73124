//! Weather provider client
//!
//! HTTP client for the OpenWeatherMap current-conditions, forecast, and
//! geocoding endpoints. Responses are converted to the domain models at this
//! boundary: units are requested imperial and visibility is converted from
//! meters to miles here, once, never at render time. Transient request
//! failures are retried by the middleware with a small fixed budget; status
//! codes are mapped to typed [`ProviderError`] kinds for the caller.

use crate::aggregate::{self, ForecastSample};
use crate::config::WeatherConfig;
use crate::error::ProviderError;
use crate::models::{CurrentConditions, Location, WeatherSnapshot};
use chrono::Utc;
use futures::future::try_join;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Geocoding returns at most this many candidates
const SEARCH_LIMIT: usize = 5;
/// Queries shorter than this never hit the network
const MIN_QUERY_LEN: usize = 3;
/// Provider reports visibility in meters; the dashboard shows miles
const METERS_PER_MILE: f64 = 1609.34;

pub struct WeatherClient {
    client: ClientWithMiddleware,
    config: WeatherConfig,
}

impl WeatherClient {
    /// Create a new client with the configured timeout and retry budget
    pub fn new(config: WeatherConfig) -> anyhow::Result<Self> {
        let inner = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent("Skycast/0.1.0")
            .build()?;

        let retry_policy =
            ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
        let client = ClientBuilder::new(inner)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self { client, config })
    }

    /// Geocode a free-text query into up to 5 candidate locations
    ///
    /// Queries under 3 characters return empty without a network call.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<Vec<Location>, ProviderError> {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_LEN {
            debug!("Query too short, skipping geocoding call");
            return Ok(Vec::new());
        }

        let url = format!(
            "{}/direct?q={}&limit={}&appid={}",
            self.config.geo_url,
            urlencoding::encode(query),
            SEARCH_LIMIT,
            self.config.api_key
        );

        let response = self.get_checked(&url).await?;
        let results: Vec<openweather::GeocodingResult> = response
            .json()
            .await
            .map_err(|e| ProviderError::invalid_response(format!("geocoding payload: {e}")))?;

        let locations: Vec<Location> = results
            .into_iter()
            .map(|r| Location::new(r.name, r.country.unwrap_or_default(), r.lat, r.lon))
            .collect();

        info!("Geocoded '{}' to {} candidates", query, locations.len());
        Ok(locations)
    }

    /// Fetch current conditions and the multi-day forecast for a coordinate
    /// pair and aggregate them into one snapshot
    ///
    /// Both requests run concurrently; if either fails the whole fetch fails.
    #[instrument(skip(self))]
    pub async fn fetch_weather(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<WeatherSnapshot, ProviderError> {
        let current_url = format!(
            "{}/weather?lat={lat}&lon={lon}&appid={}&units=imperial",
            self.config.base_url, self.config.api_key
        );
        let forecast_url = format!(
            "{}/forecast?lat={lat}&lon={lon}&appid={}&units=imperial",
            self.config.base_url, self.config.api_key
        );

        let (current, forecast) = try_join(
            self.fetch_current(&current_url, lat, lon),
            self.fetch_forecast(&forecast_url),
        )
        .await?;

        let daily = aggregate::aggregate_daily(&forecast);
        let hourly = aggregate::hourly_window(&forecast);

        info!(
            "Fetched snapshot for ({lat}, {lon}): {} daily, {} hourly",
            daily.len(),
            hourly.len()
        );

        Ok(WeatherSnapshot {
            current,
            daily,
            hourly,
        })
    }

    async fn fetch_current(
        &self,
        url: &str,
        lat: f64,
        lon: f64,
    ) -> Result<CurrentConditions, ProviderError> {
        let response = self.get_checked(url).await?;
        let payload: openweather::CurrentResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::invalid_response(format!("current payload: {e}")))?;

        let conditions = payload
            .weather
            .first()
            .ok_or_else(|| ProviderError::invalid_response("current payload has no conditions"))?;

        Ok(CurrentConditions {
            location: Location {
                // identity follows the requested pair so it matches search results
                id: Location::make_id(lat, lon),
                name: payload.name,
                country: payload.sys.country.unwrap_or_default(),
                lat: payload.coord.lat,
                lon: payload.coord.lon,
            },
            temperature: payload.main.temp.round() as i32,
            feels_like: payload.main.feels_like.round() as i32,
            description: conditions.description.clone(),
            icon: conditions.icon.clone(),
            humidity: payload.main.humidity,
            wind_speed: payload.wind.speed.round() as i32,
            wind_direction: payload.wind.deg.unwrap_or(0),
            pressure: payload.main.pressure,
            visibility: (payload.visibility.unwrap_or(10_000.0) / METERS_PER_MILE).round() as i32,
            uv_index: 0,
            sunrise: payload.sys.sunrise,
            sunset: payload.sys.sunset,
            last_updated: Utc::now().timestamp_millis(),
        })
    }

    async fn fetch_forecast(&self, url: &str) -> Result<Vec<ForecastSample>, ProviderError> {
        let response = self.get_checked(url).await?;
        let payload: openweather::ForecastResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::invalid_response(format!("forecast payload: {e}")))?;

        let samples = payload
            .list
            .into_iter()
            .map(|entry| {
                let (description, icon) = entry
                    .weather
                    .first()
                    .map(|w| (w.description.clone(), w.icon.clone()))
                    .unwrap_or_default();
                ForecastSample {
                    timestamp: entry.dt,
                    temperature: entry.main.temp,
                    temp_min: entry.main.temp_min,
                    temp_max: entry.main.temp_max,
                    description,
                    icon,
                    pop: entry.pop,
                }
            })
            .collect();

        Ok(samples)
    }

    /// Issue a GET and map non-success statuses to error kinds
    async fn get_checked(&self, url: &str) -> Result<reqwest::Response, ProviderError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!("Provider returned HTTP {}", status);
            return Err(ProviderError::from_status(status.as_u16()));
        }
        Ok(response)
    }
}

/// Supersession gate for in-flight searches
///
/// Each keystroke begins a new generation; a search result is only delivered
/// if no newer search began while it was in flight, so results can never be
/// displayed against stale input.
#[derive(Debug, Default)]
pub struct SearchGate {
    generation: AtomicU64,
}

impl SearchGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new generation, superseding any search still in flight
    pub fn begin(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Whether a ticket is still the newest generation
    pub fn is_current(&self, ticket: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket
    }

    /// Run a search future under a fresh ticket; returns `None` if a newer
    /// search began before this one resolved
    pub async fn run<F, T>(&self, fut: F) -> Option<T>
    where
        F: Future<Output = T>,
    {
        let ticket = self.begin();
        let out = fut.await;
        self.is_current(ticket).then_some(out)
    }
}

/// `OpenWeatherMap` API response structures
///
/// Only the field paths the dashboard reads are modeled; everything else in
/// the provider payload is ignored.
mod openweather {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct GeocodingResult {
        pub name: String,
        pub lat: f64,
        pub lon: f64,
        pub country: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct CurrentResponse {
        pub coord: Coord,
        pub weather: Vec<ConditionEntry>,
        pub main: MainReadings,
        pub wind: Wind,
        /// Meters; absent when the provider considers it unlimited
        pub visibility: Option<f64>,
        pub sys: Sys,
        pub name: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct Coord {
        pub lat: f64,
        pub lon: f64,
    }

    #[derive(Debug, Deserialize)]
    pub struct ConditionEntry {
        pub description: String,
        pub icon: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct MainReadings {
        pub temp: f64,
        pub feels_like: f64,
        pub humidity: u8,
        pub pressure: f64,
    }

    #[derive(Debug, Deserialize)]
    pub struct Wind {
        pub speed: f64,
        pub deg: Option<u16>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Sys {
        pub country: Option<String>,
        pub sunrise: i64,
        pub sunset: i64,
    }

    #[derive(Debug, Deserialize)]
    pub struct ForecastResponse {
        pub list: Vec<ForecastEntry>,
    }

    #[derive(Debug, Deserialize)]
    pub struct ForecastEntry {
        pub dt: i64,
        pub main: ForecastReadings,
        pub weather: Vec<ConditionEntry>,
        /// Probability of precipitation in [0, 1]
        pub pop: Option<f64>,
    }

    #[derive(Debug, Deserialize)]
    pub struct ForecastReadings {
        pub temp: f64,
        pub temp_min: f64,
        pub temp_max: f64,
    }
}
