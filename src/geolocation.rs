//! Geolocation adapter
//!
//! Wraps a single-shot "get current position" capability behind a trait,
//! applying the dashboard's lookup policy: low-accuracy preferred, a 10 second
//! timeout, and acceptance of a cached position under 5 minutes old. Failures
//! are classified into the [`GeolocationError`] kinds; no retry happens here,
//! the caller decides whether to re-invoke.

use crate::error::GeolocationError;
use async_trait::async_trait;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

/// A device position fix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub lat: f64,
    pub lon: f64,
}

/// Lookup policy for position requests
#[derive(Debug, Clone, Copy)]
pub struct PositionOptions {
    /// Prefer precision over speed/battery
    pub high_accuracy: bool,
    /// Abandon the lookup after this long
    pub timeout: Duration,
    /// Accept a previously obtained position up to this old
    pub max_age: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            high_accuracy: false,
            timeout: Duration::from_secs(10),
            max_age: Duration::from_secs(300),
        }
    }
}

/// Something that can produce the device's current position once
#[async_trait]
pub trait PositionSource: Send + Sync {
    async fn current_position(&self, high_accuracy: bool) -> Result<Position, GeolocationError>;
}

/// Source for environments with no location capability at all
pub struct UnsupportedSource;

#[async_trait]
impl PositionSource for UnsupportedSource {
    async fn current_position(&self, _high_accuracy: bool) -> Result<Position, GeolocationError> {
        Err(GeolocationError::Unsupported)
    }
}

/// Single-shot position lookup with timeout and short-lived caching
pub struct GeolocationAdapter<S: PositionSource> {
    source: S,
    options: PositionOptions,
    last_fix: Mutex<Option<(Position, Instant)>>,
}

impl<S: PositionSource> GeolocationAdapter<S> {
    pub fn new(source: S) -> Self {
        Self::with_options(source, PositionOptions::default())
    }

    pub fn with_options(source: S, options: PositionOptions) -> Self {
        Self {
            source,
            options,
            last_fix: Mutex::new(None),
        }
    }

    /// Resolve the current position, reusing a fix younger than `max_age`
    pub async fn locate(&self) -> Result<Position, GeolocationError> {
        let mut last_fix = self.last_fix.lock().await;

        if let Some((position, obtained_at)) = *last_fix
            && obtained_at.elapsed() < self.options.max_age
        {
            debug!("Reusing cached position fix");
            return Ok(position);
        }

        let lookup = self.source.current_position(self.options.high_accuracy);
        let position = match tokio::time::timeout(self.options.timeout, lookup).await {
            Ok(result) => result?,
            Err(_) => return Err(GeolocationError::Timeout),
        };

        *last_fix = Some((position, Instant::now()));
        Ok(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct FixedSource {
        position: Position,
        calls: AtomicU32,
    }

    impl FixedSource {
        fn new(lat: f64, lon: f64) -> Self {
            Self {
                position: Position { lat, lon },
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl PositionSource for FixedSource {
        async fn current_position(
            &self,
            _high_accuracy: bool,
        ) -> Result<Position, GeolocationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.position)
        }
    }

    struct DeniedSource;

    #[async_trait]
    impl PositionSource for DeniedSource {
        async fn current_position(
            &self,
            _high_accuracy: bool,
        ) -> Result<Position, GeolocationError> {
            Err(GeolocationError::PermissionDenied)
        }
    }

    struct HangingSource;

    #[async_trait]
    impl PositionSource for HangingSource {
        async fn current_position(
            &self,
            _high_accuracy: bool,
        ) -> Result<Position, GeolocationError> {
            futures::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_locate_returns_position() {
        let adapter = GeolocationAdapter::new(FixedSource::new(40.7128, -74.006));
        let position = adapter.locate().await.unwrap();
        assert_eq!(position, Position { lat: 40.7128, lon: -74.006 });
    }

    #[tokio::test]
    async fn test_fresh_fix_is_reused() {
        let adapter = GeolocationAdapter::new(FixedSource::new(40.7128, -74.006));
        adapter.locate().await.unwrap();
        adapter.locate().await.unwrap();
        assert_eq!(adapter.source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_stale_fix_triggers_new_lookup() {
        let options = PositionOptions {
            max_age: Duration::from_millis(0),
            ..PositionOptions::default()
        };
        let adapter = GeolocationAdapter::with_options(FixedSource::new(40.7, -74.0), options);
        adapter.locate().await.unwrap();
        adapter.locate().await.unwrap();
        assert_eq!(adapter.source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_denied_classification_propagates() {
        let adapter = GeolocationAdapter::new(DeniedSource);
        assert_eq!(
            adapter.locate().await.unwrap_err(),
            GeolocationError::PermissionDenied
        );
    }

    #[tokio::test]
    async fn test_timeout_classification() {
        let options = PositionOptions {
            timeout: Duration::from_millis(20),
            ..PositionOptions::default()
        };
        let adapter = GeolocationAdapter::with_options(HangingSource, options);
        assert_eq!(adapter.locate().await.unwrap_err(), GeolocationError::Timeout);
    }

    #[tokio::test]
    async fn test_unsupported_environment() {
        let adapter = GeolocationAdapter::new(UnsupportedSource);
        assert_eq!(
            adapter.locate().await.unwrap_err(),
            GeolocationError::Unsupported
        );
    }
}
