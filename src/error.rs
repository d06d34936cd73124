//! Error types and handling for the Skycast service

use thiserror::Error;

/// Failures talking to the weather/geocoding provider
///
/// The variants are the distinguishable kinds the presentation layer uses to
/// choose user-facing messaging; no retry happens at this level.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The provider rejected the API key (HTTP 401)
    #[error("invalid API key")]
    InvalidApiKey,

    /// The provider does not know the requested location (HTTP 404)
    #[error("location not found")]
    LocationNotFound,

    /// The provider is down or overloaded (HTTP 5xx)
    #[error("weather service unavailable")]
    ServiceUnavailable,

    /// Any other non-success status from the provider
    #[error("weather provider error (HTTP {status})")]
    Upstream { status: u16 },

    /// Transport-level failure before any status was received
    #[error("network error: {source}")]
    Network {
        #[from]
        source: reqwest_middleware::Error,
    },

    /// The provider answered with a body we could not decode
    #[error("invalid provider response: {message}")]
    InvalidResponse { message: String },
}

impl ProviderError {
    /// Classify a non-success HTTP status into an error kind
    #[must_use]
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => Self::InvalidApiKey,
            404 => Self::LocationNotFound,
            500..=599 => Self::ServiceUnavailable,
            _ => Self::Upstream { status },
        }
    }

    /// Create an invalid-response error
    pub fn invalid_response<S: Into<String>>(message: S) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidApiKey => {
                "Invalid API key. Please check your OpenWeatherMap API key.".to_string()
            }
            Self::LocationNotFound => {
                "Location not found. Please check the location name.".to_string()
            }
            Self::ServiceUnavailable => {
                "Weather service temporarily unavailable. Please try again later.".to_string()
            }
            Self::Upstream { status } => {
                format!("Weather API error (HTTP {status}).")
            }
            Self::Network { .. } => {
                "Unable to reach the weather service. Please check your internet connection."
                    .to_string()
            }
            Self::InvalidResponse { .. } => {
                "Received unexpected data from the weather service.".to_string()
            }
        }
    }
}

/// Failures resolving the device position
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeolocationError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("position unavailable")]
    PositionUnavailable,

    #[error("location request timed out")]
    Timeout,

    #[error("geolocation is not supported in this environment")]
    Unsupported,
}

impl GeolocationError {
    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::PermissionDenied => {
                "Location access denied. Please enable location permissions.".to_string()
            }
            Self::PositionUnavailable => "Location information unavailable.".to_string(),
            Self::Timeout => "Location request timed out.".to_string(),
            Self::Unsupported => "Geolocation is not supported here.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(matches!(
            ProviderError::from_status(401),
            ProviderError::InvalidApiKey
        ));
        assert!(matches!(
            ProviderError::from_status(404),
            ProviderError::LocationNotFound
        ));
        assert!(matches!(
            ProviderError::from_status(500),
            ProviderError::ServiceUnavailable
        ));
        assert!(matches!(
            ProviderError::from_status(503),
            ProviderError::ServiceUnavailable
        ));
        assert!(matches!(
            ProviderError::from_status(418),
            ProviderError::Upstream { status: 418 }
        ));
    }

    #[test]
    fn test_user_messages() {
        assert!(
            ProviderError::InvalidApiKey
                .user_message()
                .contains("API key")
        );
        assert!(
            ProviderError::ServiceUnavailable
                .user_message()
                .contains("try again")
        );
        assert!(
            GeolocationError::PermissionDenied
                .user_message()
                .contains("permissions")
        );
    }
}
