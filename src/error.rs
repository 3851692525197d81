//! Error types and handling for the Check air quality service
//!
//! `AirQualityError` covers the application edges (configuration, upstream
//! fetches, request validation). The location core never fails outright:
//! its helpers return an [`Outcome`] carrying a [`LocateError`] when they
//! had to fall back to an empty or partial value.

use thiserror::Error;

/// Main error type for the application
#[derive(Error, Debug)]
pub enum AirQualityError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Upstream forecast/measurement API errors
    #[error("Upstream error: {message}")]
    Upstream { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl AirQualityError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new upstream error
    pub fn upstream<S: Into<String>>(message: S) -> Self {
        Self::Upstream {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Short machine-readable code used in API error bodies
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            AirQualityError::Config { .. } => "config",
            AirQualityError::Upstream { .. } => "upstream",
            AirQualityError::Validation { .. } => "validation",
            AirQualityError::Io { .. } => "io",
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            AirQualityError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            AirQualityError::Upstream { .. } => {
                "Air quality data is unavailable right now. Please try again later.".to_string()
            }
            AirQualityError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            AirQualityError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

/// Reasons a step of the location pipeline fell back to an empty value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LocateError {
    #[error("no location match at index {index} ({available} available)")]
    MatchIndexOutOfRange { index: usize, available: usize },

    #[error("location {id} has no usable coordinates")]
    MissingCoordinates { id: String },

    #[error("grid reference ({easting}, {northing}) is outside the national grid")]
    GridOutOfRange { easting: f64, northing: f64 },

    #[error("coordinates ({lon}, {lat}) are not a valid longitude/latitude")]
    InvalidLonLat { lon: f64, lat: f64 },

    #[error("site '{name}' has malformed coordinates")]
    MalformedSiteCoordinates { name: String },

    #[error("no query point to search from")]
    MissingQueryPoint,

    #[error("no candidate coordinates to search")]
    NoCandidates,

    #[error("unparseable reading time '{0}'")]
    ReadingTime(String),
}

/// Result of a step that degrades instead of failing.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Ok(T),
    Degraded { fallback: T, reason: LocateError },
}

impl<T> Outcome<T> {
    pub fn degraded(fallback: T, reason: LocateError) -> Self {
        Self::Degraded { fallback, reason }
    }

    #[must_use]
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }

    #[must_use]
    pub fn reason(&self) -> Option<&LocateError> {
        match self {
            Self::Ok(_) => None,
            Self::Degraded { reason, .. } => Some(reason),
        }
    }

    /// The value, whether computed or fallen back to
    pub fn into_value(self) -> T {
        match self {
            Self::Ok(value) | Self::Degraded { fallback: value, .. } => value,
        }
    }

    /// Split into the value and the degradation reason, if any
    pub fn into_parts(self) -> (T, Option<LocateError>) {
        match self {
            Self::Ok(value) => (value, None),
            Self::Degraded { fallback, reason } => (fallback, Some(reason)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = AirQualityError::config("bad port");
        assert!(matches!(config_err, AirQualityError::Config { .. }));

        let upstream_err = AirQualityError::upstream("503");
        assert!(matches!(upstream_err, AirQualityError::Upstream { .. }));
        assert_eq!(upstream_err.code(), "upstream");

        let validation_err = AirQualityError::validation("missing forecasts");
        assert!(matches!(validation_err, AirQualityError::Validation { .. }));
    }

    #[test]
    fn test_user_messages() {
        let config_err = AirQualityError::config("test");
        assert!(config_err.user_message().contains("Configuration error"));

        let upstream_err = AirQualityError::upstream("test");
        assert!(upstream_err.user_message().contains("unavailable"));

        let validation_err = AirQualityError::validation("test input");
        assert!(validation_err.user_message().contains("test input"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: AirQualityError = io_err.into();
        assert!(matches!(err, AirQualityError::Io { .. }));
    }

    #[test]
    fn test_outcome_parts() {
        let ok: Outcome<Vec<u8>> = Outcome::Ok(vec![1]);
        assert!(!ok.is_degraded());
        assert_eq!(ok.into_parts(), (vec![1], None));

        let degraded: Outcome<Vec<u8>> = Outcome::degraded(Vec::new(), LocateError::NoCandidates);
        assert!(degraded.is_degraded());
        assert_eq!(degraded.reason(), Some(&LocateError::NoCandidates));
        assert!(degraded.into_value().is_empty());
    }
}
