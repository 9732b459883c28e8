//! Error types for the Nominatim geocoder

use std::fmt;

/// Errors from the Nominatim client
///
/// Errors the service reports for a reverse lookup are not represented here,
/// they come back as [`crate::GeocodingError`] values.
#[derive(Debug)]
pub enum NominatimError {
    Http(Box<reqwest::Error>),
    Status { status: u16, body: String },
    Json(String),
    InvalidZoomLevel(u8),
    NonFiniteCoordinate(f64),
}

impl fmt::Display for NominatimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(e) => write!(f, "HTTP error: {e}"),
            Self::Status { status, body } => {
                write!(f, "Nominatim returned status {status}: {body}")
            }
            Self::Json(msg) => write!(f, "JSON parse error: {msg}"),
            Self::InvalidZoomLevel(level) => {
                write!(f, "Invalid zoom level: {level} (expected 0-18)")
            }
            Self::NonFiniteCoordinate(value) => {
                write!(f, "Coordinate is not a finite number: {value}")
            }
        }
    }
}

impl std::error::Error for NominatimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for NominatimError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(Box::new(err))
    }
}

impl From<serde_json::Error> for NominatimError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, NominatimError>;
