use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::NominatimError;

/// OpenStreetMap object kind a place refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OsmType {
    Node,
    Way,
    Relation,
}

/// A located result returned by search or reverse lookups (`format=jsonv2`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub place_id: u64,
    pub licence: String,
    /// Absent for artificial results such as postcodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub osm_type: Option<OsmType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub osm_id: Option<u64>,
    /// `[min_lat, max_lat, min_lon, max_lon]` as sent by the service
    pub boundingbox: [String; 4],
    pub lat: String,
    pub lon: String,
    pub display_name: String,
    pub place_rank: u32,
    pub category: String,
    #[serde(rename = "type")]
    pub place_type: String,
    pub importance: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addresstype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extratags: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namedetails: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Fields not modelled above, passed through untouched
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Place {
    /// Latitude and longitude parsed from their string encoding
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let lat = self.lat.parse().ok()?;
        let lon = self.lon.parse().ok()?;
        Some((lat, lon))
    }

    /// Bounding box parsed from the service's `[min_lat, max_lat, min_lon, max_lon]` order
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let [south, north, west, east] = &self.boundingbox;
        Some(BoundingBox {
            west: west.parse().ok()?,
            south: south.parse().ok()?,
            east: east.parse().ok()?,
            north: north.parse().ok()?,
        })
    }
}

/// Structured address components of a place
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub road: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub house_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suburb: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub village: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pedestrian: Option<String>,
    #[serde(
        default,
        alias = "neighborhood",
        skip_serializing_if = "Option::is_none"
    )]
    pub neighbourhood: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hamlet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub town: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub county: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_district: Option<String>,
    /// ISO 3166-2 subdivision code at administrative level 6
    #[serde(
        default,
        rename = "ISO3166-2-lvl6",
        skip_serializing_if = "Option::is_none"
    )]
    pub iso3166_2_lvl6: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// ISO 3166-2 subdivision code at administrative level 4
    #[serde(
        default,
        rename = "ISO3166-2-lvl4",
        skip_serializing_if = "Option::is_none"
    )]
    pub iso3166_2_lvl4: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postcode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    pub country_code: String,
    /// Other components (amenity, shop, building, ...)
    #[serde(flatten)]
    pub other: BTreeMap<String, String>,
}

/// Failure reported by the service in place of a result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocodingError {
    pub message: String,
    pub code: Option<u16>,
}

impl fmt::Display for GeocodingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "Geocoding failed ({code}): {}", self.message),
            None => write!(f, "Geocoding failed: {}", self.message),
        }
    }
}

impl std::error::Error for GeocodingError {}

/// Outcome of a reverse lookup: exactly one of a place or a service error
#[derive(Debug, Clone, PartialEq)]
pub enum ReverseResult {
    Place(Box<Place>),
    Error(GeocodingError),
}

impl ReverseResult {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    pub fn place(&self) -> Option<&Place> {
        match self {
            Self::Place(place) => Some(&**place),
            Self::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&GeocodingError> {
        match self {
            Self::Place(_) => None,
            Self::Error(err) => Some(err),
        }
    }

    pub fn into_result(self) -> Result<Place, GeocodingError> {
        match self {
            Self::Place(place) => Ok(*place),
            Self::Error(err) => Err(err),
        }
    }
}

/// Rectangular search area in west, south, east, north order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl BoundingBox {
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.west, self.south, self.east, self.north)
    }
}

/// A latitude or longitude, either numeric or as caller-supplied text
#[derive(Debug, Clone, PartialEq)]
pub enum Coordinate {
    Number(f64),
    Text(String),
}

impl Coordinate {
    /// NaN and infinities have no decimal form
    pub(crate) fn check_finite(&self) -> Result<(), NominatimError> {
        match self {
            Self::Number(value) if !value.is_finite() => {
                Err(NominatimError::NonFiniteCoordinate(*value))
            }
            _ => Ok(()),
        }
    }

    pub(crate) fn encode(&self) -> String {
        match self {
            Self::Number(value) => value.to_string(),
            Self::Text(text) => urlencoding::encode(text.trim()).into_owned(),
        }
    }
}

impl From<f64> for Coordinate {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<f32> for Coordinate {
    fn from(value: f32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<i32> for Coordinate {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for Coordinate {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Coordinate {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}
