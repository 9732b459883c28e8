//! Nominatim Geocoding Client
//!
//! A typed Rust client for the [Nominatim](https://nominatim.org/) search and
//! reverse endpoints. Queries and options are encoded into request URLs with
//! `format=jsonv2`; responses are decoded into [`Place`] values, and reverse
//! lookups are classified into a [`ReverseResult`] that is either a place or
//! the error the service reported.
//!
//! # Example
//!
//! ```no_run
//! use nominatim_geocoder::{NominatimClient, ReverseOptions, SearchOptions};
//!
//! # async fn example() -> Result<(), nominatim_geocoder::NominatimError> {
//! let client = NominatimClient::new()?;
//!
//! let places = client
//!     .search("Voskenslaan, Ghent", &SearchOptions::new().with_limit(1))
//!     .await?;
//! for place in &places {
//!     println!("{} ({}, {})", place.display_name, place.lat, place.lon);
//! }
//!
//! match client.reverse(51.0196, 3.6826, &ReverseOptions::default()).await?.into_result() {
//!     Ok(place) => println!("{}", place.display_name),
//!     Err(err) => println!("no result: {err}"),
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;
mod options;
mod query;
mod response;
mod transport;
mod types;

pub use client::NominatimClient;
pub use config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_USER_AGENT};
pub use error::{NominatimError, Result};
pub use options::{
    EndpointOptions, Options, ResolvedReverseOptions, ResolvedSearchOptions, ReverseOptions,
    SearchOptions, ZoomLevel, DEFAULT_DEDUPE, DEFAULT_LIMIT,
};
pub use query::{AddressQuery, Query};
pub use response::classify_reverse;
pub use transport::{HttpResponse, ReqwestTransport, Transport};
pub use types::{
    Address, BoundingBox, Coordinate, GeocodingError, OsmType, Place, ReverseResult,
};
