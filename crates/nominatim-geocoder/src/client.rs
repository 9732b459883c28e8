use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{NominatimError, Result};
use crate::options::{ReverseOptions, SearchOptions};
use crate::query::Query;
use crate::response::{classify_reverse, error_field};
use crate::transport::{HttpResponse, ReqwestTransport, Transport};
use crate::types::{Coordinate, Place, ReverseResult};

const OUTPUT_FORMAT: &str = "format=jsonv2";

/// Nominatim client for forward (search) and reverse geocoding
///
/// Every call is an independent request; the client holds no per-call state
/// and can be shared across tasks.
pub struct NominatimClient<T = ReqwestTransport> {
    transport: T,
    base_url: String,
}

impl NominatimClient<ReqwestTransport> {
    /// Create a new client with default settings
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with a custom Nominatim URL
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        Self::with_config(ClientConfig::default().with_base_url(base_url))
    }

    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_transport(&config.base_url, transport))
    }
}

impl<T: Transport> NominatimClient<T> {
    pub fn with_transport(base_url: &str, transport: T) -> Self {
        Self {
            transport,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Request URL for a search
    pub fn search_url(&self, query: &Query, options: &SearchOptions) -> String {
        format!(
            "{}/search.php?{}&{}{}",
            self.base_url,
            query.encode(),
            OUTPUT_FORMAT,
            options.encode()
        )
    }

    /// Request URL for a reverse lookup
    pub fn reverse_url(
        &self,
        lat: &Coordinate,
        lon: &Coordinate,
        options: &ReverseOptions,
    ) -> String {
        format!(
            "{}/reverse.php?lat={}&lon={}&{}{}",
            self.base_url,
            lat.encode(),
            lon.encode(),
            OUTPUT_FORMAT,
            options.encode()
        )
    }

    /// Search for places matching a free-text or structured query
    pub async fn search(
        &self,
        query: impl Into<Query>,
        options: &SearchOptions,
    ) -> Result<Vec<Place>> {
        let url = self.search_url(&query.into(), options);
        debug!(url = %url, "Searching");

        let response = self.transport.get(&url).await?;
        if !response.is_success() {
            return Err(status_error(response));
        }

        let places: Vec<Place> = serde_json::from_str(&response.body)?;
        debug!(count = places.len(), "Search returned places");

        Ok(places)
    }

    /// Reverse geocode coordinates to the most specific enclosing place
    ///
    /// Errors reported by the service come back as [`ReverseResult::Error`];
    /// only transport and decoding failures, and NaN or infinite numeric
    /// coordinates, are returned as `Err`.
    pub async fn reverse(
        &self,
        lat: impl Into<Coordinate>,
        lon: impl Into<Coordinate>,
        options: &ReverseOptions,
    ) -> Result<ReverseResult> {
        let (lat, lon) = (lat.into(), lon.into());
        lat.check_finite()?;
        lon.check_finite()?;

        let url = self.reverse_url(&lat, &lon, options);
        debug!(url = %url, "Reverse geocoding");

        let response = self.transport.get(&url).await?;
        let value = if response.is_success() {
            serde_json::from_str::<Value>(&response.body)?
        } else {
            // Rejected parameters come back as a 400 with an error body
            match serde_json::from_str::<Value>(&response.body) {
                Ok(value) if error_field(&value).is_some() => value,
                _ => return Err(status_error(response)),
            }
        };

        let result = classify_reverse(value)?;
        match &result {
            ReverseResult::Error(err) => {
                warn!(url = %url, error = %err.message, "Nominatim returned error");
            }
            ReverseResult::Place(place) => {
                debug!(
                    place_id = place.place_id,
                    display_name = %place.display_name,
                    "Reverse geocoded coordinates"
                );
            }
        }

        Ok(result)
    }
}

fn status_error(response: HttpResponse) -> NominatimError {
    warn!(status = response.status, "Nominatim returned non-success status");
    NominatimError::Status {
        status: response.status,
        body: response.body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{Options, ZoomLevel};
    use crate::query::AddressQuery;
    use crate::types::{BoundingBox, OsmType};
    use std::sync::Mutex;

    const BASE_URL: &str = "https://nominatim.openstreetmap.org";

    const SEARCH_BODY: &str = r#"[
        {
            "place_id": 258462442,
            "licence": "Data © OpenStreetMap contributors, ODbL 1.0. http://osm.org/copyright",
            "osm_type": "node",
            "osm_id": 5036287021,
            "lat": "51.0538286",
            "lon": "3.7250121",
            "category": "shop",
            "type": "bakery",
            "place_rank": 30,
            "importance": 0.00000999999999995449,
            "addresstype": "shop",
            "name": "Bakkerij",
            "display_name": "Bakkerij, Veldstraat, Ghent, Belgium",
            "boundingbox": ["51.0537786", "51.0538786", "3.7249621", "3.7250621"]
        }
    ]"#;

    const REVERSE_BODY: &str = r#"{
        "place_id": 135914183,
        "licence": "Data © OpenStreetMap contributors, ODbL 1.0. http://osm.org/copyright",
        "osm_type": "way",
        "osm_id": 112425722,
        "lat": "51.01956",
        "lon": "3.68261",
        "category": "building",
        "type": "yes",
        "place_rank": 30,
        "importance": 0.00000999999999995449,
        "addresstype": "building",
        "name": "",
        "display_name": "12, Voskenslaan, Ghent, East Flanders, Flanders, 9000, Belgium",
        "address": {
            "house_number": "12",
            "road": "Voskenslaan",
            "city": "Ghent",
            "country": "Belgium",
            "country_code": "be"
        },
        "boundingbox": ["51.0194", "51.0197", "3.6824", "3.6829"]
    }"#;

    /// Records request URLs and replays a fixed response
    struct MockTransport {
        requests: Mutex<Vec<String>>,
        response: HttpResponse,
    }

    impl MockTransport {
        fn new(status: u16, body: &str) -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
                response: HttpResponse {
                    status,
                    body: body.to_string(),
                },
            }
        }

        fn last_request(&self) -> String {
            self.requests.lock().unwrap().last().cloned().unwrap()
        }
    }

    impl Transport for MockTransport {
        async fn get(&self, url: &str) -> Result<HttpResponse> {
            self.requests.lock().unwrap().push(url.to_string());
            Ok(self.response.clone())
        }
    }

    fn client(status: u16, body: &str) -> NominatimClient<MockTransport> {
        NominatimClient::with_transport(BASE_URL, MockTransport::new(status, body))
    }

    #[test]
    fn test_search_url_with_limit() {
        let client = client(200, "[]");
        let url = client.search_url(
            &Query::from("shop"),
            &SearchOptions::new().with_limit(1),
        );
        assert_eq!(
            url,
            "https://nominatim.openstreetmap.org/search.php?q=shop&format=jsonv2&limit=1"
        );
        assert!(url.ends_with("&limit=1"));
    }

    #[test]
    fn test_reverse_url_without_options() {
        let client = client(200, "{}");
        let url = client.reverse_url(
            &Coordinate::from(51.0196),
            &Coordinate::from(3.6826),
            &ReverseOptions::default(),
        );
        assert_eq!(
            url,
            "https://nominatim.openstreetmap.org/reverse.php?lat=51.0196&lon=3.6826&format=jsonv2"
        );
    }

    #[test]
    fn test_structured_search_url() {
        let client = client(200, "[]");
        let query = Query::from(AddressQuery {
            city: Some("Ghent".to_string()),
            country: Some("Belgium".to_string()),
            ..Default::default()
        });
        let url = client.search_url(&query, &SearchOptions::default());
        assert_eq!(
            url,
            "https://nominatim.openstreetmap.org/search.php?city=Ghent&country=Belgium&format=jsonv2"
        );
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client =
            NominatimClient::with_transport("http://localhost:8080/", MockTransport::new(200, "[]"));
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[tokio::test]
    async fn test_search_returns_places() {
        let client = client(200, SEARCH_BODY);
        let places = client
            .search("bakkerij", &SearchOptions::new().with_limit(1))
            .await
            .unwrap();

        assert_eq!(places.len(), 1);
        assert_eq!(places[0].osm_type, Some(OsmType::Node));
        assert_eq!(places[0].category, "shop");
        assert!(places[0].address.is_none());
        assert!(client.transport.last_request().ends_with("&limit=1"));
    }

    #[tokio::test]
    async fn test_search_sends_all_options() {
        let client = client(200, "[]");
        let options = SearchOptions::new()
            .with_common(Options::default().with_languages(["nl"]).with_country_codes(["be"]))
            .with_full_address(true)
            .with_bounding_box(BoundingBox::new(3.6, 51.0, 3.8, 51.1));

        let places = client.search("Veldstraat", &options).await.unwrap();
        assert!(places.is_empty());
        assert_eq!(
            client.transport.last_request(),
            "https://nominatim.openstreetmap.org/search.php?q=Veldstraat&format=jsonv2&accept-language=nl&countrycodes=be&addressdetails=1&viewbox=3.6,51,3.8,51.1&bounded=1"
        );
    }

    #[tokio::test]
    async fn test_search_keeps_places_without_osm_reference() {
        let body = r#"[
            {
                "place_id": 258462442,
                "licence": "Data © OpenStreetMap contributors, ODbL 1.0. http://osm.org/copyright",
                "osm_type": "node",
                "osm_id": 5036287021,
                "lat": "51.0538286",
                "lon": "3.7250121",
                "category": "shop",
                "type": "bakery",
                "place_rank": 30,
                "importance": 0.00000999999999995449,
                "display_name": "Bakkerij, Veldstraat, 9000, Ghent, Belgium",
                "boundingbox": ["51.0537786", "51.0538786", "3.7249621", "3.7250621"]
            },
            {
                "place_id": 351470573,
                "licence": "Data © OpenStreetMap contributors, ODbL 1.0. http://osm.org/copyright",
                "lat": "51.0408",
                "lon": "3.7253",
                "category": "place",
                "type": "postcode",
                "place_rank": 21,
                "importance": 0.12000999999999995,
                "addresstype": "postcode",
                "name": "9000",
                "display_name": "9000, Ghent, Belgium",
                "boundingbox": ["50.9908", "51.0908", "3.6753", "3.7753"]
            }
        ]"#;
        let client = client(200, body);
        let places = client
            .search("9000", &SearchOptions::default())
            .await
            .unwrap();

        assert_eq!(places.len(), 2);
        assert_eq!(places[0].osm_id, Some(5036287021));
        assert_eq!(places[1].place_type, "postcode");
        assert!(places[1].osm_type.is_none());
        assert!(places[1].osm_id.is_none());
    }

    #[tokio::test]
    async fn test_reverse_rejects_non_finite_coordinates() {
        let client = client(200, REVERSE_BODY);
        let result = client
            .reverse(f64::NAN, 3.6826, &ReverseOptions::default())
            .await;
        assert!(matches!(
            result,
            Err(NominatimError::NonFiniteCoordinate(v)) if v.is_nan()
        ));

        let result = client
            .reverse(51.0196, f64::INFINITY, &ReverseOptions::default())
            .await;
        assert!(matches!(result, Err(NominatimError::NonFiniteCoordinate(_))));
        assert!(client.transport.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_status_error() {
        let client = client(503, "<html>Service Unavailable</html>");
        let err = client
            .search("shop", &SearchOptions::default())
            .await
            .unwrap_err();
        match err {
            NominatimError::Status { status, body } => {
                assert_eq!(status, 503);
                assert!(body.contains("Service Unavailable"));
            }
            other => panic!("Expected Status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_search_malformed_body() {
        let client = client(200, "not json");
        let result = client.search("shop", &SearchOptions::default()).await;
        assert!(matches!(result, Err(NominatimError::Json(_))));
    }

    #[tokio::test]
    async fn test_reverse_returns_place() {
        let client = client(200, REVERSE_BODY);
        let result = client
            .reverse(51.0195611619683, 3.68261385663317, &ReverseOptions::default())
            .await
            .unwrap();

        assert!(!result.is_error());
        let place = result.place().unwrap();
        assert_eq!(place.osm_id, Some(112425722));
        assert_eq!(place.address.as_ref().unwrap().road.as_deref(), Some("Voskenslaan"));
    }

    #[tokio::test]
    async fn test_reverse_with_string_coordinates_and_zoom() {
        let client = client(200, REVERSE_BODY);
        let options = ReverseOptions::new().with_zoom(ZoomLevel::new(18).unwrap());
        client.reverse("51.0196", "3.6826", &options).await.unwrap();

        assert_eq!(
            client.transport.last_request(),
            "https://nominatim.openstreetmap.org/reverse.php?lat=51.0196&lon=3.6826&format=jsonv2&zoomlevel=18"
        );
    }

    #[tokio::test]
    async fn test_reverse_service_error_on_success_status() {
        let client = client(200, r#"{"error":"Unable to geocode"}"#);
        let result = client
            .reverse(0.0, -140.0, &ReverseOptions::default())
            .await
            .unwrap();

        assert!(result.is_error());
        assert_eq!(result.error().unwrap().message, "Unable to geocode");
    }

    #[tokio::test]
    async fn test_reverse_out_of_range_is_classified() {
        let client = client(
            400,
            r#"{"error":{"code":400,"message":"Invalid coordinates"}}"#,
        );
        let result = client
            .reverse(200, 200, &ReverseOptions::default())
            .await
            .unwrap();

        assert!(result.is_error());
        let err = result.error().unwrap();
        assert_eq!(err.code, Some(400));
        assert_eq!(err.message, "Invalid coordinates");
        assert_eq!(
            client.transport.last_request(),
            "https://nominatim.openstreetmap.org/reverse.php?lat=200&lon=200&format=jsonv2"
        );
    }

    #[tokio::test]
    async fn test_reverse_status_error_without_error_body() {
        let client = client(500, "Internal Server Error");
        let result = client
            .reverse(51.0, 3.7, &ReverseOptions::default())
            .await;
        assert!(matches!(
            result,
            Err(NominatimError::Status { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn test_each_call_is_independent() {
        let client = client(200, "[]");
        let options = SearchOptions::new().with_limit(2);
        client.search("a", &options).await.unwrap();
        client.search("b", &options).await.unwrap();

        let requests = client.transport.requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].contains("q=a&"));
        assert!(requests[1].contains("q=b&"));
        assert!(requests.iter().all(|r| r.ends_with("&limit=2")));
    }
}
