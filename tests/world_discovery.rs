//! Integration tests for world mode: the GeoDB Cities client, the city
//! fallback table and a full discovery cycle against mocked services.

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use trander::city::geodb::GeoDbClient;
use trander::city::{CityResolver, CityService};
use trander::config::LocationConfig;
use trander::discover::{DiscoveryCoordinator, DiscoveryRequest};
use trander::error::GeolocationError;
use trander::geo::{GeoLocator, ReportedPosition};
use trander::places::category::CategorySelection;
use trander::places::google::GoogleBackend;
use trander::places::PlaceSearchClient;
use trander::rng::pseudo::SeededSource;

fn osaka() -> serde_json::Value {
    json!({
        "id": 3350606,
        "name": "Osaka",
        "country": "Japan",
        "countryCode": "JP",
        "latitude": 34.693737,
        "longitude": 135.502165,
        "population": 2753862
    })
}

#[tokio::test]
async fn geodb_sends_rapidapi_headers_and_filters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cities"))
        .and(query_param("countryIds", "JP"))
        .and(query_param("minPopulation", "100000"))
        .and(query_param("limit", "10"))
        .and(header("X-RapidAPI-Key", "rapid-key"))
        .and(header("X-RapidAPI-Host", "wft-geo-db.p.rapidapi.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [osaka()],
            "metadata": { "currentOffset": 0, "totalCount": 1 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = GeoDbClient::new("rapid-key").with_base_url(server.uri());
    let cities = client.find_cities("JP", 100_000, 10).await.unwrap();

    assert_eq!(cities.len(), 1);
    assert_eq!(cities[0].name, "Osaka");
    assert_eq!(cities[0].population, 2_753_862);
}

#[tokio::test]
async fn geodb_forbidden_falls_back_for_every_table_entry() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cities"))
        .respond_with(ResponseTemplate::new(403).set_body_string("You are not subscribed to this API."))
        .mount(&server)
        .await;

    let resolver = CityResolver::new(GeoDbClient::new("").with_base_url(server.uri()), 100_000, 10);
    let rng = SeededSource::new(1);

    let expected = [
        ("JP", "Tokyo"),
        ("US", "New York"),
        ("GB", "London"),
        ("FR", "Paris"),
        ("DE", "Berlin"),
        ("IT", "Rome"),
        ("ES", "Madrid"),
        ("CA", "Toronto"),
        ("AU", "Sydney"),
        ("KR", "Seoul"),
        ("ZZ", "New York"),
    ];
    for (code, name) in expected {
        let city = resolver.resolve_random_city(code, &rng).await.unwrap();
        assert_eq!(city.name, name, "fallback for {code}");
    }
}

#[tokio::test]
async fn geodb_server_error_propagates() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cities"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let resolver = CityResolver::new(GeoDbClient::new("").with_base_url(server.uri()), 100_000, 10);
    let err = resolver
        .resolve_random_city("JP", &SeededSource::new(1))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn world_discovery_searches_around_the_city() {
    let cities = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [osaka()] })))
        .mount(&cities)
        .await;

    let places = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/nearbysearch/json"))
        .and(query_param("location", "34.693737,135.502165"))
        .and(query_param("radius", "5000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "results": [{
                "place_id": "osaka-castle",
                "name": "Osaka Castle",
                "vicinity": "1-1 Osakajo, Chuo Ward",
                "geometry": { "location": { "lat": 34.6873, "lng": 135.5262 } },
                "types": ["tourist_attraction"]
            }]
        })))
        .mount(&places)
        .await;

    let location = LocationConfig {
        use_ip: false,
        ..LocationConfig::default()
    };
    let coordinator = DiscoveryCoordinator::new(
        GeoLocator::new(ReportedPosition::Failed(GeolocationError::PermissionDenied), &location),
        PlaceSearchClient::new(GoogleBackend::new("k").with_base_url(places.uri())),
        CityResolver::new(GeoDbClient::new("").with_base_url(cities.uri()), 100_000, 10),
        Box::new(SeededSource::new(11)),
    );

    let report = coordinator
        .run(&DiscoveryRequest::world("jp", CategorySelection::new(["tourism"])))
        .await;

    let discovery = report.discovery().expect("expected a discovery");
    assert_eq!(discovery.place.display_name(), "Osaka Castle");
    assert_eq!(discovery.city.as_ref().unwrap().name, "Osaka");
    assert!(discovery.distance_km > 1.0 && discovery.distance_km < 5.0);
    assert!(discovery.notice.is_none());
}
