//! Integration tests for the OSRM client (wiremock-based)

use std::time::Duration;

use domain::GeoLocation;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use integration_routing::{OsrmClient, RoutingClient, RoutingConfig, RoutingError};

fn destination() -> GeoLocation {
    GeoLocation::new(5.6101, -0.1902).unwrap()
}

const fn sample_route_json() -> &'static str {
    r#"{
        "code": "Ok",
        "routes": [{
            "geometry": {
                "type": "LineString",
                "coordinates": [
                    [-0.1870, 5.6037],
                    [-0.1881, 5.6060],
                    [-0.1895, 5.6088],
                    [-0.1902, 5.6101]
                ]
            },
            "legs": [],
            "distance": 1210.4,
            "duration": 187.9,
            "weight_name": "routability",
            "weight": 187.9
        }],
        "waypoints": []
    }"#
}

#[tokio::test]
async fn test_driving_route_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/route/v1/driving/-0\.187,5\.6037;-0\.1902,5\.6101$"))
        .and(query_param("overview", "full"))
        .and(query_param("geometries", "geojson"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sample_route_json()))
        .expect(1)
        .mount(&server)
        .await;

    let client = OsrmClient::new(&RoutingConfig::for_testing(server.uri())).unwrap();
    let route = client
        .driving_route(GeoLocation::accra(), destination(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(route.path.len(), 4);
    assert_eq!(route.path[3], destination());
    assert!((route.duration_seconds - 187.9).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_driving_route_no_route() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/route/v1/driving/.+$"))
        .respond_with(ResponseTemplate::new(400).set_body_string(
            r#"{ "code": "NoRoute", "message": "Impossible route between points" }"#,
        ))
        .mount(&server)
        .await;

    let client = OsrmClient::new(&RoutingConfig::for_testing(server.uri())).unwrap();
    let result = client
        .driving_route(GeoLocation::accra(), destination(), &CancellationToken::new())
        .await;

    assert!(matches!(result, Err(RoutingError::NoRoute(_))));
}

#[tokio::test]
async fn test_driving_route_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/route/v1/driving/.+$"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let client = OsrmClient::new(&RoutingConfig::for_testing(server.uri())).unwrap();
    let result = client
        .driving_route(GeoLocation::accra(), destination(), &CancellationToken::new())
        .await;

    assert!(matches!(result, Err(RoutingError::RequestFailed(_))));
}

#[tokio::test]
async fn test_driving_route_malformed_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/route/v1/driving/.+$"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{ "code": "Ok", "routes": [{}] }"#))
        .mount(&server)
        .await;

    let client = OsrmClient::new(&RoutingConfig::for_testing(server.uri())).unwrap();
    let result = client
        .driving_route(GeoLocation::accra(), destination(), &CancellationToken::new())
        .await;

    assert!(matches!(result, Err(RoutingError::ParseError(_))));
}

#[tokio::test]
async fn test_driving_route_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/route/v1/driving/.+$"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(sample_route_json())
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let client = OsrmClient::new(&RoutingConfig::for_testing(server.uri())).unwrap();
    let result = client
        .driving_route(GeoLocation::accra(), destination(), &CancellationToken::new())
        .await;

    assert!(matches!(result, Err(RoutingError::Timeout { .. })));
}
