//! Integration tests for `WeatherClient` using wiremock HTTP mocks.

use skycast::WeatherClient;
use skycast::config::WeatherConfig;
use skycast::error::ProviderError;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> WeatherClient {
    let config = WeatherConfig {
        api_key: "test-key".to_string(),
        base_url: base_url.to_string(),
        geo_url: base_url.to_string(),
        timeout_seconds: 5,
        max_retries: 0,
    };
    WeatherClient::new(config).expect("client construction should not fail")
}

fn current_body() -> serde_json::Value {
    serde_json::json!({
        "coord": { "lat": 40.7128, "lon": -74.006 },
        "weather": [ { "description": "clear sky", "icon": "01d" } ],
        "main": { "temp": 71.6, "feels_like": 69.4, "humidity": 45, "pressure": 1016.0 },
        "wind": { "speed": 7.4, "deg": 220 },
        "visibility": 10000,
        "sys": { "country": "US", "sunrise": 1700000000, "sunset": 1700039000 },
        "name": "New York"
    })
}

fn forecast_body() -> serde_json::Value {
    // Two days of 3-hourly samples; day one has a hotter afternoon sample so
    // the high must come from it while the conditions stay with the morning.
    let mut list = Vec::new();
    let day_one = 1_699_952_400_i64; // 2023-11-14 09:00 UTC
    list.push(serde_json::json!({
        "dt": day_one,
        "main": { "temp": 70.0, "temp_min": 65.0, "temp_max": 80.0 },
        "weather": [ { "description": "light rain", "icon": "10d" } ],
        "pop": 0.2
    }));
    list.push(serde_json::json!({
        "dt": day_one + 3 * 3600,
        "main": { "temp": 78.0, "temp_min": 60.0, "temp_max": 85.0 },
        "weather": [ { "description": "clear sky", "icon": "01d" } ],
        "pop": 0.5
    }));
    let day_two = 1_700_006_400_i64; // 2023-11-15 00:00 UTC
    for i in 0..8_i64 {
        list.push(serde_json::json!({
            "dt": day_two + i * 3 * 3600,
            "main": { "temp": 60.0, "temp_min": 55.0, "temp_max": 66.0 },
            "weather": [ { "description": "overcast clouds", "icon": "04d" } ]
        }));
    }
    serde_json::json!({ "list": list })
}

#[tokio::test]
async fn short_query_issues_no_network_call() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/direct"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let results = client.search("ny").await.expect("short query should succeed");
    assert!(results.is_empty());
}

#[tokio::test]
async fn three_char_query_issues_one_geocoding_call() {
    let server = MockServer::start().await;

    let body = serde_json::json!([
        { "name": "Newark", "lat": 40.7357, "lon": -74.1724, "country": "US" },
        { "name": "Newcastle", "lat": 54.9783, "lon": -1.6178, "country": "GB" }
    ]);

    Mock::given(method("GET"))
        .and(path("/direct"))
        .and(query_param("q", "new"))
        .and(query_param("limit", "5"))
        .and(query_param("appid", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let results = client.search("new").await.expect("should geocode");

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].name, "Newark");
    assert_eq!(results[0].id, "40.7357--74.1724");
    assert_eq!(results[1].country, "GB");
}

#[tokio::test]
async fn search_maps_401_to_invalid_api_key() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/direct"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.search("london").await.unwrap_err();
    assert!(matches!(err, ProviderError::InvalidApiKey));
}

#[tokio::test]
async fn fetch_maps_status_to_error_kinds() {
    for (status, check) in [
        (404, ProviderError::LocationNotFound),
        (500, ProviderError::ServiceUnavailable),
        (503, ProviderError::ServiceUnavailable),
    ] {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.fetch_weather(40.0, -74.0).await.unwrap_err();
        assert_eq!(
            std::mem::discriminant(&err),
            std::mem::discriminant(&check),
            "status {status} mapped to {err:?}"
        );
    }
}

#[tokio::test]
async fn fetch_maps_other_status_to_upstream() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(418))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.fetch_weather(40.0, -74.0).await.unwrap_err();
    assert!(matches!(err, ProviderError::Upstream { status: 418 }));
}

#[tokio::test]
async fn fetch_fails_when_either_request_fails() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.fetch_weather(40.7128, -74.006).await.unwrap_err();
    assert!(matches!(err, ProviderError::LocationNotFound));
}

#[tokio::test]
async fn fetch_builds_aggregated_snapshot() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("units", "imperial"))
        .and(query_param("appid", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("units", "imperial"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let snapshot = client.fetch_weather(40.7128, -74.006).await.unwrap();

    // current conditions, converted once at the boundary
    assert_eq!(snapshot.current.temperature, 72);
    assert_eq!(snapshot.current.feels_like, 69);
    assert_eq!(snapshot.current.visibility, 6); // 10000 m -> miles, rounded
    assert_eq!(snapshot.current.location.id, "40.7128--74.006");
    assert_eq!(snapshot.current.location.name, "New York");
    assert_eq!(snapshot.current.sunrise, 1_700_000_000);

    // day one: range aggregated, conditions from the first sample
    assert_eq!(snapshot.daily.len(), 2);
    assert_eq!(snapshot.daily[0].high, 85);
    assert_eq!(snapshot.daily[0].low, 60);
    assert_eq!(snapshot.daily[0].description, "light rain");
    assert_eq!(snapshot.daily[0].precipitation_chance, 20);

    // day two: absent pop reads as zero
    assert_eq!(snapshot.daily[1].precipitation_chance, 0);

    // hourly window is the first 8 of 10 samples, in input order
    assert_eq!(snapshot.hourly.len(), 8);
    assert_eq!(snapshot.hourly[0].time, 1_699_952_400);
    assert_eq!(snapshot.hourly[0].temperature, 70);
    assert_eq!(snapshot.hourly[1].precipitation_chance, 50);
}
