//! OpenWeather adapter against a mock HTTP server.

use std::{sync::Arc, time::Duration};

use weatherly_core::{
    Coordinates, PlaceLookup, SuggestionEngine, WeatherError, WeatherSource,
    provider::openweather::OpenWeatherClient,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn current_response() -> serde_json::Value {
    serde_json::json!({
        "coord": { "lon": -0.1257, "lat": 51.5085 },
        "weather": [{ "id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d" }],
        "base": "stations",
        "main": {
            "temp": 17.0, "feels_like": 16.2, "temp_min": 15.0, "temp_max": 19.0,
            "pressure": 1013, "humidity": 75
        },
        "visibility": 10000,
        "wind": { "speed": 3.5, "deg": 240 },
        "clouds": { "all": 75 },
        "dt": 1703097600,
        "sys": { "country": "GB", "sunrise": 1703061600, "sunset": 1703091200 },
        "timezone": 0,
        "id": 2643743,
        "name": "London",
        "cod": 200
    })
}

fn forecast_entry(dt: i64, temp: f64, pop: f64) -> serde_json::Value {
    serde_json::json!({
        "dt": dt,
        "main": {
            "temp": temp, "feels_like": temp - 0.8, "temp_min": temp - 2.0, "temp_max": temp + 2.0,
            "pressure": 1013, "sea_level": 1013, "grnd_level": 1009, "humidity": 75, "temp_kf": 0
        },
        "weather": [{ "id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d" }],
        "clouds": { "all": 75 },
        "wind": { "speed": 3.5, "deg": 240, "gust": 5.2 },
        "visibility": 10000,
        "pop": pop,
        "sys": { "pod": "d" }
    })
}

fn client(server: &MockServer) -> OpenWeatherClient {
    OpenWeatherClient::new("TEST_KEY", &server.uri(), Duration::from_secs(5))
        .expect("Failed to create client")
}

#[tokio::test]
async fn current_by_city_maps_the_observation() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "London"))
        .and(query_param("appid", "TEST_KEY"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_response()))
        .expect(1)
        .mount(&server)
        .await;

    let snapshot = client(&server).current_by_city("London").await.unwrap();

    assert_eq!(snapshot.place_name, "London");
    assert_eq!(snapshot.country, "GB");
    assert_eq!(snapshot.temperature_c, 17.0);
    assert_eq!(snapshot.humidity_pct, 75);
    assert_eq!(snapshot.condition_icon, "04d");
    assert_eq!(snapshot.wind_deg, 240);
    assert_eq!(snapshot.visibility_m, Some(10_000));
    assert_eq!(snapshot.observation_time.timestamp(), 1_703_097_600);
}

#[tokio::test]
async fn unknown_city_is_reported_as_not_found() {
    let server = MockServer::start().await;
    let not_found = serde_json::json!({ "cod": "404", "message": "city not found" });
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(404).set_body_json(not_found))
        .mount(&server)
        .await;

    let err = client(&server)
        .current_by_city("Atlantis")
        .await
        .unwrap_err();

    assert_eq!(err, WeatherError::NotFound("Atlantis".into()));
}

#[tokio::test]
async fn server_errors_are_transport_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client(&server)
        .forecast_by_city("London")
        .await
        .unwrap_err();

    match err {
        WeatherError::Transport(msg) => {
            assert!(msg.contains("500"));
            assert!(msg.contains("boom"));
        }
        other => panic!("expected transport failure, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_a_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{ not json"))
        .mount(&server)
        .await;

    let err = client(&server).current_by_city("London").await.unwrap_err();

    assert!(matches!(err, WeatherError::Parse(_)));
}

#[tokio::test]
async fn forecast_by_coords_returns_time_ordered_samples() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .and(query_param("lat", "51.5085"))
        .and(query_param("lon", "-0.1257"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "cod": "200",
            "message": 0,
            "cnt": 3,
            "list": [
                forecast_entry(1703108400, 16.0, 0.1),
                forecast_entry(1703097600, 17.0, 0.2),
                forecast_entry(1703119200, 15.0, 0.05)
            ],
            "city": { "id": 2643743, "name": "London", "country": "GB" }
        })))
        .mount(&server)
        .await;

    let samples = client(&server)
        .forecast_by_coords(Coordinates::new(51.5085, -0.1257))
        .await
        .unwrap();

    let times: Vec<i64> = samples.iter().map(|s| s.epoch_seconds).collect();
    assert_eq!(times, vec![1703097600, 1703108400, 1703119200]);
    assert_eq!(samples[0].precipitation_probability, 0.2);
    assert_eq!(samples[0].max_c, 19.0);
}

#[tokio::test]
async fn geocoding_overfetches_and_converts_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .and(query_param("q", "Lon"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {
                "name": "London", "lat": 51.5073, "lon": -0.1276,
                "country": "GB", "state": "England"
            },
            {
                "name": "London", "lat": 42.9834, "lon": -81.233,
                "country": "CA", "state": "Ontario"
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let places = client(&server).lookup("Lon", 5).await.unwrap();

    assert_eq!(places.len(), 2);
    assert_eq!(places[0].region.as_deref(), Some("England"));
    assert_eq!(places[1].country, "CA");
}

#[tokio::test]
async fn engine_ranks_and_dedups_remote_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "name": "East London", "lat": -33.0153, "lon": 27.9116, "country": "ZA" },
            {
                "name": "London", "lat": 51.5073, "lon": -0.1276,
                "country": "GB", "state": "England"
            },
            {
                "name": "London", "lat": 51.5085, "lon": -0.1257,
                "country": "GB", "state": "England"
            },
            { "name": "Londres", "lat": 48.85, "lon": 2.35, "country": "FR" }
        ])))
        .mount(&server)
        .await;

    let engine = SuggestionEngine::new(Arc::new(client(&server)));

    let outcome = engine.suggest("london", 5).await;

    let names: Vec<_> = outcome.places().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["London", "East London"]);
    assert_eq!(outcome.places()[0].latitude, 51.5073);
}

#[tokio::test]
async fn failed_geocoding_yields_failed_outcome() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let engine = SuggestionEngine::new(Arc::new(client(&server)));

    let outcome = engine.suggest("Paris", 5).await;

    assert!(outcome.is_failed());
    assert!(outcome.places().is_empty());
}
