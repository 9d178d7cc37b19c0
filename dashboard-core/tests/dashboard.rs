//! End-to-end dashboard flows against a mock OpenWeather server.

use dashboard_core::{
    Config, Coordinates, DashboardController, DeviceConfig, GeolocationError, Phase, ThemeId,
    map_theme, state::LOCATION_ZOOM,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn current_body(name: &str, country: &str, main: &str, lat: f64, lon: f64) -> serde_json::Value {
    serde_json::json!({
        "coord": {"lon": lon, "lat": lat},
        "weather": [{"id": 500, "main": main, "description": "weather", "icon": "10d"}],
        "main": {"temp": 14.04, "humidity": 77},
        "wind": {"speed": 5.14},
        "dt": 1_700_000_000,
        "sys": {"country": country},
        "name": name
    })
}

fn forecast_body(n: usize) -> serde_json::Value {
    let list: Vec<_> = (0..n)
        .map(|i| {
            serde_json::json!({
                "dt": 1_700_000_000 + i as i64 * 10_800,
                "main": {"temp": 12.0},
                "weather": [{"main": "Rain", "description": "light rain", "icon": "10n"}]
            })
        })
        .collect();

    serde_json::json!({"list": list})
}

async fn mount_city(
    server: &MockServer,
    query: &str,
    name: &str,
    country: &str,
    main: &str,
    lat: f64,
    lon: f64,
) {
    let body = current_body(name, country, main, lat, lon);

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", query))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_forecast(server: &MockServer, n: usize) {
    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(n)))
        .mount(server)
        .await;
}

fn controller(server: &MockServer, device: DeviceConfig) -> DashboardController {
    let config = Config {
        api_key: Some("TEST_KEY".to_string()),
        api_base: Some(server.uri()),
        device,
        ..Config::default()
    };

    DashboardController::from_config(&config).expect("controller should build")
}

#[tokio::test]
async fn searching_paris_loads_the_dashboard() {
    let server = MockServer::start().await;
    mount_city(&server, "Paris", "Paris", "FR", "Rain", 48.8534, 2.3488).await;
    mount_forecast(&server, 40).await;

    let ctrl = controller(&server, DeviceConfig::default());
    ctrl.search_typed("Paris").await;

    let state = ctrl.state();
    assert_eq!(state.phase, Phase::Loaded);

    let snapshot = state.current_snapshot.as_ref().expect("snapshot should be loaded");
    assert_eq!(snapshot.place, "Paris");
    assert!(!state.forecast_window.is_empty());
    assert!(state.forecast_window.len() <= 8);
    assert_eq!(state.map_center, Coordinates { latitude: 48.8534, longitude: 2.3488 });
    assert_eq!(state.theme, map_theme(&snapshot.condition_main));
    assert_eq!(state.theme, ThemeId::Precipitation);
    assert_eq!(state.map_view().zoom, LOCATION_ZOOM);
}

#[tokio::test]
async fn popular_tokyo_never_enters_searching() {
    let server = MockServer::start().await;
    mount_city(&server, "Tokyo,JP", "Tokyo", "JP", "Clear", 35.6895, 139.6917).await;
    mount_forecast(&server, 5).await;

    let ctrl = controller(&server, DeviceConfig::default());
    let tokyo_index = ctrl
        .popular_cities()
        .iter()
        .position(|c| c.label() == "Tokyo, JP")
        .expect("Tokyo is a default popular city");

    let mut rx = ctrl.subscribe();
    let observer = async {
        let mut seen = Vec::new();
        while rx.changed().await.is_ok() {
            let phase = rx.borrow_and_update().phase.clone();
            let settled = matches!(phase, Phase::Loaded | Phase::Error(_));
            seen.push(phase);
            if settled {
                break;
            }
        }
        seen
    };

    let (selected, seen) = tokio::join!(ctrl.select_popular(tokyo_index), observer);

    assert!(selected);
    assert!(!seen.contains(&Phase::Searching), "phases seen: {seen:?}");
    assert_eq!(seen.last(), Some(&Phase::Loaded));

    let state = ctrl.state();
    assert_eq!(state.forecast_window.len(), 5);
    assert_eq!(state.theme, ThemeId::Clear);
    assert_eq!(state.query_text, "Tokyo, JP");
}

#[tokio::test]
async fn denied_geolocation_keeps_previous_snapshot() {
    let server = MockServer::start().await;
    mount_city(&server, "Paris", "Paris", "FR", "Clouds", 48.8534, 2.3488).await;
    mount_forecast(&server, 40).await;

    let device = DeviceConfig {
        latitude: Some(48.85),
        longitude: Some(2.35),
        allow: false,
    };
    let ctrl = controller(&server, device);

    ctrl.search_typed("Paris").await;
    let before = ctrl.state();

    ctrl.use_current_location().await;
    let after = ctrl.state();

    assert_eq!(after.phase, Phase::Error(GeolocationError::Denied.into()));
    assert_eq!(after.current_snapshot, before.current_snapshot);
    assert_eq!(after.forecast_window, before.forecast_window);
    assert_eq!(after.theme, ThemeId::Clouds);
    assert_eq!(after.map_center, before.map_center);
}

#[tokio::test]
async fn suggestions_flow_then_selection() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .and(query_param("q", "Par"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"name": "Paris", "lat": 48.8589, "lon": 2.32, "country": "FR"},
            {"name": "Paris", "lat": 33.6609, "lon": -95.5555, "country": "US"}
        ])))
        .mount(&server)
        .await;
    mount_city(&server, "Paris,US", "Paris", "US", "Thunderstorm", 33.6609, -95.5555).await;
    mount_forecast(&server, 40).await;

    let ctrl = controller(&server, DeviceConfig::default());

    ctrl.edit_query("Par").await;
    let state = ctrl.state();
    assert_eq!(state.phase, Phase::Suggesting);
    assert!(state.suggestions_visible);
    assert_eq!(state.candidates.len(), 2);

    let texan = state.candidates[1].clone();
    ctrl.select_candidate(texan).await;

    let state = ctrl.state();
    assert_eq!(state.phase, Phase::Loaded);
    assert!(!state.suggestions_visible);
    assert_eq!(state.current_snapshot.map(|s| s.country).as_deref(), Some("US"));
    assert_eq!(state.theme, ThemeId::Precipitation);
}

#[tokio::test]
async fn current_location_loads_from_device_position() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("lat", "51.5"))
        .and(query_param("lon", "-0.12"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(current_body("London", "GB", "Haze", 51.5, -0.12)),
        )
        .mount(&server)
        .await;
    mount_forecast(&server, 40).await;

    let device = DeviceConfig {
        latitude: Some(51.5),
        longitude: Some(-0.12),
        allow: true,
    };
    let ctrl = controller(&server, device);

    ctrl.use_current_location().await;

    let state = ctrl.state();
    assert_eq!(state.phase, Phase::Loaded);
    assert_eq!(state.theme, ThemeId::Haze);
    assert_eq!(state.map_center, Coordinates { latitude: 51.5, longitude: -0.12 });
}
