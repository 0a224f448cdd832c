//! End-to-end tests for the weather service against mock collaborators.

use axum::http::StatusCode;
use serde_json::{json, Value};

use cep_weather::http::ErrorResponse;

mod common;

struct Harness {
    url: String,
    viacep: common::Hits,
    weather: common::Hits,
    _shutdown: cep_weather::Shutdown,
}

async fn harness() -> Harness {
    let (viacep_addr, viacep) = common::start_viacep().await;
    let (weather_addr, weather) = common::start_weather_api().await;
    let (addr, shutdown) = common::start_weather_service(viacep_addr, weather_addr).await;
    Harness {
        url: format!("http://{}/weather", addr),
        viacep,
        weather,
        _shutdown: shutdown,
    }
}

async fn get(h: &Harness, cep: &str) -> (StatusCode, String) {
    let res = common::client()
        .get(&h.url)
        .query(&[("cep", cep)])
        .send()
        .await
        .expect("weather service unreachable");
    let status = res.status();
    (status, res.text().await.unwrap())
}

fn error_of(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body).unwrap().error
}

#[tokio::test]
async fn test_valid_cep_returns_all_scales() {
    let h = harness().await;
    let (status, body) = get(&h, "89053300").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"temp_C":17.1,"temp_F":62.78,"temp_K":290.1}"#);
    assert_eq!(h.viacep.count(), 1);
    assert_eq!(h.weather.count(), 1);
}

#[tokio::test]
async fn test_success_is_json() {
    let h = harness().await;
    let res = common::client()
        .get(format!("{}?cep=89053300", h.url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["content-type"], "application/json");
    assert!(res.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let h = harness().await;
    let res = common::client()
        .get(format!("{}?cep=89053300", h.url))
        .header("x-request-id", "req-123")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["x-request-id"], "req-123");
}

#[tokio::test]
async fn test_invalid_format_skips_collaborators() {
    let h = harness().await;
    for cep in ["1234567", "123456789", "abcdefgh", "89053-300", "123-456 78"] {
        let (status, body) = get(&h, cep).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{cep}");
        assert_eq!(error_of(&body), "invalid zipcode");
    }
    assert_eq!(h.viacep.count(), 0);
    assert_eq!(h.weather.count(), 0);
}

#[tokio::test]
async fn test_missing_cep_param() {
    let h = harness().await;
    let res = common::client().get(&h.url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({"error": "invalid zipcode"}));
}

#[tokio::test]
async fn test_resolver_error_flag() {
    let h = harness().await;
    for cep in ["00000000", "99999999"] {
        let (status, body) = get(&h, cep).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{cep}");
        assert_eq!(body, r#"{"error":"can not find zipcode"}"#);
    }
    assert_eq!(h.weather.count(), 0);
}

#[tokio::test]
async fn test_resolver_failures_collapse_to_not_found() {
    let h = harness().await;
    // 12345678 → 404 upstream; 11111111 → undecodable body.
    for cep in ["12345678", "11111111"] {
        let (status, body) = get(&h, cep).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{cep}");
        assert_eq!(error_of(&body), "can not find zipcode");
    }
    assert_eq!(h.weather.count(), 0);
}

#[tokio::test]
async fn test_unknown_locality() {
    let h = harness().await;
    let (status, body) = get(&h, "89053301").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_of(&body), "can not find weather for this location");
    // The upstream error body is not relayed.
    assert!(!body.contains("1006"));
}

#[tokio::test]
async fn test_locality_is_percent_encoded() {
    let h = harness().await;
    let (status, body) = get(&h, "01001000").await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body, json!({"temp_C": 25.0, "temp_F": 77.0, "temp_K": 298.0}));
}

#[tokio::test]
async fn test_unreachable_resolver() {
    let (weather_addr, weather) = common::start_weather_api().await;
    let closed: std::net::SocketAddr = "127.0.0.1:9".parse().unwrap();
    let (addr, _shutdown) = common::start_weather_service(closed, weather_addr).await;

    let res = common::client()
        .get(format!("http://{}/weather?cep=89053300", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.text().await.unwrap(), r#"{"error":"can not find zipcode"}"#);
    assert_eq!(weather.count(), 0);
}

#[tokio::test]
async fn test_unreachable_weather_api() {
    let (viacep_addr, _viacep) = common::start_viacep().await;
    let closed: std::net::SocketAddr = "127.0.0.1:9".parse().unwrap();
    let (addr, _shutdown) = common::start_weather_service(viacep_addr, closed).await;

    let res = common::client()
        .get(format!("http://{}/weather?cep=89053300", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.text().await.unwrap(), r#"{"error":"can not find weather for this location"}"#);
}

#[tokio::test]
async fn test_wrong_method() {
    let h = harness().await;
    let res = common::client().post(&h.url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_concurrent_requests() {
    let h = harness().await;
    let client = common::client();
    let mut tasks = Vec::new();
    for i in 0..16 {
        let client = client.clone();
        let url = h.url.clone();
        let cep = if i % 2 == 0 { "89053300" } else { "00000000" };
        tasks.push(tokio::spawn(async move {
            let res = client.get(&url).query(&[("cep", cep)]).send().await.unwrap();
            (cep, res.status())
        }));
    }
    for task in tasks {
        let (cep, status) = task.await.unwrap();
        let expected = if cep == "89053300" { StatusCode::OK } else { StatusCode::NOT_FOUND };
        assert_eq!(status, expected);
    }
    assert_eq!(h.viacep.count(), 16);
    assert_eq!(h.weather.count(), 8);
}

#[tokio::test]
async fn test_shutdown_stops_server() {
    let (viacep_addr, _) = common::start_viacep().await;
    let (weather_addr, _) = common::start_weather_api().await;
    let (addr, shutdown) = common::start_weather_service(viacep_addr, weather_addr).await;

    shutdown.trigger();
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;

    let res = common::client()
        .get(format!("http://{}/weather?cep=89053300", addr))
        .send()
        .await;
    assert!(res.is_err(), "server should refuse connections after shutdown");
}
