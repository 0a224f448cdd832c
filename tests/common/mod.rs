//! Shared utilities for integration testing.
#![allow(dead_code)]

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use std::collections::HashMap;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

use cep_weather::enrichment::{EnrichmentState, LocalityResolver, WeatherLookup};
use cep_weather::http::{enrichment_router, relay_router, HttpServer};
use cep_weather::relay::{EnrichmentClient, RelayState};
use cep_weather::Shutdown;

pub const WEATHER_API_KEY: &str = "test-key";

/// Client that never goes through an environment proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// Serve `router` on an ephemeral localhost port.
pub async fn spawn_router(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}

/// Call counter shared with a mock.
#[derive(Clone, Default)]
pub struct Hits(Arc<AtomicUsize>);

impl Hits {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

async fn viacep(State(hits): State<Hits>, Path(cep): Path<String>) -> impl IntoResponse {
    hits.hit();
    match cep.as_str() {
        "89053300" => (StatusCode::OK, r#"{"localidade": "Blumenau"}"#),
        "01001000" => (StatusCode::OK, r#"{"localidade": "São Paulo", "uf": "SP"}"#),
        "00000000" => (StatusCode::OK, r#"{"erro": "true"}"#),
        "99999999" => (StatusCode::OK, r#"{"erro": true}"#),
        "89053301" => (StatusCode::OK, r#"{"localidade": "UnknownCity"}"#),
        "11111111" => (StatusCode::OK, "<html>maintenance</html>"),
        _ => (StatusCode::NOT_FOUND, r#"{"erro": "true"}"#),
    }
}

/// Mock ViaCEP: `GET /ws/{cep}/json/`.
pub async fn start_viacep() -> (SocketAddr, Hits) {
    let hits = Hits::default();
    let router = Router::new()
        .route("/ws/{cep}/json/", get(viacep))
        .with_state(hits.clone());
    (spawn_router(router).await, hits)
}

async fn weather_api(State(hits): State<Hits>, Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
    hits.hit();
    if params.get("key").map(String::as_str) != Some(WEATHER_API_KEY) {
        return (StatusCode::FORBIDDEN, r#"{"error":{"code":2008,"message":"API key is invalid."}}"#);
    }
    match params.get("q").map(String::as_str) {
        Some("Blumenau") => (StatusCode::OK, r#"{"current": {"temp_c": 17.1}}"#),
        Some("São Paulo") => (StatusCode::OK, r#"{"location":{"name":"Sao Paulo"},"current": {"temp_c": 25.0}}"#),
        _ => (
            StatusCode::BAD_REQUEST,
            r#"{"error": {"code": 1006, "message": "No matching location found."}}"#,
        ),
    }
}

/// Mock WeatherAPI: `GET /current.json?key=&q=`.
pub async fn start_weather_api() -> (SocketAddr, Hits) {
    let hits = Hits::default();
    let router = Router::new()
        .route("/current.json", get(weather_api))
        .with_state(hits.clone());
    (spawn_router(router).await, hits)
}

/// Run a service router through `HttpServer` on an ephemeral port.
pub async fn start_service(name: &'static str, router: Router) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server = HttpServer::new(name, router);
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });
    (addr, shutdown)
}

/// Weather service wired to the given collaborators.
pub async fn start_weather_service(viacep: SocketAddr, weather: SocketAddr) -> (SocketAddr, Shutdown) {
    let client = client();
    let state = EnrichmentState::new(
        LocalityResolver::new(client.clone(), format!("http://{}", viacep)),
        WeatherLookup::new(client, format!("http://{}", weather), WEATHER_API_KEY),
    );
    start_service("weather-api", enrichment_router(state)).await
}

/// Input service relaying to `downstream_url`.
pub async fn start_input_service(downstream_url: String) -> (SocketAddr, Shutdown) {
    let state = RelayState::new(EnrichmentClient::new(client(), downstream_url));
    start_service("weather-input", relay_router(state)).await
}

/// What a programmable downstream saw on its last request.
#[derive(Clone, Default)]
pub struct Captured {
    pub hits: Hits,
    pub query: Arc<Mutex<Option<HashMap<String, String>>>>,
    pub headers: Arc<Mutex<Option<HeaderMap>>>,
}

/// Canned downstream answer: status, headers, body.
pub type Reply = (StatusCode, Vec<(&'static str, &'static str)>, Bytes);

pub fn reply(status: StatusCode, headers: &[(&'static str, &'static str)], body: &'static [u8]) -> Reply {
    (status, headers.to_vec(), Bytes::from_static(body))
}

/// Start a downstream at `GET /weather` whose answer comes from `f`.
pub async fn start_programmable_downstream<F, Fut>(f: F) -> (SocketAddr, Captured)
where
    F: Fn() -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Reply> + Send + 'static,
{
    let captured = Captured::default();
    let state = captured.clone();
    let router = Router::new().route(
        "/weather",
        get(move |Query(query): Query<HashMap<String, String>>, headers: HeaderMap| {
            let f = f.clone();
            let state = state.clone();
            async move {
                state.hits.hit();
                *state.query.lock().unwrap() = Some(query);
                *state.headers.lock().unwrap() = Some(headers);
                let (status, headers, body) = f().await;
                let mut response = (status, body).into_response();
                response.headers_mut().remove("content-type");
                for (name, value) in headers {
                    response.headers_mut().insert(name, value.parse().unwrap());
                }
                response
            }
        }),
    );
    (spawn_router(router).await, captured)
}
