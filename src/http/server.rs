//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum routers for the weather and input services
//! - Wire up middleware (request ID, request spans with trace-context extraction)
//! - Bind server to listener and stop on the shutdown broadcast

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::enrichment::{weather_handler, EnrichmentState};
use crate::http::request::{make_request_span, UuidRequestId};
use crate::relay::{relay_handler, RelayState};

/// Router for the weather service: `GET /weather`.
pub fn enrichment_router(state: EnrichmentState) -> Router {
    with_middleware(Router::new().route("/weather", get(weather_handler)).with_state(state))
}

/// Router for the input service: `POST /`.
pub fn relay_router(state: RelayState) -> Router {
    with_middleware(Router::new().route("/", post(relay_handler)).with_state(state))
}

/// Outermost first: request ID, then the root request span, then ID echo on the response.
fn with_middleware(router: Router) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
            .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
            .layer(PropagateRequestIdLayer::x_request_id()),
    )
}

/// HTTP server for either service.
pub struct HttpServer {
    name: &'static str,
    router: Router,
}

impl HttpServer {
    pub fn new(name: &'static str, router: Router) -> Self {
        Self { name, router }
    }

    /// Run the server, accepting connections on the given listener until shutdown.
    pub async fn run(self, listener: TcpListener, mut shutdown: broadcast::Receiver<()>) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(service = self.name, address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                // A closed channel means the coordinator is gone; stop as well.
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!(service = self.name, "HTTP server stopped");
        Ok(())
    }
}
