//! Outbound call from the input service to the weather service.

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use reqwest::Client;
use std::sync::Arc;
use tracing::{field::Empty, Instrument};

use crate::observability::{inject_context, metrics, record_error};

/// Weather service response, kept byte-for-byte.
#[derive(Debug, Clone)]
pub struct DownstreamResponse {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

impl IntoResponse for DownstreamResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        if let Some(content_type) = self.content_type {
            response.headers_mut().insert(header::CONTENT_TYPE, content_type);
        }
        response
    }
}

/// HTTP client for the weather service.
#[derive(Debug, Clone)]
pub struct EnrichmentClient {
    client: Client,
    downstream_url: Arc<str>,
}

impl EnrichmentClient {
    pub fn new(client: Client, downstream_url: impl Into<Arc<str>>) -> Self {
        Self {
            client,
            downstream_url: downstream_url.into(),
        }
    }

    pub fn downstream_url(&self) -> &str {
        &self.downstream_url
    }

    /// GET `{downstream_url}?cep=...` with the call span's trace context in the headers.
    pub async fn forward(&self, cep: &str) -> Result<DownstreamResponse, reqwest::Error> {
        let span = tracing::info_span!(
            "call downstream enrichment service",
            cep = %cep,
            http.status_code = Empty,
            otel.kind = "client",
            otel.status_code = Empty,
            otel.status_message = Empty
        );

        let mut headers = HeaderMap::new();
        inject_context(&span, &mut headers);

        let result = self.send(cep, headers).instrument(span.clone()).await;

        match &result {
            Ok(downstream) => {
                span.record("http.status_code", downstream.status.as_u16());
                metrics::record_collaborator_call("weather-api", "ok");
            }
            Err(e) => {
                record_error(&span, e);
                metrics::record_collaborator_call("weather-api", "transport");
            }
        }
        result
    }

    async fn send(&self, cep: &str, headers: HeaderMap) -> Result<DownstreamResponse, reqwest::Error> {
        let response = self
            .client
            .get(&*self.downstream_url)
            .query(&[("cep", cep)])
            .headers(headers)
            .send()
            .await?;

        let status = response.status();
        let content_type = response.headers().get(header::CONTENT_TYPE).cloned();
        let body = response.bytes().await?;

        tracing::debug!(status = %status, bytes = body.len(), "Weather service responded");

        Ok(DownstreamResponse {
            status,
            content_type,
            body,
        })
    }
}
