//! Trace context propagation over HTTP headers.
//!
//! # Responsibilities
//! - Inject the current span's context into outbound request headers
//! - Parent inbound request spans on the caller's context
//! - Record trace IDs on spans for log correlation
//!
//! # Design Decisions
//! - Uses the global propagator (trace-context + baggage, set in telemetry.rs)
//! - Invalid header names or values are skipped, never fatal

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use opentelemetry::global;
use opentelemetry::propagation::{Extractor, Injector};
use tracing::Span;
use tracing_opentelemetry::OpenTelemetrySpanExt;

/// W3C Trace Context header name
pub const TRACEPARENT: &str = "traceparent";

struct HeadersExtractor<'a>(&'a HeaderMap);

impl Extractor for HeadersExtractor<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(|k| k.as_str()).collect()
    }
}

struct HeadersInjector<'a>(&'a mut HeaderMap);

impl Injector for HeadersInjector<'_> {
    fn set(&mut self, key: &str, value: String) {
        if let (Ok(name), Ok(val)) = (HeaderName::from_bytes(key.as_bytes()), HeaderValue::from_str(&value)) {
            self.0.insert(name, val);
        }
    }
}

/// Extract traceparent header value from HTTP headers
pub fn get_traceparent(headers: &HeaderMap) -> Option<&str> {
    headers.get(TRACEPARENT)?.to_str().ok()
}

/// Parse trace ID from a traceparent value ("00-{trace_id}-{span_id}-{flags}")
pub fn parse_trace_id(traceparent: &str) -> Option<String> {
    let parts: Vec<&str> = traceparent.split('-').collect();
    if parts.len() >= 4 && parts[0] == "00" {
        Some(parts[1].to_string())
    } else {
        None
    }
}

/// Serialize `span`'s context into `headers`.
pub fn inject_context(span: &Span, headers: &mut HeaderMap) {
    let cx = span.context();
    global::get_text_map_propagator(|propagator| {
        propagator.inject_context(&cx, &mut HeadersInjector(headers));
    });
}

/// Make `span` a child of the remote context carried by `headers`.
///
/// Call before the span is entered. Records `trace_id` when the span declares it.
pub fn set_parent_from_headers(span: &Span, headers: &HeaderMap) {
    let parent_cx = global::get_text_map_propagator(|propagator| propagator.extract(&HeadersExtractor(headers)));
    let _ = span.set_parent(parent_cx);

    if let Some(trace_id) = get_traceparent(headers).and_then(parse_trace_id) {
        span.record("trace_id", trace_id.as_str());
    }
}
