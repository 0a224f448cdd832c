//! OpenTelemetry tracing initialization.
//!
//! Installs the global propagator, builds the tracer provider and wires the
//! `tracing` subscriber (filter + fmt + OpenTelemetry layer).

use opentelemetry::propagation::TextMapCompositePropagator;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::{global, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::propagation::{BaggagePropagator, TraceContextPropagator};
use opentelemetry_sdk::trace::SdkTracerProvider;
use opentelemetry_sdk::Resource;
use std::fmt::Display;
use thiserror::Error;
use tracing::Span;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ObservabilityConfig;
use crate::observability::logging;

/// Errors raised while setting up telemetry.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("failed to build OTLP exporter: {0}")]
    Exporter(#[from] opentelemetry_otlp::ExporterBuildError),

    #[error("failed to install tracing subscriber: {0}")]
    Subscriber(#[from] tracing_subscriber::util::TryInitError),
}

/// Keeps the tracer provider alive and flushes it on shutdown.
pub struct TelemetryGuard {
    provider: SdkTracerProvider,
}

impl TelemetryGuard {
    /// Flush pending spans and stop the exporter.
    pub fn shutdown(self) {
        if let Err(e) = self.provider.shutdown() {
            tracing::warn!(error = %e, "Tracer provider shutdown failed");
        }
    }
}

/// W3C trace-context plus baggage.
pub fn composite_propagator() -> TextMapCompositePropagator {
    TextMapCompositePropagator::new(vec![
        Box::new(TraceContextPropagator::new()),
        Box::new(BaggagePropagator::new()),
    ])
}

/// Build the tracer provider. Without OTLP export the provider still samples,
/// so span contexts are valid and can be propagated downstream.
pub fn build_tracer_provider(cfg: &ObservabilityConfig) -> Result<SdkTracerProvider, TelemetryError> {
    let resource = Resource::builder_empty()
        .with_attributes([KeyValue::new("service.name", cfg.service_name.clone())])
        .build();

    let mut builder = SdkTracerProvider::builder().with_resource(resource);

    if cfg.otlp_enabled {
        let exporter = opentelemetry_otlp::SpanExporter::builder()
            .with_tonic()
            .with_endpoint(cfg.otlp_endpoint.clone())
            .build()?;
        builder = builder.with_batch_exporter(exporter);
    }

    Ok(builder.build())
}

/// Initialize logging and distributed tracing for the process.
///
/// Must be called from within a Tokio runtime when OTLP export is enabled.
pub fn init_telemetry(cfg: &ObservabilityConfig) -> Result<TelemetryGuard, TelemetryError> {
    global::set_text_map_propagator(composite_propagator());

    let provider = build_tracer_provider(cfg)?;
    let tracer = provider.tracer(cfg.service_name.clone());
    global::set_tracer_provider(provider.clone());

    tracing_subscriber::registry()
        .with(logging::env_filter(&cfg.log_level))
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_opentelemetry::layer().with_tracer(tracer))
        .try_init()?;

    tracing::info!(
        service = %cfg.service_name,
        otlp_enabled = cfg.otlp_enabled,
        otlp_endpoint = %cfg.otlp_endpoint,
        "Telemetry initialized"
    );

    Ok(TelemetryGuard { provider })
}

/// Mark a span as failed and attach the error as a span event.
///
/// The span must declare `otel.status_code` and `otel.status_message` fields.
/// The message must be recorded as a plain string to reach the exported status.
pub fn record_error(span: &Span, error: &dyn Display) {
    let message = error.to_string();
    tracing::error!(parent: span, error = %message, "operation failed");
    span.record("otel.status_code", "ERROR");
    span.record("otel.status_message", message.as_str());
}

/// Run `f` under a subscriber that exports spans to memory.
#[cfg(test)]
pub(crate) fn with_test_tracer<F: FnOnce()>(f: F) -> opentelemetry_sdk::trace::InMemorySpanExporter {
    global::set_text_map_propagator(composite_propagator());
    let exporter = opentelemetry_sdk::trace::InMemorySpanExporter::default();
    let provider = SdkTracerProvider::builder()
        .with_simple_exporter(exporter.clone())
        .build();
    let subscriber =
        tracing_subscriber::registry().with(tracing_opentelemetry::layer().with_tracer(provider.tracer("test")));
    tracing::subscriber::with_default(subscriber, f);
    exporter
}
