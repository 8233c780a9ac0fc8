use crate::domain::error::HandlerError;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_aws::trace::{XrayIdGenerator, XrayPropagator};
use opentelemetry_sdk::trace::{Config, TracerProvider};
use std::future::Future;
use std::time::Instant;
use tracing::field::display;
use tracing::{error, warn, Instrument, Span};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

pub mod propagators;

/// Span for one traced handler step, with the status fields `traced` fills in.
macro_rules! step_span {
    ($name:literal $(, $($field:tt)+)?) => {
        tracing::info_span!(
            $name,
            $($($field)+,)?
            otel.status_code = tracing::field::Empty,
            otel.status_message = tracing::field::Empty,
            elapsed_ms = tracing::field::Empty
        )
    };
}
pub(crate) use step_span;

/// Keeps the tracer provider alive and lets the handler flush spans before
/// the sandbox is frozen between invocations.
#[derive(Debug, Clone)]
pub struct Telemetry {
    provider: TracerProvider,
}

impl Telemetry {
    pub fn flush(&self) {
        for result in self.provider.force_flush() {
            if let Err(e) = result {
                warn!("Span flush failed: {e}");
            }
        }
    }
}

/// JSON logs filtered by `RUST_LOG`, plus an OpenTelemetry layer using X-Ray
/// ids and X-Ray header propagation.
pub fn telemetry_setup(service_name: &'static str) -> anyhow::Result<Telemetry> {
    opentelemetry::global::set_text_map_propagator(XrayPropagator::default());

    let provider = TracerProvider::builder()
        .with_simple_exporter(opentelemetry_stdout::SpanExporter::default())
        .with_config(Config::default().with_id_generator(XrayIdGenerator::default()))
        .build();
    let tracer = provider.tracer(service_name);
    opentelemetry::global::set_tracer_provider(provider.clone());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_ansi(false)
                .with_current_span(false)
                .with_target(false),
        )
        .with(tracing_opentelemetry::layer().with_tracer(tracer))
        .try_init()?;

    Ok(Telemetry { provider })
}

/// Run `step` inside `span`, recording its duration and outcome on the span.
/// The result is handed back untouched.
pub async fn traced<T, F>(span: Span, step: F) -> Result<T, HandlerError>
where
    F: Future<Output = Result<T, HandlerError>>,
{
    let started = Instant::now();
    let result = step.instrument(span.clone()).await;

    span.record("elapsed_ms", started.elapsed().as_millis() as u64);
    match &result {
        Ok(_) => {
            span.record("otel.status_code", "OK");
        }
        Err(e) => {
            span.record("otel.status_code", "ERROR");
            span.record("otel.status_message", display(e));
            error!(parent: &span, kind = e.kind(), "{e}");
        }
    }
    result
}
