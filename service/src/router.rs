use crate::client::ImageSource;
use crate::config::Config;
use crate::domain::error::HandlerError;
use crate::domain::HandlerResponse;
use crate::observability::propagators::LambdaContextExtractor;
use crate::observability::{step_span, traced, Telemetry};
use crate::repository::ObjectStore;
use crate::response_handler::transform;
use crate::service::process_dog;
use lambda_runtime::{Error, LambdaEvent};
use opentelemetry::Context;
use serde_json::Value;
use tracing_opentelemetry::OpenTelemetrySpanExt;

/// Everything an invocation needs, built once at cold start.
pub struct Handler<S, O> {
    config: Config,
    source: S,
    store: O,
    telemetry: Option<Telemetry>,
}

impl<S, O> Handler<S, O>
where
    S: ImageSource,
    O: ObjectStore,
{
    pub fn new(config: Config, source: S, store: O, telemetry: Option<Telemetry>) -> Self {
        Handler {
            config,
            source,
            store,
            telemetry,
        }
    }

    /// The Function URL event body is not inspected; only the invocation
    /// context feeds the trace.
    pub async fn handle(&self, event: LambdaEvent<Value>) -> Result<HandlerResponse, Error> {
        let (_payload, context) = event.into_parts();

        let parent: Context = opentelemetry::global::get_text_map_propagator(|propagator| {
            propagator.extract(&LambdaContextExtractor(&context))
        });
        let span = step_span!("handler", request_id = %context.request_id);
        span.set_parent(parent);

        let result = traced(span, async {
            let data = process_dog(&self.config, &self.source, &self.store).await?;
            Ok::<_, HandlerError>(transform(data))
        })
        .await;

        if let Some(telemetry) = &self.telemetry {
            telemetry.flush();
        }
        Ok(result?)
    }
}
