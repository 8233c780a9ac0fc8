use lambda_runtime::Context;
use opentelemetry::propagation::Extractor;

const XRAY_TRACE_HEADER: &str = "x-amzn-trace-id";

/// Exposes the invocation's X-Ray trace header to OpenTelemetry propagators.
pub struct LambdaContextExtractor<'a>(pub &'a Context);

impl<'a> Extractor for LambdaContextExtractor<'a> {
    fn get(&self, key: &str) -> Option<&str> {
        if key.eq_ignore_ascii_case(XRAY_TRACE_HEADER) {
            self.0.xray_trace_id.as_deref()
        } else {
            None
        }
    }

    fn keys(&self) -> Vec<&str> {
        match self.0.xray_trace_id {
            Some(_) => vec![XRAY_TRACE_HEADER],
            None => vec![],
        }
    }
}
