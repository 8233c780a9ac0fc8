use crate::domain::HandlerResponse;
use crate::service::ImageData;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::collections::BTreeMap;
use tracing::instrument;

const CONTENT_TYPE_HEADER_NAME: &str = "Content-Type";
// Always jpeg, whatever content type the object was stored with.
const CONTENT_TYPE_HEADER_VALUE: &str = "image/jpeg";
const SERVER_TIMING_HEADER_NAME: &str = "Server-Timing";

#[instrument(skip_all, fields(key = %data.stored.key))]
pub fn transform(data: ImageData) -> HandlerResponse {
    let mut headers = BTreeMap::from([(
        CONTENT_TYPE_HEADER_NAME.to_string(),
        CONTENT_TYPE_HEADER_VALUE.to_string(),
    )]);
    if !data.server_timing.is_empty() {
        headers.insert(
            SERVER_TIMING_HEADER_NAME.to_string(),
            data.server_timing.to_string(),
        );
    }

    HandlerResponse {
        status_code: 200,
        headers,
        body: STANDARD.encode(&data.body),
        is_base64_encoded: true,
    }
}
