use crate::{client_utils::JsonResponse, PortalError, PortalResult};
use serde_json::Value;
use opentelemetry::trace::Status;
use std::{future::Future, time::Instant};
use tracing::{debug, info_span, Span};
use tracing_futures::Instrument;
use tracing_opentelemetry::OpenTelemetrySpanExt;

pub struct RequestSpan {
    span: Span,
    start_time: Instant,
}

impl RequestSpan {
    pub fn new(method: &'static str, base_url: &str, path: &str) -> Self {
        let span = info_span!("agri_portal.request");
        span.set_attribute("http.request.method", method);
        span.set_attribute("server.address", base_url.to_string());
        span.set_attribute("url.path", path.to_string());

        Self {
            span,
            start_time: Instant::now(),
        }
    }

    fn span(&self) -> Span {
        self.span.clone()
    }

    pub fn on_success(&mut self, response: &JsonResponse) {
        self.span.set_attribute(
            "http.response.status_code",
            i64::from(response.status.as_u16()),
        );
    }

    pub fn on_error(&mut self, error: &PortalError) {
        if let Some(status) = error_status_code(error) {
            self.span
                .set_attribute("http.response.status_code", i64::from(status));
        }
        self.span
            .set_attribute("exception.message", error.to_string());
        self.span.set_status(Status::error(error.to_string()));
    }

    pub fn on_end(&mut self) {
        self.span
            .set_attribute("agri_portal.duration_seconds", self.elapsed_seconds());
    }

    fn elapsed_seconds(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }
}

/// Status code the backend answered with, when the error carries one.
fn error_status_code(error: &PortalError) -> Option<u16> {
    match error {
        PortalError::Unauthorized(_) => Some(401),
        PortalError::StatusCode(status, _) => Some(status.as_u16()),
        _ => None,
    }
}

/// Run a backend request inside an `agri_portal.request` span and return
/// the response body.
pub async fn trace_request<F, Fut>(
    method: &'static str,
    base_url: &str,
    path: &str,
    f: F,
) -> PortalResult<Value>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = PortalResult<JsonResponse>>,
{
    let mut span = RequestSpan::new(method, base_url, path);
    debug!(method, path, "sending portal request");

    let result = f().instrument(span.span()).await;

    match &result {
        Ok(response) => span.on_success(response),
        Err(error) => span.on_error(error),
    }

    span.on_end();
    result.map(|response| response.body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn trace_request_returns_body_of_non_200_success() {
        let body = trace_request("POST", "http://farm.example", "/created", || async {
            Ok(JsonResponse {
                status: StatusCode::CREATED,
                body: json!({ "id": 1 }),
            })
        })
        .await
        .expect("created is a success");
        assert_eq!(body, json!({ "id": 1 }));
    }

    #[test]
    fn error_status_code_only_for_answered_requests() {
        assert_eq!(
            error_status_code(&PortalError::Unauthorized(String::new())),
            Some(401)
        );
        assert_eq!(
            error_status_code(&PortalError::StatusCode(
                StatusCode::BAD_GATEWAY,
                String::new()
            )),
            Some(502)
        );
        assert_eq!(
            error_status_code(&PortalError::Connection("refused".into())),
            None
        );
    }
}
