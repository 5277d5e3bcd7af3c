use crate::PortalError;
use reqwest::{header::HeaderMap, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use std::time::Duration;

/// A successful response: its status and the parsed JSON body.
pub struct JsonResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Send a prepared request and parse the response body as JSON.
/// Non-OK status codes are turned into errors carrying the body text.
pub async fn send_json(
    request: RequestBuilder,
    headers: HeaderMap,
    timeout: Option<Duration>,
    path: &str,
) -> Result<JsonResponse, PortalError> {
    let mut request = request.headers(headers);
    if let Some(timeout) = timeout {
        request = request.timeout(timeout);
    }

    let response = request.send().await.map_err(map_transport_error)?;
    let response = check_status(response).await?;
    let status = response.status();

    let text = response.text().await.map_err(map_transport_error)?;
    let body = serde_json::from_str(&text).map_err(|e| {
        PortalError::Invariant(path.to_string(), format!("Failed to parse response body: {e}"))
    })?;
    Ok(JsonResponse { status, body })
}

async fn check_status(response: Response) -> Result<Response, PortalError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    if status == StatusCode::UNAUTHORIZED {
        Err(PortalError::Unauthorized(body))
    } else {
        Err(PortalError::StatusCode(status, body))
    }
}

fn map_transport_error(error: reqwest::Error) -> PortalError {
    if error.is_connect() || error.is_timeout() {
        PortalError::Connection(error.to_string())
    } else {
        PortalError::Transport(error)
    }
}
