use crate::{
    client_utils, opentelemetry::trace_request, Credential, PortalBackend, PortalError,
    PortalResult,
};
use reqwest::{
    header::{self, HeaderMap, HeaderName, HeaderValue},
    Client,
};
use serde_json::Value;
use std::{collections::HashMap, time::Duration};

/// Environment variable naming the backend root, read at build time for
/// [`DEFAULT_BASE_URL`] and at run time by [`PortalClientOptions::from_env`].
pub const BASE_URL_ENV: &str = "AGRI_PORTAL_API_BASE_URL";

pub const DEFAULT_BASE_URL: &str = match option_env!("AGRI_PORTAL_API_BASE_URL") {
    Some(url) => url,
    None => "http://localhost:8000",
};

/// HTTP implementation of [`PortalBackend`].
pub struct PortalClient {
    base_url: String,
    client: Client,
    headers: HashMap<String, String>,
    timeout: Option<Duration>,
}

#[derive(Clone, Default)]
pub struct PortalClientOptions {
    pub base_url: Option<String>,
    /// Extra headers sent with every request.
    pub headers: Option<HashMap<String, String>>,
    pub client: Option<Client>,
    /// Per-request timeout. Unset leaves the transport default in place.
    pub timeout: Option<Duration>,
}

impl PortalClientOptions {
    /// Options with `base_url` taken from the process environment when set.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var(BASE_URL_ENV)
                .ok()
                .filter(|url| !url.trim().is_empty()),
            ..Default::default()
        }
    }
}

impl PortalClient {
    #[must_use]
    pub fn new(options: PortalClientOptions) -> Self {
        let PortalClientOptions {
            base_url,
            headers,
            client,
            timeout,
        } = options;

        let base_url = base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let client = client.unwrap_or_else(Client::new);
        let headers = headers.unwrap_or_default();

        Self {
            base_url,
            client,
            headers,
            timeout,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request_headers(&self, credential: Option<&Credential>) -> PortalResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        for (key, value) in &self.headers {
            let header_name = HeaderName::from_bytes(key.as_bytes()).map_err(|error| {
                PortalError::InvalidInput(format!("Invalid header name '{key}': {error}"))
            })?;
            let header_value = HeaderValue::from_str(value).map_err(|error| {
                PortalError::InvalidInput(format!("Invalid header value for '{key}': {error}"))
            })?;
            headers.insert(header_name, header_value);
        }

        if let Some(credential) = credential {
            headers.insert(header::AUTHORIZATION, credential.header_value()?);
        }

        Ok(headers)
    }
}

impl Default for PortalClient {
    fn default() -> Self {
        Self::new(PortalClientOptions::default())
    }
}

#[async_trait::async_trait]
impl PortalBackend for PortalClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get(&self, path: &str) -> PortalResult<Value> {
        trace_request("GET", &self.base_url, path, || async move {
            let headers = self.request_headers(None)?;
            let request = self.client.get(self.url(path));
            client_utils::send_json(request, headers, self.timeout, path).await
        })
        .await
    }

    async fn post(
        &self,
        path: &str,
        body: Value,
        credential: Option<&Credential>,
    ) -> PortalResult<Value> {
        trace_request("POST", &self.base_url, path, || async move {
            let headers = self.request_headers(credential)?;
            let request = self.client.post(self.url(path)).json(&body);
            client_utils::send_json(request, headers, self.timeout, path).await
        })
        .await
    }
}
