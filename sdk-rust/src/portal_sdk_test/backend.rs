use std::{
    collections::{HashMap, VecDeque},
    sync::Mutex,
};

use reqwest::StatusCode;
use serde_json::Value;

use crate::{Credential, PortalBackend, PortalError, PortalResult};

/// Result for a mocked request.
/// It can either be a JSON body to return or an error.
pub enum MockResult {
    Json(Value),
    Error(PortalError),
}

impl MockResult {
    /// Construct a result that yields the provided JSON body.
    pub fn json(value: Value) -> Self {
        Self::Json(value)
    }

    /// Construct a result that yields the provided error.
    pub fn error(error: PortalError) -> Self {
        Self::Error(error)
    }

    /// Construct a non-OK status result with an empty body.
    pub fn status(status: StatusCode) -> Self {
        if status == StatusCode::UNAUTHORIZED {
            Self::Error(PortalError::Unauthorized(String::new()))
        } else {
            Self::Error(PortalError::StatusCode(status, String::new()))
        }
    }

    /// Construct a result that behaves like an unreachable backend.
    pub fn unreachable() -> Self {
        Self::Error(PortalError::Connection("connection refused".into()))
    }
}

impl From<Value> for MockResult {
    fn from(value: Value) -> Self {
        Self::json(value)
    }
}

impl From<PortalError> for MockResult {
    fn from(error: PortalError) -> Self {
        Self::error(error)
    }
}

/// A request observed by the mock backend.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedRequest {
    pub method: &'static str,
    pub path: String,
    pub body: Option<Value>,
    /// The bearer token that was attached, if any.
    pub bearer: Option<String>,
}

#[derive(Default)]
struct MockBackendState {
    mocked_results: HashMap<(&'static str, String), VecDeque<MockResult>>,
    tracked_requests: Vec<TrackedRequest>,
}

impl MockBackendState {
    fn enqueue(&mut self, method: &'static str, path: &str, result: MockResult) {
        self.mocked_results
            .entry((method, path.to_string()))
            .or_default()
            .push_back(result);
    }

    fn next_result(&mut self, method: &'static str, path: &str) -> PortalResult<Value> {
        let result = self
            .mocked_results
            .get_mut(&(method, path.to_string()))
            .and_then(VecDeque::pop_front)
            .ok_or_else(|| {
                PortalError::Invariant(
                    path.to_string(),
                    format!("no mocked {method} result available"),
                )
            })?;

        match result {
            MockResult::Json(value) => Ok(value),
            MockResult::Error(error) => Err(error),
        }
    }

    fn reset(&mut self) {
        self.tracked_requests.clear();
    }

    fn restore(&mut self) {
        self.mocked_results.clear();
        self.reset();
    }
}

/// A mock portal backend for testing that tracks requests and yields
/// predefined results per method and path.
pub struct MockBackend {
    base_url: String,
    state: Mutex<MockBackendState>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self {
            base_url: "http://mock.portal".to_string(),
            state: Mutex::new(MockBackendState::default()),
        }
    }
}

impl MockBackend {
    /// Construct a new mock backend instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a result for the next GET to `path`.
    pub fn enqueue_get<R>(&self, path: &str, result: R) -> &Self
    where
        R: Into<MockResult>,
    {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.enqueue("GET", path, result.into());
        drop(state);
        self
    }

    /// Enqueue a result for the next POST to `path`.
    pub fn enqueue_post<R>(&self, path: &str, result: R) -> &Self
    where
        R: Into<MockResult>,
    {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.enqueue("POST", path, result.into());
        drop(state);
        self
    }

    /// Retrieve the tracked requests accumulated so far.
    pub fn tracked_requests(&self) -> Vec<TrackedRequest> {
        let state = self.state.lock().expect("mock state poisoned");
        state.tracked_requests.clone()
    }

    /// Number of requests tracked so far.
    pub fn request_count(&self) -> usize {
        let state = self.state.lock().expect("mock state poisoned");
        state.tracked_requests.len()
    }

    /// Reset tracked requests without touching enqueued results.
    pub fn reset(&self) {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.reset();
    }

    /// Clear both tracked requests and enqueued results.
    pub fn restore(&self) {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.restore();
    }
}

#[async_trait::async_trait]
impl PortalBackend for MockBackend {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get(&self, path: &str) -> PortalResult<Value> {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.tracked_requests.push(TrackedRequest {
            method: "GET",
            path: path.to_string(),
            body: None,
            bearer: None,
        });
        state.next_result("GET", path)
    }

    async fn post(
        &self,
        path: &str,
        body: Value,
        credential: Option<&Credential>,
    ) -> PortalResult<Value> {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.tracked_requests.push(TrackedRequest {
            method: "POST",
            path: path.to_string(),
            body: Some(body),
            bearer: credential.map(|c| c.token().to_string()),
        });
        state.next_result("POST", path)
    }
}
