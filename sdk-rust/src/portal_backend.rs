use crate::{Credential, PortalResult};
use serde_json::Value;

/// The portal backend as seen by the screens: a JSON-over-HTTP service
/// addressed by path.
///
/// Implementations report 401 as `PortalError::Unauthorized`, any other
/// non-OK status as `PortalError::StatusCode`, and an unreachable host as
/// `PortalError::Connection`.
#[async_trait::async_trait]
pub trait PortalBackend: Send + Sync {
    /// Root that request paths are resolved against.
    fn base_url(&self) -> &str;

    /// Issue a GET and parse the response body as JSON.
    async fn get(&self, path: &str) -> PortalResult<Value>;

    /// Issue a POST with a JSON body, attaching the bearer credential when
    /// one is given, and parse the response body as JSON.
    async fn post(
        &self,
        path: &str,
        body: Value,
        credential: Option<&Credential>,
    ) -> PortalResult<Value>;
}
