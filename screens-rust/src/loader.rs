use crate::DataOrigin;
use agri_portal_sdk::{PortalBackend, PortalError, PortalResult};
use futures::future::BoxFuture;
use rand::rngs::StdRng;
use tracing::{debug, warn};

/// Reads one listing through a typed SDK call and maps it into local
/// records. The generator fills placeholder values for fields the backend
/// omitted.
pub type FetchFn<T> =
    for<'a> fn(&'a dyn PortalBackend, &'a mut StdRng) -> BoxFuture<'a, PortalResult<Vec<T>>>;

/// A listing endpoint and how to read it.
pub struct Endpoint<T> {
    /// Path requested by `fetch`, for diagnostics and [`LoadOutcome::Live`].
    pub path: &'static str,
    fetch: FetchFn<T>,
}

impl<T> Endpoint<T> {
    pub const fn new(path: &'static str, fetch: FetchFn<T>) -> Self {
        Self { path, fetch }
    }

    async fn fetch(&self, backend: &dyn PortalBackend, rng: &mut StdRng) -> PortalResult<Vec<T>> {
        (self.fetch)(backend, rng).await
    }
}

/// Result of a [`Loader::load`].
#[derive(Debug)]
pub enum LoadOutcome<T> {
    /// Records came from the backend endpoint at `path`.
    Live {
        records: Vec<T>,
        path: &'static str,
    },
    /// Every endpoint failed and the demo dataset was substituted.
    /// `cause` is the last error seen.
    Fallback { records: Vec<T>, cause: PortalError },
    /// Every endpoint failed and there is no demo dataset.
    Failed(PortalError),
}

impl<T> LoadOutcome<T> {
    /// Records to display. Empty only for `Failed`.
    pub fn records(&self) -> &[T] {
        match self {
            Self::Live { records, .. } | Self::Fallback { records, .. } => records,
            Self::Failed(_) => &[],
        }
    }

    pub fn into_records(self) -> Vec<T> {
        match self {
            Self::Live { records, .. } | Self::Fallback { records, .. } => records,
            Self::Failed(_) => Vec::new(),
        }
    }

    pub fn origin(&self) -> Option<DataOrigin> {
        match self {
            Self::Live { .. } => Some(DataOrigin::Live),
            Self::Fallback { .. } => Some(DataOrigin::Fallback),
            Self::Failed(_) => None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    /// The error that prevented live data from loading.
    pub fn cause(&self) -> Option<&PortalError> {
        match self {
            Self::Live { .. } => None,
            Self::Fallback { cause, .. } | Self::Failed(cause) => Some(cause),
        }
    }
}

/// Fetch-or-fallback loading of one listing.
///
/// Tries the primary endpoint, then the secondary one if the backend
/// answered but the primary failed (an error status or a body of the wrong
/// shape), then the demo dataset. Each endpoint is requested at most once
/// per call.
pub struct Loader<T> {
    primary: Endpoint<T>,
    secondary: Option<Endpoint<T>>,
    fallback: Option<fn() -> Vec<T>>,
}

impl<T> Loader<T> {
    pub fn new(primary: Endpoint<T>) -> Self {
        Self {
            primary,
            secondary: None,
            fallback: None,
        }
    }

    #[must_use]
    pub fn with_secondary(mut self, secondary: Endpoint<T>) -> Self {
        self.secondary = Some(secondary);
        self
    }

    #[must_use]
    pub fn with_fallback(mut self, fallback: fn() -> Vec<T>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub async fn load(&self, backend: &dyn PortalBackend, rng: &mut StdRng) -> LoadOutcome<T> {
        let cause = match self.primary.fetch(backend, rng).await {
            Ok(records) => {
                debug!(path = self.primary.path, count = records.len(), "loaded listing");
                return LoadOutcome::Live {
                    records,
                    path: self.primary.path,
                };
            }
            Err(error) => {
                warn!(path = self.primary.path, %error, "listing request failed");
                error
            }
        };

        // An unreachable host will not answer on another path either.
        let cause = match &self.secondary {
            Some(secondary) if !cause.is_unreachable() => {
                match secondary.fetch(backend, rng).await {
                    Ok(records) => {
                        debug!(path = secondary.path, count = records.len(), "loaded listing");
                        return LoadOutcome::Live {
                            records,
                            path: secondary.path,
                        };
                    }
                    Err(error) => {
                        warn!(path = secondary.path, %error, "listing request failed");
                        error
                    }
                }
            }
            _ => cause,
        };

        match self.fallback {
            Some(fallback) => {
                let records = fallback();
                warn!(
                    path = self.primary.path,
                    count = records.len(),
                    "showing demo data"
                );
                LoadOutcome::Fallback { records, cause }
            }
            None => LoadOutcome::Failed(cause),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agri_portal_sdk::{
        api,
        portal_sdk_test::{MockBackend, MockResult},
        StatusCode,
    };
    use rand::SeedableRng;
    use serde_json::json;

    const PRIMARY: &str = "/crops";
    const SECONDARY: &str = "/features/crops";

    fn fetch_primary<'a>(
        backend: &'a dyn PortalBackend,
        _rng: &'a mut StdRng,
    ) -> BoxFuture<'a, PortalResult<Vec<String>>> {
        Box::pin(api::fetch(backend, PRIMARY))
    }

    fn fetch_secondary<'a>(
        backend: &'a dyn PortalBackend,
        _rng: &'a mut StdRng,
    ) -> BoxFuture<'a, PortalResult<Vec<String>>> {
        Box::pin(api::fetch(backend, SECONDARY))
    }

    fn demo_crops() -> Vec<String> {
        vec!["Wheat".to_string(), "Rice".to_string()]
    }

    fn full_loader() -> Loader<String> {
        Loader::new(Endpoint::new(PRIMARY, fetch_primary))
            .with_secondary(Endpoint::new(SECONDARY, fetch_secondary))
            .with_fallback(demo_crops)
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0)
    }

    fn paths(backend: &MockBackend) -> Vec<String> {
        backend
            .tracked_requests()
            .into_iter()
            .map(|request| request.path)
            .collect()
    }

    #[tokio::test]
    async fn primary_success_is_live() {
        let backend = MockBackend::new();
        backend.enqueue_get(PRIMARY, json!(["Maize"]));

        let outcome = full_loader().load(&backend, &mut rng()).await;

        assert!(matches!(&outcome, LoadOutcome::Live { path, .. } if *path == PRIMARY));
        assert_eq!(outcome.records(), ["Maize"]);
        assert_eq!(outcome.origin(), Some(DataOrigin::Live));
        assert!(outcome.cause().is_none());
        assert_eq!(paths(&backend), vec![PRIMARY]);
    }

    #[tokio::test]
    async fn error_status_tries_secondary() {
        let backend = MockBackend::new();
        backend
            .enqueue_get(PRIMARY, MockResult::status(StatusCode::NOT_FOUND))
            .enqueue_get(SECONDARY, json!(["Millet"]));

        let outcome = full_loader().load(&backend, &mut rng()).await;

        assert!(matches!(&outcome, LoadOutcome::Live { path, .. } if *path == SECONDARY));
        assert_eq!(outcome.into_records(), vec!["Millet"]);
        assert_eq!(paths(&backend), vec![PRIMARY, SECONDARY]);
    }

    #[tokio::test]
    async fn wrong_shape_primary_tries_secondary() {
        let backend = MockBackend::new();
        backend
            .enqueue_get(PRIMARY, json!({ "status": "success", "data": null }))
            .enqueue_get(SECONDARY, json!(["Sorghum"]));

        let outcome = full_loader().load(&backend, &mut rng()).await;

        assert!(matches!(&outcome, LoadOutcome::Live { path, .. } if *path == SECONDARY));
        assert_eq!(outcome.records(), ["Sorghum"]);
        assert_eq!(paths(&backend), vec![PRIMARY, SECONDARY]);
    }

    #[tokio::test]
    async fn wrong_shape_everywhere_falls_back() {
        let backend = MockBackend::new();
        backend
            .enqueue_get(PRIMARY, json!({ "crops": "Wheat" }))
            .enqueue_get(SECONDARY, json!(42));

        let outcome = full_loader().load(&backend, &mut rng()).await;

        assert!(outcome.is_fallback());
        assert_eq!(outcome.records(), ["Wheat", "Rice"]);
        assert!(matches!(
            outcome.cause(),
            Some(PortalError::Invariant(path, _)) if path == SECONDARY
        ));
    }

    #[tokio::test]
    async fn unreachable_host_skips_secondary() {
        let backend = MockBackend::new();
        backend
            .enqueue_get(PRIMARY, MockResult::unreachable())
            .enqueue_get(SECONDARY, json!(["Millet"]));

        let outcome = full_loader().load(&backend, &mut rng()).await;

        assert_eq!(outcome.origin(), Some(DataOrigin::Fallback));
        assert!(outcome.cause().is_some_and(PortalError::is_unreachable));
        assert_eq!(paths(&backend), vec![PRIMARY]);
    }

    #[tokio::test]
    async fn without_fallback_failure_is_reported() {
        let backend = MockBackend::new();
        backend.enqueue_get(PRIMARY, MockResult::status(StatusCode::INTERNAL_SERVER_ERROR));

        let outcome = Loader::new(Endpoint::new(PRIMARY, fetch_primary))
            .load(&backend, &mut rng())
            .await;

        assert!(matches!(
            &outcome,
            LoadOutcome::Failed(PortalError::StatusCode(StatusCode::INTERNAL_SERVER_ERROR, _))
        ));
        assert!(outcome.records().is_empty());
        assert_eq!(outcome.origin(), None);
        assert!(!outcome.is_fallback());
    }
}
