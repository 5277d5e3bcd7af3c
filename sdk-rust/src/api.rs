//! Typed calls against the portal backend.
//!
//! Each function issues exactly one request through a [`PortalBackend`] and
//! decodes the body into the endpoint's wire shape.

use crate::{
    ChatReply, ChatRequest, ConsultationCreate, ConsultationRecord, Credential, ExpertDirectory,
    ExpertRoster, FeatureEnvelope, InsuranceCatalog, PolicyCreate, PolicyRecord, PortalBackend,
    PortalError, PortalResult, ProductCatalog, QualityInputListing, SupplierProfile,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

pub const INSURANCE_CATALOG_PATH: &str = "/api/v1/features/crop-insurance";
pub const INSURANCE_POLICIES_PATH: &str = "/api/v1/farming/insurance/policies";
pub const EXPERTS_AVAILABLE_PATH: &str = "/api/v1/farming/experts/available";
pub const CONNECT_EXPERTS_PATH: &str = "/api/v1/features/connect-experts";
pub const CONSULTATIONS_PATH: &str = "/api/v1/farming/experts/consultations";
pub const SUPPLIERS_PATH: &str = "/api/v1/farming/inputs/suppliers";
pub const QUALITY_INPUT_PATH: &str = "/api/v1/features/quality-input";
pub const PRODUCTS_PATH: &str = "/api/v1/farming/inputs/products";
pub const CHAT_PATH: &str = "/api/v1/features/chat";

/// Decode a JSON body into `T`, reporting shape mismatches against `path`.
pub fn decode<T: DeserializeOwned>(path: &str, value: Value) -> PortalResult<T> {
    serde_json::from_value(value)
        .map_err(|e| PortalError::Invariant(path.to_string(), e.to_string()))
}

pub async fn fetch<T: DeserializeOwned>(backend: &dyn PortalBackend, path: &str) -> PortalResult<T> {
    let value = backend.get(path).await?;
    decode(path, value)
}

pub async fn submit<B: Serialize + Sync, R: DeserializeOwned>(
    backend: &dyn PortalBackend,
    path: &str,
    body: &B,
    credential: Option<&Credential>,
) -> PortalResult<R> {
    let body = serde_json::to_value(body).map_err(|e| {
        PortalError::InvalidInput(format!("Failed to serialize request body: {e}"))
    })?;
    let value = backend.post(path, body, credential).await?;
    decode(path, value)
}

pub async fn insurance_catalog(backend: &dyn PortalBackend) -> PortalResult<InsuranceCatalog> {
    let envelope: FeatureEnvelope<InsuranceCatalog> =
        fetch(backend, INSURANCE_CATALOG_PATH).await?;
    Ok(envelope.data)
}

pub async fn create_policy(
    backend: &dyn PortalBackend,
    payload: &PolicyCreate,
    credential: Option<&Credential>,
) -> PortalResult<PolicyRecord> {
    submit(backend, INSURANCE_POLICIES_PATH, payload, credential).await
}

pub async fn available_experts(backend: &dyn PortalBackend) -> PortalResult<ExpertDirectory> {
    fetch(backend, EXPERTS_AVAILABLE_PATH).await
}

pub async fn connect_experts(backend: &dyn PortalBackend) -> PortalResult<ExpertRoster> {
    let envelope: FeatureEnvelope<ExpertRoster> = fetch(backend, CONNECT_EXPERTS_PATH).await?;
    Ok(envelope.data)
}

pub async fn book_consultation(
    backend: &dyn PortalBackend,
    payload: &ConsultationCreate,
    credential: Option<&Credential>,
) -> PortalResult<ConsultationRecord> {
    submit(backend, CONSULTATIONS_PATH, payload, credential).await
}

pub async fn suppliers(backend: &dyn PortalBackend) -> PortalResult<Vec<SupplierProfile>> {
    fetch(backend, SUPPLIERS_PATH).await
}

pub async fn quality_input(backend: &dyn PortalBackend) -> PortalResult<QualityInputListing> {
    let envelope: FeatureEnvelope<QualityInputListing> =
        fetch(backend, QUALITY_INPUT_PATH).await?;
    Ok(envelope.data)
}

pub async fn products(backend: &dyn PortalBackend) -> PortalResult<ProductCatalog> {
    fetch(backend, PRODUCTS_PATH).await
}

/// Send one chat message. Chat is unauthenticated and carries no history.
pub async fn chat(backend: &dyn PortalBackend, message: &str) -> PortalResult<ChatReply> {
    let request = ChatRequest {
        message: message.to_string(),
    };
    submit(backend, CHAT_PATH, &request, None).await
}
