use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier as sent by the backend. Database-backed endpoints return
/// integers, others may return strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(untagged)]
pub enum WireId {
    Number(i64),
    Text(String),
}

impl fmt::Display for WireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

/// Envelope used by the `/api/v1/features/*` endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct FeatureEnvelope<T> {
    #[serde(default)]
    pub status: Option<String>,
    pub data: T,
}

// Crop insurance

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct InsuranceCatalog {
    pub insurance_plans: Vec<InsurancePlanSummary>,
    #[serde(default)]
    pub government_subsidy: Option<String>,
}

/// An insurance plan as listed by the features endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct InsurancePlanSummary {
    pub provider: String,
    /// Comma separated list of covered perils, e.g. "Drought, Flood, Hail".
    #[serde(default)]
    pub coverage: String,
    /// Human readable premium, e.g. "₹500/acre/year".
    #[serde(default)]
    pub premium: String,
    #[serde(default)]
    pub claim_ratio: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct PolicyCreate {
    pub policy_number: String,
    pub crop: String,
    pub coverage_amount: f64,
    pub premium: f64,
}

/// A policy as persisted by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct PolicyRecord {
    pub id: WireId,
    #[serde(default)]
    pub policy_number: Option<String>,
    #[serde(default)]
    pub crop: Option<String>,
    #[serde(default)]
    pub coverage_amount: Option<f64>,
    #[serde(default)]
    pub premium: Option<f64>,
}

// Experts

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct ExpertDirectory {
    pub experts: Vec<ExpertProfile>,
    #[serde(default)]
    pub total: Option<usize>,
}

/// Full expert profile from the farming API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct ExpertProfile {
    pub id: WireId,
    pub name: String,
    pub specialization: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub consultation_fee: Option<f64>,
    #[serde(default)]
    pub availability: Option<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct ExpertRoster {
    pub experts: Vec<ExpertSummary>,
    #[serde(default)]
    pub available: Option<usize>,
}

/// Reduced expert listing from the features endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct ExpertSummary {
    pub name: String,
    pub specialization: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub rating: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct ConsultationCreate {
    pub expert_name: String,
    pub topic: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consultation_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A consultation as persisted by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct ConsultationRecord {
    pub id: WireId,
    #[serde(default)]
    pub expert_name: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub consultation_type: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

// Quality inputs

/// Supplier from the farming API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct SupplierProfile {
    pub id: WireId,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub verified: Option<bool>,
    #[serde(default)]
    pub specializations: Option<Vec<String>>,
    #[serde(default)]
    pub price_range: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct QualityInputListing {
    pub suppliers: Vec<SupplierSummary>,
    #[serde(default)]
    pub total: Option<usize>,
}

/// Reduced supplier listing from the features endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct SupplierSummary {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub rating: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct ProductCatalog {
    pub products: Vec<ProductListing>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct ProductListing {
    pub id: WireId,
    pub name: String,
    pub category: String,
    pub supplier: String,
    pub price: f64,
    pub unit: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub in_stock: bool,
    #[serde(default)]
    pub organic: bool,
    #[serde(default)]
    pub description: String,
}

// Chat

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct ChatReply {
    pub reply: String,
    /// RFC 3339 timestamp assigned by the backend.
    pub timestamp: String,
    #[serde(default)]
    pub assistant: Option<String>,
}
