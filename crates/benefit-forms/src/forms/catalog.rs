use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::domain::ApplicationFields;
use super::submission::SubmissionPayload;

/// Source of benefit definitions: declared application fields and the raw
/// eligibility/required-document rule feed, keyed by benefit id. Rules are
/// handed over undecoded so the normalizer can skip malformed entries without
/// the catalog caring.
pub trait BenefitCatalog: Send + Sync {
    fn application_fields(&self, benefit_id: &str) -> Result<ApplicationFields, CatalogError>;
    fn rule_feed(&self, benefit_id: &str) -> Result<Vec<Value>, CatalogError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("benefit `{0}` not found")]
    UnknownBenefit(String),
    #[error("benefit catalog unavailable: {0}")]
    Unavailable(String),
}

/// Outbound side of the pipeline: forwards a reclassified payload to the
/// submission endpoint.
pub trait SubmissionGateway: Send + Sync {
    fn submit(&self, payload: &SubmissionPayload) -> Result<SubmissionReceipt, GatewayError>;
}

/// Acknowledgement returned by the submission endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub order_id: String,
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("submission endpoint rejected the payload: {0}")]
    Rejected(String),
    #[error("submission endpoint unavailable: {0}")]
    Unavailable(String),
}
