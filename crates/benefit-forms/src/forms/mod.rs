//! Eligibility/document requirement compilation for benefit application forms.
//!
//! The pipeline turns a benefit's declared form fields and rule feed, combined
//! with an applicant's document wallet, into a normalized RJSF-style schema,
//! and inverts the transformation at submission time to rebuild the structured
//! payload (personal fields, file uploads, VC documents).

pub mod assembler;
pub mod catalog;
pub mod documents;
pub mod domain;
pub mod fields;
pub mod grouping;
mod heuristics;
pub mod router;
pub mod rules;
pub mod service;
pub mod submission;
pub mod wallet;

#[cfg(test)]
mod tests;

pub use assembler::{assemble, CompiledForm, MissingDocument, UiGroup, UiHints};
pub use catalog::{
    BenefitCatalog, CatalogError, GatewayError, SubmissionGateway, SubmissionReceipt,
};
pub use documents::build_document_schema;
pub use domain::{
    ApplicationField, ApplicationFields, EligibilityCriterion, FieldGroup, FieldOption,
    FieldSchema, GroupTag, RequiredDocument, SchemaFragment, VcMeta, WalletDocument,
};
pub use fields::{build_application_schema, group_fields};
pub use grouping::{group_by_proof_set, ProofGroup};
pub use heuristics::is_file_upload_field;
pub use router::benefit_form_router;
pub use rules::{normalize, NormalizedRules};
pub use service::{ApplicantContext, BenefitFormService, CompiledFormView, FormServiceError};
pub use submission::{
    extract_prefill, reclassify, FileUpload, SubmissionError, SubmissionPayload, VcDocument,
};
pub use wallet::{match_documents, DocumentOptions};
