use std::sync::Arc;

use serde_json::{Map, Value};

use super::assembler::{assemble, CompiledForm, MissingDocument};
use super::catalog::{BenefitCatalog, CatalogError, GatewayError, SubmissionGateway, SubmissionReceipt};
use super::documents::build_document_schema;
use super::domain::{ApplicationFields, WalletDocument};
use super::fields::{build_application_schema, group_fields};
use super::rules::normalize;
use super::submission::{extract_prefill, reclassify, SubmissionError};

/// Everything the compiler needs to know about the current applicant: the
/// document wallet and the previously captured profile used for pre-fill.
#[derive(Debug, Clone, Default)]
pub struct ApplicantContext {
    pub wallet: Vec<WalletDocument>,
    pub profile: Map<String, Value>,
}

/// A compiled form together with its applicant-specific seed data.
#[derive(Debug, Clone)]
pub struct CompiledFormView {
    pub form: CompiledForm,
    pub prefill: Map<String, Value>,
    pub missing_documents: Vec<MissingDocument>,
}

/// Facade composing the full pipeline: catalog lookup, normalization,
/// grouping, wallet matching, assembly, and submission reclassification.
/// Stateless between calls; separate benefits and applicants can be compiled
/// concurrently without coordination.
pub struct BenefitFormService<C, G> {
    catalog: Arc<C>,
    gateway: Arc<G>,
}

impl<C, G> BenefitFormService<C, G>
where
    C: BenefitCatalog + 'static,
    G: SubmissionGateway + 'static,
{
    pub fn new(catalog: Arc<C>, gateway: Arc<G>) -> Self {
        Self { catalog, gateway }
    }

    /// Compiles the renderable form for one benefit and applicant.
    pub fn compile(
        &self,
        benefit_id: &str,
        applicant: &ApplicantContext,
    ) -> Result<CompiledFormView, FormServiceError> {
        // Flat declarations still carry per-field fieldset names; bucket them
        // before conversion so the tags survive into the ui schema.
        let declared_fields = match self.catalog.application_fields(benefit_id)? {
            ApplicationFields::Flat(list) => group_fields(list),
            grouped => grouped,
        };
        let rule_feed = self.catalog.rule_feed(benefit_id)?;

        let application = build_application_schema(&declared_fields);
        let normalized = normalize(&rule_feed);
        let documents = build_document_schema(&normalized, &applicant.wallet);

        let form = assemble("", application, documents);
        let prefill = extract_prefill(&applicant.profile, &form);
        let missing_documents = form.missing_documents();

        Ok(CompiledFormView {
            form,
            prefill,
            missing_documents,
        })
    }

    /// Reclassifies the filled values against a freshly compiled form and
    /// forwards the structured payload to the submission endpoint.
    pub fn submit(
        &self,
        benefit_id: &str,
        applicant: &ApplicantContext,
        filled: &Map<String, Value>,
    ) -> Result<SubmissionReceipt, FormServiceError> {
        let view = self.compile(benefit_id, applicant)?;
        let payload = reclassify(filled, &view.form, &applicant.wallet, benefit_id)?;
        let receipt = self.gateway.submit(&payload)?;
        Ok(receipt)
    }
}

/// Error raised by the form service facade.
#[derive(Debug, thiserror::Error)]
pub enum FormServiceError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}
