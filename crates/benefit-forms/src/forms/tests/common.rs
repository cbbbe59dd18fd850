use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::{json, Map, Value};

use crate::forms::assembler::{assemble, CompiledForm};
use crate::forms::catalog::{
    BenefitCatalog, CatalogError, GatewayError, SubmissionGateway, SubmissionReceipt,
};
use crate::forms::documents::build_document_schema;
use crate::forms::domain::{
    ApplicationField, ApplicationFields, FieldOption, SchemaFragment, WalletDocument,
};
use crate::forms::rules::normalize;
use crate::forms::service::BenefitFormService;
use crate::forms::submission::SubmissionPayload;

pub(super) fn criterion_rule(name: &str, proofs: &[&str]) -> Value {
    json!({ "criteria": { "name": name }, "allowedProofs": proofs })
}

pub(super) fn document_rule(document_type: &str, proofs: &[&str], required: bool) -> Value {
    json!({ "documentType": document_type, "allowedProofs": proofs, "isRequired": required })
}

pub(super) fn wallet_doc(
    id: &str,
    doc_type: &str,
    subtype: &str,
    data: &str,
    issuer: &str,
) -> WalletDocument {
    WalletDocument {
        doc_id: id.to_string(),
        doc_name: format!("{subtype} for tests"),
        doc_type: doc_type.to_string(),
        doc_subtype: subtype.to_string(),
        doc_data: data.to_string(),
        doc_datatype: "application/json".to_string(),
        doc_path: format!("wallet://{id}"),
        doc_verified: true,
        imported_from: issuer.to_string(),
        is_uploaded: false,
        uploaded_at: None,
        user_id: Some("user-1".to_string()),
    }
}

pub(super) fn text_field(name: &str, label: &str, required: bool) -> ApplicationField {
    ApplicationField {
        name: name.to_string(),
        label: label.to_string(),
        field_type: "text".to_string(),
        required,
        options: None,
        fields_group_name: None,
        fields_group_label: None,
    }
}

pub(super) fn select_field(name: &str, label: &str, options: &[(&str, &str)]) -> ApplicationField {
    ApplicationField {
        name: name.to_string(),
        label: label.to_string(),
        field_type: "select".to_string(),
        required: false,
        options: Some(
            options
                .iter()
                .map(|(value, label)| FieldOption {
                    value: value.to_string(),
                    label: label.to_string(),
                })
                .collect(),
        ),
        fields_group_name: None,
        fields_group_label: None,
    }
}

/// Compiles a document-only form, the common shape for grouping tests.
pub(super) fn compile_documents(rules: &[Value], wallet: &[WalletDocument]) -> CompiledForm {
    let normalized = normalize(rules);
    let documents = build_document_schema(&normalized, wallet);
    assemble("", SchemaFragment::default(), documents)
}

pub(super) fn filled(pairs: &[(&str, Value)]) -> Map<String, Value> {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect()
}

/// Single-benefit catalog backing service and router tests.
pub(super) struct StaticCatalog {
    pub(super) benefit_id: String,
    pub(super) fields: ApplicationFields,
    pub(super) rules: Vec<Value>,
}

impl BenefitCatalog for StaticCatalog {
    fn application_fields(&self, benefit_id: &str) -> Result<ApplicationFields, CatalogError> {
        if benefit_id == self.benefit_id {
            Ok(self.fields.clone())
        } else {
            Err(CatalogError::UnknownBenefit(benefit_id.to_string()))
        }
    }

    fn rule_feed(&self, benefit_id: &str) -> Result<Vec<Value>, CatalogError> {
        if benefit_id == self.benefit_id {
            Ok(self.rules.clone())
        } else {
            Err(CatalogError::UnknownBenefit(benefit_id.to_string()))
        }
    }
}

#[derive(Default)]
pub(super) struct RecordingGateway {
    pub(super) submissions: Mutex<Vec<SubmissionPayload>>,
}

impl SubmissionGateway for RecordingGateway {
    fn submit(&self, payload: &SubmissionPayload) -> Result<SubmissionReceipt, GatewayError> {
        let mut guard = self.submissions.lock().expect("gateway mutex poisoned");
        guard.push(payload.clone());
        Ok(SubmissionReceipt {
            order_id: format!("ord-{:06}", guard.len()),
        })
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn sample_service(
    benefit_id: &str,
    fields: ApplicationFields,
    rules: Vec<Value>,
) -> (
    Arc<BenefitFormService<StaticCatalog, RecordingGateway>>,
    Arc<RecordingGateway>,
) {
    let catalog = Arc::new(StaticCatalog {
        benefit_id: benefit_id.to_string(),
        fields,
        rules,
    });
    let gateway = Arc::new(RecordingGateway::default());
    let service = Arc::new(BenefitFormService::new(catalog, gateway.clone()));
    (service, gateway)
}
