use benefit_forms::forms::{
    ApplicationField, ApplicationFields, BenefitCatalog, CatalogError, FieldOption, GatewayError,
    SubmissionGateway, SubmissionPayload, SubmissionReceipt, WalletDocument,
};
use chrono::Utc;
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// One benefit's declared fields and raw rule feed, as the admin frontend
/// would fetch them from the scheme registry.
#[derive(Clone)]
pub(crate) struct BenefitDefinition {
    pub(crate) fields: ApplicationFields,
    pub(crate) rules: Vec<Value>,
}

#[derive(Default)]
pub(crate) struct InMemoryBenefitCatalog {
    definitions: Mutex<HashMap<String, BenefitDefinition>>,
}

impl InMemoryBenefitCatalog {
    pub(crate) fn register(&self, benefit_id: &str, definition: BenefitDefinition) {
        let mut guard = self.definitions.lock().expect("catalog mutex poisoned");
        guard.insert(benefit_id.to_string(), definition);
    }

    fn lookup(&self, benefit_id: &str) -> Result<BenefitDefinition, CatalogError> {
        let guard = self.definitions.lock().expect("catalog mutex poisoned");
        guard
            .get(benefit_id)
            .cloned()
            .ok_or_else(|| CatalogError::UnknownBenefit(benefit_id.to_string()))
    }
}

impl BenefitCatalog for InMemoryBenefitCatalog {
    fn application_fields(&self, benefit_id: &str) -> Result<ApplicationFields, CatalogError> {
        self.lookup(benefit_id).map(|definition| definition.fields)
    }

    fn rule_feed(&self, benefit_id: &str) -> Result<Vec<Value>, CatalogError> {
        self.lookup(benefit_id).map(|definition| definition.rules)
    }
}

/// Accepts reclassified payloads and answers with sequential order ids.
/// Stands in for the upstream benefit registry's submission endpoint.
#[derive(Default)]
pub(crate) struct RecordingSubmissionGateway {
    next_order: AtomicU64,
    submissions: Mutex<Vec<SubmissionPayload>>,
}

impl RecordingSubmissionGateway {
    pub(crate) fn submissions(&self) -> Vec<SubmissionPayload> {
        self.submissions.lock().expect("gateway mutex poisoned").clone()
    }
}

impl SubmissionGateway for RecordingSubmissionGateway {
    fn submit(&self, payload: &SubmissionPayload) -> Result<SubmissionReceipt, GatewayError> {
        let sequence = self.next_order.fetch_add(1, Ordering::Relaxed) + 1;
        let order_id = format!("ORD-{sequence:08}");
        info!(
            benefit_id = %payload.benefit_id,
            %order_id,
            vc_documents = payload.vc_documents.len(),
            files = payload.files.len(),
            "application forwarded"
        );

        self.submissions
            .lock()
            .expect("gateway mutex poisoned")
            .push(payload.clone());

        Ok(SubmissionReceipt { order_id })
    }
}

pub(crate) const DEMO_BENEFIT_ID: &str = "post-matric-scholarship";

/// Registers the scholarship benefit used by the demo command and local runs.
pub(crate) fn seed_demo_catalog(catalog: &InMemoryBenefitCatalog) {
    let fields = ApplicationFields::Flat(vec![
        ApplicationField {
            name: "firstName".to_string(),
            label: "First name".to_string(),
            field_type: "text".to_string(),
            required: true,
            options: None,
            fields_group_name: Some("personal".to_string()),
            fields_group_label: Some("Personal Details".to_string()),
        },
        ApplicationField {
            name: "dateOfBirth".to_string(),
            label: "Date of birth".to_string(),
            field_type: "date".to_string(),
            required: true,
            options: None,
            fields_group_name: Some("personal".to_string()),
            fields_group_label: Some("Personal Details".to_string()),
        },
        ApplicationField {
            name: "gender".to_string(),
            label: "Gender".to_string(),
            field_type: "select".to_string(),
            required: false,
            options: Some(vec![
                FieldOption {
                    value: "female".to_string(),
                    label: "Female".to_string(),
                },
                FieldOption {
                    value: "male".to_string(),
                    label: "Male".to_string(),
                },
                FieldOption {
                    value: "other".to_string(),
                    label: "Other".to_string(),
                },
            ]),
            fields_group_name: Some("personal".to_string()),
            fields_group_label: Some("Personal Details".to_string()),
        },
        ApplicationField {
            name: "bankAccountNumber".to_string(),
            label: "Bank account number".to_string(),
            field_type: "text".to_string(),
            required: true,
            options: None,
            fields_group_name: Some("banking".to_string()),
            fields_group_label: Some("Banking Details".to_string()),
        },
    ]);

    let rules = vec![
        json!({ "criteria": { "name": "income" }, "allowedProofs": ["incomeCert"] }),
        json!({ "criteria": { "name": "caste" }, "allowedProofs": ["casteCert"] }),
        json!({
            "documentType": "incomeCertificate",
            "allowedProofs": ["incomeCert"],
            "isRequired": true,
        }),
        json!({
            "documentType": "casteCertificate",
            "allowedProofs": ["casteCert"],
            "isRequired": true,
        }),
        json!({
            "documentType": "applicantPhoto",
            "allowedProofs": ["photoUpload"],
            "isRequired": true,
        }),
    ];

    catalog.register(DEMO_BENEFIT_ID, BenefitDefinition { fields, rules });
}

/// Wallet a demo applicant would bring: certificates for both criteria, none
/// for the photo upload.
pub(crate) fn demo_wallet() -> Vec<WalletDocument> {
    vec![
        WalletDocument {
            doc_id: "wallet-income-1".to_string(),
            doc_name: "Income certificate".to_string(),
            doc_type: "incomeCertificate".to_string(),
            doc_subtype: "incomeCert".to_string(),
            doc_data: "income-certificate-payload".to_string(),
            doc_datatype: "application/json".to_string(),
            doc_path: "wallet://wallet-income-1".to_string(),
            doc_verified: true,
            imported_from: "https://revenue.gov.example".to_string(),
            is_uploaded: false,
            uploaded_at: Some(Utc::now()),
            user_id: Some("demo-user".to_string()),
        },
        WalletDocument {
            doc_id: "wallet-caste-1".to_string(),
            doc_name: "Caste certificate".to_string(),
            doc_type: "casteCertificate".to_string(),
            doc_subtype: "casteCert".to_string(),
            doc_data: "caste-certificate-payload".to_string(),
            doc_datatype: "application/json".to_string(),
            doc_path: "wallet://wallet-caste-1".to_string(),
            doc_verified: true,
            imported_from: String::new(),
            is_uploaded: false,
            uploaded_at: Some(Utc::now()),
            user_id: Some("demo-user".to_string()),
        },
    ]
}
