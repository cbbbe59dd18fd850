use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::debug;

use super::assembler::CompiledForm;
use super::domain::{
    FieldSchema, WalletDocument, FALLBACK_ISSUER, SYSTEM_FIELDS, UNKNOWN_DOCUMENT_TYPE,
    VC_DOCUMENT_FORMAT,
};
use super::heuristics::is_file_upload_field;
use super::wallet::find_by_selection;

/// A raw file upload keyed by its field name, serialized as a single-entry
/// object to match the submission wire shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub field: String,
    pub content: String,
}

impl Serialize for FileUpload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.field, &self.content)?;
        map.end()
    }
}

/// A wallet-backed document submission: structured metadata plus encoded content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VcDocument {
    pub document_submission_reason: String,
    pub document_type: String,
    pub document_subtype: String,
    pub document_format: String,
    pub document_imported_from: String,
    pub document_content: String,
}

/// Structured payload handed to the submission endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionPayload {
    #[serde(flatten)]
    pub personal: Map<String, Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<FileUpload>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub vc_documents: Vec<VcDocument>,
    #[serde(rename = "benefitId")]
    pub benefit_id: String,
}

/// Submission-time failures. All fatal: a partially-encoded payload would
/// silently drop a document the applicant's eligibility depends on.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("document field `{field}` holds a non-text value and cannot be encoded")]
    NonTextContent { field: String },
}

/// Walks the filled form values and rebuilds the structured payload: personal
/// fields pass through, document fields are re-encoded as file uploads or VC
/// documents with their type and issuer recovered from the wallet.
pub fn reclassify(
    filled: &Map<String, Value>,
    form: &CompiledForm,
    wallet: &[WalletDocument],
    benefit_id: &str,
) -> Result<SubmissionPayload, SubmissionError> {
    let mut personal = Map::new();
    for (name, value) in filled {
        if form.document_fields.contains(name)
            || SYSTEM_FIELDS.contains(&name.as_str())
            || value.is_null()
        {
            continue;
        }
        personal.insert(name.clone(), value.clone());
    }

    let mut files = Vec::new();
    let mut vc_documents = Vec::new();

    for field_name in &form.document_fields {
        let raw = match filled.get(field_name) {
            Some(Value::String(text)) if !text.is_empty() => text,
            Some(Value::String(_)) | Some(Value::Null) | None => {
                debug!(field = %field_name, "document field missing from form data");
                continue;
            }
            Some(_) => {
                return Err(SubmissionError::NonTextContent {
                    field: field_name.clone(),
                })
            }
        };

        let schema = form.field(field_name);
        let encoded = encode_content(raw);

        let is_file_upload = schema
            .and_then(|schema| schema.vc_meta.as_ref())
            .map(|meta| meta.is_file_upload)
            .unwrap_or(false)
            || is_file_upload_field(field_name);

        if is_file_upload {
            files.push(FileUpload {
                field: field_name.clone(),
                content: encoded,
            });
        } else {
            vc_documents.push(vc_document(field_name, raw, encoded, schema, wallet));
        }
    }

    Ok(SubmissionPayload {
        personal,
        files,
        vc_documents,
        benefit_id: benefit_id.to_string(),
    })
}

/// Builds one VC document record, recovering the true document type and issuer
/// from the selected wallet entry. A stale selection that no longer resolves
/// falls back to the unknown type and placeholder issuer rather than rejecting
/// the submission.
fn vc_document(
    field_name: &str,
    selection: &str,
    encoded: String,
    schema: Option<&FieldSchema>,
    wallet: &[WalletDocument],
) -> VcDocument {
    let (document_type, issuer) = match find_by_selection(selection, wallet) {
        Some(doc) => {
            let issuer = if doc.imported_from.is_empty() {
                FALLBACK_ISSUER.to_string()
            } else {
                doc.imported_from.clone()
            };
            (doc.doc_type.clone(), issuer)
        }
        None => (
            UNKNOWN_DOCUMENT_TYPE.to_string(),
            FALLBACK_ISSUER.to_string(),
        ),
    };

    let submission_reasons = schema
        .and_then(|schema| schema.vc_meta.as_ref())
        .map(|meta| meta.submission_reasons.clone())
        .unwrap_or_else(|| vec![field_name.to_string()]);

    let document_format = schema
        .and_then(|schema| schema.vc_meta.as_ref())
        .map(|meta| meta.format.clone())
        .unwrap_or_else(|| VC_DOCUMENT_FORMAT.to_string());

    VcDocument {
        document_submission_reason: serde_json::to_string(&submission_reasons)
            .expect("string vector serializes"),
        document_type,
        document_subtype: resolve_subtype(selection, schema),
        document_format,
        document_imported_from: issuer,
        document_content: encoded,
    }
}

/// The subtype the applicant actually chose: the `enumNames` label at the
/// index of the selected value, falling back to the field's declared subtype.
fn resolve_subtype(selection: &str, schema: Option<&FieldSchema>) -> String {
    if let Some(schema) = schema {
        if let (Some(values), Some(names)) = (&schema.enum_values, &schema.enum_names) {
            if let Some(position) = values.iter().position(|value| value == selection) {
                if let Some(name) = names.get(position) {
                    if !name.is_empty() {
                        return name.clone();
                    }
                }
            }
        }

        if let Some(subtype) = schema
            .vc_meta
            .as_ref()
            .and_then(|meta| meta.document_subtype.clone())
        {
            return subtype;
        }
    }

    UNKNOWN_DOCUMENT_TYPE.to_string()
}

/// Document content wire encoding, identical for files and VC documents.
pub fn encode_content(raw: &str) -> String {
    format!("base64,{}", STANDARD.encode(raw))
}

/// Seeds form data from a previously captured profile: every schema property
/// present in the profile map is carried over as a string. The external
/// application id, when present, is exposed to the form as `orderId`.
pub fn extract_prefill(profile: &Map<String, Value>, form: &CompiledForm) -> Map<String, Value> {
    let mut seeded = Map::new();

    for name in form.field_names() {
        if let Some(value) = profile.get(name) {
            seeded.insert(name.to_string(), Value::String(stringify(value)));
        }
    }

    if let Some(value) = profile.get("external_application_id") {
        seeded.insert("orderId".to_string(), Value::String(stringify(value)));
    }

    seeded
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
