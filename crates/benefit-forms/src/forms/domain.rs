use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Issuer reported when a selected document cannot be traced back to a wallet entry.
pub const FALLBACK_ISSUER: &str = "https://provider.example.org";

/// Document type reported for untraceable selections.
pub const UNKNOWN_DOCUMENT_TYPE: &str = "unknown";

/// Document type used when a selector spans rules with differing document types.
pub const GENERIC_DOCUMENT_TYPE: &str = "eligibilityCriteria";

/// Content format recorded in VC metadata for wallet-backed documents.
pub const VC_DOCUMENT_FORMAT: &str = "json";

/// Group every generated document selector is filed under.
pub const DOCUMENTS_GROUP: &str = "documents";
pub const DOCUMENTS_GROUP_LABEL: &str = "Documents";

/// Keys injected by the hosting page rather than typed by the applicant.
pub const SYSTEM_FIELDS: [&str; 3] = ["benefitId", "docs", "orderId"];

/// One field declared by the benefit definition's application form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationField {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<FieldOption>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields_group_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields_group_label: Option<String>,
}

/// Value/label pair for `radio`/`select` declarations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    pub value: String,
    pub label: String,
}

/// Declared fields arrive either flat or pre-grouped by fieldset. The variant is
/// resolved once at the builder entry point; downstream logic never branches on it.
/// Untagged on the wire: a flat field list and a fieldset list are distinguishable
/// by shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApplicationFields {
    Flat(Vec<ApplicationField>),
    Grouped(Vec<FieldGroup>),
}

/// Named fieldset preserving declaration order of its members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldGroup {
    pub name: String,
    pub label: String,
    pub fields: Vec<ApplicationField>,
}

/// Rule feed entry as published by the benefit catalog. Entries carrying a
/// `criteria` block are eligibility criteria; entries keyed only by
/// `documentType` are standalone required-document rules.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawRule {
    Criterion {
        criteria: CriterionRef,
        #[serde(rename = "allowedProofs")]
        allowed_proofs: Vec<String>,
        #[serde(default, rename = "isRequired")]
        is_required: Option<bool>,
    },
    Document {
        #[serde(rename = "documentType")]
        document_type: String,
        #[serde(rename = "allowedProofs")]
        allowed_proofs: Vec<String>,
        #[serde(default, rename = "isRequired")]
        is_required: bool,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct CriterionRef {
    pub name: String,
}

/// A named eligibility condition satisfiable by any proof in its allowed set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityCriterion {
    pub criterion_name: String,
    pub allowed_proofs: Vec<String>,
    pub is_required: Option<bool>,
}

/// A standalone mandatory/optional document rule not tied to a criterion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredDocument {
    pub document_type: String,
    pub allowed_proofs: Vec<String>,
    pub is_required: bool,
}

/// One document already held by the applicant. Immutable input to compilation;
/// `doc_subtype` is the proof type joining wallet entries to rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletDocument {
    pub doc_id: String,
    #[serde(default)]
    pub doc_name: String,
    pub doc_type: String,
    pub doc_subtype: String,
    pub doc_data: String,
    #[serde(default)]
    pub doc_datatype: String,
    #[serde(default)]
    pub doc_path: String,
    #[serde(default)]
    pub doc_verified: bool,
    #[serde(default)]
    pub imported_from: String,
    #[serde(default)]
    pub is_uploaded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// Submission-time metadata attached to generated document fields. Invisible to
/// the renderer; consumed when reclassifying filled values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VcMeta {
    pub submission_reasons: Vec<String>,
    pub document_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_subtype: Option<String>,
    pub format: String,
    pub issuer: String,
    pub is_file_upload: bool,
}

/// Fieldset tag carried by fields that render inside a named group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupTag {
    pub group_name: String,
    pub group_label: String,
}

/// Compiled schema for a single form field, RJSF draft-07 compatible. The
/// `required` marker is transient: the assembler hoists it to the schema root
/// and clears it before the schema is handed to a renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    #[serde(rename = "type")]
    pub schema_type: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, rename = "minLength", skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u32>,
    #[serde(default, rename = "maxLength", skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    #[serde(default, rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    #[serde(default, rename = "enumNames", skip_serializing_if = "Option::is_none")]
    pub enum_names: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,
    #[serde(default, rename = "fieldGroup", skip_serializing_if = "Option::is_none")]
    pub field_group: Option<GroupTag>,
    #[serde(default, rename = "vcMeta", skip_serializing_if = "Option::is_none")]
    pub vc_meta: Option<VcMeta>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl FieldSchema {
    /// Generic string schema titled after the declared label.
    pub fn string(title: impl Into<String>) -> Self {
        Self {
            schema_type: "string".to_string(),
            title: title.into(),
            format: None,
            pattern: None,
            min_length: None,
            max_length: None,
            enum_values: None,
            enum_names: None,
            default: None,
            required: false,
            field_group: None,
            vc_meta: None,
        }
    }

    pub fn is_document_field(&self) -> bool {
        self.vc_meta.is_some()
            || self
                .field_group
                .as_ref()
                .is_some_and(|tag| tag.group_name == DOCUMENTS_GROUP)
    }

    /// True when the selector carries no real wallet option, only the empty
    /// placeholder entry.
    pub fn has_placeholder_options_only(&self) -> bool {
        self.enum_values
            .as_deref()
            .is_some_and(|values| values.len() == 1 && values[0].is_empty())
    }
}

/// Ordered collection of named field schemas produced by one builder stage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaFragment {
    properties: Vec<(String, FieldSchema)>,
}

impl SchemaFragment {
    pub fn push(&mut self, name: impl Into<String>, schema: FieldSchema) {
        self.properties.push((name.into(), schema));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.properties.iter().any(|(existing, _)| existing == name)
    }

    pub fn get(&self, name: &str) -> Option<&FieldSchema> {
        self.properties
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, schema)| schema)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldSchema)> {
        self.properties
            .iter()
            .map(|(name, schema)| (name.as_str(), schema))
    }

    pub fn into_properties(self) -> Vec<(String, FieldSchema)> {
        self.properties
    }
}
