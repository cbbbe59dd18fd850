use serde_json::{json, Map, Value};
use tracing::warn;

use super::domain::{FieldSchema, SchemaFragment, DOCUMENTS_GROUP, SYSTEM_FIELDS};

/// Fully assembled form: merged properties, hoisted `required` list, and the
/// rendering side channel. Pure function of its inputs; compiling the same
/// inputs twice yields byte-identical serialized output.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledForm {
    pub title: String,
    properties: Vec<(String, FieldSchema)>,
    pub required: Vec<String>,
    pub ui: UiHints,
    /// Names of fields that reclassification must treat as documents.
    pub document_fields: Vec<String>,
}

/// Ordering/grouping metadata kept outside the JSON Schema, RJSF-style.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiHints {
    pub order: Vec<String>,
    pub groups: Vec<UiGroup>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiGroup {
    pub name: String,
    pub label: String,
    pub fields: Vec<String>,
}

/// A required document selector with no wallet entry to offer.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct MissingDocument {
    pub field: String,
    pub message: String,
}

/// Merges the application and document fragments into the final form.
///
/// Name collisions keep the first-seen field and log the drop. The root
/// `required` list is computed from per-field markers, which are cleared
/// afterwards; the markers never reach the serialized schema.
pub fn assemble(title: &str, application: SchemaFragment, documents: SchemaFragment) -> CompiledForm {
    let mut properties = application.into_properties();

    for (name, schema) in documents.into_properties() {
        if properties.iter().any(|(existing, _)| existing == &name) {
            warn!(field = %name, "dropped colliding document field");
            continue;
        }
        properties.push((name, schema));
    }

    let document_fields: Vec<String> = properties
        .iter()
        .filter(|(_, schema)| schema.is_document_field())
        .map(|(name, _)| name.clone())
        .collect();

    let mut required = Vec::new();
    for (name, schema) in &mut properties {
        if schema.required {
            required.push(name.clone());
            schema.required = false;
        }
    }

    let ui = build_ui_hints(&properties, &document_fields);

    CompiledForm {
        title: title.to_string(),
        properties,
        required,
        ui,
        document_fields,
    }
}

/// Stable partition into rendering order: personal fieldsets in declaration
/// order, ungrouped personal fields, the documents fieldset, then any
/// ungrouped document fields. Documents always render last.
fn build_ui_hints(properties: &[(String, FieldSchema)], document_fields: &[String]) -> UiHints {
    let mut groups: Vec<UiGroup> = Vec::new();
    let mut ungrouped: Vec<String> = Vec::new();

    for (name, schema) in properties {
        match &schema.field_group {
            Some(tag) => match groups.iter_mut().find(|group| group.name == tag.group_name) {
                Some(group) => group.fields.push(name.clone()),
                None => groups.push(UiGroup {
                    name: tag.group_name.clone(),
                    label: tag.group_label.clone(),
                    fields: vec![name.clone()],
                }),
            },
            None => ungrouped.push(name.clone()),
        }
    }

    let mut order: Vec<String> = Vec::new();

    for group in groups.iter().filter(|group| group.name != DOCUMENTS_GROUP) {
        order.extend(group.fields.iter().cloned());
    }

    order.extend(
        ungrouped
            .iter()
            .filter(|name| !document_fields.contains(name))
            .cloned(),
    );

    if let Some(documents) = groups.iter().find(|group| group.name == DOCUMENTS_GROUP) {
        order.extend(documents.fields.iter().cloned());
    }

    order.extend(
        ungrouped
            .iter()
            .filter(|name| document_fields.contains(name))
            .cloned(),
    );

    UiHints { order, groups }
}

impl CompiledForm {
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.properties
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, schema)| schema)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|(name, _)| name.as_str())
    }

    pub fn properties(&self) -> impl Iterator<Item = (&str, &FieldSchema)> {
        self.properties
            .iter()
            .map(|(name, schema)| (name.as_str(), schema))
    }

    /// Field names reclassification treats as plain personal data.
    pub fn personal_fields(&self) -> Vec<String> {
        self.properties
            .iter()
            .map(|(name, _)| name.clone())
            .filter(|name| {
                !self.document_fields.contains(name) && !SYSTEM_FIELDS.contains(&name.as_str())
            })
            .collect()
    }

    /// Required selectors left with only the placeholder option; surfaced as
    /// validation hints alongside the compiled schema, never as an error.
    pub fn missing_documents(&self) -> Vec<MissingDocument> {
        self.properties
            .iter()
            .filter(|(_, schema)| {
                schema.vc_meta.is_some() && schema.has_placeholder_options_only()
            })
            .map(|(name, _)| MissingDocument {
                field: name.clone(),
                message: format!("{name} does not have a document"),
            })
            .collect()
    }

    /// JSON Schema object handed to the form renderer. Property order follows
    /// compile order.
    pub fn schema_value(&self) -> Value {
        let mut properties = Map::new();
        for (name, schema) in &self.properties {
            properties.insert(
                name.clone(),
                serde_json::to_value(schema).unwrap_or(Value::Null),
            );
        }

        json!({
            "title": self.title,
            "type": "object",
            "properties": Value::Object(properties),
            "required": self.required,
        })
    }

    /// RJSF ui schema: `ui:order` plus per-field fieldset tags, the first
    /// member of each group marked so renderers can open the fieldset there.
    pub fn ui_value(&self) -> Value {
        let mut ui = Map::new();
        ui.insert(
            "ui:order".to_string(),
            json!(self.ui.order),
        );

        for group in &self.ui.groups {
            for (position, field) in group.fields.iter().enumerate() {
                ui.insert(
                    field.clone(),
                    json!({
                        "ui:group": group.name,
                        "ui:groupLabel": group.label,
                        "ui:groupFirst": position == 0,
                    }),
                );
            }
        }

        Value::Object(ui)
    }
}
