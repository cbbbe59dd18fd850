use super::domain::{ApplicationField, ApplicationFields, FieldGroup, FieldSchema, GroupTag, SchemaFragment};

/// Converts the declared application-form fields into a schema fragment.
/// Grouped declarations tag each field with its fieldset so the assembler can
/// reconstruct rendering order; flat declarations produce untagged fields.
pub fn build_application_schema(fields: &ApplicationFields) -> SchemaFragment {
    let mut fragment = SchemaFragment::default();

    match fields {
        ApplicationFields::Flat(list) => {
            for field in list {
                fragment.push(field.name.clone(), field_schema(field));
            }
        }
        ApplicationFields::Grouped(groups) => {
            for group in groups {
                for field in &group.fields {
                    let mut schema = field_schema(field);
                    schema.field_group = Some(GroupTag {
                        group_name: group.name.clone(),
                        group_label: group.label.clone(),
                    });
                    fragment.push(field.name.clone(), schema);
                }
            }
        }
    }

    fragment
}

/// Buckets raw declarations by their `fieldsGroupName`, preserving first-seen
/// group order. Fields without a group land in the `default` fieldset.
pub fn group_fields(fields: Vec<ApplicationField>) -> ApplicationFields {
    let mut groups: Vec<FieldGroup> = Vec::new();

    for field in fields {
        let name = field
            .fields_group_name
            .clone()
            .unwrap_or_else(|| "default".to_string());
        let label = field
            .fields_group_label
            .clone()
            .unwrap_or_else(|| "Form Fields".to_string());

        match groups.iter_mut().find(|group| group.name == name) {
            Some(group) => group.fields.push(field),
            None => groups.push(FieldGroup {
                name,
                label,
                fields: vec![field],
            }),
        }
    }

    ApplicationFields::Grouped(groups)
}

/// Builds one field schema, applying the validation template for well-known
/// field names. Unknown names fall through to a plain string schema.
fn field_schema(field: &ApplicationField) -> FieldSchema {
    let mut schema = FieldSchema::string(field.label.clone());

    match field.name.as_str() {
        "bankAccountNumber" => {
            schema.min_length = Some(9);
            schema.max_length = Some(18);
            schema.pattern = Some("^[0-9]+$".to_string());
            fallback_title(&mut schema, "Enter valid bank account number (9-18 digits)");
        }
        "bankIfscCode" => {
            schema.pattern = Some("^[A-Z]{4}0[A-Z0-9]{6}$".to_string());
            fallback_title(&mut schema, "Enter valid IFSC code (e.g., SBIN0001234)");
        }
        "email" => {
            schema.pattern = Some("^[^\\s@]+@[^\\s@]+\\.[^\\s@]+$".to_string());
            fallback_title(&mut schema, "Enter valid email address");
        }
        "phone" | "mobileNumber" => {
            schema.pattern = Some("^\\+91[6-9]\\d{9}$".to_string());
            fallback_title(&mut schema, "Enter valid phone number (+91XXXXXXXXXX)");
        }
        "dateOfBirth" => {
            schema.format = Some("date".to_string());
            fallback_title(&mut schema, "Date of Birth");
        }
        "panCard" => {
            schema.pattern = Some("^[A-Z]{5}[0-9]{4}[A-Z]{1}$".to_string());
            fallback_title(&mut schema, "Enter valid PAN card (e.g., ABCDE1234F)");
        }
        "aadharCard" | "uidai" => {
            schema.pattern = Some("^[0-9]{12}$".to_string());
            fallback_title(&mut schema, "Enter valid Aadhar number (12 digits)");
        }
        "pincode" | "postalCode" => {
            schema.pattern = Some("^[0-9]{6}$".to_string());
            fallback_title(&mut schema, "Enter valid PIN code (6 digits)");
        }
        _ => {}
    }

    if field.field_type == "radio" || field.field_type == "select" {
        if let Some(options) = &field.options {
            schema.enum_values = Some(options.iter().map(|option| option.value.clone()).collect());
            schema.enum_names = Some(options.iter().map(|option| option.label.clone()).collect());
        }
    }

    if field.required {
        schema.required = true;
    }

    schema
}

fn fallback_title(schema: &mut FieldSchema, title: &str) {
    if schema.title.is_empty() {
        schema.title = title.to_string();
    }
}
