use super::common::*;
use crate::forms::domain::{ApplicationFields, FieldGroup};
use crate::forms::fields::{build_application_schema, group_fields};

#[test]
fn bank_account_template_applies_length_and_pattern() {
    let fields = ApplicationFields::Flat(vec![text_field("bankAccountNumber", "", true)]);
    let fragment = build_application_schema(&fields);

    let schema = fragment.get("bankAccountNumber").expect("field exists");
    assert_eq!(schema.min_length, Some(9));
    assert_eq!(schema.max_length, Some(18));
    assert_eq!(schema.pattern.as_deref(), Some("^[0-9]+$"));
    assert_eq!(schema.title, "Enter valid bank account number (9-18 digits)");
    assert!(schema.required);
}

#[test]
fn declared_label_wins_over_template_title() {
    let fields = ApplicationFields::Flat(vec![text_field("email", "Applicant email", false)]);
    let fragment = build_application_schema(&fields);

    let schema = fragment.get("email").expect("field exists");
    assert_eq!(schema.title, "Applicant email");
    assert!(schema.pattern.is_some());
}

#[test]
fn unknown_field_names_get_generic_string_schema() {
    let fields = ApplicationFields::Flat(vec![text_field("fatherName", "Father's name", false)]);
    let fragment = build_application_schema(&fields);

    let schema = fragment.get("fatherName").expect("field exists");
    assert_eq!(schema.schema_type, "string");
    assert!(schema.pattern.is_none());
    assert!(schema.format.is_none());
}

#[test]
fn date_of_birth_uses_date_format() {
    let fields = ApplicationFields::Flat(vec![text_field("dateOfBirth", "", false)]);
    let fragment = build_application_schema(&fields);

    let schema = fragment.get("dateOfBirth").expect("field exists");
    assert_eq!(schema.format.as_deref(), Some("date"));
    assert_eq!(schema.title, "Date of Birth");
}

#[test]
fn select_fields_preserve_option_order() {
    let fields = ApplicationFields::Flat(vec![select_field(
        "gender",
        "Gender",
        &[("male", "Male"), ("female", "Female"), ("other", "Other")],
    )]);
    let fragment = build_application_schema(&fields);

    let schema = fragment.get("gender").expect("field exists");
    assert_eq!(
        schema.enum_values.as_deref(),
        Some(&["male".to_string(), "female".to_string(), "other".to_string()][..])
    );
    assert_eq!(
        schema.enum_names.as_deref(),
        Some(&["Male".to_string(), "Female".to_string(), "Other".to_string()][..])
    );
}

#[test]
fn grouped_fields_carry_fieldset_tags() {
    let fields = ApplicationFields::Grouped(vec![FieldGroup {
        name: "personal".to_string(),
        label: "Personal Information".to_string(),
        fields: vec![text_field("firstName", "First name", true)],
    }]);
    let fragment = build_application_schema(&fields);

    let schema = fragment.get("firstName").expect("field exists");
    let tag = schema.field_group.as_ref().expect("fieldset tag present");
    assert_eq!(tag.group_name, "personal");
    assert_eq!(tag.group_label, "Personal Information");
}

#[test]
fn group_fields_buckets_by_declared_group_in_first_seen_order() {
    let mut first = text_field("firstName", "First name", true);
    first.fields_group_name = Some("personal".to_string());
    first.fields_group_label = Some("Personal Information".to_string());

    let ungrouped = text_field("remarks", "Remarks", false);

    let mut second = text_field("bankAccountNumber", "", true);
    second.fields_group_name = Some("banking".to_string());
    second.fields_group_label = Some("Bank Details".to_string());

    let mut third = text_field("lastName", "Last name", false);
    third.fields_group_name = Some("personal".to_string());
    third.fields_group_label = Some("Personal Information".to_string());

    let grouped = group_fields(vec![first, ungrouped, second, third]);

    let ApplicationFields::Grouped(groups) = grouped else {
        panic!("expected grouped fields");
    };
    assert_eq!(groups.len(), 3);
    assert_eq!(groups[0].name, "personal");
    assert_eq!(groups[0].fields.len(), 2);
    assert_eq!(groups[1].name, "default");
    assert_eq!(groups[1].label, "Form Fields");
    assert_eq!(groups[2].name, "banking");
}
