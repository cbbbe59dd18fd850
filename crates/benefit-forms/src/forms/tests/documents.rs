use super::common::*;
use serde_json::Value;

#[test]
fn shared_proof_set_collapses_to_one_required_selector() {
    // Scenario: two criteria accept the same evidence, backed by a mandatory
    // document rule; one merged field, never one per criterion.
    let rules = vec![
        criterion_rule("income", &["incomeCert"]),
        criterion_rule("residency", &["incomeCert"]),
        document_rule("incomeCert", &["incomeCert"], true),
    ];
    let wallet = vec![wallet_doc(
        "w1",
        "incomeCertificate",
        "incomeCert",
        "data-1",
        "https://issuer.gov",
    )];

    let form = compile_documents(&rules, &wallet);

    let field = form.field("income_residency_doc").expect("merged selector");
    assert_eq!(form.document_fields, vec!["income_residency_doc"]);
    assert_eq!(form.required, vec!["income_residency_doc"]);
    assert_eq!(field.enum_values.as_deref(), Some(&["data-1".to_string()][..]));
    assert_eq!(field.default.as_deref(), Some("data-1"));

    let meta = field.vc_meta.as_ref().expect("vc metadata");
    assert_eq!(meta.submission_reasons, vec!["income", "residency"]);
    assert_eq!(meta.document_type, "incomeCert");
    assert!(field.title.contains("income, residency"));
}

#[test]
fn mixed_document_types_use_generic_label() {
    let rules = vec![
        criterion_rule("income", &["incomeCert", "rationCard"]),
        document_rule("incomeCertificate", &["incomeCert"], true),
        document_rule("rationCardRecord", &["rationCard"], false),
    ];

    let form = compile_documents(&rules, &[]);

    let field = form.field("income_doc").expect("selector exists");
    let meta = field.vc_meta.as_ref().expect("vc metadata");
    assert_eq!(meta.document_type, "eligibilityCriteria");
    assert!(!field.title.contains("eligibilityCriteria"));
}

#[test]
fn unbacked_multi_proof_criterion_falls_back_to_per_criterion_selector() {
    let rules = vec![criterion_rule("income", &["incomeCert", "rationCard"])];

    let form = compile_documents(&rules, &[]);

    let field = form.field("income_doc").expect("fallback selector");
    let meta = field.vc_meta.as_ref().expect("vc metadata");
    assert_eq!(meta.document_type, "eligibilityCriteria");
    assert_eq!(meta.submission_reasons, vec!["income"]);
}

#[test]
fn unbacked_single_proof_criterion_gets_per_proof_field() {
    let rules = vec![criterion_rule("caste", &["casteCert"])];

    let form = compile_documents(&rules, &[]);

    assert!(form.field("caste_casteCert_doc").is_some());
    assert!(form.field("caste_doc").is_none());
}

#[test]
fn empty_wallet_match_renders_placeholder_selector() {
    // Scenario C: no wallet entries for the proof; the field still exists with
    // a lone empty option and is reported missing, not an error.
    let rules = vec![criterion_rule("caste", &["casteCert"])];

    let form = compile_documents(&rules, &[]);

    let field = form.field("caste_casteCert_doc").expect("selector exists");
    assert_eq!(field.enum_values.as_deref(), Some(&[String::new()][..]));
    assert_eq!(field.default.as_deref(), Some(""));

    let missing = form.missing_documents();
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].field, "caste_casteCert_doc");
    assert!(missing[0].message.contains("does not have a document"));
}

#[test]
fn duplicate_document_rules_produce_one_field() {
    // Scenario D: the same document type/proof pair declared twice.
    let rules = vec![
        document_rule("casteCertificate", &["casteCert"], true),
        document_rule("casteCertificate", &["casteCert"], true),
    ];

    let form = compile_documents(&rules, &[]);

    assert_eq!(form.document_fields, vec!["casteCert"]);
    assert_eq!(form.required, vec!["casteCert"]);
}

#[test]
fn standalone_document_rules_create_proof_named_fields() {
    let rules = vec![
        document_rule("photoIdentity", &["aadhaar"], true),
        document_rule("addressProof", &["rationCard"], false),
    ];
    let wallet = vec![wallet_doc(
        "w2",
        "aadhaarCard",
        "aadhaar",
        "data-2",
        "https://uidai.gov.in",
    )];

    let form = compile_documents(&rules, &wallet);

    let mandatory = form.field("aadhaar").expect("mandatory selector");
    assert!(form.required.contains(&"aadhaar".to_string()));
    assert_eq!(mandatory.enum_values.as_deref(), Some(&["data-2".to_string()][..]));

    let optional = form.field("rationCard").expect("optional selector");
    assert!(!form.required.contains(&"rationCard".to_string()));
    assert!(optional.has_placeholder_options_only());
}

#[test]
fn proofs_covered_by_a_group_are_not_duplicated_as_leftovers() {
    let rules = vec![
        criterion_rule("income", &["incomeCert"]),
        document_rule("incomeCert", &["incomeCert"], true),
    ];

    let form = compile_documents(&rules, &[]);

    assert!(form.field("income_doc").is_some());
    assert!(form.field("incomeCert").is_none());
}

#[test]
fn proofs_shared_with_multi_proof_groups_still_get_their_own_field() {
    // The group could not collapse (rationCard is unbacked), so the mandatory
    // incomeCert rule must keep its own selector next to the fallback field.
    let rules = vec![
        criterion_rule("income", &["incomeCert", "rationCard"]),
        document_rule("incomeCertificate", &["incomeCert"], true),
    ];

    let form = compile_documents(&rules, &[]);

    assert!(form.field("income_doc").is_some());
    assert!(form.field("incomeCert").is_some());
}

#[test]
fn malformed_rules_are_skipped_without_aborting_compilation() {
    let rules = vec![
        serde_json::json!({ "criteria": { "name": "income" } }),
        serde_json::json!("not even an object"),
        serde_json::json!({ "allowedProofs": ["orphanProof"] }),
        criterion_rule("caste", &["casteCert"]),
    ];

    let form = compile_documents(&rules, &[]);

    assert_eq!(form.document_fields, vec!["caste_casteCert_doc"]);
}

#[test]
fn selector_titles_humanize_proof_lists() {
    let rules = vec![criterion_rule("income", &["incomeCert", "rationCard"])];

    let form = compile_documents(&rules, &[]);

    let field = form.field("income_doc").expect("selector exists");
    assert!(field.title.ends_with("(Income Cert / Ration Card)"));
}

#[test]
fn schema_value_hides_vc_metadata_internals_from_required_markers() {
    let rules = vec![
        criterion_rule("income", &["incomeCert"]),
        document_rule("incomeCert", &["incomeCert"], true),
    ];

    let form = compile_documents(&rules, &[]);
    let schema = form.schema_value();

    let properties = schema
        .get("properties")
        .and_then(Value::as_object)
        .expect("properties object");
    let field = properties
        .get("income_doc")
        .and_then(Value::as_object)
        .expect("field object");
    // per-property required markers are hoisted to the root, RJSF-style
    assert!(!field.contains_key("required"));
    assert_eq!(
        schema.get("required"),
        Some(&serde_json::json!(["income_doc"]))
    );
}
