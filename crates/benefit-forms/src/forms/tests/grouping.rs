use crate::forms::domain::EligibilityCriterion;
use crate::forms::grouping::group_by_proof_set;

fn criterion(name: &str, proofs: &[&str]) -> EligibilityCriterion {
    EligibilityCriterion {
        criterion_name: name.to_string(),
        allowed_proofs: proofs.iter().map(|proof| proof.to_string()).collect(),
        is_required: None,
    }
}

#[test]
fn criteria_with_identical_proof_sets_merge() {
    let groups = group_by_proof_set(&[
        criterion("income", &["incomeCert"]),
        criterion("residency", &["incomeCert"]),
    ]);

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].criterion_names, vec!["income", "residency"]);
}

#[test]
fn proof_set_equality_ignores_declaration_order() {
    let groups = group_by_proof_set(&[
        criterion("income", &["incomeCert", "rationCard"]),
        criterion("caste", &["rationCard", "incomeCert"]),
    ]);

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].criterion_names, vec!["income", "caste"]);
    // proofs keep the first member's declaration order
    assert_eq!(groups[0].allowed_proofs, vec!["incomeCert", "rationCard"]);
}

#[test]
fn distinct_proof_sets_stay_separate() {
    let groups = group_by_proof_set(&[
        criterion("income", &["incomeCert"]),
        criterion("caste", &["casteCert"]),
        criterion("age", &["incomeCert", "casteCert"]),
    ]);

    assert_eq!(groups.len(), 3);
}

#[test]
fn groups_emit_in_first_seen_order() {
    let groups = group_by_proof_set(&[
        criterion("b", &["proofB"]),
        criterion("a", &["proofA"]),
        criterion("c", &["proofB"]),
    ]);

    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].criterion_names, vec!["b", "c"]);
    assert_eq!(groups[1].criterion_names, vec!["a"]);
}
