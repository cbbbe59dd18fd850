use std::collections::HashMap;

use super::domain::EligibilityCriterion;

/// Criteria sharing an identical allowed-proof set, merged so several criteria
/// accepting the same evidence render as one selector instead of one each.
/// Compiler-internal; discarded once document fields are generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofGroup {
    /// Canonical serialization of the sorted proof set; the grouping key.
    pub key: String,
    /// Criterion names in feed order.
    pub criterion_names: Vec<String>,
    /// Proof set as declared by the group's first member.
    pub allowed_proofs: Vec<String>,
    pub members: Vec<EligibilityCriterion>,
}

/// Groups criteria by order-insensitive proof-set equality. Groups are emitted
/// in first-seen order so generated field names stay deterministic.
pub fn group_by_proof_set(criteria: &[EligibilityCriterion]) -> Vec<ProofGroup> {
    let mut groups: Vec<ProofGroup> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for criterion in criteria {
        let key = proof_set_key(&criterion.allowed_proofs);

        match positions.get(&key) {
            Some(&index) => {
                let group = &mut groups[index];
                group.criterion_names.push(criterion.criterion_name.clone());
                group.members.push(criterion.clone());
            }
            None => {
                positions.insert(key.clone(), groups.len());
                groups.push(ProofGroup {
                    key,
                    criterion_names: vec![criterion.criterion_name.clone()],
                    allowed_proofs: criterion.allowed_proofs.clone(),
                    members: vec![criterion.clone()],
                });
            }
        }
    }

    groups
}

/// Two criteria land in the same group iff their proof sets are set-equal.
pub(crate) fn proof_set_key(proofs: &[String]) -> String {
    let mut sorted = proofs.to_vec();
    sorted.sort();
    serde_json::to_string(&sorted).expect("string vector serializes")
}
