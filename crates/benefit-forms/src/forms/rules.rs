use serde_json::Value;
use tracing::debug;

use super::domain::{EligibilityCriterion, RawRule, RequiredDocument};

/// Mapping from proof type to the document type of the rule that declared it.
/// First-seen wins; duplicate proof/type pairs are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProofIndex {
    entries: Vec<ProofEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofEntry {
    pub document_type: String,
    pub proof: String,
}

impl ProofIndex {
    fn insert(&mut self, document_type: &str, proof: &str) {
        let duplicate = self
            .entries
            .iter()
            .any(|entry| entry.document_type == document_type && entry.proof == proof);
        if !duplicate {
            self.entries.push(ProofEntry {
                document_type: document_type.to_string(),
                proof: proof.to_string(),
            });
        }
    }

    pub fn lookup(&self, proof: &str) -> Option<&ProofEntry> {
        self.entries.iter().find(|entry| entry.proof == proof)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Rule feed split into its two populations plus the proof lookup indexes that
/// drive the grouping tie-break.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedRules {
    pub criteria: Vec<EligibilityCriterion>,
    pub required_docs: Vec<RequiredDocument>,
    pub mandatory: ProofIndex,
    pub optional: ProofIndex,
}

impl NormalizedRules {
    /// Resolves a proof against the document indexes. The optional index is
    /// consulted first, then the mandatory one; downstream field labeling
    /// depends on this order.
    pub fn resolve_proof(&self, proof: &str) -> Option<&ProofEntry> {
        self.optional
            .lookup(proof)
            .or_else(|| self.mandatory.lookup(proof))
    }
}

/// Partitions a raw rule feed into eligibility criteria and required-document
/// rules. Entries that fail to decode are skipped so one malformed rule never
/// aborts compilation of the rest.
pub fn normalize(raw_rules: &[Value]) -> NormalizedRules {
    let mut normalized = NormalizedRules::default();

    for (position, value) in raw_rules.iter().enumerate() {
        let rule: RawRule = match serde_json::from_value(value.clone()) {
            Ok(rule) => rule,
            Err(reason) => {
                debug!(position, %reason, "skipped malformed rule entry");
                continue;
            }
        };

        match rule {
            RawRule::Criterion {
                criteria,
                allowed_proofs,
                is_required,
            } => normalized.criteria.push(EligibilityCriterion {
                criterion_name: criteria.name,
                allowed_proofs,
                is_required,
            }),
            RawRule::Document {
                document_type,
                allowed_proofs,
                is_required,
            } => normalized.required_docs.push(RequiredDocument {
                document_type,
                allowed_proofs,
                is_required,
            }),
        }
    }

    for doc in &normalized.required_docs {
        let index = if doc.is_required {
            &mut normalized.mandatory
        } else {
            &mut normalized.optional
        };
        for proof in &doc.allowed_proofs {
            index.insert(&doc.document_type, proof);
        }
    }

    normalized
}
