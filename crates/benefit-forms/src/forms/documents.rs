use std::collections::HashSet;

use tracing::warn;

use super::domain::{
    FieldSchema, GroupTag, SchemaFragment, VcMeta, DOCUMENTS_GROUP, DOCUMENTS_GROUP_LABEL,
    FALLBACK_ISSUER, GENERIC_DOCUMENT_TYPE, VC_DOCUMENT_FORMAT,
};
use super::domain::WalletDocument;
use super::grouping::{group_by_proof_set, ProofGroup};
use super::heuristics::{humanize_proof_label, is_file_upload_field};
use super::rules::NormalizedRules;
use super::wallet::{match_documents, DocumentOptions};

/// Duplicate-name guard threaded through one compilation pass. Scoped to the
/// pass so concurrent compilations never share state.
#[derive(Debug, Default)]
struct FieldAccumulator {
    fragment: SchemaFragment,
    created: HashSet<String>,
}

impl FieldAccumulator {
    /// Adds a field unless the name was already taken; the second occurrence
    /// is discarded with a warning, never silently overwritten.
    fn insert(&mut self, name: String, schema: FieldSchema) {
        if self.created.contains(&name) {
            warn!(field = %name, "skipped duplicate document field");
            return;
        }
        self.created.insert(name.clone());
        self.fragment.push(name, schema);
    }

    fn contains(&self, name: &str) -> bool {
        self.created.contains(name)
    }
}

/// Generates document selector fields from the normalized rules and the
/// applicant's wallet.
///
/// Tie-break policy, coarsest field first:
/// 1. a proof group whose every proof is backed by a document rule collapses
///    to one required selector named from the joined criterion names;
/// 2. otherwise each member criterion gets its own selector (`name_doc` when
///    it accepts several proofs, `name_proof_doc` when exactly one);
/// 3. document rules whose proofs no group consumed get a selector per proof,
///    named by the proof itself.
pub fn build_document_schema(rules: &NormalizedRules, wallet: &[WalletDocument]) -> SchemaFragment {
    let mut acc = FieldAccumulator::default();
    let groups = group_by_proof_set(&rules.criteria);

    for group in &groups {
        compile_group(group, rules, wallet, &mut acc);
    }

    compile_leftover_documents(&groups, rules, wallet, &mut acc);

    acc.fragment
}

fn compile_group(
    group: &ProofGroup,
    rules: &NormalizedRules,
    wallet: &[WalletDocument],
    acc: &mut FieldAccumulator,
) {
    let mut matched_types: Vec<&str> = Vec::new();
    let all_present = group.allowed_proofs.iter().all(|proof| {
        match rules.resolve_proof(proof) {
            Some(entry) => {
                matched_types.push(entry.document_type.as_str());
                true
            }
            None => false,
        }
    });

    if all_present && !group.criterion_names.is_empty() {
        let field_name = format!("{}_doc", group.criterion_names.join("_"));
        let document_type = uniform_document_type(&matched_types);

        let names = group.criterion_names.join(", ");
        let label = if document_type == GENERIC_DOCUMENT_TYPE {
            format!("Choose document for {names}")
        } else {
            format!("Choose document for {names}, {document_type}")
        };

        let vc_meta = VcMeta {
            submission_reasons: group.criterion_names.clone(),
            document_type,
            document_subtype: group.allowed_proofs.first().cloned(),
            format: VC_DOCUMENT_FORMAT.to_string(),
            issuer: FALLBACK_ISSUER.to_string(),
            is_file_upload: is_file_upload_field(&field_name),
        };

        let options = match_documents(&group.allowed_proofs, wallet);
        let proofs_label = group.allowed_proofs.join(" / ");
        let field = document_field(label, true, options, vc_meta, Some(&proofs_label));
        acc.insert(field_name, field);
        return;
    }

    // Precondition failed: split back into per-criterion selectors.
    for criterion in &group.members {
        if criterion.allowed_proofs.len() > 1 {
            let field_name = format!("{}_doc", criterion.criterion_name);
            let vc_meta = VcMeta {
                submission_reasons: vec![criterion.criterion_name.clone()],
                document_type: GENERIC_DOCUMENT_TYPE.to_string(),
                document_subtype: criterion.allowed_proofs.first().cloned(),
                format: VC_DOCUMENT_FORMAT.to_string(),
                issuer: FALLBACK_ISSUER.to_string(),
                is_file_upload: is_file_upload_field(&field_name),
            };

            let options = match_documents(&criterion.allowed_proofs, wallet);
            let proofs_label = criterion.allowed_proofs.join(" / ");
            let field = document_field(
                format!("Choose document for {}", criterion.criterion_name),
                true,
                options,
                vc_meta,
                Some(&proofs_label),
            );
            acc.insert(field_name, field);
        } else {
            for proof in &criterion.allowed_proofs {
                let field_name = format!("{}_{}_doc", criterion.criterion_name, proof);
                let vc_meta = VcMeta {
                    submission_reasons: vec![criterion.criterion_name.clone()],
                    document_type: GENERIC_DOCUMENT_TYPE.to_string(),
                    document_subtype: Some(proof.clone()),
                    format: VC_DOCUMENT_FORMAT.to_string(),
                    issuer: FALLBACK_ISSUER.to_string(),
                    is_file_upload: is_file_upload_field(&field_name),
                };

                let options = match_documents(std::slice::from_ref(proof), wallet);
                let field = document_field(
                    format!("Choose document for {}", criterion.criterion_name),
                    true,
                    options,
                    vc_meta,
                    Some(proof),
                );
                acc.insert(field_name, field);
            }
        }
    }
}

/// Adds selectors for required-document rules not already represented by an
/// eligibility group. Mandatory rules are processed before optional ones so a
/// proof shared by both keeps the mandatory field.
fn compile_leftover_documents(
    groups: &[ProofGroup],
    rules: &NormalizedRules,
    wallet: &[WalletDocument],
    acc: &mut FieldAccumulator,
) {
    let mut ordered = rules.required_docs.clone();
    ordered.sort_by_key(|doc| !doc.is_required);

    for doc in &ordered {
        for proof in &doc.allowed_proofs {
            let in_multi_proof_group = groups
                .iter()
                .any(|group| group.allowed_proofs.len() > 1 && group.allowed_proofs.contains(proof));

            if !in_multi_proof_group {
                let covered_by_group = groups
                    .iter()
                    .any(|group| group.allowed_proofs.contains(proof));
                if covered_by_group {
                    continue;
                }
            }

            if acc.contains(proof) {
                continue;
            }

            let vc_meta = VcMeta {
                submission_reasons: vec![doc.document_type.clone()],
                document_type: doc.document_type.clone(),
                document_subtype: Some(proof.clone()),
                format: VC_DOCUMENT_FORMAT.to_string(),
                issuer: FALLBACK_ISSUER.to_string(),
                is_file_upload: is_file_upload_field(proof),
            };

            let options = match_documents(std::slice::from_ref(proof), wallet);
            let field = document_field(
                format!("Choose document for {}", doc.document_type),
                doc.is_required,
                options,
                vc_meta,
                Some(proof),
            );
            acc.insert(proof.clone(), field);
        }
    }
}

/// Document type shown on a merged selector: the single distinct type matched
/// across the group's proofs, or the generic label when types disagree.
fn uniform_document_type(matched_types: &[&str]) -> String {
    let mut distinct: Vec<&str> = Vec::new();
    for document_type in matched_types {
        if !document_type.is_empty() && !distinct.contains(document_type) {
            distinct.push(document_type);
        }
    }

    if distinct.len() == 1 {
        distinct[0].to_string()
    } else {
        GENERIC_DOCUMENT_TYPE.to_string()
    }
}

fn document_field(
    title: String,
    required: bool,
    options: DocumentOptions,
    vc_meta: VcMeta,
    proofs_label: Option<&str>,
) -> FieldSchema {
    let title = match proofs_label {
        Some(proofs) => format!("{title} ({})", humanize_proof_label(proofs)),
        None => title,
    };

    // An empty wallet match still renders a selector, with a lone placeholder
    // option, so required fields can be flagged missing instead of vanishing.
    let values = if options.values.is_empty() {
        vec![String::new()]
    } else {
        options.values
    };

    let mut field = FieldSchema::string(title);
    field.required = required;
    field.default = values.first().cloned();
    field.enum_values = Some(values);
    field.enum_names = Some(options.names);
    field.field_group = Some(GroupTag {
        group_name: DOCUMENTS_GROUP.to_string(),
        group_label: DOCUMENTS_GROUP_LABEL.to_string(),
    });
    field.vc_meta = Some(vc_meta);
    field
}
