/// Field-name substrings that mark a document field as a raw file upload
/// rather than a wallet-backed credential. The same table is consulted at
/// compile time (to stamp `vcMeta.isFileUpload`) and at reclassification, so
/// the two stages can never disagree.
const FILE_UPLOAD_PATTERNS: [&str; 9] = [
    "photo",
    "image",
    "picture",
    "pic",
    "icard",
    "passport",
    "signature",
    "selfie",
    "upload",
];

pub fn is_file_upload_field(field_name: &str) -> bool {
    let lowered = field_name.to_lowercase();
    FILE_UPLOAD_PATTERNS
        .iter()
        .any(|pattern| lowered.contains(pattern))
}

/// Turns a `/`-separated proof list into a display label: camelCase segments
/// become spaced Title Case, e.g. `incomeCert/rationCard` -> `Income Cert / Ration Card`.
pub(crate) fn humanize_proof_label(proofs: &str) -> String {
    proofs
        .split('/')
        .map(|segment| title_case(&space_camel_case(segment.trim())))
        .collect::<Vec<_>>()
        .join(" / ")
}

fn space_camel_case(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len() + 4);
    let mut prev_lower = false;
    for ch in segment.chars() {
        if prev_lower && ch.is_ascii_uppercase() {
            out.push(' ');
        }
        prev_lower = ch.is_ascii_lowercase();
        out.push(ch);
    }
    out
}

fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for ch in text.chars() {
        if at_word_start {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
        // Any non-alphanumeric separator starts a new word, not just spaces.
        at_word_start = !ch.is_alphanumeric();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_patterns_match_case_insensitively() {
        assert!(is_file_upload_field("photoUpload"));
        assert!(is_file_upload_field("applicantSignature"));
        assert!(is_file_upload_field("PassportScan"));
        assert!(!is_file_upload_field("incomeCert"));
        assert!(!is_file_upload_field("residency_doc"));
    }

    #[test]
    fn proof_labels_are_humanized() {
        assert_eq!(humanize_proof_label("incomeCert"), "Income Cert");
        assert_eq!(
            humanize_proof_label("incomeCert/rationCard"),
            "Income Cert / Ration Card"
        );
        assert_eq!(humanize_proof_label(" casteCert "), "Caste Cert");
    }

    #[test]
    fn hyphenated_proof_names_title_case_every_word() {
        assert_eq!(humanize_proof_label("e-shram"), "E-Shram");
        assert_eq!(humanize_proof_label("e-shramCard"), "E-Shram Card");
        assert_eq!(humanize_proof_label("below_poverty_line"), "Below_Poverty_Line");
    }
}
