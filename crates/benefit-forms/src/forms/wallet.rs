use super::domain::WalletDocument;

/// Parallel value/label arrays backing a document selector, in wallet order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentOptions {
    pub values: Vec<String>,
    pub names: Vec<String>,
}

impl DocumentOptions {
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Selects the wallet entries whose subtype matches one of the proof types.
/// No match yields empty arrays, never an error; the caller renders a
/// placeholder selector so the field still exists and can be flagged missing.
pub fn match_documents(proof_types: &[String], wallet: &[WalletDocument]) -> DocumentOptions {
    let mut options = DocumentOptions::default();

    for doc in wallet {
        if proof_types.iter().any(|proof| proof == &doc.doc_subtype) {
            options.values.push(doc.doc_data.clone());
            options.names.push(doc.doc_subtype.clone());
        }
    }

    options
}

/// Looks up the wallet entry a filled selector value refers to. Selector
/// values carry `doc_data`; `doc_id` is accepted as well for pre-filled
/// submissions that referenced documents by id.
pub fn find_by_selection<'a>(
    selection: &str,
    wallet: &'a [WalletDocument],
) -> Option<&'a WalletDocument> {
    if selection.is_empty() {
        return None;
    }
    wallet
        .iter()
        .find(|doc| doc.doc_data == selection || doc.doc_id == selection)
}
