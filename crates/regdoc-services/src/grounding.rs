//! Grounding context for document questions.
//!
//! Produces the text a question about a selected document is answered
//! against, either from the stored bytes or from a summary of the listing
//! entry.

use regdoc_core::models::Document;
use regdoc_core::GroundingMode;
use regdoc_storage::ObjectStorage;
use std::sync::Arc;

/// Bytes inspected when deciding whether an object is text.
const SNIFF_LEN: usize = 8192;

#[derive(Clone)]
pub struct DocumentContextLoader {
    storage: Arc<dyn ObjectStorage>,
    mode: GroundingMode,
    max_chars: usize,
}

impl DocumentContextLoader {
    pub fn new(storage: Arc<dyn ObjectStorage>, mode: GroundingMode, max_chars: usize) -> Self {
        Self {
            storage,
            mode,
            max_chars,
        }
    }

    pub fn mode(&self) -> GroundingMode {
        self.mode
    }

    /// Grounding text for `document`. Never fails: unreadable or binary
    /// objects fall back to the placeholder summary.
    pub async fn load(&self, document: &Document) -> String {
        match self.mode {
            GroundingMode::Placeholder => placeholder_summary(document),
            GroundingMode::Content => match self.storage.get(&document.key).await {
                Ok(bytes) => match decode_text(&bytes) {
                    Some(text) => truncate_chars(text, self.max_chars),
                    None => {
                        tracing::debug!(
                            key = %document.key,
                            size_bytes = bytes.len(),
                            "Document is not plain text, using summary"
                        );
                        placeholder_summary(document)
                    }
                },
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        key = %document.key,
                        "Failed to read document content, using summary"
                    );
                    placeholder_summary(document)
                }
            },
        }
    }
}

/// Summary built from the listing entry alone.
pub fn placeholder_summary(document: &Document) -> String {
    format!(
        "Document: {name}
Region: {region}
Size: {size}
Last Modified: {modified}

This is a treasury document containing financial information and budget allocations for {region}.
The document includes various sections covering expenditures, revenue, and administrative details.

This document is for official Bureau of Treasury use only.",
        name = document.name,
        region = document.region,
        size = document.size_label,
        modified = document.last_modified.to_rfc3339(),
    )
}

/// Lossy UTF-8 text, or `None` when the bytes look binary or hold no text.
fn decode_text(bytes: &[u8]) -> Option<String> {
    if bytes.is_empty() || bytes.starts_with(b"%PDF") {
        return None;
    }

    let head = &bytes[..bytes.len().min(SNIFF_LEN)];
    if head.contains(&0) {
        return None;
    }

    let text = String::from_utf8_lossy(bytes);
    let total = text.chars().count();
    let replaced = text.chars().filter(|c| *c == char::REPLACEMENT_CHARACTER).count();
    // More than 10% undecodable sequences is not text
    if replaced * 10 > total {
        return None;
    }

    if text.trim().is_empty() {
        return None;
    }
    Some(text.into_owned())
}

fn truncate_chars(text: String, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => text[..index].to_string(),
        None => text,
    }
}
