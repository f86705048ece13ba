//! PDF extractor.
//!
//! Uses lopdf to pull the text of each page. Pages without extractable text
//! (scans, blank pages) are skipped; the rest are concatenated in page order.

use crate::types::{AppError, AppResult};
use lopdf::Document;
use tracing::{debug, warn};

pub fn extract(bytes: &[u8]) -> AppResult<String> {
    let doc = Document::load_mem(bytes)
        .map_err(|e| AppError::Decode(format!("Failed to load PDF: {e}")))?;

    let pages = doc.get_pages();
    let mut text = String::new();
    let mut skipped = 0usize;

    // get_pages is a BTreeMap keyed by page number, so iteration is in page order
    for page_number in pages.keys() {
        match doc.extract_text(&[*page_number]) {
            Ok(page_text) if !page_text.trim().is_empty() => text.push_str(&page_text),
            Ok(_) => {
                skipped += 1;
                debug!(page = page_number, "Page has no extractable text");
            }
            Err(e) => {
                skipped += 1;
                warn!(page = page_number, error = %e, "Failed to extract page text");
            }
        }
    }

    debug!(pages = pages.len(), skipped, chars = text.len(), "Extracted PDF text");
    Ok(text)
}
