//! Storage-key derivation from agreement-page content
//!
//! The "don't show this again" decision is remembered under a key derived
//! from the contents of every agreement page, in display order. Editing or
//! reordering agreement content therefore changes the key and a previously
//! stored dismissal simply stops matching; the dialog shows again. Content
//! of the other page kinds does not participate (product decision, see
//! DESIGN.md).

use sha2::{Digest, Sha256};

use crate::pages::{PageBody, WidgetConfig};

/// Fixed prefix of every storage key
pub const STORAGE_KEY_PREFIX: &str = "welkin-welcome-page-dont-show-this-again";

/// Derive the storage key for a configuration
///
/// With no agreement pages the prefix alone is the key; otherwise the
/// per-page digests are appended, hyphen-joined, in page order.
pub fn storage_key(config: &WidgetConfig) -> String {
    let digests: Vec<String> = config
        .pages
        .iter()
        .filter_map(|page| match &page.body {
            PageBody::Agreement { content } => {
                Some(content_digest(content.as_deref().unwrap_or("")))
            }
            _ => None,
        })
        .collect();

    if digests.is_empty() {
        STORAGE_KEY_PREFIX.to_string()
    } else {
        format!("{}-{}", STORAGE_KEY_PREFIX, digests.join("-"))
    }
}

/// Hex SHA-256 digest of one agreement page's content
pub fn content_digest(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}
