use std::fmt::Write;

use reminder_core::ContentItem;
use sha2::{Digest, Sha256};

/// First 6 bytes of SHA-256 over `parts`, hex encoded. Parts are separated by
/// a NUL byte so that ("ab", "c") and ("a", "bc") differ.
pub(crate) fn short_hash(parts: &[&str]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part.as_bytes());
        hasher.update([0u8]);
    }
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(12);
    for byte in digest.iter().take(6) {
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}

pub(crate) fn derived_item_id(text: &str, reference: Option<&str>) -> String {
    format!("h:{}", short_hash(&[text, reference.unwrap_or("")]))
}

/// Revision tag derived from the ordered item ids.
pub(crate) fn derived_revision(items: &[ContentItem]) -> String {
    let ids: Vec<&str> = items.iter().map(|item| item.id().as_str()).collect();
    format!("r:{}", short_hash(&ids))
}
