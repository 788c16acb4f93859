//! Identifier normalizer — turns raw roster cells into wallet addresses.
//!
//! Roster cells loosely encode a user identifier. Most are email-like strings
//! whose local part is the wallet address (`0xabc…@provider.tld`); some are
//! bare hex with or without the `0x` prefix; some are garbage. Normalization:
//!
//! 1. Trim surrounding whitespace
//! 2. Strip one leading quote (`'` or `"`), a spreadsheet export artifact
//! 3. Remove every internal space
//! 4. Keep the part before the first `@`, if any
//! 5. Prefix `0x` when missing
//! 6. Keep the result only if it is exactly 42 characters long
//!
//! Rejected entries are dropped, never reported as errors.

use beastpush_common::types::WalletAddress;

/// Normalize one roster cell into a wallet address, or reject it.
pub fn normalize(entry: &str) -> Option<WalletAddress> {
    let trimmed = entry.trim();
    let unquoted = trimmed.strip_prefix(['\'', '"']).unwrap_or(trimmed);
    let cleaned: String = unquoted.chars().filter(|c| *c != ' ').collect();

    let username = match cleaned.split_once('@') {
        Some((local, _)) => local,
        None => cleaned.as_str(),
    };

    let candidate = if username.starts_with("0x") {
        username.to_string()
    } else {
        format!("0x{username}")
    };

    WalletAddress::new(candidate)
}

/// Result of normalizing a whole roster column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Normalized {
    /// Accepted addresses, in roster order
    pub addresses: Vec<WalletAddress>,
    /// Number of entries that did not normalize
    pub discarded: usize,
}

/// Normalize every entry, preserving order and counting rejections.
pub fn normalize_all<I, S>(entries: I) -> Normalized
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut normalized = Normalized::default();

    for entry in entries {
        let entry = entry.as_ref();
        match normalize(entry) {
            Some(address) => normalized.addresses.push(address),
            None => {
                tracing::debug!(entry, "Discarded roster entry");
                normalized.discarded += 1;
            }
        }
    }

    normalized
}
