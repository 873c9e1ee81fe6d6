use std::borrow::Cow;

use sha2::{Digest, Sha256};

/// Length of the `~` plus hex SHA-256 suffix of a truncated key.
///
/// Limits below this keep only part of the digest.
pub const KEY_SUFFIX_LEN: usize = 1 + 64;

/// Fits a storage key into `max_bytes`.
///
/// Keys within the limit are returned as is. Longer keys are cut on a UTF-8
/// boundary and suffixed with `~` and the digest of the whole key, so two
/// long keys sharing a prefix still map to different storage keys.
///
/// The result never exceeds `max_bytes`. Below [`KEY_SUFFIX_LEN`] nothing of
/// the original key is kept and the digest itself is cut short.
///
/// ```
/// use stowage_backend::truncate_key;
///
/// assert_eq!(truncate_key("GET /a#00", 100), "GET /a#00");
///
/// let long = format!("GET /{}", "x".repeat(300));
/// let short = truncate_key(&long, 250);
/// assert_eq!(short.len(), 250);
/// assert!(short.starts_with("GET /xxx"));
/// ```
pub fn truncate_key(key: &str, max_bytes: usize) -> Cow<'_, str> {
    if key.len() <= max_bytes {
        return Cow::Borrowed(key);
    }

    let digest = hex::encode(Sha256::digest(key.as_bytes()));
    if max_bytes < KEY_SUFFIX_LEN {
        let mut short = String::with_capacity(max_bytes);
        if max_bytes > 0 {
            short.push('~');
            short.push_str(&digest[..max_bytes - 1]);
        }
        return Cow::Owned(short);
    }

    let mut cut = max_bytes - KEY_SUFFIX_LEN;
    while !key.is_char_boundary(cut) {
        cut -= 1;
    }
    Cow::Owned(format!("{}~{digest}", &key[..cut]))
}
