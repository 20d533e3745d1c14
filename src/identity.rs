//! Deterministic identity derivation.
//!
//! Every identifier, token, and seed in a generated corpus is derived solely
//! and reproducibly from a hash of its inputs, with no hidden randomness.
//!
//! ## Canonical Payload
//!
//! Inputs are joined into `"{version}|{scope}|{part_1}|...|{part_n}"` (each
//! part trimmed, blank parts collapse to empty) and the UTF-8 bytes are
//! hashed with SHA-256. Three projections of the digest are exposed:
//!
//! | Projection | Bytes used | Shape |
//! |------------|-----------|-------|
//! | [`identifier`] | first 16 | UUID-compatible 128-bit value |
//! | [`hex_token`]  | all 32   | lower-case hex, truncated to a length |
//! | [`seed`]       | first 4  | non-negative i32, little-endian |
//!
//! ## Determinism Guarantees
//!
//! - Identical `(scope, parts)` always reproduce byte-identical output,
//!   across processes and machines
//! - Any difference in the scope or any single part changes the output with
//!   hash-strength unpredictability

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Version marker folded into every payload.
/// Increment on breaking changes to the payload layout.
pub const IDENTITY_VERSION: &str = "corpus_id_v1";

/// Full hex length of a SHA-256 digest.
const FULL_HEX_LEN: usize = 64;

/// Error type for identity derivation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    /// Requested token length was zero.
    #[error("Token length must be positive")]
    InvalidTokenLength,
}

/// Compute the SHA-256 digest of the canonical payload.
fn derive(scope: &str, parts: &[&str]) -> [u8; 32] {
    let mut payload = String::with_capacity(
        IDENTITY_VERSION.len() + scope.len() + parts.iter().map(|p| p.len() + 1).sum::<usize>() + 1,
    );
    payload.push_str(IDENTITY_VERSION);
    payload.push('|');
    payload.push_str(scope);
    for part in parts {
        payload.push('|');
        payload.push_str(part.trim());
    }
    Sha256::digest(payload.as_bytes()).into()
}

/// Derive a stable 128-bit identifier from a scope and parts.
///
/// The first 16 digest bytes interpreted as a UUID-compatible value.
pub fn identifier(scope: &str, parts: &[&str]) -> Uuid {
    let digest = derive(scope, parts);
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&digest[..16]);
    Uuid::from_bytes(bytes)
}

/// Derive a lower-case hex token of `length` characters.
///
/// Returns the full 64-character digest hex when `length >= 64`.
pub fn hex_token(scope: &str, parts: &[&str], length: usize) -> Result<String, IdentityError> {
    if length == 0 {
        return Err(IdentityError::InvalidTokenLength);
    }
    let mut token = hex::encode(derive(scope, parts));
    if length < FULL_HEX_LEN {
        token.truncate(length);
    }
    Ok(token)
}

/// Derive a non-negative i32 seed.
///
/// The first 4 bytes of the 128-bit identifier, little-endian, absolute
/// value. `i32::MIN` maps to `i32::MAX` since its absolute value overflows.
pub fn seed(scope: &str, parts: &[&str]) -> i32 {
    let id = identifier(scope, parts);
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&id.as_bytes()[..4]);
    let raw = i32::from_le_bytes(bytes);
    raw.checked_abs().unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_is_pure() {
        let a = identifier("thread", &["case-7", "42"]);
        let b = identifier("thread", &["case-7", "42"]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_any_part_changes_output() {
        let base = identifier("thread", &["case-7", "42"]);
        assert_ne!(base, identifier("thread", &["case-7", "43"]));
        assert_ne!(base, identifier("thread", &["case-8", "42"]));
        assert_ne!(base, identifier("message", &["case-7", "42"]));
    }

    #[test]
    fn test_parts_are_trimmed() {
        assert_eq!(
            identifier("thread", &["  case-7  ", "42"]),
            identifier("thread", &["case-7", "42"]),
        );
        // Blank collapses to empty, which is distinct from the part missing.
        assert_eq!(
            identifier("thread", &["   "]),
            identifier("thread", &[""]),
        );
        assert_ne!(identifier("thread", &[""]), identifier("thread", &[]));
    }

    #[test]
    fn test_hex_token_lengths() {
        let short = hex_token("msg", &["a"], 32).unwrap();
        assert_eq!(short.len(), 32);
        assert!(short.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));

        let full = hex_token("msg", &["a"], 64).unwrap();
        let oversized = hex_token("msg", &["a"], 500).unwrap();
        assert_eq!(full.len(), 64);
        assert_eq!(full, oversized);
        assert!(full.starts_with(&short));
    }

    #[test]
    fn test_hex_token_rejects_zero_length() {
        assert_eq!(
            hex_token("msg", &["a"], 0),
            Err(IdentityError::InvalidTokenLength)
        );
    }

    #[test]
    fn test_seed_is_non_negative_and_stable() {
        for payload in ["a", "b", "c", "storyline", "another one"] {
            let s = seed("scope", &[payload]);
            assert!(s >= 0);
            assert_eq!(s, seed("scope", &[payload]));
        }
    }

    #[test]
    fn test_seed_matches_identifier_prefix() {
        let id = identifier("scope", &["x"]);
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&id.as_bytes()[..4]);
        let expected = i32::from_le_bytes(bytes)
            .checked_abs()
            .unwrap_or(i32::MAX);
        assert_eq!(seed("scope", &["x"]), expected);
    }
}
