//! SHA-256 digests of input files.
//!
//! Digests are computed over raw file bytes (not parsed content) so any
//! edit to an input table changes its fingerprint. They are echoed into
//! the run summary and, when the manifest carries expectations, verified
//! before loading.

use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::{display_path, IoError, IoResult};

/// Lowercase SHA-256 hex of a byte slice.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Lowercase SHA-256 hex of a file's raw bytes.
pub fn sha256_file(path: &Path) -> IoResult<String> {
    let bytes = fs::read(path).map_err(|source| IoError::Read {
        path: display_path(path),
        source,
    })?;
    Ok(sha256_hex(&bytes))
}

/// 64 lowercase hex characters, exactly.
pub fn is_hex64_lower(s: &str) -> bool {
    s.len() == 64 && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

/// Check an expected digest (shape first, then equality).
pub fn verify_digest(label: &'static str, expected: &str, actual: &str) -> IoResult<()> {
    if !is_hex64_lower(expected) {
        return Err(IoError::DigestShape { label });
    }
    if expected != actual {
        return Err(IoError::DigestMismatch {
            label,
            expected: expected.to_owned(),
            actual: actual.to_owned(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_digest() {
        // sha256("") — the canonical empty-input vector.
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn hex64_shape() {
        assert!(is_hex64_lower(&"a".repeat(64)));
        assert!(!is_hex64_lower(&"A".repeat(64)));
        assert!(!is_hex64_lower("abc"));
    }

    #[test]
    fn verify_rejects_shape_then_mismatch() {
        let actual = sha256_hex(b"x");
        assert!(matches!(
            verify_digest("grades", "nothex", &actual),
            Err(IoError::DigestShape { .. })
        ));
        assert!(matches!(
            verify_digest("grades", &"0".repeat(64), &actual),
            Err(IoError::DigestMismatch { .. })
        ));
        assert!(verify_digest("grades", &actual, &actual).is_ok());
    }
}
