//! Integrity verification of the assembled buffer.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Outcome of checking the assembled buffer against declared checksums.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verification {
    /// The SHA-256 hash matches the one declared by the metadata unit.
    Verified,
    /// The hash differs from the declared one. The bytes are still
    /// returned; a partially wrong recovery beats no recovery.
    HashMismatch {
        /// Hash declared by the metadata unit, hex.
        expected: String,
        /// Hash computed over the assembled bytes, hex.
        actual: String,
    },
    /// No metadata unit was ever received; the buffer is returned
    /// optimistically, unverified.
    HashUnknown,
}

impl Verification {
    /// Check if the assembled bytes passed verification.
    #[must_use]
    pub const fn is_verified(&self) -> bool {
        matches!(self, Self::Verified)
    }
}

/// A fully assembled buffer plus its integrity verdict.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RestoredDocument {
    /// The recovered bytes, concatenated strictly by ascending index.
    pub data: Vec<u8>,
    /// Fast whole-buffer checksum.
    pub crc32: u32,
    /// Verdict against the metadata hash, if one was declared.
    pub verification: Verification,
}

impl RestoredDocument {
    /// Assemble the verdict for a recovered buffer.
    #[must_use]
    pub fn new(data: Vec<u8>, expected_hash: Option<[u8; 32]>) -> Self {
        let crc32 = crc32fast::hash(&data);
        let verification = match expected_hash {
            None => Verification::HashUnknown,
            Some(expected) => {
                let actual: [u8; 32] = Sha256::digest(&data).into();
                if actual == expected {
                    Verification::Verified
                } else {
                    Verification::HashMismatch {
                        expected: hex::encode(expected),
                        actual: hex::encode(actual),
                    }
                }
            }
        };

        Self {
            data,
            crc32,
            verification,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_hash_verifies() {
        let data = b"recovered payload".to_vec();
        let expected: [u8; 32] = Sha256::digest(&data).into();
        let doc = RestoredDocument::new(data.clone(), Some(expected));
        assert_eq!(doc.verification, Verification::Verified);
        assert!(doc.verification.is_verified());
        assert_eq!(doc.data, data);
        assert_eq!(doc.crc32, crc32fast::hash(&doc.data));
    }

    #[test]
    fn mismatching_hash_still_returns_bytes() {
        let data = b"recovered payload".to_vec();
        let doc = RestoredDocument::new(data.clone(), Some([0u8; 32]));
        assert!(matches!(
            doc.verification,
            Verification::HashMismatch { .. }
        ));
        assert!(!doc.verification.is_verified());
        // Imperfect recovery still carries the bytes.
        assert_eq!(doc.data, data);
    }

    #[test]
    fn missing_metadata_yields_unknown() {
        let doc = RestoredDocument::new(vec![1, 2, 3], None);
        assert_eq!(doc.verification, Verification::HashUnknown);
        assert!(!doc.verification.is_verified());
    }
}
