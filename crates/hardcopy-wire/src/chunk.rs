//! Block splitting and the per-document backup manifest.
//!
//! A backup is described by exactly one [`BackupManifest`] plus an ordered
//! sequence of [`Block`]s. Both are derived once from the input bytes at
//! encode time and immutable thereafter.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::BackupConfig;
use crate::error::EncodeError;

/// Version tag opening every metadata unit.
pub const VERSION_TAG: &str = "hcpb01";

/// Largest block count addressable by the 2-byte wire index.
pub const MAX_BLOCKS: usize = u16::MAX as usize + 1;

/// Two-byte random token distinguishing concurrently circulating backups.
///
/// Prevents accidentally merging blocks of two unrelated backups into one
/// restore session. Not a security boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocId(pub [u8; 2]);

impl DocId {
    /// Draw a fresh random document id.
    #[must_use]
    pub fn random() -> Self {
        Self(rand::random())
    }

    /// The raw token bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 2] {
        &self.0
    }
}

/// One slice of the source buffer, addressed by a 0-based index.
///
/// Every block carries exactly the configured block size of payload except
/// possibly the last.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    /// 0-based block index.
    pub index: u16,
    /// Raw payload bytes.
    pub payload: Vec<u8>,
}

impl Block {
    /// Length of this block's payload in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// Check if this block carries no payload.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

/// Per-document descriptive unit.
///
/// Carries everything a restore needs beyond the blocks themselves:
/// identifier, sizes, the document id shared by all blocks, and the SHA-256
/// content hash for end-to-end verification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupManifest {
    /// Human-readable identifier, like a filename or brief description.
    pub identifier: String,
    /// Total byte length of the original payload.
    pub total_size: u64,
    /// Block size in bytes (except possibly the last block).
    pub block_size: usize,
    /// Document id shared by all blocks of this backup.
    pub doc_id: DocId,
    /// SHA-256 hash of the full payload.
    pub content_hash: [u8; 32],
}

impl BackupManifest {
    /// Create a manifest and the ordered blocks for a payload.
    ///
    /// Draws a random document id. The configuration is validated before any
    /// data is touched.
    ///
    /// # Errors
    ///
    /// Returns `EncodeError::Config` for an out-of-range block size,
    /// `EncodeError::EmptyPayload` for an empty payload, and
    /// `EncodeError::PayloadTooLarge` when the payload needs more blocks
    /// than the 2-byte index field can address.
    pub fn from_payload(
        payload: &[u8],
        identifier: &str,
        config: &BackupConfig,
    ) -> Result<(Self, Vec<Block>), EncodeError> {
        Self::with_doc_id(payload, identifier, config, DocId::random())
    }

    /// Create a manifest with a pinned document id.
    ///
    /// # Errors
    ///
    /// Same as [`BackupManifest::from_payload`].
    pub fn with_doc_id(
        payload: &[u8],
        identifier: &str,
        config: &BackupConfig,
        doc_id: DocId,
    ) -> Result<(Self, Vec<Block>), EncodeError> {
        config.validate()?;

        if payload.is_empty() {
            return Err(EncodeError::EmptyPayload);
        }

        let count = config.block_count(payload.len());
        if count > MAX_BLOCKS {
            return Err(EncodeError::PayloadTooLarge {
                size: payload.len(),
                blocks: count,
                max_blocks: MAX_BLOCKS,
            });
        }

        let content_hash: [u8; 32] = Sha256::digest(payload).into();

        // Index casts are bounded by the MAX_BLOCKS check above.
        #[allow(clippy::cast_possible_truncation)]
        let blocks = payload
            .chunks(config.block_size)
            .enumerate()
            .map(|(index, data)| Block {
                index: index as u16,
                payload: data.to_vec(),
            })
            .collect();

        let manifest = Self {
            identifier: identifier.to_owned(),
            total_size: payload.len() as u64,
            block_size: config.block_size,
            doc_id,
            content_hash,
        };

        Ok((manifest, blocks))
    }

    /// Number of blocks this backup spans.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn block_count(&self) -> usize {
        if self.total_size == 0 {
            return 0;
        }
        (self.total_size as usize).div_ceil(self.block_size)
    }

    /// Verify a payload against the declared content hash.
    #[must_use]
    pub fn verify_hash(&self, payload: &[u8]) -> bool {
        let actual: [u8; 32] = Sha256::digest(payload).into();
        actual == self.content_hash
    }
}
