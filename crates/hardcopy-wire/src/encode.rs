//! Wire encoding: compact data units, the metadata unit, and the QR
//! capacity-tier policy.
//!
//! A data unit is `base64(index) || base64(doc_id) || base64(payload)` with
//! no delimiter. Index and document id are exactly 2 bytes each, and base64
//! of exactly 2 bytes always ends in one pad character, so the pads at
//! offsets 3 and 7 act as implicit field boundaries. That is a pinned
//! wire-format constant, not an accident; the decoder keys on it.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::chunk::{BackupManifest, Block, DocId, VERSION_TAG};

/// Render the single metadata unit for a backup.
///
/// `hcpb01,<docId-b64>,<identifier-b64>,<size>,<blockSize>,<hash-hex>` —
/// splitting the unit on `,` yields exactly six fields. Emitted once per
/// document, logically distinct from data units.
#[must_use]
pub fn encode_metadata(manifest: &BackupManifest) -> String {
    format!(
        "{VERSION_TAG},{},{},{},{},{}",
        BASE64.encode(manifest.doc_id.as_bytes()),
        BASE64.encode(manifest.identifier.as_bytes()),
        manifest.total_size,
        manifest.block_size,
        hex::encode(manifest.content_hash),
    )
}

/// Render one block as a compact framed data unit.
#[must_use]
pub fn encode_block(block: &Block, doc_id: DocId) -> String {
    let mut unit = BASE64.encode(block.index.to_be_bytes());
    unit.push_str(&BASE64.encode(doc_id.as_bytes()));
    unit.push_str(&BASE64.encode(&block.payload));
    unit
}

/// QR error-correction tier, most redundant first.
///
/// The optical encoder itself is an external collaborator; picking the tier
/// from the unit length is this crate's responsibility.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EccLevel {
    /// ~30% recoverable.
    High,
    /// ~25% recoverable.
    Quartile,
    /// ~15% recoverable.
    Medium,
    /// ~7% recoverable.
    Low,
}

impl EccLevel {
    /// Byte capacity of a version-40 QR symbol at this tier.
    #[must_use]
    pub const fn capacity(self) -> usize {
        match self {
            Self::High => 1273,
            Self::Quartile => 1663,
            Self::Medium => 2331,
            Self::Low => 2953,
        }
    }

    /// Most redundant tier that can hold `encoded_len` bytes of unit text.
    ///
    /// Short units get the high-redundancy tiers; longer units degrade
    /// toward `Low`. Returns `None` when even the largest symbol cannot
    /// hold the unit.
    #[must_use]
    pub fn for_len(encoded_len: usize) -> Option<Self> {
        [Self::High, Self::Quartile, Self::Medium, Self::Low]
            .into_iter()
            .find(|tier| encoded_len <= tier.capacity())
    }
}
