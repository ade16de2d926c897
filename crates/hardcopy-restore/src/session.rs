//! The reconstruction session store.
//!
//! A [`RestoreSession`] accumulates decoded wire units for exactly one
//! document. Units arrive in arbitrary order, duplicated, or malformed;
//! the store tracks completeness, refuses conflicting input without
//! mutating, and assembles the recovered buffer once every block is in.

use std::collections::{BTreeMap, HashSet};

use hardcopy_wire::{classify, DecodedUnit, DocId, FormatError, MetadataUnit, MAX_BLOCKS};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::error::RestoreError;
use crate::verify::RestoredDocument;

/// Outcome of feeding one candidate string to [`RestoreSession::ingest`].
///
/// Always a value: the scan loop that feeds the session must keep running
/// through arbitrarily bad input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Ingest {
    /// A metadata unit was applied (later units overwrite earlier ones).
    MetadataApplied,
    /// A new block was accepted.
    BlockStored {
        /// Index of the stored block.
        index: u16,
    },
    /// Exact repeat of an already-processed frame. Optical decoders
    /// re-emit whatever is in view every capture; repeats are skipped
    /// before parsing.
    RepeatedFrame,
    /// Parsed cleanly but refused by the store.
    Refused {
        /// Why the store refused the unit.
        error: RestoreError,
    },
    /// Not a recognizable wire unit.
    Rejected {
        /// Why classification failed.
        error: FormatError,
    },
}

/// Mutable accumulator for one document restoration.
///
/// The session is synchronous and single-threaded by design; `&mut self`
/// makes every check-then-insert sequence atomic per session. Callers
/// feeding candidates from parallel capture sources must share one session
/// behind a single mutex. No state is shared across sessions.
#[derive(Debug, Default)]
pub struct RestoreSession {
    /// Stored payloads by block index; iteration order is ascending.
    blocks: BTreeMap<u16, Vec<u8>>,
    /// Declared or inferred block count; 0 until anything establishes it.
    known_count: usize,
    /// Document id this session is locked to, once established.
    doc_id: Option<DocId>,
    /// Identifier declared by the metadata unit.
    identifier: Option<String>,
    /// Total size declared by the metadata unit.
    expected_size: Option<u64>,
    /// Block size declared by the metadata unit.
    expected_block_size: Option<u64>,
    /// Content hash declared by the metadata unit.
    expected_hash: Option<[u8; 32]>,
    /// Caches a `true` completeness result; a completed session never
    /// regresses.
    complete: bool,
    /// Memoized assembly result.
    assembled: Option<RestoredDocument>,
    /// Every frame already fed through `ingest`, stored verbatim so dedup
    /// can never misclassify a distinct unit as a repeat.
    seen_frames: HashSet<String>,
}

impl RestoreSession {
    /// Start an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session around an already-known buffer, bypassing
    /// reconstruction entirely.
    ///
    /// The session reports complete immediately and assembles to the given
    /// bytes.
    #[must_use]
    pub fn from_payload(data: Vec<u8>) -> Self {
        let hash: [u8; 32] = Sha256::digest(&data).into();
        Self {
            complete: true,
            assembled: Some(RestoredDocument::new(data, Some(hash))),
            ..Self::default()
        }
    }

    /// Apply a metadata unit; later units overwrite earlier ones.
    ///
    /// Recomputes the known block count from the declared size and block
    /// size.
    ///
    /// # Errors
    ///
    /// Returns [`RestoreError::AlreadyAssembled`] once the buffer has been
    /// assembled, and [`RestoreError::DeclaredCountOverflow`] when the
    /// implied count exceeds the 2-byte index space and could never be
    /// satisfied. Neither mutates the session.
    pub fn restore_metadata(&mut self, meta: &MetadataUnit) -> Result<(), RestoreError> {
        if self.assembled.is_some() {
            return Err(RestoreError::AlreadyAssembled);
        }
        // The decoder guarantees a non-zero block size. The encoder refuses
        // payloads needing more than MAX_BLOCKS blocks, so a larger declared
        // count is a corrupt or hostile unit; accepting it would wedge the
        // session and let `missing_indices` allocate the whole range.
        let declared = meta.total_size.div_ceil(meta.block_size);
        if declared > MAX_BLOCKS as u64 {
            return Err(RestoreError::DeclaredCountOverflow {
                declared,
                max: MAX_BLOCKS,
            });
        }

        self.doc_id = Some(meta.doc_id);
        self.identifier = Some(meta.identifier.clone());
        self.expected_size = Some(meta.total_size);
        self.expected_block_size = Some(meta.block_size);
        self.expected_hash = Some(meta.content_hash);
        #[allow(clippy::cast_possible_truncation)]
        {
            self.known_count = declared as usize;
        }

        debug!(
            identifier = %meta.identifier,
            total_size = meta.total_size,
            block_size = meta.block_size,
            known_count = self.known_count,
            "metadata applied"
        );
        Ok(())
    }

    /// Store one block payload.
    ///
    /// On success the known block count grows to `index + 1` when that
    /// exceeds it, so the count can be inferred purely from observed
    /// indices when no metadata unit ever arrives.
    ///
    /// # Errors
    ///
    /// Returns [`RestoreError::DocumentIdConflict`] when the session is
    /// locked to a different document id, and
    /// [`RestoreError::DuplicateBlock`] when the index is already stored
    /// (first write wins: a later rescan never overwrites an accepted
    /// block). Neither mutates the session.
    pub fn restore_block(
        &mut self,
        index: u16,
        payload: Vec<u8>,
        doc_id: DocId,
    ) -> Result<(), RestoreError> {
        if let Some(established) = self.doc_id {
            if established != doc_id {
                warn!(?established, incoming = ?doc_id, index, "foreign block refused");
                return Err(RestoreError::DocumentIdConflict {
                    established,
                    incoming: doc_id,
                });
            }
        }
        if self.blocks.contains_key(&index) {
            return Err(RestoreError::DuplicateBlock { index });
        }

        self.doc_id.get_or_insert(doc_id);
        self.blocks.insert(index, payload);
        let implied = usize::from(index) + 1;
        if implied > self.known_count {
            self.known_count = implied;
        }
        debug!(
            index,
            stored = self.blocks.len(),
            known_count = self.known_count,
            "block stored"
        );
        Ok(())
    }

    /// Feed one candidate string from any source.
    ///
    /// Classifies the candidate, forwards it to the restore operations,
    /// and skips exact repeats of frames already processed. Never fails;
    /// bad input is reported in the returned [`Ingest`] and logged.
    pub fn ingest(&mut self, candidate: &str) -> Ingest {
        if !self.seen_frames.insert(candidate.to_owned()) {
            return Ingest::RepeatedFrame;
        }

        match classify(candidate) {
            Err(error) => {
                debug!(%error, "candidate discarded");
                Ingest::Rejected { error }
            }
            Ok(DecodedUnit::Metadata(meta)) => match self.restore_metadata(&meta) {
                Ok(()) => Ingest::MetadataApplied,
                Err(error) => {
                    warn!(%error, "metadata unit refused");
                    Ingest::Refused { error }
                }
            },
            Ok(DecodedUnit::Data(data)) => {
                match self.restore_block(data.index, data.payload, data.doc_id) {
                    Ok(()) => Ingest::BlockStored { index: data.index },
                    Err(error) => {
                        debug!(%error, "data unit refused");
                        Ingest::Refused { error }
                    }
                }
            }
        }
    }

    /// Check whether every index in `[0, known_count)` has a payload.
    ///
    /// True also when the buffer was supplied directly via
    /// [`RestoreSession::from_payload`]. A `true` result is cached.
    pub fn is_complete(&mut self) -> bool {
        if self.complete {
            return true;
        }
        let complete = self.assembled.is_some()
            || (self.known_count > 0
                && self.blocks.len() == self.known_count
                && self.missing_indices().is_empty());
        if complete {
            self.complete = true;
        }
        complete
    }

    /// Ordered indices in `[0, known_count)` with no stored payload.
    ///
    /// Empty both when the session is complete and when the count is still
    /// unknown; callers distinguish the two via [`RestoreSession::known_count`].
    #[must_use]
    pub fn missing_indices(&self) -> Vec<usize> {
        (0..self.known_count)
            .filter(|&i| {
                u16::try_from(i).map_or(true, |index| !self.blocks.contains_key(&index))
            })
            .collect()
    }

    /// Declared or inferred block count; 0 while nothing established it.
    #[must_use]
    pub const fn known_count(&self) -> usize {
        self.known_count
    }

    /// Number of blocks stored so far.
    #[must_use]
    pub fn stored_count(&self) -> usize {
        self.blocks.len()
    }

    /// Document id this session is locked to, if any unit established one.
    #[must_use]
    pub const fn doc_id(&self) -> Option<DocId> {
        self.doc_id
    }

    /// Identifier declared by the metadata unit, if one arrived.
    #[must_use]
    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    /// Block size declared by the metadata unit, if one arrived.
    #[must_use]
    pub const fn declared_block_size(&self) -> Option<u64> {
        self.expected_block_size
    }

    /// Concatenate the stored payloads by ascending index and verify.
    ///
    /// Memoized: the first successful call fixes the result.
    ///
    /// # Errors
    ///
    /// Returns [`RestoreError::Incomplete`] while any block is missing.
    /// Never zero-fills.
    pub fn assemble(&mut self) -> Result<&RestoredDocument, RestoreError> {
        if self.assembled.is_none() {
            if !self.is_complete() {
                return Err(RestoreError::Incomplete {
                    stored: self.blocks.len(),
                    known: self.known_count,
                });
            }
            let total = self.blocks.values().map(Vec::len).sum();
            let mut data = Vec::with_capacity(total);
            for payload in self.blocks.values() {
                data.extend_from_slice(payload);
            }
            self.assembled = Some(RestoredDocument::new(data, self.expected_hash));
        }

        let stored = self.blocks.len();
        let known = self.known_count;
        self.assembled
            .as_ref()
            .ok_or(RestoreError::Incomplete { stored, known })
    }
}
