//! Restore error types.

use hardcopy_wire::DocId;
use thiserror::Error;

/// Reconstruction store errors.
///
/// Every rejecting operation leaves the session unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RestoreError {
    /// A payload for this index was already accepted; first write wins.
    #[error("block {index} already stored")]
    DuplicateBlock {
        /// The duplicated block index.
        index: u16,
    },

    /// The unit belongs to a different backup than this session.
    #[error("document id mismatch: session established {established:?}, unit carries {incoming:?}")]
    DocumentIdConflict {
        /// Document id this session is locked to.
        established: DocId,
        /// Document id the rejected unit carried.
        incoming: DocId,
    },

    /// The metadata unit implies more blocks than the 2-byte index can
    /// address, so the session could never complete.
    #[error("declared block count {declared} exceeds the {max}-block index space")]
    DeclaredCountOverflow {
        /// Block count implied by the declared size and block size.
        declared: u64,
        /// Largest satisfiable block count.
        max: usize,
    },

    /// The buffer is already assembled; metadata can no longer change.
    #[error("buffer already assembled")]
    AlreadyAssembled,

    /// Assembly attempted before every block arrived.
    #[error("session incomplete: {stored} of {known} blocks stored")]
    Incomplete {
        /// Blocks stored so far.
        stored: usize,
        /// Known block count (0 when nothing established it yet).
        known: usize,
    },
}
