//! Reconstruction of a backed-up document from scanned wire units.
//!
//! [`RestoreSession`] accumulates metadata and data units in any order,
//! tracks which block indices are still missing, and assembles the original
//! buffer once the set is complete. [`RestoredDocument`] carries the
//! recovered bytes together with a fast crc32 checksum and the verdict of
//! comparing them against the hash declared at backup time.
//!
//! Sessions never abort on bad input: unrecognized or conflicting units are
//! reported per call and logged, and the caller keeps feeding frames.

#![forbid(unsafe_code)]

mod error;
mod session;
mod verify;

pub use error::RestoreError;
pub use session::{Ingest, RestoreSession};
pub use verify::{RestoredDocument, Verification};
