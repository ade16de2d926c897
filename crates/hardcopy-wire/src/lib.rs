//! Paper-backup wire protocol: block splitting, framing, and checksums.
//!
//! This crate implements the codec half of a paper-backup system: an
//! arbitrary byte buffer is split into fixed-size blocks, described once by
//! a [`BackupManifest`], and each block is rendered two ways:
//!
//! - a compact framed string for optical transport
//!   (`base64(index) || base64(doc id) || base64(payload)`), and
//! - a verbose base32 transcription form with a per-line checksum, so a
//!   human can type a backup back in and verify one line at a time.
//!
//! # Decode direction
//!
//! [`classify`] turns one candidate string from any source into a
//! [`DecodedUnit`] or a [`FormatError`]. Candidates arrive in arbitrary
//! order, duplicated, or malformed; rejection is a value, never a panic,
//! so a continuous scan loop keeps running through bad input.
//!
//! Accumulating decoded units into a recovered buffer is the
//! `hardcopy-restore` crate's job.
//!
//! # Optical transport
//!
//! QR rendering and scanning are external collaborators (text in, text
//! out). The one policy this crate owns is [`EccLevel::for_len`]: picking
//! the error-correction tier a unit should be printed at from its encoded
//! length.

#![forbid(unsafe_code)]

mod chunk;
mod config;
mod decode;
mod encode;
mod error;
mod golden;
mod lines;
#[cfg(test)]
mod proptests;

pub use chunk::{BackupManifest, Block, DocId, MAX_BLOCKS, VERSION_TAG};
pub use config::{BackupConfig, BLOCK_SIZE_MAX, BLOCK_SIZE_MIN};
pub use decode::{classify, DataUnit, DecodedUnit, MetadataUnit};
pub use encode::{encode_block, encode_metadata, EccLevel};
pub use error::{ConfigError, EncodeError, FormatError};
pub use lines::{line_checksum, parse_line, render_lines, CHECKSUM_LEN, GROUPS_PER_LINE, LINE_WIDTH};
