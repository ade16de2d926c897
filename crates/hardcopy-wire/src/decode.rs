//! Candidate-string classification and parsing.
//!
//! Input strings arrive from anywhere: an optical decode, a typed line, or
//! garbage the camera happened to pick up. Classification never panics and
//! never partially succeeds; a candidate either yields a complete
//! [`DecodedUnit`] or a [`FormatError`].

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::chunk::{DocId, VERSION_TAG};
use crate::error::FormatError;

/// Base64 pad byte. Encoding exactly 2 bytes always yields one trailing
/// pad, which is why offsets 3 and 7 of a data unit are structural
/// boundary markers (pinned wire-format constant).
const PAD: u8 = b'=';

/// Required comma-separated fields in a metadata unit, tag included.
const METADATA_FIELDS: usize = 6;

/// Whole-document metadata carried by the special first unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetadataUnit {
    /// Document id all blocks of this backup carry.
    pub doc_id: DocId,
    /// Human-readable identifier.
    pub identifier: String,
    /// Declared total payload size in bytes.
    pub total_size: u64,
    /// Declared block size in bytes.
    pub block_size: u64,
    /// Declared SHA-256 hash of the full payload.
    pub content_hash: [u8; 32],
}

/// One decoded payload-carrying unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataUnit {
    /// 0-based block index.
    pub index: u16,
    /// Document id token, compared byte-for-byte by the store.
    pub doc_id: DocId,
    /// Raw block payload.
    pub payload: Vec<u8>,
}

/// A successfully classified wire unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DecodedUnit {
    /// Whole-document metadata.
    Metadata(MetadataUnit),
    /// One payload-carrying block.
    Data(DataUnit),
}

/// Classify and parse one candidate string.
///
/// Classification order: metadata (version tag prefix), then data unit
/// (length > 8 with pads at offsets 3 and 7), then rejection.
///
/// # Errors
///
/// Returns a [`FormatError`] for anything that is not a well-formed unit.
/// No partial result is ever produced.
pub fn classify(candidate: &str) -> Result<DecodedUnit, FormatError> {
    if candidate.starts_with(VERSION_TAG) {
        parse_metadata(candidate).map(DecodedUnit::Metadata)
    } else if looks_like_data_unit(candidate) {
        parse_data(candidate).map(DecodedUnit::Data)
    } else {
        Err(FormatError::Unrecognized)
    }
}

fn looks_like_data_unit(candidate: &str) -> bool {
    let bytes = candidate.as_bytes();
    bytes.len() > 8 && bytes[3] == PAD && bytes[7] == PAD
}

fn parse_metadata(candidate: &str) -> Result<MetadataUnit, FormatError> {
    let fields: Vec<&str> = candidate.split(',').collect();
    if fields.len() != METADATA_FIELDS {
        return Err(FormatError::FieldCount {
            expected: METADATA_FIELDS,
            got: fields.len(),
        });
    }
    if fields[0] != VERSION_TAG {
        return Err(FormatError::Unrecognized);
    }

    let doc_id = decode_doc_id(fields[1], "document id")?;

    let identifier_bytes = BASE64
        .decode(fields[2])
        .map_err(|_| FormatError::InvalidBase64 { field: "identifier" })?;
    let identifier = String::from_utf8(identifier_bytes)
        .map_err(|_| FormatError::InvalidUtf8 { field: "identifier" })?;

    let total_size = parse_decimal(fields[3], "total size")?;
    let block_size = parse_decimal(fields[4], "block size")?;
    // The store recomputes the block count as size / block size.
    if block_size == 0 {
        return Err(FormatError::ZeroField { field: "block size" });
    }

    let hash_bytes = hex::decode(fields[5])
        .map_err(|_| FormatError::InvalidHex { field: "content hash" })?;
    let content_hash: [u8; 32] =
        hash_bytes
            .try_into()
            .map_err(|bytes: Vec<u8>| FormatError::WrongLength {
                field: "content hash",
                expected: 32,
                got: bytes.len(),
            })?;

    Ok(MetadataUnit {
        doc_id,
        identifier,
        total_size,
        block_size,
        content_hash,
    })
}

fn parse_data(candidate: &str) -> Result<DataUnit, FormatError> {
    let index_bytes = decode_two_bytes(&candidate[..4], "block index")?;
    let index = u16::from_be_bytes(index_bytes);
    let doc_id = decode_doc_id(&candidate[4..8], "document id")?;
    let payload = BASE64
        .decode(&candidate[8..])
        .map_err(|_| FormatError::InvalidBase64 { field: "payload" })?;

    Ok(DataUnit {
        index,
        doc_id,
        payload,
    })
}

fn decode_doc_id(field: &str, name: &'static str) -> Result<DocId, FormatError> {
    decode_two_bytes(field, name).map(DocId)
}

fn decode_two_bytes(field: &str, name: &'static str) -> Result<[u8; 2], FormatError> {
    let bytes = BASE64
        .decode(field)
        .map_err(|_| FormatError::InvalidBase64 { field: name })?;
    bytes
        .try_into()
        .map_err(|bytes: Vec<u8>| FormatError::WrongLength {
            field: name,
            expected: 2,
            got: bytes.len(),
        })
}

fn parse_decimal(field: &str, name: &'static str) -> Result<u64, FormatError> {
    field.parse().map_err(|_| FormatError::NonNumeric {
        field: name,
        value: field.to_owned(),
    })
}
