//! Property-based tests for the wire format.
//!
//! These verify format invariants hold for arbitrary inputs:
//!
//! - Chunking yields ceil(len/n) blocks that concatenate to the input
//! - Every data unit carries the pad markers the decoder keys on
//! - Unit encode/decode is lossless for any payload and block size
//! - Transcription lines parse back to the bytes they render

use proptest::prelude::*;

use crate::chunk::{BackupManifest, DocId};
use crate::config::{BackupConfig, BLOCK_SIZE_MAX, BLOCK_SIZE_MIN};
use crate::decode::{classify, DecodedUnit};
use crate::encode::{encode_block, encode_metadata};
use crate::lines::{parse_line, render_lines};

proptest! {
    /// Chunking yields ceil(len/n) blocks whose concatenation is the input.
    #[test]
    fn chunking_partitions_payload(
        payload in proptest::collection::vec(any::<u8>(), 1..8000),
        block_size in BLOCK_SIZE_MIN..=BLOCK_SIZE_MAX,
    ) {
        let config = BackupConfig::new(block_size);
        let (manifest, blocks) =
            BackupManifest::from_payload(&payload, "prop", &config).unwrap();

        prop_assert_eq!(blocks.len(), payload.len().div_ceil(block_size));
        prop_assert_eq!(manifest.block_count(), blocks.len());

        let rejoined: Vec<u8> = blocks.iter().flat_map(|b| b.payload.clone()).collect();
        prop_assert_eq!(rejoined, payload);
    }

    /// Every data unit is classifiable and decodes to its source block.
    #[test]
    fn data_units_roundtrip(
        payload in proptest::collection::vec(any::<u8>(), 1..4000),
        block_size in BLOCK_SIZE_MIN..=BLOCK_SIZE_MAX,
        doc_id in any::<[u8; 2]>(),
    ) {
        let config = BackupConfig::new(block_size);
        let (manifest, blocks) =
            BackupManifest::with_doc_id(&payload, "prop", &config, DocId(doc_id)).unwrap();

        for block in &blocks {
            let unit = encode_block(block, manifest.doc_id);
            let bytes = unit.as_bytes();
            prop_assert_eq!(bytes[3], b'=');
            prop_assert_eq!(bytes[7], b'=');

            let DecodedUnit::Data(data) = classify(&unit).unwrap() else {
                return Err(TestCaseError::fail("data unit misclassified"));
            };
            prop_assert_eq!(data.index, block.index);
            prop_assert_eq!(data.doc_id, manifest.doc_id);
            prop_assert_eq!(&data.payload, &block.payload);
        }
    }

    /// The metadata unit decodes back to the manifest fields, for any
    /// identifier text.
    #[test]
    fn metadata_unit_roundtrips(
        payload in proptest::collection::vec(any::<u8>(), 1..2000),
        identifier in "[a-zA-Z0-9 ._-]{0,40}",
        doc_id in any::<[u8; 2]>(),
    ) {
        let config = BackupConfig::default();
        let (manifest, _) =
            BackupManifest::with_doc_id(&payload, &identifier, &config, DocId(doc_id)).unwrap();

        let unit = encode_metadata(&manifest);
        let DecodedUnit::Metadata(meta) = classify(&unit).unwrap() else {
            return Err(TestCaseError::fail("metadata unit misclassified"));
        };
        prop_assert_eq!(meta.identifier, manifest.identifier);
        prop_assert_eq!(meta.total_size, manifest.total_size);
        prop_assert_eq!(meta.block_size as usize, manifest.block_size);
        prop_assert_eq!(meta.doc_id, manifest.doc_id);
        prop_assert_eq!(meta.content_hash, manifest.content_hash);
    }

    /// Transcription lines carry their own integrity: rendering then
    /// parsing every line reproduces the payload.
    #[test]
    fn transcription_lines_roundtrip(
        payload in proptest::collection::vec(any::<u8>(), 1..1500),
    ) {
        let lines = render_lines(&payload);
        prop_assert_eq!(lines.len(), payload.len().div_ceil(50));

        let mut rejoined = Vec::new();
        for (i, line) in lines.iter().enumerate() {
            let (line_no, bytes) = parse_line(line).unwrap();
            prop_assert_eq!(line_no, i);
            rejoined.extend(bytes);
        }
        prop_assert_eq!(rejoined, payload);
    }

    /// Arbitrary junk never panics the classifier.
    #[test]
    fn classifier_never_panics(candidate in ".{0,200}") {
        let _ = classify(&candidate);
    }
}
