//! Wire-format error types.

use thiserror::Error;

/// Backup configuration errors.
///
/// Raised before any data is touched; a bad block size is fatal at
/// construction time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Block size outside the supported range.
    #[error("block size {given} out of range: must be between {min} and {max} bytes")]
    BlockSizeOutOfRange {
        /// The configured block size.
        given: usize,
        /// Smallest supported block size.
        min: usize,
        /// Largest supported block size.
        max: usize,
    },
}

/// Encode errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// Empty payload cannot be backed up.
    #[error("cannot encode empty payload")]
    EmptyPayload,

    /// Payload needs more blocks than the 2-byte index field can address.
    #[error("payload too large: {size} bytes needs {blocks} blocks, index space allows {max_blocks}")]
    PayloadTooLarge {
        /// Actual payload size in bytes.
        size: usize,
        /// Number of blocks the payload would need.
        blocks: usize,
        /// Largest addressable block count.
        max_blocks: usize,
    },

    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Malformed metadata or data unit.
///
/// The decoder returns these as values and never panics across the decode
/// boundary: a continuous scan loop must keep running through bad input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Candidate string is neither a metadata nor a data unit.
    #[error("unrecognized unit")]
    Unrecognized,

    /// Metadata unit has the wrong number of comma-separated fields.
    #[error("metadata unit has {got} fields, expected {expected}")]
    FieldCount {
        /// Required field count.
        expected: usize,
        /// Observed field count.
        got: usize,
    },

    /// A field is not valid base64.
    #[error("invalid base64 in {field}")]
    InvalidBase64 {
        /// Name of the offending field.
        field: &'static str,
    },

    /// A transcription line group is not valid base32.
    #[error("invalid base32 in transcription line")]
    InvalidBase32,

    /// A field is not valid hex.
    #[error("invalid hex in {field}")]
    InvalidHex {
        /// Name of the offending field.
        field: &'static str,
    },

    /// A decoded field is not valid UTF-8.
    #[error("invalid utf-8 in {field}")]
    InvalidUtf8 {
        /// Name of the offending field.
        field: &'static str,
    },

    /// A numeric field failed to parse.
    #[error("non-numeric {field}: {value:?}")]
    NonNumeric {
        /// Name of the offending field.
        field: &'static str,
        /// The raw field text.
        value: String,
    },

    /// A field must be non-zero.
    #[error("{field} must not be zero")]
    ZeroField {
        /// Name of the offending field.
        field: &'static str,
    },

    /// A fixed-width field decoded to the wrong number of bytes.
    #[error("{field} must be {expected} bytes, got {got}")]
    WrongLength {
        /// Name of the offending field.
        field: &'static str,
        /// Required byte length.
        expected: usize,
        /// Observed byte length.
        got: usize,
    },

    /// Transcription line has too few tokens.
    #[error("transcription line too short")]
    LineTooShort,

    /// Transcription line checksum does not match its decoded bytes.
    #[error("line checksum mismatch: line carries {carried}, computed {computed}")]
    LineChecksumMismatch {
        /// Checksum transcribed on the line.
        carried: String,
        /// Checksum computed over the decoded bytes.
        computed: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::BlockSizeOutOfRange {
            given: 49,
            min: 50,
            max: 1500,
        };
        assert_eq!(
            err.to_string(),
            "block size 49 out of range: must be between 50 and 1500 bytes"
        );
    }

    #[test]
    fn encode_error_display() {
        let err = EncodeError::EmptyPayload;
        assert_eq!(err.to_string(), "cannot encode empty payload");

        let err = EncodeError::PayloadTooLarge {
            size: 100_000_000,
            blocks: 66_667,
            max_blocks: 65_536,
        };
        assert!(err.to_string().contains("payload too large"));
        assert!(err.to_string().contains("66667"));
    }

    #[test]
    fn format_error_display() {
        let err = FormatError::Unrecognized;
        assert_eq!(err.to_string(), "unrecognized unit");

        let err = FormatError::FieldCount {
            expected: 6,
            got: 4,
        };
        assert_eq!(err.to_string(), "metadata unit has 4 fields, expected 6");

        let err = FormatError::NonNumeric {
            field: "total size",
            value: "12x".into(),
        };
        assert!(err.to_string().contains("total size"));
        assert!(err.to_string().contains("12x"));
    }

    #[test]
    fn errors_are_clone_and_eq() {
        let err1 = FormatError::Unrecognized;
        let err2 = err1.clone();
        assert_eq!(err1, err2);

        let err1 = EncodeError::EmptyPayload;
        let err2 = err1.clone();
        assert_eq!(err1, err2);
    }
}
