//! Human-transcribable line rendering with per-line checksums.
//!
//! The verbose form of a block is its base32 text wrapped at 80 characters,
//! printed as ten 8-character groups for legibility. Every line carries a
//! compact checksum over the *decoded* bytes of that line's base32 text, so
//! a single typed line can be verified in isolation during manual entry.

use data_encoding::BASE32;

use crate::error::FormatError;

/// Characters of base32 text per transcription line.
pub const LINE_WIDTH: usize = 80;

/// 8-character groups per full line.
pub const GROUPS_PER_LINE: usize = 10;

const GROUP_LEN: usize = 8;

/// Payload bytes covered by one full line (80 base32 chars = 50 bytes).
const LINE_BYTES: usize = LINE_WIDTH / 8 * 5;

/// Characters in the rendered line checksum.
pub const CHECKSUM_LEN: usize = 5;

/// RFC 1924 base-85 alphabet, matching the original wire format.
const BASE85_ALPHABET: &[u8; 85] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz!#$%&()*+-;<=>?@^_`{|}~";

/// CRC32 of `data`, rendered as five base-85 characters.
///
/// The 4-byte big-endian checksum maps exactly onto five base-85 digits,
/// most significant first.
#[must_use]
pub fn line_checksum(data: &[u8]) -> String {
    let mut value = u64::from(crc32fast::hash(data));
    let mut digits = [0u8; CHECKSUM_LEN];
    for slot in digits.iter_mut().rev() {
        *slot = BASE85_ALPHABET[(value % 85) as usize];
        value /= 85;
    }
    digits.iter().map(|&b| char::from(b)).collect()
}

/// Render a block payload as numbered transcription lines.
///
/// Each line reads `<lineNo:2> <up to ten 8-char base32 groups> <crc:5>`.
/// A 50-byte payload fits exactly one line.
#[must_use]
pub fn render_lines(payload: &[u8]) -> Vec<String> {
    let b32 = BASE32.encode(payload);
    // The base32 text length is always a multiple of 8, so every 80-char
    // line chunk ends on a group boundary; one full line covers exactly 50
    // payload bytes.
    b32.as_bytes()
        .chunks(LINE_WIDTH)
        .zip(payload.chunks(LINE_BYTES))
        .enumerate()
        .map(|(line_no, (chunk, line_bytes))| {
            let mut line = format!("{line_no:02}");
            for group in chunk.chunks(GROUP_LEN) {
                line.push(' ');
                line.extend(group.iter().map(|&b| char::from(b)));
            }
            line.push(' ');
            line.push_str(&line_checksum(line_bytes));
            line
        })
        .collect()
}

/// Parse one transcribed line and verify its checksum.
///
/// Returns the line number and the decoded payload bytes of the line.
///
/// # Errors
///
/// Returns a [`FormatError`] when the line structure is wrong, a group is
/// not valid base32, or the carried checksum does not match the decoded
/// bytes.
pub fn parse_line(line: &str) -> Result<(usize, Vec<u8>), FormatError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    // Line number, at least one group, checksum.
    if tokens.len() < 3 {
        return Err(FormatError::LineTooShort);
    }

    let line_no: usize = tokens[0]
        .parse()
        .map_err(|_| FormatError::NonNumeric {
            field: "line number",
            value: tokens[0].to_owned(),
        })?;

    let carried = tokens[tokens.len() - 1];
    if carried.len() != CHECKSUM_LEN {
        return Err(FormatError::WrongLength {
            field: "line checksum",
            expected: CHECKSUM_LEN,
            got: carried.len(),
        });
    }

    let groups = &tokens[1..tokens.len() - 1];
    let b32: String = groups.concat();
    let decoded = BASE32
        .decode(b32.as_bytes())
        .map_err(|_| FormatError::InvalidBase32)?;

    let computed = line_checksum(&decoded);
    if computed != carried {
        return Err(FormatError::LineChecksumMismatch {
            carried: carried.to_owned(),
            computed,
        });
    }

    Ok((line_no, decoded))
}
