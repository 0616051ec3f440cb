//! Text/binary classification from a file's leading bytes.
//!
//! Only the first [`SAMPLE_SIZE`] bytes are inspected; the label applies to
//! that sample, the rest of the file is never re-validated.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of leading bytes sampled per file.
pub const SAMPLE_SIZE: usize = 512;

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];
const UTF16LE_BOM: [u8; 2] = [0xFF, 0xFE];
const UTF16BE_BOM: [u8; 2] = [0xFE, 0xFF];

/// Encoding family assigned to a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Encoding {
    #[serde(rename = "ASCII")]
    Ascii,
    #[serde(rename = "UTF-8")]
    Utf8,
    #[serde(rename = "UTF-16LE")]
    Utf16Le,
    #[serde(rename = "UTF-16BE")]
    Utf16Be,
    Unknown,
}

impl Encoding {
    /// Everything except [`Encoding::Unknown`] is treated as text.
    pub fn is_text(self) -> bool {
        self != Encoding::Unknown
    }

    pub fn label(self) -> &'static str {
        match self {
            Encoding::Ascii => "ASCII",
            Encoding::Utf8 => "UTF-8",
            Encoding::Utf16Le => "UTF-16LE",
            Encoding::Utf16Be => "UTF-16BE",
            Encoding::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How a multi-byte UTF-8 sequence cut off by the end of a truncated sample
/// is judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Utf8Boundary {
    /// A dangling incomplete code point at the very end of a sample that is
    /// shorter than its file is accepted.
    #[default]
    Permissive,
    /// Any incomplete sequence makes the sample invalid UTF-8.
    Strict,
}

/// Which classifier the walker applies to samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ClassifierKind {
    /// BOM and byte-range heuristics over the sample.
    #[default]
    Prefix,
    /// `content_inspector`, mapped onto the same labels.
    Inspector,
}

/// Classifies `sample` with the default [`Utf8Boundary::Permissive`] policy.
pub fn classify(sample: &[u8], sample_is_full_file: bool) -> Encoding {
    classify_with(sample, sample_is_full_file, Utf8Boundary::default())
}

/// Classifies `sample`; the first matching label in the order ASCII, UTF-8,
/// UTF-16LE, UTF-16BE wins.
pub fn classify_with(sample: &[u8], sample_is_full_file: bool, boundary: Utf8Boundary) -> Encoding {
    if is_ascii(sample) {
        Encoding::Ascii
    } else if is_utf8(sample, sample_is_full_file, boundary) {
        Encoding::Utf8
    } else if is_utf16le(sample) {
        Encoding::Utf16Le
    } else if is_utf16be(sample) {
        Encoding::Utf16Be
    } else {
        Encoding::Unknown
    }
}

/// Classifies `sample` with `content_inspector`.
///
/// UTF-32 has no label of its own and maps to [`Encoding::Unknown`].
pub fn inspect(sample: &[u8]) -> Encoding {
    use content_inspector::ContentType;
    if is_ascii(sample) {
        return Encoding::Ascii;
    }
    match content_inspector::inspect(sample) {
        ContentType::UTF_8 | ContentType::UTF_8_BOM => Encoding::Utf8,
        ContentType::UTF_16LE => Encoding::Utf16Le,
        ContentType::UTF_16BE => Encoding::Utf16Be,
        ContentType::UTF_32LE | ContentType::UTF_32BE | ContentType::BINARY => Encoding::Unknown,
    }
}

pub(crate) fn run(
    kind: ClassifierKind,
    sample: &[u8],
    sample_is_full_file: bool,
    boundary: Utf8Boundary,
) -> Encoding {
    match kind {
        ClassifierKind::Prefix => classify_with(sample, sample_is_full_file, boundary),
        ClassifierKind::Inspector => inspect(sample),
    }
}

fn is_text_byte(b: u8) -> bool {
    (32..=126).contains(&b) || matches!(b, b'\n' | b'\r' | b'\t')
}

fn is_ascii(sample: &[u8]) -> bool {
    sample.iter().all(|&b| is_text_byte(b))
}

// Well-formed UTF-8 still counts as binary when it carries control bytes.
fn is_utf8(sample: &[u8], sample_is_full_file: bool, boundary: Utf8Boundary) -> bool {
    if sample.starts_with(&UTF8_BOM) {
        return true;
    }
    let valid = match std::str::from_utf8(sample) {
        Ok(_) => sample.len(),
        Err(e) if e.error_len().is_none()
            && !sample_is_full_file
            && boundary == Utf8Boundary::Permissive =>
        {
            e.valid_up_to()
        }
        Err(_) => return false,
    };
    sample[..valid].iter().all(|&b| b >= 0x80 || is_text_byte(b))
}

fn is_utf16le(sample: &[u8]) -> bool {
    sample.starts_with(&UTF16LE_BOM) || surrogate_pairs(sample, 1)
}

fn is_utf16be(sample: &[u8]) -> bool {
    sample.starts_with(&UTF16BE_BOM) || surrogate_pairs(sample, 0)
}

/// Even length, and the byte at `offset` of every pair is in `0xD8..=0xDF`.
fn surrogate_pairs(sample: &[u8], offset: usize) -> bool {
    sample.len() % 2 == 0
        && sample
            .chunks_exact(2)
            .all(|pair| (0xD8..=0xDF).contains(&pair[offset]))
}
