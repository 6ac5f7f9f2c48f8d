use thiserror::Error;

/// Structural failures that end a parse before any tag is decoded.
///
/// These never reach callers of [`parse`](super::parse); they are logged and
/// turned into an empty document with `has_exif == false`. Per-field problems
/// (out-of-bounds values, directory cycles) are not errors at all and only
/// leave the affected field empty.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum DecodeError {
    #[error("missing JPEG start-of-image marker (0xFF 0xD8)")]
    NotJpeg,

    #[error("no APP1 segment found")]
    NoExifSegment,

    #[error("APP1 segment at {offset} declares {declared} bytes, {available} available")]
    TruncatedSegment {
        offset: usize,
        declared: usize,
        available: usize,
    },

    #[error("malformed EXIF/TIFF header: {0}")]
    MalformedTiffHeader(&'static str),
}
