//! Locating the EXIF-carrying APP1 segment inside a JPEG stream.

use super::cursor::ByteCursor;
use super::error::DecodeError;

/// JPEG start-of-image marker.
pub(crate) const SOI: [u8; 2] = [0xFF, 0xD8];
/// Second byte of the APP1 marker (`0xFF 0xE1`).
const APP1: u8 = 0xE1;
/// Identifier that opens an EXIF APP1 payload.
pub(crate) const EXIF_IDENTIFIER: &[u8; 6] = b"Exif\0\0";

/// An APP1 segment whose declared length fits the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct App1Segment {
    /// Position of the `0xFF` byte of the marker.
    pub marker_offset: usize,
    /// Declared segment length, which counts the two length bytes themselves.
    pub length: usize,
}

impl App1Segment {
    /// First payload byte, right after the length field.
    pub fn payload_offset(&self) -> usize {
        self.marker_offset + 4
    }
}

/// Find the APP1 segment holding EXIF data.
///
/// Every `0xFF 0xE1` pair after the start-of-image marker is a candidate. The
/// first one whose payload begins with `Exif\0\0` wins, so an XMP APP1 placed
/// ahead of the EXIF one is skipped; when none carries the identifier the
/// first candidate is returned and the header check rejects it later.
pub(crate) fn locate_app1(data: &[u8]) -> Result<App1Segment, DecodeError> {
    let cursor = ByteCursor::new(data);
    if cursor.bytes(0, 2) != Some(&SOI[..]) {
        return Err(DecodeError::NotJpeg);
    }

    let mut first = None;
    let mut exif = None;
    for pos in 2..data.len().saturating_sub(1) {
        if cursor.read_u8(pos) != 0xFF || cursor.read_u8(pos + 1) != APP1 {
            continue;
        }
        first.get_or_insert(pos);
        if cursor.bytes(pos + 4, EXIF_IDENTIFIER.len()) == Some(&EXIF_IDENTIFIER[..]) {
            exif = Some(pos);
            break;
        }
    }

    let marker_offset = exif.or(first).ok_or(DecodeError::NoExifSegment)?;
    let available = data.len() - (marker_offset + 2);
    if !cursor.has(marker_offset + 2, 2) {
        return Err(DecodeError::TruncatedSegment {
            offset: marker_offset,
            declared: 2,
            available,
        });
    }

    let length = cursor.read_u16_be(marker_offset + 2) as usize;
    if length < 2 || length > available {
        return Err(DecodeError::TruncatedSegment {
            offset: marker_offset,
            declared: length,
            available,
        });
    }

    log::trace!("APP1 segment at {marker_offset}, {length} bytes");
    Ok(App1Segment {
        marker_offset,
        length,
    })
}
