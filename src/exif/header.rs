//! EXIF identifier and TIFF header validation.

use super::cursor::{ByteCursor, ByteOrder};
use super::error::DecodeError;
use super::segment::{App1Segment, EXIF_IDENTIFIER};

/// The 8-byte TIFF header that follows `Exif\0\0` in an APP1 payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TiffHeader {
    pub byte_order: ByteOrder,
    /// Offset of IFD0, relative to [`TiffHeader::start`].
    pub first_ifd_offset: u32,
    /// Absolute buffer position of the byte-order marker. Every offset
    /// stored inside the TIFF structure is relative to this point.
    pub start: usize,
}

impl TiffHeader {
    pub const SIZE: usize = 8;
    pub const MAGIC_NUMBER: u16 = 42;

    /// Validate the EXIF identifier and TIFF header inside `segment`.
    pub fn parse(data: &[u8], segment: &App1Segment) -> Result<Self, DecodeError> {
        let cursor = ByteCursor::new(data);
        let id_offset = segment.payload_offset();

        match cursor.bytes(id_offset, EXIF_IDENTIFIER.len()) {
            Some(id) if id == &EXIF_IDENTIFIER[..] => {}
            Some(_) => return Err(DecodeError::MalformedTiffHeader("missing Exif identifier")),
            None => return Err(DecodeError::MalformedTiffHeader("truncated Exif identifier")),
        }

        let start = id_offset + EXIF_IDENTIFIER.len();
        let Some(raw) = cursor.bytes(start, Self::SIZE) else {
            return Err(DecodeError::MalformedTiffHeader("truncated TIFF header"));
        };

        let byte_order = ByteOrder::from_marker([raw[0], raw[1]])
            .ok_or(DecodeError::MalformedTiffHeader("unknown byte order marker"))?;

        let magic = byte_order.u16([raw[2], raw[3]]);
        if magic != Self::MAGIC_NUMBER {
            log::debug!("TIFF magic is {magic}, expected {}", Self::MAGIC_NUMBER);
        }

        Ok(Self {
            byte_order,
            first_ifd_offset: byte_order.u32([raw[4], raw[5], raw[6], raw[7]]),
            start,
        })
    }

    /// Absolute buffer position of a TIFF-relative offset.
    pub fn absolute(&self, relative: u32) -> Option<usize> {
        self.start.checked_add(relative as usize)
    }
}
