//! EXIF decoding for JPEG byte streams.
//!
//! The decoder runs in four steps:
//!
//! 1. [`segment`] checks the start-of-image marker and finds the EXIF APP1 segment
//! 2. [`header`] validates `Exif\0\0` and the TIFF header, fixing the byte order
//! 3. [`ifd`] walks IFD0, its chain, and the Exif and GPS sub-directories
//! 4. [`tags`] decodes each recognized entry into the [`ExifDocument`]
//!
//! Structural problems in steps 1 and 2 yield an empty document with
//! `has_exif == false`. Once the header validates, the document reports
//! `has_exif == true` and carries every field that could be recovered.
//!
//! [`read_exif`] is a convenience wrapper that loads a file first.

mod cursor;
mod document;
mod error;
mod header;
mod ifd;
mod reader;
mod segment;
mod tags;

#[cfg(test)]
pub(crate) mod fixtures;

pub use cursor::ByteOrder;
pub use document::ExifDocument;
pub use reader::read_exif;

use error::DecodeError;
use header::TiffHeader;
use ifd::IfdWalker;

/// Decode the EXIF metadata of a complete JPEG file held in `buffer`.
///
/// Never fails and never panics: anything that is not a JPEG with a
/// well-formed EXIF segment comes back as [`ExifDocument::default()`], and
/// damaged values inside an otherwise valid segment leave only their own
/// field empty. The same bytes always produce the same document.
///
/// ```rust
/// let doc = photo_exif::parse(b"not a jpeg");
/// assert!(!doc.has_exif);
/// assert!(doc.is_empty());
/// ```
pub fn parse(buffer: &[u8]) -> ExifDocument {
    match decode(buffer) {
        Ok(doc) => doc,
        Err(e) => {
            log::debug!("No EXIF metadata: {e}");
            ExifDocument::default()
        }
    }
}

fn decode(buffer: &[u8]) -> Result<ExifDocument, DecodeError> {
    let segment = segment::locate_app1(buffer)?;
    let header = TiffHeader::parse(buffer, &segment)?;
    log::trace!(
        "TIFF header at {}: {:?}, IFD0 at {}",
        header.start,
        header.byte_order,
        header.first_ifd_offset
    );

    let mut doc = ExifDocument {
        has_exif: true,
        ..Default::default()
    };
    let summary = IfdWalker::new(buffer, header).walk(&mut doc);
    log::debug!(
        "EXIF walk: {} directories, {} entries, {} fields, {} truncated, {} cycles, {} over budget",
        summary.directories,
        summary.entries,
        summary.fields,
        summary.truncated,
        summary.cycles,
        summary.over_budget
    );
    Ok(doc)
}
