use anyhow::{Context, Result};
use std::path::Path;

use super::document::ExifDocument;

/// Read a JPEG file from disk and decode its EXIF metadata.
///
/// Only I/O failures are errors. A file that is not a JPEG, or carries no
/// EXIF segment, yields an empty document just like [`parse`](super::parse).
pub fn read_exif(path: &Path) -> Result<ExifDocument> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read image file {}", path.display()))?;

    let doc = super::parse(&bytes);
    if !doc.has_exif {
        log::debug!("No EXIF data found in {}", path.display());
    }
    Ok(doc)
}
