use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::ScanConfig;
use crate::exif::{self, ExifDocument};

/// The outcome of decoding one file.
///
/// `error` is only set when the file could not be read; a readable file
/// without EXIF data gives an empty `exif` with `has_exif == false`.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessResult {
    pub path: PathBuf,
    pub exif: ExifDocument,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Collect image files from the given paths.
///
/// Accepts a mix of file paths and directory paths. Directories are walked
/// recursively (down to `max_depth`, following symlinks when configured).
/// Only files whose extension is listed in [`ScanConfig::extensions`] and
/// whose size fits `max_file_size` are included. Results are sorted within
/// each directory so repeated runs list files in the same order.
///
/// # Example
///
/// ```rust,no_run
/// use photo_exif::config::ScanConfig;
/// use photo_exif::pipeline::collect_images;
/// use std::path::PathBuf;
///
/// let images = collect_images(
///     &[
///         PathBuf::from("photo.jpg"),  // single file
///         PathBuf::from("./photos/"),  // entire directory
///     ],
///     &ScanConfig::default(),
/// );
/// println!("Found {} images", images.len());
/// ```
pub fn collect_images(paths: &[PathBuf], scan: &ScanConfig) -> Vec<PathBuf> {
    let mut images = Vec::new();

    for path in paths {
        if path.is_file() {
            if is_wanted(path, scan) {
                images.push(path.clone());
            } else {
                log::warn!("Skipping unsupported file: {}", path.display());
            }
        } else if path.is_dir() {
            let mut walker = WalkDir::new(path)
                .follow_links(scan.follow_links)
                .sort_by_file_name();
            if let Some(depth) = scan.max_depth {
                walker = walker.max_depth(depth);
            }
            for entry in walker.into_iter().filter_map(|e| e.ok()) {
                let p = entry.path();
                if p.is_file() && is_wanted(p, scan) {
                    images.push(p.to_path_buf());
                }
            }
        } else {
            log::warn!("Path does not exist: {}", path.display());
        }
    }

    images
}

/// Extension and size filter.
fn is_wanted(path: &Path, scan: &ScanConfig) -> bool {
    if !scan.matches_extension(path) {
        return false;
    }
    if scan.max_file_size == 0 {
        return true;
    }
    match std::fs::metadata(path) {
        Ok(meta) if meta.len() > scan.max_file_size => {
            log::info!(
                "Skipping {} ({} bytes exceeds limit)",
                path.display(),
                meta.len()
            );
            false
        }
        Ok(_) => true,
        Err(e) => {
            log::warn!("Cannot stat {}: {e}", path.display());
            false
        }
    }
}

/// Decode the EXIF metadata of a single file.
pub fn process_image(path: &Path) -> ProcessResult {
    match exif::read_exif(path) {
        Ok(exif) => ProcessResult {
            path: path.to_path_buf(),
            exif,
            error: None,
        },
        Err(e) => ProcessResult {
            path: path.to_path_buf(),
            exif: ExifDocument::default(),
            error: Some(format!("{e:#}")),
        },
    }
}

/// Decode every file in `paths`, in order. The returned results are owned by
/// the caller; nothing is retained between calls.
pub fn process_images(paths: &[PathBuf]) -> Vec<ProcessResult> {
    let total = paths.len();
    paths
        .iter()
        .enumerate()
        .map(|(i, path)| {
            log::info!("[{}/{}] Reading: {}", i + 1, total, path.display());
            process_image(path)
        })
        .collect()
}
