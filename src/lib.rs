//! # photo-exif
//!
//! A defensive EXIF reader for JPEG files. It recovers capture dates, camera
//! make and model, pixel dimensions, and the GPS date and time stamps from a
//! JPEG's APP1 segment without ever failing: malformed input produces an
//! empty [`ExifDocument`] instead of an error or a panic.
//!
//! ## Quick Start
//!
//! Decode bytes you already hold:
//!
//! ```rust
//! let doc = photo_exif::parse(&[0xFF, 0xD8, 0xFF, 0xD9]);
//! assert!(!doc.has_exif);
//! assert_eq!(doc.capture_date(), None);
//! ```
//!
//! Or read files straight from disk, optionally through the pipeline:
//!
//! ```rust,no_run
//! use photo_exif::config::Config;
//! use photo_exif::pipeline::{collect_images, process_image};
//! use std::path::PathBuf;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::load(Some("config.json".as_ref()))?;
//!
//!     // Collect JPEG files from paths (files or directories)
//!     let images = collect_images(&[PathBuf::from("./photos")], &config.scan);
//!
//!     for path in &images {
//!         let result = process_image(path);
//!         match (&result.error, result.exif.capture_date()) {
//!             (Some(err), _) => eprintln!("{}: {err}", path.display()),
//!             (None, Some(date)) => println!("{}: taken {date}", path.display()),
//!             (None, None) => println!("{}: no capture date", path.display()),
//!         }
//!     }
//!
//!     let single = photo_exif::read_exif("photo.jpg".as_ref())?;
//!     println!("Camera: {} {}", single.camera_make, single.camera_model);
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`exif`]: JPEG segment location, TIFF header, IFD walking and tag decoding
//! - [`config`]: Configuration types and loading/saving for the CLI
//! - [`pipeline`]: File collection and per-file processing

pub mod config;
pub mod exif;
pub mod pipeline;

pub use exif::{ByteOrder, ExifDocument, parse, read_exif};
