use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use photo_exif::{ExifDocument, config, pipeline};

#[derive(Parser, Debug)]
#[command(
    name = "photo-exif",
    version,
    about = "Read capture dates, camera identity, dimensions and GPS time from JPEG EXIF metadata"
)]
struct Cli {
    /// Image files or directories to scan
    #[arg(value_name = "PATH")]
    paths: Vec<PathBuf>,

    /// Path to config file (default: config.json next to binary)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Initialize a default config.json and exit
    #[arg(long)]
    init: bool,

    /// Output results as JSON
    #[arg(long)]
    json: bool,

    /// Include empty fields in table output
    #[arg(long)]
    show_empty: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Handle --init
    if cli.init {
        let config = config::Config::default();
        let path = cli.config.as_deref();
        config.save(path)?;
        let save_path = match path {
            Some(p) => p.to_path_buf(),
            None => config::Config::config_path()?,
        };
        println!("Default config written to {}", save_path.display());
        return Ok(());
    }

    if cli.paths.is_empty() {
        anyhow::bail!("No input files or directories specified. Use --help for usage.");
    }

    // Load config, CLI flags win
    let mut config = config::Config::load(cli.config.as_deref())?;
    if cli.json {
        config.output.json = true;
    }
    if cli.show_empty {
        config.output.show_empty = true;
    }

    let images = pipeline::collect_images(&cli.paths, &config.scan);
    if images.is_empty() {
        anyhow::bail!("No supported image files found in the specified paths.");
    }

    log::info!("Found {} image(s) to read", images.len());

    let total = images.len();
    let results = pipeline::process_images(&images);

    for result in &results {
        if let Some(ref err) = result.error {
            log::error!("{}: {err}", result.path.display());
            continue;
        }
        if !result.exif.has_exif {
            log::info!("{}: no EXIF segment", result.path.display());
        }
        if !config.output.json {
            print_document(result, config.output.show_empty);
        }
    }

    if config.output.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    }

    // Summary
    let with_exif = results.iter().filter(|r| r.exif.has_exif).count();
    let failed = results.iter().filter(|r| r.error.is_some()).count();
    log::info!("Done: {with_exif} with EXIF, {failed} unreadable, out of {total} images");

    Ok(())
}

// ANSI color codes
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

/// Overall table width, leading indent included.
const TABLE_WIDTH: usize = 72;

/// Column layout shared by every section of one file's table.
struct Table {
    tag_width: usize,
    value_width: usize,
}

impl Table {
    /// Size the tag column to the longest tag label; the value column takes
    /// the rest of the line after the indent and the " : " separator.
    fn for_tags<'t>(tags: impl IntoIterator<Item = &'t str>) -> Self {
        let tag_width = tags.into_iter().map(str::len).max().unwrap_or(0);
        Self {
            tag_width,
            value_width: TABLE_WIDTH.saturating_sub(tag_width + 5).max(16),
        }
    }

    /// One tag row, continuing long values under the value column.
    fn row(&self, tag: &str, val: &str) {
        let mut lines = wrap_value(val, self.value_width).into_iter();
        let first = lines.next().unwrap_or_default();
        println!("  {tag:<width$} : {first}", width = self.tag_width);
        for line in lines {
            println!("  {:width$}   {line}", "", width = self.tag_width);
        }
    }

    fn section(&self, title: &str, fields: &[(&str, String)], show_empty: bool) {
        if !show_empty && fields.iter().all(|(_, v)| v.is_empty()) {
            return;
        }
        println!("  {BOLD}{title}{RESET}");
        println!("  {DIM}{}{RESET}", "─".repeat(TABLE_WIDTH - 2));
        for (tag, val) in fields {
            if !val.is_empty() {
                self.row(tag, val);
            } else if show_empty {
                self.row(tag, &format!("{DIM}-{RESET}"));
            }
        }
        println!();
    }
}

/// Print the decoded metadata for one file, organized by section.
fn print_document(result: &pipeline::ProcessResult, show_empty: bool) {
    let doc = &result.exif;

    println!();
    println!("{BOLD}File:{RESET} {}", result.path.display());
    println!("{DIM}{}{RESET}", "═".repeat(TABLE_WIDTH));

    if !doc.has_exif {
        println!("  {DIM}(no EXIF metadata found){RESET}");
        println!();
        return;
    }

    let sections = document_sections(doc);
    let table = Table::for_tags(
        sections
            .iter()
            .flat_map(|(_, fields)| fields.iter().map(|(tag, _)| *tag)),
    );
    for (title, fields) in &sections {
        table.section(title, fields, show_empty);
    }

    if doc.is_empty() {
        println!("  {DIM}(EXIF segment present but no recognized fields){RESET}");
        println!();
    }
}

type Section = (&'static str, Vec<(&'static str, String)>);

/// The document's fields grouped under display headings.
fn document_sections(doc: &ExifDocument) -> Vec<Section> {
    vec![
        (
            "Camera",
            vec![
                ("Make", doc.camera_make.clone()),
                ("Model", doc.camera_model.clone()),
            ],
        ),
        (
            "Capture Dates",
            vec![
                ("DateTaken", doc.date_taken.clone()),
                ("DateTime", doc.date_time.clone()),
                ("DateTimeDigitized", doc.date_digitized.clone()),
            ],
        ),
        ("Image Properties", vec![("ImageSize", image_size(doc))]),
        (
            "GPS",
            vec![
                ("GPSDateStamp", doc.gps_date_stamp.clone()),
                ("GPSTimeStamp", doc.gps_time_stamp.clone()),
            ],
        ),
    ]
}

/// Width and height, or whichever one is known.
fn image_size(doc: &ExifDocument) -> String {
    match (doc.width, doc.height) {
        (0, 0) => String::new(),
        (w, 0) => format!("{w} x ?"),
        (0, h) => format!("? x {h}"),
        (w, h) => format!("{w} x {h}"),
    }
}

/// Split `s` into lines of at most `width` characters, breaking at the last
/// space that fits and cutting mid-word only when a word is longer than a line.
fn wrap_value(s: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut rest = s.trim();
    while rest.chars().count() > width {
        let cut = rest
            .char_indices()
            .nth(width)
            .map_or(rest.len(), |(i, _)| i);
        let split = rest[..cut].rfind(' ').filter(|&i| i > 0).unwrap_or(cut);
        lines.push(rest[..split].trim_end().to_string());
        rest = rest[split..].trim_start();
    }
    lines.push(rest.to_string());
    lines
}
