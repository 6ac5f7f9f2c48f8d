use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for the command-line front end.
///
/// The decoder itself takes no configuration; these settings only control
/// which files are collected and how results are printed.
///
/// # Loading
///
/// ```rust,no_run
/// use photo_exif::config::Config;
///
/// // From a JSON file
/// let config = Config::load(Some("config.json".as_ref())).unwrap();
///
/// // Or use defaults and customize
/// let mut config = Config::default();
/// config.scan.follow_links = false;
/// config.output.json = true;
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Which files are picked up from the given paths.
    pub scan: ScanConfig,
    /// How results are reported.
    pub output: OutputConfig,
}

/// Controls file collection.
///
/// # Example
///
/// ```rust
/// use photo_exif::config::ScanConfig;
///
/// let scan = ScanConfig {
///     extensions: vec!["jpg".into()],
///     max_depth: Some(1),        // only the top level of each directory
///     ..ScanConfig::default()
/// };
/// assert!(scan.follow_links);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// File extensions to collect, matched case-insensitively.
    pub extensions: Vec<String>,
    /// Follow symbolic links while walking directories.
    pub follow_links: bool,
    /// Maximum directory depth to descend; `None` for unlimited.
    pub max_depth: Option<usize>,
    /// Files larger than this many bytes are skipped; 0 disables the limit.
    pub max_file_size: u64,
}

/// Output behavior.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Print results as a JSON array instead of tables.
    pub json: bool,
    /// Include empty fields in table output.
    pub show_empty: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: ["jpg", "jpeg", "jpe", "jfif"]
                .iter()
                .map(|e| e.to_string())
                .collect(),
            follow_links: true,
            max_depth: None,
            max_file_size: 0,
        }
    }
}

impl ScanConfig {
    /// Whether `path` has one of the configured extensions.
    pub fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
            .unwrap_or(false)
    }
}

impl Config {
    /// Resolve the config file path: `config.json` next to the executable.
    pub fn config_path() -> Result<PathBuf> {
        let exe_path = std::env::current_exe().context("Failed to get executable path")?;
        let exe_dir = exe_path
            .parent()
            .context("Failed to get executable directory")?;
        Ok(exe_dir.join("config.json"))
    }

    /// Load config from the given path, or from the default location.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        if !config_path.exists() {
            log::warn!(
                "Config file not found at {}. Using defaults.",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let contents =
            std::fs::read_to_string(&config_path).context("Failed to read config file")?;
        let config: Config =
            serde_json::from_str(&contents).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Save config to the given path, or to the default location.
    pub fn save(&self, path: Option<&Path>) -> Result<()> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&config_path, contents).context("Failed to write config file")?;
        log::info!("Config saved to {}", config_path.display());
        Ok(())
    }
}
