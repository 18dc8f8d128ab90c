/*!
 * Configuration handling for mdcollect
 */

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use clap_complete::Shell;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{MdCollectError, Result, ResultExt};
use crate::{ensure, error};
use crate::sort::{SortDirection, SortKey};

/// Default maximum file size accepted by a scan (1 MiB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1024 * 1024;

/// Default exclusion rules used when no settings file provides them
pub static DEFAULT_RULES: Lazy<ExclusionRules> = Lazy::new(|| ExclusionRules {
    extensions: [".pyc", ".pyo", ".pyd", ".env"].map(String::from).to_vec(),
    files: [".gitignore", ".env", ".DS_Store"].map(String::from).to_vec(),
    folders: ["venv", ".venv", "node_modules", "__pycache__", ".git"]
        .map(String::from)
        .to_vec(),
    max_file_size: DEFAULT_MAX_FILE_SIZE,
});

/// Rules deciding which entries a scan omits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExclusionRules {
    /// Name suffixes to exclude (".pyc", ".env", ...)
    pub extensions: Vec<String>,
    /// Exact entry names to exclude
    pub files: Vec<String>,
    /// Exact directory names to exclude
    pub folders: Vec<String>,
    /// Files larger than this many bytes are excluded
    pub max_file_size: u64,
}

impl Default for ExclusionRules {
    fn default() -> Self {
        DEFAULT_RULES.clone()
    }
}

impl ExclusionRules {
    /// Rules that exclude nothing
    pub fn permissive() -> Self {
        Self {
            extensions: Vec::new(),
            files: Vec::new(),
            folders: Vec::new(),
            max_file_size: u64::MAX,
        }
    }

    /// Check the name-based rules for an entry
    pub fn excludes_name(&self, name: &str, is_dir: bool) -> bool {
        if self.extensions.iter().any(|ext| name.ends_with(ext.as_str())) {
            return true;
        }
        if self.files.iter().any(|file| file == name) {
            return true;
        }
        is_dir && self.folders.iter().any(|folder| folder == name)
    }

    /// Check the size ceiling for a file
    pub fn excludes_size(&self, size: u64) -> bool {
        size > self.max_file_size
    }
}

/// Settings persisted between runs as JSON
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Folder scanned by the last successful run
    pub last_folder_path: String,
    /// Exclusion rules
    pub exclude_patterns: ExclusionRules,
}

impl Settings {
    /// Read settings, failing on a missing or malformed file
    pub fn read(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        serde_json::from_str(&raw)
            .map_err(|e| error!(Config, "malformed settings file {}: {}", path.display(), e))
    }

    /// Load settings, falling back to defaults when the file is missing or malformed
    pub fn load(path: &Path) -> Self {
        match Self::read(path) {
            Ok(settings) => settings,
            Err(MdCollectError::Io(e)) => {
                tracing::debug!(path = %path.display(), error = %e, "no settings file, using defaults");
                Self::default()
            }
            Err(e) => {
                tracing::warn!(error = %e, "using default settings");
                Self::default()
            }
        }
    }

    /// Write the settings as pretty-printed JSON, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    /// Remembered folder, if it still exists
    pub fn last_folder(&self) -> Option<PathBuf> {
        let path = PathBuf::from(&self.last_folder_path);
        (!self.last_folder_path.is_empty() && path.is_dir()).then_some(path)
    }
}

/// Default location of the settings file
pub fn default_settings_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mdcollect")
        .join("config.json")
}

/// Command-line arguments for mdcollect
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "mdcollect",
    version = env!("CARGO_PKG_VERSION"),
    about = "Pick files from a directory tree and export them as one markdown document",
    long_about = "Scans a directory, marks the requested files and folders, and writes a markdown document containing a directory tree of the selection followed by the content of every selected file."
)]
pub struct Args {
    /// Directory to scan (defaults to the last scanned folder, then ".")
    pub directory_path: Option<String>,

    /// Write the markdown document to this file instead of stdout
    #[clap(short, long)]
    pub output: Option<String>,

    /// Comma-separated files or folders to select (relative to the directory)
    #[clap(long, value_delimiter = ',')]
    pub select: Vec<String>,

    /// Comma-separated files or folders to deselect
    #[clap(long, value_delimiter = ',')]
    pub deselect: Vec<String>,

    /// Comma-separated folders whose checkbox is toggled
    #[clap(long, value_delimiter = ',')]
    pub toggle: Vec<String>,

    /// Select every file visible after filtering
    #[clap(long)]
    pub select_all: bool,

    /// Only show entries whose name contains this text (case-insensitive)
    #[clap(long)]
    pub filter: Option<String>,

    /// Sort key for files; folders always sort by name
    #[clap(long, value_enum, default_value_t = SortKey::default())]
    pub sort: SortKey,

    /// Sort in descending order
    #[clap(long)]
    pub descending: bool,

    /// Print the browse view instead of generating the document
    #[clap(long)]
    pub list: bool,

    /// Comma-separated name suffixes to exclude (replaces the saved list)
    #[clap(long, value_delimiter = ',')]
    pub exclude_extensions: Option<Vec<String>>,

    /// Comma-separated exact file names to exclude (replaces the saved list)
    #[clap(long, value_delimiter = ',')]
    pub exclude_files: Option<Vec<String>>,

    /// Comma-separated folder names to exclude (replaces the saved list)
    #[clap(long, value_delimiter = ',')]
    pub exclude_folders: Option<Vec<String>>,

    /// Maximum file size in bytes
    #[clap(long, value_name = "BYTES")]
    pub max_file_size: Option<u64>,

    /// Path to the settings file
    #[clap(long, value_name = "FILE")]
    pub config: Option<String>,

    /// Do not print the export report
    #[clap(long)]
    pub no_report: bool,

    /// Log level used when RUST_LOG is not set
    #[clap(long, default_value = "warn")]
    pub log_level: String,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,
}

impl Args {
    /// Settings file given with `--config`, else the default location
    pub fn settings_path(&self) -> PathBuf {
        self.config
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(default_settings_path)
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Directory to scan
    pub target_dir: PathBuf,

    /// Output file, stdout when absent
    pub output_file: Option<PathBuf>,

    /// Exclusion rules for the scan
    pub rules: ExclusionRules,

    /// Whether the rules were overridden on the command line
    pub rules_overridden: bool,

    /// Paths to select
    pub select: Vec<PathBuf>,

    /// Paths to deselect
    pub deselect: Vec<PathBuf>,

    /// Folders to toggle
    pub toggle: Vec<PathBuf>,

    /// Select all visible files
    pub select_all: bool,

    /// Filter query
    pub filter: Option<String>,

    /// Sort key
    pub sort_key: SortKey,

    /// Sort direction
    pub sort_direction: SortDirection,

    /// Print the browse view
    pub list: bool,

    /// Print the export report
    pub report: bool,

    /// Settings file location
    pub settings_path: PathBuf,
}

/// Trim every entry and drop the empty ones
fn clean_list(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

fn clean_paths(values: Vec<String>) -> Vec<PathBuf> {
    clean_list(values).into_iter().map(PathBuf::from).collect()
}

impl Config {
    /// Create configuration from command-line arguments and saved settings
    pub fn from_args(args: Args, settings: &Settings) -> Self {
        let settings_path = args.settings_path();
        let target_dir = match args.directory_path {
            Some(dir) => PathBuf::from(dir),
            None => settings.last_folder().unwrap_or_else(|| PathBuf::from(".")),
        };

        let mut rules = settings.exclude_patterns.clone();
        let rules_overridden = args.exclude_extensions.is_some()
            || args.exclude_files.is_some()
            || args.exclude_folders.is_some()
            || args.max_file_size.is_some();
        if let Some(extensions) = args.exclude_extensions {
            rules.extensions = clean_list(extensions);
        }
        if let Some(files) = args.exclude_files {
            rules.files = clean_list(files);
        }
        if let Some(folders) = args.exclude_folders {
            rules.folders = clean_list(folders);
        }
        if let Some(max) = args.max_file_size {
            rules.max_file_size = max;
        }

        Self {
            target_dir,
            output_file: args.output.map(PathBuf::from),
            rules,
            rules_overridden,
            select: clean_paths(args.select),
            deselect: clean_paths(args.deselect),
            toggle: clean_paths(args.toggle),
            select_all: args.select_all,
            filter: args.filter,
            sort_key: args.sort,
            sort_direction: if args.descending {
                SortDirection::Descending
            } else {
                SortDirection::Ascending
            },
            list: args.list,
            report: !args.no_report,
            settings_path,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.target_dir.is_dir(),
            PathNotFound,
            "Target directory not found: {}",
            self.target_dir.display()
        );

        if let Some(parent) = self.output_file.as_ref().and_then(|p| p.parent()) {
            ensure!(
                parent.as_os_str().is_empty() || parent.exists(),
                PathNotFound,
                "Output directory not found: {}",
                parent.display()
            );
        }

        Ok(())
    }
}
