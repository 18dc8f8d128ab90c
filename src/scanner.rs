/*!
 * Directory scanning with exclusion rules
 */

use std::cell::RefCell;
use std::fs;
use std::path::Path;

use indicatif::ProgressBar;
use walkdir::{DirEntry, WalkDir};

use crate::config::ExclusionRules;
use crate::error::{MdCollectError, Result};
use crate::types::{FileNode, FolderNode, Node, TriState};
use crate::ensure;

/// Scanner statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScannerStatistics {
    /// Files kept in the tree
    pub files_found: usize,
    /// Folders kept in the tree, the root included
    pub folders_found: usize,
    /// Entries dropped by an exclusion rule
    pub entries_excluded: usize,
    /// Entries or subtrees dropped because they could not be read
    pub errors: usize,
}

/// Scanner for directory contents
pub struct Scanner {
    /// Exclusion rules
    rules: ExclusionRules,
    /// Progress bar
    pub progress: ProgressBar,
    /// Scanner statistics
    statistics: RefCell<ScannerStatistics>,
}

/// Scan `root` with `rules` without progress display
pub fn scan(root: &Path, rules: &ExclusionRules) -> Result<FolderNode> {
    Scanner::new(rules.clone(), ProgressBar::hidden()).scan(root)
}

fn entry_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}

impl Scanner {
    /// Create a new scanner
    pub fn new(rules: ExclusionRules, progress: ProgressBar) -> Self {
        Self {
            rules,
            progress,
            statistics: RefCell::new(ScannerStatistics::default()),
        }
    }

    /// Get scanner statistics
    pub fn get_statistics(&self) -> ScannerStatistics {
        self.statistics.borrow().clone()
    }

    /// Scan the root directory and return the folder tree
    ///
    /// Only a missing root, or one that is not a directory, is an error. A
    /// root that cannot be listed yields an empty tree, and everything below
    /// it degrades to a partial tree.
    pub fn scan(&self, root: &Path) -> Result<FolderNode> {
        ensure!(
            root.is_dir(),
            PathNotFound,
            "Target directory not found: {}",
            root.display()
        );
        let abs_path = fs::canonicalize(root).map_err(|source| MdCollectError::Scan {
            path: root.to_path_buf(),
            source,
        })?;

        *self.statistics.borrow_mut() = ScannerStatistics::default();
        let root_node = self.scan_directory(&abs_path);
        self.statistics.borrow_mut().folders_found += 1;

        let stats = self.get_statistics();
        tracing::info!(
            root = %abs_path.display(),
            files = stats.files_found,
            folders = stats.folders_found,
            excluded = stats.entries_excluded,
            errors = stats.errors,
            "scan complete"
        );
        Ok(root_node)
    }

    /// Scan a directory and return its node representation
    fn scan_directory(&self, abs_path: &Path) -> FolderNode {
        let entries: Vec<DirEntry> = WalkDir::new(abs_path)
            .max_depth(1)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    self.record_error(e.path().unwrap_or(abs_path), &e.to_string());
                    None
                }
            })
            .collect();

        // Split into directories and files, each keeping the name order
        let (dirs, files): (Vec<_>, Vec<_>) = entries
            .into_iter()
            .filter(|e| e.file_type().is_dir() || !self.is_linked_dir(e))
            .partition(|e| e.file_type().is_dir());

        let mut contents = Vec::new();

        for entry in dirs {
            let name = entry.file_name().to_string_lossy().to_string();
            if self.rules.excludes_name(&name, true) {
                self.record_excluded(entry.path());
                continue;
            }

            let folder = self.scan_directory(entry.path());
            if folder.contents.is_empty() {
                tracing::debug!(path = %entry.path().display(), "omitting empty folder");
            } else {
                self.statistics.borrow_mut().folders_found += 1;
                contents.push(Node::Folder(folder));
            }
        }

        for entry in files {
            if let Some(file) = self.process_file(entry.path()) {
                contents.push(Node::File(file));
            }
        }

        FolderNode {
            name: entry_name(abs_path),
            path: abs_path.to_path_buf(),
            contents,
            state: TriState::NoneSelected,
        }
    }

    /// Inspect a single file, returning `None` when it is excluded or unreadable
    fn process_file(&self, abs_path: &Path) -> Option<FileNode> {
        let name = entry_name(abs_path);
        if self.rules.excludes_name(&name, false) {
            self.record_excluded(abs_path);
            return None;
        }

        // Follows symlinks so a link to a regular file is scanned as that file
        let metadata = match fs::metadata(abs_path) {
            Ok(metadata) => metadata,
            Err(e) => {
                self.record_error(abs_path, &e.to_string());
                return None;
            }
        };
        if !metadata.is_file() {
            tracing::debug!(path = %abs_path.display(), "skipping special file");
            return None;
        }
        if self.rules.excludes_size(metadata.len()) {
            self.record_excluded(abs_path);
            return None;
        }
        let modified = match metadata.modified() {
            Ok(modified) => modified,
            Err(e) => {
                self.record_error(abs_path, &e.to_string());
                return None;
            }
        };

        self.progress.inc(1);
        // Truncate if too long to avoid display issues
        let char_count = name.chars().count();
        let display_name = if char_count > 40 {
            let tail: String = name.chars().skip(char_count - 37).collect();
            format!("...{}", tail)
        } else {
            name.clone()
        };
        self.progress
            .set_message(format!("Current file: {}", display_name));
        self.statistics.borrow_mut().files_found += 1;

        Some(FileNode {
            name,
            path: abs_path.to_path_buf(),
            size: metadata.len(),
            modified,
            selected: false,
        })
    }

    /// Symlinks to directories are never descended
    fn is_linked_dir(&self, entry: &DirEntry) -> bool {
        let linked = entry.path_is_symlink() && entry.path().is_dir();
        if linked {
            tracing::debug!(path = %entry.path().display(), "skipping symlinked directory");
        }
        linked
    }

    fn record_excluded(&self, path: &Path) {
        tracing::debug!(path = %path.display(), "excluded by rule");
        self.statistics.borrow_mut().entries_excluded += 1;
    }

    fn record_error(&self, path: &Path, cause: &str) {
        tracing::warn!(path = %path.display(), error = %cause, "skipping unreadable entry");
        self.statistics.borrow_mut().errors += 1;
    }
}
