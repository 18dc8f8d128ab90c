/*!
 * Core types and data structures for mdcollect
 */

use std::path::PathBuf;
use std::time::SystemTime;

/// Folder-level selection indicator derived from descendant files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriState {
    /// At least one descendant file exists and every one is selected
    AllSelected,
    /// No descendant file is selected, or there are none
    #[default]
    NoneSelected,
    /// Some but not all descendant files are selected
    Mixed,
}

impl TriState {
    /// Derive the state from descendant counts
    pub fn from_counts(selected: usize, total: usize) -> Self {
        if total > 0 && selected == total {
            Self::AllSelected
        } else if selected == 0 {
            Self::NoneSelected
        } else {
            Self::Mixed
        }
    }

    /// Checkbox marker used by the browse view
    pub fn marker(self) -> &'static str {
        match self {
            Self::AllSelected => "[x]",
            Self::NoneSelected => "[ ]",
            Self::Mixed => "[-]",
        }
    }
}

/// Represents a folder in the scanned tree
#[derive(Debug, Clone)]
pub struct FolderNode {
    /// Folder name
    pub name: String,
    /// Absolute path
    pub path: PathBuf,
    /// Child folders first, then child files
    pub contents: Vec<Node>,
    /// Selection state of the descendant files
    pub state: TriState,
}

impl FolderNode {
    /// Iterate over child folders
    pub fn folders(&self) -> impl Iterator<Item = &FolderNode> {
        self.contents.iter().filter_map(|node| match node {
            Node::Folder(folder) => Some(folder),
            Node::File(_) => None,
        })
    }

    /// Iterate over child files
    pub fn files(&self) -> impl Iterator<Item = &FileNode> {
        self.contents.iter().filter_map(|node| match node {
            Node::File(file) => Some(file),
            Node::Folder(_) => None,
        })
    }

    /// Number of files anywhere below this folder
    pub fn file_count(&self) -> usize {
        self.contents
            .iter()
            .map(|node| match node {
                Node::Folder(folder) => folder.file_count(),
                Node::File(_) => 1,
            })
            .sum()
    }
}

/// Represents a selectable file
#[derive(Debug, Clone)]
pub struct FileNode {
    /// File name
    pub name: String,
    /// Absolute path, the identity used by the selection mapping
    pub path: PathBuf,
    /// Size in bytes
    pub size: u64,
    /// Last modification time
    pub modified: SystemTime,
    /// Whether the file is marked for export
    pub selected: bool,
}

/// A generic tree node
#[derive(Debug, Clone)]
pub enum Node {
    /// Folder node
    Folder(FolderNode),
    /// File node
    File(FileNode),
}

impl Node {
    /// Display name of the node
    pub fn name(&self) -> &str {
        match self {
            Node::Folder(folder) => &folder.name,
            Node::File(file) => &file.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tri_state_from_counts() {
        assert_eq!(TriState::from_counts(0, 0), TriState::NoneSelected);
        assert_eq!(TriState::from_counts(0, 3), TriState::NoneSelected);
        assert_eq!(TriState::from_counts(1, 3), TriState::Mixed);
        assert_eq!(TriState::from_counts(3, 3), TriState::AllSelected);
    }
}
