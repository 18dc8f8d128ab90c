/*!
 * Sibling ordering for a `SelectionTree`
 */

use std::cmp::Ordering;

use clap::ValueEnum;
use strum::{Display, EnumString};

use crate::selection::{Children, FileId, FolderId, SelectionTree};

/// Key used to order files; folders always order by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum SortKey {
    /// Lowercased file name
    #[default]
    Name,
    /// Last modification time
    Modified,
    /// Size in bytes
    Size,
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

impl SelectionTree {
    /// Reorder the siblings of every folder
    ///
    /// Folders stay ahead of files in either direction. The full child lists
    /// and any filtered view are reordered alike, so clearing a filter keeps
    /// the order. The sort is stable.
    pub fn sort(&mut self, key: SortKey, direction: SortDirection) {
        for index in 0..self.folders.len() {
            let mut children = std::mem::take(&mut self.folders[index].children);
            self.sort_children(&mut children, key, direction);
            self.folders[index].children = children;

            if let Some(mut view) = self.folders[index].view.take() {
                self.sort_children(&mut view, key, direction);
                self.folders[index].view = Some(view);
            }
        }
        tracing::debug!(%key, %direction, "tree sorted");
    }

    fn sort_children(&self, children: &mut Children, key: SortKey, direction: SortDirection) {
        children
            .folders
            .sort_by(|&a, &b| direction.apply(self.compare_folders(a, b)));
        children
            .files
            .sort_by(|&a, &b| direction.apply(self.compare_files(a, b, key)));
    }

    fn compare_folders(&self, a: FolderId, b: FolderId) -> Ordering {
        self.folder_name(a)
            .to_lowercase()
            .cmp(&self.folder_name(b).to_lowercase())
    }

    fn compare_files(&self, a: FileId, b: FileId, key: SortKey) -> Ordering {
        let (a, b) = (self.file(a), self.file(b));
        match key {
            SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortKey::Modified => a.modified.cmp(&b.modified),
            SortKey::Size => a.size.cmp(&b.size),
        }
    }
}
