/*!
 * Name filter over a `SelectionTree`
 *
 * Filtering only narrows which children each folder exposes through
 * `SelectionTree::children`. File flags and folder states are never touched,
 * and the full child lists stay in place so `clear_filter` restores them as
 * they were.
 */

use crate::selection::{Children, FolderId, SelectionTree};

impl SelectionTree {
    /// Show only entries whose name contains `query`, case-insensitively
    ///
    /// A folder whose own name matches is shown with all of its contents.
    /// Any other folder is shown only when something below it matches.
    /// A blank query clears the filter.
    pub fn apply_filter(&mut self, query: &str) {
        let query = query.trim().to_lowercase();
        self.clear_filter();
        if query.is_empty() {
            return;
        }

        // The root is the list itself and never matches by name
        let root = self.root();
        let kept = self.filter_children(root, &query);
        tracing::debug!(
            query = %query,
            folders = kept.folders.len(),
            files = kept.files.len(),
            "filter applied"
        );
        self.folders[root.0].view = Some(kept);
        self.filter = Some(query);
    }

    /// Restore every folder's full child list
    pub fn clear_filter(&mut self) {
        for folder in &mut self.folders {
            folder.view = None;
        }
        self.filter = None;
    }

    /// Active filter query, lowercased
    pub fn active_filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    /// Whether a filter currently narrows the view
    pub fn is_filtered(&self) -> bool {
        self.filter.is_some()
    }

    /// Returns whether the folder stays visible
    fn filter_folder(&mut self, id: FolderId, query: &str) -> bool {
        if self.folders[id.0].name.to_lowercase().contains(query) {
            return true;
        }

        let kept = self.filter_children(id, query);
        let visible = !kept.is_empty();
        self.folders[id.0].view = Some(kept);
        visible
    }

    fn filter_children(&mut self, id: FolderId, query: &str) -> Children {
        let children = self.folders[id.0].children.clone();
        let mut kept = Children::default();

        for folder in children.folders {
            if self.filter_folder(folder, query) {
                kept.folders.push(folder);
            }
        }
        kept.files = children
            .files
            .into_iter()
            .filter(|&file| self.file(file).name.to_lowercase().contains(query))
            .collect();

        kept
    }
}
