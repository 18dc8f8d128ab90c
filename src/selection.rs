/*!
 * Selection state engine
 *
 * `SelectionTree` flattens a scanned `FolderNode` into an arena of folders and
 * files addressed by `FolderId` / `FileId`. Every folder caches how many of its
 * descendant files exist and how many are selected; its `TriState` is derived
 * from those two counts and refreshed along the ancestor chain after every
 * mutation, so no public call can observe a stale state.
 *
 * Each folder keeps its full child list (the baseline) and, while a filter is
 * active, an optional narrowed view of it. See `filter.rs` and `sort.rs` for
 * the operations that touch those lists.
 */

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use crate::bail;
use crate::error::Result;
use crate::types::{FileNode, FolderNode, Node, TriState};

/// Path to selected-flag mapping over every file of a tree
pub type SelectionMap = BTreeMap<PathBuf, bool>;

/// Handle of a folder inside a `SelectionTree`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FolderId(pub(crate) usize);

/// Handle of a file inside a `SelectionTree`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(pub(crate) usize);

/// A resolved tree entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    Folder(FolderId),
    File(FileId),
}

/// Ordered child handles of one folder
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Children {
    pub folders: Vec<FolderId>,
    pub files: Vec<FileId>,
}

impl Children {
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.files.is_empty()
    }
}

#[derive(Debug, Clone)]
pub(crate) struct FolderEntry {
    pub(crate) name: String,
    pub(crate) path: PathBuf,
    pub(crate) parent: Option<FolderId>,
    /// Full child list
    pub(crate) children: Children,
    /// Narrowed child list while a filter is active
    pub(crate) view: Option<Children>,
    selected: usize,
    total: usize,
    state: TriState,
}

#[derive(Debug, Clone)]
pub(crate) struct FileEntry {
    pub(crate) node: FileNode,
    parent: FolderId,
}

/// Hierarchical tri-state selection model over a scanned tree
#[derive(Debug, Clone)]
pub struct SelectionTree {
    /// Folders in pre-order: a parent always precedes its descendants
    pub(crate) folders: Vec<FolderEntry>,
    pub(crate) files: Vec<FileEntry>,
    by_path: HashMap<PathBuf, FileId>,
    pub(crate) filter: Option<String>,
}

impl SelectionTree {
    /// Build the model from a scan result
    ///
    /// Selection flags carried by the scan are kept, and folder states are
    /// computed from them.
    pub fn new(root: FolderNode) -> Self {
        let file_count = root.file_count();
        let mut tree = Self {
            folders: Vec::new(),
            files: Vec::with_capacity(file_count),
            by_path: HashMap::with_capacity(file_count),
            filter: None,
        };
        tree.insert_folder(root, None);
        tree.recompute_all();
        tree
    }

    fn insert_folder(&mut self, folder: FolderNode, parent: Option<FolderId>) -> FolderId {
        let id = FolderId(self.folders.len());
        self.folders.push(FolderEntry {
            name: folder.name,
            path: folder.path,
            parent,
            children: Children::default(),
            view: None,
            selected: 0,
            total: 0,
            state: TriState::NoneSelected,
        });

        for node in folder.contents {
            match node {
                Node::Folder(child) => {
                    let child_id = self.insert_folder(child, Some(id));
                    self.folders[id.0].children.folders.push(child_id);
                }
                Node::File(file) => {
                    let file_id = FileId(self.files.len());
                    if self.by_path.insert(file.path.clone(), file_id).is_some() {
                        tracing::warn!(path = %file.path.display(), "duplicate file path in scan");
                    }
                    self.files.push(FileEntry {
                        node: file,
                        parent: id,
                    });
                    self.folders[id.0].children.files.push(file_id);
                }
            }
        }

        id
    }

    /// The scan root
    pub fn root(&self) -> FolderId {
        FolderId(0)
    }

    /// Absolute path of the scan root
    pub fn root_path(&self) -> &Path {
        &self.folders[0].path
    }

    /// Folder name
    pub fn folder_name(&self, id: FolderId) -> &str {
        &self.folders[id.0].name
    }

    /// Absolute folder path
    pub fn folder_path(&self, id: FolderId) -> &Path {
        &self.folders[id.0].path
    }

    /// Parent folder, `None` for the root
    pub fn parent(&self, id: FolderId) -> Option<FolderId> {
        self.folders[id.0].parent
    }

    /// File node behind a handle
    pub fn file(&self, id: FileId) -> &FileNode {
        &self.files[id.0].node
    }

    /// Folder containing a file
    pub fn file_parent(&self, id: FileId) -> FolderId {
        self.files[id.0].parent
    }

    /// Full child list of a folder, ignoring any filter
    pub fn all_children(&self, id: FolderId) -> &Children {
        &self.folders[id.0].children
    }

    /// Child list reachable in the current view
    pub fn children(&self, id: FolderId) -> &Children {
        let folder = &self.folders[id.0];
        folder.view.as_ref().unwrap_or(&folder.children)
    }

    /// Number of files in the tree
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Number of selected files
    pub fn selected_count(&self) -> usize {
        self.folders[0].selected
    }

    /// Resolve an absolute or root-relative path to a file handle
    pub fn file_id(&self, path: &Path) -> Option<FileId> {
        self.by_path
            .get(path)
            .or_else(|| self.by_path.get(&self.root_path().join(path)))
            .copied()
    }

    /// Resolve an absolute or root-relative path to a folder or file
    pub fn lookup(&self, path: &Path) -> Option<Entry> {
        if let Some(file) = self.file_id(path) {
            return Some(Entry::File(file));
        }

        let relative = path.strip_prefix(self.root_path()).unwrap_or(path);
        let mut current = self.root();
        for component in relative.components() {
            let name = component.as_os_str().to_string_lossy();
            if name == "." {
                continue;
            }
            current = *self
                .all_children(current)
                .folders
                .iter()
                .find(|&&child| self.folder_name(child) == name)?;
        }
        Some(Entry::Folder(current))
    }

    /// Cached tri-state of a folder
    pub fn tri_state(&self, id: FolderId) -> TriState {
        self.folders[id.0].state
    }

    /// Select or deselect one file, then refresh its ancestors
    ///
    /// Returns the folders whose state changed, nearest first.
    pub fn set_file(&mut self, path: &Path, selected: bool) -> Result<Vec<FolderId>> {
        let Some(id) = self.file_id(path) else {
            bail!(PathNotFound, "File not in tree: {}", path.display());
        };
        Ok(self.set_file_by_id(id, selected))
    }

    /// Select or deselect one file by handle
    pub fn set_file_by_id(&mut self, id: FileId, selected: bool) -> Vec<FolderId> {
        let entry = &mut self.files[id.0];
        if entry.node.selected == selected {
            return Vec::new();
        }
        entry.node.selected = selected;
        tracing::debug!(path = %entry.node.path.display(), selected, "file selection changed");
        let parent = entry.parent;
        self.refresh_ancestors(Some(parent))
    }

    /// Set every file below a folder, ignoring any filter
    ///
    /// Returns the folders whose state changed, the subtree first and then
    /// the ancestors, each bottom-up.
    pub fn set_folder(&mut self, id: FolderId, selected: bool) -> Vec<FolderId> {
        let subtree = self.subtree(id);
        for &folder in &subtree {
            for &file in &self.folders[folder.0].children.files {
                self.files[file.0].node.selected = selected;
            }
        }
        tracing::debug!(folder = %self.folder_path(id).display(), selected, "folder selection set");

        let mut changed: Vec<FolderId> = subtree
            .into_iter()
            .rev()
            .filter(|&folder| self.refresh(folder))
            .collect();
        let parent = self.parent(id);
        changed.extend(self.refresh_ancestors(parent));
        changed
    }

    /// Select everything when the folder is not fully selected, otherwise clear it
    pub fn toggle_folder(&mut self, id: FolderId) -> Vec<FolderId> {
        let select = self.tri_state(id) != TriState::AllSelected;
        self.set_folder(id, select)
    }

    /// Select or deselect an entry given by path
    pub fn set_path(&mut self, path: &Path, selected: bool) -> Result<Vec<FolderId>> {
        match self.lookup(path) {
            Some(Entry::File(id)) => Ok(self.set_file_by_id(id, selected)),
            Some(Entry::Folder(id)) => Ok(self.set_folder(id, selected)),
            None => bail!(PathNotFound, "Not in tree: {}", path.display()),
        }
    }

    /// Set every file reachable in the current view
    pub fn set_visible(&mut self, selected: bool) -> Vec<FolderId> {
        let mut stack = vec![self.root()];
        while let Some(folder) = stack.pop() {
            let children = self.children(folder).clone();
            for file in children.files {
                self.files[file.0].node.selected = selected;
            }
            stack.extend(children.folders);
        }
        self.recompute_all()
    }

    /// Recompute every folder state from the file flags, bottom-up
    pub fn recompute_all(&mut self) -> Vec<FolderId> {
        (0..self.folders.len())
            .rev()
            .map(FolderId)
            .filter(|&folder| self.refresh(folder))
            .collect()
    }

    /// Current selection of every file
    pub fn selection(&self) -> SelectionMap {
        self.files
            .iter()
            .map(|entry| (entry.node.path.clone(), entry.node.selected))
            .collect()
    }

    /// Absolute paths of the selected files in ascending order
    pub fn selected_paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self
            .files
            .iter()
            .filter(|entry| entry.node.selected)
            .map(|entry| entry.node.path.clone())
            .collect();
        paths.sort();
        paths
    }

    /// Rebuild an owned tree of what is currently visible
    pub fn view(&self) -> FolderNode {
        self.view_folder(self.root())
    }

    fn view_folder(&self, id: FolderId) -> FolderNode {
        let folder = &self.folders[id.0];
        let children = self.children(id);
        let contents = children
            .folders
            .iter()
            .map(|&child| Node::Folder(self.view_folder(child)))
            .chain(
                children
                    .files
                    .iter()
                    .map(|&file| Node::File(self.file(file).clone())),
            )
            .collect();

        FolderNode {
            name: folder.name.clone(),
            path: folder.path.clone(),
            contents,
            state: folder.state,
        }
    }

    /// Folder and its descendants in pre-order
    fn subtree(&self, id: FolderId) -> Vec<FolderId> {
        let mut order = Vec::new();
        let mut stack = vec![id];
        while let Some(folder) = stack.pop() {
            order.push(folder);
            stack.extend(self.folders[folder.0].children.folders.iter().rev());
        }
        order
    }

    fn refresh_ancestors(&mut self, start: Option<FolderId>) -> Vec<FolderId> {
        let mut changed = Vec::new();
        let mut current = start;
        while let Some(folder) = current {
            if self.refresh(folder) {
                changed.push(folder);
            }
            current = self.parent(folder);
        }
        changed
    }

    /// Recount one folder from its direct children; child folders must be current
    fn refresh(&mut self, id: FolderId) -> bool {
        let folder = &self.folders[id.0];
        let mut selected = 0;
        let mut total = folder.children.files.len();
        for &file in &folder.children.files {
            if self.files[file.0].node.selected {
                selected += 1;
            }
        }
        for &child in &folder.children.folders {
            selected += self.folders[child.0].selected;
            total += self.folders[child.0].total;
        }

        let state = TriState::from_counts(selected, total);
        let folder = &mut self.folders[id.0];
        let changed = folder.state != state;
        folder.selected = selected;
        folder.total = total;
        folder.state = state;
        changed
    }
}
