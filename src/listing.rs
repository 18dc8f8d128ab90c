/*!
 * Text rendering of the browse view
 */

use crate::selection::{FolderId, SelectionTree};
use crate::utils::{format_file_size, format_timestamp};

/// Draw the visible tree with selection markers
///
/// Folders show `[x]`, `[-]` or `[ ]` for all, some or none of their files
/// selected. Files show their size and modification time.
pub fn render_listing(tree: &SelectionTree) -> String {
    let root = tree.root();
    let mut lines = vec![format!(
        "{} {}/",
        tree.tri_state(root).marker(),
        tree.folder_name(root)
    )];
    if let Some(query) = tree.active_filter() {
        lines.push(format!("(filter: \"{}\")", query));
    }

    render_folder(tree, root, "", &mut lines);
    if tree.children(root).is_empty() {
        lines.push("(no entries)".to_string());
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

fn render_folder(tree: &SelectionTree, id: FolderId, prefix: &str, lines: &mut Vec<String>) {
    let children = tree.children(id);
    let count = children.folders.len() + children.files.len();

    for (i, &folder) in children.folders.iter().enumerate() {
        let is_last = i + 1 == count;
        lines.push(format!(
            "{}{}{} {}/",
            prefix,
            if is_last { "└── " } else { "├── " },
            tree.tri_state(folder).marker(),
            tree.folder_name(folder)
        ));
        let nested = format!("{}{}", prefix, if is_last { "    " } else { "│   " });
        render_folder(tree, folder, &nested, lines);
    }

    for (i, &file) in children.files.iter().enumerate() {
        let is_last = children.folders.len() + i + 1 == count;
        let node = tree.file(file);
        lines.push(format!(
            "{}{}{} {}  ({}, {})",
            prefix,
            if is_last { "└── " } else { "├── " },
            if node.selected { "[x]" } else { "[ ]" },
            node.name,
            format_file_size(node.size),
            format_timestamp(node.modified)
        ));
    }
}
