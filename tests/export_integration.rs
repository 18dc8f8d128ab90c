/*!
 * Integration test for a full scan, select and export cycle
 */

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use tempfile::tempdir;

use mdcollect::{
    scan, Entry, ExclusionRules, MarkdownWriter, SelectionTree, Settings, SortDirection, SortKey,
    TriState,
};

fn write_file(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut file = File::create(path).unwrap();
    write!(file, "{}", content).unwrap();
}

#[test]
fn test_export_with_saved_rules() {
    let project = tempdir().unwrap();
    let root = project.path();
    write_file(root, "src/app.py", "print('hi')\n");
    write_file(root, "src/app.pyc", "\0\0\0");
    write_file(root, "src/__pycache__/app.cpython.pyc", "\0");
    write_file(root, "docs/guide.md", "# Guide\n");
    write_file(root, "docs/draft.md", "wip\n");
    write_file(root, "secret.env", "TOKEN=1\n");

    // Rules come from the settings file, as the binary loads them
    let config_dir = tempdir().unwrap();
    let settings_path = config_dir.path().join("config.json");
    let mut settings = Settings::default();
    settings.last_folder_path = root.to_string_lossy().to_string();
    settings.save(&settings_path).unwrap();
    let settings = Settings::load(&settings_path);
    assert_eq!(settings.exclude_patterns, ExclusionRules::default());

    let mut tree = SelectionTree::new(scan(root, &settings.exclude_patterns).unwrap());
    assert_eq!(tree.file_count(), 3);

    tree.sort(SortKey::Name, SortDirection::Descending);
    tree.apply_filter("guide");
    tree.set_visible(true);
    tree.clear_filter();
    tree.set_path(Path::new("src"), true).unwrap();

    let docs = match tree.lookup(Path::new("docs")) {
        Some(Entry::Folder(id)) => id,
        other => panic!("docs not found: {:?}", other),
    };
    assert_eq!(tree.tri_state(docs), TriState::Mixed);
    assert_eq!(tree.tri_state(tree.root()), TriState::Mixed);

    let output = config_dir.path().join("out.md");
    let rendered = MarkdownWriter::new(tree.root_path())
        .write(&tree.selection(), &output)
        .unwrap();
    let text = fs::read_to_string(&output).unwrap();

    assert_eq!(text, rendered.text);
    assert!(text.starts_with("# Directory Structure\n```\n"));
    assert!(text.contains("├── docs\n│   └── guide.md\n└── src\n    └── app.py\n```\n\n"));
    let guide = text.find("## docs/guide.md").unwrap();
    let app = text.find("## src/app.py").unwrap();
    assert!(guide < app);
    assert!(!text.contains("draft.md"));
    assert!(!text.contains(".pyc"));
    assert!(!text.contains("secret.env"));
    assert!(rendered.failed.is_empty());
}
