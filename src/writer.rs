/*!
 * Markdown writer implementation for mdcollect
 */

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Component, Path, PathBuf};

use crate::error::{MdCollectError, Result, ResultExt};
use crate::report::FileReportInfo;
use crate::selection::SelectionMap;

/// Connector for every sibling but the last
const TEE: &str = "├── ";
/// Connector for the last sibling
const CORNER: &str = "└── ";
/// Prefix below a sibling that has followers
const PIPE: &str = "│   ";
/// Prefix below the last sibling
const BLANK: &str = "    ";

/// Result of rendering a selection
#[derive(Debug, Clone, Default)]
pub struct Rendered {
    /// The markdown document
    pub text: String,
    /// Per-file statistics keyed by relative path
    pub file_details: BTreeMap<String, FileReportInfo>,
    /// Relative paths whose content could not be read
    pub failed: Vec<String>,
}

/// Name tree built from the selected relative paths
#[derive(Debug, Default)]
struct PathTree {
    children: BTreeMap<String, PathTree>,
}

impl PathTree {
    fn insert(&mut self, segments: &[String]) {
        if let Some((first, rest)) = segments.split_first() {
            self.children.entry(first.clone()).or_default().insert(rest);
        }
    }

    fn render(&self, prefix: &str, out: &mut Vec<String>) {
        let last = self.children.len().saturating_sub(1);
        for (i, (name, child)) in self.children.iter().enumerate() {
            let is_last = i == last;
            let connector = if is_last { CORNER } else { TEE };
            out.push(format!("{}{}{}", prefix, connector, name));
            let extension = if is_last { BLANK } else { PIPE };
            child.render(&format!("{}{}", prefix, extension), out);
        }
    }
}

/// Generate the markdown document for the selected files under `root`
pub fn generate(root: &Path, selection: &SelectionMap) -> String {
    MarkdownWriter::new(root).render(selection).text
}

/// Markdown writer for a selection
pub struct MarkdownWriter {
    /// Scan root the headings are relative to
    root: PathBuf,
}

/// A selected file with its heading path
struct Selected<'a> {
    path: &'a Path,
    relative: PathBuf,
}

impl MarkdownWriter {
    /// Create a new markdown writer
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Render and write the document to `output`
    pub fn write(&self, selection: &SelectionMap, output: &Path) -> Result<Rendered> {
        let rendered = self.render(selection);
        let file = File::create(output).with_context(|| format!("creating {}", output.display()))?;
        let mut writer = BufWriter::new(file);
        writer.write_all(rendered.text.as_bytes())?;
        writer.flush()?;
        tracing::info!(output = %output.display(), bytes = rendered.text.len(), "document written");
        Ok(rendered)
    }

    /// Render the directory tree and content blocks of every selected file
    ///
    /// Files are emitted in ascending relative-path order. A file that cannot
    /// be read gets an inline error in place of its content.
    pub fn render(&self, selection: &SelectionMap) -> Rendered {
        let mut selected: Vec<Selected> = selection
            .iter()
            .filter(|(_, &checked)| checked)
            .map(|(path, _)| Selected {
                path,
                relative: path.strip_prefix(&self.root).unwrap_or(path).to_path_buf(),
            })
            .collect();
        selected.sort_by(|a, b| a.relative.cmp(&b.relative));

        let mut rendered = Rendered {
            text: self.render_tree(&selected),
            ..Rendered::default()
        };

        let mut blocks = Vec::with_capacity(selected.len());
        for file in &selected {
            let heading = display_path(&file.relative);
            match read_content(file.path) {
                Ok(content) => {
                    rendered.file_details.insert(
                        heading.clone(),
                        FileReportInfo {
                            lines: content.lines().count(),
                            chars: content.chars().count(),
                        },
                    );
                    blocks.push(format!("## {}\n```\n{}\n```", heading, content));
                }
                Err(e) => {
                    tracing::warn!(path = %file.path.display(), error = %e, "cannot read selected file");
                    blocks.push(format!("## {}\n```\nError: {}\n```", heading, e));
                    rendered.failed.push(heading);
                }
            }
        }

        rendered.text.push_str(&blocks.join("\n"));
        rendered
    }

    /// Directory structure block, empty when nothing is selected
    fn render_tree(&self, selected: &[Selected]) -> String {
        if selected.is_empty() {
            return String::new();
        }

        let mut tree = PathTree::default();
        for file in selected {
            tree.insert(&segments(&file.relative));
        }

        let root_name = self
            .root
            .file_name()
            .unwrap_or(self.root.as_os_str())
            .to_string_lossy();
        let mut lines = Vec::new();
        tree.render("", &mut lines);

        format!(
            "# Directory Structure\n```\n{}\n{}\n```\n\n",
            root_name,
            lines.join("\n")
        )
    }
}

/// Read a file as text, replacing invalid UTF-8 sequences
fn read_content(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|source| MdCollectError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn segments(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(name) => Some(name.to_string_lossy().to_string()),
            Component::RootDir => Some(String::new()),
            _ => None,
        })
        .collect()
}

/// Relative path with `/` separators
fn display_path(path: &Path) -> String {
    segments(path).join("/")
}
