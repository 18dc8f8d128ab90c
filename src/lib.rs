/*!
 * mdcollect - Export a hand-picked subset of a directory as markdown
 *
 * This library scans a directory into a tree, tracks which files are marked
 * with folder-level tri-state checkboxes, filters and sorts the browse view,
 * and renders the marked files as one markdown document.
 */

pub mod config;
pub mod error;
pub mod filter;
pub mod listing;
pub mod report;
pub mod scanner;
pub mod selection;
pub mod sort;
pub mod types;
pub mod utils;
pub mod writer;


// Re-export main components for easier access
pub use config::{Config, ExclusionRules, Settings};
pub use error::{MdCollectError, Result};
pub use listing::render_listing;
pub use report::{ExportReport, FileReportInfo, ReportFormat, Reporter};
pub use scanner::{scan, Scanner};
pub use selection::{Entry, FileId, FolderId, SelectionMap, SelectionTree};
pub use sort::{SortDirection, SortKey};
pub use types::{FileNode, FolderNode, Node, TriState};
pub use utils::format_file_size;
pub use writer::{generate, MarkdownWriter, Rendered};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
