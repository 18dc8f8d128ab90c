/*!
 * Reporting functionality for mdcollect
 *
 * Renders a summary of an export with the tabled library.
 */

use std::collections::BTreeMap;
use std::time::Duration;

use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::writer::Rendered;

/// Information about a file in the report
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileReportInfo {
    /// Number of lines in the file
    pub lines: usize,
    /// Number of characters in the file
    pub chars: usize,
}

/// Statistics for one export
#[derive(Debug, Clone)]
pub struct ExportReport {
    /// Where the document went
    pub output: String,
    /// Time taken to scan and render
    pub duration: Duration,
    /// Files found by the scan
    pub files_scanned: usize,
    /// Files included in the document
    pub files_selected: usize,
    /// Total number of lines
    pub total_lines: usize,
    /// Total number of characters
    pub total_chars: usize,
    /// Details for each file, keyed by relative path
    pub file_details: BTreeMap<String, FileReportInfo>,
    /// Files whose content could not be read
    pub failed: Vec<String>,
}

impl ExportReport {
    /// Build a report from a rendered document
    pub fn new(output: String, duration: Duration, files_scanned: usize, rendered: &Rendered) -> Self {
        Self {
            output,
            duration,
            files_scanned,
            files_selected: rendered.file_details.len() + rendered.failed.len(),
            total_lines: rendered.file_details.values().map(|f| f.lines).sum(),
            total_chars: rendered.file_details.values().map(|f| f.chars).sum(),
            file_details: rendered.file_details.clone(),
            failed: rendered.failed.clone(),
        }
    }
}

/// Format of the report output
pub enum ReportFormat {
    /// Console table output
    ConsoleTable,
}

/// Report generator for exports
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Format a number with human-readable units
    fn format_number(&self, num: usize) -> String {
        if num >= 1_000_000 {
            format!("{:.1}M", num as f64 / 1_000_000.0)
        } else if num >= 1_000 {
            format!("{:.1}K", num as f64 / 1_000.0)
        } else {
            num.to_string()
        }
    }

    /// Generate a report string
    pub fn generate_report(&self, report: &ExportReport) -> String {
        match self.format {
            ReportFormat::ConsoleTable => self.generate_console_report(report),
        }
    }

    /// Print the report to stderr, keeping stdout for the document
    pub fn print_report(&self, report: &ExportReport) {
        eprintln!("\n{}", self.generate_report(report));
    }

    /// Shorten a path to at most `max_len` characters, keeping the trailing segments
    fn format_path(&self, path: &str, max_len: usize) -> String {
        if path.chars().count() <= max_len {
            return path.to_string();
        }

        let mut segments = Vec::new();
        let mut current_len = 3; // "..."
        for part in path.rsplit('/') {
            let part_len = part.chars().count() + 1;
            if current_len + part_len > max_len {
                break;
            }
            segments.push(part);
            current_len += part_len;
        }

        if segments.is_empty() {
            let tail: String = path
                .chars()
                .rev()
                .take(max_len.saturating_sub(3))
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            return format!("...{}", tail);
        }

        let mut result = String::from("...");
        for part in segments.iter().rev() {
            result.push('/');
            result.push_str(part);
        }
        result
    }

    // Create a summary table using the tabled crate
    fn create_summary_table(&self, report: &ExportReport) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: String,

            #[tabled(rename = "Value")]
            value: String,
        }

        let mut rows = vec![
            SummaryRow {
                key: "📂 Output".to_string(),
                value: report.output.clone(),
            },
            SummaryRow {
                key: "⏱️ Process Time".to_string(),
                value: format!("{:.4?}", report.duration),
            },
            SummaryRow {
                key: "🔎 Files Scanned".to_string(),
                value: self.format_number(report.files_scanned),
            },
            SummaryRow {
                key: "📄 Files Selected".to_string(),
                value: self.format_number(report.files_selected),
            },
            SummaryRow {
                key: "📝 Total Lines".to_string(),
                value: self.format_number(report.total_lines),
            },
            SummaryRow {
                key: "📦 LLM Tokens".to_string(),
                value: format!(
                    "{} tokens (estimated)",
                    self.format_number(report.total_chars / 4)
                ),
            },
        ];

        if !report.failed.is_empty() {
            rows.push(SummaryRow {
                key: "⚠️ Unreadable Files".to_string(),
                value: report.failed.join(", "),
            });
        }

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    // Create a files table using the tabled crate
    fn create_files_table(&self, report: &ExportReport) -> String {
        #[derive(Tabled)]
        struct FileRow {
            #[tabled(rename = "File Path")]
            path: String,

            #[tabled(rename = "Lines")]
            lines: String,

            #[tabled(rename = "Est. Tokens")]
            tokens: String,
        }

        // Largest files first
        let mut files: Vec<_> = report.file_details.iter().collect();
        files.sort_by(|(_, a), (_, b)| b.chars.cmp(&a.chars));

        let files_to_show = if files.len() > 15 {
            &files[0..10]
        } else {
            &files[..]
        };

        let rows: Vec<FileRow> = files_to_show
            .iter()
            .map(|(path, info)| FileRow {
                path: self.format_path(path, 60),
                lines: self.format_number(info.lines),
                tokens: self.format_number(info.chars / 4),
            })
            .collect();

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    // Generate a console table report
    fn generate_console_report(&self, report: &ExportReport) -> String {
        let summary_table = self.create_summary_table(report);
        let files_table = self.create_files_table(report);

        let summary_title = "✅  EXPORT COMPLETE";
        let files_title = if report.file_details.len() > 15 {
            "📋  TOP 10 LARGEST FILES BY CHARACTER COUNT  📋"
        } else {
            "📋  EXPORTED FILES"
        };

        format!(
            "{}\n{}\n\n{}\n{}",
            files_title, files_table, summary_title, summary_table
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report(files: usize) -> ExportReport {
        let file_details = (0..files)
            .map(|i| {
                (
                    format!("src/file_{:02}.rs", i),
                    FileReportInfo {
                        lines: i + 1,
                        chars: (i + 1) * 40,
                    },
                )
            })
            .collect();
        ExportReport {
            output: "stdout".to_string(),
            duration: Duration::from_millis(12),
            files_scanned: 40,
            files_selected: files,
            total_lines: 0,
            total_chars: 0,
            file_details,
            failed: vec!["gone.txt".to_string()],
        }
    }

    #[test]
    fn report_lists_every_file_when_few() {
        let reporter = Reporter::new(ReportFormat::ConsoleTable);
        let text = reporter.generate_report(&sample_report(3));
        assert!(text.contains("EXPORTED FILES"));
        assert!(text.contains("src/file_00.rs"));
        assert!(text.contains("src/file_02.rs"));
        assert!(text.contains("gone.txt"));
    }

    #[test]
    fn report_shows_top_ten_when_many() {
        let reporter = Reporter::new(ReportFormat::ConsoleTable);
        let text = reporter.generate_report(&sample_report(20));
        assert!(text.contains("TOP 10"));
        assert!(text.contains("src/file_19.rs"));
        assert!(!text.contains("src/file_00.rs"));
    }

    #[test]
    fn long_paths_keep_their_tail() {
        let reporter = Reporter::new(ReportFormat::ConsoleTable);
        let path = "very/long/directory/name/that/keeps/going/and/going/until/main.rs";
        let short = reporter.format_path(path, 30);
        assert!(short.starts_with("..."));
        assert!(short.ends_with("/main.rs"));
        assert!(short.chars().count() <= 30);
    }
}
