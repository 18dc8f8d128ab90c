/*!
 * Command-line interface for mdcollect
 */

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use mdcollect::config::{Args, Config, Settings};
use mdcollect::report::{ExportReport, ReportFormat, Reporter};
use mdcollect::scanner::Scanner;
use mdcollect::selection::{Entry, SelectionTree};
use mdcollect::writer::MarkdownWriter;
use mdcollect::{error, render_listing, MdCollectError};

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Apply the marks requested on the command line
fn apply_marks(tree: &mut SelectionTree, config: &Config) -> mdcollect::Result<()> {
    if config.select_all {
        tree.set_visible(true);
    }
    for path in &config.select {
        tree.set_path(path, true)?;
    }
    for path in &config.deselect {
        tree.set_path(path, false)?;
    }
    for path in &config.toggle {
        match tree.lookup(path) {
            Some(Entry::Folder(folder)) => {
                tree.toggle_folder(folder);
            }
            Some(Entry::File(_)) => {
                return Err(error!(InvalidArgument, "Not a folder: {}", path.display()));
            }
            None => return Err(error!(PathNotFound, "Not in tree: {}", path.display())),
        }
    }
    Ok(())
}

/// Remember the scanned folder and any rule overrides
fn persist_settings(mut settings: Settings, config: &Config, root: PathBuf) {
    settings.last_folder_path = root.to_string_lossy().to_string();
    if config.rules_overridden {
        settings.exclude_patterns = config.rules.clone();
    }
    if let Err(e) = settings.save(&config.settings_path) {
        tracing::warn!(path = %config.settings_path.display(), error = %e, "failed to save settings");
    }
}

fn main() -> io::Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    if let Some(shell) = args.generate {
        clap_complete::generate(shell, &mut Args::command(), "mdcollect", &mut io::stdout());
        return Ok(());
    }

    init_tracing(&args.log_level);

    let settings = Settings::load(&args.settings_path());

    // Create and validate configuration
    let config = Config::from_args(args, &settings);
    config.validate()?;

    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {pos} files  {wide_msg:.dim.white}")
            .map_err(|e| MdCollectError::Unexpected(e.to_string()))?,
    );
    progress.enable_steady_tick(Duration::from_millis(100));
    progress.set_prefix("📂 Scanning");

    let start_time = Instant::now();

    let scanner = Scanner::new(config.rules.clone(), progress.clone());
    let root_node = scanner.scan(&config.target_dir);
    progress.finish_and_clear();
    let root_node = root_node?;

    let mut tree = SelectionTree::new(root_node);
    let root_path = tree.root_path().to_path_buf();

    tree.sort(config.sort_key, config.sort_direction);
    if let Some(query) = &config.filter {
        tree.apply_filter(query);
    }
    apply_marks(&mut tree, &config)?;

    if config.list {
        print!("{}", render_listing(&tree));
    } else {
        let writer = MarkdownWriter::new(&root_path);
        let selection = tree.selection();
        let (rendered, output) = match &config.output_file {
            Some(path) => (writer.write(&selection, path)?, path.display().to_string()),
            None => {
                let rendered = writer.render(&selection);
                let mut stdout = io::stdout().lock();
                stdout.write_all(rendered.text.as_bytes())?;
                stdout.flush()?;
                (rendered, "stdout".to_string())
            }
        };

        if config.report {
            let report = ExportReport::new(
                output,
                start_time.elapsed(),
                tree.file_count(),
                &rendered,
            );
            Reporter::new(ReportFormat::ConsoleTable).print_report(&report);
        }
    }

    persist_settings(settings, &config, root_path);

    Ok(())
}
