//! Command line interface for the bibliography tools
//!
//! Exit codes: 0 when everything is fine, 1 when a check finds
//! problems, 2 when the tool itself fails.

use std::path::{Path, PathBuf};
use std::process;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bibfolio::check::{self, Report};
use bibfolio::pages::{self, PagesConfig};
use bibfolio::{Database, WriterConfig};

#[derive(Parser)]
#[command(author, version, about = "Parse, check, and publish a personal BibTeX bibliography")]
struct Cli {
    /// Log what the tool is doing
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate bibliography files
    Check {
        /// Files to check (default: every .bib file in the current directory)
        files: Vec<PathBuf>,

        /// Treat warnings as fatal
        #[arg(long)]
        strict: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Render Quarto publication pages from a bibliography
    Pages {
        /// The bibliography to render
        #[arg(default_value = "my-papers.bib")]
        bib: PathBuf,

        /// Pages configuration file
        #[arg(long, default_value = "pages.json")]
        config: PathBuf,

        /// Site root the pages are written under
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },
    /// Rewrite a bibliography in canonical form
    Fmt {
        /// The file to format
        file: PathBuf,

        /// Write the result back instead of printing it
        #[arg(long, short)]
        write: bool,

        /// Sort entries by citation key
        #[arg(long)]
        sort_entries: bool,

        /// Sort fields within each entry
        #[arg(long)]
        sort_fields: bool,

        /// Align field values
        #[arg(long)]
        align: bool,
    },
    /// Summarize what bibliography files contain
    Stats {
        /// Files to summarize (default: every .bib file in the current directory)
        files: Vec<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(level)
        .init();

    match run(cli) {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("error: {err:#}");
            process::exit(2);
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    match cli.command {
        Command::Check {
            files,
            strict,
            json,
        } => run_check(files, strict, json),
        Command::Pages { bib, config, root } => run_pages(&bib, &config, &root),
        Command::Fmt {
            file,
            write,
            sort_entries,
            sort_fields,
            align,
        } => run_fmt(&file, write, sort_entries, sort_fields, align),
        Command::Stats { files } => run_stats(files),
    }
}

fn run_check(files: Vec<PathBuf>, strict: bool, json: bool) -> anyhow::Result<i32> {
    let files = if files.is_empty() {
        bib_files_in_cwd()?
    } else {
        files
    };
    anyhow::ensure!(!files.is_empty(), "no .bib files found to check");

    let mut total = Report::default();
    for file in &files {
        let report = check::check_file(file)
            .with_context(|| format!("failed to read {}", file.display()))?;
        total.merge(report);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&total)?);
    } else {
        print!("{total}");
        println!(
            "{} entries checked: {} error(s), {} warning(s)",
            total.entries_checked,
            total.error_count(),
            total.warning_count()
        );
    }

    Ok(check_exit_code(&total, strict))
}

fn check_exit_code(report: &Report, strict: bool) -> i32 {
    let failed = report.has_errors() || (strict && !report.is_clean());
    i32::from(failed)
}

fn run_pages(bib: &Path, config_path: &Path, root: &Path) -> anyhow::Result<i32> {
    let config = if config_path.exists() {
        PagesConfig::load(config_path)
            .with_context(|| format!("failed to load {}", config_path.display()))?
    } else {
        PagesConfig::default()
    };

    let db = bibfolio::parse_file(bib)
        .with_context(|| format!("failed to parse {}", bib.display()))?;

    let stats =
        pages::render(&db, &config, root).context("failed to render publication pages")?;

    println!("{}", "=".repeat(50));
    println!("CONVERSION SUMMARY");
    println!("{}", "=".repeat(50));
    println!("Pages written:       {}", stats.written);
    if stats.removed > 0 {
        println!("Stale pages removed: {}", stats.removed);
    }
    println!();
    println!("Image status:");
    println!("  with cover image:    {}", stats.images_found);
    println!("  without cover image: {}", stats.images_missing);
    println!("{}", "=".repeat(50));
    Ok(0)
}

fn run_fmt(
    file: &Path,
    write: bool,
    sort_entries: bool,
    sort_fields: bool,
    align: bool,
) -> anyhow::Result<i32> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;

    // Keep values exactly as written; formatting must not inline strings
    let db = Database::parser()
        .expand_strings(false)
        .parse(&content)
        .with_context(|| format!("failed to parse {}", file.display()))?;

    let config = WriterConfig {
        sort_entries,
        sort_fields,
        align_values: align,
        ..WriterConfig::default()
    };
    let formatted = bibfolio::to_string_with(&db, config)?;

    if write {
        std::fs::write(file, formatted)
            .with_context(|| format!("failed to write {}", file.display()))?;
        println!("formatted {}", file.display());
    } else {
        print!("{formatted}");
    }
    Ok(0)
}

fn run_stats(files: Vec<PathBuf>) -> anyhow::Result<i32> {
    let files = if files.is_empty() {
        bib_files_in_cwd()?
    } else {
        files
    };
    anyhow::ensure!(!files.is_empty(), "no .bib files found to summarize");

    for file in &files {
        let db = bibfolio::parse_file(file)
            .with_context(|| format!("failed to parse {}", file.display()))?;
        let stats = db.stats();

        println!("{}:", file.display());
        println!("  entries:   {}", stats.entries);

        let mut by_type: Vec<_> = stats.by_type.iter().collect();
        by_type.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        for (ty, count) in by_type {
            println!("    {ty:<16} {count}");
        }

        println!("  strings:   {}", stats.strings);
        println!("  preambles: {}", stats.preambles);
        println!("  comments:  {}", stats.comments);
    }
    Ok(0)
}

fn bib_files_in_cwd() -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for dent in std::fs::read_dir(".").context("failed to list the current directory")? {
        let path = dent?.path();
        if path.extension().is_some_and(|ext| ext == "bib") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
