//! diffcov CLI — render diff coverage reports and inspect the current diff.
//!
//! Commands:
//! - `report` — render one or more coverage JSON files as plain or annotated text
//! - `changed` — list source paths (and optionally hunks) changed against a branch

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use diffcov_core::{
    load_result, render, sort_paths, DiffSource, GitDiffError, GitDiffReporter, GitDiffTool,
    LineRange, ReportConfig, ReportMode,
};

#[derive(Parser)]
#[command(
    name = "diffcov",
    about = "diffcov — report test coverage of the lines changed in a diff"
)]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG).
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    /// Path to a TOML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render coverage results in the plain or annotated dialect.
    Report {
        /// Coverage result JSON files.
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output dialect: plain, annotated. Defaults to the config value, then plain.
        #[arg(long)]
        format: Option<ReportMode>,

        /// Fail when total coverage of any input is below this percentage.
        #[arg(long)]
        fail_under: Option<f64>,
    },
    /// List source paths changed against a branch, plus staged and unstaged changes.
    Changed {
        /// Branch to diff against. Defaults to the config value, then master.
        #[arg(long)]
        compare_branch: Option<String>,

        /// Repository directory. Defaults to the current directory.
        #[arg(long)]
        repo: Option<PathBuf>,

        /// Also print the merged changed line ranges of each path.
        #[arg(long, default_value_t = false)]
        hunks: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => ReportConfig::from_file(path)?,
        None => ReportConfig::default(),
    };

    match cli.command {
        Commands::Report {
            inputs,
            format,
            fail_under,
        } => {
            if let Some(format) = format {
                config.format = format;
            }
            if fail_under.is_some() {
                config.fail_under = fail_under;
                config.validate()?;
            }
            run_report(&inputs, &config)
        }
        Commands::Changed {
            compare_branch,
            repo,
            hunks,
        } => {
            if let Some(branch) = compare_branch {
                config.compare_branch = branch;
            }
            run_changed(&config, repo.as_deref(), hunks)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}

fn run_report(inputs: &[PathBuf], config: &ReportConfig) -> Result<()> {
    let mode = config.format;
    debug!(inputs = inputs.len(), %mode, "rendering reports");

    // Render in parallel, print in input order.
    let rendered: Vec<Result<(String, f64)>> = inputs
        .par_iter()
        .map(|path| {
            let result = load_result(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            Ok((render(&result, mode), result.total_percent_covered))
        })
        .collect();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut below_threshold: Vec<(&Path, f64)> = Vec::new();

    for (path, outcome) in inputs.iter().zip(rendered) {
        let (report, percent) = outcome?;
        out.write_all(report.as_bytes())?;
        if config.fails(percent) {
            below_threshold.push((path.as_path(), percent));
        }
    }
    out.flush()?;

    if !below_threshold.is_empty() {
        let threshold = config.fail_under.unwrap_or_default();
        for (path, percent) in &below_threshold {
            eprintln!(
                "Coverage of {percent}% in {} is below the threshold of {threshold}%",
                path.display()
            );
        }
        std::process::exit(1);
    }

    Ok(())
}

fn run_changed(config: &ReportConfig, repo: Option<&Path>, show_hunks: bool) -> Result<()> {
    let tool = match repo {
        Some(dir) => GitDiffTool::in_repo(dir),
        None => GitDiffTool::new(),
    };
    let reporter = GitDiffReporter::new(tool).with_compare_branch(config.compare_branch.clone());

    let listing = changed_listing(&reporter, show_hunks)?;
    info!(diff = %reporter.name(), paths = listing.len(), "collected changed paths");

    println!("Diff: {}", reporter.name());
    if listing.is_empty() {
        println!("No source files changed.");
    }
    for line in &listing {
        println!("{line}");
    }
    Ok(())
}

/// One output line per changed path. Each git diff runs once either way.
fn changed_listing<S: DiffSource>(
    reporter: &GitDiffReporter<S>,
    show_hunks: bool,
) -> Result<Vec<String>, GitDiffError> {
    if !show_hunks {
        return reporter.src_paths_changed();
    }

    let hunks = reporter.all_hunks_changed()?;
    let mut paths: Vec<String> = hunks.keys().cloned().collect();
    sort_paths(&mut paths);
    Ok(paths
        .into_iter()
        .map(|path| {
            let ranges: Vec<String> = hunks[&path].iter().map(|&range| format_hunk(range)).collect();
            if ranges.is_empty() {
                format!("{path}: (no added lines)")
            } else {
                format!("{path}: {}", ranges.join(", "))
            }
        })
        .collect())
}

/// `(start, end)` is end-exclusive; print inclusive line numbers.
fn format_hunk((start, end): LineRange) -> String {
    let last = end.saturating_sub(1);
    if last <= start {
        start.to_string()
    } else {
        format!("{start}-{last}")
    }
}
