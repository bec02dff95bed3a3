use clap::Parser;
use colored::Colorize;
use customclean::pattern::PatternSet;
use customclean::{CleanError, RemovalReport};
use humansize::{format_size, BINARY};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Name of the plain-text log written into the target root after a run.
const SUCCESS_RECORD: &str = "custom_clean_success_record.txt";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Remove unwanted files, folders, and links from a directory based on a cleaning JSON created by the CustomClean GUI",
    long_about = None
)]
struct Args {
    /// Path to a cleaning JSON as created by the CustomClean GUI
    #[arg(short = 'j', long = "json")]
    json: PathBuf,

    /// Folder that needs cleaning; should have a folder structure identical
    /// to the one captured in the cleaning JSON
    #[arg(short = 'd', long = "dir")]
    dir: PathBuf,

    /// Extra pattern appended to the document's pattern list before
    /// generalization, e.g. "task-rest*"
    #[arg(short = 'p', long = "pattern")]
    pattern: Option<String>,

    /// Show each removal on stdout
    #[arg(short, long)]
    verbose: bool,
}

fn run(args: &Args) -> Result<RemovalReport, CleanError> {
    let document = customclean::load(&args.json)?;

    let mut patterns = document.patterns.clone();
    if let Some(extra) = &args.pattern {
        patterns.push(extra.clone());
    }
    let pattern_set = PatternSet::compile(&patterns)?;

    let plan = customclean::aggregate(&document.tree);
    if plan.deletes_root() {
        return Err(CleanError::DeletesTargetRoot);
    }

    let templates = customclean::generalize(&plan.ordered(), &pattern_set);
    let targets = customclean::expand(&templates, &args.dir)?;

    customclean::remove_targets(&targets)
}

fn write_success_record(dir: &Path, report: &RemovalReport) {
    let mut record = String::new();
    for (path, kind) in &report.removed {
        record.push_str(&format!("{} {}\n", kind.action(), path.display()));
    }

    let record_path = dir.join(SUCCESS_RECORD);
    if let Err(err) = fs::write(&record_path, record) {
        eprintln!(
            "Warning: Failed to write success record {}: {}",
            record_path.display(),
            err
        );
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let report = match run(&args) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("{} {}", "error:".red().bold(), err);
            return ExitCode::from(err.exit_code());
        }
    };

    if args.verbose {
        for (path, kind) in &report.removed {
            println!("{} {}", kind.action(), path.display());
        }
    }

    // Absent targets are a warning, not a failure: the run still exits 0.
    for target in &report.not_found {
        eprintln!("Expected and could not find: {}", target.path.display());
    }

    write_success_record(&args.dir, &report);

    println!(
        "Removed {} entries ({})",
        report.removed.len().to_string().green().bold(),
        format_size(report.bytes_reclaimed, BINARY).bold()
    );

    ExitCode::SUCCESS
}
