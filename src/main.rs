// LogStitch - main.rs
//
// Command-line entry point. Handles:
// 1. CLI argument parsing (with interactive prompts for missing paths)
// 2. Logging initialisation (debug mode support)
// 3. Running the merge and printing the summary

use clap::Parser;
use logstitch::app::merge;
use logstitch::core::discovery;
use logstitch::core::model::RunSummary;
use logstitch::util::error::LogStitchError;
use logstitch::util::{constants, logging};
use std::io::Write;
use std::path::PathBuf;

/// LogStitch - NGINX log combiner.
///
/// Point LogStitch at a directory tree of NGINX logs to merge each folder's
/// access, error, and ssl logs (plain or .xz-compressed) into per-category
/// combined files under a mirrored output tree.
#[derive(Parser, Debug)]
#[command(name = "LogStitch", version, about)]
struct Cli {
    /// Root directory to process (prompts if omitted; empty answer uses the
    /// current directory).
    root: Option<PathBuf>,

    /// Output directory for combined logs (prompts if omitted).
    output: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    logging::init(cli.debug);

    tracing::info!(
        version = constants::APP_VERSION,
        debug = cli.debug,
        "LogStitch starting"
    );

    let root = match cli.root {
        Some(path) => path,
        None => {
            let answer = prompt(
                "Enter the root directory to process (or press Enter for the current directory): ",
            );
            if answer.is_empty() {
                match std::env::current_dir() {
                    Ok(dir) => dir,
                    Err(e) => fatal(&format!("Cannot determine the current directory: {e}")),
                }
            } else {
                PathBuf::from(answer)
            }
        }
    };

    // Validate the root before asking for anything else, so a mistyped path
    // fails immediately.
    if let Err(e) = discovery::validate_root(&root) {
        fatal(&e.to_string());
    }

    let output = match cli.output {
        Some(path) => path,
        None => {
            let answer = prompt("Enter the output directory for combined logs: ");
            if answer.is_empty() {
                fatal("No output directory provided");
            }
            PathBuf::from(answer)
        }
    };

    if let Err(source) = std::fs::create_dir_all(&output) {
        let e = LogStitchError::Io {
            path: output.clone(),
            operation: "create output directory",
            source,
        };
        fatal(&e.to_string());
    }

    println!("Processing from: {}", root.display());
    println!("Outputting combined logs to: {}", output.display());

    match merge::run_merge(&root, &output) {
        Ok(summary) => {
            print_summary(&summary);
            println!("Processing complete!");
        }
        Err(e) => fatal(&e.to_string()),
    }
}

/// Print a prompt and read one trimmed line from stdin. Returns an empty
/// string on EOF or read failure so callers fall through to their defaults.
fn prompt(message: &str) -> String {
    print!("{message}");
    let _ = std::io::stdout().flush();

    let mut answer = String::new();
    match std::io::stdin().read_line(&mut answer) {
        Ok(_) => answer.trim().to_string(),
        Err(e) => {
            tracing::warn!(error = %e, "Cannot read from stdin");
            String::new()
        }
    }
}

/// Print the end-of-run accounting to stdout.
fn print_summary(summary: &RunSummary) {
    println!(
        "Merged {} files into {} combined logs across {} folders in {:.2?}",
        summary.files_merged,
        summary.artifacts_written,
        summary.folders_eligible,
        summary.duration
    );

    if !summary.is_clean() {
        println!(
            "Failures: {} files unreadable, {} combined logs not written, {} folders failed",
            summary.files_failed, summary.artifacts_failed, summary.folders_failed
        );
    }

    if !summary.warnings.is_empty() {
        println!(
            "{} traversal warnings (run with --debug for details)",
            summary.warnings.len()
        );
    }
}

/// Log the error, mirror it to stderr, and exit with a non-zero status.
fn fatal(message: &str) -> ! {
    tracing::error!(error = %message, "Fatal error");
    eprintln!("Error: {message}");
    std::process::exit(1);
}
