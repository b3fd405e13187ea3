//! Inspect the blog server's log directory.
//!
//! ```text
//! view-logs                          list files with size and modification time
//! view-logs combined-2025-08-21.log  pretty-print one file
//! ```

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;

use blog_server::observability::viewer::{list_log_files, resolve_log_file, ViewLine};

#[derive(Parser)]
#[command(name = "view-logs")]
#[command(about = "List and pretty-print blog server log files", long_about = None)]
struct Cli {
    /// Log directory.
    #[arg(short, long, default_value = "logs")]
    dir: PathBuf,

    /// File inside the log directory to display.
    file: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if !cli.dir.is_dir() {
        eprintln!("{}", format!("Log directory not found: {}", cli.dir.display()).red());
        return ExitCode::FAILURE;
    }

    match cli.file {
        None => list(&cli),
        Some(ref name) => show(&cli, name),
    }
}

fn list(cli: &Cli) -> ExitCode {
    let files = match list_log_files(&cli.dir) {
        Ok(files) => files,
        Err(e) => {
            eprintln!("{}", format!("Failed to read {}: {}", cli.dir.display(), e).red());
            return ExitCode::FAILURE;
        }
    };

    println!("{}", format!("Log files in {}:", cli.dir.display()).bold());
    if files.is_empty() {
        println!("  (none)");
    }
    for file in &files {
        println!(
            "  {:<36} {:>10.2} KB  {}",
            file.name,
            file.size_kb(),
            file.modified.format("%Y-%m-%d %H:%M:%S")
        );
    }
    println!();
    println!("Usage: view-logs [--dir <DIR>] <FILE>");
    ExitCode::SUCCESS
}

fn show(cli: &Cli, name: &str) -> ExitCode {
    let Some(path) = resolve_log_file(&cli.dir, name) else {
        eprintln!("{}", format!("Invalid log file name: {}", name).red());
        return ExitCode::FAILURE;
    };

    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("{}", format!("Log file not found: {} ({})", path.display(), e).red());
            return ExitCode::FAILURE;
        }
    };

    println!("{}", format!("=== {} ===", name).bold());
    for (index, line) in content.lines().enumerate() {
        if let Some(view) = ViewLine::parse(index, line) {
            println!("{}", view.render());
        }
    }
    ExitCode::SUCCESS
}
