//! PDF Generator CLI tool
//!
//! Renders TOML job files into PDF documents and inspects existing PDFs.

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{debug, info};

use pdf_generator::pdf::extract_metadata;
use pdf_generator::Job;

/// PDF Generator - Render styled documents from job files
#[derive(Parser)]
#[command(name = "pdf-generator")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # Render a job file
    pdf-generator render report.toml -o report.pdf

    # Use fonts from another directory (expects font/bookman-old-style*.ttf)
    pdf-generator render report.toml -o report.pdf --font-dir /opt/fonts

    # Render and open the result
    pdf-generator render report.toml -o report.pdf --open

    # Show page count and metadata
    pdf-generator info report.pdf")]
struct Cli {
    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a TOML job file to PDF
    Render {
        /// Job file describing the document
        job: PathBuf,

        /// Output PDF file path
        #[arg(short, long)]
        output: PathBuf,

        /// Directory holding the font/ folder (defaults to the job file's directory)
        #[arg(long)]
        font_dir: Option<PathBuf>,

        /// Open the output file after creation
        #[arg(long)]
        open: bool,
    },

    /// Show information about a PDF file
    Info {
        /// PDF file to inspect
        input: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();

    let result = match cli.command {
        Commands::Render { job, output, font_dir, open } => cmd_render(&job, &output, font_dir, open),
        Commands::Info { input } => cmd_info(&input),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

/// Open a file with the system default application
fn open_file(path: &Path) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(path).spawn()?;
    }
    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(path).spawn()?;
    }
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", "", &path.display().to_string()])
            .spawn()?;
    }
    Ok(())
}

/// Render a job file
fn cmd_render(job_path: &Path, output: &Path, font_dir: Option<PathBuf>, open: bool) -> Result<()> {
    let job = Job::load(job_path).with_context(|| format!("Failed to load job {}", job_path.display()))?;

    let font_dir = font_dir.unwrap_or_else(|| {
        job_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    });
    debug!("resolving fonts against {}", font_dir.display());

    let mut doc = job
        .render(&font_dir)
        .with_context(|| format!("Failed to render {}", job_path.display()))?;
    doc.save(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!("Output: {}", output.display());

    if open {
        open_file(output).context("Failed to open output")?;
    }

    Ok(())
}

/// Show information about a PDF
fn cmd_info(input: &Path) -> Result<()> {
    let metadata = extract_metadata(input).with_context(|| format!("Failed to read {}", input.display()))?;

    println!("File: {}", input.display());
    println!("Pages: {}", metadata.page_count);

    if let Some(title) = metadata.title {
        println!("Title: {}", title);
    }
    if let Some(author) = metadata.author {
        println!("Author: {}", author);
    }
    if let Some(producer) = metadata.producer {
        println!("Producer: {}", producer);
    }

    Ok(())
}
