//! xlsxpack CLI - inspect and rewrite XLSX packages
//!
//! A command-line tool around the xlsxpack reader and writer.

use clap::{Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use xlsxpack::{Workbook, WriteOptions};

/// Inspect and rewrite XLSX spreadsheet packages
#[derive(Parser)]
#[command(
    name = "xlsxpack",
    author = "iyulab",
    version,
    about = "Inspect and rewrite XLSX packages",
    long_about = "xlsxpack - XLSX package reader and writer.\n\n\
                  Set RUST_LOG=xlsxpack=debug to trace part dispatch and emission."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the worksheets, media and properties of a workbook
    Inspect {
        /// Input file path
        input: PathBuf,

        /// Print the whole document model as JSON
        #[arg(long)]
        json: bool,
    },

    /// Read a workbook and write it back out
    Roundtrip {
        /// Input file path
        input: PathBuf,

        /// Output file path
        output: PathBuf,

        /// Write text as inline strings instead of a shared-strings table
        #[arg(long)]
        no_shared_strings: bool,

        /// Drop cell styles
        #[arg(long)]
        no_styles: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Inspect { input, json } => {
            let pb = create_spinner("Reading workbook...");
            let workbook = Workbook::read_file(&input).await?;
            pb.finish_and_clear();

            if json {
                println!("{}", serde_json::to_string_pretty(&workbook)?);
            } else {
                print_summary(&input, &workbook);
            }
        }

        Commands::Roundtrip {
            input,
            output,
            no_shared_strings,
            no_styles,
        } => {
            let pb = create_spinner("Reading workbook...");
            let mut workbook = Workbook::read_file(&input).await?;

            pb.set_message("Writing workbook...");
            let options = WriteOptions::new()
                .with_shared_strings(!no_shared_strings)
                .with_styles(!no_styles);
            workbook.write_file(&output, options).await?;
            pb.finish_and_clear();

            println!(
                "{} Wrote {} worksheets to {}",
                "✓".green().bold(),
                workbook.worksheets.len(),
                output.display()
            );
        }
    }

    Ok(())
}

fn print_summary(input: &std::path::Path, workbook: &Workbook) {
    println!("{}", "Workbook Information".cyan().bold());
    println!("{}", "─".repeat(40));
    println!(
        "{}: {}",
        "File".bold(),
        input.file_name().unwrap_or_default().to_string_lossy()
    );
    println!("{}: {}", "Worksheets".bold(), workbook.worksheets.len());
    println!("{}: {}", "Cells".bold(), workbook.cell_count());
    println!("{}: {}", "Media".bold(), workbook.media.len());
    println!("{}: {}", "Defined names".bold(), workbook.defined_names.len());

    let props = &workbook.properties;
    if let Some(ref title) = props.title {
        println!("{}: {}", "Title".bold(), title);
    }
    if let Some(ref creator) = props.creator {
        println!("{}: {}", "Creator".bold(), creator);
    }
    if let Some(ref created) = props.created {
        println!("{}: {}", "Created".bold(), created);
    }
    if let Some(ref modified) = props.modified {
        println!("{}: {}", "Modified".bold(), modified);
    }

    println!("\n{}", "Worksheets".cyan().bold());
    println!("{}", "─".repeat(40));
    for sheet in &workbook.worksheets {
        let pictures = sheet.drawing.as_ref().map_or(0, |d| d.anchors.len());
        println!(
            "{} {} ({} cells, {} merges, {} pictures)",
            format!("[{}]", sheet.id).dimmed(),
            sheet.name.bold(),
            sheet.cells.len(),
            sheet.merges.len(),
            pictures
        );
    }
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
        .template("{spinner:.blue} {msg}")
    {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
