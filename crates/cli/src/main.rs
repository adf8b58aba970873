//! revu CLI
//!
//! Runs the receipt engine over OCR output saved as text, one recognized line
//! per line of input.

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use revu_ocr::{normalize, EngineConfig, OcrLine, ReceiptEngine};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "revu")]
#[command(about = "Verify receipt OCR text against a brand and extract line items", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Match a receipt against a brand and print the extracted items as JSON
    Scan {
        /// Brand the receipt should come from
        #[arg(short, long)]
        brand: String,

        /// Engine config (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the match confidence on stderr
        #[arg(long)]
        explain: bool,

        /// OCR text file, or `-` for stdin
        #[arg(default_value = "-")]
        input: PathBuf,
    },

    /// Print each line as the matcher sees it
    Normalize {
        /// OCR text file, or `-` for stdin
        #[arg(default_value = "-")]
        input: PathBuf,
    },
}

const EXIT_CONFIRMED: u8 = 0;
/// Exit status when the receipt is not from the claimed brand.
const EXIT_NOT_CONFIRMED: u8 = 2;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let stdout = io::stdout();
    match run(cli.command, &mut stdout.lock()) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands, out: &mut impl Write) -> Result<u8> {
    match command {
        Commands::Scan { brand, config, explain, input } => {
            let config = match config {
                Some(path) => EngineConfig::load(&path)
                    .with_context(|| format!("loading engine config {}", path.display()))?,
                None => EngineConfig::default(),
            };
            let engine = ReceiptEngine::new(&config);
            let lines = OcrLine::sequence(read_input(&input)?);
            tracing::debug!(lines = lines.len(), brand = %brand, "scanning receipt");

            if explain {
                let m = engine.match_store(&lines, &brand);
                eprintln!("match: {m:?}");
            }

            match engine.scan(&lines, &brand) {
                Some(scan) => {
                    serde_json::to_writer_pretty(&mut *out, &scan)?;
                    writeln!(out)?;
                    Ok(EXIT_CONFIRMED)
                }
                None => {
                    writeln!(out, "Could not confirm this receipt is from \"{brand}\".")?;
                    Ok(EXIT_NOT_CONFIRMED)
                }
            }
        }
        Commands::Normalize { input } => {
            for line in read_input(&input)? {
                writeln!(out, "{}", normalize(&line))?;
            }
            Ok(EXIT_CONFIRMED)
        }
    }
}

fn read_input(path: &Path) -> Result<Vec<String>> {
    let text = if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).context("reading stdin")?;
        buf
    } else {
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?
    };
    Ok(text.lines().map(str::to_string).collect())
}
