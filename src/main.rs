// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pdfwasm::config::consts::DEFAULT_CONFIG_PATH;
use pdfwasm::config::{load_and_validate_config, Config};
use pdfwasm::context::ToolboxContext;
use pdfwasm::flows::{self, ExtractedData};
use pdfwasm::observability::init_tracing;
use pdfwasm::packaging::Artifact;
use pdfwasm::traits::{StatusReporter, TracingReporter};
use pdfwasm::upload::UploadedFile;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

/// Compress, grayscale and inspect PDFs with Ghostscript and pdfcpu WASI builds.
#[derive(Parser, Debug)]
#[command(name = "pdfwasm", version, about)]
struct Cli {
    /// YAML or TOML configuration file.
    #[arg(short, long, env = "PDFWASM_CONFIG")]
    config: Option<PathBuf>,

    /// Directory results are written to. Overrides `output_dir`.
    #[arg(short, long)]
    out: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compress a PDF with Ghostscript (`/ebook` quality).
    Compress { file: PathBuf },
    /// Convert one or more PDFs to grayscale.
    Grayscale {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Extract metadata (`meta`) or text content (`content`).
    Extract {
        #[arg(short, long, default_value = "meta")]
        mode: String,
        file: PathBuf,
    },
    /// Check that pdfcpu accepts a PDF.
    Validate { file: PathBuf },
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing("pdfwasm=info");
    let cli = Cli::parse();

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("❌ {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Returns whether every input succeeded.
async fn run(cli: Cli) -> Result<bool> {
    let config = resolve_config(cli.config.as_deref())?;
    let out_dir = cli.out.unwrap_or_else(|| config.output_dir.clone());
    let context = ToolboxContext::from_config(&config).context("Failed to start the WASM runtime")?;
    let reporter: Arc<dyn StatusReporter> = Arc::new(TracingReporter);

    let succeeded = match cli.command {
        Command::Compress { file } => {
            let upload = UploadedFile::from_path(&file).await?;
            let artifact = flows::compress(&context, &upload, reporter).await?;
            save(&artifact, &out_dir)?;
            true
        }
        Command::Grayscale { files } => {
            // Read failures are recorded per file; the batch carries on.
            let mut uploads = Vec::with_capacity(files.len());
            for file in &files {
                uploads.push(UploadedFile::from_path(file).await);
            }
            let report = flows::grayscale_batch(&context, uploads, reporter).await;
            for artifact in report.artifacts() {
                save(artifact, &out_dir)?;
            }
            for (file, error) in report.failures() {
                eprintln!("❌ {}: {}", file, error.user_message());
            }
            println!("{}", report.last_status);
            report.failed() == 0
        }
        Command::Extract { mode, file } => {
            let upload = UploadedFile::from_path(&file).await?;
            let extraction = flows::extract(&context, &upload, &mode, reporter).await?;
            match &extraction.data {
                ExtractedData::Metadata(value) => {
                    println!("{}", serde_json::to_string_pretty(value)?)
                }
                ExtractedData::Content(text) => println!("{}", text),
            }
            save(&extraction.archive, &out_dir)?;
            true
        }
        Command::Validate { file } => {
            let upload = UploadedFile::from_path(&file).await?;
            flows::validate(&context, &upload, reporter).await?;
            println!("✅ {} is valid", upload.name);
            true
        }
    };

    context.shutdown();
    Ok(succeeded)
}

/// An explicit path must load; the default path is used only if present.
fn resolve_config(path: Option<&Path>) -> Result<Config> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => PathBuf::from(DEFAULT_CONFIG_PATH),
        None => anyhow::bail!(
            "No configuration found. Pass --config or create {}",
            DEFAULT_CONFIG_PATH
        ),
    };
    load_and_validate_config(&path).with_context(|| format!("Failed to load {}", path.display()))
}

fn save(artifact: &Artifact, out_dir: &Path) -> Result<()> {
    let written = artifact
        .write_to(out_dir)
        .with_context(|| format!("Failed to write {}", artifact.file_name))?;
    println!("📄 {} ({} bytes)", written.display(), artifact.len());
    Ok(())
}
