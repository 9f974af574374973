mod cli;

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;

use ingrid_core::network::{EmptyCatalog, NoRegistry};
use ingrid_core::{
    compute_rating, detect_certifications, NetworkConfig, RawText, ScanPipeline, UnavailableOcr,
};

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ingrid=info,ingrid_core=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let value = dispatch(cli.command).await?;

    let rendered = if cli.compact {
        serde_json::to_string(&value)?
    } else {
        serde_json::to_string_pretty(&value)?
    };
    println!("{rendered}");

    Ok(())
}

async fn dispatch(command: Commands) -> Result<serde_json::Value> {
    match command {
        Commands::Text { path } => {
            let text = read_text(path.as_deref())?;
            let output = offline_pipeline().analyze_text(&text);
            Ok(serde_json::to_value(output)?)
        }
        Commands::Certs { path } => {
            let text = read_text(path.as_deref())?;
            Ok(serde_json::to_value(detect_certifications(text.as_str()))?)
        }
        Commands::Image { path } => {
            let image = tokio::fs::read(&path)
                .await
                .with_context(|| format!("reading image {}", path.display()))?;
            let pipeline = ScanPipeline::from_config(NetworkConfig::from_env()?)?;
            if !pipeline.ocr_available() {
                tracing::warn!("tesseract not found on PATH; install it to scan images");
            }
            Ok(serde_json::to_value(pipeline.scan_image(&image).await)?)
        }
        Commands::Barcode { code } => {
            let pipeline = ScanPipeline::from_config(NetworkConfig::from_env()?)?;
            Ok(serde_json::to_value(pipeline.scan_barcode(&code).await)?)
        }
        Commands::Rate { count } => Ok(json!({
            "ingredient_count": count,
            "rating": compute_rating(count),
        })),
    }
}

/// Text-only analysis needs no catalog, registry or OCR engine.
fn offline_pipeline() -> ScanPipeline {
    ScanPipeline::new(
        Arc::new(EmptyCatalog),
        Arc::new(NoRegistry),
        Arc::new(UnavailableOcr),
    )
}

fn read_text(path: Option<&Path>) -> Result<RawText> {
    match path {
        Some(p) if p != Path::new("-") => {
            let text = std::fs::read_to_string(p)
                .with_context(|| format!("reading {}", p.display()))?;
            Ok(RawText::new(text))
        }
        _ => {
            tracing::debug!("Reading label text from stdin");
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("reading stdin")?;
            Ok(RawText::new(text))
        }
    }
}
