use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "ingrid",
    about = "Food label scanner: ingredients, certifications and a traffic-light rating",
    version
)]
pub struct Cli {
    /// Print single-line JSON instead of pretty output
    #[arg(long, global = true)]
    pub compact: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyse label text from a file, or stdin when omitted or `-`
    Text {
        /// Text file to read
        path: Option<PathBuf>,
    },
    /// Detect certifications in label text
    Certs {
        /// Text file to read
        path: Option<PathBuf>,
    },
    /// Run OCR on a label image and analyse the recognized text
    Image {
        /// Image file (any format tesseract accepts)
        path: PathBuf,
    },
    /// Look a product up by barcode and analyse its catalog entry
    Barcode {
        /// EAN/UPC barcode
        code: String,
    },
    /// Show the rating for an ingredient count
    Rate {
        /// Number of ingredients
        count: usize,
    },
}
