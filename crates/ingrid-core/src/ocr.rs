use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("OCR engine unavailable: {0}")]
    Unavailable(String),
    #[error("Empty image")]
    EmptyImage,
    #[error("OCR engine failed with exit code {code:?}: {stderr}")]
    EngineFailed { code: Option<i32>, stderr: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type OcrResult<T> = Result<T, OcrError>;

/// Turns image bytes into recognized text fragments.
///
/// Constructed once at startup and shared; callers check [`OcrEngine::is_available`]
/// before handing it images.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    fn name(&self) -> &str;

    fn is_available(&self) -> bool;

    async fn recognize(&self, image: &[u8]) -> OcrResult<Vec<String>>;
}

/// Stand-in for hosts with no OCR engine installed.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableOcr;

#[async_trait]
impl OcrEngine for UnavailableOcr {
    fn name(&self) -> &str {
        "none"
    }

    fn is_available(&self) -> bool {
        false
    }

    async fn recognize(&self, _image: &[u8]) -> OcrResult<Vec<String>> {
        Err(OcrError::Unavailable("no OCR engine configured".into()))
    }
}

/// Runs the `tesseract` CLI, feeding the image on stdin.
#[derive(Debug, Clone)]
pub struct TesseractOcr {
    binary: Option<PathBuf>,
    languages: Vec<String>,
}

impl TesseractOcr {
    /// Locates `tesseract` on `PATH`; the engine reports unavailable if missing.
    #[must_use]
    pub fn new() -> Self {
        Self::with_binary(which::which("tesseract").ok())
    }

    #[must_use]
    pub fn with_binary(binary: Option<PathBuf>) -> Self {
        Self {
            binary,
            languages: vec!["eng".into()],
        }
    }

    #[must_use]
    pub fn with_languages(mut self, languages: Vec<String>) -> Self {
        self.languages = languages;
        self
    }

    fn language_arg(&self) -> String {
        if self.languages.is_empty() {
            "eng".to_string()
        } else {
            self.languages.join("+")
        }
    }
}

impl Default for TesseractOcr {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OcrEngine for TesseractOcr {
    fn name(&self) -> &str {
        "tesseract"
    }

    fn is_available(&self) -> bool {
        self.binary.is_some()
    }

    async fn recognize(&self, image: &[u8]) -> OcrResult<Vec<String>> {
        let binary = self
            .binary
            .as_ref()
            .ok_or_else(|| OcrError::Unavailable("tesseract not found on PATH".into()))?;

        if image.is_empty() {
            return Err(OcrError::EmptyImage);
        }

        let mut child = Command::new(binary)
            .args(["stdin", "stdout", "-l", &self.language_arg()])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| OcrError::Unavailable("tesseract stdin not captured".into()))?;

        let data = image.to_vec();
        let writer = tokio::spawn(async move {
            stdin.write_all(&data).await?;
            stdin.shutdown().await
        });

        let output = child.wait_with_output().await?;

        if !output.status.success() {
            return Err(OcrError::EngineFailed {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        writer.await.map_err(std::io::Error::other)??;

        Ok(fragments_from_output(&String::from_utf8_lossy(&output.stdout)))
    }
}

fn fragments_from_output(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}
