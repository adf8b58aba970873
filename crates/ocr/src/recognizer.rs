use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Image could not be read: {0}")]
    UnreadableImage(String),
    #[error("OCR service error: {0}")]
    Service(String),
    #[error("Tesseract not available — build with `tesseract` feature")]
    NotAvailable,
}

impl OcrError {
    /// Whether asking the user to try again could help.
    pub fn is_retryable(&self) -> bool {
        matches!(self, OcrError::Service(_) | OcrError::UnreadableImage(_))
    }
}

/// Abstraction over an OCR text source.
/// Implementations accept raw image bytes and return the recognized lines in
/// reading order.
#[async_trait]
pub trait OcrBackend: Send + Sync {
    async fn recognize(&self, image_bytes: &[u8]) -> Result<Vec<String>, OcrError>;
}

/// Split a recognizer's text blob into lines, keeping blank ones so positions
/// match the source layout.
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}

// ── Mock backend (always available, used for tests) ───────────────────────────

/// Returns preset lines, or a preset failure.
pub struct MockRecognizer {
    pub lines: Vec<String>,
    pub failure: Option<String>,
}

impl MockRecognizer {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { lines: lines.into_iter().map(Into::into).collect(), failure: None }
    }

    pub fn from_text(text: &str) -> Self {
        Self { lines: split_lines(text), failure: None }
    }

    /// A recognizer whose service is down.
    pub fn failing(message: impl Into<String>) -> Self {
        Self { lines: Vec::new(), failure: Some(message.into()) }
    }
}

#[async_trait]
impl OcrBackend for MockRecognizer {
    async fn recognize(&self, _image_bytes: &[u8]) -> Result<Vec<String>, OcrError> {
        match &self.failure {
            Some(message) => Err(OcrError::Service(message.clone())),
            None => Ok(self.lines.clone()),
        }
    }
}

// ── Tesseract backend (optional, gated behind `tesseract` feature) ─────────────

#[cfg(feature = "tesseract")]
pub mod tesseract_backend {
    use super::{split_lines, OcrBackend, OcrError};
    use async_trait::async_trait;
    use leptess::LepTess;

    pub struct TesseractRecognizer {
        data_path: Option<String>,
        lang: String,
    }

    impl TesseractRecognizer {
        /// `lang` is a Tesseract language spec such as `"kor+eng"`.
        pub fn new(data_path: Option<String>, lang: &str) -> Self {
            Self { data_path, lang: lang.to_string() }
        }
    }

    #[async_trait]
    impl OcrBackend for TesseractRecognizer {
        async fn recognize(&self, image_bytes: &[u8]) -> Result<Vec<String>, OcrError> {
            let data_path = self.data_path.clone();
            let lang = self.lang.clone();
            let bytes = image_bytes.to_vec();
            // libtesseract blocks for the whole recognition.
            let text = tokio::task::spawn_blocking(move || {
                let mut lt = LepTess::new(data_path.as_deref(), &lang)
                    .map_err(|e| OcrError::Service(e.to_string()))?;
                lt.set_image_from_mem(&bytes)
                    .map_err(|e| OcrError::UnreadableImage(e.to_string()))?;
                lt.get_utf8_text().map_err(|e| OcrError::Service(e.to_string()))
            })
            .await
            .map_err(|e| OcrError::Service(e.to_string()))??;
            Ok(split_lines(&text))
        }
    }
}
