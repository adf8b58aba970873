use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

use crate::engine::ReceiptEngine;
use crate::recognizer::{OcrBackend, OcrError};
use crate::types::{OcrLine, ReceiptScan};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("OCR recognition failed: {0}")]
    Ocr(#[from] OcrError),
}

impl PipelineError {
    /// Recognition failures are transient ("scan failed, try again").
    pub fn is_retryable(&self) -> bool {
        match self {
            PipelineError::Ocr(e) => e.is_retryable(),
            PipelineError::Io(_) => false,
        }
    }
}

/// The result of a single receipt scan.
#[derive(Debug)]
pub struct OcrResult {
    /// Raw recognizer output, in reading order.
    pub lines: Vec<OcrLine>,
    /// `None` when the receipt could not be confirmed for the claimed brand.
    pub scan: Option<ReceiptScan>,
}

/// Orchestrates: recognize → match brand → extract items.
pub struct ReceiptPipeline<R: OcrBackend> {
    recognizer: R,
    engine: ReceiptEngine,
}

impl<R: OcrBackend> ReceiptPipeline<R> {
    pub fn new(recognizer: R, engine: ReceiptEngine) -> Self {
        Self { recognizer, engine }
    }

    pub fn engine(&self) -> &ReceiptEngine {
        &self.engine
    }

    /// Process an image file on disk.
    pub async fn process_file(&self, path: &Path, brand: &str) -> Result<OcrResult, PipelineError> {
        let bytes = tokio::fs::read(path).await?;
        self.process_bytes(&bytes, brand).await
    }

    /// Process raw image bytes (camera capture or gallery pick).
    pub async fn process_bytes(&self, image: &[u8], brand: &str) -> Result<OcrResult, PipelineError> {
        let texts = self.recognizer.recognize(image).await.map_err(|e| {
            warn!("receipt recognition failed: {e}");
            e
        })?;
        let lines = OcrLine::sequence(texts);

        let scan = self.engine.scan(&lines, brand);
        match &scan {
            Some(s) => info!(store = %s.store_name, items = s.products.len(), "receipt verified"),
            None => info!(brand, lines = lines.len(), "receipt not confirmed for brand"),
        }

        Ok(OcrResult { lines, scan })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognizer::MockRecognizer;

    fn pipeline(lines: &[&str]) -> ReceiptPipeline<MockRecognizer> {
        ReceiptPipeline::new(MockRecognizer::new(lines.iter().copied()), ReceiptEngine::default())
    }

    #[tokio::test]
    async fn process_bytes_verifies_receipt() {
        let p = pipeline(&["BRAND CAFE", "Americano 3000", "TOTAL 3000"]);
        let result = p.process_bytes(b"jpeg", "Brand Cafe").await.unwrap();
        assert_eq!(result.lines.len(), 3);
        let scan = result.scan.unwrap();
        assert_eq!(scan.store_name, "BRAND CAFE");
        assert_eq!(scan.products.len(), 1);
    }

    #[tokio::test]
    async fn unmatched_brand_is_ok_none() {
        let p = pipeline(&["OTHER PLACE", "Americano 3000"]);
        let result = p.process_bytes(b"jpeg", "Brand Cafe").await.unwrap();
        assert!(result.scan.is_none());
    }

    #[tokio::test]
    async fn recognition_failure_is_an_error() {
        let p = ReceiptPipeline::new(MockRecognizer::failing("timeout"), ReceiptEngine::default());
        let err = p.process_bytes(b"jpeg", "Brand Cafe").await.unwrap_err();
        assert!(matches!(err, PipelineError::Ocr(OcrError::Service(_))));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn process_file_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("receipt.jpg");
        std::fs::write(&path, b"not really a jpeg").unwrap();

        let p = pipeline(&["BRAND CAFE", "Latte 4200"]);
        let result = p.process_file(&path, "Brand Cafe").await.unwrap();
        assert_eq!(result.scan.unwrap().products[0].name, "Latte");
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let p = pipeline(&[]);
        let err = p.process_file(Path::new("/definitely/not/here.jpg"), "x").await.unwrap_err();
        assert!(matches!(err, PipelineError::Io(_)));
        assert!(!err.is_retryable());
    }
}
