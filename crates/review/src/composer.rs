use revu_ocr::{OcrBackend, PipelineError, ReceiptPipeline};
use thiserror::Error;
use tracing::{info, warn};

use crate::draft::{ReceiptAttachment, ReviewDraft, ReviewSubmission};
use crate::ports::{ImageHost, PortError, ReviewSubmitter, SessionProvider};

const RECEIPT_FILE_NAME: &str = "receipt.jpg";

#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("Receipt scan failed, please try again: {0}")]
    ScanFailed(#[source] PipelineError),
    #[error("Image upload failed: {0}")]
    Upload(#[source] PortError),
    #[error("Sign-in required")]
    NotSignedIn,
    #[error("Review submission failed: {0}")]
    Submit(#[source] PortError),
}

impl ComposeError {
    pub fn is_retryable(&self) -> bool {
        match self {
            ComposeError::ScanFailed(e) => e.is_retryable(),
            ComposeError::Upload(_) | ComposeError::Submit(_) => true,
            ComposeError::NotSignedIn => false,
        }
    }
}

/// Drives one review from receipt photo to submission.
pub struct ReviewComposer<R, H, S, W>
where
    R: OcrBackend,
    H: ImageHost,
    S: SessionProvider,
    W: ReviewSubmitter,
{
    pipeline: ReceiptPipeline<R>,
    host: H,
    sessions: S,
    submitter: W,
}

impl<R, H, S, W> ReviewComposer<R, H, S, W>
where
    R: OcrBackend,
    H: ImageHost,
    S: SessionProvider,
    W: ReviewSubmitter,
{
    pub fn new(pipeline: ReceiptPipeline<R>, host: H, sessions: S, submitter: W) -> Self {
        Self { pipeline, host, sessions, submitter }
    }

    /// Scan a receipt photo against `brand`, then upload it.
    ///
    /// An unconfirmed receipt is still uploaded; only a recognition or upload
    /// failure is an error.
    pub async fn attach_receipt(&self, image: &[u8], brand: &str) -> Result<ReceiptAttachment, ComposeError> {
        let result = self
            .pipeline
            .process_bytes(image, brand)
            .await
            .map_err(ComposeError::ScanFailed)?;

        if result.scan.is_none() {
            info!(brand, "receipt does not show the claimed store");
        }

        let image_url = self
            .host
            .upload(image, RECEIPT_FILE_NAME)
            .await
            .map_err(ComposeError::Upload)?;

        Ok(ReceiptAttachment { image_url, scan: result.scan })
    }

    /// Scan, upload and record the receipt on `draft`, using the draft's brand.
    pub async fn add_receipt(&self, draft: &mut ReviewDraft, image: &[u8]) -> Result<bool, ComposeError> {
        let attachment = self.attach_receipt(image, &draft.menu.brand_name).await?;
        let verified = attachment.is_verified();
        draft.attach(attachment);
        Ok(verified)
    }

    /// Submit the draft as the signed-in user.
    pub async fn submit(&self, draft: ReviewDraft) -> Result<ReviewSubmission, ComposeError> {
        let session = self.sessions.current_session().await.ok_or(ComposeError::NotSignedIn)?;
        let submission = draft.into_submission(session.user_id.clone());

        self.submitter.submit(&submission, &session).await.map_err(|e| {
            warn!("review submission failed: {e}");
            ComposeError::Submit(e)
        })?;

        info!(menu_id = submission.menu_id, verified = submission.store_name.is_some(), "review submitted");
        Ok(submission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::MenuContext;
    use crate::ports::{Session, StaticSession};
    use async_trait::async_trait;
    use revu_ocr::{MockRecognizer, ReceiptEngine};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeHost {
        uploads: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl ImageHost for FakeHost {
        async fn upload(&self, _image: &[u8], file_name: &str) -> Result<String, PortError> {
            if self.fail {
                return Err(PortError::Status { status: 500, body: "down".into() });
            }
            let n = self.uploads.fetch_add(1, Ordering::SeqCst);
            Ok(format!("https://cdn.test/{n}/{file_name}"))
        }
    }

    #[derive(Default)]
    struct RecordingSubmitter {
        sent: Mutex<Vec<(ReviewSubmission, String)>>,
    }

    #[async_trait]
    impl ReviewSubmitter for RecordingSubmitter {
        async fn submit(&self, review: &ReviewSubmission, session: &Session) -> Result<(), PortError> {
            self.sent.lock().unwrap().push((review.clone(), session.token.clone()));
            Ok(())
        }
    }

    type TestComposer = ReviewComposer<MockRecognizer, FakeHost, StaticSession, RecordingSubmitter>;

    fn composer(recognizer: MockRecognizer, session: Option<Session>) -> TestComposer {
        ReviewComposer::new(
            ReceiptPipeline::new(recognizer, ReceiptEngine::default()),
            FakeHost::default(),
            StaticSession(session),
            RecordingSubmitter::default(),
        )
    }

    fn draft() -> ReviewDraft {
        ReviewDraft::new(MenuContext {
            menu_id: 3,
            menu_name: "Americano".into(),
            brand_name: "Brand Cafe".into(),
            image_url: None,
        })
    }

    fn session() -> Option<Session> {
        Some(Session { user_id: "user-1".into(), token: "tok".into() })
    }

    #[tokio::test]
    async fn verified_receipt_flows_into_submission() {
        let c = composer(
            MockRecognizer::new(["BRAND CAFE", "Americano 3000", "Croissant 2 3500", "SUBTOTAL 10000"]),
            session(),
        );
        let mut d = draft();
        assert!(c.add_receipt(&mut d, b"jpeg").await.unwrap());
        d.content = "Great".into();

        let sent = c.submit(d).await.unwrap();
        assert_eq!(sent.user_id, "user-1");
        assert_eq!(sent.store_name.as_deref(), Some("BRAND CAFE"));
        assert_eq!(sent.products.len(), 2);
        assert_eq!(sent.image_urls, vec!["https://cdn.test/0/receipt.jpg"]);

        let recorded = c.submitter.sent.lock().unwrap();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].1, "tok");
    }

    #[tokio::test]
    async fn unconfirmed_receipt_is_still_uploaded() {
        let c = composer(MockRecognizer::new(["OTHER STORE", "Tea 2000"]), session());
        let att = c.attach_receipt(b"jpeg", "Brand Cafe").await.unwrap();
        assert!(!att.is_verified());
        assert_eq!(c.host.uploads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn scan_failure_skips_upload_and_is_retryable() {
        let c = composer(MockRecognizer::failing("503"), session());
        let err = c.attach_receipt(b"jpeg", "Brand Cafe").await.unwrap_err();
        assert!(matches!(err, ComposeError::ScanFailed(_)));
        assert!(err.is_retryable());
        assert_eq!(c.host.uploads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn upload_failure_is_reported() {
        let c = ReviewComposer::new(
            ReceiptPipeline::new(MockRecognizer::new(["BRAND CAFE"]), ReceiptEngine::default()),
            FakeHost { fail: true, ..FakeHost::default() },
            StaticSession(session()),
            RecordingSubmitter::default(),
        );
        let mut d = draft();
        let err = c.add_receipt(&mut d, b"jpeg").await.unwrap_err();
        assert!(matches!(err, ComposeError::Upload(_)));
        assert!(d.image_urls.is_empty());
        assert!(d.receipt.is_none());
    }

    #[tokio::test]
    async fn submit_requires_session() {
        let c = composer(MockRecognizer::new(Vec::<String>::new()), None);
        let err = c.submit(draft()).await.unwrap_err();
        assert!(matches!(err, ComposeError::NotSignedIn));
        assert!(!err.is_retryable());
        assert!(c.submitter.sent.lock().unwrap().is_empty());
    }
}
