use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::debug;

use crate::config::ServiceConfig;
use crate::draft::ReviewSubmission;
use crate::ports::{ImageHost, PortError, ReviewSubmitter, Session};

// ── Image host ────────────────────────────────────────────────────────────────

/// Unsigned multipart upload to a Cloudinary-style image host.
pub struct HttpImageHost {
    client: reqwest::Client,
    endpoint: String,
    upload_preset: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    url: Option<String>,
}

impl HttpImageHost {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>, upload_preset: impl Into<String>) -> Self {
        Self { client, endpoint: endpoint.into(), upload_preset: upload_preset.into() }
    }

    pub fn from_config(config: &ServiceConfig) -> Result<Self, PortError> {
        Ok(Self::new(
            config.http_client()?,
            config.image_host.endpoint.clone(),
            config.image_host.upload_preset.clone(),
        ))
    }
}

#[async_trait]
impl ImageHost for HttpImageHost {
    async fn upload(&self, image: &[u8], file_name: &str) -> Result<String, PortError> {
        let part = Part::bytes(image.to_vec())
            .file_name(file_name.to_string())
            .mime_str(mime_for(file_name))?;
        let form = Form::new()
            .part("file", part)
            .text("upload_preset", self.upload_preset.clone());

        let resp = self.client.post(&self.endpoint).multipart(form).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(PortError::Status { status: status.as_u16(), body });
        }

        let body: UploadResponse = resp.json().await?;
        let url = body
            .secure_url
            .or(body.url)
            .ok_or_else(|| PortError::InvalidResponse("upload response has no URL".into()))?;
        debug!(%url, bytes = image.len(), "image uploaded");
        Ok(url)
    }
}

fn mime_for(file_name: &str) -> &'static str {
    let ext = file_name.rsplit_once('.').map(|(_, e)| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("heic") => "image/heic",
        _ => "image/jpeg",
    }
}

// ── Review API ────────────────────────────────────────────────────────────────

pub struct HttpReviewSubmitter {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpReviewSubmitter {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self { client, endpoint: endpoint.into() }
    }

    pub fn from_config(config: &ServiceConfig) -> Result<Self, PortError> {
        Ok(Self::new(config.http_client()?, config.reviews.endpoint.clone()))
    }
}

#[async_trait]
impl ReviewSubmitter for HttpReviewSubmitter {
    async fn submit(&self, review: &ReviewSubmission, session: &Session) -> Result<(), PortError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&session.token)
            .json(review)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(PortError::Status { status: status.as_u16(), body });
        }
        Ok(())
    }
}
