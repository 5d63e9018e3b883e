//! Client for the remote image host.
//!
//! Uploaded files are stored on a Picsur instance; only the returned id and
//! served URL are kept locally. [`ImageHost`] is the seam handlers depend on,
//! so tests can substitute an in-memory implementation.

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::PicsurConfig;

/// Content types accepted for upload.
pub const ALLOWED_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

pub fn is_allowed_content_type(content_type: &str) -> bool {
    ALLOWED_CONTENT_TYPES.contains(&content_type)
}

/// A file stored on the image host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    /// Identifier used to delete the file later.
    pub remote_id: String,
    /// Publicly served URL.
    pub url: String,
}

/// Errors from the image host layer.
#[derive(Debug, thiserror::Error)]
pub enum ImageHostError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("Image host request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The host returned a non-2xx status code.
    #[error("Image host error ({status}): {body}")]
    ApiError { status: u16, body: String },
}

/// Remote storage for image files.
#[async_trait]
pub trait ImageHost: Send + Sync {
    async fn upload(
        &self,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadedImage, ImageHostError>;

    async fn delete(&self, remote_id: &str) -> Result<(), ImageHostError>;
}

/// HTTP client for a Picsur instance.
pub struct PicsurClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct PicsurEnvelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct PicsurImage {
    id: String,
}

impl PicsurClient {
    pub fn new(config: &PicsurConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// URL at which Picsur serves an uploaded image.
    pub fn image_url(&self, remote_id: &str) -> String {
        format!("{}/i/{remote_id}", self.api_url)
    }

    fn authorization(&self) -> String {
        format!("Api-Key {}", self.api_key)
    }

    // ---- private helpers ----

    /// Return the response unchanged on success, or an
    /// [`ImageHostError::ApiError`] carrying the status and body text.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ImageHostError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ImageHostError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl ImageHost for PicsurClient {
    async fn upload(
        &self,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadedImage, ImageHostError> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(content_type)?;
        let form = reqwest::multipart::Form::new().part("image", part);

        let response = self
            .client
            .post(format!("{}/api/image/upload", self.api_url))
            .header(reqwest::header::AUTHORIZATION, self.authorization())
            .multipart(form)
            .send()
            .await?;

        let envelope: PicsurEnvelope<PicsurImage> =
            Self::ensure_success(response).await?.json().await?;
        let remote_id = envelope.data.id;
        tracing::info!(%remote_id, filename, "Uploaded image to Picsur");

        Ok(UploadedImage {
            url: self.image_url(&remote_id),
            remote_id,
        })
    }

    async fn delete(&self, remote_id: &str) -> Result<(), ImageHostError> {
        let response = self
            .client
            .post(format!("{}/api/image/delete", self.api_url))
            .header(reqwest::header::AUTHORIZATION, self.authorization())
            .json(&serde_json::json!({ "ids": [remote_id] }))
            .send()
            .await?;

        Self::ensure_success(response).await?;
        tracing::info!(%remote_id, "Deleted image from Picsur");
        Ok(())
    }
}
