//! Media Hosting
//!
//! Images attached to messages and avatars are uploaded to an external
//! host before anything is stored; only the returned public URL is kept.
//! [`CloudinaryHost`] talks to the Cloudinary upload API. When no
//! credentials are configured [`DisabledMediaHost`] rejects every upload.

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::shared::config::CloudinarySettings;

const UPLOAD_FOLDER: &str = "talks";

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("media host is not configured")]
    NotConfigured,

    #[error("upload request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("media host rejected the upload: {0}")]
    Rejected(String),
}

#[async_trait]
pub trait MediaHost: Send + Sync + 'static {
    /// Upload a data URI or remote URL and return the hosted URL
    async fn upload(&self, payload: &str) -> Result<String, MediaError>;
}

pub struct DisabledMediaHost;

#[async_trait]
impl MediaHost for DisabledMediaHost {
    async fn upload(&self, _payload: &str) -> Result<String, MediaError> {
        tracing::warn!("[Media] Upload attempted but no media host is configured");
        Err(MediaError::NotConfigured)
    }
}

pub struct CloudinaryHost {
    client: reqwest::Client,
    settings: CloudinarySettings,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    error: Option<UploadFailure>,
}

#[derive(Debug, Deserialize)]
struct UploadFailure {
    message: String,
}

impl CloudinaryHost {
    pub fn new(settings: CloudinarySettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            settings,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "https://api.cloudinary.com/v1_1/{}/image/upload",
            self.settings.cloud_name
        )
    }
}

/// Request signature over the sorted signed parameters
pub fn sign_upload(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted: Vec<_> = params.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let to_sign = sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");
    format!("{:x}", Sha256::digest(format!("{}{}", to_sign, api_secret).as_bytes()))
}

#[async_trait]
impl MediaHost for CloudinaryHost {
    async fn upload(&self, payload: &str) -> Result<String, MediaError> {
        let timestamp = Utc::now().timestamp().to_string();
        let signature = sign_upload(
            &[("folder", UPLOAD_FOLDER), ("timestamp", &timestamp)],
            &self.settings.api_secret,
        );

        let form = [
            ("file", payload),
            ("api_key", self.settings.api_key.as_str()),
            ("folder", UPLOAD_FOLDER),
            ("timestamp", timestamp.as_str()),
            ("signature", signature.as_str()),
            ("signature_algorithm", "sha256"),
        ];

        let response: UploadResponse = self
            .client
            .post(self.endpoint())
            .form(&form)
            .send()
            .await?
            .json()
            .await?;

        match response {
            UploadResponse { secure_url: Some(url), .. } => {
                tracing::debug!("[Media] Uploaded to {}", url);
                Ok(url)
            }
            UploadResponse { error: Some(failure), .. } => {
                tracing::warn!("[Media] Upload rejected: {}", failure.message);
                Err(MediaError::Rejected(failure.message))
            }
            _ => Err(MediaError::Rejected("response carried no URL".to_string())),
        }
    }
}
