use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::path::Path;
use crate::shared::config::CloudinaryConfig;
use super::{MediaStore, UploadedMedia};

// Cloudinary API 클라이언트
// Cloudinary upload API client
pub struct CloudinaryClient {
    http_client: reqwest::Client,
    base_url: String,
    config: CloudinaryConfig,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: String,
    public_id: String,
}

impl CloudinaryClient {
    // 클라이언트 생성
    // Create new Cloudinary client instance
    pub fn new(config: CloudinaryConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            base_url: format!("https://api.cloudinary.com/v1_1/{}", config.cloud_name),
            config,
        })
    }

    /// 업로드 서명 생성: 파라미터를 정렬해 이어 붙이고 api_secret 을 덧붙여 SHA-256
    /// Signed-upload signature over the sorted parameters
    fn sign(&self, params: &[(&str, &str)]) -> String {
        let mut params = params.to_vec();
        params.sort_by(|a, b| a.0.cmp(b.0));

        let to_sign = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");

        let mut hasher = Sha256::new();
        hasher.update(to_sign.as_bytes());
        hasher.update(self.config.api_secret.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

#[async_trait]
impl MediaStore for CloudinaryClient {
    async fn upload(&self, path: &Path) -> Result<UploadedMedia> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read upload file {}", path.display()))?;

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();

        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = self.sign(&[("timestamp", timestamp.as_str())]);

        let form = reqwest::multipart::Form::new()
            .part("file", reqwest::multipart::Part::bytes(bytes).file_name(file_name))
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp)
            .text("signature", signature)
            .text("signature_algorithm", "sha256");

        let url = format!("{}/auto/upload", self.base_url);
        tracing::debug!(%url, path = %path.display(), "Uploading file to Cloudinary");

        let response = self
            .http_client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .context("Failed to send request to Cloudinary")?;

        // HTTP 상태 코드 확인
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Cloudinary returned error: {} - {}", status, body);
        }

        let uploaded: UploadResponse = response
            .json()
            .await
            .context("Failed to parse Cloudinary response")?;

        tracing::info!(public_id = %uploaded.public_id, "File uploaded to Cloudinary");

        Ok(UploadedMedia {
            url: uploaded.url,
            public_id: uploaded.public_id,
        })
    }
}
