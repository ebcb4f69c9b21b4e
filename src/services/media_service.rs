use crate::error::PipelineError;
use crate::models::upload_types::SourceFile;
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::multipart::{Form, Part};
use std::sync::Arc;
use tracing::{debug, error};

pub const DEFAULT_MEDIA_URL: &str = "https://api.cloudinary.com/v1_1";
const CHUNK_SIZE: usize = 64 * 1024;

/// Receives upload progress as a whole percentage (0-100).
pub type ProgressFn = Arc<dyn Fn(u8) + Send + Sync>;

/// Hosted media storage. Returns the public URL of the stored image.
#[async_trait]
pub trait MediaUploader: Send + Sync {
    async fn upload(&self, file: &SourceFile, on_progress: ProgressFn) -> Result<String, PipelineError>;
}

#[derive(serde::Deserialize)]
struct UploadResponse {
    secure_url: String,
}

#[derive(Clone)]
pub struct CloudinaryUploader {
    client: reqwest::Client,
    api_base: String,
    cloud_name: Option<String>,
    upload_preset: Option<String>,
}

impl CloudinaryUploader {
    pub fn new(
        client: reqwest::Client,
        api_base: impl Into<String>,
        cloud_name: Option<String>,
        upload_preset: Option<String>,
    ) -> Self {
        Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            cloud_name: cloud_name.filter(|s| !s.trim().is_empty()),
            upload_preset: upload_preset.filter(|s| !s.trim().is_empty()),
        }
    }

    fn endpoint(&self, cloud_name: &str) -> String {
        format!("{}/{}/image/upload", self.api_base, cloud_name)
    }
}

#[async_trait]
impl MediaUploader for CloudinaryUploader {
    async fn upload(&self, file: &SourceFile, on_progress: ProgressFn) -> Result<String, PipelineError> {
        let (Some(cloud_name), Some(preset)) = (&self.cloud_name, &self.upload_preset) else {
            return Err(PipelineError::Config);
        };

        let bytes = tokio::fs::read(&file.path)
            .await
            .map_err(|source| PipelineError::Io {
                path: file.path.clone(),
                source,
            })?;
        let total = bytes.len() as u64;
        debug!(
            cloud_name = %cloud_name,
            preset = %preset,
            size = total,
            "Uploading {}",
            file.name
        );

        let chunks: Vec<Vec<u8>> = bytes.chunks(CHUNK_SIZE).map(<[u8]>::to_vec).collect();
        let mut sent: u64 = 0;
        let mut last_reported: Option<u8> = None;
        let body_stream = futures::stream::iter(chunks).map(move |chunk| {
            sent += chunk.len() as u64;
            let progress = percent(sent, total);
            if last_reported.map_or(true, |last| progress > last) {
                on_progress(progress);
                last_reported = Some(progress);
            }
            Ok::<_, std::io::Error>(chunk)
        });

        let endpoint = self.endpoint(cloud_name);
        let part = Part::stream_with_length(reqwest::Body::wrap_stream(body_stream), total)
            .file_name(file.name.clone())
            .mime_str(mime_for(&file.name))
            .map_err(|e| PipelineError::remote(&endpoint, e))?;
        let form = Form::new()
            .part("file", part)
            .text("upload_preset", preset.clone());

        let response = self
            .client
            .post(&endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| PipelineError::remote(&endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Media upload rejected for {}", file.name);
            return Err(PipelineError::remote(&endpoint, format!("HTTP {}", status)));
        }

        let parsed: UploadResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::remote(&endpoint, e))?;
        Ok(parsed.secure_url)
    }
}

fn percent(sent: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    ((sent.min(total) * 100 + total / 2) / total) as u8
}

fn mime_for(name: &str) -> &'static str {
    let lower = name.to_ascii_lowercase();
    if lower.ends_with(".png") {
        "image/png"
    } else {
        "image/jpeg"
    }
}
