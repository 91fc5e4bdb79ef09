//! Client for the external video host API.
//!
//! The host is consumed as an opaque service through the `VideoHost` trait:
//! upload session creation, the tus transfer itself, and deletion. The
//! production implementation talks to a Vimeo-style REST API; tests swap in
//! a mock.

use crate::config::VideoHostConfig;
use crate::errors::UploadError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tracing::error;

/// Transfer chunk size. Progress granularity follows from this.
const CHUNK_SIZE: usize = 256 * 1024;

/// Request to open an upload session with the host.
#[derive(Debug, Clone)]
pub struct NewUploadSession {
    pub title: String,
    pub description: Option<String>,
    /// Declared file size in bytes. The host allocates the session for
    /// exactly this many bytes.
    pub size_bytes: u64,
}

/// Ephemeral handle for one in-flight transfer. Never persisted; discarded
/// on completion or failure.
#[derive(Debug, Clone)]
pub struct UploadSession {
    /// Endpoint the file bytes are PATCHed to.
    pub upload_url: String,
    /// Host-side resource URI, e.g. `/videos/123456789`.
    pub resource_uri: String,
}

impl UploadSession {
    /// The host's resource identifier, derived from the session URI.
    pub fn resource_id(&self) -> &str {
        self.resource_uri
            .rsplit('/')
            .next()
            .unwrap_or(self.resource_uri.as_str())
    }
}

/// Progress observer invoked with an integer percentage as bytes go out.
pub type ProgressFn = Arc<dyn Fn(u8) + Send + Sync>;

#[async_trait]
pub trait VideoHost: Send + Sync {
    /// Opens an upload session for a file of the declared size. Fails if
    /// the host does not hand back a usable upload endpoint.
    async fn create_upload_session(
        &self,
        request: &NewUploadSession,
    ) -> Result<UploadSession, UploadError>;

    /// Streams the file to the session's upload endpoint, reporting
    /// progress after each chunk.
    async fn transfer(
        &self,
        session: &UploadSession,
        file_path: &Path,
        progress: ProgressFn,
    ) -> Result<(), UploadError>;

    /// Deletes the remote asset. Does not touch any local record.
    async fn delete_video(&self, resource_id: &str) -> Result<(), UploadError>;
}

/// Production video host client (Vimeo-style API, tus upload approach).
#[derive(Clone)]
pub struct VimeoClient {
    http_client: Client,
    config: VideoHostConfig,
}

#[derive(Debug, Deserialize)]
struct CreateVideoResponse {
    uri: String,
    upload: Option<UploadInfo>,
}

#[derive(Debug, Deserialize)]
struct UploadInfo {
    upload_link: Option<String>,
}

impl VimeoClient {
    pub fn new(config: VideoHostConfig) -> Result<Self, UploadError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(600))
            .build()
            .map_err(|e| {
                UploadError::session_creation(format!("HTTP client setup failed: {}", e), None)
            })?;

        Ok(Self {
            http_client,
            config,
        })
    }
}

#[async_trait]
impl VideoHost for VimeoClient {
    async fn create_upload_session(
        &self,
        request: &NewUploadSession,
    ) -> Result<UploadSession, UploadError> {
        let body = json!({
            "name": request.title,
            "description": request.description,
            "upload": {
                "approach": "tus",
                "size": request.size_bytes,
            },
        });

        let response = self
            .http_client
            .post(format!("{}/me/videos", self.config.api_base_url))
            .bearer_auth(&self.config.api_token)
            .header("Accept", "application/vnd.vimeo.*+json;version=3.4")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("Video host unreachable: {}", e);
                UploadError::session_creation(format!("Video host unreachable: {}", e), None)
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            error!("Upload session creation rejected ({}): {}", status, detail);
            return Err(UploadError::session_creation(
                format!("Video host returned {}", status),
                Some(status.as_u16()),
            ));
        }

        let created: CreateVideoResponse = response.json().await.map_err(|e| {
            UploadError::session_creation(format!("Unreadable host response: {}", e), None)
        })?;

        let upload_url = created
            .upload
            .and_then(|info| info.upload_link)
            .ok_or_else(|| {
                UploadError::session_creation("Host returned no upload endpoint", None)
            })?;

        Ok(UploadSession {
            upload_url,
            resource_uri: created.uri,
        })
    }

    async fn transfer(
        &self,
        session: &UploadSession,
        file_path: &Path,
        progress: ProgressFn,
    ) -> Result<(), UploadError> {
        let file = tokio::fs::File::open(file_path).await?;
        let total = file.metadata().await?.len();
        let mut reader = tokio::io::BufReader::new(file);

        // The body is produced chunk by chunk; progress is published after
        // each chunk leaves the reader, so the observed percentage is
        // non-decreasing and reaches 100 with the final chunk.
        let body_stream = async_stream::stream! {
            let mut sent: u64 = 0;
            loop {
                let mut buf = vec![0u8; CHUNK_SIZE];
                match reader.read(&mut buf).await {
                    Ok(0) => break,
                    Ok(n) => {
                        buf.truncate(n);
                        sent += n as u64;
                        let percent = if total == 0 {
                            100
                        } else {
                            ((sent * 100) / total) as u8
                        };
                        progress(percent);
                        yield Ok::<Vec<u8>, std::io::Error>(buf);
                    }
                    Err(e) => {
                        yield Err(e);
                        break;
                    }
                }
            }
        };

        let response = self
            .http_client
            .patch(&session.upload_url)
            .header("Tus-Resumable", "1.0.0")
            .header("Upload-Offset", "0")
            .header("Content-Type", "application/offset+octet-stream")
            .body(reqwest::Body::wrap_stream(body_stream))
            .send()
            .await
            .map_err(|e| UploadError::transfer(format!("Transfer interrupted: {}", e)))?;

        let status = response.status();
        if status.as_u16() >= 300 {
            return Err(UploadError::transfer(format!(
                "Upload endpoint returned {}",
                status
            )));
        }

        Ok(())
    }

    async fn delete_video(&self, resource_id: &str) -> Result<(), UploadError> {
        let response = self
            .http_client
            .delete(format!("{}/videos/{}", self.config.api_base_url, resource_id))
            .bearer_auth(&self.config.api_token)
            .send()
            .await
            .map_err(|e| UploadError::transfer(format!("Video host unreachable: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            error!("Video deletion rejected ({}) for {}", status, resource_id);
            return Err(UploadError::transfer(format!(
                "Video host returned {}",
                status
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_id_is_last_uri_segment() {
        let session = UploadSession {
            upload_url: "https://upload.example.com/abc".to_string(),
            resource_uri: "/videos/987654321".to_string(),
        };
        assert_eq!(session.resource_id(), "987654321");
    }

    #[test]
    fn resource_id_falls_back_to_whole_uri() {
        let session = UploadSession {
            upload_url: String::new(),
            resource_uri: "987654321".to_string(),
        };
        assert_eq!(session.resource_id(), "987654321");
    }
}
