//! REST API client for the analysis service HTTP endpoints.
//!
//! Wraps the three calls the rehearsal client makes (question fetch, video
//! upload, feedback fetch) using [`reqwest`].

use rehearsal_core::{FeedbackReport, Question, VideoAsset};
use serde::Deserialize;

use crate::config::ApiConfig;

/// Multipart field name the service reads the video from.
pub const VIDEO_FIELD: &str = "video";

/// HTTP client for a single analysis service instance.
#[derive(Debug, Clone)]
pub struct AnalysisApi {
    client: reqwest::Client,
    api_url: String,
}

/// Acknowledgement returned by `POST /upload-video`.
///
/// Only the fact that it parsed is consulted; the fields are kept for logs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UploadAck {
    #[serde(default)]
    pub message: Option<String>,
    /// Server-side location of the stored file, if reported.
    #[serde(default)]
    pub path: Option<String>,
}

/// Errors from the analysis REST API layer.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisApiError {
    /// The HTTP request itself failed (network, DNS, TLS, body decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service returned a non-2xx status code.
    #[error("Analysis API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

impl AnalysisApi {
    /// Create a new API client.
    ///
    /// * `api_url` - Base HTTP URL, e.g. `http://host:5000`.
    pub fn new(api_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
        }
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, api_url: String) -> Self {
        Self { client, api_url }
    }

    /// Build a client from [`ApiConfig`], applying its request timeout.
    pub fn from_config(config: &ApiConfig) -> Result<Self, AnalysisApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self::with_client(builder.build()?, config.base_url.clone()))
    }

    /// Base HTTP URL of the service.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Fetch one practice question via `GET /get-question`.
    pub async fn get_question(&self) -> Result<Question, AnalysisApiError> {
        let response = self
            .client
            .get(format!("{}/get-question", self.api_url))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Upload a staged video via `POST /upload-video`.
    ///
    /// The asset goes in the multipart field `video` with its display name
    /// as the file name and its mime type as the part content type.
    pub async fn upload_video(&self, asset: &VideoAsset) -> Result<UploadAck, AnalysisApiError> {
        let part = reqwest::multipart::Part::bytes(asset.bytes().to_vec())
            .file_name(asset.display_name().to_string())
            .mime_str(asset.mime_type())?;
        let form = reqwest::multipart::Form::new().part(VIDEO_FIELD, part);

        tracing::debug!(
            display_name = %asset.display_name(),
            bytes = asset.len(),
            "Uploading video",
        );

        let response = self
            .client
            .post(format!("{}/upload-video", self.api_url))
            .multipart(form)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Fetch the feedback report for the most recent upload via `GET /`.
    ///
    /// The request carries no identifier for the upload it refers to; the
    /// service is trusted to answer for the latest one.
    pub async fn get_feedback(&self) -> Result<FeedbackReport, AnalysisApiError> {
        let response = self
            .client
            .get(format!("{}/", self.api_url))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a [`AnalysisApiError::ApiError`]
    /// containing the status and body text on failure.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, AnalysisApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(AnalysisApiError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, AnalysisApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display() {
        let err = AnalysisApiError::ApiError {
            status: 500,
            body: "boom".into(),
        };
        assert_eq!(err.to_string(), "Analysis API error (500): boom");
    }

    #[test]
    fn request_error_display() {
        let req_err = reqwest::Client::new().get("://bad").build().unwrap_err();
        let err = AnalysisApiError::Request(req_err);
        assert!(err.to_string().contains("HTTP request failed"));
    }

    #[test]
    fn from_config_keeps_base_url() {
        let api = AnalysisApi::from_config(&ApiConfig {
            base_url: "http://analysis:9000".into(),
            request_timeout: Some(std::time::Duration::from_secs(5)),
        })
        .unwrap();
        assert_eq!(api.api_url(), "http://analysis:9000");
    }

    #[test]
    fn upload_ack_ignores_unknown_fields() {
        let ack: UploadAck = serde_json::from_value(serde_json::json!({
            "message": "Video uploaded successfully",
            "path": "uploads/a.mp4",
            "extra": 1,
        }))
        .unwrap();
        assert_eq!(ack.path.as_deref(), Some("uploads/a.mp4"));
    }
}
