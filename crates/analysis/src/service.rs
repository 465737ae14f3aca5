//! Trait seam between the session controller and the analysis service.
//!
//! The controller only ever talks to `dyn AnalysisService`, so tests and
//! alternative transports can stand in for the HTTP client.

use async_trait::async_trait;
use rehearsal_core::{FeedbackReport, Question, VideoAsset};

use crate::api::{AnalysisApi, AnalysisApiError, UploadAck};

/// The three remote calls a rehearsal session makes.
#[async_trait]
pub trait AnalysisService: Send + Sync {
    /// Fetch one practice question.
    async fn get_question(&self) -> Result<Question, AnalysisApiError>;

    /// Upload a staged video.
    async fn upload_video(&self, asset: &VideoAsset) -> Result<UploadAck, AnalysisApiError>;

    /// Fetch the report for the most recent upload.
    async fn get_feedback(&self) -> Result<FeedbackReport, AnalysisApiError>;
}

#[async_trait]
impl AnalysisService for AnalysisApi {
    async fn get_question(&self) -> Result<Question, AnalysisApiError> {
        AnalysisApi::get_question(self).await
    }

    async fn upload_video(&self, asset: &VideoAsset) -> Result<UploadAck, AnalysisApiError> {
        AnalysisApi::upload_video(self, asset).await
    }

    async fn get_feedback(&self) -> Result<FeedbackReport, AnalysisApiError> {
        AnalysisApi::get_feedback(self).await
    }
}
