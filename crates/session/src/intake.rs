//! Video intake: validates selected files and owns the inline error slot.

use rehearsal_core::error::INVALID_VIDEO_MESSAGE;
use rehearsal_core::{validate_candidate, FileCandidate, IntakeError, IntakeSource, VideoAsset};
use tokio::sync::watch;

/// Validation front for every file selection, whatever its source.
///
/// Never starts a network operation.
pub struct VideoIntake {
    error: watch::Sender<Option<String>>,
}

impl VideoIntake {
    pub fn new() -> Self {
        let (error, _) = watch::channel(None);
        Self { error }
    }

    /// Validate a candidate, updating the error slot either way.
    pub fn validate(
        &self,
        candidate: FileCandidate,
        source: IntakeSource,
    ) -> Result<VideoAsset, IntakeError> {
        match validate_candidate(candidate) {
            Ok(asset) => {
                tracing::info!(
                    %source,
                    display_name = %asset.display_name(),
                    mime_type = %asset.mime_type(),
                    bytes = asset.len(),
                    "Video accepted",
                );
                self.error.send_replace(None);
                Ok(asset)
            }
            Err(e) => {
                tracing::info!(%source, error = ?e, "Rejected file selection");
                self.error.send_replace(Some(e.user_message()));
                Err(e)
            }
        }
    }

    /// Text currently shown under the drop zone, if any.
    pub fn error(&self) -> Option<String> {
        self.error.borrow().clone()
    }

    pub fn clear_error(&self) {
        self.error.send_if_modified(|slot| slot.take().is_some());
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.error.subscribe()
    }
}

impl Default for VideoIntake {
    fn default() -> Self {
        Self::new()
    }
}
