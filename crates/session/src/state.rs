//! Session state types shared by the controller components.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use rehearsal_core::VideoAsset;
use tokio_util::sync::CancellationToken;

/// Which workflow a session runs after a successful upload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WorkflowVariant {
    /// Fetch and show a feedback report.
    #[default]
    Feedback,
    /// Skip the report and unlock the chat screen.
    Chat,
}

impl FromStr for WorkflowVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "feedback" => Ok(Self::Feedback),
            "chat" => Ok(Self::Chat),
            other => Err(format!("unknown workflow '{other}'")),
        }
    }
}

/// Which screen of the session is showing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScreenMode {
    #[default]
    Upload,
    Chat,
}

/// Why a submission cycle ended in `Failed`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FailureReason {
    #[error("upload failed: {0}")]
    Upload(String),

    #[error("feedback fetch failed: {0}")]
    Feedback(String),

    #[error("submission timed out")]
    Timeout,

    #[error("submission cancelled")]
    Cancelled,
}

/// Lifecycle of the one submission a session can hold.
///
/// ```text
/// Idle -> Staged -> Submitting -> Succeeded | Failed
/// Failed --retry--> Staged
/// Staged | Succeeded | Failed --reset--> Idle
/// ```
#[derive(Debug, Clone, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Staged(Arc<VideoAsset>),
    Submitting {
        asset: Arc<VideoAsset>,
        /// Monotonic cycle number, for log correlation.
        cycle: u64,
        cancel: CancellationToken,
    },
    Succeeded,
    Failed {
        reason: FailureReason,
        /// Kept so the same video can be retried.
        asset: Arc<VideoAsset>,
    },
}

impl SubmissionState {
    /// The asset waiting to be submitted, if any.
    pub fn staged_asset(&self) -> Option<&Arc<VideoAsset>> {
        match self {
            Self::Staged(asset) => Some(asset),
            _ => None,
        }
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, Self::Submitting { .. })
    }

    pub fn failure(&self) -> Option<&FailureReason> {
        match self {
            Self::Failed { reason, .. } => Some(reason),
            _ => None,
        }
    }

    /// Short name used in log fields.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Staged(_) => "staged",
            Self::Submitting { .. } => "submitting",
            Self::Succeeded => "succeeded",
            Self::Failed { .. } => "failed",
        }
    }
}

impl fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use rehearsal_core::{validate_candidate, FileCandidate};

    use super::*;

    fn asset() -> Arc<VideoAsset> {
        Arc::new(validate_candidate(FileCandidate::new(vec![1], "video/mp4", "a.mp4")).unwrap())
    }

    #[test]
    fn default_state_is_idle() {
        assert!(matches!(SubmissionState::default(), SubmissionState::Idle));
    }

    #[test]
    fn staged_asset_only_for_staged() {
        let a = asset();
        assert!(SubmissionState::Staged(a.clone()).staged_asset().is_some());
        let submitting = SubmissionState::Submitting {
            asset: a.clone(),
            cycle: 1,
            cancel: CancellationToken::new(),
        };
        assert!(submitting.staged_asset().is_none());
        assert!(submitting.is_submitting());
        let failed = SubmissionState::Failed {
            reason: FailureReason::Timeout,
            asset: a,
        };
        assert!(failed.staged_asset().is_none());
        assert_eq!(failed.failure(), Some(&FailureReason::Timeout));
    }

    #[test]
    fn labels_are_stable() {
        assert_eq!(SubmissionState::Idle.to_string(), "idle");
        assert_eq!(SubmissionState::Succeeded.label(), "succeeded");
    }

    #[test]
    fn failure_reason_display() {
        assert_eq!(
            FailureReason::Upload("HTTP 500".into()).to_string(),
            "upload failed: HTTP 500"
        );
        assert_eq!(FailureReason::Timeout.to_string(), "submission timed out");
    }

    #[test]
    fn workflow_variant_parses_case_insensitively() {
        assert_eq!("Chat".parse::<WorkflowVariant>(), Ok(WorkflowVariant::Chat));
        assert_eq!(" feedback ".parse::<WorkflowVariant>(), Ok(WorkflowVariant::Feedback));
        assert!("video".parse::<WorkflowVariant>().is_err());
    }
}
