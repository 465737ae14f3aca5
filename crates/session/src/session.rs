//! One user's rehearsal session: the components wired together.
//!
//! [`InterviewSession`] is what a front end holds. It exposes the named
//! operations and read-only views; every piece of state is also available
//! as a [`watch::Receiver`] so a renderer can wait for changes.

use std::path::Path;
use std::sync::Arc;

use rehearsal_analysis::{AnalysisApiError, AnalysisService};
use rehearsal_core::{
    ChatMessage, ChatTranscript, FeedbackReport, FileCandidate, IntakeSource, Question,
    VideoAsset,
};
use tokio::sync::watch;
use tracing::Instrument;
use uuid::Uuid;

use crate::chat::ChatSession;
use crate::config::SessionConfig;
use crate::error::{PreconditionError, StageError};
use crate::intake::VideoIntake;
use crate::orchestrator::SubmissionOrchestrator;
use crate::question::QuestionProvider;
use crate::state::{ScreenMode, SubmissionState, WorkflowVariant};

pub struct InterviewSession {
    id: Uuid,
    intake: VideoIntake,
    orchestrator: SubmissionOrchestrator,
    questions: QuestionProvider,
    chat: Arc<ChatSession>,
}

impl InterviewSession {
    pub fn new(service: Arc<dyn AnalysisService>, config: SessionConfig) -> Self {
        let chat = Arc::new(ChatSession::new());
        let orchestrator = SubmissionOrchestrator::new(
            Arc::clone(&service),
            config.variant,
            config.submission_timeout,
            Arc::clone(&chat),
        );
        let id = Uuid::new_v4();
        tracing::info!(session_id = %id, variant = ?config.variant, "Session created");
        Self {
            id,
            intake: VideoIntake::new(),
            orchestrator,
            questions: QuestionProvider::new(service),
            chat,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn variant(&self) -> WorkflowVariant {
        self.orchestrator.variant()
    }

    // ---- operations ----

    /// Validate and stage a selected file.
    ///
    /// Drag-drop and picker selections both come through here. A rejected
    /// file clears any previously staged one. Nothing is staged, and the
    /// error slot is left alone, while a submission is in flight.
    pub fn stage(
        &self,
        candidate: FileCandidate,
        source: IntakeSource,
    ) -> Result<Arc<VideoAsset>, StageError> {
        if self.orchestrator.is_submitting() {
            return Err(PreconditionError::SubmissionInFlight.into());
        }
        match self.intake.validate(candidate, source) {
            Ok(asset) => {
                let asset = Arc::new(asset);
                self.orchestrator.stage(Arc::clone(&asset))?;
                Ok(asset)
            }
            Err(e) => {
                self.orchestrator.discard_staged()?;
                Err(e.into())
            }
        }
    }

    /// Read a file from disk and stage it as a picker selection.
    pub fn stage_path(&self, path: &Path) -> Result<Arc<VideoAsset>, StageError> {
        let candidate = FileCandidate::from_path(path)?;
        self.stage(candidate, IntakeSource::Picker)
    }

    /// Submit the staged video. See [`SubmissionOrchestrator::submit`].
    pub async fn submit(&self) -> Result<SubmissionState, PreconditionError> {
        let span = tracing::info_span!("submission", session_id = %self.id);
        self.orchestrator.submit().instrument(span).await
    }

    pub fn cancel_submission(&self) -> bool {
        self.orchestrator.cancel()
    }

    pub fn retry(&self) -> Result<(), PreconditionError> {
        self.orchestrator.retry()
    }

    /// Return to `Idle`. In the chat workflow this also clears the
    /// transcript and goes back to the upload screen.
    pub fn reset(&self) -> Result<(), PreconditionError> {
        self.orchestrator.reset()?;
        self.intake.clear_error();
        Ok(())
    }

    pub async fn fetch_question(&self) -> Result<Question, AnalysisApiError> {
        let span = tracing::info_span!("question", session_id = %self.id);
        self.questions.fetch_question().instrument(span).await
    }

    /// Append a chat message; blank text is ignored.
    pub fn send_chat(&self, text: &str) -> bool {
        self.chat.send(text)
    }

    // ---- read accessors ----

    pub fn submission_state(&self) -> SubmissionState {
        self.orchestrator.state()
    }

    pub fn feedback(&self) -> Option<Arc<FeedbackReport>> {
        self.orchestrator.report()
    }

    pub fn question(&self) -> Option<Question> {
        self.questions.current()
    }

    pub fn intake_error(&self) -> Option<String> {
        self.intake.error()
    }

    pub fn transcript(&self) -> Vec<ChatMessage> {
        self.chat.messages()
    }

    pub fn screen_mode(&self) -> ScreenMode {
        self.orchestrator.screen_mode()
    }

    // ---- subscriptions ----

    pub fn watch_submission(&self) -> watch::Receiver<SubmissionState> {
        self.orchestrator.subscribe()
    }

    pub fn watch_feedback(&self) -> watch::Receiver<Option<Arc<FeedbackReport>>> {
        self.orchestrator.subscribe_report()
    }

    pub fn watch_question(&self) -> watch::Receiver<Option<Question>> {
        self.questions.subscribe()
    }

    pub fn watch_intake_error(&self) -> watch::Receiver<Option<String>> {
        self.intake.subscribe()
    }

    pub fn watch_transcript(&self) -> watch::Receiver<ChatTranscript> {
        self.chat.subscribe()
    }

    pub fn watch_screen_mode(&self) -> watch::Receiver<ScreenMode> {
        self.orchestrator.subscribe_mode()
    }
}
