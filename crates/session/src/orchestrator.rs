//! Submission orchestration: upload, then feedback, one cycle at a time.
//!
//! [`SubmissionOrchestrator`] owns the session's [`SubmissionState`] and is
//! the only writer of it. A cycle is claimed atomically inside
//! [`submit`](SubmissionOrchestrator::submit) before any request is sent, so
//! a second caller is turned away no matter which control triggered it.
//!
//! Every cycle runs under its own [`CancellationToken`] and the configured
//! timeout. Dropping an in-flight `submit()` future also ends the cycle, as
//! `Failed(Cancelled)`, so the state can never be left in `Submitting`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rehearsal_analysis::{AnalysisService, UploadAck};
use rehearsal_core::chat::SUBMITTED_MESSAGE;
use rehearsal_core::{FeedbackReport, VideoAsset};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::chat::ChatSession;
use crate::error::PreconditionError;
use crate::state::{FailureReason, ScreenMode, SubmissionState, WorkflowVariant};

/// Proof that the upload step of a cycle succeeded.
///
/// Only [`SubmissionOrchestrator::upload_step`] can produce one, and the
/// feedback step requires one.
#[derive(Debug)]
pub struct Uploaded {
    ack: UploadAck,
}

impl Uploaded {
    pub fn ack(&self) -> &UploadAck {
        &self.ack
    }
}

/// What a successful cycle produced.
#[derive(Debug)]
enum CycleOutcome {
    Report(FeedbackReport),
    ChatUnlocked,
}

pub struct SubmissionOrchestrator {
    service: Arc<dyn AnalysisService>,
    variant: WorkflowVariant,
    timeout: Duration,
    chat: Arc<ChatSession>,
    state: watch::Sender<SubmissionState>,
    report: watch::Sender<Option<Arc<FeedbackReport>>>,
    mode: watch::Sender<ScreenMode>,
    next_cycle: AtomicU64,
}

impl SubmissionOrchestrator {
    pub fn new(
        service: Arc<dyn AnalysisService>,
        variant: WorkflowVariant,
        timeout: Duration,
        chat: Arc<ChatSession>,
    ) -> Self {
        let (state, _) = watch::channel(SubmissionState::Idle);
        let (report, _) = watch::channel(None);
        let (mode, _) = watch::channel(ScreenMode::Upload);
        Self {
            service,
            variant,
            timeout,
            chat,
            state,
            report,
            mode,
            next_cycle: AtomicU64::new(1),
        }
    }

    // ---- read accessors ----

    pub fn state(&self) -> SubmissionState {
        self.state.borrow().clone()
    }

    pub fn is_submitting(&self) -> bool {
        self.state.borrow().is_submitting()
    }

    /// The most recent successful report, if any.
    pub fn report(&self) -> Option<Arc<FeedbackReport>> {
        self.report.borrow().clone()
    }

    pub fn screen_mode(&self) -> ScreenMode {
        *self.mode.borrow()
    }

    pub fn variant(&self) -> WorkflowVariant {
        self.variant
    }

    pub fn subscribe(&self) -> watch::Receiver<SubmissionState> {
        self.state.subscribe()
    }

    pub fn subscribe_report(&self) -> watch::Receiver<Option<Arc<FeedbackReport>>> {
        self.report.subscribe()
    }

    pub fn subscribe_mode(&self) -> watch::Receiver<ScreenMode> {
        self.mode.subscribe()
    }

    // ---- transitions ----

    /// Stage a validated asset, replacing any previous one.
    pub fn stage(&self, asset: Arc<VideoAsset>) -> Result<(), PreconditionError> {
        let mut result = Ok(());
        self.state.send_if_modified(|state| {
            if state.is_submitting() {
                result = Err(PreconditionError::SubmissionInFlight);
                return false;
            }
            *state = SubmissionState::Staged(asset);
            true
        });
        if result.is_ok() {
            tracing::debug!("Submission state -> staged");
        }
        result
    }

    /// Drop the staged asset after a rejected selection.
    ///
    /// Results of a finished cycle are left alone.
    pub fn discard_staged(&self) -> Result<(), PreconditionError> {
        let mut result = Ok(());
        self.state.send_if_modified(|state| match state {
            SubmissionState::Staged(_) => {
                *state = SubmissionState::Idle;
                true
            }
            SubmissionState::Submitting { .. } => {
                result = Err(PreconditionError::SubmissionInFlight);
                false
            }
            _ => false,
        });
        result
    }

    /// Run one submission cycle for the staged asset.
    ///
    /// Rejected with [`PreconditionError`] when nothing is staged or a
    /// cycle is already running; no request is sent in either case.
    /// Network failures, timeouts and cancellation are not errors here:
    /// they end the cycle in [`SubmissionState::Failed`], which is returned.
    pub async fn submit(&self) -> Result<SubmissionState, PreconditionError> {
        let (asset, cycle, cancel) = self.claim()?;
        let mut guard = CycleGuard {
            orchestrator: self,
            asset: Arc::clone(&asset),
            cycle,
            armed: true,
        };

        tracing::info!(
            cycle,
            display_name = %asset.display_name(),
            timeout_secs = self.timeout.as_secs(),
            "Submission started",
        );

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(FailureReason::Cancelled),
            result = tokio::time::timeout(self.timeout, self.run_cycle(cycle, &asset)) => {
                match result {
                    Ok(outcome) => outcome,
                    Err(_elapsed) => Err(FailureReason::Timeout),
                }
            }
        };

        guard.armed = false;
        Ok(self.finish(cycle, &asset, outcome))
    }

    /// Cancel the in-flight cycle. Returns `false` if none is running.
    pub fn cancel(&self) -> bool {
        match &*self.state.borrow() {
            SubmissionState::Submitting { cancel, cycle, .. } => {
                tracing::info!(cycle, "Cancelling submission");
                cancel.cancel();
                true
            }
            _ => false,
        }
    }

    /// Restage the asset of a failed cycle.
    pub fn retry(&self) -> Result<(), PreconditionError> {
        let mut result = Ok(());
        self.state.send_if_modified(|state| match state {
            SubmissionState::Failed { asset, .. } => {
                *state = SubmissionState::Staged(Arc::clone(asset));
                true
            }
            SubmissionState::Submitting { .. } => {
                result = Err(PreconditionError::SubmissionInFlight);
                false
            }
            _ => {
                result = Err(PreconditionError::NothingToRetry);
                false
            }
        });
        if result.is_ok() {
            tracing::info!("Failed submission restaged for retry");
        }
        result
    }

    /// Return to `Idle`, dropping any staged or retained asset.
    ///
    /// In the chat workflow this is the "go back" action: the transcript is
    /// cleared and the upload screen shown again. The last report is kept.
    pub fn reset(&self) -> Result<(), PreconditionError> {
        let mut result = Ok(());
        self.state.send_if_modified(|state| match state {
            SubmissionState::Submitting { .. } => {
                result = Err(PreconditionError::SubmissionInFlight);
                false
            }
            SubmissionState::Idle => false,
            _ => {
                *state = SubmissionState::Idle;
                true
            }
        });
        result?;

        if self.variant == WorkflowVariant::Chat {
            self.chat.reset();
            self.mode.send_if_modified(|mode| {
                let changed = *mode != ScreenMode::Upload;
                *mode = ScreenMode::Upload;
                changed
            });
        }
        tracing::info!("Session reset");
        Ok(())
    }

    // ---- cycle steps ----

    /// Atomically move `Staged` to `Submitting`.
    fn claim(&self) -> Result<(Arc<VideoAsset>, u64, CancellationToken), PreconditionError> {
        let mut claimed = Err(PreconditionError::NothingStaged);
        self.state.send_if_modified(|state| match state {
            SubmissionState::Staged(asset) => {
                let asset = Arc::clone(asset);
                let cycle = self.next_cycle.fetch_add(1, Ordering::Relaxed);
                let cancel = CancellationToken::new();
                *state = SubmissionState::Submitting {
                    asset: Arc::clone(&asset),
                    cycle,
                    cancel: cancel.clone(),
                };
                claimed = Ok((asset, cycle, cancel));
                true
            }
            SubmissionState::Submitting { cycle, .. } => {
                tracing::debug!(cycle = *cycle, "Submit rejected, cycle already in flight");
                claimed = Err(PreconditionError::SubmissionInFlight);
                false
            }
            _ => false,
        });
        claimed
    }

    async fn run_cycle(&self, cycle: u64, asset: &VideoAsset) -> Result<CycleOutcome, FailureReason> {
        let uploaded = self.upload_step(cycle, asset).await?;
        match self.variant {
            WorkflowVariant::Feedback => {
                let report = self.feedback_step(cycle, uploaded).await?;
                Ok(CycleOutcome::Report(report))
            }
            WorkflowVariant::Chat => {
                tracing::debug!(cycle, ack = ?uploaded.ack(), "Upload acknowledged, unlocking chat");
                Ok(CycleOutcome::ChatUnlocked)
            }
        }
    }

    /// Step 1: send the video.
    async fn upload_step(&self, cycle: u64, asset: &VideoAsset) -> Result<Uploaded, FailureReason> {
        match self.service.upload_video(asset).await {
            Ok(ack) => {
                tracing::info!(cycle, message = ?ack.message, path = ?ack.path, "Upload succeeded");
                Ok(Uploaded { ack })
            }
            Err(e) => {
                tracing::error!(cycle, error = %e, "Upload failed");
                Err(FailureReason::Upload(e.to_string()))
            }
        }
    }

    /// Step 2: fetch the report for the upload just acknowledged.
    ///
    /// The service call carries no upload identifier, so the ack is logged
    /// alongside the fetch to keep the pairing visible.
    async fn feedback_step(
        &self,
        cycle: u64,
        uploaded: Uploaded,
    ) -> Result<FeedbackReport, FailureReason> {
        tracing::debug!(cycle, upload_path = ?uploaded.ack.path, "Fetching feedback");
        match self.service.get_feedback().await {
            Ok(report) => {
                tracing::info!(
                    cycle,
                    has_overall = report.has_overall(),
                    facial_lines = report.facial_expression.len(),
                    "Feedback received",
                );
                Ok(report)
            }
            Err(e) => {
                tracing::error!(cycle, error = %e, "Feedback fetch failed");
                Err(FailureReason::Feedback(e.to_string()))
            }
        }
    }

    /// Record the end of a cycle and return the resulting state.
    fn finish(
        &self,
        cycle: u64,
        asset: &Arc<VideoAsset>,
        outcome: Result<CycleOutcome, FailureReason>,
    ) -> SubmissionState {
        let next = match outcome {
            Ok(CycleOutcome::Report(report)) => {
                self.report.send_replace(Some(Arc::new(report)));
                SubmissionState::Succeeded
            }
            Ok(CycleOutcome::ChatUnlocked) => {
                self.chat.announce(SUBMITTED_MESSAGE);
                self.mode.send_replace(ScreenMode::Chat);
                SubmissionState::Succeeded
            }
            Err(reason) => {
                tracing::warn!(cycle, %reason, "Submission failed");
                SubmissionState::Failed {
                    reason,
                    asset: Arc::clone(asset),
                }
            }
        };

        let label = next.label();
        let applied = self.state.send_if_modified(|state| match state {
            SubmissionState::Submitting { cycle: current, .. } if *current == cycle => {
                *state = next;
                true
            }
            _ => false,
        });
        if applied {
            tracing::info!(cycle, state = label, "Submission finished");
        } else {
            tracing::warn!(cycle, "Cycle result arrived after the state moved on");
        }
        self.state()
    }
}

/// Ends a cycle as cancelled if its `submit()` future is dropped mid-flight.
struct CycleGuard<'a> {
    orchestrator: &'a SubmissionOrchestrator,
    asset: Arc<VideoAsset>,
    cycle: u64,
    armed: bool,
}

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            tracing::warn!(cycle = self.cycle, "Submission dropped while in flight");
            self.orchestrator
                .finish(self.cycle, &self.asset, Err(FailureReason::Cancelled));
        }
    }
}
