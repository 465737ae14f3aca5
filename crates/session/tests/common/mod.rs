//! Scripted stand-in for the analysis service.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rehearsal_analysis::{AnalysisApiError, AnalysisService, UploadAck};
use rehearsal_core::{validate_candidate, FeedbackReport, FileCandidate, Question, VideoAsset};
use tokio::sync::Notify;

/// Records every call and answers from per-endpoint scripts.
///
/// Unscripted calls succeed with a default payload.
#[derive(Default)]
pub struct FakeService {
    pub question_calls: AtomicUsize,
    pub upload_calls: AtomicUsize,
    pub feedback_calls: AtomicUsize,
    /// Call names in the order they were made.
    pub calls: Mutex<Vec<&'static str>>,
    /// Names of uploaded files, in order.
    pub uploaded: Mutex<Vec<String>>,
    questions: Mutex<VecDeque<Result<Question, AnalysisApiError>>>,
    uploads: Mutex<VecDeque<Result<UploadAck, AnalysisApiError>>>,
    feedback: Mutex<VecDeque<Result<FeedbackReport, AnalysisApiError>>>,
    /// When set, uploads wait for a permit from this gate.
    upload_gate: Mutex<Option<Arc<Notify>>>,
    /// When set, uploads never complete.
    hang_uploads: AtomicBool,
}

impl FakeService {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_question(&self, result: Result<Question, AnalysisApiError>) {
        self.questions.lock().unwrap().push_back(result);
    }

    pub fn push_upload(&self, result: Result<UploadAck, AnalysisApiError>) {
        self.uploads.lock().unwrap().push_back(result);
    }

    pub fn push_feedback(&self, result: Result<FeedbackReport, AnalysisApiError>) {
        self.feedback.lock().unwrap().push_back(result);
    }

    /// Hold every upload until the returned gate is notified.
    pub fn gate_uploads(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.upload_gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    pub fn hang_uploads(&self) {
        self.hang_uploads.store(true, Ordering::SeqCst);
    }

    pub fn uploads(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }

    pub fn feedbacks(&self) -> usize {
        self.feedback_calls.load(Ordering::SeqCst)
    }

    pub fn questions(&self) -> usize {
        self.question_calls.load(Ordering::SeqCst)
    }

    pub fn call_log(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, name: &'static str) {
        self.calls.lock().unwrap().push(name);
    }
}

#[async_trait]
impl AnalysisService for FakeService {
    async fn get_question(&self) -> Result<Question, AnalysisApiError> {
        self.question_calls.fetch_add(1, Ordering::SeqCst);
        self.record("question");
        let scripted = self.questions.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| Ok(Question::new("Tell me about yourself.")))
    }

    async fn upload_video(&self, asset: &VideoAsset) -> Result<UploadAck, AnalysisApiError> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        self.record("upload");
        self.uploaded
            .lock()
            .unwrap()
            .push(asset.display_name().to_string());

        if self.hang_uploads.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        let gate = self.upload_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let scripted = self.uploads.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| {
            Ok(UploadAck {
                message: Some("Video uploaded successfully".into()),
                path: Some(format!("uploads/{}", asset.display_name())),
            })
        })
    }

    async fn get_feedback(&self) -> Result<FeedbackReport, AnalysisApiError> {
        self.feedback_calls.fetch_add(1, Ordering::SeqCst);
        self.record("feedback");
        let scripted = self.feedback.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| Ok(report("Good", &["Smiled often"])))
    }
}

pub fn server_error(status: u16) -> AnalysisApiError {
    AnalysisApiError::ApiError {
        status,
        body: "internal error".into(),
    }
}

pub fn report(overall: &str, facial: &[&str]) -> FeedbackReport {
    FeedbackReport {
        overall_performance: Some(overall.into()),
        filler_feedback: Some("Few filler words".into()),
        relevance_feedback: Some("Relevant".into()),
        tonality_feedback: Some("Confident".into()),
        facial_expression: facial.iter().map(|s| s.to_string()).collect(),
        next_steps: Some("Keep practicing".into()),
    }
}

pub fn video(name: &str) -> FileCandidate {
    FileCandidate::new(b"video bytes".to_vec(), "video/mp4", name)
}

pub fn pdf(name: &str) -> FileCandidate {
    FileCandidate::new(b"%PDF".to_vec(), "application/pdf", name)
}

pub fn asset(name: &str) -> VideoAsset {
    validate_candidate(video(name)).unwrap()
}
