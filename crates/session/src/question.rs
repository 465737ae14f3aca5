//! Practice question fetching.

use std::sync::Arc;

use rehearsal_analysis::{AnalysisApiError, AnalysisService};
use rehearsal_core::Question;
use tokio::sync::watch;

/// Fetches practice prompts and holds the one on display.
///
/// A failed fetch leaves the previous question in place.
pub struct QuestionProvider {
    service: Arc<dyn AnalysisService>,
    current: watch::Sender<Option<Question>>,
}

impl QuestionProvider {
    pub fn new(service: Arc<dyn AnalysisService>) -> Self {
        let (current, _) = watch::channel(None);
        Self { service, current }
    }

    /// Fetch a question and make it the displayed one.
    pub async fn fetch_question(&self) -> Result<Question, AnalysisApiError> {
        match self.service.get_question().await {
            Ok(question) => {
                tracing::info!(question = %question.text, "Fetched practice question");
                self.current.send_replace(Some(question.clone()));
                Ok(question)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Question fetch failed, keeping previous question");
                Err(e)
            }
        }
    }

    pub fn current(&self) -> Option<Question> {
        self.current.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Question>> {
        self.current.subscribe()
    }
}
