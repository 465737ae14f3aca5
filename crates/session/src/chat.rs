//! Chat transcript holder for the chat workflow.
//!
//! Purely local state: nothing here touches the network.

use rehearsal_core::{ChatMessage, ChatTranscript};
use tokio::sync::watch;

pub struct ChatSession {
    transcript: watch::Sender<ChatTranscript>,
}

impl ChatSession {
    pub fn new() -> Self {
        let (transcript, _) = watch::channel(ChatTranscript::new());
        Self { transcript }
    }

    /// Append a user message. Blank input is dropped and `false` returned.
    pub fn send(&self, text: &str) -> bool {
        let appended = self
            .transcript
            .send_if_modified(|transcript| transcript.push_user(text));
        if appended {
            tracing::debug!(len = text.len(), "Chat message appended");
        }
        appended
    }

    /// Append a system message.
    pub fn announce(&self, text: &str) {
        self.transcript
            .send_modify(|transcript| transcript.push_system(text));
    }

    pub fn reset(&self) {
        self.transcript.send_modify(ChatTranscript::clear);
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.transcript.borrow().messages().to_vec()
    }

    pub fn len(&self) -> usize {
        self.transcript.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.transcript.borrow().is_empty()
    }

    pub fn subscribe(&self) -> watch::Receiver<ChatTranscript> {
        self.transcript.subscribe()
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}
