//! Data model and local rules for interview rehearsal sessions.
//!
//! Everything here is synchronous and free of network I/O:
//!
//! - [`intake`]: file candidates and the video validation rule.
//! - [`feedback`]: the structured report and its display sections.
//! - [`question`]: practice prompts.
//! - [`chat`]: chat messages and the append-only transcript.

pub mod chat;
pub mod error;
pub mod feedback;
pub mod intake;
pub mod media;
pub mod question;
pub mod types;

pub use chat::{ChatMessage, ChatTranscript, Origin};
pub use error::IntakeError;
pub use feedback::FeedbackReport;
pub use intake::{validate_candidate, FileCandidate, IntakeSource, VideoAsset};
pub use question::Question;
