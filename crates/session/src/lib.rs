//! `rehearsal-session` library crate.
//!
//! The interview-session workflow controller: video intake, the
//! single-flight submission orchestrator, question fetching and the chat
//! transcript, composed into [`InterviewSession`]. The `rehearse` binary
//! in `main.rs` is a terminal front end over it.

pub mod chat;
pub mod config;
pub mod error;
pub mod intake;
pub mod orchestrator;
pub mod question;
pub mod session;
pub mod state;

pub use config::SessionConfig;
pub use error::{PreconditionError, StageError};
pub use session::InterviewSession;
pub use state::{FailureReason, ScreenMode, SubmissionState, WorkflowVariant};
