use rehearsal_core::IntakeError;

/// An operation was attempted in a state that does not allow it.
///
/// These are rejections, not failures: nothing changed and nothing was sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PreconditionError {
    #[error("no video is staged")]
    NothingStaged,

    #[error("a submission is already in flight")]
    SubmissionInFlight,

    #[error("there is no failed submission to retry")]
    NothingToRetry,
}

/// Errors from staging a selected file.
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    #[error(transparent)]
    Invalid(#[from] IntakeError),

    #[error(transparent)]
    Precondition(#[from] PreconditionError),
}
