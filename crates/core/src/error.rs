/// Message shown inline whenever a selected file is not a video.
pub const INVALID_VIDEO_MESSAGE: &str = "Please upload a valid video file.";

#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    /// The candidate's mime type does not start with `video/`.
    #[error("Please upload a valid video file.")]
    NotAVideo { mime_type: String },

    /// The file could not be read from disk.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl IntakeError {
    /// Human-readable text for the inline error slot.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotAVideo { .. } => INVALID_VIDEO_MESSAGE.to_string(),
            Self::Io { .. } => self.to_string(),
        }
    }
}
