//! Video intake: the single validation path every selected file goes through.
//!
//! A [`FileCandidate`] is whatever the user picked, from any source. The
//! only way to obtain a [`VideoAsset`] is [`validate_candidate`], so an asset
//! with a non-video mime type cannot exist.

use std::fmt;
use std::path::Path;

use serde::Serialize;

use crate::error::IntakeError;
use crate::media::content_type_for_extension;

/// Prefix every accepted mime type must start with.
pub const VIDEO_MIME_PREFIX: &str = "video/";

/// Where a candidate file came from. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IntakeSource {
    DragDrop,
    Picker,
}

impl fmt::Display for IntakeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DragDrop => f.write_str("drag_drop"),
            Self::Picker => f.write_str("picker"),
        }
    }
}

/// An unvalidated file-like input.
#[derive(Clone)]
pub struct FileCandidate {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub display_name: String,
}

impl FileCandidate {
    pub fn new(
        bytes: Vec<u8>,
        mime_type: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
            display_name: display_name.into(),
        }
    }

    /// Read a file from disk, guessing its mime type from the extension.
    ///
    /// The display name is the final path component.
    pub fn from_path(path: &Path) -> Result<Self, IntakeError> {
        let bytes = std::fs::read(path).map_err(|source| IntakeError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let display_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let mime_type = content_type_for_extension(&display_name);
        Ok(Self::new(bytes, mime_type, display_name))
    }
}

impl fmt::Debug for FileCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileCandidate")
            .field("display_name", &self.display_name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// A validated video held locally, awaiting submission.
#[derive(Clone, PartialEq, Eq)]
pub struct VideoAsset {
    bytes: Vec<u8>,
    mime_type: String,
    display_name: String,
}

impl VideoAsset {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for VideoAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VideoAsset")
            .field("display_name", &self.display_name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Accept a candidate iff its mime type begins with `video/`.
pub fn validate_candidate(candidate: FileCandidate) -> Result<VideoAsset, IntakeError> {
    if !candidate.mime_type.starts_with(VIDEO_MIME_PREFIX) {
        return Err(IntakeError::NotAVideo {
            mime_type: candidate.mime_type,
        });
    }
    Ok(VideoAsset {
        bytes: candidate.bytes,
        mime_type: candidate.mime_type,
        display_name: candidate.display_name,
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::error::INVALID_VIDEO_MESSAGE;

    fn candidate(mime: &str) -> FileCandidate {
        FileCandidate::new(vec![0, 1, 2], mime, "answer")
    }

    #[test]
    fn accepts_any_video_subtype() {
        for mime in ["video/mp4", "video/webm", "video/quicktime", "video/"] {
            let asset = validate_candidate(candidate(mime)).expect("video should be accepted");
            assert_eq!(asset.mime_type(), mime);
            assert_eq!(asset.bytes(), &[0, 1, 2]);
            assert_eq!(asset.display_name(), "answer");
        }
    }

    #[test]
    fn rejects_non_video_types() {
        for mime in ["application/pdf", "audio/mpeg", "image/png", "", "VIDEO/mp4", " video/mp4"] {
            let err = validate_candidate(candidate(mime)).unwrap_err();
            assert!(
                matches!(&err, IntakeError::NotAVideo { mime_type } if mime_type == mime),
                "{mime} should be rejected"
            );
            assert_eq!(err.user_message(), INVALID_VIDEO_MESSAGE);
        }
    }

    #[test]
    fn from_path_guesses_mime_and_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("my answer.mp4");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"not really a video").unwrap();

        let candidate = FileCandidate::from_path(&path).unwrap();
        assert_eq!(candidate.display_name, "my answer.mp4");
        assert_eq!(candidate.mime_type, "video/mp4");
        assert_eq!(candidate.bytes, b"not really a video");
    }

    #[test]
    fn from_path_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileCandidate::from_path(&dir.path().join("gone.mp4")).unwrap_err();
        assert!(matches!(err, IntakeError::Io { .. }));
        assert!(err.user_message().contains("gone.mp4"));
    }

    #[test]
    fn debug_output_omits_bytes() {
        let asset = validate_candidate(FileCandidate::new(vec![7; 4096], "video/mp4", "a.mp4"))
            .unwrap();
        let rendered = format!("{asset:?}");
        assert!(rendered.contains("len: 4096"));
        assert!(!rendered.contains("7, 7"));
    }
}
