//! Content-type guessing for files picked from the local filesystem.
//!
//! Browsers hand over a mime type with every selected file; a path on disk
//! does not carry one, so it is derived from the extension here.

/// Fallback content type for unknown extensions.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Video file extensions the guesser maps to a `video/*` type.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "m4v", "webm", "mov", "mkv", "avi"];

/// Guess a Content-Type from a file name or path.
pub fn content_type_for_extension(path: &str) -> &'static str {
    let ext = match path.rsplit_once('.') {
        Some((_, ext)) => ext.to_lowercase(),
        None => return OCTET_STREAM,
    };
    match ext.as_str() {
        "mp4" | "m4v" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "mkv" => "video/x-matroska",
        "avi" => "video/x-msvideo",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "pdf" => "application/pdf",
        _ => OCTET_STREAM,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_video_extensions_map_to_video_types() {
        for ext in VIDEO_EXTENSIONS {
            let guessed = content_type_for_extension(&format!("answer.{ext}"));
            assert!(guessed.starts_with("video/"), "{ext} guessed as {guessed}");
        }
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        assert_eq!(content_type_for_extension("ANSWER.MOV"), "video/quicktime");
    }

    #[test]
    fn directories_with_dots_do_not_confuse_the_guess() {
        assert_eq!(
            content_type_for_extension("/home/me/v1.2/answer.webm"),
            "video/webm"
        );
    }

    #[test]
    fn missing_or_unknown_extension_falls_back() {
        assert_eq!(content_type_for_extension("answer"), OCTET_STREAM);
        assert_eq!(content_type_for_extension("answer.xyz"), OCTET_STREAM);
    }

    #[test]
    fn documents_are_not_videos() {
        assert_eq!(content_type_for_extension("resume.pdf"), "application/pdf");
    }
}
