//! Practice prompt returned by the analysis service.

use serde::{Deserialize, Serialize};

/// A single practice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Wire name is `question`.
    #[serde(rename = "question")]
    pub text: String,
}

impl Question {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_question_payload() {
        let q: Question =
            serde_json::from_value(serde_json::json!({ "question": "What frustrates you?" }))
                .unwrap();
        assert_eq!(q.text, "What frustrates you?");
    }

    #[test]
    fn missing_question_field_is_an_error() {
        let err = serde_json::from_value::<Question>(serde_json::json!({ "prompt": "x" }));
        assert!(err.is_err());
    }

    #[test]
    fn multiline_question_text_is_kept_verbatim() {
        let text = "How do you tackle challenges?\n\n\n- Google 2018";
        let q: Question = serde_json::from_value(serde_json::json!({ "question": text })).unwrap();
        assert_eq!(q.text, text);
    }
}
