use bulletin_common::forms::{FormErrors, Submission};
use serde::{Deserialize, Serialize};

pub const BAD_WORDS: [&str; 2] = ["редиска", "негодяй"];
pub const WARNING: &str = "Не ругайтесь!";

pub const TEXT_FIELD: &str = "text";

/// Case-sensitive substring match, a banned word inside another word counts too
pub fn contains_bad_words(text: &str) -> bool {
    BAD_WORDS.iter().any(|word| text.contains(word))
}

/// The comment form, used both for new comments and for edits
#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct CommentFields {
    #[serde(default)]
    pub text: String,
}

impl CommentFields {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Accepted text is trimmed and ready to be stored
    pub fn validate(&self) -> Submission<String> {
        let mut errors = FormErrors::new();
        if !errors.require(TEXT_FIELD, &self.text) && contains_bad_words(&self.text) {
            errors.add(TEXT_FIELD, WARNING);
        }
        Submission::from_errors(errors, || self.text.trim().to_string())
    }
}
