use bulletin_common::forms::{FormErrors, Submission};
use bulletin_common::{RepositoryError, UserId};
use serde::{Deserialize, Serialize};

use crate::domain::slug::slug_from_title;
use crate::domain::{Note, NoteDraft, NoteId, NoteRepository, NoteSlug, SLUG_MAX_LENGTH, TITLE_MAX_LENGTH};

pub const WARNING: &str = " - такой slug уже существует, придумайте уникальное значение!";
pub const INVALID_SLUG: &str =
    "Значение должно состоять только из латинских букв, цифр, знаков подчеркивания или дефиса.";

pub const TITLE_FIELD: &str = "title";
pub const TEXT_FIELD: &str = "text";
pub const SLUG_FIELD: &str = "slug";

/// The note form, shared by the add and edit pages. An empty slug is derived from the title.
#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct NoteFields {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub slug: String,
}

impl NoteFields {
    pub fn new(title: impl Into<String>, text: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            slug: slug.into(),
        }
    }

    /// Field checks that need no storage, slug uniqueness is left to [`store_note`]
    pub fn validate(&self) -> Submission<NoteDraft> {
        let mut errors = FormErrors::new();
        let title_missing = errors.require(TITLE_FIELD, &self.title);
        errors.limit_length(TITLE_FIELD, &self.title, TITLE_MAX_LENGTH);
        errors.require(TEXT_FIELD, &self.text);

        let slug = self.slug.trim();
        let slug = if slug.is_empty() {
            slug_from_title(self.title.trim())
        } else {
            slug.to_string()
        };

        match NoteSlug::try_new(slug.as_str()) {
            Ok(slug) if errors.is_empty() => Submission::Accepted(NoteDraft {
                title: self.title.trim().to_string(),
                text: self.text.clone(),
                slug,
            }),
            Ok(_) => Submission::Rejected(errors),
            Err(_) => {
                // a missing title already explains why no slug could be derived
                if !title_missing {
                    slug_errors(&mut errors, &slug);
                }
                Submission::Rejected(errors)
            }
        }
    }
}

impl From<&Note> for NoteFields {
    fn from(note: &Note) -> Self {
        Self::new(note.title.as_str(), note.text.as_str(), note.slug.to_string())
    }
}

fn slug_errors(errors: &mut FormErrors, slug: &str) {
    if slug.chars().count() > SLUG_MAX_LENGTH {
        errors.limit_length(SLUG_FIELD, slug, SLUG_MAX_LENGTH);
    } else if slug.is_empty() {
        errors.require(SLUG_FIELD, slug);
    } else {
        errors.add(SLUG_FIELD, INVALID_SLUG);
    }
}

/// The error shown when another note already uses the slug
pub fn slug_taken(slug: &NoteSlug) -> FormErrors {
    let mut errors = FormErrors::new();
    errors.add(SLUG_FIELD, format!("{}{}", slug, WARNING));
    errors
}

/// Creates the note (`existing` is None) or rewrites it, unless another note owns the slug.
///
/// The slug is checked first and the unique constraint of the store catches
/// a concurrent writer; both end up as the same form error.
pub async fn store_note<R: NoteRepository>(
    notes: &R,
    author: UserId,
    existing: Option<NoteId>,
    draft: NoteDraft,
) -> Result<Submission<Note>, RepositoryError> {
    if notes.exists_by_slug(&draft.slug, existing).await? {
        return Ok(Submission::Rejected(slug_taken(&draft.slug)));
    }

    let slug = draft.slug.clone();
    let stored = match existing {
        Some(id) => notes.update(id, draft).await,
        None => notes.create(author, draft).await,
    };

    match stored {
        Ok(note) => Ok(Submission::Accepted(note)),
        Err(RepositoryError::UniqueViolation(_)) => Ok(Submission::Rejected(slug_taken(&slug))),
        Err(error) => Err(error),
    }
}
