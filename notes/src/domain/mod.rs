use std::future::Future;
use std::sync::LazyLock;

use bulletin_common::http::auth::AuthState;
use bulletin_common::ownership::Owned;
use bulletin_common::{RepositoryError, UserId};
use nutype::nutype;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub mod form;
pub mod slug;

pub const TITLE_MAX_LENGTH: usize = 100;
pub const SLUG_MAX_LENGTH: usize = 100;

/// Wrapper to prevent ID confusion
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NoteId(pub i64);

// Latin letters, digits, underscores and hyphens only.
const SLUG_REGEX: &str = r"^[-a-zA-Z0-9_]+$";

static SLUG_REGEX_COMPILED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(SLUG_REGEX).expect("SLUG_REGEX must be a valid regex"));

fn is_eligible_slug(slug: &str) -> bool {
    SLUG_REGEX_COMPILED.is_match(slug)
}

#[nutype(
    validate(not_empty, len_char_max = 100, predicate = is_eligible_slug),
    derive(
        Clone,
        Debug,
        Display,
        AsRef,
        PartialEq,
        Eq,
        Hash,
        Serialize,
        Deserialize
    )
)]
pub struct NoteSlug(String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub text: String,
    pub slug: NoteSlug,
    pub author: UserId,
}

impl Owned for Note {
    fn author(&self) -> UserId {
        self.author
    }
}

/// Validated content of a note, the slug is already assigned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub text: String,
    pub slug: NoteSlug,
}

pub trait NoteRepository: Clone + Send + Sync + 'static {
    /// notes of one author, by id
    fn list_by_author(
        &self,
        author: UserId,
    ) -> impl Future<Output = Result<Vec<Note>, RepositoryError>> + Send;

    fn find_by_slug(
        &self,
        slug: &NoteSlug,
    ) -> impl Future<Output = Result<Option<Note>, RepositoryError>> + Send;

    /// true when any note other than `exclude` uses the slug
    fn exists_by_slug(
        &self,
        slug: &NoteSlug,
        exclude: Option<NoteId>,
    ) -> impl Future<Output = Result<bool, RepositoryError>> + Send;

    /// fails with UniqueViolation when the slug is taken
    fn create(
        &self,
        author: UserId,
        draft: NoteDraft,
    ) -> impl Future<Output = Result<Note, RepositoryError>> + Send;

    fn update(
        &self,
        id: NoteId,
        draft: NoteDraft,
    ) -> impl Future<Output = Result<Note, RepositoryError>> + Send;

    fn delete(&self, id: NoteId) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}

/// The global application state shared between all request handlers.
pub trait AppState: AuthState {
    type N: NoteRepository;
    fn notes(&self) -> &Self::N;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_accepts_latin_digits_and_separators() {
        assert!(NoteSlug::try_new("note-slug_2").is_ok());
        assert!(NoteSlug::try_new("zagolovok").is_ok());
    }

    #[test]
    fn slug_rejects_everything_else() {
        assert!(NoteSlug::try_new("").is_err());
        assert!(NoteSlug::try_new("с кириллицей").is_err());
        assert!(NoteSlug::try_new("with space").is_err());
        assert!(NoteSlug::try_new("a".repeat(SLUG_MAX_LENGTH + 1)).is_err());
        assert!(NoteSlug::try_new("a".repeat(SLUG_MAX_LENGTH)).is_ok());
    }
}
