use bulletin_common::User;
use bulletin_common::http::api::ApiError;
use bulletin_common::ownership::ensure_owner;

use crate::domain::{AppState, Note, NoteRepository, NoteSlug};

mod dto;
pub mod notes;

/// The note behind the slug, provided the user wrote it; otherwise it does not exist for them
async fn own_note<S: AppState>(state: &S, slug: &str, user: &User) -> Result<Note, ApiError> {
    // a malformed slug can not name any note
    let Ok(slug) = NoteSlug::try_new(slug) else {
        return Err(ApiError::NotFound);
    };
    let note = state.notes().find_by_slug(&slug).await?;
    Ok(ensure_owner(note, user)?)
}
