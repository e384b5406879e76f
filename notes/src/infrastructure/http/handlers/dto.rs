use bulletin_common::forms::BoundForm;
use serde::Serialize;

use crate::domain::Note;
use crate::domain::form::NoteFields;

#[derive(Debug, Clone, Serialize)]
pub struct HomePage {
    pub title: &'static str,
    /// username of the caller, absent for anonymous visitors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NoteListPage {
    pub object_list: Vec<NoteResponse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NoteFormPage {
    pub form: BoundForm<NoteFields>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NoteDetailPage {
    pub note: NoteResponse,
}

#[derive(Debug, Clone, Serialize)]
pub struct SuccessPage {
    pub message: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct NoteResponse {
    id: i64,
    title: String,
    text: String,
    slug: String,
}

impl From<Note> for NoteResponse {
    fn from(value: Note) -> Self {
        Self {
            id: value.id.0,
            title: value.title,
            text: value.text,
            slug: value.slug.into_inner(),
        }
    }
}
