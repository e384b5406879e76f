use axum::Form;
use axum::extract::rejection::FormRejection;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use bulletin_common::forms::{BoundForm, Submission};
use bulletin_common::http::api::{ApiError, ApiSuccess, Found};
use bulletin_common::http::auth::CurrentUser;
use bulletin_common::{Caller, User};

use crate::domain::form::{NoteFields, store_note};
use crate::domain::{AppState, NoteId, NoteRepository};
use crate::infrastructure::http::SUCCESS_PATH;
use crate::infrastructure::http::handlers::dto::{
    HomePage, NoteDetailPage, NoteFormPage, NoteListPage, NoteResponse, SuccessPage,
};
use crate::infrastructure::http::handlers::own_note;

pub async fn home(caller: Caller) -> ApiSuccess<HomePage> {
    ApiSuccess::ok(HomePage {
        title: "Заметки",
        user: caller.user().map(|user| user.username.to_string()),
    })
}

pub async fn notes_list<S: AppState>(
    CurrentUser(user): CurrentUser,
    State(state): State<S>,
) -> Result<ApiSuccess<NoteListPage>, ApiError> {
    let object_list = state
        .notes()
        .list_by_author(user.id)
        .await?
        .into_iter()
        .map(NoteResponse::from)
        .collect();

    Ok(ApiSuccess::ok(NoteListPage { object_list }))
}

pub async fn add_note_page(CurrentUser(_): CurrentUser) -> ApiSuccess<NoteFormPage> {
    ApiSuccess::ok(NoteFormPage {
        form: BoundForm::new(NoteFields::default()),
    })
}

pub async fn add_note<S: AppState>(
    CurrentUser(user): CurrentUser,
    State(state): State<S>,
    Form(fields): Form<NoteFields>,
) -> Result<Response, ApiError> {
    save(&state, &user, None, fields).await
}

pub async fn note_detail<S: AppState>(
    CurrentUser(user): CurrentUser,
    Path(slug): Path<String>,
    State(state): State<S>,
) -> Result<ApiSuccess<NoteDetailPage>, ApiError> {
    let note = own_note(&state, &slug, &user).await?;

    Ok(ApiSuccess::ok(NoteDetailPage {
        note: NoteResponse::from(note),
    }))
}

pub async fn edit_note_page<S: AppState>(
    CurrentUser(user): CurrentUser,
    Path(slug): Path<String>,
    State(state): State<S>,
) -> Result<ApiSuccess<NoteFormPage>, ApiError> {
    let note = own_note(&state, &slug, &user).await?;

    Ok(ApiSuccess::ok(NoteFormPage {
        form: BoundForm::new(NoteFields::from(&note)),
    }))
}

pub async fn edit_note<S: AppState>(
    CurrentUser(user): CurrentUser,
    Path(slug): Path<String>,
    State(state): State<S>,
    form: Result<Form<NoteFields>, FormRejection>,
) -> Result<Response, ApiError> {
    let note = own_note(&state, &slug, &user).await?;
    let Form(fields) = form?;
    save(&state, &user, Some(note.id), fields).await
}

pub async fn delete_note_page<S: AppState>(
    CurrentUser(user): CurrentUser,
    Path(slug): Path<String>,
    State(state): State<S>,
) -> Result<ApiSuccess<NoteDetailPage>, ApiError> {
    let note = own_note(&state, &slug, &user).await?;

    Ok(ApiSuccess::ok(NoteDetailPage {
        note: NoteResponse::from(note),
    }))
}

pub async fn delete_note<S: AppState>(
    CurrentUser(user): CurrentUser,
    Path(slug): Path<String>,
    State(state): State<S>,
) -> Result<Response, ApiError> {
    let note = own_note(&state, &slug, &user).await?;
    state.notes().delete(note.id).await?;
    tracing::info!("user {} deleted note {}", user.username, note.slug);

    Ok(Found::to(SUCCESS_PATH).into_response())
}

pub async fn success(CurrentUser(_): CurrentUser) -> ApiSuccess<SuccessPage> {
    ApiSuccess::ok(SuccessPage {
        message: "Успешно!",
    })
}

/// Validates and stores the note, re-rendering the form with errors when anything is off
async fn save<S: AppState>(
    state: &S,
    user: &User,
    existing: Option<NoteId>,
    fields: NoteFields,
) -> Result<Response, ApiError> {
    let errors = match fields.validate() {
        Submission::Accepted(draft) => {
            match store_note(state.notes(), user.id, existing, draft).await? {
                Submission::Accepted(note) => {
                    tracing::info!("user {} saved note {}", user.username, note.slug);
                    return Ok(Found::to(SUCCESS_PATH).into_response());
                }
                Submission::Rejected(errors) => errors,
            }
        }
        Submission::Rejected(errors) => errors,
    };

    tracing::debug!("note of {} rejected: {:?}", user.username, errors);
    Ok(ApiSuccess::ok(NoteFormPage {
        form: BoundForm::with_errors(fields, errors),
    })
    .into_response())
}
