use axum::Form;
use axum::extract::rejection::FormRejection;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use bulletin_common::forms::{BoundForm, Submission};
use bulletin_common::http::api::{ApiError, ApiSuccess, Found};
use bulletin_common::http::auth::CurrentUser;
use bulletin_common::ownership::ensure_owner;
use bulletin_common::User;

use crate::domain::moderation::CommentFields;
use crate::domain::{AppState, Comment, CommentId, CommentRepository};
use crate::infrastructure::http::comments_location;
use crate::infrastructure::http::handlers::dto::{CommentDeletePage, CommentEditPage, CommentResponse};
use crate::infrastructure::http::handlers::{author_names, parse_id};

pub async fn edit_comment_page<S: AppState>(
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    State(state): State<S>,
) -> Result<ApiSuccess<CommentEditPage>, ApiError> {
    let comment = own_comment(&state, &id, &user).await?;
    let form = BoundForm::new(CommentFields::new(comment.text.as_str()));

    edit_page(&state, comment, form).await.map(ApiSuccess::ok)
}

pub async fn edit_comment<S: AppState>(
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    State(state): State<S>,
    form: Result<Form<CommentFields>, FormRejection>,
) -> Result<Response, ApiError> {
    let comment = own_comment(&state, &id, &user).await?;
    let Form(fields) = form?;

    match fields.validate() {
        Submission::Accepted(text) => {
            let updated = state.comments().update_text(comment.id, text).await?;
            tracing::info!("user {} edited {:?}", user.username, updated.id);
            Ok(Found(comments_location(updated.news_id)).into_response())
        }
        Submission::Rejected(errors) => {
            let form = BoundForm::with_errors(fields, errors);
            let page = edit_page(&state, comment, form).await?;
            Ok(ApiSuccess::ok(page).into_response())
        }
    }
}

pub async fn delete_comment_page<S: AppState>(
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    State(state): State<S>,
) -> Result<ApiSuccess<CommentDeletePage>, ApiError> {
    let comment = own_comment(&state, &id, &user).await?;
    let authors = author_names(state.users(), std::slice::from_ref(&comment)).await?;

    Ok(ApiSuccess::ok(CommentDeletePage {
        comment: CommentResponse::new(comment, &authors),
    }))
}

pub async fn delete_comment<S: AppState>(
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    State(state): State<S>,
) -> Result<Response, ApiError> {
    let comment = own_comment(&state, &id, &user).await?;
    state.comments().delete(comment.id).await?;
    tracing::info!("user {} deleted {:?}", user.username, comment.id);

    Ok(Found(comments_location(comment.news_id)).into_response())
}

/// The comment, provided the user wrote it; otherwise it does not exist for them
async fn own_comment<S: AppState>(state: &S, id: &str, user: &User) -> Result<Comment, ApiError> {
    let id = CommentId(parse_id(id)?);
    let comment = state.comments().find_by_id(id).await?;
    Ok(ensure_owner(comment, user)?)
}

async fn edit_page<S: AppState>(
    state: &S,
    comment: Comment,
    form: BoundForm<CommentFields>,
) -> Result<CommentEditPage, ApiError> {
    let authors = author_names(state.users(), std::slice::from_ref(&comment)).await?;

    Ok(CommentEditPage {
        comment: CommentResponse::new(comment, &authors),
        form,
    })
}
