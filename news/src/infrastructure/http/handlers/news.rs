use axum::Form;
use axum::extract::rejection::FormRejection;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use bulletin_common::Caller;
use bulletin_common::forms::{BoundForm, Submission};
use bulletin_common::http::api::{ApiError, ApiSuccess, Found};
use bulletin_common::http::auth::CurrentUser;

use crate::domain::moderation::CommentFields;
use crate::domain::{AppState, CommentRepository, News, NewsId, NewsRepository};
use crate::infrastructure::http::comments_location;
use crate::infrastructure::http::handlers::dto::{
    CommentResponse, DetailPage, HomePage, NewsResponse,
};
use crate::infrastructure::http::handlers::{author_names, parse_id};

pub async fn home<S: AppState>(State(state): State<S>) -> Result<ApiSuccess<HomePage>, ApiError> {
    let object_list = state
        .news()
        .latest(state.news_count_on_home_page())
        .await?
        .into_iter()
        .map(NewsResponse::from)
        .collect();

    Ok(ApiSuccess::ok(HomePage { object_list }))
}

pub async fn news_detail<S: AppState>(
    caller: Caller,
    Path(id): Path<String>,
    State(state): State<S>,
) -> Result<ApiSuccess<DetailPage>, ApiError> {
    let news = find_news(&state, &id).await?;
    let form = caller
        .is_authenticated()
        .then(|| BoundForm::new(CommentFields::default()));

    detail_page(&state, news, form).await.map(ApiSuccess::ok)
}

pub async fn add_comment<S: AppState>(
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    State(state): State<S>,
    form: Result<Form<CommentFields>, FormRejection>,
) -> Result<Response, ApiError> {
    let news = find_news(&state, &id).await?;
    let Form(fields) = form?;

    match fields.validate() {
        Submission::Accepted(text) => {
            let comment = state.comments().create(news.id, user.id, text).await?;
            tracing::info!(
                "user {} commented news {:?} with {:?}",
                user.username,
                news.id,
                comment.id
            );
            Ok(Found(comments_location(news.id)).into_response())
        }
        Submission::Rejected(errors) => {
            tracing::debug!("comment of {} rejected: {:?}", user.username, errors);
            let form = BoundForm::with_errors(fields, errors);
            let page = detail_page(&state, news, Some(form)).await?;
            Ok(ApiSuccess::ok(page).into_response())
        }
    }
}

async fn find_news<S: AppState>(state: &S, id: &str) -> Result<News, ApiError> {
    let id = NewsId(parse_id(id)?);
    state
        .news()
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound)
}

async fn detail_page<S: AppState>(
    state: &S,
    news: News,
    form: Option<BoundForm<CommentFields>>,
) -> Result<DetailPage, ApiError> {
    let thread = state.comments().list_for_news(news.id).await?;
    let authors = author_names(state.users(), &thread).await?;
    let comments = thread
        .into_iter()
        .map(|comment| CommentResponse::new(comment, &authors))
        .collect();

    Ok(DetailPage {
        news: NewsResponse::from(news),
        comments,
        form,
    })
}
