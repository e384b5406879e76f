use axum::Router;
use axum::routing::get;
use bulletin_common::http::users::users_routes;

use crate::domain::{AppState, NewsId};
use crate::infrastructure::http::handlers::comments::{
    delete_comment, delete_comment_page, edit_comment, edit_comment_page,
};
use crate::infrastructure::http::handlers::news::{add_comment, home, news_detail};

mod handlers;
#[cfg(test)]
mod tests;

/// All pages of the news site, including the shared auth pages
pub fn router<S: AppState>(state: S) -> Router {
    Router::new()
        .route("/", get(home::<S>))
        .route("/news/{id}/", get(news_detail::<S>).post(add_comment::<S>))
        .route(
            "/edit_comment/{id}/",
            get(edit_comment_page::<S>).post(edit_comment::<S>),
        )
        .route(
            "/delete_comment/{id}/",
            get(delete_comment_page::<S>)
                .post(delete_comment::<S>)
                .delete(delete_comment::<S>),
        )
        .merge(users_routes::<S>())
        .with_state(state)
}

pub fn news_detail_path(id: NewsId) -> String {
    format!("/news/{}/", id.0)
}

/// Where a comment ends up after it was added, edited or deleted
pub fn comments_location(id: NewsId) -> String {
    format!("{}#comments", news_detail_path(id))
}
