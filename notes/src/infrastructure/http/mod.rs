use axum::Router;
use axum::routing::get;
use bulletin_common::http::users::users_routes;

use crate::domain::AppState;
use crate::infrastructure::http::handlers::notes::{
    add_note, add_note_page, delete_note, delete_note_page, edit_note, edit_note_page, home,
    note_detail, notes_list, success,
};

mod handlers;

pub const SUCCESS_PATH: &str = "/done/";

/// All pages of the notes site, including the shared auth pages
pub fn router<S: AppState>(state: S) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/notes/", get(notes_list::<S>))
        .route("/add/", get(add_note_page).post(add_note::<S>))
        .route("/note/{slug}/", get(note_detail::<S>))
        .route("/edit/{slug}/", get(edit_note_page::<S>).post(edit_note::<S>))
        .route(
            "/delete/{slug}/",
            get(delete_note_page::<S>)
                .post(delete_note::<S>)
                .delete(delete_note::<S>),
        )
        .route(SUCCESS_PATH, get(success))
        .merge(users_routes::<S>())
        .with_state(state)
}
