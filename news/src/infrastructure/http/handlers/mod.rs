use std::collections::HashMap;

use bulletin_common::http::api::ApiError;
use bulletin_common::{RepositoryError, UserId, UserRepository, Username};
use itertools::Itertools;

use crate::domain::Comment;

pub mod comments;
mod dto;
pub mod news;

/// Ids in paths are numeric, anything else simply does not exist
fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse().map_err(|_| ApiError::NotFound)
}

/// Usernames of the comment authors, one lookup per distinct author
async fn author_names(
    users: &impl UserRepository,
    comments: &[Comment],
) -> Result<HashMap<UserId, Username>, RepositoryError> {
    let authors: Vec<UserId> = comments.iter().map(|comment| comment.author).unique().collect();
    let mut names = HashMap::new();
    for author in authors {
        if let Some(user) = users.find_by_id(author).await? {
            names.insert(author, user.username);
        }
    }
    Ok(names)
}
