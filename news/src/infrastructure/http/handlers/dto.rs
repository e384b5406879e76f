use std::collections::HashMap;

use bulletin_common::forms::BoundForm;
use bulletin_common::{UserId, Username};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::domain::moderation::CommentFields;
use crate::domain::{Comment, News};

#[derive(Debug, Clone, Serialize)]
pub struct HomePage {
    pub object_list: Vec<NewsResponse>,
}

/// News detail with its thread; `form` is left out entirely for anonymous callers
#[derive(Debug, Clone, Serialize)]
pub struct DetailPage {
    pub news: NewsResponse,
    pub comments: Vec<CommentResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form: Option<BoundForm<CommentFields>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentEditPage {
    pub comment: CommentResponse,
    pub form: BoundForm<CommentFields>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentDeletePage {
    pub comment: CommentResponse,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewsResponse {
    id: i64,
    title: String,
    text: String,
    date: NaiveDate,
}

impl From<News> for NewsResponse {
    fn from(value: News) -> Self {
        Self {
            id: value.id.0,
            title: value.title,
            text: value.text,
            date: value.date,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentResponse {
    id: i64,
    news_id: i64,
    author: String,
    text: String,
    created: DateTime<Utc>,
}

impl CommentResponse {
    pub fn new(comment: Comment, authors: &HashMap<UserId, Username>) -> Self {
        let author = authors
            .get(&comment.author)
            .map(ToString::to_string)
            .unwrap_or_default();

        Self {
            id: comment.id.0,
            news_id: comment.news_id.0,
            author,
            text: comment.text,
            created: comment.created,
        }
    }
}
