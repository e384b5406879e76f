use std::future::Future;

use bulletin_common::http::auth::AuthState;
use bulletin_common::ownership::Owned;
use bulletin_common::{RepositoryError, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub mod moderation;

/// How many news the home page shows unless configured otherwise
pub const NEWS_COUNT_ON_HOME_PAGE: usize = 10;

/// Wrapper to prevent ID confusion
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NewsId(pub i64);

/// Wrapper to prevent ID confusion
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CommentId(pub i64);

/// A published news item, public and read-only
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct News {
    pub id: NewsId,
    pub title: String,
    pub text: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: CommentId,
    pub news_id: NewsId,
    pub author: UserId,
    pub text: String,
    /// assigned by the store when the comment is written, the thread is ordered by it
    pub created: DateTime<Utc>,
}

impl Owned for Comment {
    fn author(&self) -> UserId {
        self.author
    }
}

pub trait NewsRepository: Clone + Send + Sync + 'static {
    /// at most `limit` news, newest first
    fn latest(&self, limit: usize)
    -> impl Future<Output = Result<Vec<News>, RepositoryError>> + Send;

    fn find_by_id(
        &self,
        id: NewsId,
    ) -> impl Future<Output = Result<Option<News>, RepositoryError>> + Send;
}

pub trait CommentRepository: Clone + Send + Sync + 'static {
    /// comments of one news, oldest first
    fn list_for_news(
        &self,
        news_id: NewsId,
    ) -> impl Future<Output = Result<Vec<Comment>, RepositoryError>> + Send;

    fn find_by_id(
        &self,
        id: CommentId,
    ) -> impl Future<Output = Result<Option<Comment>, RepositoryError>> + Send;

    fn create(
        &self,
        news_id: NewsId,
        author: UserId,
        text: String,
    ) -> impl Future<Output = Result<Comment, RepositoryError>> + Send;

    /// replaces the text, `created` stays as it was
    fn update_text(
        &self,
        id: CommentId,
        text: String,
    ) -> impl Future<Output = Result<Comment, RepositoryError>> + Send;

    fn delete(&self, id: CommentId) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}

/// The global application state shared between all request handlers.
pub trait AppState: AuthState {
    type N: NewsRepository;
    type C: CommentRepository;
    fn news(&self) -> &Self::N;
    fn comments(&self) -> &Self::C;
    fn news_count_on_home_page(&self) -> usize;
}

/// Home page order: by date, most recent first
pub fn sort_newest_first(news: &mut [News]) {
    news.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
}

/// Thread order: by the stored creation time, never by insertion order
pub fn sort_oldest_first(comments: &mut [Comment]) {
    comments.sort_by(|a, b| a.created.cmp(&b.created).then(a.id.cmp(&b.id)));
}
