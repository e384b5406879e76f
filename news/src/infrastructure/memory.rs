use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use bulletin_common::{RepositoryError, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use itertools::Itertools;
use tokio::sync::RwLock;

use crate::domain::{
    Comment, CommentId, CommentRepository, News, NewsId, NewsRepository, sort_newest_first,
    sort_oldest_first,
};

/// News kept in memory, keyed by id; order is computed on every read
#[derive(Clone, Debug, Default)]
pub struct MemoryNewsRepository {
    news: Arc<RwLock<BTreeMap<NewsId, News>>>,
    last_id: Arc<AtomicI64>,
}

impl MemoryNewsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// News are never created through the site, tests seed them here
    pub async fn insert(&self, title: &str, text: &str, date: NaiveDate) -> News {
        let mut news = self.news.write().await;
        let id = NewsId(next_id(&self.last_id));
        let item = News {
            id,
            title: title.to_string(),
            text: text.to_string(),
            date,
        };
        news.insert(id, item.clone());
        item
    }
}

impl NewsRepository for MemoryNewsRepository {
    async fn latest(&self, limit: usize) -> Result<Vec<News>, RepositoryError> {
        let mut news = self.news.read().await.values().cloned().collect_vec();
        sort_newest_first(&mut news);
        news.truncate(limit);
        Ok(news)
    }

    async fn find_by_id(&self, id: NewsId) -> Result<Option<News>, RepositoryError> {
        Ok(self.news.read().await.get(&id).cloned())
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemoryCommentRepository {
    comments: Arc<RwLock<BTreeMap<CommentId, Comment>>>,
    last_id: Arc<AtomicI64>,
}

impl MemoryCommentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rewrites the stored creation time, the way fixtures backdate comments
    pub async fn set_created(&self, id: CommentId, created: DateTime<Utc>) {
        if let Some(comment) = self.comments.write().await.get_mut(&id) {
            comment.created = created;
        }
    }

    pub async fn count(&self) -> usize {
        self.comments.read().await.len()
    }
}

impl CommentRepository for MemoryCommentRepository {
    async fn list_for_news(&self, news_id: NewsId) -> Result<Vec<Comment>, RepositoryError> {
        let comments = self.comments.read().await;
        let mut thread = comments
            .values()
            .filter(|comment| comment.news_id == news_id)
            .cloned()
            .collect_vec();
        sort_oldest_first(&mut thread);
        Ok(thread)
    }

    async fn find_by_id(&self, id: CommentId) -> Result<Option<Comment>, RepositoryError> {
        Ok(self.comments.read().await.get(&id).cloned())
    }

    async fn create(
        &self,
        news_id: NewsId,
        author: UserId,
        text: String,
    ) -> Result<Comment, RepositoryError> {
        let mut comments = self.comments.write().await;
        let id = CommentId(next_id(&self.last_id));
        let comment = Comment {
            id,
            news_id,
            author,
            text,
            created: Utc::now(),
        };
        comments.insert(id, comment.clone());
        Ok(comment)
    }

    async fn update_text(&self, id: CommentId, text: String) -> Result<Comment, RepositoryError> {
        let mut comments = self.comments.write().await;
        let comment = comments.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        comment.text = text;
        Ok(comment.clone())
    }

    async fn delete(&self, id: CommentId) -> Result<(), RepositoryError> {
        self.comments
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}

/// Ids start from 1 and are never handed out twice, like a serial column
fn next_id(last_id: &AtomicI64) -> i64 {
    last_id.fetch_add(1, Ordering::Relaxed) + 1
}

#[cfg(test)]
mod tests {
    use chrono::{Days, TimeDelta};

    use super::*;

    #[tokio::test]
    async fn latest_is_truncated_and_newest_first() {
        let repository = MemoryNewsRepository::new();
        let today = Utc::now().date_naive();
        for index in 0..3 {
            repository
                .insert(&format!("Новость {}", index), "Просто текст.", today - Days::new(index))
                .await;
        }

        let latest = repository.latest(2).await.unwrap();
        assert_eq!(latest.len(), 2);
        assert_eq!(latest[0].date, today);
        assert_eq!(latest[1].date, today - Days::new(1));

        assert_eq!(repository.latest(10).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn thread_follows_rewritten_timestamps() {
        let repository = MemoryCommentRepository::new();
        let first = repository
            .create(NewsId(1), UserId(1), "first".to_string())
            .await
            .unwrap();
        let second = repository
            .create(NewsId(1), UserId(1), "second".to_string())
            .await
            .unwrap();
        repository
            .create(NewsId(2), UserId(1), "elsewhere".to_string())
            .await
            .unwrap();

        repository
            .set_created(first.id, second.created + TimeDelta::days(1))
            .await;

        let thread = repository.list_for_news(NewsId(1)).await.unwrap();
        let ids = thread.iter().map(|comment| comment.id).collect_vec();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn update_keeps_created_and_delete_is_permanent() {
        let repository = MemoryCommentRepository::new();
        let comment = repository
            .create(NewsId(1), UserId(1), "old".to_string())
            .await
            .unwrap();

        let updated = repository
            .update_text(comment.id, "new".to_string())
            .await
            .unwrap();
        assert_eq!(updated.text, "new");
        assert_eq!(updated.created, comment.created);

        repository.delete(comment.id).await.unwrap();
        assert_eq!(repository.count().await, 0);
        assert_eq!(
            repository.delete(comment.id).await,
            Err(RepositoryError::NotFound)
        );
    }

    #[tokio::test]
    async fn deleted_comment_id_is_not_reused() {
        let repository = MemoryCommentRepository::new();
        let first = repository
            .create(NewsId(1), UserId(1), "first".to_string())
            .await
            .unwrap();
        repository.delete(first.id).await.unwrap();

        let second = repository
            .create(NewsId(1), UserId(1), "second".to_string())
            .await
            .unwrap();
        assert_eq!(second.id, CommentId(2));
    }
}
