use bulletin_common::database::Database;
use bulletin_common::infrastructure::postgres::map_database_error;
use bulletin_common::{RepositoryError, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::postgres::PgRow;

use crate::domain::{Comment, CommentId, CommentRepository, News, NewsId, NewsRepository};

const NEWS_COLUMNS: &str = "id, title, text, date";
const COMMENT_COLUMNS: &str = "id, news_id, author_id, text, created";

struct NewsRow(News);

impl TryFrom<PgRow> for NewsRow {
    type Error = RepositoryError;

    fn try_from(value: PgRow) -> Result<Self, Self::Error> {
        use sqlx::Row;

        let id: i64 = value.try_get("id").map_err(map_database_error)?;
        let title: String = value.try_get("title").map_err(map_database_error)?;
        let text: String = value.try_get("text").map_err(map_database_error)?;
        let date: NaiveDate = value.try_get("date").map_err(map_database_error)?;

        Ok(NewsRow(News {
            id: NewsId(id),
            title,
            text,
            date,
        }))
    }
}

struct CommentRow(Comment);

impl TryFrom<PgRow> for CommentRow {
    type Error = RepositoryError;

    fn try_from(value: PgRow) -> Result<Self, Self::Error> {
        use sqlx::Row;

        let id: i64 = value.try_get("id").map_err(map_database_error)?;
        let news_id: i64 = value.try_get("news_id").map_err(map_database_error)?;
        let author_id: i64 = value.try_get("author_id").map_err(map_database_error)?;
        let text: String = value.try_get("text").map_err(map_database_error)?;
        let created: DateTime<Utc> = value.try_get("created").map_err(map_database_error)?;

        Ok(CommentRow(Comment {
            id: CommentId(id),
            news_id: NewsId(news_id),
            author: UserId(author_id),
            text,
            created,
        }))
    }
}

fn into_comment(row: PgRow) -> Result<Comment, RepositoryError> {
    CommentRow::try_from(row).map(|row| row.0)
}

#[derive(Clone, Debug)]
pub struct PgNewsRepository {
    database: &'static Database,
}

impl PgNewsRepository {
    pub fn new(database: &'static Database) -> Self {
        Self { database }
    }
}

impl NewsRepository for PgNewsRepository {
    async fn latest(&self, limit: usize) -> Result<Vec<News>, RepositoryError> {
        let sql = format!(
            "SELECT {} FROM news ORDER BY date DESC, id DESC LIMIT $1",
            NEWS_COLUMNS
        );

        let rows = sqlx::query(&sql)
            .bind(limit as i64)
            .fetch_all(self.database.database_pool())
            .await
            .map_err(map_database_error)?;

        rows.into_iter()
            .map(|row| NewsRow::try_from(row).map(|row| row.0))
            .collect()
    }

    async fn find_by_id(&self, id: NewsId) -> Result<Option<News>, RepositoryError> {
        let sql = format!("SELECT {} FROM news WHERE id = $1", NEWS_COLUMNS);

        let row = sqlx::query(&sql)
            .bind(id.0)
            .fetch_optional(self.database.database_pool())
            .await
            .map_err(map_database_error)?;

        row.map(|row| NewsRow::try_from(row).map(|row| row.0))
            .transpose()
    }
}

#[derive(Clone, Debug)]
pub struct PgCommentRepository {
    database: &'static Database,
}

impl PgCommentRepository {
    pub fn new(database: &'static Database) -> Self {
        Self { database }
    }
}

impl CommentRepository for PgCommentRepository {
    async fn list_for_news(&self, news_id: NewsId) -> Result<Vec<Comment>, RepositoryError> {
        let sql = format!(
            "SELECT {} FROM comments WHERE news_id = $1 ORDER BY created ASC, id ASC",
            COMMENT_COLUMNS
        );

        let rows = sqlx::query(&sql)
            .bind(news_id.0)
            .fetch_all(self.database.database_pool())
            .await
            .map_err(map_database_error)?;

        rows.into_iter().map(into_comment).collect()
    }

    async fn find_by_id(&self, id: CommentId) -> Result<Option<Comment>, RepositoryError> {
        let sql = format!("SELECT {} FROM comments WHERE id = $1", COMMENT_COLUMNS);

        let row = sqlx::query(&sql)
            .bind(id.0)
            .fetch_optional(self.database.database_pool())
            .await
            .map_err(map_database_error)?;

        row.map(into_comment).transpose()
    }

    async fn create(
        &self,
        news_id: NewsId,
        author: UserId,
        text: String,
    ) -> Result<Comment, RepositoryError> {
        let sql = format!(
            "INSERT INTO comments (news_id, author_id, text, created) VALUES ($1, $2, $3, $4) RETURNING {}",
            COMMENT_COLUMNS
        );

        let row = sqlx::query(&sql)
            .bind(news_id.0)
            .bind(author.0)
            .bind(text)
            .bind(Utc::now())
            .fetch_one(self.database.database_pool())
            .await
            .map_err(map_database_error)?;

        into_comment(row)
    }

    async fn update_text(&self, id: CommentId, text: String) -> Result<Comment, RepositoryError> {
        let sql = format!(
            "UPDATE comments SET text = $1 WHERE id = $2 RETURNING {}",
            COMMENT_COLUMNS
        );

        // fetch_one reports a vanished row as RowNotFound, mapped to NotFound
        let row = sqlx::query(&sql)
            .bind(text)
            .bind(id.0)
            .fetch_one(self.database.database_pool())
            .await
            .map_err(map_database_error)?;

        into_comment(row)
    }

    async fn delete(&self, id: CommentId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id.0)
            .execute(self.database.database_pool())
            .await
            .map_err(map_database_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
