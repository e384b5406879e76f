use bulletin_common::database::Database;
use bulletin_common::infrastructure::postgres::map_database_error;
use bulletin_common::{RepositoryError, UserId};
use sqlx::postgres::PgRow;

use crate::domain::{Note, NoteDraft, NoteId, NoteRepository, NoteSlug};

const NOTE_COLUMNS: &str = "id, title, text, slug, author_id";

struct NoteRow(Note);

impl TryFrom<PgRow> for NoteRow {
    type Error = RepositoryError;

    fn try_from(value: PgRow) -> Result<Self, Self::Error> {
        use sqlx::Row;

        let id: i64 = value.try_get("id").map_err(map_database_error)?;
        let title: String = value.try_get("title").map_err(map_database_error)?;
        let text: String = value.try_get("text").map_err(map_database_error)?;
        let slug: String = value.try_get("slug").map_err(map_database_error)?;
        let author_id: i64 = value.try_get("author_id").map_err(map_database_error)?;

        let slug = NoteSlug::try_new(slug.as_str()).map_err(|error| {
            RepositoryError::DatabaseError(format!("stored slug {:?} is invalid: {}", slug, error))
        })?;

        Ok(NoteRow(Note {
            id: NoteId(id),
            title,
            text,
            slug,
            author: UserId(author_id),
        }))
    }
}

fn into_note(row: PgRow) -> Result<Note, RepositoryError> {
    NoteRow::try_from(row).map(|row| row.0)
}

#[derive(Clone, Debug)]
pub struct PgNoteRepository {
    database: &'static Database,
}

impl PgNoteRepository {
    pub fn new(database: &'static Database) -> Self {
        Self { database }
    }
}

impl NoteRepository for PgNoteRepository {
    async fn list_by_author(&self, author: UserId) -> Result<Vec<Note>, RepositoryError> {
        let sql = format!(
            "SELECT {} FROM notes WHERE author_id = $1 ORDER BY id ASC",
            NOTE_COLUMNS
        );

        let rows = sqlx::query(&sql)
            .bind(author.0)
            .fetch_all(self.database.database_pool())
            .await
            .map_err(map_database_error)?;

        rows.into_iter().map(into_note).collect()
    }

    async fn find_by_slug(&self, slug: &NoteSlug) -> Result<Option<Note>, RepositoryError> {
        let sql = format!("SELECT {} FROM notes WHERE slug = $1", NOTE_COLUMNS);

        let row = sqlx::query(&sql)
            .bind(slug.as_ref())
            .fetch_optional(self.database.database_pool())
            .await
            .map_err(map_database_error)?;

        row.map(into_note).transpose()
    }

    async fn exists_by_slug(
        &self,
        slug: &NoteSlug,
        exclude: Option<NoteId>,
    ) -> Result<bool, RepositoryError> {
        // `id IS DISTINCT FROM NULL` holds for every row, so no exclusion means all notes
        let (exists,) = sqlx::query_as::<_, (bool,)>(
            "SELECT EXISTS (SELECT 1 FROM notes WHERE slug = $1 AND id IS DISTINCT FROM $2)",
        )
        .bind(slug.as_ref())
        .bind(exclude.map(|id| id.0))
        .fetch_one(self.database.database_pool())
        .await
        .map_err(map_database_error)?;

        Ok(exists)
    }

    async fn create(&self, author: UserId, draft: NoteDraft) -> Result<Note, RepositoryError> {
        let sql = format!(
            "INSERT INTO notes (title, text, slug, author_id) VALUES ($1, $2, $3, $4) RETURNING {}",
            NOTE_COLUMNS
        );

        let row = sqlx::query(&sql)
            .bind(draft.title)
            .bind(draft.text)
            .bind(draft.slug.into_inner())
            .bind(author.0)
            .fetch_one(self.database.database_pool())
            .await
            .map_err(map_database_error)?;

        into_note(row)
    }

    async fn update(&self, id: NoteId, draft: NoteDraft) -> Result<Note, RepositoryError> {
        let sql = format!(
            "UPDATE notes SET title = $1, text = $2, slug = $3 WHERE id = $4 RETURNING {}",
            NOTE_COLUMNS
        );

        let row = sqlx::query(&sql)
            .bind(draft.title)
            .bind(draft.text)
            .bind(draft.slug.into_inner())
            .bind(id.0)
            .fetch_one(self.database.database_pool())
            .await
            .map_err(map_database_error)?;

        into_note(row)
    }

    async fn delete(&self, id: NoteId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1")
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
