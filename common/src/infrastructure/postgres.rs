use chrono::{DateTime, TimeDelta, Utc};
use sqlx::postgres::PgRow;
use uuid::Uuid;

use crate::database::Database;
use crate::domain::password::PasswordHash;
use crate::domain::{
    RepositoryError, SessionRepository, SessionToken, User, UserId, UserRepository, Username,
    session_expired,
};
use crate::{
    CREATED_FIELD_NAME, DATE_JOINED_FIELD_NAME, ID_FIELD_NAME, PASSWORD_FIELD_NAME,
    TOKEN_FIELD_NAME, USER_ID_FIELD_NAME, USERNAME_FIELD_NAME,
};

/// Maps sqlx errors into repository errors, unique constraint violations are kept apart
pub fn map_database_error(error: sqlx::Error) -> RepositoryError {
    match &error {
        sqlx::Error::RowNotFound => RepositoryError::NotFound,
        sqlx::Error::Database(db_error) if db_error.is_unique_violation() => {
            RepositoryError::UniqueViolation(
                db_error.constraint().unwrap_or_default().to_string(),
            )
        }
        _ => RepositoryError::DatabaseError(error.to_string()),
    }
}

#[derive(Clone, Debug)]
pub struct PgUserRepository {
    database: &'static Database,
}

impl PgUserRepository {
    pub fn new(database: &'static Database) -> Self {
        Self { database }
    }
}

const USER_COLUMNS: &str = "id, username, password, date_joined";

impl TryFrom<PgRow> for User {
    type Error = RepositoryError;

    fn try_from(value: PgRow) -> Result<Self, Self::Error> {
        use sqlx::Row;

        let id: i64 = value.try_get(ID_FIELD_NAME).map_err(map_database_error)?;
        let username: String = value
            .try_get(USERNAME_FIELD_NAME)
            .map_err(map_database_error)?;
        let password: String = value
            .try_get(PASSWORD_FIELD_NAME)
            .map_err(map_database_error)?;
        let date_joined: DateTime<Utc> = value
            .try_get(DATE_JOINED_FIELD_NAME)
            .map_err(map_database_error)?;

        let username = Username::try_new(username)
            .map_err(|e| RepositoryError::DatabaseError(format!("Failed to parse username: {}", e)))?;
        let password_hash = PasswordHash::try_from(password.as_str())
            .map_err(|e| RepositoryError::DatabaseError(format!("Failed to parse password: {}", e)))?;

        Ok(User {
            id: UserId(id),
            username,
            password_hash,
            date_joined,
        })
    }
}

impl UserRepository for PgUserRepository {
    async fn create(
        &self,
        username: Username,
        password_hash: PasswordHash,
    ) -> Result<User, RepositoryError> {
        let sql = format!(
            "INSERT INTO users (username, password, date_joined) VALUES ($1, $2, $3) RETURNING {}",
            USER_COLUMNS
        );

        let row = sqlx::query(&sql)
            .bind(username.as_ref())
            .bind(password_hash.encoded())
            .bind(Utc::now())
            .fetch_one(self.database.database_pool())
            .await
            .map_err(map_database_error)?;

        User::try_from(row)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);

        let row = sqlx::query(&sql)
            .bind(id.0)
            .fetch_optional(self.database.database_pool())
            .await
            .map_err(map_database_error)?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, RepositoryError> {
        let sql = format!("SELECT {} FROM users WHERE username = $1", USER_COLUMNS);

        let row = sqlx::query(&sql)
            .bind(username.as_ref())
            .fetch_optional(self.database.database_pool())
            .await
            .map_err(map_database_error)?;

        row.map(User::try_from).transpose()
    }
}

#[derive(Clone, Debug)]
pub struct PgSessionRepository {
    database: &'static Database,
    max_age: TimeDelta,
}

impl PgSessionRepository {
    pub fn new(database: &'static Database, max_age: TimeDelta) -> Self {
        Self { database, max_age }
    }
}

impl SessionRepository for PgSessionRepository {
    fn max_age(&self) -> TimeDelta {
        self.max_age
    }

    async fn open(&self, user_id: UserId) -> Result<SessionToken, RepositoryError> {
        let token = SessionToken::generate();

        sqlx::query("INSERT INTO sessions (token, user_id, created_at) VALUES ($1, $2, $3)")
            .bind(token.0)
            .bind(user_id.0)
            .bind(Utc::now())
            .execute(self.database.database_pool())
            .await
            .map_err(map_database_error)?;

        Ok(token)
    }

    async fn resolve(&self, token: &SessionToken) -> Result<Option<UserId>, RepositoryError> {
        let sql = format!(
            "SELECT {}, {} FROM sessions WHERE {} = $1",
            USER_ID_FIELD_NAME, CREATED_FIELD_NAME, TOKEN_FIELD_NAME
        );

        let session: Option<(i64, DateTime<Utc>)> = sqlx::query_as(&sql)
            .bind::<Uuid>(token.0)
            .fetch_optional(self.database.database_pool())
            .await
            .map_err(map_database_error)?;

        match session {
            Some((_, opened_at)) if session_expired(opened_at, self.max_age) => {
                tracing::debug!("session {} expired", token);
                self.close(token).await?;
                Ok(None)
            }
            Some((user_id, _)) => Ok(Some(UserId(user_id))),
            None => Ok(None),
        }
    }

    async fn close(&self, token: &SessionToken) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(token.0)
            .execute(self.database.database_pool())
            .await
            .map_err(map_database_error)?;

        Ok(())
    }
}
