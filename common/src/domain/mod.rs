use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, TimeDelta, Utc};
use nutype::nutype;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::password::PasswordHash;

pub mod forms;
pub mod ownership;
pub mod password;

/// Users registry, backed by the `users` table or by memory in tests
pub trait UserRepository: Clone + Send + Sync + 'static {
    /// register a new user, fails with UniqueViolation when the username is taken
    fn create(
        &self,
        username: Username,
        password_hash: PasswordHash,
    ) -> impl Future<Output = Result<User, RepositoryError>> + Send;

    fn find_by_id(
        &self,
        id: UserId,
    ) -> impl Future<Output = Result<Option<User>, RepositoryError>> + Send;

    fn find_by_username(
        &self,
        username: &Username,
    ) -> impl Future<Output = Result<Option<User>, RepositoryError>> + Send;
}

/// Server side sessions, one token per login, valid for `max_age` after opening
pub trait SessionRepository: Clone + Send + Sync + 'static {
    fn max_age(&self) -> TimeDelta;

    /// open a session for the user and return its token
    fn open(&self, user_id: UserId)
    -> impl Future<Output = Result<SessionToken, RepositoryError>> + Send;

    /// resolve token into the user it was opened for, expired sessions are dropped
    fn resolve(
        &self,
        token: &SessionToken,
    ) -> impl Future<Output = Result<Option<UserId>, RepositoryError>> + Send;

    /// forget the session, unknown tokens are ignored
    fn close(&self, token: &SessionToken)
    -> impl Future<Output = Result<(), RepositoryError>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    NotFound,
    UniqueViolation(String),
    DatabaseError(String),
}

impl Display for RepositoryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RepositoryError::NotFound => write!(f, "record not found"),
            RepositoryError::UniqueViolation(value) => write!(f, "unique violation: {}", value),
            RepositoryError::DatabaseError(cause) => write!(f, "database error: {}", cause),
        }
    }
}

impl std::error::Error for RepositoryError {}

/// Wrapper to prevent ID confusion
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(pub i64);

impl From<i64> for UserId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

// Letters (any script), digits, spaces and @/./+/-/_ characters.
const USERNAME_REGEX: &str = r"^[\w.@+\- ]+$";

static USERNAME_REGEX_COMPILED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(USERNAME_REGEX).expect("USERNAME_REGEX must be a valid regex")
});

fn is_eligible_username(username: &str) -> bool {
    USERNAME_REGEX_COMPILED.is_match(username)
}

#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 150, predicate = is_eligible_username),
    derive(
        Clone,
        Debug,
        Display,
        AsRef,
        PartialEq,
        Eq,
        Hash,
        Serialize,
        Deserialize
    )
)]
pub struct Username(String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: Username,
    pub password_hash: PasswordHash,
    pub date_joined: DateTime<Utc>,
}

/// Opaque session identifier stored in the session cookie
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionToken(pub Uuid);

impl SessionToken {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

/// A session opened at `opened_at` is over once `max_age` has passed
pub fn session_expired(opened_at: DateTime<Utc>, max_age: TimeDelta) -> bool {
    Utc::now() - opened_at >= max_age
}

impl Display for SessionToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl FromStr for SessionToken {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Who is making the request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    Anonymous,
    Authenticated(User),
}

impl Caller {
    pub fn user(&self) -> Option<&User> {
        match self {
            Caller::Anonymous => None,
            Caller::Authenticated(user) => Some(user),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user().is_some()
    }
}
