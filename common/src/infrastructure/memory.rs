use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::RwLock;

use crate::SESSION_MAX_AGE_SECONDS;
use crate::domain::password::PasswordHash;
use crate::domain::{
    RepositoryError, SessionRepository, SessionToken, User, UserId, UserRepository, Username,
    session_expired,
};

/// Users kept in memory, ids are assigned in insertion order starting from 1 and never reused
#[derive(Clone, Debug, Default)]
pub struct MemoryUserRepository {
    users: Arc<RwLock<BTreeMap<UserId, User>>>,
    last_id: Arc<AtomicI64>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserRepository for MemoryUserRepository {
    async fn create(
        &self,
        username: Username,
        password_hash: PasswordHash,
    ) -> Result<User, RepositoryError> {
        let mut users = self.users.write().await;

        if users.values().any(|user| user.username == username) {
            return Err(RepositoryError::UniqueViolation(username.to_string()));
        }

        let id = UserId(self.last_id.fetch_add(1, Ordering::Relaxed) + 1);
        let user = User {
            id,
            username,
            password_hash,
            date_joined: Utc::now(),
        };
        users.insert(id, user.clone());

        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, RepositoryError> {
        let users = self.users.read().await;
        Ok(users.values().find(|user| &user.username == username).cloned())
    }
}

#[derive(Clone, Debug)]
pub struct MemorySessionRepository {
    sessions: Arc<RwLock<HashMap<SessionToken, (UserId, DateTime<Utc>)>>>,
    max_age: TimeDelta,
}

impl Default for MemorySessionRepository {
    fn default() -> Self {
        Self::with_max_age(TimeDelta::seconds(SESSION_MAX_AGE_SECONDS))
    }
}

impl MemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_age(max_age: TimeDelta) -> Self {
        Self {
            sessions: Arc::default(),
            max_age,
        }
    }

    /// Rewrites when the session was opened, to age it in tests
    pub async fn set_opened_at(&self, token: &SessionToken, opened_at: DateTime<Utc>) {
        if let Some(session) = self.sessions.write().await.get_mut(token) {
            session.1 = opened_at;
        }
    }

    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

impl SessionRepository for MemorySessionRepository {
    fn max_age(&self) -> TimeDelta {
        self.max_age
    }

    async fn open(&self, user_id: UserId) -> Result<SessionToken, RepositoryError> {
        let token = SessionToken::generate();
        self.sessions
            .write()
            .await
            .insert(token, (user_id, Utc::now()));
        Ok(token)
    }

    async fn resolve(&self, token: &SessionToken) -> Result<Option<UserId>, RepositoryError> {
        let mut sessions = self.sessions.write().await;
        match sessions.get(token).copied() {
            Some((_, opened_at)) if session_expired(opened_at, self.max_age) => {
                sessions.remove(token);
                Ok(None)
            }
            Some((user_id, _)) => Ok(Some(user_id)),
            None => Ok(None),
        }
    }

    async fn close(&self, token: &SessionToken) -> Result<(), RepositoryError> {
        self.sessions.write().await.remove(token);
        Ok(())
    }
}
