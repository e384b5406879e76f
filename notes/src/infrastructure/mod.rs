use bulletin_common::http::auth::AuthState;
use bulletin_common::{SessionRepository, UserRepository};

use crate::domain::{AppState, NoteRepository};

pub mod http;
#[cfg(test)]
pub mod memory;
pub mod persistence;
pub mod settings;

#[derive(Clone)]
pub struct AppStateImpl<U, Z, N> {
    users: U,
    sessions: Z,
    notes: N,
}

impl<U, Z, N> AppStateImpl<U, Z, N> {
    pub fn new(users: U, sessions: Z, notes: N) -> Self {
        Self {
            users,
            sessions,
            notes,
        }
    }
}

impl<U, Z, N> AuthState for AppStateImpl<U, Z, N>
where
    U: UserRepository,
    Z: SessionRepository,
    N: NoteRepository,
{
    type U = U;
    type Z = Z;

    fn users(&self) -> &Self::U {
        &self.users
    }

    fn sessions(&self) -> &Self::Z {
        &self.sessions
    }
}

impl<U, Z, N> AppState for AppStateImpl<U, Z, N>
where
    U: UserRepository,
    Z: SessionRepository,
    N: NoteRepository,
{
    type N = N;

    fn notes(&self) -> &Self::N {
        &self.notes
    }
}
