use bulletin_common::http::auth::AuthState;
use bulletin_common::{SessionRepository, UserRepository};

use crate::domain::{AppState, CommentRepository, NewsRepository};

pub mod http;
#[cfg(test)]
pub mod memory;
pub mod persistence;
pub mod settings;

#[derive(Clone)]
pub struct AppStateImpl<U, Z, N, C> {
    users: U,
    sessions: Z,
    news: N,
    comments: C,
    news_count_on_home_page: usize,
}

impl<U, Z, N, C> AppStateImpl<U, Z, N, C> {
    pub fn new(users: U, sessions: Z, news: N, comments: C, news_count_on_home_page: usize) -> Self {
        Self {
            users,
            sessions,
            news,
            comments,
            news_count_on_home_page,
        }
    }
}

impl<U, Z, N, C> AuthState for AppStateImpl<U, Z, N, C>
where
    U: UserRepository,
    Z: SessionRepository,
    N: NewsRepository,
    C: CommentRepository,
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

impl<U, Z, N, C> AppState for AppStateImpl<U, Z, N, C>
where
    U: UserRepository,
    Z: SessionRepository,
    N: NewsRepository,
    C: CommentRepository,
{
    type N = N;
    type C = C;

    fn news(&self) -> &Self::N {
        &self.news
    }

    fn comments(&self) -> &Self::C {
        &self.comments
    }

    fn news_count_on_home_page(&self) -> usize {
        self.news_count_on_home_page
    }
}
