use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{HeaderMap, Uri, header};
use chrono::TimeDelta;

use crate::domain::{Caller, SessionRepository, SessionToken, User, UserRepository};
use crate::http::api::ApiError;
use crate::{LOGIN_PATH, NEXT_PARAM_NAME, SESSION_COOKIE_NAME};

/// Part of the application state every app shares: who the users are and who is logged in.
pub trait AuthState: Clone + Send + Sync + 'static {
    type U: UserRepository;
    type Z: SessionRepository;
    fn users(&self) -> &Self::U;
    fn sessions(&self) -> &Self::Z;
}

impl<S: AuthState> FromRequestParts<S> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(token) = session_token(&parts.headers) else {
            return Ok(Caller::Anonymous);
        };
        let Some(user_id) = state.sessions().resolve(&token).await? else {
            return Ok(Caller::Anonymous);
        };

        let caller = match state.users().find_by_id(user_id).await? {
            Some(user) => Caller::Authenticated(user),
            None => Caller::Anonymous,
        };
        Ok(caller)
    }
}

/// Extracts the logged in user, anonymous callers are sent to the login page
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl<S: AuthState> FromRequestParts<S> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Caller::from_request_parts(parts, state).await? {
            Caller::Authenticated(user) => Ok(CurrentUser(user)),
            Caller::Anonymous => {
                let next = requested_path(&parts.uri);
                tracing::debug!("anonymous request to {}, login required", next);
                Err(ApiError::LoginRequired { next })
            }
        }
    }
}

/// Path and query of the request, as the client sent them
pub fn requested_path(uri: &Uri) -> String {
    uri.path_and_query()
        .map(|path_and_query| path_and_query.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string())
}

/// Login page url which brings the user back to `next` afterwards
pub fn login_redirect_location(next: &str) -> String {
    format!("{}?{}={}", LOGIN_PATH, NEXT_PARAM_NAME, encode_next(next))
}

// Only bytes that would break the surrounding query are escaped.
fn encode_next(next: &str) -> String {
    let mut encoded = String::with_capacity(next.len());
    for byte in next.bytes() {
        match byte {
            b'%' | b'&' | b'#' | b'+' | b' ' => encoded.push_str(&format!("%{:02X}", byte)),
            byte if !byte.is_ascii() || byte.is_ascii_control() => {
                encoded.push_str(&format!("%{:02X}", byte))
            }
            byte => encoded.push(byte as char),
        }
    }
    encoded
}

/// `next` is followed only when it points inside this site
pub fn safe_next(next: Option<&str>) -> Option<&str> {
    next.filter(|next| next.starts_with('/') && !next.starts_with("//") && !next.contains('\\'))
}

pub fn session_token(headers: &HeaderMap) -> Option<SessionToken> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE_NAME)
        .and_then(|(_, value)| value.parse().ok())
}

/// Session cookie living as long as the server side session
pub fn session_cookie(token: &SessionToken, max_age: TimeDelta) -> String {
    format!(
        "{}={}; HttpOnly; Path=/; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE_NAME,
        token,
        max_age.num_seconds()
    )
}

pub fn expired_session_cookie() -> String {
    format!(
        "{}=; HttpOnly; Path=/; SameSite=Lax; Max-Age=0",
        SESSION_COOKIE_NAME
    )
}
