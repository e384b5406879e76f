use axum::http::{HeaderName, HeaderValue, header};

use crate::SESSION_COOKIE_NAME;
use crate::domain::password::PasswordHash;
use crate::domain::{SessionRepository, User, UserRepository, Username};

/// Password of every user created by [`seed_user`]
pub const TEST_PASSWORD: &str = "password";

/// Work factor of fixture passwords, low enough to keep suites fast
pub const TEST_ITERATIONS: u32 = 1_000;

/// Registers a user, for tests only.
///
/// Public so that the applications can reuse it in their own tests.
pub async fn seed_user<U: UserRepository>(users: &U, username: &str) -> User {
    let username = Username::try_new(username).expect("test username must be valid");
    users
        .create(username, PasswordHash::with_iterations(TEST_PASSWORD, TEST_ITERATIONS))
        .await
        .expect("failed to seed user")
}

/// Logs the user in and returns the `Cookie` header carrying the session
pub async fn session_cookie_header<Z: SessionRepository>(
    sessions: &Z,
    user: &User,
) -> (HeaderName, HeaderValue) {
    let token = sessions
        .open(user.id)
        .await
        .expect("failed to open session");
    let value = HeaderValue::from_str(&format!("{}={}", SESSION_COOKIE_NAME, token))
        .expect("session cookie must be a valid header value");
    (header::COOKIE, value)
}
