use axum::extract::State;
use axum::http::{HeaderMap, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Form, Router};
use serde::{Deserialize, Serialize};

use crate::domain::forms::{BoundForm, FormErrors, NON_FIELD_ERRORS};
use crate::domain::password::PasswordHash;
use crate::domain::{RepositoryError, SessionRepository, User, UserRepository, Username};
use crate::http::api::{ApiError, ApiSuccess, Found};
use crate::http::auth::{
    AuthState, expired_session_cookie, safe_next, session_cookie, session_token,
};
use crate::http::querystring::QueryString;
use crate::{LOGIN_PATH, LOGOUT_PATH, SIGNUP_PATH};

pub const INVALID_LOGIN: &str =
    "Пожалуйста, введите правильные имя пользователя и пароль. Оба поля могут быть чувствительны к регистру.";
pub const USERNAME_TAKEN: &str = "Пользователь с таким именем уже существует.";
pub const INVALID_USERNAME: &str =
    "Введите правильное имя пользователя. Оно может содержать только буквы, цифры и знаки @/./+/-/_.";
pub const PASSWORDS_MISMATCH: &str = "Введенные пароли не совпадают.";

/// Login, logout and signup pages, mounted by every application
pub fn users_routes<S: AuthState>() -> Router<S> {
    Router::new()
        .route(LOGIN_PATH, get(login_page).post(login::<S>))
        .route(LOGOUT_PATH, get(logout::<S>).post(logout::<S>))
        .route(SIGNUP_PATH, get(signup_page).post(signup::<S>))
}

#[derive(Deserialize, Debug, Default)]
pub struct NextParam {
    pub next: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct LoginFields {
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing)]
    pub password: String,
}

#[derive(Serialize, Debug)]
pub struct LoginPage {
    pub form: BoundForm<LoginFields>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct SignupFields {
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing)]
    pub password1: String,
    #[serde(default, skip_serializing)]
    pub password2: String,
}

#[derive(Serialize, Debug)]
pub struct SignupPage {
    pub form: BoundForm<SignupFields>,
}

#[derive(Serialize, Debug)]
pub struct LogoutPage {
    pub logged_out: bool,
}

pub async fn login_page(QueryString(params): QueryString<NextParam>) -> ApiSuccess<LoginPage> {
    ApiSuccess::ok(LoginPage {
        form: BoundForm::new(LoginFields::default()),
        next: params.next,
    })
}

pub async fn login<S: AuthState>(
    State(state): State<S>,
    QueryString(params): QueryString<NextParam>,
    Form(fields): Form<LoginFields>,
) -> Result<Response, ApiError> {
    let mut errors = FormErrors::new();
    errors.require("username", &fields.username);
    errors.require("password", &fields.password);

    if errors.is_empty() {
        match authenticate(&state, &fields).await? {
            Some(user) => {
                let token = state.sessions().open(user.id).await?;
                tracing::info!("user {} logged in", user.username);

                let location = safe_next(params.next.as_deref()).unwrap_or("/").to_string();
                let cookie = session_cookie(&token, state.sessions().max_age());
                return Ok((
                    [(header::SET_COOKIE, cookie)],
                    Found(location),
                )
                    .into_response());
            }
            None => {
                tracing::debug!("failed login attempt for {}", fields.username);
                errors.add(NON_FIELD_ERRORS, INVALID_LOGIN);
            }
        }
    }

    Ok(ApiSuccess::ok(LoginPage {
        form: BoundForm::with_errors(fields, errors),
        next: params.next,
    })
    .into_response())
}

async fn authenticate<S: AuthState>(
    state: &S,
    fields: &LoginFields,
) -> Result<Option<User>, RepositoryError> {
    let Ok(username) = Username::try_new(fields.username.as_str()) else {
        return Ok(None);
    };

    let user = state.users().find_by_username(&username).await?;
    Ok(user.filter(|user| user.password_hash.verify(&fields.password)))
}

pub async fn logout<S: AuthState>(
    State(state): State<S>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    if let Some(token) = session_token(&headers) {
        state.sessions().close(&token).await?;
    }

    Ok((
        [(header::SET_COOKIE, expired_session_cookie())],
        ApiSuccess::ok(LogoutPage { logged_out: true }),
    )
        .into_response())
}

pub async fn signup_page() -> ApiSuccess<SignupPage> {
    ApiSuccess::ok(SignupPage {
        form: BoundForm::new(SignupFields::default()),
    })
}

pub async fn signup<S: AuthState>(
    State(state): State<S>,
    Form(fields): Form<SignupFields>,
) -> Result<Response, ApiError> {
    let mut errors = FormErrors::new();
    let username = if errors.require("username", &fields.username) {
        None
    } else {
        Username::try_new(fields.username.as_str())
            .inspect_err(|_| errors.add("username", INVALID_USERNAME))
            .ok()
    };
    errors.require("password1", &fields.password1);
    if !errors.require("password2", &fields.password2) && fields.password1 != fields.password2 {
        errors.add("password2", PASSWORDS_MISMATCH);
    }

    if let (Some(username), true) = (username, errors.is_empty()) {
        match state
            .users()
            .create(username, PasswordHash::new(&fields.password1))
            .await
        {
            Ok(user) => {
                tracing::info!("user {} signed up", user.username);
                return Ok(Found::to(LOGIN_PATH).into_response());
            }
            Err(RepositoryError::UniqueViolation(_)) => errors.add("username", USERNAME_TAKEN),
            Err(e) => return Err(e.into()),
        }
    }

    Ok(ApiSuccess::ok(SignupPage {
        form: BoundForm::with_errors(fields, errors),
    })
    .into_response())
}
