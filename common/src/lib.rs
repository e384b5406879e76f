pub mod database;
pub mod domain;
pub mod http;
pub mod infrastructure;
pub mod settings;
pub mod telemetry;
pub mod test_utils;

// Auth entry points shared by every application

pub const LOGIN_PATH: &'static str = "/auth/login/";
pub const LOGOUT_PATH: &'static str = "/auth/logout/";
pub const SIGNUP_PATH: &'static str = "/auth/signup/";

pub const SESSION_COOKIE_NAME: &'static str = "sessionid";
pub const NEXT_PARAM_NAME: &'static str = "next";
/// Two weeks
pub const SESSION_MAX_AGE_SECONDS: i64 = 1_209_600;

// Persisted users field names

pub const ID_FIELD_NAME: &'static str = "id";
pub const USERNAME_FIELD_NAME: &'static str = "username";
pub const PASSWORD_FIELD_NAME: &'static str = "password";
pub const DATE_JOINED_FIELD_NAME: &'static str = "date_joined";
pub const TOKEN_FIELD_NAME: &'static str = "token";
pub const USER_ID_FIELD_NAME: &'static str = "user_id";
pub const CREATED_FIELD_NAME: &'static str = "created_at";

pub const USERS_TABLE_NAME: &'static str = "users";
pub const SESSIONS_TABLE_NAME: &'static str = "sessions";

// expose domain module

pub use domain::*;
