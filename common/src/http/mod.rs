pub mod api;
pub mod auth;
pub mod querystring;
pub mod server;
pub mod users;
