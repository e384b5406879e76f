use bulletin_common::database::DatabaseSettings;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server_port: String,
    pub database: DatabaseSettings,
    #[serde(default = "bulletin_common::settings::default_session_max_age_seconds")]
    pub session_max_age_seconds: i64,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        bulletin_common::settings::load("notes")
    }
}
