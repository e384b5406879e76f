use bulletin_common::database::DatabaseSettings;
use serde::Deserialize;

use crate::domain::NEWS_COUNT_ON_HOME_PAGE;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server_port: String,
    pub database: DatabaseSettings,
    #[serde(default = "bulletin_common::settings::default_session_max_age_seconds")]
    pub session_max_age_seconds: i64,
    #[serde(default = "default_news_count_on_home_page")]
    pub news_count_on_home_page: usize,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        bulletin_common::settings::load("news")
    }
}

fn default_news_count_on_home_page() -> usize {
    NEWS_COUNT_ON_HOME_PAGE
}
