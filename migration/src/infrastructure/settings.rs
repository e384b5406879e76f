use anyhow::Context;
use bulletin_common::database::DatabaseSettings;
use bulletin_common::settings::{load, load_env};
use serde::Deserialize;

use crate::domain::Application;

/// Database section of the migrated application's own config
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database: DatabaseSettings,
}

impl Settings {
    /// `MIGRATE_APP` (news or notes, default news) selects the application
    pub fn from_env() -> anyhow::Result<(Application, Self)> {
        let application: Application = load_env("MIGRATE_APP", "news")
            .parse()
            .context("MIGRATE_APP is invalid")?;
        let settings = load(application.name())?;
        Ok((application, settings))
    }
}
