use std::env;

use anyhow::Context;
use config::{Config, Environment, File};
use dotenvy::dotenv;
use serde::de::DeserializeOwned;

/// Loads settings of one application.
///
/// Sources, later ones win:
/// `./config/<app>.yaml`, `./config/<app>-<RUN_MODE>.yaml` (optional)
/// and `APP_*` environment variables, nested keys separated by `__`.
pub fn load<T: DeserializeOwned>(app: &str) -> anyhow::Result<T> {
    dotenv().ok();
    let run_mode = load_env("RUN_MODE", "development");

    let s = Config::builder()
        .add_source(File::with_name(&format!("./config/{app}")))
        .add_source(File::with_name(&format!("./config/{app}-{run_mode}")).required(false))
        .add_source(
            Environment::with_prefix("app")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    s.try_deserialize()
        .with_context(|| format!("failed to read {app} config"))
}

/// Serde default for the `session_max_age_seconds` key of the app settings
pub fn default_session_max_age_seconds() -> i64 {
    crate::SESSION_MAX_AGE_SECONDS
}

pub fn load_env(key: &str, default_value: &'static str) -> String {
    env::var(key).unwrap_or_else(|_| default_value.into())
}
