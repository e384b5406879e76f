use bulletin_common::database;
use bulletin_common::http::server::{HttpServer, HttpServerConfig};
use bulletin_common::infrastructure::postgres::{PgSessionRepository, PgUserRepository};
use bulletin_common::telemetry;
use chrono::TimeDelta;

use crate::infrastructure::AppStateImpl;
use crate::infrastructure::http::router;
use crate::infrastructure::persistence::{PgCommentRepository, PgNewsRepository};
use crate::infrastructure::settings::Settings;

mod domain;
mod infrastructure;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env()?;
    telemetry::init();

    let database = database::connect(&settings.database).await?;
    tracing::info!("connected to {}", settings.database.db);

    let state = AppStateImpl::new(
        PgUserRepository::new(database),
        PgSessionRepository::new(
            database,
            TimeDelta::seconds(settings.session_max_age_seconds),
        ),
        PgNewsRepository::new(database),
        PgCommentRepository::new(database),
        settings.news_count_on_home_page,
    );

    let server_config = HttpServerConfig {
        port: &settings.server_port,
    };
    let http_server = HttpServer::new(router(state), server_config).await?;
    http_server.run().await
}
