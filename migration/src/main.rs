use bulletin_common::{database, telemetry};

use crate::domain::migration::Migration;
use crate::infrastructure::persistence::PersistenceAdapter;
use crate::infrastructure::settings::Settings;

pub mod domain;
pub mod infrastructure;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (application, settings) = Settings::from_env()?;
    telemetry::init();

    let database = database::connect(&settings.database).await?;
    tracing::info!(
        "migrating {} tables in schema {}",
        application.name(),
        database.database_schema()
    );
    let persistence = PersistenceAdapter::new(database);

    let migration = Migration::new(application.tables(), persistence);
    migration.migrate().await?;
    tracing::info!("migration finished");

    Ok(())
}
