use std::collections::HashSet;

use bulletin_common::database::Database;
use futures::TryStreamExt;

use crate::domain::migration::MigrationStep;
use crate::domain::persistence::Persistence;

#[derive(Clone)]
pub struct PersistenceAdapter {
    database: &'static Database,
}

impl PersistenceAdapter {
    pub fn new(database: &'static Database) -> Self {
        Self { database }
    }
}

impl Persistence for PersistenceAdapter {
    async fn load(&self) -> Result<HashSet<String>, anyhow::Error> {
        let sql = "SELECT table_name::TEXT
            FROM information_schema.tables
            WHERE
              table_schema = $1
              AND table_type = 'BASE TABLE'";

        let mut rows = sqlx::query_scalar::<_, String>(sql)
            .bind(self.database.database_schema())
            .fetch(self.database.database_pool());

        let mut set = HashSet::new();

        while let Some(name) = rows.try_next().await? {
            set.insert(name);
        }

        Ok(set)
    }

    async fn apply_migration_steps(&self, steps: Vec<MigrationStep>) -> Result<(), anyhow::Error> {
        for step in steps {
            self.database
                .execute_in_transaction(step.ddls, step.ctx)
                .await?;
        }

        Ok(())
    }

    fn database_schema(&self) -> &str {
        self.database.database_schema()
    }
}
