use std::sync::Arc;
use tracing::debug;
use crate::core::config::Config;
use crate::core::error::Result;
use crate::schema::ddl::SqlDbSchemaDdlBuilder;
use crate::schema::naming::{DbSchemaNamingPolicy, ModelTableNames};
use crate::schema::synchronizer::DbSchemaSynchronizer;
use crate::schema::tables::ModelTablesInfo;
use crate::sql::client::DbClient;
use crate::sql::statements::SqlStatements;
use crate::structure::schema::StructureSchema;

/// Materializes the table set of a structure in the store.
pub trait DbSchemaUpserter: Send + Sync {
    fn upsert(&self, schema: &StructureSchema, client: &dyn DbClient) -> Result<()>;
}

/// Synchronizes existing tables, then creates the missing ones.
pub struct SqlDbSchemaUpserter {
    naming: DbSchemaNamingPolicy,
    synchronizer: DbSchemaSynchronizer,
    ddl_builder: SqlDbSchemaDdlBuilder,
    synchronize: bool,
}

impl SqlDbSchemaUpserter {
    pub fn new(statements: Arc<dyn SqlStatements>, config: &Config) -> Result<Self> {
        Ok(SqlDbSchemaUpserter {
            naming: DbSchemaNamingPolicy::from_config(config)?,
            synchronizer: DbSchemaSynchronizer::new(statements.clone()),
            ddl_builder: SqlDbSchemaDdlBuilder::new(statements),
            synchronize: config.should_synchronize(),
        })
    }
}

impl DbSchemaUpserter for SqlDbSchemaUpserter {
    fn upsert(&self, schema: &StructureSchema, client: &dyn DbClient) -> Result<()> {
        let names = ModelTableNames::new(&schema.name, &self.naming);
        let info = ModelTablesInfo::load(client, names)?;

        // Repair drift on existing tables before creating missing ones
        if self.synchronize {
            self.synchronizer.synchronize(schema, client, &info)?;
        }

        if info.statuses.all_exists {
            debug!(structure = %schema.name, "all tables exist");
            return Ok(());
        }

        for sql in self.ddl_builder.generate_sql(schema, &info.names, &info.statuses)? {
            client.execute_non_query(&sql, &[])?;
        }

        Ok(())
    }
}
