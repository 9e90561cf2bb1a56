use std::sync::Arc;
use crate::core::config::Config;
use crate::core::error::Result;
use crate::schema::naming::{DbSchemaNamingPolicy, ModelTableNames};
use crate::sql::client::DbClient;
use crate::sql::statements::{SqlStatements, inject_sql};
use crate::structure::schema::StructureSchema;

/// Physically removes the table set of a structure.
pub trait DbSchemaDropper: Send + Sync {
    fn drop_structure_set(&self, schema: &StructureSchema, client: &dyn DbClient) -> Result<()>;
}

pub struct SqlDbSchemaDropper {
    naming: DbSchemaNamingPolicy,
    statements: Arc<dyn SqlStatements>,
}

impl SqlDbSchemaDropper {
    pub fn new(statements: Arc<dyn SqlStatements>, config: &Config) -> Result<Self> {
        Ok(SqlDbSchemaDropper {
            naming: DbSchemaNamingPolicy::from_config(config)?,
            statements,
        })
    }
}

impl DbSchemaDropper for SqlDbSchemaDropper {
    fn drop_structure_set(&self, schema: &StructureSchema, client: &dyn DbClient) -> Result<()> {
        let names = ModelTableNames::new(&schema.name, &self.naming);
        let template = self.statements.get_sql("DropTable")?;

        // Children reference the structure table, drop them first
        let mut tables = names.indexes_table_names.all_table_names();
        tables.push(&names.uniques_table_name);
        tables.push(&names.structure_table_name);

        for table in tables {
            client.execute_non_query(&inject_sql(&template, &[table]), &[])?;
        }
        Ok(())
    }
}
