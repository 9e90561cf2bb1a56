use std::collections::HashSet;
use std::sync::Arc;
use tracing::warn;
use crate::core::error::Result;
use crate::schema::tables::ModelTablesInfo;
use crate::sql::client::{DacParameter, DbClient};
use crate::sql::statements::{SqlStatements, inject_sql};
use crate::structure::schema::StructureSchema;

/// Removes rows for member paths the structure type no longer declares.
///
/// Index and uniques tables are key/value rows, so drift is repaired by
/// deleting rows, never by altering columns.
pub struct DbSchemaSynchronizer {
    statements: Arc<dyn SqlStatements>,
}

impl DbSchemaSynchronizer {
    pub fn new(statements: Arc<dyn SqlStatements>) -> Self {
        DbSchemaSynchronizer { statements }
    }

    /// Synchronizes every existing uniques and index table. Missing tables are skipped.
    pub fn synchronize(
        &self,
        schema: &StructureSchema,
        client: &dyn DbClient,
        info: &ModelTablesInfo,
    ) -> Result<()> {
        if info.statuses.uniques_table_exists {
            self.synchronize_uniques(schema, client, info.uniques_table_name())?;
        }

        for table_name in info.existing_index_table_names() {
            self.synchronize_indexes(schema, client, table_name)?;
        }

        Ok(())
    }

    pub fn synchronize_indexes(
        &self,
        schema: &StructureSchema,
        client: &dyn DbClient,
        table_name: &str,
    ) -> Result<Vec<String>> {
        self.remove_stale_paths(
            schema,
            client,
            table_name,
            &schema.member_paths(),
            "IndexesSchemaSynchronizer_GetKeyNames",
            "IndexesSchemaSynchronizer_DeleteRecordsMatchingKeyNames",
        )
    }

    pub fn synchronize_uniques(
        &self,
        schema: &StructureSchema,
        client: &dyn DbClient,
        table_name: &str,
    ) -> Result<Vec<String>> {
        self.remove_stale_paths(
            schema,
            client,
            table_name,
            &schema.unique_member_paths(),
            "UniquesSchemaSynchronizer_GetKeyNames",
            "UniquesSchemaSynchronizer_DeleteRecordsMatchingKeyNames",
        )
    }

    fn remove_stale_paths(
        &self,
        schema: &StructureSchema,
        client: &dyn DbClient,
        table_name: &str,
        declared_paths: &HashSet<&str>,
        get_key_names: &str,
        delete_key_names: &str,
    ) -> Result<Vec<String>> {
        let sql = inject_sql(&self.statements.get_sql(get_key_names)?, &[table_name]);
        let stored_paths = client.read_strings(&sql, &[])?;

        let stale: Vec<String> = stored_paths
            .into_iter()
            .filter(|path| !declared_paths.contains(path.as_str()))
            .collect();

        if stale.is_empty() {
            return Ok(stale);
        }

        warn!(
            structure = %schema.name,
            table = table_name,
            paths = ?stale,
            "removing rows of member paths no longer declared"
        );

        let params: Vec<DacParameter> = stale
            .iter()
            .enumerate()
            .map(|(i, path)| DacParameter::new(&format!("@p{}", i), path.as_str()))
            .collect();
        let placeholders = params
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        let sql = inject_sql(
            &self.statements.get_sql(delete_key_names)?,
            &[table_name, &placeholders],
        );
        client.execute_non_query(&sql, &params)?;

        Ok(stale)
    }
}
