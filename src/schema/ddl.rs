use std::sync::Arc;
use tracing::debug;
use crate::core::error::Result;
use crate::schema::naming::{IndexTableRole, ModelTableNames};
use crate::schema::tables::ModelTableStatuses;
use crate::sql::statements::{SqlStatements, inject_sql};
use crate::structure::id::StructureIdType;
use crate::structure::schema::StructureSchema;

/// Template family used for an identifier kind.
pub fn id_template_suffix(id_type: StructureIdType) -> &'static str {
    match id_type {
        StructureIdType::String => "String",
        StructureIdType::Guid => "Guid",
        StructureIdType::Identity | StructureIdType::BigIdentity => "Identity",
    }
}

/// Generates CREATE TABLE SQL for the tables of a structure that do not exist yet
pub struct SqlDbSchemaDdlBuilder {
    statements: Arc<dyn SqlStatements>,
}

impl SqlDbSchemaDdlBuilder {
    pub fn new(statements: Arc<dyn SqlStatements>) -> Self {
        SqlDbSchemaDdlBuilder { statements }
    }

    /// Statements for every absent table, structure table first. Empty when all exist.
    pub fn generate_sql(
        &self,
        schema: &StructureSchema,
        names: &ModelTableNames,
        statuses: &ModelTableStatuses,
    ) -> Result<Vec<String>> {
        let mut sqls = Vec::new();
        if statuses.all_exists {
            return Ok(sqls);
        }

        let suffix = id_template_suffix(schema.id_type());

        if !statuses.structure_table_exists {
            sqls.push(self.render(
                &format!("CreateStructures{}", suffix),
                &[&names.structure_table_name],
            )?);
        }

        if !statuses.uniques_table_exists {
            sqls.push(self.render(
                &format!("CreateUniques{}", suffix),
                &[&names.uniques_table_name, &names.structure_table_name],
            )?);
        }

        let index_statuses = &statuses.indexes_table_statuses;
        if !index_statuses.all_exists {
            for role in IndexTableRole::ALL {
                if index_statuses.exists(role) {
                    continue;
                }
                sqls.push(self.render(
                    &format!("Create{}Indexes{}", role.suffix(), suffix),
                    &[names.indexes_table_names.get(role), &names.structure_table_name],
                )?);
            }
        }

        debug!(structure = %schema.name, tables = sqls.len(), "generated create table statements");
        Ok(sqls)
    }

    fn render(&self, template_name: &str, args: &[&str]) -> Result<String> {
        Ok(inject_sql(&self.statements.get_sql(template_name)?, args))
    }
}
