use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};
use crate::core::config::Config;
use crate::core::error::Result;
use crate::schema::dropper::{DbSchemaDropper, SqlDbSchemaDropper};
use crate::schema::upserter::{DbSchemaUpserter, SqlDbSchemaUpserter};
use crate::sql::client::DbClient;
use crate::sql::statements::SqlStatements;
use crate::structure::schema::StructureSchema;

/// Remembers which structure sets are already materialized, so upserts
/// hit the store once per structure name.
///
/// One lock covers the membership check and the work that follows, which
/// keeps concurrent upserts of the same name down to one.
pub struct DbSchemaManager {
    upserted: Mutex<HashSet<String>>,
    upserter: Arc<dyn DbSchemaUpserter>,
    dropper: Arc<dyn DbSchemaDropper>,
}

impl DbSchemaManager {
    pub fn new(upserter: Arc<dyn DbSchemaUpserter>, dropper: Arc<dyn DbSchemaDropper>) -> Self {
        DbSchemaManager {
            upserted: Mutex::new(HashSet::new()),
            upserter,
            dropper,
        }
    }

    pub fn with_sql(statements: Arc<dyn SqlStatements>, config: &Config) -> Result<Self> {
        Ok(Self::new(
            Arc::new(SqlDbSchemaUpserter::new(statements.clone(), config)?),
            Arc::new(SqlDbSchemaDropper::new(statements, config)?),
        ))
    }

    pub fn upsert_structure_set(&self, schema: &StructureSchema, client: &dyn DbClient) -> Result<()> {
        let mut upserted = self.upserted.lock();
        if upserted.contains(&schema.name) {
            debug!(structure = %schema.name, "structure set already upserted");
            return Ok(());
        }

        info!(structure = %schema.name, "upserting structure set");
        self.upserter.upsert(schema, client)?;
        upserted.insert(schema.name.clone());
        info!(structure = %schema.name, "structure set upserted");

        Ok(())
    }

    pub fn drop_structure_set(&self, schema: &StructureSchema, client: &dyn DbClient) -> Result<()> {
        let mut upserted = self.upserted.lock();
        upserted.remove(&schema.name);

        info!(structure = %schema.name, "dropping structure set");
        self.dropper.drop_structure_set(schema, client)
    }

    pub fn remove_from_cache(&self, schema: &StructureSchema) {
        self.upserted.lock().remove(&schema.name);
    }

    pub fn clear_cache(&self) {
        self.upserted.lock().clear();
    }

    pub fn is_cached(&self, structure_name: &str) -> bool {
        self.upserted.lock().contains(structure_name)
    }
}
