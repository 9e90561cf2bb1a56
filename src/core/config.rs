use crate::core::error::Result;
use crate::schema::naming::DbSchemaNamingPolicy;

/// Longest table name prefix accepted by `DbSchemaNamingPolicy`.
pub const MAX_TABLE_NAME_PREFIX_LEN: usize = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub table_name_prefix: String,

    // Structure builder
    pub parallel_build_threshold: usize,        // Batches above this size build in parallel

    // Schema upserts
    pub allow_upserts_of_schemas: bool,         // Run drift repair on existing tables
    pub synchronize_schema_changes: bool,       // Remove stale member paths
}

impl Config {
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.table_name_prefix = prefix.to_string();
        self
    }

    pub fn with_parallel_build_threshold(mut self, threshold: usize) -> Self {
        self.parallel_build_threshold = threshold;
        self
    }

    pub fn validate(&self) -> Result<()> {
        DbSchemaNamingPolicy::from_config(self).map(|_| ())
    }

    /// Schema drift repair only runs when both switches are on.
    pub fn should_synchronize(&self) -> bool {
        self.allow_upserts_of_schemas && self.synchronize_schema_changes
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            table_name_prefix: String::new(),
            parallel_build_threshold: 100,
            allow_upserts_of_schemas: true,
            synchronize_schema_changes: true,
        }
    }
}
