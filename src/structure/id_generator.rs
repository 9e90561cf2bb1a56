use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::IndexValue;
use crate::sql::client::{DacParameter, DbClient};
use crate::sql::statements::{SqlStatements, inject_sql};
use crate::structure::id::{StructureId, StructureIdType};
use crate::structure::schema::StructureSchema;

/// System table holding one identity counter per structure name.
pub const IDENTITIES_TABLE_NAME: &str = "SisoDbIdentities";

/// Hands out contiguous blocks of identity values.
pub trait IdentityCounter: Send + Sync {
    /// Reserves `num_of_ids` values and returns the first one.
    fn check_out(&self, entity_name: &str, num_of_ids: usize) -> Result<i64>;
}

/// Process-local counters, starting at 1.
#[derive(Default)]
pub struct InMemoryIdentityCounter {
    counters: Mutex<HashMap<String, i64>>,
}

impl InMemoryIdentityCounter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdentityCounter for InMemoryIdentityCounter {
    fn check_out(&self, entity_name: &str, num_of_ids: usize) -> Result<i64> {
        let mut counters = self.counters.lock();
        let current = counters.entry(entity_name.to_string()).or_insert(0);
        let first = *current + 1;
        *current += num_of_ids as i64;
        Ok(first)
    }
}

/// Counters persisted in the `SisoDbIdentities` table.
pub struct DbIdentityCounter {
    client: Arc<dyn DbClient>,
    statements: Arc<dyn SqlStatements>,
}

impl DbIdentityCounter {
    pub fn new(client: Arc<dyn DbClient>, statements: Arc<dyn SqlStatements>) -> Self {
        DbIdentityCounter { client, statements }
    }
}

impl IdentityCounter for DbIdentityCounter {
    fn check_out(&self, entity_name: &str, num_of_ids: usize) -> Result<i64> {
        let template = self.statements.get_sql("Sys_Identities_CheckOutAndGetNextIdentity")?;
        let sql = inject_sql(&template, &[IDENTITIES_TABLE_NAME]);
        let params = [
            DacParameter::new("@entityName", entity_name),
            DacParameter::new("@numOfIds", num_of_ids as i64),
        ];

        match self.client.execute_scalar(&sql, &params)? {
            Some(IndexValue::Integer(first)) => Ok(first),
            other => Err(Error::db(format!(
                "Identity checkout for '{}' returned {:?}",
                entity_name, other
            ))),
        }
    }
}

/// Produces new structure ids.
pub trait StructureIdGenerator: Send + Sync {
    fn generate(&self, schema: &StructureSchema) -> Result<StructureId> {
        self.generate_block(schema, 1)?
            .pop()
            .ok_or_else(|| Error::new(ErrorKind::InvalidOperation, "Id generator returned no id"))
    }

    /// Reserves `num_of_ids` ids up front, in assignment order.
    fn generate_block(&self, schema: &StructureSchema, num_of_ids: usize) -> Result<Vec<StructureId>>;
}

/// Sequential guids for guid structures, identity blocks for identity structures.
pub struct DefaultStructureIdGenerator {
    identities: Arc<dyn IdentityCounter>,
}

impl DefaultStructureIdGenerator {
    pub fn new(identities: Arc<dyn IdentityCounter>) -> Self {
        DefaultStructureIdGenerator { identities }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryIdentityCounter::new()))
    }
}

impl StructureIdGenerator for DefaultStructureIdGenerator {
    fn generate_block(&self, schema: &StructureSchema, num_of_ids: usize) -> Result<Vec<StructureId>> {
        if num_of_ids == 0 {
            return Ok(Vec::new());
        }

        match schema.id_type() {
            StructureIdType::Guid => Ok((0..num_of_ids)
                .map(|_| StructureId::create_guid(Uuid::now_v7()))
                .collect()),
            StructureIdType::BigIdentity => {
                let first = self.identities.check_out(&schema.name, num_of_ids)?;
                Ok((0..num_of_ids as i64)
                    .map(|offset| StructureId::create_big_identity(first + offset))
                    .collect())
            }
            // A block that crosses i32::MAX is still checked out before it is
            // rejected, so the counter stays past the limit.
            StructureIdType::Identity => {
                if num_of_ids > i32::MAX as usize {
                    return Err(Error::new(
                        ErrorKind::InvalidOperation,
                        format!(
                            "Can not reserve {} identities for '{}', the limit is {}",
                            num_of_ids, schema.name, i32::MAX
                        ),
                    ));
                }
                let first = self.identities.check_out(&schema.name, num_of_ids)?;
                let last = first + num_of_ids as i64 - 1;
                if last > i32::MAX as i64 {
                    return Err(Error::new(
                        ErrorKind::InvalidOperation,
                        format!(
                            "Identity for '{}' overflowed: {} exceeds {}",
                            schema.name, last, i32::MAX
                        ),
                    ));
                }
                Ok((first..=last)
                    .map(|value| StructureId::create_identity(value as i32))
                    .collect())
            }
            StructureIdType::String => Err(Error::new(
                ErrorKind::InvalidOperation,
                format!("Structure '{}' uses string ids which must be assigned by the caller", schema.name),
            )),
        }
    }
}
