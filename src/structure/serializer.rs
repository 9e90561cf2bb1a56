use serde::Serialize;
use crate::core::error::Result;
use crate::structure::schema::StructureSchema;

/// Turns an item into the payload stored in the structure table.
pub trait StructureSerializer<T>: Send + Sync {
    fn serialize(&self, item: &T, schema: &StructureSchema) -> Result<String>;
}

/// Stores payloads as compact JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonStructureSerializer;

impl<T: Serialize> StructureSerializer<T> for JsonStructureSerializer {
    fn serialize(&self, item: &T, _schema: &StructureSchema) -> Result<String> {
        Ok(serde_json::to_string(item)?)
    }
}
