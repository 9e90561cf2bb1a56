use serde::{Serialize, Deserialize};
use crate::core::types::{DataTypeCode, IndexValue};
use crate::structure::id::StructureId;

/// How a unique member is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UniqueMode {
    PerInstance,  // Unique within one structure
    PerType,      // Unique across every structure of the same name
}

/// One queryable (member path, value) pair of a structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructureIndex {
    pub structure_id: StructureId,
    pub path: String,
    pub value: IndexValue,
    pub data_type_code: DataTypeCode,
    pub unique_mode: Option<UniqueMode>,
}

impl StructureIndex {
    pub fn new(
        structure_id: StructureId,
        path: impl Into<String>,
        value: IndexValue,
        data_type_code: DataTypeCode,
        unique_mode: Option<UniqueMode>,
    ) -> Self {
        StructureIndex {
            structure_id,
            path: path.into(),
            value,
            data_type_code,
            unique_mode,
        }
    }

    pub fn is_unique(&self) -> bool {
        self.unique_mode.is_some()
    }
}

impl PartialEq for StructureIndex {
    fn eq(&self, other: &Self) -> bool {
        self.structure_id == other.structure_id
            && self.path == other.path
            && self.value == other.value
    }
}
