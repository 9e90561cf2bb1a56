use serde::{Serialize, Deserialize};
use std::collections::HashSet;
use crate::core::types::DataTypeCode;
use crate::structure::id::StructureIdType;
use crate::structure::index::UniqueMode;

/// Member path the identifier is stored under unless overridden.
pub const DEFAULT_ID_PATH: &str = "StructureId";

/// Identifier member of a structure type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdMember {
    pub path: String,
    pub id_type: StructureIdType,
}

/// Declared indexable member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexMember {
    pub path: String,
    pub data_type_code: DataTypeCode,
    pub unique_mode: Option<UniqueMode>,
    pub is_enumerable: bool,  // Collection member, one record per element
}

impl IndexMember {
    pub fn is_unique(&self) -> bool {
        self.unique_mode.is_some()
    }
}

/// Everything the engine knows about a structure type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructureSchema {
    pub name: String,
    pub id_member: IdMember,
    pub timestamp_member: Option<String>,
    pub index_members: Vec<IndexMember>,
}

impl StructureSchema {
    pub fn new(name: &str, id_type: StructureIdType) -> Self {
        StructureSchema {
            name: name.to_string(),
            id_member: IdMember {
                path: DEFAULT_ID_PATH.to_string(),
                id_type,
            },
            timestamp_member: None,
            index_members: Vec::new(),
        }
    }

    pub fn with_id_path(mut self, path: &str) -> Self {
        self.id_member.path = path.to_string();
        self
    }

    pub fn with_timestamp(mut self, path: &str) -> Self {
        self.timestamp_member = Some(path.to_string());
        self
    }

    pub fn add_index(self, path: &str, data_type_code: DataTypeCode) -> Self {
        self.push_member(path, data_type_code, None, false)
    }

    pub fn add_unique(self, path: &str, data_type_code: DataTypeCode, mode: UniqueMode) -> Self {
        self.push_member(path, data_type_code, Some(mode), false)
    }

    pub fn add_enumerable(self, path: &str, data_type_code: DataTypeCode) -> Self {
        self.push_member(path, data_type_code, None, true)
    }

    fn push_member(
        mut self,
        path: &str,
        data_type_code: DataTypeCode,
        unique_mode: Option<UniqueMode>,
        is_enumerable: bool,
    ) -> Self {
        self.index_members.push(IndexMember {
            path: path.to_string(),
            data_type_code,
            unique_mode,
            is_enumerable,
        });
        self
    }

    pub fn id_type(&self) -> StructureIdType {
        self.id_member.id_type
    }

    pub fn is_id_path(&self, path: &str) -> bool {
        self.id_member.path == path
    }

    pub fn get_member(&self, path: &str) -> Option<&IndexMember> {
        self.index_members.iter().find(|m| m.path == path)
    }

    pub fn member_paths(&self) -> HashSet<&str> {
        self.index_members.iter().map(|m| m.path.as_str()).collect()
    }

    pub fn unique_member_paths(&self) -> HashSet<&str> {
        self.index_members
            .iter()
            .filter(|m| m.is_unique())
            .map(|m| m.path.as_str())
            .collect()
    }
}
