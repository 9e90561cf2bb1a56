use serde::{Serialize, Deserialize};
use std::collections::HashSet;
use crate::core::error::{Error, ErrorKind, Result};
use crate::structure::id::StructureId;
use crate::structure::index::StructureIndex;

/// One stored document: id, serialized payload and its index records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Structure {
    pub name: String,
    pub id: StructureId,
    pub data: Option<String>,
    pub indexes: Vec<StructureIndex>,
    pub uniques: Vec<StructureIndex>,
}

impl Structure {
    pub fn new(
        name: &str,
        id: StructureId,
        indexes: Vec<StructureIndex>,
        data: Option<String>,
    ) -> Result<Self> {
        let uniques: Vec<StructureIndex> = indexes
            .iter()
            .filter(|index| index.is_unique())
            .cloned()
            .collect();

        let mut seen_paths = HashSet::with_capacity(uniques.len());
        if let Some(duplicate_path) = uniques
            .iter()
            .map(|u| u.path.as_str())
            .find(|path| !seen_paths.insert(*path))
        {
            // Report the first record of the offending path
            let duplicate = uniques
                .iter()
                .find(|u| u.path == duplicate_path)
                .unwrap_or(&uniques[0]);
            return Err(Error::new(
                ErrorKind::DuplicateUniqueIndex,
                format!(
                    "Structure '{}' with id '{}' has more than one value for unique index '{}' (value '{}')",
                    name, duplicate.structure_id, duplicate.path, duplicate.value
                ),
            ));
        }

        Ok(Structure {
            name: name.to_string(),
            id,
            data,
            indexes,
            uniques,
        })
    }
}
