use rayon::prelude::*;
use crate::core::error::{Error, ErrorKind, Result};
use crate::structure::accessor::StructureAccessor;
use crate::structure::id::StructureId;
use crate::structure::index::StructureIndex;
use crate::structure::schema::{IndexMember, StructureSchema};

/// Extracts index records for every declared member of `item`.
///
/// Members are extracted in parallel; the result keeps schema member order,
/// then value order within a member. Duplicate values are preserved.
pub fn create_indexes<T: Sync>(
    schema: &StructureSchema,
    item: &T,
    structure_id: &StructureId,
    accessor: &dyn StructureAccessor<T>,
) -> Result<Vec<StructureIndex>> {
    let per_member = schema
        .index_members
        .par_iter()
        .map(|member| create_member_indexes(schema, member, item, structure_id, accessor))
        .collect::<Result<Vec<Vec<StructureIndex>>>>()?;

    Ok(per_member.into_iter().flatten().collect())
}

fn create_member_indexes<T>(
    schema: &StructureSchema,
    member: &IndexMember,
    item: &T,
    structure_id: &StructureId,
    accessor: &dyn StructureAccessor<T>,
) -> Result<Vec<StructureIndex>> {
    let values = accessor.get_values(item, member)?;

    if values.is_empty() {
        if member.is_unique() {
            return Err(Error::new(
                ErrorKind::UniqueIndexMissingValue,
                format!(
                    "Unique index '{}' of structure '{}' has no value (kind {:?})",
                    member.path,
                    schema.name,
                    member.unique_mode
                ),
            ));
        }
        return Ok(Vec::new());
    }

    Ok(values
        .into_iter()
        .map(|value| {
            StructureIndex::new(
                structure_id.clone(),
                member.path.clone(),
                value,
                member.data_type_code,
                member.unique_mode,
            )
        })
        .collect())
}
