use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{DataTypeCode, IndexValue};
use crate::structure::id::{StructureId, StructureIdType};
use crate::structure::schema::{IndexMember, StructureSchema};

/// Member access on items of type `T`, keyed by member path.
pub trait StructureAccessor<T>: Send + Sync {
    /// Reads the id member. A missing value yields an empty id of the schema's kind.
    fn get_id(&self, schema: &StructureSchema, item: &T) -> Result<StructureId>;

    fn set_id(&self, schema: &StructureSchema, item: &mut T, id: &StructureId) -> Result<()>;

    /// All scalar values found under the member's path. Null members yield none.
    fn get_values(&self, item: &T, member: &IndexMember) -> Result<Vec<IndexValue>>;

    fn set_timestamp(&self, item: &mut T, path: &str, timestamp: DateTime<Utc>) -> Result<()>;
}

/// Accessor for `serde_json::Value` documents using dotted member paths.
///
/// Arrays met along a path are flattened, so `Orders.Lines.Sku` yields
/// one value per line of every order.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonAccessor;

impl JsonAccessor {
    pub fn new() -> Self {
        JsonAccessor
    }

    /// Walks `segments` below `value`. Arrays are only walked into for
    /// enumerable members; anywhere else they are rejected.
    fn collect_leaves<'a>(
        value: &'a Value,
        segments: &[&str],
        member: &IndexMember,
        out: &mut Vec<&'a Value>,
    ) -> Result<()> {
        match value {
            Value::Array(items) => {
                if !member.is_enumerable {
                    return Err(Error::new(
                        ErrorKind::InvalidArgument,
                        format!("Member '{}' holds a collection but is not declared enumerable", member.path),
                    ));
                }
                for item in items {
                    Self::collect_leaves(item, segments, member, out)?;
                }
                Ok(())
            }
            Value::Null => Ok(()),
            _ => match segments.split_first() {
                None => {
                    out.push(value);
                    Ok(())
                }
                Some((head, rest)) => match value.get(*head) {
                    Some(child) => Self::collect_leaves(child, rest, member, out),
                    None => Ok(()),
                },
            },
        }
    }

    fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
        path.split('.').try_fold(value, |current, segment| current.get(segment))
    }

    fn assign(item: &mut Value, path: &str, new_value: Value) -> Result<()> {
        let segments: Vec<&str> = path.split('.').collect();
        let (last, parents) = match segments.split_last() {
            Some(split) => split,
            None => return Err(Error::new(ErrorKind::InvalidArgument, "Empty member path")),
        };

        let mut current = item;
        for segment in parents {
            current = Self::as_object(current, path)?
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
        }
        Self::as_object(current, path)?.insert(last.to_string(), new_value);
        Ok(())
    }

    fn as_object<'a>(value: &'a mut Value, path: &str) -> Result<&'a mut Map<String, Value>> {
        if value.is_null() {
            *value = Value::Object(Map::new());
        }
        value.as_object_mut().ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidArgument,
                format!("Can not assign member '{}' on a non-object value", path),
            )
        })
    }

    fn convert(value: &Value, member: &IndexMember) -> Result<IndexValue> {
        let converted = match (member.data_type_code, value) {
            (DataTypeCode::IntegerNumber, Value::Number(n)) => n.as_i64().map(IndexValue::Integer),
            (DataTypeCode::FractalNumber, Value::Number(n)) => n.as_f64().map(IndexValue::Fractal),
            (DataTypeCode::Bool, Value::Bool(b)) => Some(IndexValue::Bool(*b)),
            (DataTypeCode::DateTime, Value::String(s)) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| IndexValue::DateTime(dt.with_timezone(&Utc))),
            (DataTypeCode::Guid, Value::String(s)) => Uuid::parse_str(s).ok().map(IndexValue::Guid),
            (
                DataTypeCode::String | DataTypeCode::Text | DataTypeCode::Enum | DataTypeCode::Unknown,
                Value::String(s),
            ) => Some(IndexValue::String(s.clone())),
            (
                DataTypeCode::String | DataTypeCode::Text | DataTypeCode::Enum | DataTypeCode::Unknown,
                Value::Number(_) | Value::Bool(_),
            ) => Some(IndexValue::String(value.to_string())),
            _ => None,
        };

        converted.ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidArgument,
                format!(
                    "Member '{}' holds '{}' which is not a {:?} value",
                    member.path, value, member.data_type_code
                ),
            )
        })
    }
}

impl StructureAccessor<Value> for JsonAccessor {
    fn get_id(&self, schema: &StructureSchema, item: &Value) -> Result<StructureId> {
        let id_type = schema.id_type();
        let raw = match Self::lookup(item, &schema.id_member.path) {
            None | Some(Value::Null) => return Ok(StructureId::empty(id_type)),
            Some(raw) => raw,
        };

        match (id_type, raw) {
            (StructureIdType::Identity, Value::Number(n)) => n
                .as_i64()
                .and_then(|v| i32::try_from(v).ok())
                .map(StructureId::create_identity)
                .ok_or_else(|| Error::new(ErrorKind::InvalidArgument, format!("Invalid identity '{}'", n))),
            (StructureIdType::BigIdentity, Value::Number(n)) => n
                .as_i64()
                .map(StructureId::create_big_identity)
                .ok_or_else(|| Error::new(ErrorKind::InvalidArgument, format!("Invalid identity '{}'", n))),
            (_, Value::String(s)) => StructureId::create_from_string(Some(s.as_str()), id_type),
            (_, other) => Err(Error::new(
                ErrorKind::InvalidArgument,
                format!("Id member '{}' holds unsupported value '{}'", schema.id_member.path, other),
            )),
        }
    }

    fn set_id(&self, schema: &StructureSchema, item: &mut Value, id: &StructureId) -> Result<()> {
        let value = match id {
            StructureId::Identity(Some(v)) => Value::from(*v),
            StructureId::BigIdentity(Some(v)) => Value::from(*v),
            StructureId::Guid(Some(v)) => Value::from(v.hyphenated().to_string()),
            StructureId::String(Some(v)) => Value::from(v.clone()),
            _ => Value::Null,
        };
        Self::assign(item, &schema.id_member.path, value)
    }

    fn get_values(&self, item: &Value, member: &IndexMember) -> Result<Vec<IndexValue>> {
        let segments: Vec<&str> = member.path.split('.').collect();
        let mut leaves = Vec::new();
        Self::collect_leaves(item, &segments, member, &mut leaves)?;

        leaves.into_iter().map(|leaf| Self::convert(leaf, member)).collect()
    }

    fn set_timestamp(&self, item: &mut Value, path: &str, timestamp: DateTime<Utc>) -> Result<()> {
        Self::assign(item, path, Value::from(timestamp.to_rfc3339()))
    }
}
