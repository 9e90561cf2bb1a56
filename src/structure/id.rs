use serde::{Serialize, Deserialize};
use std::any::Any;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use crate::core::error::{Error, ErrorKind, Result};

/// Kind of primary key a structure uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructureIdType {
    String,
    Guid,
    Identity,
    BigIdentity,
}

impl StructureIdType {
    pub fn is_identity(&self) -> bool {
        matches!(self, StructureIdType::Identity | StructureIdType::BigIdentity)
    }
}

impl FromStr for StructureIdType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "String" => Ok(StructureIdType::String),
            "Guid" => Ok(StructureIdType::Guid),
            "Identity" => Ok(StructureIdType::Identity),
            "BigIdentity" => Ok(StructureIdType::BigIdentity),
            other => Err(Error::new(
                ErrorKind::UnsupportedIdentifierKind,
                format!("Unsupported identifier kind '{}'", other),
            )),
        }
    }
}

/// Primary key of a structure. Every kind may lack a value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructureId {
    Identity(Option<i32>),
    BigIdentity(Option<i64>),
    Guid(Option<Uuid>),
    String(Option<String>),
}

impl StructureId {
    pub fn create_identity(value: i32) -> Self {
        StructureId::Identity(Some(value))
    }

    pub fn create_identity_opt(value: Option<i32>) -> Self {
        StructureId::Identity(value)
    }

    pub fn create_big_identity(value: i64) -> Self {
        StructureId::BigIdentity(Some(value))
    }

    pub fn create_big_identity_opt(value: Option<i64>) -> Self {
        StructureId::BigIdentity(value)
    }

    pub fn create_guid(value: Uuid) -> Self {
        StructureId::Guid(Some(value))
    }

    pub fn create_guid_opt(value: Option<Uuid>) -> Self {
        StructureId::Guid(value)
    }

    pub fn create_string(value: impl Into<String>) -> Self {
        StructureId::String(Some(value.into()))
    }

    pub fn create_string_opt(value: Option<String>) -> Self {
        StructureId::String(value)
    }

    /// An id of the given kind without a value.
    pub fn empty(id_type: StructureIdType) -> Self {
        match id_type {
            StructureIdType::Identity => StructureId::Identity(None),
            StructureIdType::BigIdentity => StructureId::BigIdentity(None),
            StructureIdType::Guid => StructureId::Guid(None),
            StructureIdType::String => StructureId::String(None),
        }
    }

    /// Infers the kind from the runtime type of `value`.
    pub fn convert_from(value: &dyn Any) -> Result<Self> {
        if let Some(v) = value.downcast_ref::<i32>() {
            return Ok(StructureId::create_identity(*v));
        }
        if let Some(v) = value.downcast_ref::<Option<i32>>() {
            return Ok(StructureId::Identity(*v));
        }
        if let Some(v) = value.downcast_ref::<i64>() {
            return Ok(StructureId::create_big_identity(*v));
        }
        if let Some(v) = value.downcast_ref::<Option<i64>>() {
            return Ok(StructureId::BigIdentity(*v));
        }
        if let Some(v) = value.downcast_ref::<Uuid>() {
            return Ok(StructureId::create_guid(*v));
        }
        if let Some(v) = value.downcast_ref::<Option<Uuid>>() {
            return Ok(StructureId::Guid(*v));
        }
        if let Some(v) = value.downcast_ref::<String>() {
            return Ok(StructureId::create_string(v.clone()));
        }
        if let Some(v) = value.downcast_ref::<&str>() {
            return Ok(StructureId::create_string(*v));
        }
        if let Some(v) = value.downcast_ref::<Option<String>>() {
            return Ok(StructureId::String(v.clone()));
        }
        if let Some(v) = value.downcast_ref::<StructureId>() {
            return Ok(v.clone());
        }

        Err(Error::new(
            ErrorKind::InvalidOperation,
            "Could not infer an identifier kind from the given value",
        ))
    }

    /// Parses `value` into `id_type`. Blank input yields an empty id.
    ///
    /// Whitespace is trimmed before numeric and guid parsing only; string
    /// ids keep the value as given.
    pub fn create_from_string(value: Option<&str>, id_type: StructureIdType) -> Result<Self> {
        let (raw, trimmed) = match value {
            Some(v) if !v.trim().is_empty() => (v, v.trim()),
            _ => return Ok(StructureId::empty(id_type)),
        };

        match id_type {
            StructureIdType::Identity => Ok(StructureId::create_identity(trimmed.parse()?)),
            StructureIdType::BigIdentity => Ok(StructureId::create_big_identity(trimmed.parse()?)),
            StructureIdType::Guid => Ok(StructureId::create_guid(Uuid::parse_str(trimmed)?)),
            StructureIdType::String => Ok(StructureId::create_string(raw)),
        }
    }

    pub fn id_type(&self) -> StructureIdType {
        match self {
            StructureId::Identity(_) => StructureIdType::Identity,
            StructureId::BigIdentity(_) => StructureIdType::BigIdentity,
            StructureId::Guid(_) => StructureIdType::Guid,
            StructureId::String(_) => StructureIdType::String,
        }
    }

    pub fn has_value(&self) -> bool {
        match self {
            StructureId::Identity(v) => v.is_some(),
            StructureId::BigIdentity(v) => v.is_some(),
            StructureId::Guid(v) => v.is_some(),
            StructureId::String(v) => v.is_some(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            StructureId::Identity(v) => v.is_none_or(|v| v <= 0),
            StructureId::BigIdentity(v) => v.is_none_or(|v| v <= 0),
            StructureId::Guid(v) => v.is_none_or(|v| v.is_nil()),
            StructureId::String(v) => v.as_deref().is_none_or(|v| v.trim().is_empty()),
        }
    }

    /// Orders ids of the same kind; a missing value sorts first.
    pub fn compare_to(&self, other: &StructureId) -> Result<Ordering> {
        match (self, other) {
            (StructureId::Identity(a), StructureId::Identity(b)) => Ok(a.cmp(b)),
            (StructureId::BigIdentity(a), StructureId::BigIdentity(b)) => Ok(a.cmp(b)),
            (StructureId::Guid(a), StructureId::Guid(b)) => Ok(a.cmp(b)),
            (StructureId::String(a), StructureId::String(b)) => Ok(a.cmp(b)),
            _ => Err(Error::new(
                ErrorKind::InvalidOperation,
                format!(
                    "Can not compare identifiers of different kinds ({:?} and {:?})",
                    self.id_type(),
                    other.id_type()
                ),
            )),
        }
    }

    pub fn get_smallest(x: &StructureId, y: &StructureId) -> Result<StructureId> {
        match x.compare_to(y)? {
            Ordering::Greater => Ok(y.clone()),
            _ => Ok(x.clone()),
        }
    }
}

impl fmt::Display for StructureId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StructureId::Identity(Some(v)) => write!(f, "{}", v),
            StructureId::BigIdentity(Some(v)) => write!(f, "{}", v),
            StructureId::Guid(Some(v)) => write!(f, "{}", v.hyphenated()),
            StructureId::String(Some(v)) => write!(f, "{}", v),
            _ => Ok(()),
        }
    }
}
