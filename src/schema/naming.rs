use serde::{Serialize, Deserialize};
use crate::core::config::{Config, MAX_TABLE_NAME_PREFIX_LEN};
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::DataTypeCode;

pub const STRUCTURE_TABLE_SUFFIX: &str = "Structure";
pub const UNIQUES_TABLE_SUFFIX: &str = "Uniques";

/// The seven per-type index tables of a structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndexTableRole {
    Integers,
    Fractals,
    Booleans,
    Dates,
    Guids,
    Strings,
    Texts,
}

impl IndexTableRole {
    pub const ALL: [IndexTableRole; 7] = [
        IndexTableRole::Integers,
        IndexTableRole::Fractals,
        IndexTableRole::Booleans,
        IndexTableRole::Dates,
        IndexTableRole::Guids,
        IndexTableRole::Strings,
        IndexTableRole::Texts,
    ];

    pub fn suffix(&self) -> &'static str {
        match self {
            IndexTableRole::Integers => "Integers",
            IndexTableRole::Fractals => "Fractals",
            IndexTableRole::Booleans => "Booleans",
            IndexTableRole::Dates => "Dates",
            IndexTableRole::Guids => "Guids",
            IndexTableRole::Strings => "Strings",
            IndexTableRole::Texts => "Texts",
        }
    }

    /// Unrecognized codes fall back to the Strings table.
    pub fn from_type_code(code: DataTypeCode) -> Self {
        match code {
            DataTypeCode::IntegerNumber => IndexTableRole::Integers,
            DataTypeCode::FractalNumber => IndexTableRole::Fractals,
            DataTypeCode::Bool => IndexTableRole::Booleans,
            DataTypeCode::DateTime => IndexTableRole::Dates,
            DataTypeCode::Guid => IndexTableRole::Guids,
            DataTypeCode::Text => IndexTableRole::Texts,
            DataTypeCode::String | DataTypeCode::Enum | DataTypeCode::Unknown => IndexTableRole::Strings,
        }
    }

    pub fn value_column(&self) -> &'static str {
        match self {
            IndexTableRole::Integers => "IntegerValue",
            IndexTableRole::Fractals => "FractalValue",
            IndexTableRole::Booleans => "BoolValue",
            IndexTableRole::Dates => "DateTimeValue",
            IndexTableRole::Guids => "GuidValue",
            IndexTableRole::Strings | IndexTableRole::Texts => "StringValue",
        }
    }

    /// Tables whose value column is too wide for a clustered key carry a
    /// surrogate `RowId` key instead.
    pub fn has_secondary_lookup_key(&self) -> bool {
        matches!(self, IndexTableRole::Strings | IndexTableRole::Texts)
    }
}

/// Table name prefix applied to every structure table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DbSchemaNamingPolicy {
    prefix: String,
}

impl DbSchemaNamingPolicy {
    pub fn new(prefix: &str) -> Result<Self> {
        if prefix.chars().count() > MAX_TABLE_NAME_PREFIX_LEN {
            return Err(Error::new(
                ErrorKind::PrefixTooLong,
                format!(
                    "Table name prefix '{}' exceeds maximum length {}",
                    prefix, MAX_TABLE_NAME_PREFIX_LEN
                ),
            ));
        }
        Ok(DbSchemaNamingPolicy { prefix: prefix.to_string() })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.table_name_prefix)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn generate_for(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name)
    }

    pub fn table_name(&self, structure_name: &str, suffix: &str) -> String {
        format!("{}{}", self.generate_for(structure_name), suffix)
    }
}

/// Names of the seven index tables of one structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexesTableNames {
    pub integers_table_name: String,
    pub fractals_table_name: String,
    pub booleans_table_name: String,
    pub dates_table_name: String,
    pub guids_table_name: String,
    pub strings_table_name: String,
    pub texts_table_name: String,
}

impl IndexesTableNames {
    pub fn new(structure_name: &str, policy: &DbSchemaNamingPolicy) -> Self {
        let name = |role: IndexTableRole| policy.table_name(structure_name, role.suffix());

        IndexesTableNames {
            integers_table_name: name(IndexTableRole::Integers),
            fractals_table_name: name(IndexTableRole::Fractals),
            booleans_table_name: name(IndexTableRole::Booleans),
            dates_table_name: name(IndexTableRole::Dates),
            guids_table_name: name(IndexTableRole::Guids),
            strings_table_name: name(IndexTableRole::Strings),
            texts_table_name: name(IndexTableRole::Texts),
        }
    }

    pub fn get(&self, role: IndexTableRole) -> &str {
        match role {
            IndexTableRole::Integers => &self.integers_table_name,
            IndexTableRole::Fractals => &self.fractals_table_name,
            IndexTableRole::Booleans => &self.booleans_table_name,
            IndexTableRole::Dates => &self.dates_table_name,
            IndexTableRole::Guids => &self.guids_table_name,
            IndexTableRole::Strings => &self.strings_table_name,
            IndexTableRole::Texts => &self.texts_table_name,
        }
    }

    pub fn get_name_by_type(&self, code: DataTypeCode) -> &str {
        self.get(IndexTableRole::from_type_code(code))
    }

    pub fn role_of(&self, table_name: &str) -> Option<IndexTableRole> {
        IndexTableRole::ALL.into_iter().find(|role| self.get(*role) == table_name)
    }

    pub fn has_secondary_lookup_key(&self, table_name: &str) -> bool {
        self.role_of(table_name)
            .is_some_and(|role| role.has_secondary_lookup_key())
    }

    /// Names in `IndexTableRole::ALL` order.
    pub fn all_table_names(&self) -> Vec<&str> {
        IndexTableRole::ALL.iter().map(|role| self.get(*role)).collect()
    }
}

/// Every table name of one structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelTableNames {
    pub structure_table_name: String,
    pub uniques_table_name: String,
    pub indexes_table_names: IndexesTableNames,
}

impl ModelTableNames {
    pub fn new(structure_name: &str, policy: &DbSchemaNamingPolicy) -> Self {
        ModelTableNames {
            structure_table_name: policy.table_name(structure_name, STRUCTURE_TABLE_SUFFIX),
            uniques_table_name: policy.table_name(structure_name, UNIQUES_TABLE_SUFFIX),
            indexes_table_names: IndexesTableNames::new(structure_name, policy),
        }
    }

    /// Structure, uniques, then the seven index tables.
    pub fn all_table_names(&self) -> Vec<&str> {
        let mut names = Vec::with_capacity(2 + IndexTableRole::ALL.len());
        names.push(self.structure_table_name.as_str());
        names.push(self.uniques_table_name.as_str());
        names.extend(self.indexes_table_names.all_table_names());
        names
    }
}
