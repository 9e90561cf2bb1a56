#![allow(dead_code)]

use parking_lot::Mutex;
use serde_json::{Value, json};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use sisodb::core::error::{Error, Result};
use sisodb::core::types::{DataTypeCode, IndexValue};
use sisodb::schema::dropper::DbSchemaDropper;
use sisodb::schema::upserter::DbSchemaUpserter;
use sisodb::sql::client::{DacParameter, DbClient, SqlRow};
use sisodb::structure::accessor::JsonAccessor;
use sisodb::structure::builder::StructureBuilder;
use sisodb::structure::id::StructureIdType;
use sisodb::structure::id_generator::DefaultStructureIdGenerator;
use sisodb::structure::index::UniqueMode;
use sisodb::structure::schema::StructureSchema;
use sisodb::structure::serializer::JsonStructureSerializer;

// =============================================================================
// RECORDING DB CLIENT
// =============================================================================

/// In-memory stand-in for a SQL Server connection.
///
/// Tracks which tables exist, records every statement it is handed and
/// answers key-name reads from a per-table fixture.
#[derive(Default)]
pub struct FakeDbClient {
    tables: Mutex<HashSet<String>>,
    executed: Mutex<Vec<(String, Vec<DacParameter>)>>,
    key_names: Mutex<HashMap<String, Vec<String>>>,
    identities: Mutex<HashMap<String, i64>>,
}

impl FakeDbClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tables(tables: &[&str]) -> Self {
        let client = Self::new();
        for table in tables {
            client.add_table(table);
        }
        client
    }

    pub fn add_table(&self, name: &str) {
        self.tables.lock().insert(name.to_string());
    }

    pub fn has_table(&self, name: &str) -> bool {
        self.tables.lock().contains(name)
    }

    pub fn table_count(&self) -> usize {
        self.tables.lock().len()
    }

    pub fn set_key_names(&self, table: &str, names: &[&str]) {
        self.key_names
            .lock()
            .insert(table.to_string(), names.iter().map(|n| n.to_string()).collect());
    }

    pub fn executed(&self) -> Vec<(String, Vec<DacParameter>)> {
        self.executed.lock().clone()
    }

    pub fn executed_sql(&self) -> Vec<String> {
        self.executed.lock().iter().map(|(sql, _)| sql.clone()).collect()
    }

    pub fn clear_log(&self) {
        self.executed.lock().clear();
    }

    fn bracketed_after<'a>(sql: &'a str, marker: &str) -> Option<&'a str> {
        let start = sql.find(marker)? + marker.len();
        let end = sql[start..].find(']')?;
        Some(&sql[start..start + end])
    }

    fn param<'a>(params: &'a [DacParameter], name: &str) -> Option<&'a IndexValue> {
        params.iter().find(|p| p.name == name).map(|p| &p.value)
    }
}

impl DbClient for FakeDbClient {
    fn execute_non_query(&self, sql: &str, params: &[DacParameter]) -> Result<u64> {
        self.executed.lock().push((sql.to_string(), params.to_vec()));

        if let Some(table) = Self::bracketed_after(sql, "create table [") {
            self.tables.lock().insert(table.to_string());
        }
        if sql.contains("drop table") {
            if let Some(table) = Self::bracketed_after(sql, "drop table [") {
                self.tables.lock().remove(table);
            }
        }
        if let Some(table) = Self::bracketed_after(sql, "delete from [") {
            let stale: Vec<String> = params.iter().map(|p| p.value.to_string()).collect();
            if let Some(names) = self.key_names.lock().get_mut(table) {
                names.retain(|name| !stale.contains(name));
            }
        }
        Ok(1)
    }

    fn execute_scalar(&self, sql: &str, params: &[DacParameter]) -> Result<Option<IndexValue>> {
        self.executed.lock().push((sql.to_string(), params.to_vec()));

        let entity = Self::param(params, "@entityName")
            .and_then(IndexValue::as_str)
            .ok_or_else(|| Error::db("missing @entityName"))?
            .to_string();
        let count = Self::param(params, "@numOfIds")
            .and_then(IndexValue::as_i64)
            .ok_or_else(|| Error::db("missing @numOfIds"))?;

        let mut identities = self.identities.lock();
        let current = identities.entry(entity).or_insert(0);
        *current += count;
        Ok(Some(IndexValue::Integer(*current - count + 1)))
    }

    fn read_sequentially(
        &self,
        sql: &str,
        params: &[DacParameter],
        on_row: &mut dyn FnMut(&SqlRow) -> Result<()>,
    ) -> Result<()> {
        self.executed.lock().push((sql.to_string(), params.to_vec()));

        let rows = Self::bracketed_after(sql, "from [")
            .and_then(|table| self.key_names.lock().get(table).cloned())
            .unwrap_or_default();
        for name in rows {
            on_row(&vec![Some(IndexValue::String(name))])?;
        }
        Ok(())
    }

    fn table_exists(&self, name: &str) -> Result<bool> {
        Ok(self.has_table(name))
    }

    fn column_exists(&self, table_name: &str, _column_name: &str) -> Result<bool> {
        Ok(self.has_table(table_name))
    }
}

// =============================================================================
// SCHEMA STUBS
// =============================================================================

/// Upserter that only counts calls, optionally failing every one of them.
#[derive(Default)]
pub struct CountingUpserter {
    pub calls: AtomicUsize,
    pub fail: AtomicBool,
}

impl CountingUpserter {
    pub fn failing() -> Self {
        let upserter = Self::default();
        upserter.fail.store(true, Ordering::SeqCst);
        upserter
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DbSchemaUpserter for CountingUpserter {
    fn upsert(&self, schema: &StructureSchema, _client: &dyn DbClient) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::db(format!("upsert of '{}' refused", schema.name)));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct CountingDropper {
    pub calls: AtomicUsize,
}

impl DbSchemaDropper for CountingDropper {
    fn drop_structure_set(&self, _schema: &StructureSchema, _client: &dyn DbClient) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// =============================================================================
// FIXTURES
// =============================================================================

pub fn customer_schema() -> StructureSchema {
    StructureSchema::new("Customer", StructureIdType::Guid)
        .add_unique("CustomerNo", DataTypeCode::IntegerNumber, UniqueMode::PerType)
        .add_index("Name", DataTypeCode::String)
        .add_index("Age", DataTypeCode::IntegerNumber)
        .add_enumerable("Tags", DataTypeCode::String)
}

pub fn customer(no: i64, name: &str, age: i64) -> Value {
    json!({
        "CustomerNo": no,
        "Name": name,
        "Age": age,
        "Tags": ["vip", "nordic"],
    })
}

pub fn customers(n: usize) -> Vec<Value> {
    (0..n)
        .map(|i| customer(i as i64 + 1, &format!("Customer {}", i), 20 + (i % 50) as i64))
        .collect()
}

pub fn json_builder() -> StructureBuilder<Value> {
    StructureBuilder::new(
        Arc::new(JsonAccessor::new()),
        Arc::new(JsonStructureSerializer),
        Arc::new(DefaultStructureIdGenerator::in_memory()),
    )
}
