mod common;

use std::sync::Arc;
use std::sync::atomic::Ordering;

use common::{CountingDropper, CountingUpserter, FakeDbClient, customer_schema};
use sisodb::core::config::Config;
use sisodb::core::error::ErrorKind;
use sisodb::schema::ddl::SqlDbSchemaDdlBuilder;
use sisodb::schema::dropper::{DbSchemaDropper, SqlDbSchemaDropper};
use sisodb::schema::manager::DbSchemaManager;
use sisodb::schema::naming::{DbSchemaNamingPolicy, IndexTableRole, ModelTableNames};
use sisodb::schema::synchronizer::DbSchemaSynchronizer;
use sisodb::schema::tables::{IndexesTableStatuses, ModelTableStatuses, ModelTablesInfo};
use sisodb::schema::upserter::{DbSchemaUpserter, SqlDbSchemaUpserter};
use sisodb::sql::statements::{DefaultSqlStatements, SqlStatements};
use sisodb::structure::id::StructureIdType;
use sisodb::structure::schema::StructureSchema;

fn statements() -> Arc<dyn SqlStatements> {
    Arc::new(DefaultSqlStatements::new())
}

fn customer_names() -> ModelTableNames {
    ModelTableNames::new("Customer", &DbSchemaNamingPolicy::default())
}

// =============================================================================
// NAMING
// =============================================================================

#[test]
fn customer_table_names() {
    let names = customer_names();
    assert_eq!(names.structure_table_name, "CustomerStructure");
    assert_eq!(names.uniques_table_name, "CustomerUniques");
    assert_eq!(names.indexes_table_names.get(IndexTableRole::Integers), "CustomerIntegers");
    assert_eq!(names.indexes_table_names.get(IndexTableRole::Texts), "CustomerTexts");
    assert_eq!(names.all_table_names().len(), 9);
}

#[test]
fn prefix_is_applied_to_every_table() {
    let policy = DbSchemaNamingPolicy::new("App_").unwrap();
    let names = ModelTableNames::new("Customer", &policy);
    assert!(names.all_table_names().iter().all(|n| n.starts_with("App_Customer")));
    assert_eq!(names, ModelTableNames::new("Customer", &policy));
}

#[test]
fn prefix_longer_than_ten_is_rejected() {
    let err = DbSchemaNamingPolicy::new("ElevenChars").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PrefixTooLong);

    let config = Config::default().with_prefix("WayTooLongPrefix");
    assert_eq!(config.validate().unwrap_err().kind(), ErrorKind::PrefixTooLong);
    assert!(SqlDbSchemaUpserter::new(statements(), &config).is_err());
}

// =============================================================================
// DDL
// =============================================================================

#[test]
fn ddl_creates_every_missing_table_structure_first() {
    let schema = customer_schema();
    let names = customer_names();
    let statuses = ModelTableStatuses::new(false, false, IndexesTableStatuses::uniform(false));

    let sqls = SqlDbSchemaDdlBuilder::new(statements())
        .generate_sql(&schema, &names, &statuses)
        .unwrap();

    assert_eq!(sqls.len(), 9);
    assert!(sqls[0].starts_with("create table [CustomerStructure]"));
    assert!(sqls[0].contains("uniqueidentifier"));
    assert!(sqls[1].starts_with("create table [CustomerUniques]"));
    assert!(sqls[1].contains("references [CustomerStructure]"));
    assert!(sqls[2].starts_with("create table [CustomerIntegers]"));
    assert!(sqls[7].contains("[RowId]"));
    assert!(!sqls[8].contains("IX_CustomerTexts_Value"));
}

#[test]
fn ddl_is_empty_when_all_tables_exist() {
    let statuses = ModelTableStatuses::new(true, true, IndexesTableStatuses::uniform(true));
    let sqls = SqlDbSchemaDdlBuilder::new(statements())
        .generate_sql(&customer_schema(), &customer_names(), &statuses)
        .unwrap();
    assert!(sqls.is_empty());
}

#[test]
fn ddl_only_covers_missing_index_tables() {
    let schema = StructureSchema::new("Customer", StructureIdType::BigIdentity);
    let index_statuses = IndexesTableStatuses::new(true, true, true, true, true, false, true);
    let statuses = ModelTableStatuses::new(true, true, index_statuses);

    let sqls = SqlDbSchemaDdlBuilder::new(statements())
        .generate_sql(&schema, &customer_names(), &statuses)
        .unwrap();

    assert_eq!(sqls.len(), 1);
    assert!(sqls[0].starts_with("create table [CustomerStrings]"));
    assert!(sqls[0].contains("bigint"));
}

// =============================================================================
// SYNCHRONIZER
// =============================================================================

#[test]
fn stale_index_paths_are_deleted() {
    let client = FakeDbClient::with_tables(&["CustomerStrings"]);
    client.set_key_names("CustomerStrings", &["Name", "Nickname", "Tags"]);

    let removed = DbSchemaSynchronizer::new(statements())
        .synchronize_indexes(&customer_schema(), &client, "CustomerStrings")
        .unwrap();

    assert_eq!(removed, vec!["Nickname".to_string()]);
    let executed = client.executed();
    let (sql, params) = executed.last().unwrap();
    assert_eq!(sql, "delete from [CustomerStrings] where [MemberPath] in(@p0);");
    assert_eq!(params[0].name, "@p0");
    assert_eq!(params[0].value.as_str(), Some("Nickname"));
}

#[test]
fn uniques_are_checked_against_unique_members_only() {
    let client = FakeDbClient::with_tables(&["CustomerUniques"]);
    client.set_key_names("CustomerUniques", &["CustomerNo", "Name"]);

    let removed = DbSchemaSynchronizer::new(statements())
        .synchronize_uniques(&customer_schema(), &client, "CustomerUniques")
        .unwrap();

    assert_eq!(removed, vec!["Name".to_string()]);
}

#[test]
fn nothing_is_deleted_without_drift() {
    let client = FakeDbClient::with_tables(&["CustomerIntegers"]);
    client.set_key_names("CustomerIntegers", &["Age", "CustomerNo"]);

    let removed = DbSchemaSynchronizer::new(statements())
        .synchronize_indexes(&customer_schema(), &client, "CustomerIntegers")
        .unwrap();

    assert!(removed.is_empty());
    assert!(client.executed_sql().iter().all(|sql| !sql.starts_with("delete")));
}

#[test]
fn tables_info_reflects_the_store() {
    let client = FakeDbClient::with_tables(&["CustomerStructure", "CustomerDates"]);
    let info = ModelTablesInfo::load(&client, customer_names()).unwrap();

    assert!(info.statuses.structure_table_exists);
    assert!(!info.statuses.uniques_table_exists);
    assert!(!info.statuses.all_exists);
    assert_eq!(info.existing_index_table_names(), vec!["CustomerDates"]);
}

// =============================================================================
// UPSERT / DROP
// =============================================================================

#[test]
fn upsert_creates_the_full_table_set() {
    let client = FakeDbClient::new();
    let upserter = SqlDbSchemaUpserter::new(statements(), &Config::default()).unwrap();

    upserter.upsert(&customer_schema(), &client).unwrap();

    for name in customer_names().all_table_names() {
        assert!(client.has_table(name), "missing {}", name);
    }
    assert_eq!(client.table_count(), 9);
}

#[test]
fn upsert_of_existing_set_only_synchronizes() {
    let names = customer_names();
    let client = FakeDbClient::with_tables(&names.all_table_names());
    client.set_key_names("CustomerIntegers", &["Age", "Retired"]);

    let upserter = SqlDbSchemaUpserter::new(statements(), &Config::default()).unwrap();
    upserter.upsert(&customer_schema(), &client).unwrap();

    let sqls = client.executed_sql();
    assert!(sqls.iter().all(|sql| !sql.starts_with("create table")));
    assert!(sqls.iter().any(|sql| sql == "delete from [CustomerIntegers] where [MemberPath] in(@p0);"));
}

#[test]
fn synchronization_can_be_switched_off() {
    let names = customer_names();
    let client = FakeDbClient::with_tables(&names.all_table_names());
    client.set_key_names("CustomerIntegers", &["Retired"]);

    let config = Config {
        synchronize_schema_changes: false,
        ..Config::default()
    };
    SqlDbSchemaUpserter::new(statements(), &config)
        .unwrap()
        .upsert(&customer_schema(), &client)
        .unwrap();

    assert!(client.executed().is_empty());
}

#[test]
fn drop_removes_children_before_the_structure_table() {
    let names = customer_names();
    let client = FakeDbClient::with_tables(&names.all_table_names());

    SqlDbSchemaDropper::new(statements(), &Config::default())
        .unwrap()
        .drop_structure_set(&customer_schema(), &client)
        .unwrap();

    assert_eq!(client.table_count(), 0);
    let sqls = client.executed_sql();
    assert_eq!(sqls.len(), 9);
    assert!(sqls[7].contains("[CustomerUniques]"));
    assert!(sqls[8].contains("[CustomerStructure]"));
}

// =============================================================================
// MANAGER
// =============================================================================

#[test]
fn repeated_upserts_hit_the_store_once() {
    let upserter = Arc::new(CountingUpserter::default());
    let manager = DbSchemaManager::new(upserter.clone(), Arc::new(CountingDropper::default()));
    let client = FakeDbClient::new();
    let schema = customer_schema();

    manager.upsert_structure_set(&schema, &client).unwrap();
    manager.upsert_structure_set(&schema, &client).unwrap();

    assert_eq!(upserter.calls(), 1);
    assert!(manager.is_cached("Customer"));
}

#[test]
fn failed_upsert_is_not_cached() {
    let upserter = Arc::new(CountingUpserter::failing());
    let manager = DbSchemaManager::new(upserter.clone(), Arc::new(CountingDropper::default()));
    let client = FakeDbClient::new();
    let schema = customer_schema();

    assert_eq!(
        manager.upsert_structure_set(&schema, &client).unwrap_err().kind(),
        ErrorKind::Db
    );
    assert!(!manager.is_cached("Customer"));

    upserter.fail.store(false, Ordering::SeqCst);
    manager.upsert_structure_set(&schema, &client).unwrap();
    assert_eq!(upserter.calls(), 2);
}

#[test]
fn drop_forgets_the_structure_set() {
    let upserter = Arc::new(CountingUpserter::default());
    let dropper = Arc::new(CountingDropper::default());
    let manager = DbSchemaManager::new(upserter.clone(), dropper.clone());
    let client = FakeDbClient::new();
    let schema = customer_schema();

    manager.upsert_structure_set(&schema, &client).unwrap();
    manager.drop_structure_set(&schema, &client).unwrap();
    manager.upsert_structure_set(&schema, &client).unwrap();

    assert_eq!(dropper.calls.load(Ordering::SeqCst), 1);
    assert_eq!(upserter.calls(), 2);
}

#[test]
fn concurrent_upserts_of_one_name_run_once() {
    let upserter = Arc::new(CountingUpserter::default());
    let manager = Arc::new(DbSchemaManager::new(upserter.clone(), Arc::new(CountingDropper::default())));
    let schema = Arc::new(customer_schema());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let manager = manager.clone();
            let schema = schema.clone();
            std::thread::spawn(move || {
                let client = FakeDbClient::new();
                manager.upsert_structure_set(&schema, &client).unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(upserter.calls(), 1);
}

#[test]
fn sql_manager_creates_tables_once() {
    let manager = DbSchemaManager::with_sql(statements(), &Config::default()).unwrap();
    let client = FakeDbClient::new();
    let schema = customer_schema();

    manager.upsert_structure_set(&schema, &client).unwrap();
    let after_first = client.executed().len();
    manager.upsert_structure_set(&schema, &client).unwrap();

    assert_eq!(client.executed().len(), after_first);
    assert_eq!(client.table_count(), 9);

    manager.clear_cache();
    assert!(!manager.is_cached("Customer"));
}
