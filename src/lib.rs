pub mod core;
pub mod structure;
pub mod sql;
pub mod schema;
pub mod query;

/*
┌──────────────────────────────── SISODB LAYOUT ────────────────────────────────┐
│                                                                                │
│  structure   item ──► StructureBuilder ──► Structure { id, json, indexes }     │
│              (accessor, serializer, id generator, indexes factory)             │
│                                                                                │
│  schema      StructureSchema ──► DbSchemaManager ──► upserter / dropper        │
│              (naming, table statuses, DDL builder, synchronizer)               │
│                                                                                │
│  query       StructureQuery ──► SqlExpressionBuilder ──► DbQueryGenerator      │
│              (parsed lambda, sortings, paging)                                 │
│                                                                                │
│  sql         SqlStatements templates, DbClient seam                            │
│                                                                                │
│  Tables per structure set "Customer":                                          │
│    CustomerStructure  CustomerUniques                                          │
│    CustomerIntegers  CustomerFractals  CustomerBooleans  CustomerDates         │
│    CustomerGuids  CustomerStrings  CustomerTexts                               │
└────────────────────────────────────────────────────────────────────────────────┘
*/

pub use crate::core::config::Config;
pub use crate::core::error::{Error, ErrorKind, Result};
pub use crate::core::types::{DataTypeCode, IndexValue};
pub use crate::query::generator::{DbQuery, DbQueryGenerator};
pub use crate::query::lambda::{Operator, ParsedLambda, SortDirection};
pub use crate::query::query::{Paging, StructureQuery};
pub use crate::schema::manager::DbSchemaManager;
pub use crate::sql::client::{DacParameter, DbClient};
pub use crate::sql::statements::{DefaultSqlStatements, SqlStatements};
pub use crate::structure::builder::{IdStrategy, StructureBuilder};
pub use crate::structure::id::{StructureId, StructureIdType};
pub use crate::structure::schema::StructureSchema;
pub use crate::structure::structure::Structure;
