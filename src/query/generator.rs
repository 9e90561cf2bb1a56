use serde::Serialize;
use std::sync::Arc;
use tracing::debug;
use crate::core::config::Config;
use crate::core::error::{Error, ErrorKind, Result};
use crate::query::expression::{SqlExpression, SqlExpressionBuilder, STRUCTURE_ID_COLUMN};
use crate::query::query::StructureQuery;
use crate::schema::naming::{DbSchemaNamingPolicy, ModelTableNames};
use crate::sql::client::DacParameter;
use crate::sql::statements::{SqlStatements, inject_sql};
use crate::structure::schema::StructureSchema;

pub const SKIP_ROWS_PARAM: &str = "@skipRows";
pub const TAKE_ROWS_PARAM: &str = "@takeRows";

/// Parameterized SQL ready for the DB client
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DbQuery {
    pub sql: String,
    pub parameters: Vec<DacParameter>,
    pub is_cacheable: bool,
}

/// Builds SQL for structure queries against the index-table layout
pub struct DbQueryGenerator {
    statements: Arc<dyn SqlStatements>,
    naming: DbSchemaNamingPolicy,
}

impl DbQueryGenerator {
    pub fn new(statements: Arc<dyn SqlStatements>, config: &Config) -> Result<Self> {
        Ok(DbQueryGenerator {
            statements,
            naming: DbSchemaNamingPolicy::from_config(config)?,
        })
    }

    pub fn generate_query(&self, query: &StructureQuery, schema: &StructureSchema) -> Result<DbQuery> {
        if (query.has_paging() || query.has_skip()) && !query.has_sortings() {
            return Err(Error::new(
                ErrorKind::PagingRequiresSorting,
                format!("Paging or skip on '{}' requires at least one sorting", schema.name),
            ));
        }

        if query.has_no_dependencies() {
            return self.generate_query_without_dependencies(query, schema);
        }

        let names = self.table_names(schema);
        let expression = SqlExpressionBuilder::process(schema, query)?;

        if !query.has_paging() && !query.has_skip() && !query.has_sortings() {
            debug!(structure = %schema.name, shape = "QueryWithoutPagingAndSorting", "generating query");
            let sql = inject_sql(
                &self.statements.get_sql("QueryWithoutPagingAndSorting")?,
                &[
                    &take_sql(query),
                    &names.structure_table_name,
                    &joins_sql(&expression, &names),
                    &where_sql(&expression),
                ],
            );
            return Ok(DbQuery {
                sql,
                parameters: expression.where_criteria.parameters,
                is_cacheable: query.is_cacheable,
            });
        }

        debug!(structure = %schema.name, shape = "Query", "generating query");
        let (paging_sql, paging_parameters) = paging_sql(query)?;
        let sql = inject_sql(
            &self.statements.get_sql("Query")?,
            &[
                &take_sql(query),
                &names.structure_table_name,
                &order_by_members_sql(&expression),
                &joins_sql(&expression, &names),
                &where_sql(&expression),
                &order_by_sql(&expression),
                &paging_sql,
            ],
        );

        let mut parameters = expression.where_criteria.parameters;
        parameters.extend(paging_parameters);

        Ok(DbQuery {
            sql,
            parameters,
            is_cacheable: query.is_cacheable,
        })
    }

    /// Bare select of the structure table, limited by a literal take if any.
    pub fn generate_query_without_dependencies(
        &self,
        query: &StructureQuery,
        schema: &StructureSchema,
    ) -> Result<DbQuery> {
        debug!(structure = %schema.name, shape = "QueryWithoutDependencies", "generating query");
        let names = self.table_names(schema);
        let sql = inject_sql(
            &self.statements.get_sql("QueryWithoutDependencies")?,
            &[&take_sql(query), &names.structure_table_name],
        );

        Ok(DbQuery {
            sql,
            parameters: Vec::new(),
            is_cacheable: query.is_cacheable,
        })
    }

    pub fn generate_query_returning_structure_ids(
        &self,
        query: &StructureQuery,
        schema: &StructureSchema,
    ) -> Result<DbQuery> {
        self.generate_where_only("QueryReturningStructureIds", query, schema)
    }

    pub fn generate_query_returning_count_of_structure_ids(
        &self,
        query: &StructureQuery,
        schema: &StructureSchema,
    ) -> Result<DbQuery> {
        self.generate_where_only("QueryReturningCountOfStructureIds", query, schema)
    }

    fn generate_where_only(
        &self,
        template_name: &str,
        query: &StructureQuery,
        schema: &StructureSchema,
    ) -> Result<DbQuery> {
        if query.has_skip() || query.has_take() || query.has_sortings() || query.has_paging() {
            return Err(Error::new(
                ErrorKind::OnlyWhereAllowed,
                format!("{} on '{}' accepts only a where clause", template_name, schema.name),
            ));
        }
        if !query.has_where() {
            return Err(Error::new(
                ErrorKind::MissingWhere,
                format!("{} on '{}' requires a where clause", template_name, schema.name),
            ));
        }

        debug!(structure = %schema.name, shape = template_name, "generating query");
        let names = self.table_names(schema);
        let expression = SqlExpressionBuilder::process(schema, query)?;
        let sql = inject_sql(
            &self.statements.get_sql(template_name)?,
            &[
                &names.structure_table_name,
                &joins_sql(&expression, &names),
                &where_sql(&expression),
            ],
        );

        Ok(DbQuery {
            sql,
            parameters: expression.where_criteria.parameters,
            is_cacheable: query.is_cacheable,
        })
    }

    fn table_names(&self, schema: &StructureSchema) -> ModelTableNames {
        ModelTableNames::new(&schema.name, &self.naming)
    }
}

fn take_sql(query: &StructureQuery) -> String {
    match query.take_num {
        Some(take) if !query.has_paging() && !query.has_skip() => format!("top({}) ", take),
        _ => String::new(),
    }
}

fn joins_sql(expression: &SqlExpression, names: &ModelTableNames) -> String {
    expression
        .members
        .iter()
        .map(|member| {
            format!(
                " left join [{table}] {alias} on {alias}.[StructureId] = {id} and {alias}.[MemberPath] = '{path}'",
                table = names.indexes_table_names.get_name_by_type(member.data_type_code),
                alias = member.alias,
                id = STRUCTURE_ID_COLUMN,
                path = member.path.replace('\'', "''"),
            )
        })
        .collect()
}

fn where_sql(expression: &SqlExpression) -> String {
    if expression.where_criteria.is_empty() {
        String::new()
    } else {
        format!(" where {}", expression.where_criteria.criteria)
    }
}

/// `min(...)` projections keep one row per structure for one-to-many members.
fn order_by_members_sql(expression: &SqlExpression) -> String {
    expression
        .sorting_members
        .iter()
        .filter_map(|sorting| {
            let alias = sorting.alias.as_ref()?;
            Some(format!(
                ", min({}.[{}]) {}",
                alias,
                sorting.data_type_code.value_column(),
                alias
            ))
        })
        .collect()
}

fn order_by_sql(expression: &SqlExpression) -> String {
    expression
        .sorting_members
        .iter()
        .map(|sorting| match &sorting.alias {
            Some(alias) => format!("rs.[{}] {}", alias, sorting.direction.sql()),
            None => format!("{} {}", STRUCTURE_ID_COLUMN, sorting.direction.sql()),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn paging_sql(query: &StructureQuery) -> Result<(String, Vec<DacParameter>)> {
    let (skip, take) = match (query.paging, query.skip_num) {
        (Some(paging), _) => (paging.skip()?, Some(paging.take())),
        (None, Some(skip)) => (skip, query.take_num),
        (None, None) => return Ok((String::new(), Vec::new())),
    };

    let mut sql = format!(" offset {} rows", SKIP_ROWS_PARAM);
    let mut parameters = vec![DacParameter::new(SKIP_ROWS_PARAM, row_count(SKIP_ROWS_PARAM, skip)?)];
    if let Some(take) = take {
        sql.push_str(&format!(" fetch next {} rows only", TAKE_ROWS_PARAM));
        parameters.push(DacParameter::new(TAKE_ROWS_PARAM, row_count(TAKE_ROWS_PARAM, take)?));
    }
    Ok((sql, parameters))
}

fn row_count(param: &str, value: usize) -> Result<i64> {
    i64::try_from(value).map_err(|_| {
        Error::new(
            ErrorKind::InvalidArgument,
            format!("{} value {} does not fit a bigint", param, value),
        )
    })
}
