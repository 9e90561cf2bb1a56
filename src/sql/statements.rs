use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use crate::core::error::{Error, ErrorKind, Result};
use crate::schema::naming::IndexTableRole;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(\d+)\}").expect("placeholder pattern is valid"));

/// Replaces positional `{n}` placeholders. Unmatched positions are kept as-is.
pub fn inject_sql(template: &str, args: &[&str]) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &regex::Captures| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|i| args.get(i))
                .map(|arg| arg.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Repository of named SQL statements.
pub trait SqlStatements: Send + Sync {
    fn get_sql(&self, name: &str) -> Result<String>;
}

/// SQL Server 2012+ statements.
pub struct DefaultSqlStatements {
    statements: HashMap<String, String>,
}

impl DefaultSqlStatements {
    pub fn new() -> Self {
        let mut statements = HashMap::new();

        for (suffix, id_column) in Self::id_columns() {
            statements.insert(
                format!("CreateStructures{}", suffix),
                format!(
                    "create table [{{0}}]([StructureId] {} not null, [Json] nvarchar(max) not null, \
                     [RowVersion] rowversion not null, \
                     constraint [PK_{{0}}] primary key clustered([StructureId]));",
                    id_column
                ),
            );
            statements.insert(
                format!("CreateUniques{}", suffix),
                format!(
                    "create table [{{0}}]([StructureId] {id} not null, [UqStructureId] {id} null, \
                     [UqMemberPath] nvarchar(450) not null, [UqValue] nvarchar(450) not null, \
                     constraint [UQ_{{0}}] unique([UqStructureId], [UqMemberPath], [UqValue]), \
                     constraint [FK_{{0}}_{{1}}] foreign key([StructureId]) references [{{1}}]([StructureId]) on delete cascade);",
                    id = id_column
                ),
            );

            for role in IndexTableRole::ALL {
                statements.insert(
                    format!("Create{}Indexes{}", role.suffix(), suffix),
                    Self::create_index_table_sql(role, id_column),
                );
            }
        }

        let fixed = [
            (
                "IndexesSchemaSynchronizer_GetKeyNames",
                "select distinct [MemberPath] from [{0}];",
            ),
            (
                "IndexesSchemaSynchronizer_DeleteRecordsMatchingKeyNames",
                "delete from [{0}] where [MemberPath] in({1});",
            ),
            (
                "UniquesSchemaSynchronizer_GetKeyNames",
                "select distinct [UqMemberPath] from [{0}];",
            ),
            (
                "UniquesSchemaSynchronizer_DeleteRecordsMatchingKeyNames",
                "delete from [{0}] where [UqMemberPath] in({1});",
            ),
            (
                "Query",
                "select {0}s.[Json] from [{1}] s inner join \
                 (select s.[StructureId]{2} from [{1}] s{3}{4} group by s.[StructureId]) rs \
                 on rs.[StructureId] = s.[StructureId] order by {5}{6};",
            ),
            (
                "QueryWithoutPagingAndSorting",
                "select {0}s.[Json] from [{1}] s where s.[StructureId] in \
                 (select s.[StructureId] from [{1}] s{2}{3});",
            ),
            (
                "QueryWithoutDependencies",
                "select {0}s.[Json] from [{1}] s;",
            ),
            (
                "QueryReturningStructureIds",
                "select distinct s.[StructureId] from [{0}] s{1}{2};",
            ),
            (
                "QueryReturningCountOfStructureIds",
                "select count(distinct s.[StructureId]) from [{0}] s{1}{2};",
            ),
            (
                "DropTable",
                "if object_id('[{0}]', 'U') is not null drop table [{0}];",
            ),
            (
                "Sys_Identities_CheckOutAndGetNextIdentity",
                "declare @next bigint; \
                 if not exists(select 1 from [{0}] where [EntityName] = @entityName) \
                 insert into [{0}]([EntityName], [CurrentId]) values(@entityName, 0); \
                 update [{0}] set @next = [CurrentId] = [CurrentId] + @numOfIds where [EntityName] = @entityName; \
                 select @next - @numOfIds + 1;",
            ),
        ];
        for (name, sql) in fixed {
            statements.insert(name.to_string(), sql.to_string());
        }

        DefaultSqlStatements { statements }
    }

    fn id_columns() -> [(&'static str, &'static str); 3] {
        [
            ("String", "nvarchar(128)"),
            ("Guid", "uniqueidentifier"),
            ("Identity", "bigint"),
        ]
    }

    fn value_column_type(role: IndexTableRole) -> &'static str {
        match role {
            IndexTableRole::Integers => "bigint",
            IndexTableRole::Fractals => "float",
            IndexTableRole::Booleans => "bit",
            IndexTableRole::Dates => "datetime2",
            IndexTableRole::Guids => "uniqueidentifier",
            IndexTableRole::Strings => "nvarchar(300)",
            IndexTableRole::Texts => "nvarchar(max)",
        }
    }

    fn create_index_table_sql(role: IndexTableRole, id_column: &str) -> String {
        let value_column = role.value_column();
        let value_type = Self::value_column_type(role);

        let mut sql = if role.has_secondary_lookup_key() {
            format!(
                "create table [{{0}}]([RowId] bigint identity(1,1) not null, [StructureId] {} not null, \
                 [MemberPath] nvarchar(450) not null, [{}] {} null, \
                 constraint [PK_{{0}}] primary key clustered([RowId]), \
                 constraint [FK_{{0}}_{{1}}] foreign key([StructureId]) references [{{1}}]([StructureId]) on delete cascade); \
                 create nonclustered index [IX_{{0}}_SID] on [{{0}}]([StructureId], [MemberPath]);",
                id_column, value_column, value_type
            )
        } else {
            format!(
                "create table [{{0}}]([StructureId] {} not null, [MemberPath] nvarchar(450) not null, [{}] {} null, \
                 constraint [FK_{{0}}_{{1}}] foreign key([StructureId]) references [{{1}}]([StructureId]) on delete cascade); \
                 create clustered index [IXC_{{0}}] on [{{0}}]([StructureId], [MemberPath]);",
                id_column, value_column, value_type
            )
        };

        // nvarchar(max) can not be an index key column
        if role != IndexTableRole::Texts {
            sql.push_str(&format!(
                " create nonclustered index [IX_{{0}}_Value] on [{{0}}]([MemberPath], [{}]) include([StructureId]);",
                value_column
            ));
        }
        sql
    }
}

impl Default for DefaultSqlStatements {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlStatements for DefaultSqlStatements {
    fn get_sql(&self, name: &str) -> Result<String> {
        self.statements.get(name).cloned().ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidArgument,
                format!("No SQL statement named '{}'", name),
            )
        })
    }
}
