use std::collections::HashMap;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{DataTypeCode, IndexValue};
use crate::query::lambda::{MemberNode, Node, Operator, ParsedLambda, SortDirection};
use crate::query::query::StructureQuery;
use crate::sql::client::DacParameter;
use crate::structure::schema::StructureSchema;

/// Id column of the base structure table.
pub const STRUCTURE_ID_COLUMN: &str = "s.[StructureId]";

/// Member joined in from its index table as `memN`
#[derive(Debug, Clone, PartialEq)]
pub struct SqlMember {
    pub index: usize,
    pub alias: String,
    pub path: String,
    pub data_type_code: DataTypeCode,
}

impl SqlMember {
    pub fn value_column(&self) -> String {
        format!("{}.[{}]", self.alias, self.data_type_code.value_column())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SqlSortingMember {
    pub alias: Option<String>,  // None when sorting on the structure id
    pub path: String,
    pub data_type_code: DataTypeCode,
    pub direction: SortDirection,
}

impl SqlSortingMember {
    pub fn is_structure_id(&self) -> bool {
        self.alias.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlWhereCriteria {
    pub criteria: String,
    pub parameters: Vec<DacParameter>,
}

impl SqlWhereCriteria {
    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }
}

/// A query translated against the index-table layout
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlExpression {
    pub members: Vec<SqlMember>,
    pub where_criteria: SqlWhereCriteria,
    pub sorting_members: Vec<SqlSortingMember>,
}

/// Assigns join aliases and renders the where criteria of a query.
///
/// Aliases are handed out in first-seen order, where members before sort
/// members, and shared by every reference to the same path.
pub struct SqlExpressionBuilder<'a> {
    schema: &'a StructureSchema,
    members: Vec<SqlMember>,
    aliases: HashMap<String, usize>,
}

impl<'a> SqlExpressionBuilder<'a> {
    pub fn new(schema: &'a StructureSchema) -> Self {
        SqlExpressionBuilder {
            schema,
            members: Vec::new(),
            aliases: HashMap::new(),
        }
    }

    pub fn process(schema: &StructureSchema, query: &StructureQuery) -> Result<SqlExpression> {
        let mut builder = SqlExpressionBuilder::new(schema);

        let where_criteria = match &query.where_lambda {
            Some(lambda) if !lambda.is_empty() => builder.build_where(lambda)?,
            _ => SqlWhereCriteria::default(),
        };

        let sorting_members = query
            .sortings
            .iter()
            .map(|sorting| {
                let alias = if schema.is_id_path(&sorting.member_path) {
                    None
                } else {
                    let index = builder.register(&MemberNode::new(&sorting.member_path, sorting.data_type_code));
                    Some(builder.members[index].alias.clone())
                };
                SqlSortingMember {
                    alias,
                    path: sorting.member_path.clone(),
                    data_type_code: sorting.data_type_code,
                    direction: sorting.direction,
                }
            })
            .collect();

        Ok(SqlExpression {
            members: builder.members,
            where_criteria,
            sorting_members,
        })
    }

    fn register(&mut self, member: &MemberNode) -> usize {
        if let Some(index) = self.aliases.get(&member.path) {
            return *index;
        }

        let index = self.members.len();
        self.members.push(SqlMember {
            index,
            alias: format!("mem{}", index),
            path: member.path.clone(),
            data_type_code: member.data_type_code,
        });
        self.aliases.insert(member.path.clone(), index);
        index
    }

    fn column_for(&mut self, member: &MemberNode) -> String {
        if self.schema.is_id_path(&member.path) {
            return STRUCTURE_ID_COLUMN.to_string();
        }
        let index = self.register(member);
        self.members[index].value_column()
    }

    fn build_where(&mut self, lambda: &ParsedLambda) -> Result<SqlWhereCriteria> {
        let mut tokens: Vec<String> = Vec::with_capacity(lambda.nodes.len());
        let mut parameters: Vec<DacParameter> = Vec::new();
        let mut nodes = lambda.nodes.iter().peekable();
        while let Some(node) = nodes.next() {
            match node {
                Node::Member(member) => tokens.push(self.column_for(member)),
                Node::Operator(op @ (Operator::Equal | Operator::NotEqual))
                    if matches!(nodes.peek(), Some(Node::Null)) =>
                {
                    nodes.next();
                    let test = if *op == Operator::Equal { "is null" } else { "is not null" };
                    tokens.push(test.to_string());
                }
                Node::Operator(op) => tokens.push(op.sql().to_string()),
                Node::Value(value) => tokens.push(add_param(&mut parameters, value.clone())),
                Node::Null => tokens.push("null".to_string()),
                Node::StartGroup => tokens.push("(".to_string()),
                Node::EndGroup => tokens.push(")".to_string()),
                Node::Like { member, pattern } => {
                    let column = self.column_for(member);
                    let param = add_param(&mut parameters, IndexValue::from(pattern.as_str()));
                    tokens.push(format!("{} like {}", column, param));
                }
                Node::InSet { member, values } => {
                    let column = self.column_for(member);
                    if values.is_empty() {
                        tokens.push("1 = 0".to_string());
                    } else {
                        let params: Vec<String> = values
                            .iter()
                            .map(|value| add_param(&mut parameters, value.clone()))
                            .collect();
                        tokens.push(format!("{} in({})", column, params.join(", ")));
                    }
                }
            }
        }

        let depth = tokens.iter().try_fold(0i32, |depth, token| match token.as_str() {
            "(" => Some(depth + 1),
            ")" if depth > 0 => Some(depth - 1),
            ")" => None,
            _ => Some(depth),
        });
        if depth != Some(0) {
            return Err(Error::new(
                ErrorKind::InvalidArgument,
                format!("Unbalanced groups in where clause of '{}'", self.schema.name),
            ));
        }

        Ok(SqlWhereCriteria {
            criteria: join_tokens(&tokens),
            parameters,
        })
    }
}

fn add_param(parameters: &mut Vec<DacParameter>, value: IndexValue) -> String {
    let name = format!("@p{}", parameters.len());
    parameters.push(DacParameter::new(&name, value));
    name
}

fn join_tokens(tokens: &[String]) -> String {
    let mut sql = String::new();
    let mut previous: Option<&str> = None;
    for token in tokens {
        let glued = previous.is_none_or(|p| p == "(") || token == ")";
        if !glued {
            sql.push(' ');
        }
        sql.push_str(token);
        previous = Some(token.as_str());
    }
    sql
}
