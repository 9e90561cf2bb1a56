use serde::{Serialize, Deserialize};
use crate::core::types::{DataTypeCode, IndexValue};

/// Reference to a structure member inside a predicate or sorting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberNode {
    pub path: String,
    pub data_type_code: DataTypeCode,
}

impl MemberNode {
    pub fn new(path: &str, data_type_code: DataTypeCode) -> Self {
        MemberNode {
            path: path.to_string(),
            data_type_code,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    And,
    Or,
    Not,
}

impl Operator {
    pub fn sql(&self) -> &'static str {
        match self {
            Operator::Equal => "=",
            Operator::NotEqual => "<>",
            Operator::LessThan => "<",
            Operator::LessThanOrEqual => "<=",
            Operator::GreaterThan => ">",
            Operator::GreaterThanOrEqual => ">=",
            Operator::And => "and",
            Operator::Or => "or",
            Operator::Not => "not",
        }
    }
}

/// One element of a parsed predicate, in source order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    Member(MemberNode),
    Operator(Operator),
    Value(IndexValue),
    Null,
    StartGroup,
    EndGroup,
    Like { member: MemberNode, pattern: String },
    InSet { member: MemberNode, values: Vec<IndexValue> },
}

/// Portable node sequence produced by the expression parser.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedLambda {
    pub nodes: Vec<Node>,
}

impl ParsedLambda {
    pub fn new() -> Self {
        ParsedLambda { nodes: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn member(mut self, path: &str, data_type_code: DataTypeCode) -> Self {
        self.nodes.push(Node::Member(MemberNode::new(path, data_type_code)));
        self
    }

    pub fn op(mut self, op: Operator) -> Self {
        self.nodes.push(Node::Operator(op));
        self
    }

    pub fn value(mut self, value: impl Into<IndexValue>) -> Self {
        self.nodes.push(Node::Value(value.into()));
        self
    }

    pub fn null(mut self) -> Self {
        self.nodes.push(Node::Null);
        self
    }

    pub fn start_group(mut self) -> Self {
        self.nodes.push(Node::StartGroup);
        self
    }

    pub fn end_group(mut self) -> Self {
        self.nodes.push(Node::EndGroup);
        self
    }

    pub fn like(mut self, path: &str, data_type_code: DataTypeCode, pattern: &str) -> Self {
        self.nodes.push(Node::Like {
            member: MemberNode::new(path, data_type_code),
            pattern: pattern.to_string(),
        });
        self
    }

    pub fn starts_with(self, path: &str, data_type_code: DataTypeCode, value: &str) -> Self {
        let pattern = format!("{}%", escape_like(value));
        self.like(path, data_type_code, &pattern)
    }

    pub fn ends_with(self, path: &str, data_type_code: DataTypeCode, value: &str) -> Self {
        let pattern = format!("%{}", escape_like(value));
        self.like(path, data_type_code, &pattern)
    }

    pub fn contains(self, path: &str, data_type_code: DataTypeCode, value: &str) -> Self {
        let pattern = format!("%{}%", escape_like(value));
        self.like(path, data_type_code, &pattern)
    }

    pub fn in_set(mut self, path: &str, data_type_code: DataTypeCode, values: Vec<IndexValue>) -> Self {
        self.nodes.push(Node::InSet {
            member: MemberNode::new(path, data_type_code),
            values,
        });
        self
    }
}

/// Escapes LIKE wildcards so `value` matches literally.
pub fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '[' => escaped.push_str("[[]"),
            '%' => escaped.push_str("[%]"),
            '_' => escaped.push_str("[_]"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "Asc",
            SortDirection::Desc => "Desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortingNode {
    pub member_path: String,
    pub data_type_code: DataTypeCode,
    pub direction: SortDirection,
}

impl SortingNode {
    pub fn new(member_path: &str, data_type_code: DataTypeCode, direction: SortDirection) -> Self {
        SortingNode {
            member_path: member_path.to_string(),
            data_type_code,
            direction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_off[1]"), "50[%][_]off[[]1]");
    }

    #[test]
    fn starts_with_appends_wildcard() {
        let lambda = ParsedLambda::new().starts_with("Name", DataTypeCode::String, "Jo");
        assert_eq!(
            lambda.nodes,
            vec![Node::Like {
                member: MemberNode::new("Name", DataTypeCode::String),
                pattern: "Jo%".to_string(),
            }]
        );
    }
}
