use crate::ast::{literal::RawValue, operator::Operator};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Parse tree of a search query.
///
/// The shape fixes evaluation precedence: consumers fold it as-is and never
/// re-balance it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QueryNode {
    /// Free text matched against every searchable field
    Term(String),
    Comparison {
        key: String,
        operator: Operator,
        value: RawValue,
    },
    And(Box<QueryNode>, Box<QueryNode>),
    Or(Box<QueryNode>, Box<QueryNode>),
    Not(Box<QueryNode>),
}

impl QueryNode {
    pub fn term(text: impl Into<String>) -> Self {
        QueryNode::Term(text.into())
    }

    pub fn comparison(key: impl Into<String>, operator: Operator, value: impl Into<RawValue>) -> Self {
        QueryNode::Comparison {
            key: key.into(),
            operator,
            value: value.into(),
        }
    }

    pub fn and(left: QueryNode, right: QueryNode) -> Self {
        QueryNode::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: QueryNode, right: QueryNode) -> Self {
        QueryNode::Or(Box::new(left), Box::new(right))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(right: QueryNode) -> Self {
        QueryNode::Not(Box::new(right))
    }

    /// Number of terms and comparisons in the tree.
    pub fn leaf_count(&self) -> usize {
        match self {
            QueryNode::Term(_) | QueryNode::Comparison { .. } => 1,
            QueryNode::And(left, right) | QueryNode::Or(left, right) => {
                left.leaf_count() + right.leaf_count()
            }
            QueryNode::Not(right) => right.leaf_count(),
        }
    }
}

impl fmt::Display for QueryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryNode::Term(text) => write!(f, "{text:?}"),
            QueryNode::Comparison {
                key,
                operator,
                value,
            } => write!(f, "{key}{operator}{value}"),
            QueryNode::And(left, right) => write!(f, "({left} and {right})"),
            QueryNode::Or(left, right) => write!(f, "({left} or {right})"),
            QueryNode::Not(right) => write!(f, "not {right}"),
        }
    }
}
