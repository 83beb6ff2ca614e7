//! Search query grammar and the typed parse tree it produces.

pub mod ast;
pub mod builder;
pub mod errors;
pub mod parser;

pub use ast::{
    literal::{Literal, RawValue},
    node::QueryNode,
    operator::{Comparator, Operator},
};
pub use builder::parse;
pub use errors::ParseError;
