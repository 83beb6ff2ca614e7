//! Typed predicate compilation for the search query language.
//!
//! A query string is parsed into a [`QueryNode`](query_syntax::QueryNode)
//! tree, its comparison values are cast to each field's declared type, and
//! the result is a [`Predicate`](predicate::Predicate) tree that a storage
//! adapter lowers into its own filter through a
//! [`FilterCompiler`](filter::compiler::FilterCompiler).

pub mod cast;
pub mod compiler;
pub mod error;
pub mod filter;
pub mod predicate;
pub mod search;

pub use compiler::{CompileOptions, QueryCompiler};
pub use error::{CompileError, SearchError};
pub use predicate::{Condition, ConditionKind, Predicate};
pub use search::{Search, SearchTarget};
