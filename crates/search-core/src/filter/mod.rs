//! Lowering of predicate trees into storage-specific filters.

pub mod compiler;
pub mod memory;
pub mod sql;
