//! Storage-side filter trees and the adapters that evaluate them.

pub mod adapter;
pub mod error;
pub mod memory;
pub mod sql;
