//! # Path Expressions
//!
//! A restricted JSONPath-like language for locating values in JSON documents:
//! - `$.` root marker followed by `.`-separated segments
//! - literal keys addressing a direct child, e.g. `innerClinic`
//! - the `*` wildcard, a breadth-first search over every nested object
//! - `[@.attr]` and `[@.attr='regex']` conditions on a segment
//! - a terminal `@parent` returning the key the previous match is stored under

pub mod ast;
pub mod condition;
pub mod parser;

// Re-exports
pub use ast::*;
pub use condition::{Condition, parse_condition};
pub use parser::{PathError, parse_path};
