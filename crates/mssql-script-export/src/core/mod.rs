//! Core data model shared by the formatter, assembler, and collaborators.

pub mod identifier;
pub mod schema;
pub mod traits;
pub mod value;

pub use schema::{Column, ColumnKind, Table};
pub use traits::{RowSource, ScriptSink};
pub use value::ScriptValue;
