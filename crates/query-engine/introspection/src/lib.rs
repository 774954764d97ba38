//! Catalog introspection against a PostgreSQL database.
//!
//! The schema description is rebuilt fresh on every request and passed
//! through the pipeline as an explicit argument, so staleness cannot occur.

pub mod error;
pub mod introspect;
pub mod schema;

pub use error::IntrospectionError;
pub use introspect::introspect_schema;
pub use schema::{ColumnInfo, SchemaDescription, TableInfo};
