//! Statement execution against a PostgreSQL database and result rendering.

pub mod error;
pub mod query;
pub mod render;
pub mod rows;

pub use error::ExecutionError;
pub use query::execute_statement;
pub use render::render_answer;
pub use rows::{Record, ResultSet};
