//! The materialized result of one statement.

use indexmap::IndexMap;
use serde_json::Value;

/// One result row: column name to scalar value, in projection order.
pub type Record = IndexMap<String, Value>;

/// All rows produced by one statement, fetched eagerly. Column names are
/// present even when no rows came back; a statement without column
/// metadata yields an empty collection of names.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub records: Vec<Record>,
}

impl ResultSet {
    pub fn new(columns: Vec<String>, records: Vec<Record>) -> Self {
        Self { columns, records }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn records_preserve_projection_order() {
        let record: Record = IndexMap::from([
            ("name".to_string(), json!("Ada")),
            ("id".to_string(), json!(1)),
        ]);

        let keys: Vec<&String> = record.keys().collect();
        assert_eq!(keys, ["name", "id"]);
    }

    #[test]
    fn empty_result_still_carries_columns() {
        let result = ResultSet::new(vec!["id".to_string(), "name".to_string()], vec![]);
        assert!(result.is_empty());
        assert_eq!(result.columns, ["id", "name"]);
    }
}
