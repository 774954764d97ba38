//! The textual description of a database schema.

/// Every base table in the public schema, in catalog-reported order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SchemaDescription {
    pub tables: Vec<TableInfo>,
}

/// One table and its columns, in catalog-reported order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableInfo {
    pub name: String,
    pub columns: Vec<ColumnInfo>,
}

/// One column with its declared data type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
}

impl SchemaDescription {
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

// This rendering is embedded verbatim in the system instruction, so its
// exact shape is part of the prompt contract.
impl std::fmt::Display for SchemaDescription {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for table in &self.tables {
            writeln!(f, "\nTable: {}", table.name)?;
            writeln!(f, "Columns:")?;
            for column in &table.columns {
                writeln!(f, "  - {}: {}", column.name, column.data_type)?;
            }
        }
        Ok(())
    }
}
