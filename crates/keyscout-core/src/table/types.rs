use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{KeyScoutError, Result};
use crate::table::value::Value;

/// A named column of raw cell values, in row order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<Value>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_null()).count()
    }

    /// Iterate the non-null values in row order.
    pub fn non_null(&self) -> impl Iterator<Item = &Value> {
        self.values.iter().filter(|v| !v.is_null())
    }
}

/// One ingested dataset: ordered columns of equal length.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub row_count: usize,
    pub columns: IndexMap<String, Column>,
}

impl Table {
    /// Build a table, taking the row count from the first column.
    ///
    /// Fails if the columns differ in length or a column name repeats.
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Result<Self> {
        let row_count = columns.first().map(|c| c.len()).unwrap_or(0);
        Self::with_row_count(name, row_count, columns)
    }

    /// Build a table with an explicit row count every column must match.
    pub fn with_row_count(
        name: impl Into<String>,
        row_count: usize,
        columns: Vec<Column>,
    ) -> Result<Self> {
        let name = name.into();
        let mut map = IndexMap::with_capacity(columns.len());
        for column in columns {
            if map.contains_key(&column.name) {
                return Err(KeyScoutError::DuplicateColumn {
                    table: name,
                    column: column.name,
                });
            }
            map.insert(column.name.clone(), column);
        }

        let table = Self {
            name,
            row_count,
            columns: map,
        };
        table.validate()?;
        Ok(table)
    }

    /// Check that every column holds exactly `row_count` values.
    pub fn validate(&self) -> Result<()> {
        for (col_name, column) in &self.columns {
            if column.len() != self.row_count {
                return Err(KeyScoutError::RaggedTable {
                    table: self.name.clone(),
                    column: col_name.clone(),
                    expected: self.row_count,
                    actual: column.len(),
                });
            }
        }
        Ok(())
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }
}

/// The collection of tables analysed in one run, in supplied order.
///
/// Insertion order is the iteration order of every pipeline stage, so it
/// also fixes the order of the resulting relationship list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableSet {
    tables: IndexMap<String, Table>,
}

impl TableSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tables(tables: impl IntoIterator<Item = Table>) -> Result<Self> {
        let mut set = Self::new();
        for table in tables {
            set.insert(table)?;
        }
        Ok(set)
    }

    /// Add a table. Names must be unique within the set.
    pub fn insert(&mut self, table: Table) -> Result<()> {
        if self.tables.contains_key(&table.name) {
            return Err(KeyScoutError::DuplicateTable { table: table.name });
        }
        self.tables.insert(table.name.clone(), table);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Table)> {
        self.tables.iter()
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn column_count(&self) -> usize {
        self.tables.values().map(|t| t.column_count()).sum()
    }

    /// Validate every table's shape.
    pub fn validate(&self) -> Result<()> {
        self.tables.values().try_for_each(Table::validate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(values: &[i64]) -> Vec<Value> {
        values.iter().map(|&v| Value::Int(v)).collect()
    }

    #[test]
    fn test_new_takes_row_count_from_first_column() {
        let table = Table::new(
            "users",
            vec![
                Column::new("id", ints(&[1, 2, 3])),
                Column::new("age", ints(&[30, 40, 50])),
            ],
        )
        .unwrap();
        assert_eq!(table.row_count, 3);
        assert_eq!(table.column_count(), 2);
        let names: Vec<&String> = table.columns.keys().collect();
        assert_eq!(names, ["id", "age"]);
    }

    #[test]
    fn test_ragged_table_rejected() {
        let err = Table::new(
            "users",
            vec![
                Column::new("id", ints(&[1, 2, 3])),
                Column::new("age", ints(&[30, 40])),
            ],
        )
        .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("users"), "{}", msg);
        assert!(msg.contains("age"), "{}", msg);
        assert!(matches!(
            err,
            KeyScoutError::RaggedTable {
                expected: 3,
                actual: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let err = Table::new(
            "users",
            vec![Column::new("id", ints(&[1])), Column::new("id", ints(&[2]))],
        )
        .unwrap_err();
        assert!(matches!(err, KeyScoutError::DuplicateColumn { .. }));
    }

    #[test]
    fn test_table_without_columns_is_empty() {
        let table = Table::new("empty", Vec::new()).unwrap();
        assert_eq!(table.row_count, 0);
        assert_eq!(table.column_count(), 0);
    }

    #[test]
    fn test_table_set_rejects_duplicate_names() {
        let a = Table::new("a", vec![Column::new("x", ints(&[1]))]).unwrap();
        let mut set = TableSet::from_tables(vec![a.clone()]).unwrap();
        assert!(matches!(
            set.insert(a),
            Err(KeyScoutError::DuplicateTable { .. })
        ));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_table_set_validate_catches_mutated_table() {
        let mut a = Table::new("a", vec![Column::new("x", ints(&[1, 2]))]).unwrap();
        a.columns["x"].values.pop();
        let set = TableSet::from_tables(vec![a]).unwrap();
        assert!(set.validate().is_err());
    }

    #[test]
    fn test_null_count_and_non_null() {
        let col = Column::new(
            "c",
            vec![Value::Int(1), Value::Null, Value::Float(f64::NAN), Value::Int(2)],
        );
        assert_eq!(col.null_count(), 2);
        assert_eq!(col.non_null().count(), 2);
    }
}
