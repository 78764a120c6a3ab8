//! Schema validation
//!
//! Confirms the required columns exist and the table has rows before any
//! cell is interpreted.

use crate::data::RawTable;
use crate::error::{ForecastError, Result};

/// A table whose schema has been checked against a set of required columns
#[derive(Debug, Clone, Copy)]
pub struct ValidatedTable<'a> {
    table: &'a RawTable,
}

impl<'a> ValidatedTable<'a> {
    pub fn table(&self) -> &'a RawTable {
        self.table
    }

    /// Index of a column that is known to exist after validation
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.table
            .column_index(name)
            .ok_or_else(|| ForecastError::MissingColumn(name.to_string()))
    }
}

/// Check that every required column is present and that the table is not empty.
///
/// Columns are checked before the row count, so a header-only table missing
/// a column reports `MissingColumn`.
pub fn validate<'a, S: AsRef<str>>(
    table: &'a RawTable,
    required_columns: &[S],
) -> Result<ValidatedTable<'a>> {
    if let Some(missing) = required_columns
        .iter()
        .map(AsRef::as_ref)
        .find(|name| !table.has_column(name))
    {
        return Err(ForecastError::MissingColumn(missing.to_string()));
    }

    if table.is_empty() {
        return Err(ForecastError::EmptyInput);
    }

    Ok(ValidatedTable { table })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sales_table(rows: Vec<Vec<&str>>) -> RawTable {
        RawTable::from_rows(["Month", "Sales Amt"], rows).unwrap()
    }

    #[test]
    fn test_missing_value_column() {
        let table = RawTable::from_rows(["Month"], vec![vec!["Jan-24"]]).unwrap();
        let err = validate(&table, &["Month", "Sales Amt"]).unwrap_err();
        assert!(matches!(err, ForecastError::MissingColumn(ref c) if c == "Sales Amt"));
    }

    #[test]
    fn test_empty_table() {
        let table = sales_table(vec![]);
        assert!(matches!(
            validate(&table, &["Month", "Sales Amt"]),
            Err(ForecastError::EmptyInput)
        ));
    }

    #[test]
    fn test_valid_table() {
        let table = sales_table(vec![vec!["Jan-24", "5319"]]);
        let validated = validate(&table, &["Month", "Sales Amt"]).unwrap();
        assert_eq!(validated.column_index("Sales Amt").unwrap(), 1);
        assert_eq!(validated.table().len(), 1);
    }
}
