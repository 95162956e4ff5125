//! Dataset schemas.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{Error, Result};

/// Type of a dataset column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ColumnType {
    /// Text
    #[default]
    String,
    /// Fixed-point number
    Decimal,
    /// 64-bit integer
    Long,
    /// Floating-point number
    Double,
    /// Calendar date
    Date,
    /// Date and time
    Datetime,
}

impl ColumnType {
    /// Guess the column type for a sample value.
    ///
    /// Integers map to `LONG`, other numbers to `DOUBLE`, and everything
    /// else (booleans included) to `STRING`.
    ///
    /// ```
    /// use domo_sdk::models::ColumnType;
    /// use serde_json::json;
    ///
    /// assert_eq!(ColumnType::detect(&json!(42)), ColumnType::Long);
    /// assert_eq!(ColumnType::detect(&json!(4.2)), ColumnType::Double);
    /// assert_eq!(ColumnType::detect(&json!(true)), ColumnType::String);
    /// ```
    pub fn detect(value: &Value) -> Self {
        match value {
            Value::Number(n) if n.is_i64() || n.is_u64() => ColumnType::Long,
            Value::Number(_) => ColumnType::Double,
            _ => ColumnType::String,
        }
    }

    /// The wire name, e.g. `"LONG"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::String => "STRING",
            ColumnType::Decimal => "DECIMAL",
            ColumnType::Long => "LONG",
            ColumnType::Double => "DOUBLE",
            ColumnType::Date => "DATE",
            ColumnType::Datetime => "DATETIME",
        }
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named, typed column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column type
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    /// Column name
    pub name: String,
}

impl Column {
    /// Create a column.
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            column_type,
            name: name.into(),
        }
    }
}

/// An ordered list of columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Columns in order
    pub columns: Vec<Column>,
}

impl Schema {
    /// Create a schema from columns.
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    /// Infer a schema from column names and one sample row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the row length differs from the
    /// number of names.
    ///
    /// # Example
    ///
    /// ```
    /// use domo_sdk::models::{ColumnType, Schema};
    /// use serde_json::json;
    ///
    /// let schema = Schema::infer(&["region", "total"], &[json!("west"), json!(10)])?;
    /// assert_eq!(schema.columns[1].column_type, ColumnType::Long);
    /// # Ok::<(), domo_sdk::Error>(())
    /// ```
    pub fn infer<S: AsRef<str>>(names: &[S], first_row: &[Value]) -> Result<Self> {
        if names.len() != first_row.len() {
            return Err(Error::Validation(format!(
                "schema has {} column names but the sample row has {} values",
                names.len(),
                first_row.len()
            )));
        }

        let columns = names
            .iter()
            .zip(first_row)
            .map(|(name, value)| Column::new(name.as_ref(), ColumnType::detect(value)))
            .collect();
        Ok(Self { columns })
    }

    /// A `{name, description, rows, schema}` body for
    /// [`DatasetsService::create`](crate::api::DatasetsService::create).
    pub fn dataset_body(&self, name: &str, description: &str) -> Value {
        json!({
            "name": name,
            "description": description,
            "rows": 0,
            "schema": self,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_column_type() {
        assert_eq!(ColumnType::detect(&json!(false)), ColumnType::String);
        assert_eq!(ColumnType::detect(&json!(-7)), ColumnType::Long);
        assert_eq!(ColumnType::detect(&json!(u64::MAX)), ColumnType::Long);
        assert_eq!(ColumnType::detect(&json!(0.5)), ColumnType::Double);
        assert_eq!(ColumnType::detect(&json!("2024-01-01")), ColumnType::String);
        assert_eq!(ColumnType::detect(&Value::Null), ColumnType::String);
    }

    #[test]
    fn test_column_serialization() {
        let column = Column::new("created", ColumnType::Datetime);
        assert_eq!(
            serde_json::to_value(&column).unwrap(),
            json!({"type": "DATETIME", "name": "created"})
        );

        let parsed: Column = serde_json::from_value(json!({"type": "DECIMAL", "name": "price"})).unwrap();
        assert_eq!(parsed.column_type, ColumnType::Decimal);
    }

    #[test]
    fn test_infer_schema() {
        let schema = Schema::infer(
            &["name", "count", "ratio", "active"],
            &[json!("a"), json!(3), json!(0.25), json!(true)],
        )
        .unwrap();

        let types: Vec<_> = schema.columns.iter().map(|c| c.column_type).collect();
        assert_eq!(
            types,
            vec![
                ColumnType::String,
                ColumnType::Long,
                ColumnType::Double,
                ColumnType::String
            ]
        );
    }

    #[test]
    fn test_infer_rejects_length_mismatch() {
        assert!(matches!(
            Schema::infer(&["a", "b"], &[json!(1)]),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_dataset_body() {
        let schema = Schema::new(vec![Column::new("id", ColumnType::Long)]);
        let body = schema.dataset_body("Sales", "Monthly sales");
        assert_eq!(body["name"], "Sales");
        assert_eq!(body["schema"]["columns"][0]["type"], "LONG");
    }
}
