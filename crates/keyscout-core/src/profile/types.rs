use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::table::value::Value;

/// Coarse semantic type of a column, decided from its storage representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Int,
    Float,
    Bool,
    DateTime,
    String,
    /// Only assigned to degraded profiles; inference never returns it.
    Unknown,
}

impl DataType {
    /// Classify a column by the storage of its non-null values.
    ///
    /// Priority is int > float > bool > datetime > string. Mixed storage,
    /// and columns with no non-null values at all, fall back to string.
    pub fn infer(values: &[Value]) -> Self {
        let mut seen_any = false;
        let mut all_int = true;
        let mut all_numeric = true;
        let mut all_bool = true;
        let mut all_datetime = true;

        for value in values.iter().filter(|v| !v.is_null()) {
            seen_any = true;
            all_int &= matches!(value, Value::Int(_));
            all_numeric &= matches!(value, Value::Int(_) | Value::Float(_));
            all_bool &= matches!(value, Value::Bool(_));
            all_datetime &= matches!(value, Value::DateTime(_));
        }

        if !seen_any {
            DataType::String
        } else if all_int {
            DataType::Int
        } else if all_numeric {
            DataType::Float
        } else if all_bool {
            DataType::Bool
        } else if all_datetime {
            DataType::DateTime
        } else {
            DataType::String
        }
    }

    /// Whether a low distinct count marks the column as categorical.
    pub fn can_be_categorical(self) -> bool {
        matches!(self, DataType::String | DataType::Int)
    }

    pub fn has_entropy(self) -> bool {
        matches!(self, DataType::String | DataType::Int)
    }

    pub fn has_pattern(self) -> bool {
        matches!(self, DataType::String)
    }

    /// Whether values of the two types can meaningfully share members.
    ///
    /// String columns may hold mixed storage, so they compare with anything
    /// known. Other types compare only within their family.
    pub fn is_comparable_with(self, other: DataType) -> bool {
        match (self, other) {
            (DataType::Unknown, _) | (_, DataType::Unknown) => false,
            (DataType::String, _) | (_, DataType::String) => true,
            (a, b) => a.family() == b.family(),
        }
    }

    fn family(self) -> u8 {
        match self {
            DataType::Int | DataType::Float => 0,
            DataType::Bool => 1,
            DataType::DateTime => 2,
            DataType::String => 3,
            DataType::Unknown => 4,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Int => write!(f, "int"),
            DataType::Float => write!(f, "float"),
            DataType::Bool => write!(f, "bool"),
            DataType::DateTime => write!(f, "datetime"),
            DataType::String => write!(f, "string"),
            DataType::Unknown => write!(f, "unknown"),
        }
    }
}

/// Statistical description of one column.
///
/// `entropy` and `regex_pattern` are only present for the types that carry
/// them; inapplicable fields are omitted from serialized output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub data_type: DataType,
    pub is_unique: bool,
    pub is_complete: bool,
    pub is_categorical: bool,
    pub num_unique_values: usize,
    pub sample_values: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entropy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex_pattern: Option<String>,
}

impl ColumnProfile {
    /// Placeholder profile for a column that could not be profiled.
    pub fn degraded() -> Self {
        Self {
            data_type: DataType::Unknown,
            is_unique: false,
            is_complete: false,
            is_categorical: false,
            num_unique_values: 0,
            sample_values: Vec::new(),
            entropy: None,
            regex_pattern: None,
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.data_type == DataType::Unknown
    }
}

/// Profiles of every column of one table, in table column order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableProfile {
    pub table_name: String,
    pub num_rows: usize,
    pub columns: IndexMap<String, ColumnProfile>,
}

/// Tunables for column profiling.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileOptions {
    /// A column is categorical when its distinct count is below this share
    /// of the row count.
    pub categorical_ratio: f64,
    /// How many leading non-null values feed pattern inference.
    pub pattern_sample_size: usize,
    /// How many distinct values to keep as `sample_values`.
    pub sample_values: usize,
}

impl Default for ProfileOptions {
    fn default() -> Self {
        Self {
            categorical_ratio: 0.1,
            pattern_sample_size: 100,
            sample_values: 5,
        }
    }
}
