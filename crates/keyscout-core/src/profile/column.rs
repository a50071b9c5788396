use std::collections::HashSet;

use thiserror::Error;

use crate::profile::entropy::shannon_entropy;
use crate::profile::pattern::infer_pattern;
use crate::profile::types::{ColumnProfile, DataType, ProfileOptions};
use crate::table::types::Column;
use crate::table::value::ValueKey;

/// Why a column could not be profiled. Never escapes `profile_column`.
#[derive(Error, Debug)]
enum ProfileFailure {
    #[error("column has {actual} values but the table has {expected} rows")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Profile one column against its table's row count.
///
/// Never fails: if the column cannot be profiled the result is
/// [`ColumnProfile::degraded`] and a warning is logged, so one bad column
/// cannot abort profiling of the rest of its table.
pub fn profile_column(column: &Column, total_rows: usize, options: &ProfileOptions) -> ColumnProfile {
    match try_profile_column(column, total_rows, options) {
        Ok(profile) => profile,
        Err(e) => {
            tracing::warn!(
                "Could not profile column '{}': {}. Falling back to an unknown-typed profile.",
                column.name,
                e
            );
            ColumnProfile::degraded()
        }
    }
}

fn try_profile_column(
    column: &Column,
    total_rows: usize,
    options: &ProfileOptions,
) -> Result<ColumnProfile, ProfileFailure> {
    if column.len() != total_rows {
        return Err(ProfileFailure::LengthMismatch {
            expected: total_rows,
            actual: column.len(),
        });
    }

    let data_type = DataType::infer(&column.values);

    let mut distinct: HashSet<ValueKey<'_>> = HashSet::new();
    let mut sample_values = Vec::with_capacity(options.sample_values);
    let mut null_count = 0usize;

    for value in &column.values {
        match value.key() {
            None => null_count += 1,
            Some(key) => {
                if distinct.insert(key) && sample_values.len() < options.sample_values {
                    sample_values.push(value.to_string());
                }
            }
        }
    }

    let num_unique_values = distinct.len();
    let is_categorical = data_type.can_be_categorical()
        && (num_unique_values as f64) < options.categorical_ratio * total_rows as f64;

    let entropy = data_type.has_entropy().then(|| {
        let rendered: Vec<String> = column.non_null().map(|v| v.to_string()).collect();
        shannon_entropy(&rendered)
    });

    let regex_pattern = if data_type.has_pattern() {
        infer_pattern(column.non_null(), options.pattern_sample_size)
    } else {
        None
    };

    Ok(ColumnProfile {
        data_type,
        is_unique: num_unique_values == total_rows,
        is_complete: null_count == 0,
        is_categorical,
        num_unique_values,
        sample_values,
        entropy,
        regex_pattern,
    })
}
