use indexmap::IndexMap;
use rayon::prelude::*;

use crate::profile::column::profile_column;
use crate::profile::types::{ProfileOptions, TableProfile};
use crate::table::types::{Column, Table, TableSet};

/// Profile every column of a table.
///
/// Columns are independent, so they are profiled in parallel; the result
/// keeps the table's column order.
pub fn profile_table(table: &Table, options: &ProfileOptions) -> TableProfile {
    let columns: Vec<(&String, &Column)> = table.columns.iter().collect();
    let profiles: Vec<_> = columns
        .par_iter()
        .map(|(name, column)| {
            (
                (*name).clone(),
                profile_column(column, table.row_count, options),
            )
        })
        .collect();

    let degraded = profiles.iter().filter(|(_, p)| p.is_degraded()).count();
    tracing::debug!(
        "Profiled table '{}': {} rows, {} columns ({} degraded)",
        table.name,
        table.row_count,
        profiles.len(),
        degraded
    );

    TableProfile {
        table_name: table.name.clone(),
        num_rows: table.row_count,
        columns: profiles.into_iter().collect::<IndexMap<_, _>>(),
    }
}

/// Profile every table of a set, keyed by table name in set order.
pub fn profile_tables(tables: &TableSet, options: &ProfileOptions) -> IndexMap<String, TableProfile> {
    let all: Vec<&Table> = tables.tables().collect();
    all.par_iter()
        .map(|table| (table.name.clone(), profile_table(table, options)))
        .collect::<Vec<_>>()
        .into_iter()
        .collect()
}
