use std::path::{Path, PathBuf};

use keyscout_core::table::types::{Column, Table, TableSet};
use keyscout_core::table::value::Value;

/// Build a table from `(column, values)` pairs. Panics on ragged input.
pub fn table(name: &str, columns: Vec<(&str, Vec<Value>)>) -> Table {
    let columns = columns
        .into_iter()
        .map(|(col, values)| Column::new(col, values))
        .collect();
    Table::new(name, columns).unwrap()
}

pub fn ints(values: impl IntoIterator<Item = i64>) -> Vec<Value> {
    values.into_iter().map(Value::Int).collect()
}

pub fn strings<S: AsRef<str>>(values: impl IntoIterator<Item = S>) -> Vec<Value> {
    values
        .into_iter()
        .map(|s| Value::String(s.as_ref().to_string()))
        .collect()
}

/// 20 customers with a unique, complete `customer_id` (1..=20).
pub fn customers_table() -> Table {
    let segments = ["retail", "wholesale", "online", "partner"];
    table(
        "customers",
        vec![
            ("customer_id", ints(1..=20)),
            (
                "segment",
                strings((0..20).map(|i| segments[i % segments.len()])),
            ),
        ],
    )
}

/// 40 orders whose `customer_id` has 20 distinct values, 19 of which exist
/// in [`customers_table`]: a 0.95 overlap.
pub fn orders_table() -> Table {
    let customer_ids: Vec<i64> = (0..40)
        .map(|i| if i % 20 == 19 { 999 } else { i % 20 + 1 })
        .collect();
    let amounts = (0..40)
        .map(|i| Value::Float(10.99 + (i % 7) as f64))
        .collect();
    table(
        "orders",
        vec![
            ("order_id", ints(1..=40)),
            ("customer_id", ints(customer_ids)),
            ("amount", amounts),
        ],
    )
}

/// Orders then customers, the canonical one-edge scenario.
pub fn ecommerce_tables() -> TableSet {
    TableSet::from_tables(vec![orders_table(), customers_table()]).unwrap()
}

/// `tables` tables of `rows` rows each. Every table has a unique `id` over
/// the same range, so each `parent_id` column overlaps every other table's
/// key; a dense worst case for foreign-key comparison.
pub fn synthetic_tables(tables: usize, rows: usize) -> TableSet {
    let rows = rows as i64;
    let set = (0..tables).map(|t| {
        let name = format!("t{}", t);
        table(
            &name,
            vec![
                ("id", ints(1..=rows)),
                ("parent_id", ints((0..rows).map(|r| r / 2 + 1))),
                (
                    "label",
                    strings((0..rows).map(|r| format!("L-{:04}", r % 50))),
                ),
            ],
        )
    });
    TableSet::from_tables(set).unwrap()
}

/// Write the e-commerce scenario as CSV files into `dir`.
pub fn write_ecommerce_csv(dir: &Path) -> Vec<PathBuf> {
    let mut orders = String::from("order_id,customer_id,amount\n");
    for i in 0..40 {
        let customer_id = if i % 20 == 19 { 999 } else { i % 20 + 1 };
        orders.push_str(&format!("{},{},{:.2}\n", i + 1, customer_id, 10.99 + (i % 7) as f64));
    }

    let mut customers = String::from("customer_id;segment\n");
    let segments = ["retail", "wholesale", "online", "partner"];
    for i in 0..20 {
        customers.push_str(&format!("{};{}\n", i + 1, segments[i % segments.len()]));
    }

    let orders_path = dir.join("orders.csv");
    let customers_path = dir.join("customers.csv");
    std::fs::write(&orders_path, orders).unwrap();
    std::fs::write(&customers_path, customers).unwrap();
    vec![orders_path, customers_path]
}
