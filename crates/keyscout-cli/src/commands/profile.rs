use anyhow::Result;
use comfy_table::{Cell, Table as ComfyTable};
use serde::Serialize;

use keyscout_core::config::KeyScoutConfig;
use keyscout_core::keys::KeySet;
use keyscout_core::profile::{ColumnProfile, TableProfile};
use keyscout_core::relationship::{Profiled, RelationshipEngine};

use crate::args::{ProfileArgs, ReportFormat};
use crate::commands::{engine_options, load_input, spinner};

#[derive(Serialize)]
struct ProfileReport<'a> {
    profile: &'a TableProfile,
    keys: &'a KeySet,
}

pub fn run(args: &ProfileArgs, config: Option<&KeyScoutConfig>) -> Result<()> {
    let tables = load_input(&args.input, config)?;
    let engine = RelationshipEngine::new(engine_options(config, &Default::default())?);

    let pb = spinner("profile", "Profiling columns...")?;
    let Profiled { profiles, keys } = engine.profile(&tables)?;
    pb.finish_with_message(format!(
        "Profiling columns... ✓ {} columns in {} tables",
        tables.column_count(),
        tables.len()
    ));

    match args.format {
        ReportFormat::Json => {
            let report: Vec<ProfileReport<'_>> = profiles
                .iter()
                .filter_map(|(name, profile)| {
                    keys.get(name).map(|keys| ProfileReport {
                        profile,
                        keys,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        ReportFormat::Table => {
            for (table_name, profile) in &profiles {
                let table_keys = keys.get(table_name);
                println!("━━━ {} ({} rows) ━━━", table_name, profile.num_rows);

                let mut t = ComfyTable::new();
                t.set_header(vec![
                    "Column", "Type", "Key", "Unique", "Complete", "Categorical", "Distinct",
                    "Entropy", "Pattern", "Samples",
                ]);
                for (col_name, column) in &profile.columns {
                    let key = match table_keys {
                        Some(k) if k.primary_keys.contains(col_name) => "PK",
                        Some(k) if k.candidate_keys.contains(col_name) => "candidate",
                        _ => "",
                    };
                    t.add_row(profile_row(col_name, key, column));
                }

                println!("{}", t);
                println!();
            }
        }
    }

    Ok(())
}

fn profile_row(name: &str, key: &str, column: &ColumnProfile) -> Vec<Cell> {
    let yes_no = |flag: bool| if flag { "YES" } else { "NO" };
    vec![
        Cell::new(name),
        Cell::new(column.data_type.to_string()),
        Cell::new(key),
        Cell::new(yes_no(column.is_unique)),
        Cell::new(yes_no(column.is_complete)),
        Cell::new(yes_no(column.is_categorical)),
        Cell::new(column.num_unique_values),
        Cell::new(
            column
                .entropy
                .map(|e| format!("{:.4}", e))
                .unwrap_or_default(),
        ),
        Cell::new(column.regex_pattern.as_deref().unwrap_or("")),
        Cell::new(column.sample_values.join(", ")),
    ]
}
