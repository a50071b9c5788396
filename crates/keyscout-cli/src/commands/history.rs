use anyhow::Result;
use comfy_table::{Cell, Table as ComfyTable};

use keyscout_core::config::KeyScoutConfig;
use keyscout_core::store::RelationshipStore;

use crate::args::{HistoryArgs, ReportFormat};
use crate::commands::output_dir_or_default;

pub fn run(args: &HistoryArgs, config: Option<&KeyScoutConfig>) -> Result<()> {
    let dir = output_dir_or_default(args.output_dir.as_deref(), config);
    let history = RelationshipStore::new(&dir).history()?;

    match args.format {
        ReportFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&history)?);
        }
        ReportFormat::Table => {
            if history.is_empty() {
                println!("No relationship documents in {}", dir.display());
                return Ok(());
            }

            let mut t = ComfyTable::new();
            t.set_header(vec!["Version", "Timestamp", "Nodes", "Edges"]);
            for entry in &history {
                t.add_row(vec![
                    Cell::new(entry.version),
                    Cell::new(entry.timestamp.as_deref().unwrap_or("")),
                    Cell::new(entry.node_count),
                    Cell::new(entry.edge_count),
                ]);
            }
            println!("{}", t);
        }
    }

    Ok(())
}
