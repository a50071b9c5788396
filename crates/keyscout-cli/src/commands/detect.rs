use anyhow::Result;
use comfy_table::{Cell, Table as ComfyTable};

use keyscout_core::config::KeyScoutConfig;
use keyscout_core::store::RelationshipStore;
use keyscout_core::RelationshipEngine;

use crate::args::{DetectArgs, ReportFormat};
use crate::commands::{engine_options, load_input, output_dir, spinner};

pub fn run(args: &DetectArgs, config: Option<&KeyScoutConfig>) -> Result<()> {
    let tables = load_input(&args.input, config)?;
    let engine = RelationshipEngine::new(engine_options(config, &args.tuning)?);

    let pb = spinner("detect", "Detecting relationships...")?;
    let analysis = engine.analyze(&tables)?;
    let primary_keys: usize = analysis.keys.values().map(|k| k.primary_keys.len()).sum();
    pb.finish_with_message(format!(
        "Detecting relationships... ✓ {} primary keys, {} relationships",
        primary_keys,
        analysis.relationships.len()
    ));

    let relationships = analysis.relationships;

    match args.format {
        ReportFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&relationships)?);
        }
        ReportFormat::Table => {
            if relationships.is_empty() {
                println!("No relationships found above the confidence threshold.");
            } else {
                let mut t = ComfyTable::new();
                t.set_header(vec!["From", "To", "Confidence"]);
                for rel in &relationships {
                    t.add_row(vec![
                        Cell::new(format!("{}.{}", rel.from_table, rel.from_column)),
                        Cell::new(format!("{}.{}", rel.to_table, rel.to_column)),
                        Cell::new(format!("{:.4}", rel.confidence)),
                    ]);
                }
                println!("{}", t);
            }
        }
    }

    if let Some(dir) = output_dir(args.output_dir.as_deref(), config) {
        let path = RelationshipStore::new(dir).save_initial(&relationships)?;
        eprintln!("Saved initial relationships to {}", path.display());
    }

    Ok(())
}
