use anyhow::Result;

use keyscout_core::config::KeyScoutConfig;
use keyscout_core::store::RelationshipStore;

use crate::args::EditArgs;
use crate::commands::{output_dir_or_default, read_relationship_file};

pub fn run(args: &EditArgs, config: Option<&KeyScoutConfig>) -> Result<()> {
    let relationships = read_relationship_file(&args.input)?;
    let dir = output_dir_or_default(args.output_dir.as_deref(), config);

    let path = RelationshipStore::new(dir).save_edited(&relationships)?;
    println!(
        "Saved {} edited relationships to {}",
        relationships.len(),
        path.display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_edit_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("reviewed.json");
        std::fs::write(
            &input,
            r#"[{"from_table":"orders.csv","from_column":"customer_id","to_table":"customers.csv","to_column":"customer_id","confidence":1.0}]"#,
        )
        .unwrap();
        let out: PathBuf = dir.path().join("outputs");

        run(
            &EditArgs {
                output_dir: Some(out.clone()),
                input,
            },
            None,
        )
        .unwrap();

        let stored = RelationshipStore::new(out).load_edited().unwrap().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].confidence, 1.0);
    }

    #[test]
    fn test_edit_rejects_malformed_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("bad.json");
        std::fs::write(&input, "[{\"from_table\": 1}]").unwrap();
        let err = run(
            &EditArgs {
                output_dir: Some(dir.path().to_path_buf()),
                input,
            },
            None,
        )
        .unwrap_err();
        assert!(format!("{:#}", err).contains("bad.json"));
    }
}
