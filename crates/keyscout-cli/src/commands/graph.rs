use anyhow::{bail, Result};

use keyscout_core::config::KeyScoutConfig;
use keyscout_core::graph::visualize::{self, GraphFormat as VizFormat};
use keyscout_core::graph::RelationshipGraph;
use keyscout_core::store::RelationshipStore;
use keyscout_core::RelationshipEngine;

use crate::args::GraphArgs;
use crate::commands::{engine_options, load_input, spinner};

pub fn run(args: &GraphArgs, config: Option<&KeyScoutConfig>) -> Result<()> {
    let relationships = match args.from_store {
        Some(ref dir) => match RelationshipStore::new(dir).load_edited()? {
            Some(relationships) => relationships,
            None => bail!("No relationship documents found in {}", dir.display()),
        },
        None => {
            let tables = load_input(&args.input(), config)?;
            let engine = RelationshipEngine::new(engine_options(config, &args.tuning)?);
            let pb = spinner("detect", "Detecting relationships...")?;
            let relationships = engine.run(&tables)?;
            pb.finish_with_message(format!(
                "Detecting relationships... ✓ {} relationships",
                relationships.len()
            ));
            relationships
        }
    };

    let graph = RelationshipGraph::from_relationships(&relationships);

    let format = match args.format {
        crate::args::GraphFormat::Mermaid => VizFormat::Mermaid,
        crate::args::GraphFormat::Dot => VizFormat::Dot,
    };

    let output = visualize::visualize(&graph, format);
    println!("{}", output);

    Ok(())
}
