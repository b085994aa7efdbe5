pub mod inspect;
pub mod layout;

use crate::cli::InputArgs;
use crate::config::AppConfig;
use crate::error::{CliError, Result};
use crate::ingest::ingest_rows;
use layernet::core::io::records::{LayerBatch, load_records_csv};
use layernet::core::models::network::MultiLayerNetwork;
use layernet::core::presets::preset_config;
use tracing::{debug, info};

/// Builds the network from the declared layers and every input file.
///
/// Layers are registered in declaration order. A batch for an undeclared
/// layer registers that layer with its preset style first.
pub fn load_network(app: &AppConfig, input: &InputArgs) -> Result<MultiLayerNetwork> {
    if input.records.is_empty() && input.rows.is_none() {
        return Err(CliError::Argument(
            "no input given; pass --records and/or --rows".to_string(),
        ));
    }

    let mut network = MultiLayerNetwork::with_link_policy(app.link_policy);
    for entry in &app.layers {
        network.add_layer(&entry.name, entry.to_config())?;
    }

    for path in &input.records {
        info!("Loading node records from {:?}", path);
        insert_batches(&mut network, load_records_csv(path)?)?;
    }

    if let Some(path) = &input.rows {
        if app.sources.is_empty() {
            return Err(CliError::Config(
                "--rows needs at least one [[sources]] declaration in the config file".to_string(),
            ));
        }
        info!("Loading query rows from {:?}", path);
        let content = std::fs::read_to_string(path)?;
        let rows: serde_json::Value =
            serde_json::from_str(&content).map_err(|e| CliError::FileParsing {
                path: path.clone(),
                source: e.into(),
            })?;
        insert_batches(&mut network, ingest_rows(&rows, &app.sources)?)?;
    }

    info!(
        layers = network.layer_count(),
        nodes = network.node_count(),
        "Network loaded."
    );
    Ok(network)
}

fn insert_batches(network: &mut MultiLayerNetwork, batches: Vec<LayerBatch>) -> Result<()> {
    for batch in batches {
        if network.find_layer(&batch.layer).is_none() {
            debug!(layer = %batch.layer, "Registering undeclared layer with its preset style.");
            network.add_layer(&batch.layer, preset_config(&batch.layer))?;
        }
        let created = network.add_nodes(&batch.layer, batch.records)?;
        debug!(layer = %batch.layer, created, "Inserted batch.");
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::fs;
    use std::path::{Path, PathBuf};

    pub const RECORDS: &str = "\
layer,dbid,id,symbol,linked_to,linked_layer
Gene,1,7157,TP53,,
Gene,2,1956,EGFR,,
Compound,10,CHEBI:15365,aspirin,1,Gene
Compound,11,CHEBI:5855,ibuprofen,1,Gene
Compound,12,CHEBI:27732,caffeine,2,Gene
miRNA,20,MIMAT0000062,hsa-let-7a,2,Gene
";

    pub fn write_records(dir: &Path) -> PathBuf {
        let path = dir.join("records.csv");
        fs::write(&path, RECORDS).unwrap();
        path
    }

    pub fn write_config(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("layernet.toml");
        fs::write(&path, content).unwrap();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::cli::LayoutFlags;
    use crate::config::build_config;
    use layernet::core::models::ids::NodeId;
    use layernet::core::models::layer::Shape;
    use tempfile::tempdir;

    #[test]
    fn undeclared_layers_get_preset_styles() {
        let dir = tempdir().unwrap();
        let input = InputArgs {
            records: vec![write_records(dir.path())],
            ..InputArgs::default()
        };
        let app = build_config(&input, &LayoutFlags::default()).unwrap();
        let network = load_network(&app, &input).unwrap();

        assert_eq!(network.layer_count(), 3);
        assert_eq!(network.node_count(), 6);
        let compound = network.layer("Compound").unwrap();
        assert_eq!(compound.config().shape, Shape::Hexagon);
        assert_eq!(compound.config().color, "lime");
    }

    #[test]
    fn declared_layers_keep_declaration_order_and_style() {
        let dir = tempdir().unwrap();
        let config = write_config(
            dir.path(),
            "[[layers]]\nname = \"miRNA\"\ncolor = \"purple\"\n",
        );
        let input = InputArgs {
            records: vec![write_records(dir.path())],
            config: Some(config),
            ..InputArgs::default()
        };
        let app = build_config(&input, &LayoutFlags::default()).unwrap();
        let network = load_network(&app, &input).unwrap();

        let names: Vec<&str> = network
            .layers_in_order()
            .iter()
            .map(|l| l.name.as_str())
            .collect();
        assert_eq!(names, vec!["miRNA", "Gene", "Compound"]);
        assert_eq!(network.layer("miRNA").unwrap().config().color, "purple");
    }

    #[test]
    fn loading_the_same_file_twice_deduplicates_links_by_default() {
        let dir = tempdir().unwrap();
        let records = write_records(dir.path());
        let input = InputArgs {
            records: vec![records.clone(), records],
            ..InputArgs::default()
        };
        let app = build_config(&input, &LayoutFlags::default()).unwrap();
        let network = load_network(&app, &input).unwrap();

        assert_eq!(network.node(NodeId(10)).unwrap().links().len(), 1);
    }

    #[test]
    fn rows_are_ingested_through_sources() {
        let dir = tempdir().unwrap();
        let config = write_config(
            dir.path(),
            r#"
            [[sources]]
            layer = "Gene"
            dbid = "objectId"
            id = "primaryIdentifier"
            symbol = "symbol"

            [[sources]]
            layer = "PPI"
            items = "/interactions"
            dbid = "objectId"
            id = ["gene2", "primaryIdentifier"]
            symbol = ["gene2", "symbol"]
            link-to = "Gene"
            "#,
        );
        let rows = dir.path().join("rows.json");
        std::fs::write(
            &rows,
            r#"[{"objectId": 1, "primaryIdentifier": "7157", "symbol": "TP53",
                 "interactions": [{"objectId": 40, "gene2": {"primaryIdentifier": "4193", "symbol": "MDM2"}}]}]"#,
        )
        .unwrap();
        let input = InputArgs {
            rows: Some(rows),
            config: Some(config),
            ..InputArgs::default()
        };
        let app = build_config(&input, &LayoutFlags::default()).unwrap();
        let network = load_network(&app, &input).unwrap();

        let node = network.node(NodeId(40)).unwrap();
        assert_eq!(node.label, "MDM2");
        assert_eq!(node.links()[0].layer, "Gene");
        assert_eq!(network.layer("PPI").unwrap().config().color, "LightGray");
    }

    #[test]
    fn rows_without_sources_and_missing_input_are_rejected() {
        let dir = tempdir().unwrap();
        let app = build_config(&InputArgs::default(), &LayoutFlags::default()).unwrap();
        assert!(matches!(
            load_network(&app, &InputArgs::default()),
            Err(CliError::Argument(_))
        ));

        let rows = dir.path().join("rows.json");
        std::fs::write(&rows, "[]").unwrap();
        let input = InputArgs {
            rows: Some(rows),
            ..InputArgs::default()
        };
        assert!(matches!(
            load_network(&app, &input),
            Err(CliError::Config(_))
        ));
    }
}
