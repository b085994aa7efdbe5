use super::load_network;
use crate::cli::{InspectArgs, LayoutFlags};
use crate::config::build_config;
use crate::error::{CliError, Result};
use layernet::core::models::ids::EntryKey;
use layernet::core::models::network::MultiLayerNetwork;
use layernet::engine::grouping::apply_grouping_flags;
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerSummary {
    pub layer: String,
    pub visible: bool,
    pub grouped: bool,
    pub z_index: i32,
    /// Displayed entries: individual nodes plus group nodes.
    pub entries: usize,
    pub groups: usize,
    pub grouped_nodes: usize,
    pub links: usize,
}

pub fn summarize(network: &MultiLayerNetwork) -> Vec<LayerSummary> {
    network
        .layers_in_order()
        .into_iter()
        .map(|layer| {
            let links = layer
                .membership()
                .keys()
                .map(|key| match key {
                    EntryKey::Node(_) => network.entry_links(layer, key).len(),
                    EntryKey::Group(g) => layer
                        .group(g)
                        .map(|group| group.members().iter().map(|m| m.links().len()).sum())
                        .unwrap_or(0),
                })
                .sum();
            LayerSummary {
                layer: layer.name.clone(),
                visible: layer.is_visible(),
                grouped: layer.config().grouped,
                z_index: layer.z_index(),
                entries: layer.displayed_count(),
                groups: layer.groups_iter().count(),
                grouped_nodes: layer.groups_iter().map(|group| group.len()).sum(),
                links,
            }
        })
        .collect()
}

pub fn run(args: InspectArgs) -> Result<()> {
    let flags = LayoutFlags {
        no_grouping: args.no_grouping,
        ..LayoutFlags::default()
    };
    let app = build_config(&args.input, &flags)?;
    let mut network = load_network(&app, &args.input)?;
    if app.layout.apply_grouping {
        apply_grouping_flags(&mut network)?;
    }

    let summary = summarize(&network);
    info!(layers = summary.len(), "Network summarized.");

    if args.json {
        let json = serde_json::to_string_pretty(&summary).map_err(|e| CliError::Other(e.into()))?;
        println!("{}", json);
        return Ok(());
    }

    println!(
        "{:<16} {:>7} {:>7} {:>7} {:>7} {:>8} {:>7}",
        "LAYER", "VISIBLE", "GROUPED", "ENTRIES", "GROUPS", "MEMBERS", "LINKS"
    );
    for row in &summary {
        println!(
            "{:<16} {:>7} {:>7} {:>7} {:>7} {:>8} {:>7}",
            row.layer,
            if row.visible { "yes" } else { "no" },
            if row.grouped { "yes" } else { "no" },
            row.entries,
            row.groups,
            row.grouped_nodes,
            row.links
        );
    }
    println!("{} node(s) in the store.", network.node_count());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::InputArgs;
    use crate::commands::test_support::*;
    use tempfile::tempdir;

    fn network(config: &str) -> MultiLayerNetwork {
        let dir = tempdir().unwrap();
        let input = InputArgs {
            records: vec![write_records(dir.path())],
            config: Some(write_config(dir.path(), config)),
            ..InputArgs::default()
        };
        let app = build_config(&input, &LayoutFlags::default()).unwrap();
        load_network(&app, &input).unwrap()
    }

    #[test]
    fn summary_counts_entries_and_links() {
        let network = network("");
        let summary = summarize(&network);

        assert_eq!(summary.len(), 3);
        let compound = &summary[1];
        assert_eq!(compound.layer, "Compound");
        assert_eq!(compound.entries, 3);
        assert_eq!(compound.groups, 0);
        assert_eq!(compound.links, 3);
        assert_eq!(summary[0].links, 0);
    }

    #[test]
    fn summary_reflects_grouping() {
        let mut network = network("[[layers]]\nname = \"Compound\"\ngrouped = true\n");
        apply_grouping_flags(&mut network).unwrap();
        let summary = summarize(&network);

        let compound = summary.iter().find(|s| s.layer == "Compound").unwrap();
        assert!(compound.grouped);
        assert_eq!(compound.entries, 2);
        assert_eq!(compound.groups, 1);
        assert_eq!(compound.grouped_nodes, 2);
        assert_eq!(compound.links, 3);
    }

    #[test]
    fn run_prints_without_error() {
        let dir = tempdir().unwrap();
        let args = InspectArgs {
            input: InputArgs {
                records: vec![write_records(dir.path())],
                ..InputArgs::default()
            },
            no_grouping: true,
            json: true,
        };
        run(args).unwrap();
    }
}
