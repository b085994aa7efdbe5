use super::load_network;
use crate::cli::LayoutArgs;
use crate::config::build_config;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use layernet::core::io::pins::{LayerPins, load_pins_csv};
use layernet::core::models::ids::{EntryKey, NodeId};
use layernet::core::models::network::{MultiLayerNetwork, NetworkError};
use layernet::engine::display::set_display_layer;
use layernet::engine::grouping::apply_grouping_flags;
use layernet::engine::progress::ProgressReporter;
use layernet::engine::scene::Scene;
use layernet::workflows;
use tracing::info;

pub fn run(args: LayoutArgs) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let app = build_config(&args.input, &args.layout)?;
    let mut network = load_network(&app, &args.input)?;
    apply_layer_overrides(&mut network, &args)?;

    if let Some(path) = &args.pins {
        // Group first so that pins on grouped nodes land on their group.
        if app.layout.apply_grouping {
            apply_grouping_flags(&mut network)?;
        }
        let pinned = apply_pins(&mut network, &load_pins_csv(path)?)?;
        info!(pinned, "Applied pinned positions from {:?}", path);
    }

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Invoking the arrange workflow...");
    let result = workflows::arrange::run(&mut network, app.viewport, &app.layout, &reporter)?;
    for line in progress_handler.lines() {
        eprintln!("{}", line);
    }
    let scene = result.scene;

    let json = scene_json(&scene, args.pretty)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, json)?;
            println!(
                "Scene with {} node(s) and {} edge(s) written to: {}",
                scene.nodes.len(),
                scene.edges.len(),
                path.display()
            );
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn scene_json(scene: &Scene, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(scene)
    } else {
        serde_json::to_string(scene)
    };
    json.map_err(|e| CliError::Other(e.into()))
}

fn conflicting<'a>(a: &'a [String], b: &[String]) -> Option<&'a String> {
    a.iter().find(|name| b.contains(name))
}

/// Applies `--group/--ungroup` to the layers' grouping flags and
/// `--show/--hide` to their visibility.
fn apply_layer_overrides(network: &mut MultiLayerNetwork, args: &LayoutArgs) -> Result<()> {
    if let Some(name) = conflicting(&args.group, &args.ungroup) {
        return Err(CliError::Argument(format!(
            "layer '{}' given to both --group and --ungroup",
            name
        )));
    }
    if let Some(name) = conflicting(&args.show, &args.hide) {
        return Err(CliError::Argument(format!(
            "layer '{}' given to both --show and --hide",
            name
        )));
    }

    for (names, grouped) in [(&args.group, true), (&args.ungroup, false)] {
        for name in names {
            let config = network.layer(name)?.config().clone().grouped(grouped);
            network.add_layer(name, config)?;
        }
    }
    for (names, visible) in [(&args.show, true), (&args.hide, false)] {
        for name in names {
            set_display_layer(network, name, visible)?;
        }
    }
    Ok(())
}

/// Pins the entry displaying each listed node. Returns the number of pins set.
fn apply_pins(network: &mut MultiLayerNetwork, layers: &[LayerPins]) -> Result<usize> {
    let mut pinned = 0;
    for entry in layers {
        for pin in &entry.pins {
            let id = NodeId(pin.dbid);
            let key = network.resolve_entry(&entry.layer, id).ok_or_else(|| {
                NetworkError::EntryNotFound {
                    layer: entry.layer.clone(),
                    key: EntryKey::Node(id),
                }
            })?;
            network.set_node_position(&entry.layer, key, pin.x, pin.y)?;
            pinned += 1;
        }
    }
    Ok(pinned)
}
