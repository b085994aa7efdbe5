use super::layout::LayoutResult;
use crate::core::models::ids::EntryKey;
use crate::core::models::layer::Shape;
use crate::core::models::network::MultiLayerNetwork;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionedNode {
    pub layer: String,
    pub x: f64,
    pub y: f64,
    pub r: f64,
    pub symbol: String,
    pub color: String,
    pub shape: Shape,
    /// Node id, or the (negative) group key of a group node.
    pub id: i64,
    pub is_group: bool,
    pub pinned: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeEnd {
    pub x: f64,
    pub y: f64,
    pub id: i64,
    pub layer: String,
}

/// Directed edge from the linked-to entity to the entity holding the link.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    pub source: EdgeEnd,
    pub target: EdgeEnd,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BandRect {
    pub layer: String,
    pub color: String,
    pub y_min: f64,
    pub y_max: f64,
    pub width: f64,
}

/// Render-ready snapshot of a laid-out network.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub generation: u64,
    pub width: f64,
    pub height: f64,
    pub radius: f64,
    pub bands: Vec<BandRect>,
    pub nodes: Vec<PositionedNode>,
    pub edges: Vec<Edge>,
}

impl Scene {
    /// `false` once the network was mutated after the layout this scene came from.
    pub fn is_current(&self, network: &MultiLayerNetwork) -> bool {
        self.generation == network.generation()
    }
}

/// Collects the positioned entries of the visible layers and the edges
/// between them.
///
/// Links pointing at a node folded into a group resolve to the group node.
/// Each distinct (source, target) pair yields one edge; links whose other
/// end is hidden, unknown or not yet positioned are skipped.
pub fn build_scene(network: &MultiLayerNetwork, layout: &LayoutResult) -> Scene {
    let visible = network.visible_layers();

    let mut nodes = Vec::new();
    let mut positions: HashMap<(&str, EntryKey), (f64, f64)> = HashMap::new();
    for layer in &visible {
        let config = layer.config();
        for (key, state) in layer.membership().iter() {
            let Some(p) = state.position else {
                continue;
            };
            positions.insert((layer.name.as_str(), key), (p.x, p.y));
            nodes.push(PositionedNode {
                layer: layer.name.clone(),
                x: p.x,
                y: p.y,
                r: layout.radius,
                symbol: network.entry_label(layer, key).unwrap_or_default(),
                color: config.color.clone(),
                shape: config.shape,
                id: key.display_id(),
                is_group: key.is_group(),
                pinned: state.pinned,
            });
        }
    }

    let end = |layer: &str, key: EntryKey, (x, y): (f64, f64)| EdgeEnd {
        x,
        y,
        id: key.display_id(),
        layer: layer.to_string(),
    };

    let mut seen = HashSet::new();
    let mut edges = Vec::new();
    for layer in &visible {
        for key in layer.membership().keys() {
            let Some(&holder_pos) = positions.get(&(layer.name.as_str(), key)) else {
                continue;
            };
            for link in network.entry_links(layer, key) {
                let Some(source_key) = network.resolve_entry(&link.layer, link.target) else {
                    continue;
                };
                let Some(&source_pos) = positions.get(&(link.layer.as_str(), source_key)) else {
                    continue;
                };
                if link.layer == layer.name && source_key == key {
                    continue;
                }
                if seen.insert((link.layer.as_str(), source_key, layer.name.as_str(), key)) {
                    edges.push(Edge {
                        source: end(&link.layer, source_key, source_pos),
                        target: end(&layer.name, key, holder_pos),
                    });
                }
            }
        }
    }

    let bands = layout
        .bands
        .iter()
        .map(|band| BandRect {
            layer: band.layer.clone(),
            color: network
                .layer(&band.layer)
                .map(|layer| layer.config().color.clone())
                .unwrap_or_default(),
            y_min: band.y_min,
            y_max: band.y_max,
            width: layout.width,
        })
        .collect();

    debug!(nodes = nodes.len(), edges = edges.len(), "Scene extracted.");
    Scene {
        generation: layout.generation,
        width: layout.width,
        height: layout.height,
        radius: layout.radius,
        bands,
        nodes,
        edges,
    }
}
