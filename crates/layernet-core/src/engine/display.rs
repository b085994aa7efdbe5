use crate::core::models::network::{MultiLayerNetwork, NetworkError};
use tracing::info;

/// Shows or hides a layer. Only visibility changes; node data, groups and
/// positions stay as they are, and the layout is marked stale when the
/// visibility actually flipped.
///
/// Returns whether anything changed. The caller is expected to run
/// [`compute_layout`](super::layout::compute_layout) and render again.
pub fn set_display_layer(
    network: &mut MultiLayerNetwork,
    name: &str,
    visible: bool,
) -> Result<bool, NetworkError> {
    let changed = network.set_visible(name, visible)?;
    if changed {
        info!(layer = name, visible, "Layer display toggled.");
    }
    Ok(changed)
}

/// Makes exactly the named layers visible. Unknown names fail before any
/// layer is touched.
pub fn show_only(network: &mut MultiLayerNetwork, names: &[&str]) -> Result<bool, NetworkError> {
    for name in names {
        network.layer(name)?;
    }
    let all: Vec<String> = network
        .layers_in_order()
        .iter()
        .map(|layer| layer.name.clone())
        .collect();

    let mut changed = false;
    for name in &all {
        changed |= set_display_layer(network, name, names.contains(&name.as_str()))?;
    }
    Ok(changed)
}

/// Names of the visible layers, in draw order.
pub fn displayed_layers(network: &MultiLayerNetwork) -> Vec<&str> {
    network
        .visible_layers()
        .into_iter()
        .map(|layer| layer.name.as_str())
        .collect()
}
