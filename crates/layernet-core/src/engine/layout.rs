use super::config::{LayoutConfig, Viewport};
use super::error::EngineError;
use crate::core::models::ids::EntryKey;
use crate::core::models::layer::LayerDims;
use crate::core::models::network::MultiLayerNetwork;
use nalgebra::Point2;
use serde::Serialize;
use tracing::{debug, info, instrument};

/// Row/column allocation shared by all visible layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridPlan {
    /// Rows of each visible layer, in visible order.
    pub rows: Vec<usize>,
    pub total_rows: usize,
    pub total_cols: usize,
}

/// Vertical band a visible layer occupies after layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerBand {
    pub layer: String,
    pub y_min: f64,
    pub y_max: f64,
    pub rows: usize,
    pub entries: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutResult {
    /// Network generation right after this pass.
    pub generation: u64,
    pub width: f64,
    pub height: f64,
    pub radius: f64,
    pub total_rows: usize,
    pub total_cols: usize,
    pub bands: Vec<LayerBand>,
}

pub fn validate_viewport(width: f64, height: f64) -> Result<(), EngineError> {
    if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
        Ok(())
    } else {
        Err(EngineError::InvalidViewport { width, height })
    }
}

/// Packs layers holding `counts` entries into a shared grid.
///
/// Every layer starts with one row and the column count follows the viewport
/// aspect ratio (`ceil(total_rows * width / height)`). Layers that do not fit
/// get another row until all do; the final row counts are then shrunk to
/// `ceil(n / total_cols)`, keeping at least one row per layer.
pub fn plan_grid(counts: &[usize], width: f64, height: f64) -> Result<GridPlan, EngineError> {
    validate_viewport(width, height)?;
    if counts.is_empty() {
        return Ok(GridPlan {
            rows: Vec::new(),
            total_rows: 0,
            total_cols: 0,
        });
    }

    let aspect = width / height;
    let columns_for = |total_rows: usize| ((total_rows as f64 * aspect).ceil() as usize).max(1);

    let mut rows = vec![1usize; counts.len()];
    let mut total_cols = columns_for(rows.iter().sum());
    loop {
        let mut grew = false;
        for (r, n) in rows.iter_mut().zip(counts) {
            if r.saturating_mul(total_cols) < *n {
                *r += 1;
                grew = true;
            }
        }
        if !grew {
            break;
        }
        total_cols = columns_for(rows.iter().sum());
    }

    let rows: Vec<usize> = counts
        .iter()
        .map(|n| n.div_ceil(total_cols).max(1))
        .collect();
    let total_rows = rows.iter().sum();
    Ok(GridPlan {
        rows,
        total_rows,
        total_cols,
    })
}

/// Column of the `index`-th entry of a row, filling outwards from the middle:
/// `c, c+1, c-1, c+2, c-2, ...` with `c = total_cols / 2`.
///
/// Offsets that fall outside the row are skipped, so the first `total_cols`
/// indices visit every column exactly once.
pub fn centered_column(index: usize, total_cols: usize) -> usize {
    let center = total_cols / 2;
    if index == 0 {
        return center;
    }
    let step = index.div_ceil(2);
    if index % 2 == 1 && center + step < total_cols {
        center + step
    } else {
        center.saturating_sub(step)
    }
}

/// Positions every displayed entry of the visible layers inside `viewport`.
///
/// Each visible layer gets a band of `rows * dy` stacked in visible order;
/// within a band entries fill row by row with [`centered_column`]. Pinned
/// entries keep their (clamped) manual position when `respect_pins` is set and
/// otherwise lose both position and pin. Hidden layers are left untouched.
///
/// The result depends only on the network state and the arguments, so
/// repeating the call without mutations reproduces every position.
#[instrument(skip(network, config), fields(width = viewport.width, height = viewport.height))]
pub fn compute_layout(
    network: &mut MultiLayerNetwork,
    viewport: Viewport,
    config: &LayoutConfig,
) -> Result<LayoutResult, EngineError> {
    let Viewport { width, height } = viewport;
    let layer_ids = network.visible_layer_ids();
    let counts: Vec<usize> = layer_ids
        .iter()
        .map(|id| network.layers[*id].displayed_count())
        .collect();
    let plan = plan_grid(&counts, width, height)?;

    if plan.total_cols == 0 {
        let generation = network.mark_laid_out();
        info!("No visible layers; layout is empty.");
        return Ok(LayoutResult {
            generation,
            width,
            height,
            radius: 0.0,
            total_rows: 0,
            total_cols: 0,
            bands: Vec::new(),
        });
    }

    let dx = width / plan.total_cols as f64;
    let dy = height / plan.total_rows as f64;
    let radius = config.radius_factor * dx.min(dy);

    let mut bands = Vec::with_capacity(layer_ids.len());
    let mut y_min = 0.0;
    for (layer_id, rows) in layer_ids.iter().zip(&plan.rows) {
        let layer = &mut network.layers[*layer_id];
        let y_max = (y_min + *rows as f64 * dy).min(height);

        let keys: Vec<EntryKey> = layer.membership.keys().collect();
        for (index, key) in keys.iter().enumerate() {
            let Some(state) = layer.membership.get_mut(*key) else {
                continue;
            };
            if config.respect_pins && state.pinned {
                if let Some(p) = state.position {
                    state.position = Some(Point2::new(p.x.clamp(0.0, width), p.y.clamp(0.0, height)));
                    continue;
                }
            }
            let row = index / plan.total_cols;
            let col = centered_column(index % plan.total_cols, plan.total_cols);
            state.position = Some(Point2::new(
                (col as f64 + 0.5) * dx,
                y_min + (row as f64 + 0.5) * dy,
            ));
            state.pinned = false;
        }

        layer.dims = Some(LayerDims {
            y_min,
            y_max,
            width,
        });
        debug!(
            layer = %layer.name,
            rows,
            entries = keys.len(),
            y_min,
            y_max,
            "Layer band placed."
        );
        bands.push(LayerBand {
            layer: layer.name.clone(),
            y_min,
            y_max,
            rows: *rows,
            entries: keys.len(),
        });
        y_min = y_max;
    }

    let generation = network.mark_laid_out();
    info!(
        total_rows = plan.total_rows,
        total_cols = plan.total_cols,
        radius,
        "Layout complete."
    );
    Ok(LayoutResult {
        generation,
        width,
        height,
        radius,
        total_rows: plan.total_rows,
        total_cols: plan.total_cols,
        bands,
    })
}
