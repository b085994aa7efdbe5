use crate::core::models::network::MultiLayerNetwork;
use crate::engine::config::{LayoutConfig, Viewport};
use crate::engine::error::EngineError;
use crate::engine::grouping::{GroupingSummary, apply_grouping_flags};
use crate::engine::layout::{LayoutResult, compute_layout, validate_viewport};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::scene::{Scene, build_scene};
use tracing::{info, instrument};

#[derive(Debug, Clone)]
pub struct ArrangeResult {
    pub grouping: GroupingSummary,
    pub layout: LayoutResult,
    pub scene: Scene,
}

#[instrument(skip_all, name = "arrange_workflow")]
pub fn run(
    network: &mut MultiLayerNetwork,
    viewport: Viewport,
    config: &LayoutConfig,
    reporter: &ProgressReporter,
) -> Result<ArrangeResult, EngineError> {
    validate_viewport(viewport.width, viewport.height)?;

    // === Phase 1: Grouping ===
    let grouping = if config.apply_grouping {
        reporter.report(Progress::PhaseStart { name: "Grouping" });
        let summary = apply_grouping_flags(network)?;
        info!(
            groups = summary.groups,
            grouped_nodes = summary.grouped_nodes,
            singletons = summary.singletons,
            "Grouping flags applied."
        );
        reporter.report(Progress::PhaseFinish);
        summary
    } else {
        GroupingSummary::default()
    };

    // === Phase 2: Layout ===
    reporter.report(Progress::PhaseStart { name: "Layout" });
    let layout = compute_layout(network, viewport, config)?;
    reporter.report(Progress::Message(format!(
        "{} x {} grid",
        layout.total_rows, layout.total_cols
    )));
    for band in &layout.bands {
        reporter.report(Progress::Message(format!(
            "{}: {} entries in {} row(s)",
            band.layer, band.entries, band.rows
        )));
    }
    reporter.report(Progress::PhaseFinish);

    // === Phase 3: Scene ===
    reporter.report(Progress::PhaseStart { name: "Scene" });
    let scene = build_scene(network, &layout);
    reporter.report(Progress::PhaseFinish);

    info!(
        nodes = scene.nodes.len(),
        edges = scene.edges.len(),
        generation = scene.generation,
        "Arrange workflow finished."
    );
    Ok(ArrangeResult {
        grouping,
        layout,
        scene,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::layer::{LayerConfig, Shape};
    use crate::core::models::node::NodeRecord;
    use std::sync::Mutex;

    fn network() -> MultiLayerNetwork {
        let mut network = MultiLayerNetwork::new();
        network
            .add_layer("Gene", LayerConfig::new("yellow", Shape::Ellipse))
            .unwrap();
        network
            .add_layer(
                "Compound",
                LayerConfig::new("lime", Shape::Hexagon).grouped(true),
            )
            .unwrap();
        network
            .add_nodes("Gene", [NodeRecord::new(1, "G1", "TP53")])
            .unwrap();
        let compounds: Vec<NodeRecord> = (10..22)
            .map(|id| NodeRecord::new(id, &format!("C{id}"), &format!("cmp{id}")).linked(1, "Gene"))
            .collect();
        network.add_nodes("Compound", compounds).unwrap();
        network
    }

    #[test]
    fn run_groups_lays_out_and_extracts_scene() {
        let mut network = network();
        let result = run(
            &mut network,
            Viewport::new(500.0, 500.0),
            &LayoutConfig::default(),
            &ProgressReporter::new(),
        )
        .unwrap();

        assert_eq!(result.grouping.groups, 1);
        assert_eq!(result.grouping.grouped_nodes, 12);
        assert_eq!(result.scene.nodes.len(), 2);
        assert_eq!(result.scene.edges.len(), 1);
        assert!(result.scene.is_current(&network));
        assert!(!network.needs_layout());
    }

    #[test]
    fn grouping_can_be_skipped() {
        let mut network = network();
        let config = LayoutConfig {
            apply_grouping: false,
            ..LayoutConfig::default()
        };
        let result = run(
            &mut network,
            Viewport::new(500.0, 500.0),
            &config,
            &ProgressReporter::new(),
        )
        .unwrap();

        assert_eq!(result.grouping, GroupingSummary::default());
        assert_eq!(result.scene.nodes.len(), 13);
        assert_eq!(result.scene.edges.len(), 12);
    }

    #[test]
    fn invalid_viewport_fails_before_grouping() {
        let mut network = network();
        let before = network.generation();
        let result = run(
            &mut network,
            Viewport::new(500.0, -1.0),
            &LayoutConfig::default(),
            &ProgressReporter::new(),
        );

        assert!(matches!(result, Err(EngineError::InvalidViewport { .. })));
        assert_eq!(network.generation(), before);
        assert!(!network.layer("Compound").unwrap().has_groups());
    }

    #[test]
    fn phases_are_reported_in_order() {
        let phases = Mutex::new(Vec::new());
        let messages = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| match event {
            Progress::PhaseStart { name } => phases.lock().unwrap().push(name),
            Progress::Message(msg) => messages.lock().unwrap().push(msg),
            Progress::PhaseFinish => {}
        }));
        let mut network = network();
        run(
            &mut network,
            Viewport::new(300.0, 200.0),
            &LayoutConfig::default(),
            &reporter,
        )
        .unwrap();
        drop(reporter);

        assert_eq!(
            phases.into_inner().unwrap(),
            vec!["Grouping", "Layout", "Scene"]
        );
        let messages = messages.into_inner().unwrap();
        assert!(messages.contains(&"Gene: 1 entries in 1 row(s)".to_string()));
        assert!(messages.contains(&"Compound: 1 entries in 1 row(s)".to_string()));
    }
}
