use crate::core::models::layer::{LayerConfig, Shape};
use phf::{Map, phf_map};

pub const DEFAULT_COLOR: &str = "LightGray";
pub const DEFAULT_SHAPE: Shape = Shape::Ellipse;

/// Display styles of the interaction layers known to the data service.
#[rustfmt::skip]
pub static LAYER_PRESETS: Map<&'static str, (&'static str, Shape)> = phf_map! {
    "Gene"          => ("yellow",    Shape::Ellipse),
    "Compound"      => ("lime",      Shape::Hexagon),
    "miRNA"         => ("cyan",      Shape::Triangle),
    "PPI"           => ("LightGray", Shape::Ellipse),
    "Interactions"  => ("LightGray", Shape::Ellipse),
    "Transcription" => ("orange",    Shape::Diamond),
};

/// Layer configuration for `name`: its preset style if known, a neutral one otherwise.
pub fn preset_config(name: &str) -> LayerConfig {
    let (color, shape) = LAYER_PRESETS
        .get(name)
        .copied()
        .unwrap_or((DEFAULT_COLOR, DEFAULT_SHAPE));
    LayerConfig::new(color, shape)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_layers_use_their_preset_style() {
        let compound = preset_config("Compound");
        assert_eq!(compound.color, "lime");
        assert_eq!(compound.shape, Shape::Hexagon);
        assert!(compound.visible);
        assert!(!compound.grouped);
    }

    #[test]
    fn unknown_layers_fall_back_to_neutral_style() {
        let other = preset_config("Pathway");
        assert_eq!(other.color, DEFAULT_COLOR);
        assert_eq!(other.shape, DEFAULT_SHAPE);
    }
}
