use super::LoadError;
use crate::core::models::layer::{LayerConfig, Shape};
use crate::core::models::network::{MultiLayerNetwork, NetworkError};
use crate::core::presets::preset_config;
use serde::Deserialize;
use std::path::Path;

/// Declaration of one layer. Unset style fields fall back to the layer's preset.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct CatalogEntry {
    pub name: String,
    pub color: Option<String>,
    pub shape: Option<Shape>,
    pub grouped: Option<bool>,
    pub visible: Option<bool>,
    pub z_index: Option<i32>,
}

impl CatalogEntry {
    pub fn to_config(&self) -> LayerConfig {
        let preset = preset_config(&self.name);
        LayerConfig {
            color: self.color.clone().unwrap_or(preset.color),
            shape: self.shape.unwrap_or(preset.shape),
            grouped: self.grouped.unwrap_or(preset.grouped),
            visible: self.visible.unwrap_or(preset.visible),
            z_index: self.z_index.or(preset.z_index),
        }
    }
}

/// Ordered list of layer declarations, read from `[[layers]]` tables.
///
/// ```toml
/// [[layers]]
/// name = "Gene"
/// color = "yellow"
///
/// [[layers]]
/// name = "Compound"
/// shape = "hexagon"
/// grouped = true
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LayerCatalog {
    #[serde(default)]
    pub layers: Vec<CatalogEntry>,
}

impl LayerCatalog {
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| LoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| LoadError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })
    }

    pub fn entry(&self, name: &str) -> Option<&CatalogEntry> {
        self.layers.iter().find(|entry| entry.name == name)
    }

    /// Registers every declared layer, in declaration order.
    pub fn apply(&self, network: &mut MultiLayerNetwork) -> Result<(), NetworkError> {
        for entry in &self.layers {
            network.add_layer(&entry.name, entry.to_config())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    const CATALOG: &str = r#"
        [[layers]]
        name = "Gene"

        [[layers]]
        name = "Compound"
        color = "green"
        grouped = true
        z-index = 10

        [[layers]]
        name = "Pathway"
        shape = "square"
        visible = false
    "#;

    #[test]
    fn entries_merge_over_presets() {
        let catalog: LayerCatalog = toml::from_str(CATALOG).unwrap();

        let gene = catalog.entry("Gene").unwrap().to_config();
        assert_eq!(gene.color, "yellow");
        assert_eq!(gene.shape, Shape::Ellipse);

        let compound = catalog.entry("Compound").unwrap().to_config();
        assert_eq!(compound.color, "green");
        assert_eq!(compound.shape, Shape::Hexagon);
        assert!(compound.grouped);
        assert_eq!(compound.z_index, Some(10));

        let pathway = catalog.entry("Pathway").unwrap().to_config();
        assert_eq!(pathway.shape, Shape::Rectangle);
        assert!(!pathway.visible);
    }

    #[test]
    fn apply_registers_layers_in_declaration_order() {
        let catalog: LayerCatalog = toml::from_str(CATALOG).unwrap();
        let mut network = MultiLayerNetwork::new();
        catalog.apply(&mut network).unwrap();

        assert_eq!(network.layer_count(), 3);
        let visible: Vec<&str> = network
            .visible_layers()
            .iter()
            .map(|l| l.name.as_str())
            .collect();
        assert_eq!(visible, vec!["Gene", "Compound"]);
    }

    #[test]
    fn load_reports_unknown_fields_as_toml_errors() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("layers.toml");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "[[layers]]\nname = \"Gene\"\nopacity = 0.5").unwrap();

        assert!(matches!(
            LayerCatalog::load(&path),
            Err(LoadError::Toml { .. })
        ));
    }

    #[test]
    fn load_succeeds_with_valid_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("layers.toml");
        std::fs::write(&path, CATALOG).unwrap();
        let catalog = LayerCatalog::load(&path).unwrap();
        assert_eq!(catalog.layers.len(), 3);
    }
}
