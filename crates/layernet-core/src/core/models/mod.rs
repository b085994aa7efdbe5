//! # Core Models Module
//!
//! Data structures describing a multi-layer network.
//!
//! ## Key Components
//!
//! - [`ids`] - Identifier types for layers, nodes, group nodes and layer entries
//! - [`layer`] - Layer display configuration and the per-layer membership set
//! - [`node`] - Nodes, their links and the input record format
//! - [`group`] - Synthetic group nodes produced by the grouping engine
//! - [`network`] - The `MultiLayerNetwork` store: layer registry, node store and link index
//!
//! ## Usage
//!
//! ```ignore
//! use layernet::core::models::layer::{LayerConfig, Shape};
//! use layernet::core::models::network::MultiLayerNetwork;
//! use layernet::core::models::node::NodeRecord;
//!
//! let mut network = MultiLayerNetwork::new();
//! network.add_layer("Gene", LayerConfig::new("yellow", Shape::Ellipse))?;
//! network.add_nodes("Gene", [NodeRecord::new(1, "ENSG01", "TP53")])?;
//! ```

pub mod group;
pub mod ids;
pub mod layer;
pub mod network;
pub mod node;
