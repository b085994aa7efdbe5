//! # Engine Module
//!
//! Algorithms that turn a `MultiLayerNetwork` into something displayable.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Layout parameters and their builder
//! - **Error Handling** ([`error`]) - Engine-specific error types
//! - **Grouping** ([`grouping`]) - Condensing nodes with identical link signatures into group nodes
//! - **Layout** ([`layout`]) - Row/column grid packing of the visible layers under the viewport aspect ratio
//! - **Display Control** ([`display`]) - Layer visibility changes that invalidate the current layout
//! - **Scene Extraction** ([`scene`]) - Positioned node and edge records for a renderer
//! - **Progress Monitoring** ([`progress`]) - Phase reporting for long-running workflows
//!
//! Grouping and layout are deterministic: the same network state always yields
//! the same groups and the same positions.

pub mod config;
pub mod display;
pub mod error;
pub mod grouping;
pub mod layout;
pub mod progress;
pub mod scene;
