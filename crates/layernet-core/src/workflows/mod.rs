//! # Workflows Module
//!
//! End-to-end procedures built on the engine. A workflow takes a prepared
//! `MultiLayerNetwork`, runs the engine steps in order and reports each phase
//! through a [`ProgressReporter`](crate::engine::progress::ProgressReporter).
//!
//! - **Arrange Workflow** ([`arrange`]) - Applies the layers' grouping flags,
//!   computes the grid layout for a viewport and extracts the render scene.

pub mod arrange;
