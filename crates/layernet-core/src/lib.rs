//! # layernet Core Library
//!
//! An in-memory multi-layer interaction network (genes, compounds, miRNAs,
//! transcription factors, protein-protein interactions) together with the
//! algorithms that prepare it for display: collapsing nodes that share a link
//! signature into group nodes, and packing every visible layer into a shared
//! row/column grid.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer split so that data, algorithms and
//! end-to-end procedures stay independently testable.
//!
//! - **[`core`]: The Foundation.** The network data model (`MultiLayerNetwork`),
//!   layer presets, the link-signature hash and record/catalog loaders.
//!
//! - **[`engine`]: The Logic Core.** Grouping, grid layout, display control and
//!   scene extraction, plus the configuration and error types they share.
//!
//! - **[`workflows`]: The Public API.** High-level procedures that tie `engine`
//!   and `core` together, such as arranging a network for a given viewport.

pub mod core;
pub mod engine;
pub mod workflows;
