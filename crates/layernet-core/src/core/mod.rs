//! # Core Module
//!
//! Stateless building blocks of the network model.
//!
//! - **Network Representation** ([`models`]) - Layers, nodes, group nodes and the
//!   `MultiLayerNetwork` store that ties them together
//! - **Link Signatures** ([`hash`]) - Deterministic FNV-1a hashing of canonical link lists
//! - **Layer Presets** ([`presets`]) - Built-in display styles for well-known layer names
//! - **File I/O** ([`io`]) - Loading node records (CSV) and layer catalogs (TOML)

pub mod hash;
pub mod io;
pub mod models;
pub mod presets;
