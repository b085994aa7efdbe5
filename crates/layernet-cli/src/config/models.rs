use crate::ingest::SourceSpec;
use layernet::core::io::catalog::CatalogEntry;
use layernet::core::models::node::LinkPolicy;
use layernet::engine::config::{LayoutConfig, Viewport};

/// Fully merged settings of one invocation.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub viewport: Viewport,
    pub layout: LayoutConfig,
    pub link_policy: LinkPolicy,
    /// Layer declarations in registration order: catalog file first, then
    /// the config file's own `[[layers]]`.
    pub layers: Vec<CatalogEntry>,
    pub sources: Vec<SourceSpec>,
}
