use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::AppConfig;
use crate::cli::{InputArgs, LayoutFlags};
use crate::error::{CliError, Result};
use layernet::core::io::catalog::LayerCatalog;
use layernet::core::models::node::LinkPolicy;
use layernet::engine::config::{LayoutConfigBuilder, ViewportBuilder};
use std::path::PathBuf;
use tracing::debug;

/// Merges command-line flags over the configuration file over the built-in
/// defaults. `-S` values are applied to the file layer first.
pub fn build_config(input: &InputArgs, flags: &LayoutFlags) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = match &input.config {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };
    let mut file_config = apply_set_values(file_config, &input.set_values)?;

    let layout_file = file_config.layout.take().unwrap_or_default();
    let width = flags
        .width
        .or(layout_file.width)
        .unwrap_or(defaults.width);
    let height = flags
        .height
        .or(layout_file.height)
        .unwrap_or(defaults.height);
    let radius_factor = flags
        .radius_factor
        .or(layout_file.radius_factor)
        .unwrap_or(defaults.radius_factor);
    let respect_pins =
        !flags.ignore_pins && layout_file.respect_pins.unwrap_or(defaults.respect_pins);
    let apply_grouping =
        !flags.no_grouping && layout_file.apply_grouping.unwrap_or(defaults.apply_grouping);

    let layout = LayoutConfigBuilder::new()
        .radius_factor(radius_factor)
        .respect_pins(respect_pins)
        .apply_grouping(apply_grouping)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;
    let viewport = ViewportBuilder::new()
        .width(width)
        .height(height)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    let links_file = file_config.links.take().unwrap_or_default();
    let deduplicate = match (input.links.dedupe_links, input.links.append_links) {
        (true, false) => true,
        (false, true) => false,
        _ => links_file
            .deduplicate
            .unwrap_or(defaults.deduplicate_links),
    };
    let link_policy = if deduplicate {
        LinkPolicy::Deduplicate
    } else {
        LinkPolicy::Append
    };

    let mut layers = match input.catalog.clone().or(file_config.catalog.take()) {
        Some(path) => {
            debug!("Loading layer catalog from {:?}", path);
            LayerCatalog::load(&path)?.layers
        }
        None => Vec::new(),
    };
    layers.extend(file_config.layers);

    Ok(AppConfig {
        viewport,
        layout,
        link_policy,
        layers,
        sources: file_config.sources,
    })
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value.parse().map_err(|_| {
        CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value))
    })
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };

        match key {
            "layout.width" => {
                config.layout.get_or_insert_with(Default::default).width =
                    Some(parse_value(key, value_str, "float")?);
            }
            "layout.height" => {
                config.layout.get_or_insert_with(Default::default).height =
                    Some(parse_value(key, value_str, "float")?);
            }
            "layout.radius-factor" => {
                config.layout.get_or_insert_with(Default::default).radius_factor =
                    Some(parse_value(key, value_str, "float")?);
            }
            "layout.respect-pins" => {
                config.layout.get_or_insert_with(Default::default).respect_pins =
                    Some(parse_value(key, value_str, "boolean")?);
            }
            "layout.apply-grouping" => {
                config.layout.get_or_insert_with(Default::default).apply_grouping =
                    Some(parse_value(key, value_str, "boolean")?);
            }
            "links.deduplicate" => {
                config.links.get_or_insert_with(Default::default).deduplicate =
                    Some(parse_value(key, value_str, "boolean")?);
            }
            "catalog" => {
                config.catalog = Some(PathBuf::from(value_str));
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}
