use thiserror::Error;

pub const DEFAULT_RADIUS_FACTOR: f64 = 0.3;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid value for '{name}': {reason}")]
    InvalidValue { name: &'static str, reason: String },
}

/// Parameters of a layout pass.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Node radius as a fraction of the smaller cell side.
    pub radius_factor: f64,
    /// Keep manually placed (pinned) entries where they are.
    pub respect_pins: bool,
    /// Group or ungroup layers according to their `grouped` flag before layout.
    pub apply_grouping: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            radius_factor: DEFAULT_RADIUS_FACTOR,
            respect_pins: true,
            apply_grouping: true,
        }
    }
}

#[derive(Default)]
pub struct LayoutConfigBuilder {
    radius_factor: Option<f64>,
    respect_pins: Option<bool>,
    apply_grouping: Option<bool>,
}

impl LayoutConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn radius_factor(mut self, factor: f64) -> Self {
        self.radius_factor = Some(factor);
        self
    }
    pub fn respect_pins(mut self, respect: bool) -> Self {
        self.respect_pins = Some(respect);
        self
    }
    pub fn apply_grouping(mut self, apply: bool) -> Self {
        self.apply_grouping = Some(apply);
        self
    }

    pub fn build(self) -> Result<LayoutConfig, ConfigError> {
        let defaults = LayoutConfig::default();
        let radius_factor = self.radius_factor.unwrap_or(defaults.radius_factor);
        // A radius above half the cell side would let neighbouring nodes overlap.
        if !(radius_factor > 0.0 && radius_factor <= 0.5) {
            return Err(ConfigError::InvalidValue {
                name: "radius_factor",
                reason: format!("expected a value in (0, 0.5], got {}", radius_factor),
            });
        }
        Ok(LayoutConfig {
            radius_factor,
            respect_pins: self.respect_pins.unwrap_or(defaults.respect_pins),
            apply_grouping: self.apply_grouping.unwrap_or(defaults.apply_grouping),
        })
    }
}

/// Viewport the layout is computed for, in renderer units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Default)]
pub struct ViewportBuilder {
    width: Option<f64>,
    height: Option<f64>,
}

impl ViewportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }
    pub fn height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }

    pub fn build(self) -> Result<Viewport, ConfigError> {
        Ok(Viewport {
            width: self.width.ok_or(ConfigError::MissingParameter("width"))?,
            height: self.height.ok_or(ConfigError::MissingParameter("height"))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_falls_back_to_defaults() {
        let config = LayoutConfigBuilder::new().build().unwrap();
        assert_eq!(config, LayoutConfig::default());
        assert_eq!(config.radius_factor, DEFAULT_RADIUS_FACTOR);
    }

    #[test]
    fn builder_overrides_individual_fields() {
        let config = LayoutConfigBuilder::new()
            .radius_factor(0.25)
            .respect_pins(false)
            .apply_grouping(false)
            .build()
            .unwrap();
        assert_eq!(config.radius_factor, 0.25);
        assert!(!config.respect_pins);
        assert!(!config.apply_grouping);
    }

    #[test]
    fn builder_rejects_out_of_range_radius_factor() {
        for bad in [0.0, -0.1, 0.51, f64::NAN] {
            let result = LayoutConfigBuilder::new().radius_factor(bad).build();
            assert!(
                matches!(result, Err(ConfigError::InvalidValue { name: "radius_factor", .. })),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn viewport_builder_requires_both_dimensions() {
        assert_eq!(
            ViewportBuilder::new().width(10.0).build(),
            Err(ConfigError::MissingParameter("height"))
        );
        assert_eq!(
            ViewportBuilder::new().height(10.0).build(),
            Err(ConfigError::MissingParameter("width"))
        );
        assert_eq!(
            ViewportBuilder::new().width(3.0).height(4.0).build(),
            Ok(Viewport::new(3.0, 4.0))
        );
    }
}
