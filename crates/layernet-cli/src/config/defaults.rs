use layernet::engine::config::DEFAULT_RADIUS_FACTOR;

pub struct DefaultsConfig {
    pub width: f64,
    pub height: f64,
    pub radius_factor: f64,
    pub respect_pins: bool,
    pub apply_grouping: bool,
    pub deduplicate_links: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            radius_factor: DEFAULT_RADIUS_FACTOR,
            respect_pins: true,
            apply_grouping: true,
            deduplicate_links: true,
        }
    }
}
