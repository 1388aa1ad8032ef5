use std::path::PathBuf;

use crate::data::aggregate::PayloadRange;
use crate::data::model::LaunchTable;

/// Launch export read at startup, relative to the working directory.
pub const DEFAULT_DATA_FILE: &str = "spacex_launch_dash.csv";

/// Startup settings for the dashboard window.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    pub window_size: [f32; 2],
    pub min_window_size: [f32; 2],
    /// Slider granularity in kg.
    pub slider_step: f64,
    /// Slider value on first render; also the narrowest slider extent.
    pub default_payload: PayloadRange,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_FILE),
            window_size: [1000.0, 900.0],
            min_window_size: [600.0, 400.0],
            slider_step: 1000.0,
            default_payload: PayloadRange::default(),
        }
    }
}

impl DashboardConfig {
    /// Slider extent: the observed payloads rounded out to the slider step,
    /// widened to at least the default range.
    pub fn slider_bounds(&self, table: &LaunchTable) -> (f64, f64) {
        let step = self.slider_step;
        let lo = table
            .min_payload()
            .map_or(self.default_payload.min, |m| (m / step).floor() * step)
            .min(self.default_payload.min);
        let hi = table
            .max_payload()
            .map_or(self.default_payload.max, |m| (m / step).ceil() * step)
            .max(self.default_payload.max);
        (lo, hi)
    }
}
