//! Configuration types for the calibration pipeline.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading or saving configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Configuration for comparison plots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotConfig {
    /// Image width in pixels
    #[serde(default = "default_width")]
    pub width: u32,

    /// Image height in pixels
    #[serde(default = "default_height")]
    pub height: u32,

    /// Width of the legend column to the right of the chart
    #[serde(default = "default_legend_width")]
    pub legend_width: u32,

    /// Stroke width of each curve
    #[serde(default = "default_line_width")]
    pub line_width: u32,

    /// Render title, axis labels and legend text.
    ///
    /// Text rendering needs a system sans-serif font; hosts without one can
    /// turn it off and still get the curves and grid.
    #[serde(default = "default_draw_text")]
    pub draw_text: bool,
}

fn default_width() -> u32 {
    1200
}

fn default_height() -> u32 {
    600
}

fn default_legend_width() -> u32 {
    200
}

fn default_line_width() -> u32 {
    2
}

fn default_draw_text() -> bool {
    true
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            legend_width: default_legend_width(),
            line_width: default_line_width(),
            draw_text: default_draw_text(),
        }
    }
}

/// Main pipeline configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub plot: PlotConfig,
}

impl PipelineConfig {
    /// Load configuration from a YAML file.
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: PipelineConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a YAML file.
    pub fn to_yaml<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
