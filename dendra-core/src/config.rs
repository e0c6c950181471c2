//! Configuration types for Dendra

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::DendraResult;
use crate::matching::HighlightMode;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub labels: LabelConfig,
    #[serde(default)]
    pub matching: MatchConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
}

/// Label-synthesis policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelConfig {
    /// Trim leaf names at the last separator before labeling
    #[serde(default)]
    pub trim: bool,
    /// Separator joining leaf-derived tokens in synthesized labels
    #[serde(default = "default_separator")]
    pub separator: String,
    /// Wrap synthesized labels in structure markers
    #[serde(default = "default_true")]
    pub keep_structure: bool,
    /// Treat composite child labels as atomic tokens
    #[serde(default = "default_true")]
    pub keep_duplicates: bool,
}

/// Cluster-matching policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Minimum leaves for a sub-cluster to participate in matching
    #[serde(default = "default_min_leaves")]
    pub min_leaves: usize,
    /// Branch-comparison mode for matched pairs
    #[serde(default)]
    pub highlight: HighlightMode,
}

/// Default drawing region for layout passes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(default)]
    pub offset_x: f64,
    #[serde(default = "default_height")]
    pub offset_y: f64,
    #[serde(default = "default_label_reserve")]
    pub label_reserve: f64,
}

fn default_separator() -> String {
    "-".to_string()
}

fn default_true() -> bool {
    true
}

fn default_min_leaves() -> usize {
    2
}

fn default_width() -> f64 {
    800.0
}

fn default_height() -> f64 {
    600.0
}

fn default_label_reserve() -> f64 {
    100.0
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            trim: false,
            separator: default_separator(),
            keep_structure: true,
            keep_duplicates: true,
        }
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            min_leaves: default_min_leaves(),
            highlight: HighlightMode::default(),
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            offset_x: 0.0,
            offset_y: default_height(),
            label_reserve: default_label_reserve(),
        }
    }
}

/// Load a configuration from a TOML file.
pub fn load_config(path: &Path) -> DendraResult<Config> {
    let text = std::fs::read_to_string(path)?;
    let config = toml::from_str(&text)?;
    Ok(config)
}

/// Save a configuration as TOML.
pub fn save_config(config: &Config, path: &Path) -> DendraResult<()> {
    let text = toml::to_string_pretty(config)?;
    std::fs::write(path, text)?;
    Ok(())
}
