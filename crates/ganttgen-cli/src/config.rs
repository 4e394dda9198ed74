//! Optional TOML chart configuration.
//!
//! Mirrors the interactive knobs of the chart generator: figure sizing,
//! font size, and per-group color overrides. Groups without an override
//! take the default palette cyclically.
//!
//! ```toml
//! width = 1200
//! row_height = 32
//! font_size = 15
//!
//! [colors]
//! 1 = "#F991B4"
//! 3 = "#0EC3EB"
//! ```

use anyhow::{Context, Result};
use ganttgen_core::{ColorMap, GroupKey};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// TOML shape; color keys arrive as strings and are typed in [`ChartConfig::load`].
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawConfig {
    width: Option<u32>,
    row_height: Option<u32>,
    font_size: Option<u32>,
    colors: BTreeMap<String, String>,
}

/// Chart configuration merged over the renderer defaults.
#[derive(Clone, Debug, Default)]
pub struct ChartConfig {
    pub width: Option<u32>,
    pub row_height: Option<u32>,
    pub font_size: Option<u32>,
    pub colors: BTreeMap<GroupKey, String>,
}

impl ChartConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    fn parse(text: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(text)?;
        let mut colors = BTreeMap::new();
        for (key, color) in raw.colors {
            let group: GroupKey = key
                .parse()
                .with_context(|| format!("color key '{key}' is not a group number"))?;
            colors.insert(group, color);
        }
        Ok(Self {
            width: raw.width,
            row_height: raw.row_height,
            font_size: raw.font_size,
            colors,
        })
    }

    /// Build the color map for `groups`: default palette first, then any
    /// configured overrides on top.
    pub fn color_map(&self, groups: impl IntoIterator<Item = GroupKey>) -> ColorMap {
        let mut map = ColorMap::from_palette(groups);
        for (group, color) in &self.colors {
            map.insert(*group, color.clone());
        }
        map
    }
}
