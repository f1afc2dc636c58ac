use serde::{Deserialize, Serialize};
use std::path::Path;

/// Spacing knobs of the layout engine. These are presentation tuning values,
/// not algorithmic invariants; the defaults reproduce the editor's canvas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Vertical distance between tree levels.
    pub level_height: i32,
    /// Vertical offset of the root level.
    pub level_offset: i32,
    /// Fixed x anchor of the root feature.
    pub root_x: i32,
    /// Minimum horizontal gap between adjacent subtrees.
    pub subtree_padding: i32,
    /// Estimated half-width contribution per label character.
    pub scale_text: i32,
    /// Cap on a node's rendered width; longer labels are cut off.
    pub max_node_width: i32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            level_height: 100,
            level_offset: 50,
            root_x: 400,
            subtree_padding: 50,
            scale_text: 3,
            max_node_width: 120,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub layout: LayoutConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    level_height: Option<i32>,
    level_offset: Option<i32>,
    root_x: Option<i32>,
    subtree_padding: Option<i32>,
    scale_text: Option<i32>,
    max_node_width: Option<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    layout: Option<LayoutConfigFile>,
}

/// Loads a JSON config file, overriding defaults field by field. A missing
/// path yields the defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed: ConfigFile = serde_json::from_str(&contents)?;
    apply_config_file(&mut config, parsed);
    Ok(config)
}

fn apply_config_file(config: &mut Config, parsed: ConfigFile) {
    if let Some(layout) = parsed.layout {
        if let Some(v) = layout.level_height {
            config.layout.level_height = v;
        }
        if let Some(v) = layout.level_offset {
            config.layout.level_offset = v;
        }
        if let Some(v) = layout.root_x {
            config.layout.root_x = v;
        }
        if let Some(v) = layout.subtree_padding {
            config.layout.subtree_padding = v;
        }
        if let Some(v) = layout.scale_text {
            config.layout.scale_text = v;
        }
        if let Some(v) = layout.max_node_width {
            config.layout.max_node_width = v;
        }
    }
}
