use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Named parameter bundles. `Primary` is the overlap-aware layout with
/// predicate-driven link forces; `Compact` uses uniform links, extra x/y
/// positioning and quadratic link paths.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    #[default]
    Primary,
    Compact,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkPathPolicy {
    /// Cardinal spline through source, midpoint and target, with the midpoint
    /// pushed sideways for overlapping links.
    #[default]
    Cardinal,
    /// Single quadratic curve through the plain midpoint.
    Quadratic,
}

impl LinkPathPolicy {
    pub fn label(self) -> &'static str {
        match self {
            Self::Cardinal => "cardinal",
            Self::Quadratic => "quadratic",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ForceToggles {
    pub charge: bool,
    pub link: bool,
    pub collision: bool,
    pub center: bool,
    pub position: bool,
}

impl Default for ForceToggles {
    fn default() -> Self {
        Self {
            charge: true,
            link: true,
            collision: true,
            center: true,
            position: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct LinkRule {
    /// Node id; the rule applies when either end of a link is this node.
    pub touches: String,
    #[serde(default)]
    pub distance: Option<f32>,
    #[serde(default)]
    pub strength: Option<f32>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LinkForceConfig {
    pub default_distance: f32,
    /// `None` keeps the degree-based default `1 / min(deg(source), deg(target))`.
    pub default_strength: Option<f32>,
    pub rules: Vec<LinkRule>,
}

impl Default for LinkForceConfig {
    fn default() -> Self {
        Self {
            default_distance: 50.0,
            default_strength: Some(0.25),
            rules: vec![
                LinkRule {
                    touches: "0".to_owned(),
                    distance: Some(75.0),
                    strength: None,
                },
                LinkRule {
                    touches: "1".to_owned(),
                    distance: None,
                    strength: Some(1.15),
                },
            ],
        }
    }
}

impl LinkForceConfig {
    pub fn distance_for(&self, source_id: &str, target_id: &str) -> f32 {
        self.rules
            .iter()
            .filter(|rule| rule.touches == source_id || rule.touches == target_id)
            .find_map(|rule| rule.distance)
            .unwrap_or(self.default_distance)
    }

    pub fn strength_for(&self, source_id: &str, target_id: &str) -> Option<f32> {
        self.rules
            .iter()
            .filter(|rule| rule.touches == source_id || rule.touches == target_id)
            .find_map(|rule| rule.strength)
            .or(self.default_strength)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScaleRanges {
    pub link_width: [f32; 2],
    pub node_radius: [f32; 2],
    pub font_size: [f32; 2],
}

impl Default for ScaleRanges {
    fn default() -> Self {
        Self {
            link_width: [0.5, 1.5],
            node_radius: [20.0, 50.0],
            font_size: [7.0, 12.0],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TooltipConfig {
    /// Gap between the hovered circle's edge and the card corner.
    pub margin: f32,
    pub padding: f32,
    /// Width of the card before the first hover sizes it to its text.
    pub min_width: f32,
    /// Floor for the card height.
    pub min_height: f32,
    pub name_font_size: f32,
    pub role_font_size: f32,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            margin: 3.0,
            padding: 8.0,
            min_width: 150.0,
            min_height: 45.0,
            name_font_size: 16.0,
            role_font_size: 12.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AssetConfig {
    pub dir: PathBuf,
    pub prefix: String,
    pub extension: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("image"),
            prefix: "img-".to_owned(),
            extension: "png".to_owned(),
        }
    }
}

impl AssetConfig {
    /// Images are keyed by the node's position in the input, not its id.
    pub fn image_path(&self, ordinal: usize) -> PathBuf {
        self.dir
            .join(format!("{}{ordinal}.{}", self.prefix, self.extension))
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub charge_strength: f32,
    pub link: LinkForceConfig,
    pub collision_margin: f32,
    /// Strength of the x/y positioning forces toward the viewport center.
    pub positioning_strength: Option<f32>,
    pub forces: ForceToggles,
    pub scales: ScaleRanges,
    pub link_path: LinkPathPolicy,
    pub dashed_links: bool,
    pub curve_sharpness: f32,
    pub drag_alpha_target: f32,
    pub resize_alpha: f32,
    pub tooltip: TooltipConfig,
    pub assets: AssetConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::preset(Preset::Primary)
    }
}

impl LayoutConfig {
    pub fn preset(preset: Preset) -> Self {
        let primary = Self {
            charge_strength: -400.0,
            link: LinkForceConfig::default(),
            collision_margin: 5.0,
            positioning_strength: None,
            forces: ForceToggles::default(),
            scales: ScaleRanges::default(),
            link_path: LinkPathPolicy::Cardinal,
            dashed_links: true,
            curve_sharpness: 7.0,
            drag_alpha_target: 0.3,
            resize_alpha: 0.5,
            tooltip: TooltipConfig::default(),
            assets: AssetConfig::default(),
        };

        match preset {
            Preset::Primary => primary,
            Preset::Compact => Self {
                link: LinkForceConfig {
                    default_distance: 75.0,
                    default_strength: None,
                    rules: Vec::new(),
                },
                positioning_strength: Some(0.05),
                link_path: LinkPathPolicy::Quadratic,
                dashed_links: false,
                ..primary
            },
        }
    }

    /// Overlays a JSON config file on top of `preset`. Keys absent from the
    /// file keep the preset's value.
    pub fn load_over(preset: Preset, path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config from {}", path.display()))?;
        Self::parse_over(preset, &raw)
            .with_context(|| format!("invalid config in {}", path.display()))
    }

    fn parse_over(preset: Preset, raw: &str) -> Result<Self> {
        let overlay: Value = serde_json::from_str(raw).context("config is not valid JSON")?;
        let mut merged = preset_value(preset)?;
        merge_json(&mut merged, overlay);
        Self::deserialize(merged).context("config does not match the layout schema")
    }
}

fn preset_value(preset: Preset) -> Result<Value> {
    serde_json::to_value(LayoutConfig::preset(preset)).context("failed to encode preset")
}

fn merge_json(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(slot) => merge_json(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_rules_match_either_end() {
        let link = LayoutConfig::preset(Preset::Primary).link;
        assert_eq!(link.distance_for("0", "4"), 75.0);
        assert_eq!(link.distance_for("4", "0"), 75.0);
        assert_eq!(link.distance_for("3", "4"), 50.0);
        assert_eq!(link.strength_for("1", "4"), Some(1.15));
        assert_eq!(link.strength_for("4", "1"), Some(1.15));
        assert_eq!(link.strength_for("0", "4"), Some(0.25));
    }

    #[test]
    fn compact_preset_uses_degree_strength_and_quadratic_paths() {
        let config = LayoutConfig::preset(Preset::Compact);
        assert_eq!(config.link.distance_for("0", "1"), 75.0);
        assert_eq!(config.link.strength_for("0", "1"), None);
        assert_eq!(config.positioning_strength, Some(0.05));
        assert_eq!(config.link_path, LinkPathPolicy::Quadratic);
        assert_eq!(config.charge_strength, -400.0);
    }

    #[test]
    fn partial_file_overlays_the_preset() {
        let raw = r#"{ "charge_strength": -250, "tooltip": { "margin": 6 }, "link_path": "quadratic" }"#;
        let config = LayoutConfig::parse_over(Preset::Primary, raw).unwrap();

        assert_eq!(config.charge_strength, -250.0);
        assert_eq!(config.tooltip.margin, 6.0);
        assert_eq!(config.tooltip.padding, 8.0);
        assert_eq!(config.link_path, LinkPathPolicy::Quadratic);
        assert_eq!(config.link, LinkForceConfig::default());
    }

    #[test]
    fn unknown_policy_is_rejected() {
        assert!(LayoutConfig::parse_over(Preset::Primary, r#"{ "link_path": "bezier" }"#).is_err());
    }

    #[test]
    fn image_paths_follow_ordinal_convention() {
        let assets = AssetConfig::default();
        assert_eq!(assets.image_path(3), PathBuf::from("image/img-3.png"));
    }
}
