use std::collections::HashMap;

use eframe::egui::Color32;

use crate::config::ScaleRanges;
use crate::graph::ResolvedGraph;
use crate::util::stable_index;

/// Category10.
pub const CATEGORY10: [Color32; 10] = [
    Color32::from_rgb(0x1f, 0x77, 0xb4),
    Color32::from_rgb(0xff, 0x7f, 0x0e),
    Color32::from_rgb(0x2c, 0xa0, 0x2c),
    Color32::from_rgb(0xd6, 0x27, 0x28),
    Color32::from_rgb(0x94, 0x67, 0xbd),
    Color32::from_rgb(0x8c, 0x56, 0x4b),
    Color32::from_rgb(0xe3, 0x77, 0xc2),
    Color32::from_rgb(0x7f, 0x7f, 0x7f),
    Color32::from_rgb(0xbc, 0xbd, 0x22),
    Color32::from_rgb(0x17, 0xbe, 0xcf),
];

/// Unclamped affine map from `[0, domain_max]` onto `range`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
    domain_max: f64,
    range: [f32; 2],
}

impl LinearScale {
    pub fn new(domain_max: f64, range: [f32; 2]) -> Self {
        Self { domain_max, range }
    }

    pub fn map(&self, value: f64) -> f32 {
        let [start, end] = self.range;
        let t = if self.domain_max > 0.0 && self.domain_max.is_finite() {
            value / self.domain_max
        } else {
            0.5
        };
        (f64::from(start) + f64::from(end - start) * t) as f32
    }
}

/// Zone to palette entry, assigned in order of first appearance.
#[derive(Clone, Debug, PartialEq)]
pub struct OrdinalScale {
    palette: Vec<Color32>,
    slots: HashMap<String, usize>,
}

impl OrdinalScale {
    pub fn new<'a>(palette: &[Color32], keys: impl IntoIterator<Item = &'a str>) -> Self {
        let mut slots = HashMap::new();
        for key in keys {
            let next = slots.len();
            slots.entry(key.to_owned()).or_insert(next);
        }

        Self {
            palette: palette.to_vec(),
            slots,
        }
    }

    pub fn map(&self, key: &str) -> Color32 {
        if self.palette.is_empty() {
            return Color32::GRAY;
        }

        let slot = self
            .slots
            .get(key)
            .copied()
            .unwrap_or_else(|| stable_index(key, self.palette.len()));
        self.palette[slot % self.palette.len()]
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct VisualScales {
    pub link_width: LinearScale,
    pub node_radius: LinearScale,
    pub font_size: LinearScale,
    pub zone_color: OrdinalScale,
}

impl VisualScales {
    pub fn from_graph(graph: &ResolvedGraph, ranges: &ScaleRanges) -> Self {
        let max_influence = graph.max_influence();
        Self {
            link_width: LinearScale::new(graph.max_weight(), ranges.link_width),
            node_radius: LinearScale::new(max_influence, ranges.node_radius),
            font_size: LinearScale::new(max_influence, ranges.font_size),
            zone_color: OrdinalScale::new(
                &CATEGORY10,
                graph.nodes.iter().map(|node| node.zone.as_str()),
            ),
        }
    }
}
