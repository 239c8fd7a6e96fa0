use eframe::egui::{Pos2, Vec2, vec2};

use super::scene::{ElementId, Scene, SceneBindings, Shape, TextMeasure};
use crate::config::TooltipConfig;
use crate::graph::ResolvedGraph;

/// Tracks the hovered node and keeps the shared card in sync with it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TooltipController {
    current: Option<usize>,
}

impl TooltipController {
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// Reveals and fills the card for `node`. Hovering another node while
    /// one is active swaps the content without hiding the card.
    pub fn enter(
        &mut self,
        scene: &mut Scene,
        bindings: &SceneBindings,
        graph: &ResolvedGraph,
        config: &TooltipConfig,
        measure: &dyn TextMeasure,
        node: usize,
    ) -> bool {
        let Some(record) = graph.nodes.get(node) else {
            tracing::trace!(node, "hover ignored, no such node");
            return false;
        };

        let card = bindings.card;
        set_text(scene, card.name, &record.name);
        set_text(scene, card.role, &record.role);

        let union = [card.name, card.role]
            .into_iter()
            .filter_map(|id| scene.text_bbox(id, measure))
            .reduce(|a, b| a.union(b));
        let size = match union {
            Some(bounds) => vec2(
                bounds.max.x + config.padding,
                (bounds.max.y + config.padding).max(config.min_height),
            ),
            None => vec2(config.min_width, config.min_height),
        };
        if let Some(Shape::Rect { size: panel, .. }) =
            scene.get_mut(card.background).map(|element| &mut element.shape)
        {
            *panel = size;
        }
        if let Some(group) = scene.get_mut(card.group) {
            group.visible = true;
        }

        if self.current.is_none() {
            tracing::debug!(node, "tooltip shown");
        }
        self.current = Some(node);
        true
    }

    pub fn exit(&mut self, scene: &mut Scene, bindings: &SceneBindings) -> bool {
        if self.current.take().is_none() {
            tracing::trace!("hover exit ignored, no tooltip");
            return false;
        }
        if let Some(group) = scene.get_mut(bindings.card.group) {
            group.visible = false;
        }
        tracing::debug!("tooltip hidden");
        true
    }

    /// Keeps the card next to the hovered node's rendered circle.
    pub fn follow(&self, scene: &mut Scene, bindings: &SceneBindings, margin: f32) {
        let Some(visuals) = self.current.and_then(|node| bindings.nodes.get(node)) else {
            return;
        };
        let Some(center) = circle_center(scene, visuals.circle) else {
            return;
        };

        let anchor = card_anchor(center, visuals.radius, margin);
        if let Some(group) = scene.get_mut(bindings.card.group) {
            group.translate = anchor.to_vec2();
        }
    }
}

/// Top-left corner of the card for a circle at `center` with `radius`.
pub fn card_anchor(center: Pos2, radius: f32, margin: f32) -> Pos2 {
    center + Vec2::splat(radius + margin)
}

fn circle_center(scene: &Scene, id: ElementId) -> Option<Pos2> {
    match &scene.get(id)?.shape {
        Shape::Circle { center, .. } => Some(*center + scene.world_offset(id)),
        _ => None,
    }
}

fn set_text(scene: &mut Scene, id: ElementId, text: &str) {
    if let Some(Shape::Text { content, .. }) = scene.get_mut(id).map(|element| &mut element.shape) {
        text.clone_into(content);
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::pos2;

    use super::*;
    use crate::app::scale::VisualScales;
    use crate::app::scene::{FixedAdvanceMeasure, build_scene};
    use crate::config::{LayoutConfig, Preset};
    use crate::graph::{GraphData, link, node};

    struct Fixture {
        graph: ResolvedGraph,
        scene: Scene,
        bindings: SceneBindings,
        config: TooltipConfig,
    }

    fn fixture() -> Fixture {
        let mut data = GraphData {
            nodes: vec![node("0", 10.0), node("1", 50.0)],
            links: vec![link("0", "1", 1.0, 0.0)],
        };
        data.nodes[1].name = "A considerably longer display name".to_owned();
        let graph = data.resolve().unwrap();
        let config = LayoutConfig::preset(Preset::Primary);
        let scales = VisualScales::from_graph(&graph, &config.scales);
        let (scene, bindings) = build_scene(&graph, &scales, &config);
        Fixture {
            graph,
            scene,
            bindings,
            config: config.tooltip,
        }
    }

    fn text_of(scene: &Scene, id: ElementId) -> String {
        match &scene.get(id).unwrap().shape {
            Shape::Text { content, .. } => content.clone(),
            _ => panic!("not a text element"),
        }
    }

    fn panel_size(fixture: &Fixture) -> Vec2 {
        match &fixture.scene.get(fixture.bindings.card.background).unwrap().shape {
            Shape::Rect { size, .. } => *size,
            _ => panic!("card background is not a rect"),
        }
    }

    #[test]
    fn enter_fills_and_sizes_the_card() {
        let mut f = fixture();
        let mut tooltip = TooltipController::default();
        assert!(tooltip.enter(
            &mut f.scene,
            &f.bindings,
            &f.graph,
            &f.config,
            &FixedAdvanceMeasure,
            0,
        ));

        assert_eq!(text_of(&f.scene, f.bindings.card.name), "Node 0");
        assert_eq!(text_of(&f.scene, f.bindings.card.role), "Role 0");
        assert!(f.scene.is_rendered(f.bindings.card.name));
        // Bold name: 8 + 6 * 16 * 0.65 = 70.4, plus padding. Role baseline
        // 35 plus descent 2.4 plus padding 8 overflows the 45 minimum.
        let size = panel_size(&f);
        assert!((size.x - 78.4).abs() < 1e-3);
        assert!((size.y - 45.4).abs() < 1e-4);
    }

    #[test]
    fn short_texts_shrink_the_panel_below_its_initial_width() {
        let mut f = fixture();
        let mut data = GraphData {
            nodes: vec![node("0", 10.0), node("1", 50.0)],
            links: vec![link("0", "1", 1.0, 0.0)],
        };
        data.nodes[0].name = "Bo".to_owned();
        data.nodes[0].role = "Aide".to_owned();
        f.graph = data.resolve().unwrap();

        let mut tooltip = TooltipController::default();
        tooltip.enter(&mut f.scene, &f.bindings, &f.graph, &f.config, &FixedAdvanceMeasure, 0);

        // Role is the wider line: 8 + 4 * 12 * 0.6 = 36.8, plus padding.
        let size = panel_size(&f);
        assert!((size.x - 44.8).abs() < 1e-3);
        assert!(size.x < f.config.min_width);
        assert!(size.y >= f.config.min_height);
    }

    #[test]
    fn long_names_widen_the_panel() {
        let mut f = fixture();
        let mut tooltip = TooltipController::default();
        tooltip.enter(&mut f.scene, &f.bindings, &f.graph, &f.config, &FixedAdvanceMeasure, 1);

        let name_width = FixedAdvanceMeasure.measure(&f.graph.nodes[1].name, 16.0, true).width;
        assert!((panel_size(&f).x - (8.0 + name_width + 8.0)).abs() < 1e-3);
    }

    #[test]
    fn hover_a_then_b_switches_without_hiding() {
        let mut f = fixture();
        let mut tooltip = TooltipController::default();
        tooltip.enter(&mut f.scene, &f.bindings, &f.graph, &f.config, &FixedAdvanceMeasure, 0);
        tooltip.enter(&mut f.scene, &f.bindings, &f.graph, &f.config, &FixedAdvanceMeasure, 1);

        assert_eq!(tooltip.current(), Some(1));
        assert!(f.scene.get(f.bindings.card.group).unwrap().visible);
        assert_eq!(
            text_of(&f.scene, f.bindings.card.name),
            "A considerably longer display name"
        );
    }

    #[test]
    fn exit_hides_and_clears() {
        let mut f = fixture();
        let mut tooltip = TooltipController::default();
        assert!(!tooltip.exit(&mut f.scene, &f.bindings));

        tooltip.enter(&mut f.scene, &f.bindings, &f.graph, &f.config, &FixedAdvanceMeasure, 0);
        assert!(tooltip.exit(&mut f.scene, &f.bindings));
        assert_eq!(tooltip.current(), None);
        assert!(!f.scene.get(f.bindings.card.group).unwrap().visible);
    }

    #[test]
    fn unknown_node_is_ignored() {
        let mut f = fixture();
        let mut tooltip = TooltipController::default();
        assert!(!tooltip.enter(&mut f.scene, &f.bindings, &f.graph, &f.config, &FixedAdvanceMeasure, 9));
        assert!(!f.scene.get(f.bindings.card.group).unwrap().visible);
    }

    #[test]
    fn anchor_offsets_by_radius_and_margin() {
        assert_eq!(card_anchor(pos2(100.0, 50.0), 20.0, 3.0), pos2(123.0, 73.0));
    }
}
