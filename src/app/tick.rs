use eframe::egui::{Pos2, Vec2, vec2};

use super::scene::Shape;
use super::scene::path::{PathCommand, cardinal, link_midpoint, quadratic};
use super::session::{GraphSession, Viewport};
use crate::config::LinkPathPolicy;

/// Keeps a circle of `radius` inside the viewport. When the viewport is
/// narrower than the circle the position collapses onto `radius`.
pub fn clamp_to_viewport(position: Vec2, radius: f32, viewport: Viewport) -> Vec2 {
    vec2(
        radius.max((viewport.width - radius).min(position.x)),
        radius.max((viewport.height - radius).min(position.y)),
    )
}

pub fn link_path(
    policy: LinkPathPolicy,
    source: Pos2,
    target: Pos2,
    overlap: f64,
    sharpness: f32,
) -> Vec<PathCommand> {
    match policy {
        LinkPathPolicy::Cardinal => {
            let mid = link_midpoint(source, target, overlap, sharpness);
            cardinal(&[source, mid, target])
        }
        LinkPathPolicy::Quadratic => {
            let mid = link_midpoint(source, target, 0.0, sharpness);
            quadratic(source, mid, target)
        }
    }
}

impl GraphSession {
    /// Writes the engine's current positions into the scene: clamp, move
    /// node visuals, reshape link paths, then follow the hovered node with
    /// the card.
    pub(super) fn render_tick(&mut self) {
        let viewport = self.viewport;

        for (index, visuals) in self.bindings.nodes.iter().enumerate() {
            let Some(position) = self.engine.position(index) else {
                continue;
            };
            let clamped = clamp_to_viewport(position, visuals.radius, viewport);
            if clamped != position {
                self.engine.set_position(index, clamped);
            }

            if let Some(Shape::Circle { center, .. }) = self
                .scene
                .get_mut(visuals.circle)
                .map(|element| &mut element.shape)
            {
                *center = clamped.to_pos2();
            }
            for group in [visuals.image_group, visuals.label_group] {
                if let Some(element) = self.scene.get_mut(group) {
                    element.translate = clamped;
                }
            }
        }

        for (link, visuals) in self.graph.links.iter().zip(&self.bindings.links) {
            let (Some(source), Some(target)) = (
                self.engine.position(link.source),
                self.engine.position(link.target),
            ) else {
                continue;
            };

            let path = link_path(
                self.link_policy,
                source.to_pos2(),
                target.to_pos2(),
                link.record.overlap,
                self.config.curve_sharpness,
            );
            if let Some(Shape::Path { commands, .. }) = self
                .scene
                .get_mut(visuals.path)
                .map(|element| &mut element.shape)
            {
                *commands = path;
            }
        }

        self.tooltip
            .follow(&mut self.scene, &self.bindings, self.config.tooltip.margin);
    }
}
