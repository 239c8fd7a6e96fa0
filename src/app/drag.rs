use eframe::egui::Vec2;

use super::engine::LayoutEngine;

#[derive(Clone, Copy, Debug, PartialEq)]
struct DragGesture {
    node: usize,
    /// Node position minus pointer position at gesture start.
    offset: Vec2,
    /// Whether this gesture raised the engine's alpha target.
    raised_target: bool,
}

/// Pins a node under the pointer for the duration of one gesture.
#[derive(Clone, Debug, PartialEq)]
pub struct DragController {
    alpha_target: f32,
    gesture: Option<DragGesture>,
}

impl DragController {
    pub fn new(alpha_target: f32) -> Self {
        Self {
            alpha_target,
            gesture: None,
        }
    }

    pub fn active_node(&self) -> Option<usize> {
        self.gesture.map(|gesture| gesture.node)
    }

    pub fn is_active(&self) -> bool {
        self.gesture.is_some()
    }

    pub fn start(&mut self, engine: &mut LayoutEngine, node: usize, pointer: Vec2) -> bool {
        if let Some(active) = self.gesture {
            tracing::trace!(node, active = active.node, "drag start ignored, gesture in progress");
            return false;
        }
        let Some(position) = engine.position(node) else {
            tracing::trace!(node, "drag start ignored, no such node");
            return false;
        };

        let simulation = engine.simulation_mut();
        let raised_target = simulation.alpha_target() < self.alpha_target;
        if raised_target {
            simulation.set_alpha_target(self.alpha_target);
            simulation.restart();
        }
        engine.pin(node, position);

        self.gesture = Some(DragGesture {
            node,
            offset: position - pointer,
            raised_target,
        });
        tracing::debug!(node, raised_target, "drag started");
        true
    }

    pub fn drag_to(&mut self, engine: &mut LayoutEngine, pointer: Vec2) -> bool {
        let Some(gesture) = self.gesture else {
            tracing::trace!("drag move ignored, no gesture");
            return false;
        };
        engine.pin(gesture.node, pointer + gesture.offset);
        true
    }

    pub fn end(&mut self, engine: &mut LayoutEngine) -> bool {
        let Some(gesture) = self.gesture.take() else {
            tracing::trace!("drag end ignored, no gesture");
            return false;
        };

        if gesture.raised_target {
            engine.simulation_mut().set_alpha_target(0.0);
        }
        engine.unpin(gesture.node);
        tracing::debug!(node = gesture.node, "drag ended");
        true
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;

    use super::*;
    use crate::config::{LayoutConfig, Preset};
    use crate::graph::{GraphData, link, node};

    fn engine() -> LayoutEngine {
        let graph = GraphData {
            nodes: vec![node("0", 10.0), node("1", 50.0), node("2", 0.0)],
            links: vec![link("0", "1", 1.0, 0.0), link("1", "2", 1.0, 0.0)],
        }
        .resolve()
        .unwrap();
        LayoutEngine::new(
            &graph,
            &LayoutConfig::preset(Preset::Primary),
            &[20.0, 50.0, 26.0],
            vec2(600.0, 400.0),
        )
    }

    #[test]
    fn start_raises_target_and_pins_in_place() {
        let mut engine = engine();
        let mut drag = DragController::new(0.3);
        let before = engine.position(1).unwrap();

        assert!(drag.start(&mut engine, 1, before + vec2(4.0, -2.0)));
        assert_eq!(engine.simulation().alpha_target(), 0.3);
        assert!(engine.simulation().is_running());
        assert_eq!(engine.bodies()[1].pinned, Some(before));
        assert_eq!(drag.active_node(), Some(1));
    }

    #[test]
    fn pinned_node_follows_pointer_with_offset() {
        let mut engine = engine();
        let mut drag = DragController::new(0.3);
        let before = engine.position(0).unwrap();
        drag.start(&mut engine, 0, before + vec2(3.0, 3.0));

        drag.drag_to(&mut engine, vec2(200.0, 100.0));
        assert_eq!(engine.bodies()[0].pinned, Some(vec2(197.0, 97.0)));

        engine.step();
        assert_eq!(engine.position(0), Some(vec2(197.0, 97.0)));
    }

    #[test]
    fn pin_then_unpin_restores_free_movement() {
        let mut engine = engine();
        let mut drag = DragController::new(0.3);
        let start = engine.position(2).unwrap();
        drag.start(&mut engine, 2, start);
        drag.drag_to(&mut engine, vec2(900.0, 900.0));
        engine.step();

        assert!(drag.end(&mut engine));
        assert_eq!(engine.bodies()[2].pinned, None);
        assert_eq!(engine.simulation().alpha_target(), 0.0);

        engine.step();
        assert_ne!(engine.position(2), Some(vec2(900.0, 900.0)));
    }

    #[test]
    fn gesture_on_hot_engine_leaves_target_alone() {
        let mut engine = engine();
        engine.simulation_mut().set_alpha_target(0.5);
        let mut drag = DragController::new(0.3);

        drag.start(&mut engine, 0, Vec2::ZERO);
        drag.end(&mut engine);
        assert_eq!(engine.simulation().alpha_target(), 0.5);
    }

    #[test]
    fn stale_events_are_ignored() {
        let mut engine = engine();
        let mut drag = DragController::new(0.3);

        assert!(!drag.drag_to(&mut engine, Vec2::ZERO));
        assert!(!drag.end(&mut engine));
        assert!(!drag.start(&mut engine, 7, Vec2::ZERO));

        assert!(drag.start(&mut engine, 0, Vec2::ZERO));
        assert!(!drag.start(&mut engine, 1, Vec2::ZERO));
        assert_eq!(drag.active_node(), Some(0));
    }
}
