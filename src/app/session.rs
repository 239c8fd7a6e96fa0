use eframe::egui::{Pos2, Vec2, vec2};

use super::drag::DragController;
use super::engine::{ForceKind, LayoutEngine};
use super::scale::VisualScales;
use super::scene::{Datum, ElementId, ListenerKind, Scene, SceneBindings, TextMeasure, build_scene};
use super::tooltip::TooltipController;
use crate::config::{LayoutConfig, LinkPathPolicy};
use crate::graph::{GraphData, GraphError, ResolvedGraph};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    pub fn center(self) -> Vec2 {
        vec2(self.width / 2.0, self.height / 2.0)
    }
}

/// Everything one interactive graph needs, owned in one place. All event
/// handlers take `&mut self`; there is no shared state behind it.
pub struct GraphSession {
    pub(super) graph: ResolvedGraph,
    pub(super) config: LayoutConfig,
    pub(super) engine: LayoutEngine,
    pub(super) scene: Scene,
    pub(super) bindings: SceneBindings,
    pub(super) drag: DragController,
    pub(super) tooltip: TooltipController,
    pub(super) viewport: Viewport,
    pub(super) link_policy: LinkPathPolicy,
}

impl GraphSession {
    pub fn new(graph: ResolvedGraph, config: LayoutConfig, viewport: Viewport) -> Self {
        let scales = VisualScales::from_graph(&graph, &config.scales);
        let (scene, bindings) = build_scene(&graph, &scales, &config);
        let radii = bindings
            .nodes
            .iter()
            .map(|visuals| visuals.radius)
            .collect::<Vec<_>>();
        let engine = LayoutEngine::new(&graph, &config, &radii, viewport.center());

        let mut session = Self {
            drag: DragController::new(config.drag_alpha_target),
            tooltip: TooltipController::default(),
            link_policy: config.link_path,
            graph,
            config,
            engine,
            scene,
            bindings,
            viewport,
        };
        session.render_tick();

        tracing::info!(
            nodes = session.graph.node_count(),
            links = session.graph.link_count(),
            elements = session.scene.len(),
            policy = session.link_policy.label(),
            width = viewport.width,
            height = viewport.height,
            "graph session ready"
        );
        session
    }

    pub fn from_data(
        data: GraphData,
        config: LayoutConfig,
        viewport: Viewport,
    ) -> Result<Self, GraphError> {
        Ok(Self::new(data.resolve()?, config, viewport))
    }

    /// One scheduler step: advance the physics if it is running and render
    /// the result. Returns whether anything moved.
    pub fn advance(&mut self) -> bool {
        if !self.engine.step() {
            return false;
        }
        self.render_tick();
        true
    }

    /// Steps until the engine settles or `max_ticks` steps ran. Returns the
    /// number of steps taken.
    pub fn run_until_settled(&mut self, max_ticks: u64) -> u64 {
        let mut steps = 0;
        while steps < max_ticks && self.advance() {
            steps += 1;
        }
        steps
    }

    pub fn resize(&mut self, viewport: Viewport) {
        if viewport == self.viewport {
            return;
        }

        self.viewport = viewport;
        self.engine.retarget(viewport.center());
        let simulation = self.engine.simulation_mut();
        simulation.set_alpha(self.config.resize_alpha);
        simulation.restart();
        self.render_tick();
        tracing::info!(width = viewport.width, height = viewport.height, "viewport resized");
    }

    /// Node bound to the nearest ancestor of `element` that listens for
    /// `kind`.
    fn node_for(&self, element: ElementId, kind: ListenerKind) -> Option<usize> {
        let target = self.scene.listener_target(element, kind)?;
        match self.scene.get(target)?.datum? {
            Datum::Node(index) if index < self.graph.node_count() => Some(index),
            _ => None,
        }
    }

    pub fn drag_start(&mut self, element: ElementId, pointer: Pos2) -> bool {
        let Some(node) = self.node_for(element, ListenerKind::Drag) else {
            let kind = self.scene.get(element).map(|found| found.shape.kind_name());
            tracing::trace!(?element, ?kind, "drag start ignored, no draggable node");
            return false;
        };
        self.drag.start(&mut self.engine, node, pointer.to_vec2())
    }

    pub fn drag_move(&mut self, pointer: Pos2) -> bool {
        self.drag.drag_to(&mut self.engine, pointer.to_vec2())
    }

    pub fn drag_end(&mut self) -> bool {
        self.drag.end(&mut self.engine)
    }

    pub fn hover_enter(&mut self, element: ElementId, measure: &dyn TextMeasure) -> bool {
        let Some(node) = self.node_for(element, ListenerKind::Hover) else {
            let kind = self.scene.get(element).map(|found| found.shape.kind_name());
            tracing::trace!(?element, ?kind, "hover ignored, no hoverable node");
            return false;
        };
        if !self.tooltip.enter(
            &mut self.scene,
            &self.bindings,
            &self.graph,
            &self.config.tooltip,
            measure,
            node,
        ) {
            return false;
        }
        self.tooltip
            .follow(&mut self.scene, &self.bindings, self.config.tooltip.margin);

        let simulation = self.engine.simulation_mut();
        if !self.drag.is_active() {
            simulation.set_alpha_target(0.0);
        }
        simulation.restart();
        true
    }

    pub fn hover_exit(&mut self) -> bool {
        self.tooltip.exit(&mut self.scene, &self.bindings)
    }

    /// Topmost interactive element under `point`.
    pub fn pointer_target(&self, point: Pos2) -> Option<ElementId> {
        self.scene.hit_test(point)
    }

    /// Node a pointer at `point` would hover, if any.
    pub fn hover_candidate(&self, point: Pos2) -> Option<(ElementId, usize)> {
        let element = self.pointer_target(point)?;
        self.node_for(element, ListenerKind::Hover)
            .map(|node| (element, node))
    }

    pub fn set_force_enabled(&mut self, kind: ForceKind, enabled: bool) {
        if self.engine.force_enabled(kind) == enabled {
            return;
        }
        self.engine.set_force_enabled(kind, enabled);
        self.engine.simulation_mut().restart();
    }

    pub fn force_enabled(&self, kind: ForceKind) -> bool {
        self.engine.force_enabled(kind)
    }

    pub fn force_available(&self, kind: ForceKind) -> bool {
        self.engine.force_available(kind)
    }

    pub fn set_link_policy(&mut self, policy: LinkPathPolicy) {
        if policy == self.link_policy {
            return;
        }
        self.link_policy = policy;
        self.render_tick();
        tracing::debug!(policy = policy.label(), "link path policy changed");
    }

    /// Full-energy restart.
    pub fn reheat(&mut self) {
        let simulation = self.engine.simulation_mut();
        simulation.set_alpha(1.0);
        simulation.restart();
        tracing::debug!("layout reheated");
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[cfg(test)]
    pub fn bindings(&self) -> &SceneBindings {
        &self.bindings
    }

    pub fn graph(&self) -> &ResolvedGraph {
        &self.graph
    }

    pub fn link_policy(&self) -> LinkPathPolicy {
        self.link_policy
    }

    pub fn alpha(&self) -> f32 {
        self.engine.simulation().alpha()
    }

    pub fn alpha_target(&self) -> f32 {
        self.engine.simulation().alpha_target()
    }

    pub fn is_running(&self) -> bool {
        self.engine.simulation().is_running()
    }

    pub fn ticks(&self) -> u64 {
        self.engine.simulation().ticks()
    }

    pub fn hovered(&self) -> Option<usize> {
        self.tooltip.current()
    }

    pub fn dragged(&self) -> Option<usize> {
        self.drag.active_node()
    }

    pub fn node_position(&self, index: usize) -> Option<Vec2> {
        self.engine.position(index)
    }
}
