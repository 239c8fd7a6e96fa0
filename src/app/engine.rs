use eframe::egui::Vec2;

#[cfg(test)]
use super::physics::Body;
use super::physics::{
    Axis, CenterForce, CollideForce, Force, LinkForce, ManyBodyForce, PositionForce,
    Simulation,
};
use crate::config::{ForceToggles, LayoutConfig};
use crate::graph::ResolvedGraph;
use crate::layout::phyllotaxis;

pub const CHARGE: &str = "charge";
pub const LINK: &str = "link";
pub const CENTER: &str = "center";
pub const COLLISION: &str = "collision";
pub const POSITION_X: &str = "x";
pub const POSITION_Y: &str = "y";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ForceKind {
    Charge,
    Link,
    Collision,
    Center,
    Position,
}

impl ForceKind {
    pub const ALL: [Self; 5] = [
        Self::Charge,
        Self::Link,
        Self::Collision,
        Self::Center,
        Self::Position,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Charge => "Charge",
            Self::Link => "Links",
            Self::Collision => "Collision",
            Self::Center => "Centering",
            Self::Position => "X/Y positioning",
        }
    }

    fn flag(self, toggles: &mut ForceToggles) -> &mut bool {
        match self {
            Self::Charge => &mut toggles.charge,
            Self::Link => &mut toggles.link,
            Self::Collision => &mut toggles.collision,
            Self::Center => &mut toggles.center,
            Self::Position => &mut toggles.position,
        }
    }
}

/// Owns the simulation and keeps its named forces in sync with the toggles
/// and the current centering target.
pub struct LayoutEngine {
    simulation: Simulation,
    charge: ManyBodyForce,
    link: LinkForce,
    collision: CollideForce,
    positioning_strength: Option<f32>,
    toggles: ForceToggles,
    center: Vec2,
}

impl LayoutEngine {
    pub fn new(graph: &ResolvedGraph, config: &LayoutConfig, radii: &[f32], center: Vec2) -> Self {
        let pairs = graph
            .links
            .iter()
            .map(|link| (link.source, link.target))
            .collect::<Vec<_>>();
        let link_ids = |index: usize| {
            let link = &graph.links[index];
            (
                graph.nodes[link.source].id.as_str(),
                graph.nodes[link.target].id.as_str(),
            )
        };
        let link = LinkForce::new(
            pairs,
            graph.node_count(),
            |index| {
                let (source, target) = link_ids(index);
                config.link.distance_for(source, target)
            },
            |index| {
                let (source, target) = link_ids(index);
                config.link.strength_for(source, target)
            },
        );

        let collision = CollideForce::new(
            radii
                .iter()
                .map(|radius| radius + config.collision_margin)
                .collect(),
        );

        let mut engine = Self {
            simulation: Simulation::new(phyllotaxis(graph.node_count())),
            charge: ManyBodyForce::new(config.charge_strength),
            link,
            collision,
            positioning_strength: config.positioning_strength,
            toggles: config.forces,
            center,
        };
        engine.install_forces();
        engine
    }

    /// Re-registers every enabled force in a fixed order so toggling never
    /// reorders them.
    fn install_forces(&mut self) {
        for name in [CHARGE, LINK, CENTER, COLLISION, POSITION_X, POSITION_Y] {
            self.simulation.remove_force(name);
        }

        let toggles = self.toggles;
        if toggles.charge {
            self.simulation
                .set_force(CHARGE, Force::ManyBody(self.charge.clone()));
        }
        if toggles.link {
            self.simulation.set_force(LINK, Force::Link(self.link.clone()));
        }
        if toggles.center {
            self.simulation
                .set_force(CENTER, Force::Center(CenterForce::new(self.center)));
        }
        if toggles.collision {
            self.simulation
                .set_force(COLLISION, Force::Collide(self.collision.clone()));
        }
        if let Some(strength) = self.positioning_strength.filter(|_| toggles.position) {
            self.simulation.set_force(
                POSITION_X,
                Force::Position(PositionForce {
                    axis: Axis::X,
                    target: self.center.x,
                    strength,
                }),
            );
            self.simulation.set_force(
                POSITION_Y,
                Force::Position(PositionForce {
                    axis: Axis::Y,
                    target: self.center.y,
                    strength,
                }),
            );
        }
    }

    pub fn force_enabled(&self, kind: ForceKind) -> bool {
        let mut toggles = self.toggles;
        *kind.flag(&mut toggles)
    }

    /// Whether toggling `kind` has any effect under the current config.
    pub fn force_available(&self, kind: ForceKind) -> bool {
        kind != ForceKind::Position || self.positioning_strength.is_some()
    }

    pub fn set_force_enabled(&mut self, kind: ForceKind, enabled: bool) {
        let flag = kind.flag(&mut self.toggles);
        if *flag == enabled {
            return;
        }
        *flag = enabled;
        self.install_forces();
        tracing::debug!(force = kind.label(), enabled, "force toggled");
    }

    /// Moves the centering (and x/y positioning) target.
    pub fn retarget(&mut self, center: Vec2) {
        self.center = center;
        if let Some(Force::Center(force)) = self.simulation.force_mut(CENTER) {
            force.target = center;
        }
        if let Some(Force::Position(force)) = self.simulation.force_mut(POSITION_X) {
            force.target = center.x;
        }
        if let Some(Force::Position(force)) = self.simulation.force_mut(POSITION_Y) {
            force.target = center.y;
        }
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    pub fn simulation_mut(&mut self) -> &mut Simulation {
        &mut self.simulation
    }

    #[cfg(test)]
    pub fn bodies(&self) -> &[Body] {
        self.simulation.bodies()
    }

    pub fn position(&self, index: usize) -> Option<Vec2> {
        self.simulation.bodies().get(index).map(|body| body.position)
    }

    pub fn set_position(&mut self, index: usize, position: Vec2) {
        if let Some(body) = self.simulation.body_mut(index) {
            body.position = position;
        }
    }

    pub fn pin(&mut self, index: usize, position: Vec2) {
        if let Some(body) = self.simulation.body_mut(index) {
            body.pinned = Some(position);
        }
    }

    pub fn unpin(&mut self, index: usize) {
        if let Some(body) = self.simulation.body_mut(index) {
            body.pinned = None;
        }
    }

    pub fn step(&mut self) -> bool {
        self.simulation.step()
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;

    use super::*;
    use crate::config::Preset;
    use crate::graph::{GraphData, link, node};

    fn graph() -> ResolvedGraph {
        GraphData {
            nodes: vec![node("0", 10.0), node("1", 50.0), node("2", 5.0), node("3", 0.0)],
            links: vec![
                link("0", "2", 1.0, 0.0),
                link("1", "3", 1.0, 0.0),
                link("2", "3", 1.0, 0.0),
            ],
        }
        .resolve()
        .unwrap()
    }

    fn engine(preset: Preset) -> LayoutEngine {
        let config = LayoutConfig::preset(preset);
        LayoutEngine::new(&graph(), &config, &[20.0; 4], vec2(600.0, 400.0))
    }

    fn names(engine: &LayoutEngine) -> Vec<&'static str> {
        engine.simulation().force_names().collect()
    }

    #[test]
    fn primary_registers_forces_in_order() {
        assert_eq!(names(&engine(Preset::Primary)), vec![CHARGE, LINK, CENTER, COLLISION]);
        assert_eq!(
            names(&engine(Preset::Compact)),
            vec![CHARGE, LINK, CENTER, COLLISION, POSITION_X, POSITION_Y]
        );
    }

    #[test]
    fn link_parameters_come_from_rules() {
        let engine = engine(Preset::Primary);
        let Some(Force::Link(link)) = engine.simulation().force(LINK) else {
            panic!("link force missing");
        };
        assert_eq!(link.distance(0), Some(75.0));
        assert_eq!(link.distance(2), Some(50.0));
        assert_eq!(link.strength(1), Some(1.15));
        assert_eq!(link.strength(2), Some(0.25));
    }

    #[test]
    fn collision_radius_adds_margin() {
        let engine = engine(Preset::Primary);
        let Some(Force::Collide(collide)) = engine.simulation().force(COLLISION) else {
            panic!("collision force missing");
        };
        assert_eq!(collide.radius(0), Some(25.0));
    }

    #[test]
    fn toggling_removes_and_restores_in_place() {
        let mut engine = engine(Preset::Primary);
        engine.set_force_enabled(ForceKind::Link, false);
        assert_eq!(names(&engine), vec![CHARGE, CENTER, COLLISION]);
        assert!(!engine.force_enabled(ForceKind::Link));

        engine.set_force_enabled(ForceKind::Link, true);
        assert_eq!(names(&engine), vec![CHARGE, LINK, CENTER, COLLISION]);
    }

    #[test]
    fn retarget_moves_center_and_positioning() {
        let mut engine = engine(Preset::Compact);
        engine.retarget(vec2(100.0, 50.0));

        let Some(Force::Center(center)) = engine.simulation().force(CENTER) else {
            panic!("center force missing");
        };
        assert_eq!(center.target, vec2(100.0, 50.0));
        let Some(Force::Position(y)) = engine.simulation().force(POSITION_Y) else {
            panic!("y force missing");
        };
        assert_eq!(y.target, 50.0);

        engine.set_force_enabled(ForceKind::Center, false);
        engine.set_force_enabled(ForceKind::Center, true);
        let Some(Force::Center(center)) = engine.simulation().force(CENTER) else {
            panic!("center force missing");
        };
        assert_eq!(center.target, vec2(100.0, 50.0));
    }

    #[test]
    fn positioning_is_unavailable_without_strength() {
        let engine = engine(Preset::Primary);
        assert!(!engine.force_available(ForceKind::Position));
        assert!(engine.force_available(ForceKind::Charge));
    }
}
