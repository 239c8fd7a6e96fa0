mod forces;
mod quadtree;

use eframe::egui::Vec2;

pub use forces::{Axis, CenterForce, CollideForce, Force, LinkForce, ManyBodyForce, PositionForce};
use forces::ForceScratch;

const ALPHA_MIN: f32 = 0.001;
const VELOCITY_DECAY: f32 = 0.4;
const SETTLE_TICKS: f32 = 300.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
    /// While set, integration snaps the body here and zeroes its velocity.
    pub pinned: Option<Vec2>,
}

impl Body {
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            pinned: None,
        }
    }
}

/// Alpha-cooled force simulation. Forces run in the order they were first
/// registered; replacing a force under an existing name keeps its slot.
pub struct Simulation {
    bodies: Vec<Body>,
    forces: Vec<(&'static str, Force)>,
    alpha: f32,
    alpha_min: f32,
    alpha_decay: f32,
    alpha_target: f32,
    velocity_decay: f32,
    running: bool,
    ticks: u64,
    scratch: ForceScratch,
}

impl Simulation {
    pub fn new(positions: Vec<Vec2>) -> Self {
        Self {
            bodies: positions.into_iter().map(Body::at).collect(),
            forces: Vec::new(),
            alpha: 1.0,
            alpha_min: ALPHA_MIN,
            alpha_decay: 1.0 - ALPHA_MIN.powf(1.0 / SETTLE_TICKS),
            alpha_target: 0.0,
            velocity_decay: VELOCITY_DECAY,
            running: true,
            ticks: 0,
            scratch: ForceScratch::default(),
        }
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn body_mut(&mut self, index: usize) -> Option<&mut Body> {
        self.bodies.get_mut(index)
    }

    pub fn set_force(&mut self, name: &'static str, force: Force) {
        match self.forces.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = force,
            None => self.forces.push((name, force)),
        }
    }

    pub fn remove_force(&mut self, name: &str) -> Option<Force> {
        let index = self.forces.iter().position(|(existing, _)| *existing == name)?;
        Some(self.forces.remove(index).1)
    }

    #[cfg(test)]
    pub fn force(&self, name: &str) -> Option<&Force> {
        self.forces
            .iter()
            .find(|(existing, _)| *existing == name)
            .map(|(_, force)| force)
    }

    pub fn force_mut(&mut self, name: &str) -> Option<&mut Force> {
        self.forces
            .iter_mut()
            .find(|(existing, _)| *existing == name)
            .map(|(_, force)| force)
    }

    #[cfg(test)]
    pub fn force_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.forces.iter().map(|(name, _)| *name)
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    #[cfg(test)]
    pub fn alpha_min(&self) -> f32 {
        self.alpha_min
    }

    pub fn alpha_target(&self) -> f32 {
        self.alpha_target
    }

    pub fn set_alpha_target(&mut self, target: f32) {
        self.alpha_target = target.clamp(0.0, 1.0);
    }

    /// Resumes ticking without touching alpha.
    pub fn restart(&mut self) {
        self.running = true;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// One cooling and integration step, regardless of the running flag.
    pub fn tick(&mut self) {
        self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;

        let alpha = self.alpha;
        for (_, force) in &self.forces {
            force.apply(&mut self.bodies, alpha, &mut self.scratch);
        }

        let retain = 1.0 - self.velocity_decay;
        for body in &mut self.bodies {
            match body.pinned {
                Some(pin) => {
                    body.position = pin;
                    body.velocity = Vec2::ZERO;
                }
                None => {
                    body.velocity *= retain;
                    body.position += body.velocity;
                }
            }
        }
        self.ticks += 1;
    }

    /// Timer-driven step: ticks while running and stops once cooled below
    /// `alpha_min`. Returns whether a tick happened.
    pub fn step(&mut self) -> bool {
        if !self.running {
            return false;
        }

        self.tick();
        if self.alpha < self.alpha_min {
            self.running = false;
            tracing::debug!(ticks = self.ticks, "simulation settled");
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;

    use super::*;

    fn pair() -> Simulation {
        Simulation::new(vec![vec2(0.0, 0.0), vec2(10.0, 0.0)])
    }

    #[test]
    fn cooling_stops_after_about_three_hundred_ticks() {
        let mut simulation = pair();
        let mut steps = 0;
        while simulation.step() {
            steps += 1;
            assert!(steps < 1000);
        }

        assert!(!simulation.is_running());
        assert!(simulation.alpha() < simulation.alpha_min());
        assert!((299..=302).contains(&steps), "settled after {steps}");
    }

    #[test]
    fn restart_keeps_alpha() {
        let mut simulation = pair();
        while simulation.step() {}
        let cooled = simulation.alpha();

        simulation.restart();
        assert!(simulation.is_running());
        assert_eq!(simulation.alpha(), cooled);
    }

    #[test]
    fn alpha_target_holds_simulation_warm() {
        let mut simulation = pair();
        simulation.set_alpha_target(0.3);
        for _ in 0..2000 {
            assert!(simulation.step());
        }
        assert!((simulation.alpha() - 0.3).abs() < 1e-3);
    }

    #[test]
    fn pinned_body_stays_put() {
        let mut simulation = pair();
        simulation.set_force("charge", Force::ManyBody(ManyBodyForce::new(-400.0)));
        if let Some(body) = simulation.body_mut(0) {
            body.pinned = Some(vec2(3.0, 4.0));
        }

        for _ in 0..10 {
            simulation.tick();
        }
        assert_eq!(simulation.bodies()[0].position, vec2(3.0, 4.0));
        assert_eq!(simulation.bodies()[0].velocity, Vec2::ZERO);
        assert!(simulation.bodies()[1].position.x > 10.0);
    }

    #[test]
    fn replacing_a_force_keeps_its_order() {
        let mut simulation = pair();
        simulation.set_force("charge", Force::ManyBody(ManyBodyForce::new(-30.0)));
        simulation.set_force("center", Force::Center(CenterForce::new(Vec2::ZERO)));
        simulation.set_force("charge", Force::ManyBody(ManyBodyForce::new(-400.0)));

        assert_eq!(simulation.force_names().collect::<Vec<_>>(), vec!["charge", "center"]);
        assert!(simulation.remove_force("charge").is_some());
        assert!(simulation.remove_force("charge").is_none());
        assert!(simulation.force("center").is_some());
    }

    #[test]
    fn velocity_decays_between_ticks() {
        let mut simulation = pair();
        if let Some(body) = simulation.body_mut(1) {
            body.velocity = vec2(10.0, 0.0);
        }
        simulation.tick();
        assert!((simulation.bodies()[1].velocity.x - 6.0).abs() < 1e-5);
        assert!((simulation.bodies()[1].position.x - 16.0).abs() < 1e-5);
    }
}
