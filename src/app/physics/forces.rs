use eframe::egui::{Vec2, vec2};

use super::Body;
use super::quadtree::Cell;

const BARNES_HUT_THETA: f32 = 0.9;
const JIGGLE_MAGNITUDE: f32 = 1e-6;

/// Tiny deterministic displacement for coincident points, so a zero-length
/// delta never turns into NaN.
pub(super) fn jiggle(from: usize, to: usize) -> Vec2 {
    let angle = ((from as f32) * 0.618_034 + (to as f32) * 0.414_214 + 0.37) * std::f32::consts::TAU;
    vec2(angle.cos(), angle.sin()) * JIGGLE_MAGNITUDE
}

fn nonzero_delta(delta: Vec2, from: usize, to: usize) -> Vec2 {
    let nudge = jiggle(from, to);
    vec2(
        if delta.x == 0.0 { nudge.x } else { delta.x },
        if delta.y == 0.0 { nudge.y } else { delta.y },
    )
}

#[derive(Clone, Debug, PartialEq)]
pub struct ManyBodyForce {
    /// Negative values repel.
    pub strength: f32,
    pub theta: f32,
    pub distance_min: f32,
}

impl ManyBodyForce {
    pub fn new(strength: f32) -> Self {
        Self {
            strength,
            theta: BARNES_HUT_THETA,
            distance_min: 1.0,
        }
    }

    fn apply(&self, bodies: &mut [Body], alpha: f32, positions: &mut Vec<Vec2>) {
        positions.clear();
        positions.extend(bodies.iter().map(|body| body.position));

        let Some(quadtree) = Cell::build(positions) else {
            return;
        };

        let params = ChargeParams {
            weight: self.strength * alpha,
            theta_sq: self.theta * self.theta,
            distance_min_sq: self.distance_min * self.distance_min,
        };
        for (index, body) in bodies.iter_mut().enumerate() {
            let mut delta_v = Vec2::ZERO;
            accumulate_charge_for_body(&quadtree, index, positions, params, &mut delta_v);
            body.velocity += delta_v;
        }
    }
}

#[derive(Clone, Copy)]
struct ChargeParams {
    weight: f32,
    theta_sq: f32,
    distance_min_sq: f32,
}

fn charge_between(delta: Vec2, weight: f32, distance_min_sq: f32) -> Vec2 {
    let mut distance_sq = delta.length_sq();
    if distance_sq < distance_min_sq {
        distance_sq = (distance_min_sq * distance_sq).sqrt();
    }
    delta * (weight / distance_sq)
}

fn accumulate_charge_for_body(
    cell: &Cell,
    index: usize,
    positions: &[Vec2],
    params: ChargeParams,
    delta_v: &mut Vec2,
) {
    if cell.count == 0 {
        return;
    }

    let point = positions[index];

    if cell.is_leaf() {
        for &other_index in &cell.bodies {
            if other_index == index {
                continue;
            }
            let delta = nonzero_delta(positions[other_index] - point, index, other_index);
            *delta_v += charge_between(delta, params.weight, params.distance_min_sq);
        }
        return;
    }

    let delta = cell.centroid - point;
    let distance_sq = delta.length_sq();
    let side = cell.square.side;
    let can_approximate = !cell.square.contains(point)
        && (side * side / params.theta_sq) < distance_sq
        && cell.count > 1;

    if can_approximate {
        let charge = params.weight * cell.count as f32;
        *delta_v += charge_between(delta, charge, params.distance_min_sq);
        return;
    }

    for child in cell.children() {
        accumulate_charge_for_body(child, index, positions, params, delta_v);
    }
}

/// Spring between linked bodies. Distances and strengths are resolved once
/// per link when the force is built.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkForce {
    pairs: Vec<(usize, usize)>,
    distances: Vec<f32>,
    strengths: Vec<f32>,
    bias: Vec<f32>,
}

impl LinkForce {
    /// `strength` returning `None` falls back to `1 / min(degree)` of the
    /// two ends, which keeps hubs from being yanked around by many springs.
    pub fn new(
        pairs: Vec<(usize, usize)>,
        body_count: usize,
        distance: impl Fn(usize) -> f32,
        strength: impl Fn(usize) -> Option<f32>,
    ) -> Self {
        let mut degree = vec![0usize; body_count];
        for &(source, target) in &pairs {
            degree[source] += 1;
            degree[target] += 1;
        }

        let mut distances = Vec::with_capacity(pairs.len());
        let mut strengths = Vec::with_capacity(pairs.len());
        let mut bias = Vec::with_capacity(pairs.len());
        for (index, &(source, target)) in pairs.iter().enumerate() {
            let (source_degree, target_degree) = (degree[source] as f32, degree[target] as f32);
            distances.push(distance(index));
            strengths.push(
                strength(index).unwrap_or_else(|| 1.0 / source_degree.min(target_degree)),
            );
            bias.push(source_degree / (source_degree + target_degree));
        }

        Self {
            pairs,
            distances,
            strengths,
            bias,
        }
    }

    #[cfg(test)]
    pub fn distance(&self, link: usize) -> Option<f32> {
        self.distances.get(link).copied()
    }

    #[cfg(test)]
    pub fn strength(&self, link: usize) -> Option<f32> {
        self.strengths.get(link).copied()
    }

    fn apply(&self, bodies: &mut [Body], alpha: f32) {
        for (index, &(source, target)) in self.pairs.iter().enumerate() {
            if source == target || source >= bodies.len() || target >= bodies.len() {
                continue;
            }

            let predicted_source = bodies[source].position + bodies[source].velocity;
            let predicted_target = bodies[target].position + bodies[target].velocity;
            let delta = nonzero_delta(predicted_target - predicted_source, source, target);
            let length = delta.length();
            let scale =
                (length - self.distances[index]) / length * alpha * self.strengths[index];
            let correction = delta * scale;

            let bias = self.bias[index];
            bodies[target].velocity -= correction * bias;
            bodies[source].velocity += correction * (1.0 - bias);
        }
    }
}

/// Keeps bodies at least `radii[i] + radii[j]` apart. Larger bodies move
/// less, by the ratio of squared radii.
#[derive(Clone, Debug, PartialEq)]
pub struct CollideForce {
    radii: Vec<f32>,
    pub strength: f32,
}

impl CollideForce {
    pub fn new(radii: Vec<f32>) -> Self {
        Self {
            radii,
            strength: 1.0,
        }
    }

    pub fn radius(&self, index: usize) -> Option<f32> {
        self.radii.get(index).copied()
    }

    fn apply(&self, bodies: &mut [Body], positions: &mut Vec<Vec2>, pairs: &mut Vec<(usize, usize)>) {
        positions.clear();
        positions.extend(bodies.iter().map(|body| body.position + body.velocity));

        let Some(quadtree) = Cell::build(positions) else {
            return;
        };

        let max_radius = self.radii.iter().copied().fold(0.0_f32, f32::max);
        if max_radius <= 0.0 {
            return;
        }

        pairs.clear();
        let max_distance = max_radius * 2.0;
        collect_collision_pairs(
            &quadtree,
            &quadtree,
            true,
            max_distance * max_distance,
            pairs,
        );
        pairs.sort_unstable();

        for &(first, second) in pairs.iter() {
            let (Some(first_radius), Some(second_radius)) =
                (self.radius(first), self.radius(second))
            else {
                continue;
            };

            let predicted_first = bodies[first].position + bodies[first].velocity;
            let predicted_second = bodies[second].position + bodies[second].velocity;
            let mut delta = predicted_first - predicted_second;
            let reach = first_radius + second_radius;
            if delta.length_sq() >= reach * reach {
                continue;
            }

            delta = nonzero_delta(delta, first, second);
            let distance = delta.length();
            let push = delta * ((reach - distance) / distance * self.strength);

            let first_sq = first_radius * first_radius;
            let second_sq = second_radius * second_radius;
            let ratio = second_sq / (first_sq + second_sq);
            bodies[first].velocity += push * ratio;
            bodies[second].velocity -= push * (1.0 - ratio);
        }
    }
}

fn push_leaf_pairs(first: &[usize], second: &[usize], same_leaf: bool, pairs: &mut Vec<(usize, usize)>) {
    if same_leaf {
        for (offset, &from) in first.iter().enumerate() {
            for &to in &first[offset + 1..] {
                pairs.push((from.min(to), from.max(to)));
            }
        }
    } else {
        for &from in first {
            for &to in second {
                pairs.push((from.min(to), from.max(to)));
            }
        }
    }
}

/// Dual traversal collecting every body pair whose cells lie within
/// `max_distance` of each other.
fn collect_collision_pairs(
    a: &Cell,
    b: &Cell,
    same_cell: bool,
    max_distance_sq: f32,
    pairs: &mut Vec<(usize, usize)>,
) {
    if a.square.gap_sq(b.square) > max_distance_sq {
        return;
    }

    if a.is_leaf() && b.is_leaf() {
        push_leaf_pairs(&a.bodies, &b.bodies, same_cell, pairs);
        return;
    }

    if same_cell {
        let children = a.children().collect::<Vec<_>>();
        for (offset, first) in children.iter().enumerate() {
            collect_collision_pairs(first, first, true, max_distance_sq, pairs);
            for second in &children[offset + 1..] {
                collect_collision_pairs(first, second, false, max_distance_sq, pairs);
            }
        }
        return;
    }

    let split_a = !a.is_leaf() && (b.is_leaf() || a.square.side >= b.square.side);
    if split_a {
        for child in a.children() {
            collect_collision_pairs(child, b, false, max_distance_sq, pairs);
        }
    } else {
        for child in b.children() {
            collect_collision_pairs(a, child, false, max_distance_sq, pairs);
        }
    }
}

/// Translates every body so the centroid sits on `target`. Acts on
/// positions directly, not velocities.
#[derive(Clone, Debug, PartialEq)]
pub struct CenterForce {
    pub target: Vec2,
    pub strength: f32,
}

impl CenterForce {
    pub fn new(target: Vec2) -> Self {
        Self {
            target,
            strength: 1.0,
        }
    }

    fn apply(&self, bodies: &mut [Body]) {
        if bodies.is_empty() {
            return;
        }

        let mut centroid = Vec2::ZERO;
        for body in bodies.iter() {
            centroid += body.position;
        }
        centroid /= bodies.len() as f32;

        let shift = (centroid - self.target) * self.strength;
        for body in bodies.iter_mut() {
            body.position -= shift;
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Pulls each body toward a coordinate on one axis.
#[derive(Clone, Debug, PartialEq)]
pub struct PositionForce {
    pub axis: Axis,
    pub target: f32,
    pub strength: f32,
}

impl PositionForce {
    fn apply(&self, bodies: &mut [Body], alpha: f32) {
        for body in bodies.iter_mut() {
            match self.axis {
                Axis::X => body.velocity.x += (self.target - body.position.x) * self.strength * alpha,
                Axis::Y => body.velocity.y += (self.target - body.position.y) * self.strength * alpha,
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Force {
    ManyBody(ManyBodyForce),
    Link(LinkForce),
    Collide(CollideForce),
    Center(CenterForce),
    Position(PositionForce),
}

#[derive(Default)]
pub(super) struct ForceScratch {
    positions: Vec<Vec2>,
    pairs: Vec<(usize, usize)>,
}

impl Force {
    pub(super) fn apply(&self, bodies: &mut [Body], alpha: f32, scratch: &mut ForceScratch) {
        match self {
            Self::ManyBody(force) => force.apply(bodies, alpha, &mut scratch.positions),
            Self::Link(force) => force.apply(bodies, alpha),
            Self::Collide(force) => force.apply(bodies, &mut scratch.positions, &mut scratch.pairs),
            Self::Center(force) => force.apply(bodies),
            Self::Position(force) => force.apply(bodies, alpha),
        }
    }
}
