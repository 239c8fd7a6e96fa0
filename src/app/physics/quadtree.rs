use eframe::egui::{Vec2, vec2};

const LEAF_BODIES: usize = 8;
const MAX_DEPTH: usize = 10;

/// Axis-aligned square given by its top-left corner and side length.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct Square {
    pub(super) min: Vec2,
    pub(super) side: f32,
}

impl Square {
    /// Smallest square covering every point, padded by one unit so points on
    /// the edge stay strictly inside. `None` when a coordinate is not finite
    /// or there are no points.
    fn covering(points: &[Vec2]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let (min, max) = points.iter().try_fold(
            (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)),
            |(min, max), point| {
                (point.x.is_finite() && point.y.is_finite())
                    .then(|| (min.min(*point), max.max(*point)))
            },
        )?;
        let span = (max - min).max_elem().max(1.0);
        Some(Self {
            min: min - Vec2::splat(1.0),
            side: span + 2.0,
        })
    }

    fn max(self) -> Vec2 {
        self.min + Vec2::splat(self.side)
    }

    fn mid(self) -> Vec2 {
        self.min + Vec2::splat(self.side * 0.5)
    }

    pub(super) fn contains(self, point: Vec2) -> bool {
        let max = self.max();
        (self.min.x..=max.x).contains(&point.x) && (self.min.y..=max.y).contains(&point.y)
    }

    /// Quadrant index in reading order: 0 top-left, 1 top-right,
    /// 2 bottom-left, 3 bottom-right.
    fn quadrant_of(self, point: Vec2) -> usize {
        let mid = self.mid();
        usize::from(point.x >= mid.x) | (usize::from(point.y >= mid.y) << 1)
    }

    fn quadrant(self, index: usize) -> Self {
        let half = self.side * 0.5;
        let step = vec2((index & 1) as f32, (index >> 1) as f32) * half;
        Self {
            min: self.min + step,
            side: half,
        }
    }

    /// Squared length of the shortest gap between two squares, zero when
    /// they touch or overlap.
    pub(super) fn gap_sq(self, other: Self) -> f32 {
        let gap = (self.min - other.max()).max(other.min - self.max()).max(Vec2::ZERO);
        gap.length_sq()
    }
}

/// Quadtree cell over body positions. Every body has unit charge, so a cell
/// summarizes its subtree by the body count and their plain centroid.
pub(super) struct Cell {
    pub(super) square: Square,
    pub(super) count: usize,
    pub(super) centroid: Vec2,
    /// Body indices, only populated on leaves.
    pub(super) bodies: Vec<usize>,
    pub(super) quads: [Option<Box<Cell>>; 4],
}

impl Cell {
    pub(super) fn build(positions: &[Vec2]) -> Option<Self> {
        let square = Square::covering(positions)?;
        Some(Self::subdivide(square, (0..positions.len()).collect(), positions, 0))
    }

    fn subdivide(square: Square, bodies: Vec<usize>, positions: &[Vec2], depth: usize) -> Self {
        let count = bodies.len();
        let centroid = if count == 0 {
            square.mid()
        } else {
            bodies.iter().map(|&body| positions[body]).fold(Vec2::ZERO, |sum, p| sum + p)
                / count as f32
        };

        let mut cell = Self {
            square,
            count,
            centroid,
            bodies,
            quads: Default::default(),
        };
        if depth >= MAX_DEPTH || count <= LEAF_BODIES {
            return cell;
        }

        let mut split: [Vec<usize>; 4] = Default::default();
        for &body in &cell.bodies {
            split[square.quadrant_of(positions[body])].push(body);
        }
        // Coincident bodies stay together in one leaf.
        if split.iter().filter(|part| !part.is_empty()).count() < 2 {
            return cell;
        }

        for (index, part) in split.into_iter().enumerate() {
            if !part.is_empty() {
                cell.quads[index] = Some(Box::new(Self::subdivide(
                    square.quadrant(index),
                    part,
                    positions,
                    depth + 1,
                )));
            }
        }
        cell.bodies = Vec::new();
        cell
    }

    pub(super) fn is_leaf(&self) -> bool {
        self.quads.iter().all(Option::is_none)
    }

    pub(super) fn children(&self) -> impl Iterator<Item = &Cell> {
        self.quads.iter().flatten().map(|quad| &**quad)
    }
}
