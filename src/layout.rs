use std::f32::consts::PI;

use eframe::egui::{Vec2, vec2};

const INITIAL_RADIUS: f32 = 10.0;

/// Seed positions on a phyllotaxis spiral around the origin so that no two
/// bodies start on top of each other and the first ticks spread evenly.
pub fn phyllotaxis(count: usize) -> Vec<Vec2> {
    let initial_angle = PI * (3.0 - 5.0_f32.sqrt());

    (0..count)
        .map(|index| {
            let radius = INITIAL_RADIUS * (0.5 + index as f32).sqrt();
            let angle = index as f32 * initial_angle;
            vec2(radius * angle.cos(), radius * angle.sin())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spiral_positions_are_distinct_and_growing() {
        let positions = phyllotaxis(24);
        assert_eq!(positions.len(), 24);

        for window in positions.windows(2) {
            assert!(window[1].length() > window[0].length());
        }
        for (i, a) in positions.iter().enumerate() {
            for b in &positions[i + 1..] {
                assert!((*a - *b).length() > 1.0);
            }
        }
    }

    #[test]
    fn first_position_is_off_origin() {
        let first = phyllotaxis(1)[0];
        assert!((first.x - INITIAL_RADIUS * 0.5_f32.sqrt()).abs() < 1e-5);
        assert_eq!(first.y, 0.0);
    }
}
