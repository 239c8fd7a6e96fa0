use eframe::egui::{Pos2, Vec2, pos2};

/// Absolute path commands, the subset the link renderer needs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCommand {
    MoveTo(Pos2),
    LineTo(Pos2),
    QuadTo(Pos2, Pos2),
    CubicTo(Pos2, Pos2, Pos2),
}

impl PathCommand {
    pub fn end(self) -> Pos2 {
        match self {
            Self::MoveTo(point) | Self::LineTo(point) => point,
            Self::QuadTo(_, point) => point,
            Self::CubicTo(_, _, point) => point,
        }
    }
}

/// Cardinal spline with tension 0 (Catmull-Rom like tangents), open ends.
/// Segment `i` runs from `p[i]` to `p[i+1]`; end tangents collapse onto the
/// end points themselves.
pub fn cardinal(points: &[Pos2]) -> Vec<PathCommand> {
    let Some(&first) = points.first() else {
        return Vec::new();
    };

    let mut commands = Vec::with_capacity(points.len());
    commands.push(PathCommand::MoveTo(first));
    match points.len() {
        1 => {}
        2 => commands.push(PathCommand::LineTo(points[1])),
        _ => {
            let last = points.len() - 1;
            for i in 0..last {
                let start = points[i];
                let end = points[i + 1];
                let first_control = if i == 0 {
                    start
                } else {
                    start + (end - points[i - 1]) / 6.0
                };
                let second_control = if i + 1 == last {
                    end
                } else {
                    end + (start - points[i + 2]) / 6.0
                };
                commands.push(PathCommand::CubicTo(first_control, second_control, end));
            }
        }
    }
    commands
}

pub fn quadratic(source: Pos2, control: Pos2, target: Pos2) -> Vec<PathCommand> {
    vec![
        PathCommand::MoveTo(source),
        PathCommand::QuadTo(control, target),
    ]
}

/// Midpoint of `source`..`target`, pushed sideways by `sharpness` along the
/// unit perpendicular when `overlap` is nonzero. A zero-length link keeps the
/// plain midpoint.
pub fn link_midpoint(source: Pos2, target: Pos2, overlap: f64, sharpness: f32) -> Pos2 {
    let mid = pos2((source.x + target.x) * 0.5, (source.y + target.y) * 0.5);
    if overlap == 0.0 {
        return mid;
    }

    let delta = target - source;
    let length = delta.length();
    if length <= f32::EPSILON || !length.is_finite() {
        return mid;
    }

    let slope: Vec2 = delta / length;
    pos2(mid.x + slope.y * sharpness, mid.y - slope.x * sharpness)
}

/// Cubic/quadratic flattening for painters without curve primitives.
pub fn flatten(commands: &[PathCommand], segments_per_curve: usize) -> Vec<Pos2> {
    let steps = segments_per_curve.max(1);
    let mut points = Vec::new();
    let mut cursor = Pos2::ZERO;

    for command in commands {
        match *command {
            PathCommand::MoveTo(point) | PathCommand::LineTo(point) => points.push(point),
            PathCommand::QuadTo(control, end) => {
                for step in 1..=steps {
                    let t = step as f32 / steps as f32;
                    let u = 1.0 - t;
                    points.push(pos2(
                        u * u * cursor.x + 2.0 * u * t * control.x + t * t * end.x,
                        u * u * cursor.y + 2.0 * u * t * control.y + t * t * end.y,
                    ));
                }
            }
            PathCommand::CubicTo(first, second, end) => {
                for step in 1..=steps {
                    let t = step as f32 / steps as f32;
                    let u = 1.0 - t;
                    let (a, b, c, d) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
                    points.push(pos2(
                        a * cursor.x + b * first.x + c * second.x + d * end.x,
                        a * cursor.y + b * first.y + c * second.y + d * end.y,
                    ));
                }
            }
        }
        cursor = command.end();
    }
    points
}

/// SVG `d` attribute.
pub fn to_svg_data(commands: &[PathCommand]) -> String {
    let mut data = String::new();
    for command in commands {
        if !data.is_empty() {
            data.push(' ');
        }
        match *command {
            PathCommand::MoveTo(p) => data.push_str(&format!("M{:.2},{:.2}", p.x, p.y)),
            PathCommand::LineTo(p) => data.push_str(&format!("L{:.2},{:.2}", p.x, p.y)),
            PathCommand::QuadTo(c, p) => {
                data.push_str(&format!("Q{:.2},{:.2},{:.2},{:.2}", c.x, c.y, p.x, p.y))
            }
            PathCommand::CubicTo(c1, c2, p) => data.push_str(&format!(
                "C{:.2},{:.2},{:.2},{:.2},{:.2},{:.2}",
                c1.x, c1.y, c2.x, c2.y, p.x, p.y
            )),
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn three_point_cardinal_matches_closed_form() {
        let (p0, p1, p2) = (pos2(0.0, 0.0), pos2(50.0, 10.0), pos2(100.0, 0.0));
        let commands = cardinal(&[p0, p1, p2]);

        assert_eq!(
            commands,
            vec![
                PathCommand::MoveTo(p0),
                PathCommand::CubicTo(p0, p1 + (p0 - p2) / 6.0, p1),
                PathCommand::CubicTo(p1 + (p2 - p0) / 6.0, p2, p2),
            ]
        );
    }

    #[test]
    fn two_point_cardinal_is_a_line() {
        let commands = cardinal(&[pos2(0.0, 0.0), pos2(5.0, 5.0)]);
        assert_eq!(commands[1], PathCommand::LineTo(pos2(5.0, 5.0)));
        assert!(cardinal(&[]).is_empty());
    }

    #[test]
    fn no_overlap_keeps_the_plain_midpoint() {
        let mid = link_midpoint(pos2(0.0, 0.0), pos2(100.0, 40.0), 0.0, 7.0);
        assert_eq!(mid, pos2(50.0, 20.0));
    }

    #[test]
    fn overlap_pushes_midpoint_sideways() {
        let mid = link_midpoint(pos2(0.0, 0.0), pos2(100.0, 0.0), 1.0, 7.0);
        assert_eq!(mid, pos2(50.0, -7.0));
    }

    #[test]
    fn zero_length_link_has_no_nan() {
        let mid = link_midpoint(pos2(3.0, 3.0), pos2(3.0, 3.0), 1.0, 7.0);
        assert_eq!(mid, pos2(3.0, 3.0));
    }

    #[test]
    fn flattening_ends_on_the_last_point() {
        let commands = cardinal(&[pos2(0.0, 0.0), pos2(50.0, 10.0), pos2(100.0, 0.0)]);
        let points = flatten(&commands, 8);
        assert_eq!(points.len(), 17);
        assert!((points[16] - pos2(100.0, 0.0)).length() < 1e-4);
        assert!((points[8] - pos2(50.0, 10.0)).length() < 1e-4);
    }

    #[test]
    fn svg_data_uses_absolute_commands() {
        let data = to_svg_data(&quadratic(pos2(0.0, 0.0), pos2(1.0, 2.0), pos2(3.0, 4.0)));
        assert_eq!(data, "M0.00,0.00 Q1.00,2.00,3.00,4.00");
    }

    proptest! {
        #[test]
        fn overlap_offset_is_perpendicular_and_fixed(
            sx in -500.0f32..500.0,
            sy in -500.0f32..500.0,
            dx in 1.0f32..300.0,
            dy in -300.0f32..300.0,
        ) {
            let source = pos2(sx, sy);
            let target = pos2(sx + dx, sy + dy);
            let plain = link_midpoint(source, target, 0.0, 7.0);
            let bent = link_midpoint(source, target, 2.0, 7.0);
            let offset = bent - plain;

            prop_assert!((offset.length() - 7.0).abs() < 1e-2);
            prop_assert!(offset.dot((target - source).normalized()).abs() < 1e-2);
        }
    }
}
