use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2, pos2};

pub(super) const CANVAS_BACKGROUND: Color32 = Color32::from_rgb(250, 250, 250);
pub(super) const SHADOW_COLOR: Color32 = Color32::from_black_alpha(48);
pub(super) const SHADOW_OFFSET: Vec2 = Vec2::new(1.0, 1.5);

pub(super) fn draw_background(painter: &Painter, rect: Rect) {
    painter.rect_filled(rect, 0.0, CANVAS_BACKGROUND);
}

pub(super) fn local_to_screen(rect: Rect, point: Pos2) -> Pos2 {
    rect.min + point.to_vec2()
}

pub(super) fn screen_to_local(rect: Rect, point: Pos2) -> Pos2 {
    pos2(point.x - rect.min.x, point.y - rect.min.y)
}

/// Point halfway along a polyline by arc length, with the direction of the
/// segment it falls on.
pub(super) fn polyline_midpoint(points: &[Pos2]) -> Option<(Pos2, Vec2)> {
    let total = points
        .windows(2)
        .map(|pair| pair[0].distance(pair[1]))
        .sum::<f32>();
    if total <= f32::EPSILON {
        return None;
    }

    let mut remaining = total * 0.5;
    for pair in points.windows(2) {
        let length = pair[0].distance(pair[1]);
        if length >= remaining && length > 0.0 {
            let direction = (pair[1] - pair[0]) / length;
            return Some((pair[0] + direction * remaining, direction));
        }
        remaining -= length;
    }
    None
}

pub(super) fn draw_arrow_head(painter: &Painter, tip: Pos2, direction: Vec2, size: f32, color: Color32) {
    let back = tip - direction * size;
    let side = direction.rot90() * (size * 0.5);
    painter.add(eframe::egui::Shape::convex_polygon(
        vec![tip, back + side, back - side],
        color,
        Stroke::NONE,
    ));
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;

    use super::*;

    #[test]
    fn midpoint_of_straight_polyline() {
        let (point, direction) =
            polyline_midpoint(&[pos2(0.0, 0.0), pos2(10.0, 0.0), pos2(30.0, 0.0)]).unwrap();
        assert_eq!(point, pos2(15.0, 0.0));
        assert_eq!(direction, vec2(1.0, 0.0));
    }

    #[test]
    fn degenerate_polyline_has_no_midpoint() {
        assert!(polyline_midpoint(&[pos2(1.0, 1.0), pos2(1.0, 1.0)]).is_none());
        assert!(polyline_midpoint(&[]).is_none());
    }

    #[test]
    fn local_and_screen_coordinates_round_trip() {
        let rect = Rect::from_min_size(pos2(200.0, 40.0), vec2(800.0, 600.0));
        let local = pos2(12.0, 34.0);
        assert_eq!(screen_to_local(rect, local_to_screen(rect, local)), local);
    }
}
