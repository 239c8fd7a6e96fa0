use eframe::egui::{self, Align2, FontId, Painter, Rect, Sense, Stroke, Ui, vec2};

use super::super::render_utils::{
    SHADOW_COLOR, SHADOW_OFFSET, draw_arrow_head, draw_background, local_to_screen,
    polyline_midpoint,
};
use super::super::scene::path::flatten;
use super::super::scene::{PainterMeasure, Scene, Shape};
use super::super::ViewModel;

const CURVE_SEGMENTS: usize = 12;
const ARROW_SIZE: f32 = 6.0;

impl ViewModel {
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        draw_background(&painter, rect);

        let Some(session) = self.sync_session_viewport(rect) else {
            ui.label("Canvas is too small to lay out the graph.");
            return;
        };

        let measure = PainterMeasure::new(&painter);
        Self::handle_graph_pointer(session, ui, rect, &response, &measure);
        session.advance();

        paint_scene(ui, &painter, rect, session.scene());

        if session.is_running() || session.dragged().is_some() {
            ui.ctx().request_repaint();
        }
    }
}

/// Paints every rendered element in document order.
fn paint_scene(ui: &Ui, painter: &Painter, rect: Rect, scene: &Scene) {
    for id in scene.document_order() {
        if !scene.is_rendered(id) {
            continue;
        }
        let Some(element) = scene.get(id) else {
            continue;
        };
        let origin = local_to_screen(rect, scene.world_offset(id).to_pos2());

        match &element.shape {
            Shape::Group => {}
            Shape::Circle {
                center,
                radius,
                fill,
                stroke,
            } => {
                let center = origin + center.to_vec2();
                if element.shadow {
                    painter.circle_filled(center + SHADOW_OFFSET, *radius + 1.0, SHADOW_COLOR);
                }
                painter.circle_filled(center, *radius, *fill);
                painter.circle_stroke(center, *radius, *stroke);
            }
            Shape::Image { href, size } => {
                let uri = format!("file://{}", href.display());
                egui::Image::new(uri).paint_at(ui, Rect::from_min_size(origin, vec2(*size, *size)));
            }
            Shape::Text {
                content,
                anchor,
                style,
            } => {
                painter.text(
                    origin + anchor.to_vec2(),
                    Align2::LEFT_BOTTOM,
                    content,
                    FontId::proportional(style.font_size),
                    style.fill,
                );
            }
            Shape::Path {
                commands,
                stroke,
                dash,
                marker_mid,
            } => {
                let points = flatten(commands, CURVE_SEGMENTS)
                    .into_iter()
                    .map(|point| origin + point.to_vec2())
                    .collect::<Vec<_>>();
                if points.len() < 2 {
                    continue;
                }

                match dash {
                    Some(length) if *length > 0.0 => {
                        painter.extend(egui::Shape::dashed_line(&points, *stroke, *length, *length));
                    }
                    _ => {
                        painter.add(egui::Shape::line(points.clone(), *stroke));
                    }
                }
                if *marker_mid && let Some((tip, direction)) = polyline_midpoint(&points) {
                    draw_arrow_head(painter, tip, direction, ARROW_SIZE, stroke.color);
                }
            }
            Shape::Rect {
                size,
                fill,
                stroke,
                corner_radius,
            } => {
                let panel = Rect::from_min_size(origin, *size);
                if element.shadow {
                    painter.rect_filled(panel.translate(SHADOW_OFFSET), *corner_radius, SHADOW_COLOR);
                }
                painter.rect_filled(panel, *corner_radius, *fill);
                painter.rect_stroke(panel, *corner_radius, Stroke::new(stroke.width, stroke.color), egui::StrokeKind::Inside);
            }
        }
    }
}
