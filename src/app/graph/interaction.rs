use eframe::egui::{self, Rect, Ui};

use super::super::render_utils::screen_to_local;
use super::super::scene::TextMeasure;
use super::super::{GraphSession, ViewModel};

impl ViewModel {
    /// Turns egui pointer state into drag and hover events on the session.
    pub(in crate::app) fn handle_graph_pointer(
        session: &mut GraphSession,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
        measure: &dyn TextMeasure,
    ) {
        if response.drag_started_by(egui::PointerButton::Primary)
            && let Some(origin) = ui.input(|input| input.pointer.press_origin())
        {
            let local = screen_to_local(rect, origin);
            if let Some(element) = session.pointer_target(local) {
                session.drag_start(element, local);
            }
        }

        if session.dragged().is_some() {
            if response.dragged_by(egui::PointerButton::Primary)
                && let Some(pointer) = response.interact_pointer_pos()
            {
                session.drag_move(screen_to_local(rect, pointer));
            }
            if response.drag_stopped() {
                session.drag_end();
            }
            ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing);
            return;
        }

        let candidate = ui
            .input(|input| input.pointer.hover_pos())
            .filter(|pointer| rect.contains(*pointer))
            .and_then(|pointer| session.hover_candidate(screen_to_local(rect, pointer)));

        match candidate {
            Some((element, node)) => {
                if session.hovered() != Some(node) {
                    session.hover_enter(element, measure);
                }
                ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
            }
            None => {
                if session.hovered().is_some() {
                    session.hover_exit();
                }
            }
        }
    }
}
