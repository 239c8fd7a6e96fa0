use eframe::egui::Rect;

use super::super::{GraphSession, ViewModel, Viewport};

impl ViewModel {
    /// Creates the session once the canvas has a size, and forwards later
    /// canvas size changes as viewport resizes.
    pub(in crate::app) fn sync_session_viewport(&mut self, rect: Rect) -> Option<&mut GraphSession> {
        let viewport = Viewport::new(rect.width(), rect.height());
        if viewport.width < 1.0 || viewport.height < 1.0 {
            return self.session.as_mut();
        }

        if let Some(graph) = self.pending.take() {
            self.session = Some(GraphSession::new(graph, self.config.clone(), viewport));
        } else if let Some(session) = self.session.as_mut() {
            session.resize(viewport);
        }
        self.session.as_mut()
    }
}
