use eframe::egui::Context;

use crate::util::format_alpha;

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn update_fps_counter(&mut self, ctx: &Context) {
        const FPS_SAMPLE_WINDOW: usize = 180;

        let dt = ctx.input(|input| input.stable_dt);
        if dt <= f32::EPSILON {
            return;
        }

        self.fps_current = (1.0 / dt).clamp(0.0, 1000.0);
        self.fps_samples.push_back(self.fps_current);
        while self.fps_samples.len() > FPS_SAMPLE_WINDOW {
            self.fps_samples.pop_front();
        }
    }

    pub(in crate::app) fn fps_display_text(&self) -> Option<String> {
        if !self.show_fps_bar {
            return None;
        }

        let mut parts = vec![format!("FPS {:.0}", self.fps_current)];
        if !self.fps_samples.is_empty() {
            let avg = self.fps_samples.iter().sum::<f32>() / self.fps_samples.len() as f32;
            parts.push(format!("avg {avg:.1}"));
        }
        Some(parts.join(" | "))
    }

    pub(in crate::app) fn layout_status_text(&self) -> Option<String> {
        self.session.as_ref().map(|session| {
            format!(
                "alpha {} -> {} | ticks {} | {}",
                format_alpha(session.alpha()),
                format_alpha(session.alpha_target()),
                session.ticks(),
                if session.is_running() { "running" } else { "idle" }
            )
        })
    }
}
