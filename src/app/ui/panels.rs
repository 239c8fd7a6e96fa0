use std::collections::VecDeque;
use std::path::Path;

use eframe::egui::{self, Align, Context, Layout, Ui};

use crate::config::{LayoutConfig, LinkPathPolicy};
use crate::graph::ResolvedGraph;

use super::super::ViewModel;
use super::super::engine::ForceKind;

impl ViewModel {
    pub(in crate::app) fn new(graph: ResolvedGraph, config: LayoutConfig) -> Self {
        Self {
            config,
            pending: Some(graph),
            session: None,
            show_fps_bar: true,
            fps_current: 0.0,
            fps_samples: VecDeque::new(),
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        data_path: &Path,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        self.update_fps_counter(ctx);

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("influence-graph");
                    ui.separator();
                    ui.label(format!("data: {}", data_path.display()));
                    if let Some(session) = &self.session {
                        ui.label(format!("nodes: {}", session.graph().node_count()));
                        ui.label(format!("links: {}", session.graph().link_count()));
                    }
                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload data"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if let Some(status) = self.layout_status_text() {
                            ui.label(status);
                        }
                        if let Some(fps_text) = self.fps_display_text() {
                            ui.label(fps_text);
                        }
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(260.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.draw_graph(ui));
    }

    fn draw_controls(&mut self, ui: &mut Ui) {
        ui.checkbox(&mut self.show_fps_bar, "Show FPS");
        ui.separator();

        let Some(session) = self.session.as_mut() else {
            ui.label("Waiting for the canvas...");
            return;
        };

        ui.heading("Forces");
        for kind in ForceKind::ALL {
            let mut enabled = session.force_enabled(kind);
            let available = session.force_available(kind);
            let response = ui.add_enabled(available, egui::Checkbox::new(&mut enabled, kind.label()));
            if response.changed() {
                session.set_force_enabled(kind, enabled);
            }
        }

        ui.add_space(8.0);
        ui.heading("Link paths");
        let mut policy = session.link_policy();
        ui.horizontal(|ui| {
            for option in [LinkPathPolicy::Cardinal, LinkPathPolicy::Quadratic] {
                ui.radio_value(&mut policy, option, option.label());
            }
        });
        session.set_link_policy(policy);

        ui.add_space(8.0);
        if ui.button("Reheat layout").clicked() {
            session.reheat();
        }

        ui.separator();
        ui.heading("Hovered");
        let hovered = session.hovered();
        match hovered.and_then(|index| session.graph().nodes.get(index)) {
            Some(node) => {
                let position = hovered
                    .and_then(|index| session.node_position(index))
                    .map(|position| format!("{:.0}, {:.0}", position.x, position.y))
                    .unwrap_or_default();
                egui::Grid::new("hovered_node")
                    .num_columns(2)
                    .striped(true)
                    .show(ui, |ui| {
                        for (label, value) in [
                            ("id", node.id.clone()),
                            ("name", node.name.clone()),
                            ("role", node.role.clone()),
                            ("zone", node.zone.clone()),
                            ("influence", format!("{}", node.influence)),
                            ("position", position.clone()),
                        ] {
                            ui.label(label);
                            ui.label(value);
                            ui.end_row();
                        }
                    });
            }
            None => {
                ui.label("Hover a node to inspect it.");
            }
        }
    }
}
