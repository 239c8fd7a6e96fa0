use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context};

use crate::config::LayoutConfig;
use crate::graph::{ResolvedGraph, load_resolved_graph};

mod drag;
mod engine;
mod graph;
mod physics;
mod render_utils;
mod scale;
pub(crate) mod scene;
mod session;
mod tick;
mod tooltip;
mod ui;

pub(crate) use session::{GraphSession, Viewport};

pub struct InfluenceGraphApp {
    data_path: PathBuf,
    config: LayoutConfig,
    state: AppState,
    reload_rx: Option<Receiver<Result<ResolvedGraph, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<ResolvedGraph, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    config: LayoutConfig,
    /// Loaded graph waiting for the first canvas size.
    pending: Option<ResolvedGraph>,
    session: Option<GraphSession>,
    show_fps_bar: bool,
    fps_current: f32,
    fps_samples: VecDeque<f32>,
}

impl InfluenceGraphApp {
    pub fn new(cc: &eframe::CreationContext<'_>, data_path: PathBuf, config: LayoutConfig) -> Self {
        egui_extras::install_image_loaders(&cc.egui_ctx);
        let state = Self::start_load(data_path.clone());
        Self {
            data_path,
            config,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(data_path: PathBuf) -> Receiver<Result<ResolvedGraph, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_resolved_graph(&data_path).map_err(|error| format!("{error:#}"));
            if let Err(error) = &result {
                tracing::warn!(%error, "graph load failed");
            }
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(data_path: PathBuf) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(data_path),
        }
    }

    fn ready(&self, graph: ResolvedGraph) -> AppState {
        AppState::Ready(Box::new(ViewModel::new(graph, self.config.clone())))
    }
}

impl eframe::App for InfluenceGraphApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(Ok(graph)) => transition = Some(Ok(graph)),
                    Ok(Err(error)) => transition = Some(Err(error)),
                    Err(TryRecvError::Empty) => ctx.request_repaint(),
                    Err(TryRecvError::Disconnected) => {
                        transition = Some(Err("Background load worker disconnected".to_owned()))
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading influence graph...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load influence graph");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        self.reload_rx = Some(Self::spawn_load(self.data_path.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &self.data_path, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.data_path.clone()));
                }
            }
        }

        if let Some(rx) = self.reload_rx.take() {
            match rx.try_recv() {
                Ok(result) => transition = Some(result),
                Err(TryRecvError::Empty) => {
                    self.reload_rx = Some(rx);
                    ctx.request_repaint();
                }
                Err(TryRecvError::Disconnected) => {
                    transition = Some(Err("Background load worker disconnected".to_owned()));
                }
            }
        }

        if let Some(result) = transition {
            self.reload_rx = None;
            self.state = match result {
                Ok(graph) => self.ready(graph),
                Err(error) => AppState::Error(error),
            };
        }
    }
}
