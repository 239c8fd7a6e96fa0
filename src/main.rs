mod app;
mod config;
mod export;
mod graph;
mod layout;
mod logging;
mod util;

use std::path::PathBuf;

use anyhow::anyhow;
use clap::Parser;

use crate::app::Viewport;
use crate::config::{LayoutConfig, Preset};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Graph data file with `nodes` and `links`.
    #[arg(long, default_value = "data.json")]
    data: PathBuf,

    /// JSON file overlaid on the chosen preset.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Preset::Primary)]
    preset: Preset,

    /// Directory holding the `img-<ordinal>.png` node images.
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Lay out headlessly and write the settled frame to this SVG file.
    #[arg(long)]
    export_svg: Option<PathBuf>,

    #[arg(long, default_value_t = 1200.0)]
    width: f32,

    #[arg(long, default_value_t = 800.0)]
    height: f32,

    /// Tick limit for headless export.
    #[arg(long, default_value_t = 1000)]
    max_ticks: u64,
}

fn main() -> anyhow::Result<()> {
    logging::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => LayoutConfig::load_over(args.preset, path)?,
        None => LayoutConfig::preset(args.preset),
    };
    if let Some(dir) = args.assets {
        config.assets.dir = dir;
    }

    if let Some(out) = &args.export_svg {
        let viewport = Viewport::new(args.width, args.height);
        return export::export_svg(&args.data, config, viewport, args.max_ticks, out);
    }

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([args.width + 260.0, args.height + 40.0]),
        ..Default::default()
    };

    let data_path = args.data;
    eframe::run_native(
        "influence-graph",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::InfluenceGraphApp::new(
                cc,
                data_path.clone(),
                config.clone(),
            )))
        }),
    )
    .map_err(|error| anyhow!("failed to run the viewer: {error}"))
}
