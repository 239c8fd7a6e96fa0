use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::app::scene::svg::render_svg;
use crate::app::{GraphSession, Viewport};
use crate::config::LayoutConfig;
use crate::graph::load_graph_data;

/// Lays the graph out headlessly until it settles (or `max_ticks` runs out)
/// and writes the final frame as an SVG document.
pub fn export_svg(
    data_path: &Path,
    config: LayoutConfig,
    viewport: Viewport,
    max_ticks: u64,
    out: &Path,
) -> Result<()> {
    let data = load_graph_data(data_path)?;
    let mut session = GraphSession::from_data(data, config, viewport)
        .with_context(|| format!("invalid graph data in {}", data_path.display()))?;

    let ticks = session.run_until_settled(max_ticks);
    let document = render_svg(session.scene(), viewport.width, viewport.height);

    fs::write(out, document)
        .with_context(|| format!("failed to write svg to {}", out.display()))?;

    tracing::info!(
        path = %out.display(),
        ticks,
        settled = !session.is_running(),
        "exported svg"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::process;

    use super::*;
    use crate::config::Preset;

    #[test]
    fn export_writes_a_settled_svg() {
        let dir = env::temp_dir().join(format!("influence-graph-export-{}", process::id()));
        fs::create_dir_all(&dir).unwrap();
        let data_path = dir.join("data.json");
        let out = dir.join("graph.svg");
        fs::write(
            &data_path,
            r#"{
                "nodes": [
                    { "id": "0", "name": "Ada", "role": "Chair", "zone": "north", "influence": 30 },
                    { "id": "1", "name": "Bo", "role": "Envoy", "zone": "south", "influence": 10 }
                ],
                "links": [ { "source": "0", "target": "1", "weight": 4 } ]
            }"#,
        )
        .unwrap();

        export_svg(
            &data_path,
            LayoutConfig::preset(Preset::Primary),
            Viewport::new(400.0, 300.0),
            1000,
            &out,
        )
        .unwrap();

        let svg = fs::read_to_string(&out).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("Ada"));
        assert_eq!(svg.matches("<circle").count(), 2);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_data_file_reports_the_path() {
        let error = export_svg(
            Path::new("/definitely/not/here.json"),
            LayoutConfig::default(),
            Viewport::new(400.0, 300.0),
            10,
            Path::new("/tmp/unused.svg"),
        )
        .unwrap_err();
        assert!(format!("{error:#}").contains("/definitely/not/here.json"));
    }
}
