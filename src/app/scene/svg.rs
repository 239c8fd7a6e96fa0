use eframe::egui::{Color32, Stroke, Vec2};

use super::path::to_svg_data;
use super::{ElementId, Scene, Shape};

const ARROW_MARKER_ID: &str = "markerArrow";
const SHADOW_FILTER_ID: &str = "dropShadow";

pub fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn hex(color: Color32) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b())
}

fn stroke_attrs(stroke: Stroke) -> String {
    format!(
        r#"stroke="{}" stroke-width="{:.2}""#,
        hex(stroke.color),
        stroke.width
    )
}

fn common_attrs(scene: &Scene, id: ElementId) -> String {
    let Some(element) = scene.get(id) else {
        return String::new();
    };

    let mut attrs = String::new();
    if element.translate != Vec2::ZERO {
        attrs.push_str(&format!(
            r#" transform="translate({:.2},{:.2})""#,
            element.translate.x, element.translate.y
        ));
    }
    if let Some(class) = element.class {
        attrs.push_str(&format!(r#" class="{}""#, escape_xml(class)));
    }
    if !element.visible {
        attrs.push_str(r#" display="none""#);
    }
    if !element.pointer_events {
        attrs.push_str(r#" pointer-events="none""#);
    }
    if element.shadow {
        attrs.push_str(&format!(r#" filter="url(#{SHADOW_FILTER_ID})""#));
    }
    attrs
}

fn write_element(scene: &Scene, id: ElementId, svg: &mut String) {
    let Some(element) = scene.get(id) else {
        return;
    };
    let attrs = common_attrs(scene, id);

    match &element.shape {
        Shape::Group => {
            svg.push_str(&format!("<g{attrs}>"));
            for &child in element.children() {
                write_element(scene, child, svg);
            }
            svg.push_str("</g>");
        }
        Shape::Circle {
            center,
            radius,
            fill,
            stroke,
        } => svg.push_str(&format!(
            r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="{}" {}{attrs} />"#,
            center.x,
            center.y,
            radius,
            hex(*fill),
            stroke_attrs(*stroke)
        )),
        Shape::Image { href, size } => svg.push_str(&format!(
            r#"<image href="{}" width="{:.2}" height="{:.2}"{attrs} />"#,
            escape_xml(&href.to_string_lossy()),
            size,
            size
        )),
        Shape::Text {
            content,
            anchor,
            style,
        } => svg.push_str(&format!(
            r#"<text x="{:.2}" y="{:.2}" font-family="{}" font-size="{:.1}" font-weight="{}" fill="{}"{attrs}>{}</text>"#,
            anchor.x,
            anchor.y,
            style.font_family,
            style.font_size,
            if style.bold { "bold" } else { "normal" },
            hex(style.fill),
            escape_xml(content)
        )),
        Shape::Path {
            commands,
            stroke,
            dash,
            marker_mid,
        } => {
            let mut extra = String::new();
            if let Some(dash) = dash {
                extra.push_str(&format!(r#" stroke-dasharray="{dash:.2}""#));
            }
            if *marker_mid {
                extra.push_str(&format!(r#" marker-mid="url(#{ARROW_MARKER_ID})""#));
            }
            svg.push_str(&format!(
                r#"<path d="{}" fill="none" {}{extra}{attrs} />"#,
                to_svg_data(commands),
                stroke_attrs(*stroke)
            ));
        }
        Shape::Rect {
            size,
            fill,
            stroke,
            corner_radius,
        } => svg.push_str(&format!(
            r#"<rect width="{:.2}" height="{:.2}" rx="{:.1}" fill="{}" {}{attrs} />"#,
            size.x,
            size.y,
            corner_radius,
            hex(*fill),
            stroke_attrs(*stroke)
        )),
    }
}

/// Serializes the whole scene as a standalone SVG document.
pub fn render_svg(scene: &Scene, width: f32, height: f32) -> String {
    let mut svg = String::new();
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width:.0}" height="{height:.0}" viewBox="0 0 {width:.0} {height:.0}">"#
    ));
    svg.push_str(&format!(
        r##"<defs><marker id="{ARROW_MARKER_ID}" viewBox="0 0 10 10" refX="5" refY="5" markerWidth="6" markerHeight="6" orient="auto"><path d="M0,0 L10,5 L0,10 z" fill="#ccc" /></marker><filter id="{SHADOW_FILTER_ID}" x="-50%" y="-50%" width="200%" height="200%"><feDropShadow dx="1" dy="1" stdDeviation="1.5" flood-opacity="0.3" /></filter></defs>"##
    ));
    for &root in scene.roots() {
        write_element(scene, root, &mut svg);
    }
    svg.push_str("</svg>\n");
    svg
}

#[cfg(test)]
mod tests {
    use eframe::egui::{Pos2, pos2, vec2};

    use super::*;
    use crate::app::scene::path::PathCommand;
    use crate::app::scene::{Element, TextStyle};

    #[test]
    fn escapes_markup_in_text() {
        assert_eq!(escape_xml(r#"R&D <"ops">"#), "R&amp;D &lt;&quot;ops&quot;&gt;");
    }

    #[test]
    fn writes_nested_groups_and_attributes() {
        let mut scene = Scene::default();
        scene.append(
            None,
            Element::new(Shape::Path {
                commands: vec![
                    PathCommand::MoveTo(pos2(0.0, 0.0)),
                    PathCommand::LineTo(pos2(10.0, 0.0)),
                ],
                stroke: Stroke::new(1.5, Color32::from_rgb(0xcc, 0xcc, 0xcc)),
                dash: Some(1.5),
                marker_mid: true,
            }),
        );
        let group = scene.append(
            None,
            Element::new(Shape::Group)
                .with_class("imageContainer")
                .with_translate(vec2(5.0, 6.0)),
        );
        scene.append(
            Some(group),
            Element::new(Shape::Text {
                content: "A & B".to_owned(),
                anchor: Pos2::ZERO,
                style: TextStyle {
                    font_family: "Roboto",
                    font_size: 12.0,
                    bold: false,
                    fill: Color32::BLACK,
                },
            }),
        );

        let svg = render_svg(&scene, 1200.0, 800.0);
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"width="1200""#));
        assert!(svg.contains(r#"d="M0.00,0.00 L10.00,0.00""#));
        assert!(svg.contains(r##"stroke="#cccccc""##));
        assert!(svg.contains(r#"stroke-dasharray="1.50""#));
        assert!(svg.contains("marker-mid=\"url(#markerArrow)\""));
        assert!(svg.contains(r#"<g transform="translate(5.00,6.00)" class="imageContainer">"#));
        assert!(svg.contains(">A &amp; B</text></g>"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }
}
