use eframe::egui::{Color32, Pos2, Stroke, Vec2, pos2, vec2};

use super::{Datum, Element, ElementId, Scene, Shape, TextStyle};
use crate::app::scale::VisualScales;
use crate::config::LayoutConfig;
use crate::graph::ResolvedGraph;

pub(in crate::app) const LINK_STROKE: Color32 = Color32::from_rgb(0xcc, 0xcc, 0xcc);
pub(in crate::app) const CARD_STROKE: Color32 = Color32::from_rgb(0x33, 0x33, 0x33);
pub(in crate::app) const LABEL_FONT: &str = "Roboto";
pub(in crate::app) const IMAGE_CONTAINER_CLASS: &str = "imageContainer";

const CIRCLE_STROKE_WIDTH: f32 = 0.5;
const LABEL_OFFSET: Vec2 = vec2(2.0, 4.0);
const CARD_CORNER_RADIUS: f32 = 4.0;
const CARD_NAME_ANCHOR: Pos2 = pos2(8.0, 20.0);
const CARD_ROLE_ANCHOR: Pos2 = pos2(8.0, 35.0);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeVisuals {
    pub circle: ElementId,
    pub image_group: ElementId,
    pub image: ElementId,
    pub label_group: ElementId,
    pub label: ElementId,
    pub radius: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinkVisuals {
    pub path: ElementId,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TooltipCard {
    pub group: ElementId,
    pub background: ElementId,
    pub name: ElementId,
    pub role: ElementId,
}

/// Index-aligned with the resolved graph's nodes and links.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneBindings {
    pub nodes: Vec<NodeVisuals>,
    pub links: Vec<LinkVisuals>,
    pub card: TooltipCard,
}

/// Builds every visual once. Geometry that depends on positions stays at the
/// origin until the first tick is rendered.
pub fn build_scene(
    graph: &ResolvedGraph,
    scales: &VisualScales,
    config: &LayoutConfig,
) -> (Scene, SceneBindings) {
    let mut scene = Scene::default();

    let links = graph
        .links
        .iter()
        .enumerate()
        .map(|(index, link)| {
            let width = scales.link_width.map(link.record.weight);
            let path = scene.append(
                None,
                Element::new(Shape::Path {
                    commands: Vec::new(),
                    stroke: Stroke::new(width, LINK_STROKE),
                    dash: config.dashed_links.then_some(width),
                    marker_mid: link.record.is_supervisory(),
                })
                .with_datum(Datum::Link(index)),
            );
            LinkVisuals { path }
        })
        .collect::<Vec<_>>();

    let radii = graph
        .nodes
        .iter()
        .map(|node| scales.node_radius.map(node.influence))
        .collect::<Vec<_>>();

    let circles = graph
        .nodes
        .iter()
        .zip(&radii)
        .enumerate()
        .map(|(index, (node, &radius))| {
            scene.append(
                None,
                Element::new(Shape::Circle {
                    center: Pos2::ZERO,
                    radius,
                    fill: scales.zone_color.map(&node.zone),
                    stroke: Stroke::new(CIRCLE_STROKE_WIDTH, LINK_STROKE),
                })
                .with_datum(Datum::Node(index))
                .with_listeners(true, true)
                .with_shadow(),
            )
        })
        .collect::<Vec<_>>();

    let images = radii
        .iter()
        .enumerate()
        .map(|(index, &radius)| {
            let group = scene.append(
                None,
                Element::new(Shape::Group)
                    .with_class(IMAGE_CONTAINER_CLASS)
                    .with_datum(Datum::Node(index))
                    .with_listeners(true, false),
            );
            let image = scene.append(
                Some(group),
                Element::new(Shape::Image {
                    href: config.assets.image_path(index),
                    size: radius,
                })
                .with_translate(vec2(-radius / 2.0, -radius / 2.0))
                .with_datum(Datum::Node(index)),
            );
            (group, image)
        })
        .collect::<Vec<_>>();

    let labels = graph
        .nodes
        .iter()
        .zip(&radii)
        .enumerate()
        .map(|(index, (node, &radius))| {
            let group = scene.append(None, Element::new(Shape::Group).with_datum(Datum::Node(index)));
            let label = scene.append(
                Some(group),
                Element::new(Shape::Text {
                    content: node.name.clone(),
                    anchor: Pos2::ZERO,
                    style: TextStyle {
                        font_family: LABEL_FONT,
                        font_size: scales.font_size.map(node.influence),
                        bold: false,
                        fill: Color32::BLACK,
                    },
                })
                .with_translate(vec2(radius, radius) + LABEL_OFFSET)
                .with_datum(Datum::Node(index)),
            );
            (group, label)
        })
        .collect::<Vec<_>>();

    let card = build_card(&mut scene, config);

    let nodes = circles
        .into_iter()
        .zip(images)
        .zip(labels)
        .zip(radii)
        .map(
            |(((circle, (image_group, image)), (label_group, label)), radius)| NodeVisuals {
                circle,
                image_group,
                image,
                label_group,
                label,
                radius,
            },
        )
        .collect();

    (scene, SceneBindings { nodes, links, card })
}

fn build_card(scene: &mut Scene, config: &LayoutConfig) -> TooltipCard {
    let tooltip = &config.tooltip;

    let mut group = Element::new(Shape::Group);
    group.pointer_events = false;
    group.visible = false;
    let group = scene.append(None, group);

    let background = scene.append(
        Some(group),
        Element::new(Shape::Rect {
            size: vec2(tooltip.min_width, tooltip.min_height),
            fill: Color32::WHITE,
            stroke: Stroke::new(1.0, CARD_STROKE),
            corner_radius: CARD_CORNER_RADIUS,
        })
        .with_shadow(),
    );

    let text = |anchor, font_size, bold| {
        Element::new(Shape::Text {
            content: String::new(),
            anchor,
            style: TextStyle {
                font_family: LABEL_FONT,
                font_size,
                bold,
                fill: CARD_STROKE,
            },
        })
    };
    let name = scene.append(
        Some(group),
        text(CARD_NAME_ANCHOR, tooltip.name_font_size, true),
    );
    let role = scene.append(
        Some(group),
        text(CARD_ROLE_ANCHOR, tooltip.role_font_size, false),
    );

    TooltipCard {
        group,
        background,
        name,
        role,
    }
}
