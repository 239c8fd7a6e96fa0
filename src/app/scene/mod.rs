mod build;
pub mod path;
pub mod svg;
mod text;

use std::path::PathBuf;

use eframe::egui::{Color32, Pos2, Rect, Stroke, Vec2, pos2, vec2};

pub use build::{LinkVisuals, NodeVisuals, SceneBindings, TooltipCard, build_scene};
use path::PathCommand;
pub use text::{FixedAdvanceMeasure, PainterMeasure, TextExtent, TextMeasure};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(usize);

/// Data bound to an element, by index into the resolved graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Datum {
    Node(usize),
    Link(usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListenerKind {
    Drag,
    Hover,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Listeners {
    pub drag: bool,
    pub hover: bool,
}

impl Listeners {
    fn has(self, kind: ListenerKind) -> bool {
        match kind {
            ListenerKind::Drag => self.drag,
            ListenerKind::Hover => self.hover,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    pub font_family: &'static str,
    pub font_size: f32,
    pub bold: bool,
    pub fill: Color32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Group,
    Circle {
        center: Pos2,
        radius: f32,
        fill: Color32,
        stroke: Stroke,
    },
    /// Square image with its top-left corner at the local origin.
    Image {
        href: PathBuf,
        size: f32,
    },
    /// `anchor` is the left end of the baseline.
    Text {
        content: String,
        anchor: Pos2,
        style: TextStyle,
    },
    Path {
        commands: Vec<PathCommand>,
        stroke: Stroke,
        dash: Option<f32>,
        marker_mid: bool,
    },
    Rect {
        size: Vec2,
        fill: Color32,
        stroke: Stroke,
        corner_radius: f32,
    },
}

impl Shape {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Group => "g",
            Self::Circle { .. } => "circle",
            Self::Image { .. } => "image",
            Self::Text { .. } => "text",
            Self::Path { .. } => "path",
            Self::Rect { .. } => "rect",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    pub shape: Shape,
    pub translate: Vec2,
    pub visible: bool,
    pub pointer_events: bool,
    pub class: Option<&'static str>,
    pub datum: Option<Datum>,
    pub listeners: Listeners,
    pub shadow: bool,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

impl Element {
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            translate: Vec2::ZERO,
            visible: true,
            pointer_events: true,
            class: None,
            datum: None,
            listeners: Listeners::default(),
            shadow: false,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn with_datum(mut self, datum: Datum) -> Self {
        self.datum = Some(datum);
        self
    }

    pub fn with_class(mut self, class: &'static str) -> Self {
        self.class = Some(class);
        self
    }

    pub fn with_listeners(mut self, drag: bool, hover: bool) -> Self {
        self.listeners = Listeners { drag, hover };
        self
    }

    pub fn with_shadow(mut self) -> Self {
        self.shadow = true;
        self
    }

    pub fn with_translate(mut self, translate: Vec2) -> Self {
        self.translate = translate;
        self
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }
}

/// Retained element tree. Elements are never removed; later siblings paint
/// on top of earlier ones.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    elements: Vec<Element>,
    roots: Vec<ElementId>,
}

impl Scene {
    pub fn append(&mut self, parent: Option<ElementId>, mut element: Element) -> ElementId {
        let id = ElementId(self.elements.len());
        element.parent = parent.filter(|parent| parent.0 < self.elements.len());
        match element.parent {
            Some(parent) => self.elements[parent.0].children.push(id),
            None => self.roots.push(id),
        }
        self.elements.push(element);
        id
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.0)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(id.0)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn roots(&self) -> &[ElementId] {
        &self.roots
    }

    /// Pre-order walk, i.e. paint order.
    pub fn document_order(&self) -> Vec<ElementId> {
        let mut order = Vec::with_capacity(self.elements.len());
        let mut stack = self.roots.iter().rev().copied().collect::<Vec<_>>();
        while let Some(id) = stack.pop() {
            order.push(id);
            if let Some(element) = self.get(id) {
                stack.extend(element.children.iter().rev().copied());
            }
        }
        order
    }

    fn ancestors_and_self(&self, id: ElementId) -> impl Iterator<Item = &Element> + '_ {
        std::iter::successors(self.get(id), |element| {
            element.parent.and_then(|parent| self.get(parent))
        })
    }

    /// Sum of the element's own translate and all of its ancestors'.
    pub fn world_offset(&self, id: ElementId) -> Vec2 {
        self.ancestors_and_self(id)
            .fold(Vec2::ZERO, |offset, element| offset + element.translate)
    }

    pub fn is_rendered(&self, id: ElementId) -> bool {
        self.get(id).is_some() && self.ancestors_and_self(id).all(|element| element.visible)
    }

    fn receives_pointer(&self, id: ElementId) -> bool {
        self.ancestors_and_self(id)
            .all(|element| element.pointer_events)
    }

    /// Topmost circle or image under `point`, skipping hidden elements and
    /// elements with pointer events disabled.
    pub fn hit_test(&self, point: Pos2) -> Option<ElementId> {
        self.document_order().into_iter().rev().find(|&id| {
            let Some(element) = self.get(id) else {
                return false;
            };
            if !self.is_rendered(id) || !self.receives_pointer(id) {
                return false;
            }

            let offset = self.world_offset(id);
            match &element.shape {
                Shape::Circle { center, radius, .. } => {
                    (*center + offset).distance(point) <= *radius
                }
                Shape::Image { size, .. } => {
                    Rect::from_min_size(pos2(offset.x, offset.y), vec2(*size, *size))
                        .contains(point)
                }
                _ => false,
            }
        })
    }

    /// Nearest element from `id` upward carrying a listener of `kind`.
    pub fn listener_target(&self, id: ElementId, kind: ListenerKind) -> Option<ElementId> {
        let mut current = Some(id);
        while let Some(candidate) = current {
            let element = self.get(candidate)?;
            if element.listeners.has(kind) {
                return Some(candidate);
            }
            current = element.parent;
        }
        None
    }

    /// Bounding box of a text element in its own coordinate space
    /// (translate excluded), relative to the baseline anchor.
    pub fn text_bbox(&self, id: ElementId, measure: &dyn TextMeasure) -> Option<Rect> {
        let Shape::Text {
            content,
            anchor,
            style,
        } = &self.get(id)?.shape
        else {
            return None;
        };

        let extent = measure.measure(content, style.font_size, style.bold);
        Some(Rect::from_min_max(
            pos2(anchor.x, anchor.y - extent.ascent),
            pos2(anchor.x + extent.width, anchor.y + extent.descent),
        ))
    }
}
