//! Shape descriptors for one rendered view.
//!
//! A [`Scene`] is the complete, immutable drawing of a view in diagram
//! coordinates: edges first, then element shapes in walk order. Serializers
//! (SVG, the layout dump) consume it without re-deriving any geometry.

use crate::collect::ViewContents;
use crate::config::LayoutConfig;
use crate::ir::{Element, ElementKind, Relationship};
use crate::layout::text::{label_background_width, truncate, wrap_words};
use crate::layout::{Layout, LayoutEntry, route_edge};
use crate::style::{ResolvedElementStyle, ShapeKind, StyleResolver, uses_person_glyph};
use crate::theme::Theme;
use log::{debug, trace};
use serde::Serialize;

const HEAD_RADIUS: f32 = 20.0;
const HEAD_OFFSET: f32 = 28.0;
const BODY_OFFSET: f32 = 60.0;
const BODY_WIDTH: f32 = 55.0;
const BODY_HEIGHT: f32 = 38.0;
const BODY_SPREAD: f32 = 10.0;
const CYLINDER_RY: f32 = 15.0;
const CORNER_RADIUS: f32 = 8.0;
const HIGHLIGHT_INSET: f32 = 5.0;
const NAME_LIMIT: usize = 24;
const ELEMENT_TECH_LIMIT: usize = 28;
const EDGE_LABEL_LIMIT: usize = 28;
const EDGE_TECH_LIMIT: usize = 22;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Normal,
    Medium,
    Bold,
}

impl FontWeight {
    pub fn svg_value(self) -> Option<&'static str> {
        match self {
            FontWeight::Normal => None,
            FontWeight::Medium => Some("500"),
            FontWeight::Bold => Some("bold"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextShape {
    pub x: f32,
    pub y: f32,
    pub content: String,
    pub font_size: f32,
    pub weight: FontWeight,
    pub italic: bool,
    pub fill: String,
}

impl TextShape {
    fn new(x: f32, y: f32, content: String, font_size: f32, fill: &str) -> Self {
        Self {
            x,
            y,
            content,
            font_size,
            weight: FontWeight::Normal,
            italic: false,
            fill: fill.to_string(),
        }
    }

    fn bold(mut self) -> Self {
        self.weight = FontWeight::Bold;
        self
    }

    fn medium(mut self) -> Self {
        self.weight = FontWeight::Medium;
        self
    }

    fn italic(mut self) -> Self {
        self.italic = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "camelCase")]
pub enum NodeGeometry {
    Person {
        head_center: (f32, f32),
        head_radius: f32,
        /// Trapezoid corners: top-left, top-right, bottom-right, bottom-left.
        body: [(f32, f32); 4],
    },
    Cylinder {
        center_x: f32,
        rx: f32,
        ry: f32,
        top_y: f32,
        bottom_y: f32,
    },
    Box {
        corner_radius: f32,
    },
}

impl NodeGeometry {
    pub fn name(&self) -> &'static str {
        match self {
            NodeGeometry::Person { .. } => "person",
            NodeGeometry::Cylinder { .. } => "cylinder",
            NodeGeometry::Box { .. } => "box",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeShape {
    pub id: String,
    pub kind: ElementKind,
    pub bounds: LayoutEntry,
    pub geometry: NodeGeometry,
    pub fill: String,
    pub stroke: String,
    pub texts: Vec<TextShape>,
    /// Dashed selection outline, present only for the selected element.
    pub highlight: Option<LayoutEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    Solid,
    Dashed,
}

impl MarkerKind {
    pub fn id(self) -> &'static str {
        match self {
            MarkerKind::Solid => "arrowhead-solid",
            MarkerKind::Dashed => "arrowhead-dashed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeLabel {
    pub background: LayoutEntry,
    pub text: TextShape,
    pub technology: Option<TextShape>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeShape {
    pub id: String,
    pub source_id: String,
    pub destination_id: String,
    pub start: (f32, f32),
    pub end: (f32, f32),
    pub color: String,
    pub thickness: f32,
    pub dashed: bool,
    pub marker: MarkerKind,
    pub label: Option<EdgeLabel>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub view_key: Option<String>,
    /// ViewBox size in diagram units.
    pub width: f32,
    pub height: f32,
    pub edges: Vec<EdgeShape>,
    pub nodes: Vec<NodeShape>,
}

impl Scene {
    /// Scene for a view that could not be resolved.
    pub fn empty(padding: f32) -> Self {
        Self {
            view_key: None,
            width: 2.0 * padding,
            height: 2.0 * padding,
            edges: Vec::new(),
            nodes: Vec::new(),
        }
    }

    pub fn node(&self, id: &str) -> Option<&NodeShape> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&EdgeShape> {
        self.edges.iter().find(|edge| edge.id == id)
    }
}

pub struct SceneOptions<'a> {
    pub view_key: Option<&'a str>,
    pub selected: Option<&'a str>,
    pub styles: &'a StyleResolver,
    pub theme: &'a Theme,
    pub config: &'a LayoutConfig,
}

pub fn build_scene(contents: &ViewContents, layout: &Layout, options: &SceneOptions<'_>) -> Scene {
    let edges: Vec<EdgeShape> = contents
        .relationships
        .iter()
        .filter_map(|relationship| edge_shape(relationship, layout, options))
        .collect();
    let nodes: Vec<NodeShape> = contents
        .elements
        .iter()
        .filter_map(|element| {
            let bounds = *layout.get(&element.id)?;
            Some(node_shape(element, bounds, options))
        })
        .collect();

    debug!(
        nodes = nodes.len(),
        edges = edges.len(),
        width = layout.width,
        height = layout.height;
        "Built scene"
    );
    Scene {
        view_key: options.view_key.map(str::to_string),
        width: layout.width,
        height: layout.height,
        edges,
        nodes,
    }
}

fn node_shape(element: &Element, bounds: LayoutEntry, options: &SceneOptions<'_>) -> NodeShape {
    let style = options.styles.element_style(element);
    trace!(element = element.id.as_str(), shape:? = style.shape; "Styling element");

    let (geometry, texts) = if uses_person_glyph(element.kind, &style) {
        person_glyph(element, &bounds, options.theme)
    } else if style.shape == ShapeKind::Cylinder {
        let rx = bounds.width / 2.0;
        let geometry = NodeGeometry::Cylinder {
            center_x: bounds.x + rx,
            rx,
            ry: CYLINDER_RY,
            top_y: bounds.y + CYLINDER_RY,
            bottom_y: bounds.bottom() - CYLINDER_RY,
        };
        (geometry, box_texts(element, &bounds, &style))
    } else {
        let corner_radius = if style.shape == ShapeKind::RoundedBox {
            CORNER_RADIUS
        } else {
            0.0
        };
        (
            NodeGeometry::Box { corner_radius },
            box_texts(element, &bounds, &style),
        )
    };

    let highlight = (options.selected == Some(element.id.as_str()))
        .then(|| bounds.inflated(HIGHLIGHT_INSET));

    NodeShape {
        id: element.id.clone(),
        kind: element.kind,
        bounds,
        geometry,
        fill: style.background,
        stroke: style.stroke,
        texts,
        highlight,
    }
}

fn person_glyph(element: &Element, bounds: &LayoutEntry, theme: &Theme) -> (NodeGeometry, Vec<TextShape>) {
    let center_x = bounds.x + bounds.width / 2.0;
    let body_y = bounds.y + BODY_OFFSET;
    let half = BODY_WIDTH / 2.0;
    let body_bottom = body_y + BODY_HEIGHT;
    let geometry = NodeGeometry::Person {
        head_center: (center_x, bounds.y + HEAD_OFFSET),
        head_radius: HEAD_RADIUS,
        body: [
            (center_x - half, body_y),
            (center_x + half, body_y),
            (center_x + half + BODY_SPREAD, body_bottom),
            (center_x - half - BODY_SPREAD, body_bottom),
        ],
    };

    let mut texts = vec![
        TextShape::new(
            center_x,
            body_bottom + 22.0,
            truncate(&element.name, NAME_LIMIT),
            14.0,
            &theme.primary_text_color,
        )
        .bold(),
    ];
    if let Some(description) = element.description.as_deref() {
        for (idx, line) in wrap_words(description, 28).into_iter().take(2).enumerate() {
            texts.push(TextShape::new(
                center_x,
                body_bottom + 40.0 + idx as f32 * 15.0,
                line,
                11.0,
                &theme.secondary_text_color,
            ));
        }
    }
    (geometry, texts)
}

fn box_texts(element: &Element, bounds: &LayoutEntry, style: &ResolvedElementStyle) -> Vec<TextShape> {
    let center_x = bounds.x + bounds.width / 2.0;
    let color = style.color.as_str();
    let mut cursor_y = bounds.y + 32.0;

    let mut texts = vec![
        TextShape::new(
            center_x,
            cursor_y,
            truncate(&element.name, NAME_LIMIT),
            13.0,
            color,
        )
        .bold(),
    ];
    cursor_y += 20.0;

    if let Some(technology) = element.technology.as_deref() {
        texts.push(
            TextShape::new(
                center_x,
                cursor_y,
                format!("[{}]", truncate(technology, ELEMENT_TECH_LIMIT)),
                10.0,
                color,
            )
            .italic(),
        );
        cursor_y += 18.0;
    }

    if let Some(description) = element.description.as_deref() {
        for (idx, line) in wrap_words(description, 30).into_iter().take(3).enumerate() {
            texts.push(TextShape::new(
                center_x,
                cursor_y + idx as f32 * 14.0,
                line,
                10.0,
                color,
            ));
        }
    }
    texts
}

fn edge_shape(relationship: &Relationship, layout: &Layout, options: &SceneOptions<'_>) -> Option<EdgeShape> {
    let (Some(source), Some(destination)) = (
        layout.get(&relationship.source_id),
        layout.get(&relationship.destination_id),
    ) else {
        debug!(relationship = relationship.id.as_str(); "Skipping relationship without placed endpoints");
        return None;
    };

    let style = options.styles.relationship_style(relationship);
    let route = route_edge(source, destination, options.config.arrow_offset);
    let dashed = style.is_dashed();
    let marker = if dashed {
        MarkerKind::Dashed
    } else {
        MarkerKind::Solid
    };

    let label = relationship.description.as_deref().map(|description| {
        let theme = options.theme;
        let (mid_x, mid_y) = route.midpoint();
        let text = truncate(description, EDGE_LABEL_LIMIT);
        let width = label_background_width(&text, theme.font_size, &theme.font_family, options.config);
        EdgeLabel {
            background: LayoutEntry::new(mid_x - width / 2.0, mid_y - 20.0, width, 18.0),
            text: TextShape::new(mid_x, mid_y - 7.0, text, theme.font_size, &theme.primary_text_color)
                .medium(),
            technology: relationship.technology.as_deref().map(|technology| {
                TextShape::new(
                    mid_x,
                    mid_y + 14.0,
                    format!("[{}]", truncate(technology, EDGE_TECH_LIMIT)),
                    theme.font_size - 1.0,
                    &theme.secondary_text_color,
                )
                .italic()
            }),
        }
    });

    Some(EdgeShape {
        id: relationship.id.clone(),
        source_id: relationship.source_id.clone(),
        destination_id: relationship.destination_id.clone(),
        start: route.start,
        end: route.end,
        color: style.color,
        thickness: style.thickness,
        dashed,
        marker,
        label,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{LayoutMap, compute_layout, translate};
    use crate::model::ViewConfiguration;
    use crate::style::StyleOverrides;
    use float_cmp::assert_approx_eq;

    fn element(id: &str, kind: ElementKind, tags: &[&str]) -> Element {
        Element {
            id: id.to_string(),
            name: format!("{id} name"),
            kind,
            technology: None,
            description: None,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            parent_id: None,
        }
    }

    fn relationship(id: &str, from: &str, to: &str) -> Relationship {
        Relationship {
            id: id.to_string(),
            source_id: from.to_string(),
            destination_id: to.to_string(),
            description: Some("Uses".to_string()),
            technology: Some("HTTPS".to_string()),
            tags: Vec::new(),
            interaction_style: None,
        }
    }

    fn config() -> LayoutConfig {
        LayoutConfig {
            fast_text_metrics: true,
            ..LayoutConfig::default()
        }
    }

    fn scene_for(contents: &ViewContents, selected: Option<&str>) -> Scene {
        let config = config();
        let layout = translate(&compute_layout(&contents.elements, &config), &config);
        let styles = StyleResolver::new(&ViewConfiguration::default(), &StyleOverrides::default());
        let theme = Theme::default();
        build_scene(
            contents,
            &layout,
            &SceneOptions {
                view_key: Some("view"),
                selected,
                styles: &styles,
                theme: &theme,
                config: &config,
            },
        )
    }

    #[test]
    fn picks_geometry_from_kind_and_shape() {
        let contents = ViewContents {
            elements: vec![
                element("p", ElementKind::Person, &[]),
                element("db", ElementKind::Container, &["Database"]),
                element("api", ElementKind::Container, &["Container"]),
                element("plain", ElementKind::Container, &["Custom"]),
            ],
            relationships: Vec::new(),
        };
        let scene = scene_for(&contents, None);
        assert_eq!(scene.node("p").unwrap().geometry.name(), "person");
        assert_eq!(scene.node("db").unwrap().geometry.name(), "cylinder");
        assert_eq!(
            scene.node("api").unwrap().geometry,
            NodeGeometry::Box { corner_radius: 8.0 }
        );
    }

    #[test]
    fn person_glyph_matches_fixed_offsets() {
        let contents = ViewContents {
            elements: vec![element("p", ElementKind::Person, &["Person"])],
            relationships: Vec::new(),
        };
        let scene = scene_for(&contents, None);
        let node = scene.node("p").unwrap();
        let NodeGeometry::Person { head_center, body, .. } = &node.geometry else {
            panic!("expected person glyph");
        };
        // Padding puts the only element at (100, 100).
        assert_eq!(*head_center, (200.0, 128.0));
        assert_eq!(body[0], (172.5, 160.0));
        assert_eq!(body[2], (237.5, 198.0));
        assert_eq!(node.texts[0].y, 220.0);
        assert_eq!(node.fill, "#08427b");
    }

    #[test]
    fn box_text_stack_skips_missing_technology() {
        let mut api = element("api", ElementKind::Container, &[]);
        api.description = Some("Handles every request made by the web client".to_string());
        let contents = ViewContents {
            elements: vec![api],
            relationships: Vec::new(),
        };
        let scene = scene_for(&contents, None);
        let texts = &scene.node("api").unwrap().texts;
        assert_eq!(texts[0].y, 132.0);
        assert_eq!(texts[0].weight, FontWeight::Bold);
        assert_eq!(texts[1].y, 152.0);
        assert_eq!(texts[2].y, 166.0);
    }

    #[test]
    fn edges_come_with_label_and_technology() {
        let contents = ViewContents {
            elements: vec![
                element("a", ElementKind::SoftwareSystem, &[]),
                element("b", ElementKind::SoftwareSystem, &[]),
            ],
            relationships: vec![relationship("r", "a", "b")],
        };
        let scene = scene_for(&contents, None);
        let edge = scene.edge("r").unwrap();
        assert_eq!(edge.marker, MarkerKind::Solid);
        let label = edge.label.as_ref().unwrap();
        let (mid_x, mid_y) = ((edge.start.0 + edge.end.0) / 2.0, (edge.start.1 + edge.end.1) / 2.0);
        assert_approx_eq!(f32, label.background.width, 4.0 * 6.5 + 10.0);
        assert_approx_eq!(f32, label.background.y, mid_y - 20.0);
        assert_approx_eq!(f32, label.text.x, mid_x);
        assert_eq!(label.technology.as_ref().unwrap().content, "[HTTPS]");
    }

    #[test]
    fn asynchronous_relationships_are_dashed() {
        let mut rel = relationship("r", "a", "b");
        rel.interaction_style = Some("Asynchronous".to_string());
        let contents = ViewContents {
            elements: vec![
                element("a", ElementKind::SoftwareSystem, &[]),
                element("b", ElementKind::SoftwareSystem, &[]),
            ],
            relationships: vec![rel],
        };
        let mut scene = scene_for(&contents, None);
        let edge = scene.edges.remove(0);
        assert!(edge.dashed);
        assert_eq!(edge.marker.id(), "arrowhead-dashed");
    }

    #[test]
    fn selection_adds_inflated_highlight() {
        let contents = ViewContents {
            elements: vec![
                element("a", ElementKind::SoftwareSystem, &[]),
                element("b", ElementKind::SoftwareSystem, &[]),
            ],
            relationships: Vec::new(),
        };
        let scene = scene_for(&contents, Some("b"));
        assert!(scene.node("a").unwrap().highlight.is_none());
        let highlight = scene.node("b").unwrap().highlight.unwrap();
        assert_eq!(highlight, LayoutEntry::new(415.0, 95.0, 210.0, 160.0));
    }

    #[test]
    fn unplaced_endpoints_are_skipped() {
        let contents = ViewContents {
            elements: vec![element("a", ElementKind::SoftwareSystem, &[])],
            relationships: vec![relationship("r", "a", "ghost")],
        };
        let config = config();
        let mut entries = LayoutMap::new();
        entries.insert("a".to_string(), LayoutEntry::new(0.0, 0.0, 200.0, 150.0));
        let layout = translate(&entries, &config);
        let styles = StyleResolver::default();
        let theme = Theme::default();
        let scene = build_scene(
            &contents,
            &layout,
            &SceneOptions {
                view_key: None,
                selected: None,
                styles: &styles,
                theme: &theme,
                config: &config,
            },
        );
        assert!(scene.edges.is_empty());
        assert_eq!(scene.nodes.len(), 1);
    }

    #[test]
    fn empty_scene_has_default_viewbox() {
        let scene = Scene::empty(100.0);
        assert_eq!((scene.width, scene.height), (200.0, 200.0));
    }
}
