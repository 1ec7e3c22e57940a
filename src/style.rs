//! Tag-driven style resolution.
//!
//! Each element or relationship carries an ordered tag list. Styles are built
//! by walking that list and, for every tag, layering the built-in entry for the
//! tag and then any caller-supplied entries for it over the running result.
//! Fields left unset by a layer keep their earlier value, so later tags only
//! override what they actually specify.

use crate::ir::{Element, ElementKind, Relationship};
use crate::model::ViewConfiguration;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ShapeKind {
    Box,
    RoundedBox,
    Person,
    Cylinder,
    /// Any other Structurizr shape name; drawn as a plain box.
    Other(String),
}

impl From<String> for ShapeKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Box" => Self::Box,
            "RoundedBox" => Self::RoundedBox,
            "Person" => Self::Person,
            "Cylinder" => Self::Cylinder,
            _ => Self::Other(value),
        }
    }
}

impl From<ShapeKind> for String {
    fn from(value: ShapeKind) -> Self {
        match value {
            ShapeKind::Box => "Box".to_string(),
            ShapeKind::RoundedBox => "RoundedBox".to_string(),
            ShapeKind::Person => "Person".to_string(),
            ShapeKind::Cylinder => "Cylinder".to_string(),
            ShapeKind::Other(other) => other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LineStyle {
    Solid,
    Dashed,
}

impl From<String> for LineStyle {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "dashed" | "dotted" => Self::Dashed,
            _ => Self::Solid,
        }
    }
}

impl From<LineStyle> for String {
    fn from(value: LineStyle) -> Self {
        match value {
            LineStyle::Solid => "solid".to_string(),
            LineStyle::Dashed => "dashed".to_string(),
        }
    }
}

/// Partial element style; `None` fields defer to lower-priority layers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ElementStyle {
    pub shape: Option<ShapeKind>,
    pub background: Option<String>,
    pub color: Option<String>,
    pub stroke: Option<String>,
}

impl ElementStyle {
    fn layer(&mut self, over: &ElementStyle) {
        if over.shape.is_some() {
            self.shape.clone_from(&over.shape);
        }
        if over.background.is_some() {
            self.background.clone_from(&over.background);
        }
        if over.color.is_some() {
            self.color.clone_from(&over.color);
        }
        if over.stroke.is_some() {
            self.stroke.clone_from(&over.stroke);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RelationshipStyle {
    pub thickness: Option<f32>,
    pub color: Option<String>,
    pub style: Option<LineStyle>,
}

impl RelationshipStyle {
    fn layer(&mut self, over: &RelationshipStyle) {
        if over.thickness.is_some() {
            self.thickness = over.thickness;
        }
        if over.color.is_some() {
            self.color.clone_from(&over.color);
        }
        if over.style.is_some() {
            self.style = over.style;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaggedElementStyle {
    pub tag: String,
    #[serde(flatten)]
    pub style: ElementStyle,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaggedRelationshipStyle {
    pub tag: String,
    #[serde(flatten)]
    pub style: RelationshipStyle,
}

/// Host-supplied styles, applied after the workspace's own configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StyleOverrides {
    pub element_styles: Vec<TaggedElementStyle>,
    pub relationship_styles: Vec<TaggedRelationshipStyle>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedElementStyle {
    pub shape: ShapeKind,
    pub background: String,
    pub color: String,
    pub stroke: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedRelationshipStyle {
    pub thickness: f32,
    pub color: String,
    pub style: LineStyle,
}

impl ResolvedRelationshipStyle {
    pub fn is_dashed(&self) -> bool {
        self.style == LineStyle::Dashed
    }
}

fn element_baseline(stroke: &str) -> ElementStyle {
    ElementStyle {
        shape: Some(ShapeKind::RoundedBox),
        background: Some("#438dd5".to_string()),
        color: Some("#ffffff".to_string()),
        stroke: Some(stroke.to_string()),
    }
}

fn builtin_element_style(tag: &str) -> Option<ElementStyle> {
    let (shape, background, color) = match tag {
        "Person" => (Some(ShapeKind::Person), "#08427b", "#ffffff"),
        "Software System" => (Some(ShapeKind::RoundedBox), "#1168bd", "#ffffff"),
        "Container" => (Some(ShapeKind::RoundedBox), "#438dd5", "#ffffff"),
        "Component" => (Some(ShapeKind::RoundedBox), "#85bbf0", "#000000"),
        "Database" => (Some(ShapeKind::Cylinder), "#438dd5", "#ffffff"),
        "External" => (None, "#999999", "#ffffff"),
        "Gateway" => (None, "#0ea5e9", "#ffffff"),
        "Microservice" => (None, "#20B2AA", "#ffffff"),
        "Infrastructure" => (None, "#6366f1", "#ffffff"),
        _ => return None,
    };
    Some(ElementStyle {
        shape,
        background: Some(background.to_string()),
        color: Some(color.to_string()),
        stroke: None,
    })
}

fn relationship_baseline() -> RelationshipStyle {
    RelationshipStyle {
        thickness: Some(2.0),
        color: Some("#707070".to_string()),
        style: Some(LineStyle::Solid),
    }
}

fn builtin_relationship_style(tag: &str) -> Option<RelationshipStyle> {
    match tag {
        "Asynchronous" => Some(RelationshipStyle {
            style: Some(LineStyle::Dashed),
            ..RelationshipStyle::default()
        }),
        _ => None,
    }
}

/// Resolves styles against the workspace configuration plus host overrides.
#[derive(Debug, Clone, Default)]
pub struct StyleResolver {
    element_styles: Vec<TaggedElementStyle>,
    relationship_styles: Vec<TaggedRelationshipStyle>,
    /// Outline for elements no style layer sets a stroke on.
    element_stroke: Option<String>,
}

impl StyleResolver {
    pub fn new(configuration: &ViewConfiguration, overrides: &StyleOverrides) -> Self {
        Self {
            element_styles: configuration
                .element_styles()
                .chain(overrides.element_styles.iter())
                .cloned()
                .collect(),
            relationship_styles: configuration
                .relationship_styles()
                .chain(overrides.relationship_styles.iter())
                .cloned()
                .collect(),
            element_stroke: None,
        }
    }

    pub fn with_element_stroke(mut self, stroke: &str) -> Self {
        self.element_stroke = Some(stroke.to_string());
        self
    }

    pub fn element_style(&self, element: &Element) -> ResolvedElementStyle {
        let mut style = element_baseline(self.element_stroke.as_deref().unwrap_or("#000000"));
        for tag in &element.tags {
            if let Some(builtin) = builtin_element_style(tag) {
                style.layer(&builtin);
            }
            for custom in self.element_styles.iter().filter(|s| &s.tag == tag) {
                style.layer(&custom.style);
            }
        }
        // Layers never unset a field, so the baseline values are always present.
        ResolvedElementStyle {
            shape: style.shape.unwrap_or(ShapeKind::RoundedBox),
            background: style.background.unwrap_or_default(),
            color: style.color.unwrap_or_default(),
            stroke: style.stroke.unwrap_or_default(),
        }
    }

    pub fn relationship_style(&self, relationship: &Relationship) -> ResolvedRelationshipStyle {
        let mut style = relationship_baseline();
        for tag in &relationship.tags {
            if let Some(builtin) = builtin_relationship_style(tag) {
                style.layer(&builtin);
            }
            for custom in self.relationship_styles.iter().filter(|s| &s.tag == tag) {
                style.layer(&custom.style);
            }
        }
        let mut line = style.style.unwrap_or(LineStyle::Solid);
        if relationship.is_asynchronous() {
            line = LineStyle::Dashed;
        }
        ResolvedRelationshipStyle {
            thickness: style.thickness.unwrap_or(2.0),
            color: style.color.unwrap_or_else(|| "#707070".to_string()),
            style: line,
        }
    }
}

/// The person glyph is used for people regardless of their styling.
pub fn uses_person_glyph(kind: ElementKind, style: &ResolvedElementStyle) -> bool {
    kind == ElementKind::Person || style.shape == ShapeKind::Person
}
