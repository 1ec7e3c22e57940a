use crate::model::{ViewRecord, Views, Workspace};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ViewType {
    Landscape,
    Context,
    Container,
    Component,
    Deployment,
    Dynamic,
}

impl ViewType {
    pub const ALL: [ViewType; 6] = [
        ViewType::Landscape,
        ViewType::Context,
        ViewType::Container,
        ViewType::Component,
        ViewType::Deployment,
        ViewType::Dynamic,
    ];

    pub fn token(self) -> &'static str {
        match self {
            Self::Landscape => "landscape",
            Self::Context => "context",
            Self::Container => "container",
            Self::Component => "component",
            Self::Deployment => "deployment",
            Self::Dynamic => "dynamic",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Landscape => "System Landscape",
            Self::Context => "System Context",
            Self::Container => "Container View",
            Self::Component => "Component View",
            Self::Deployment => "Deployment View",
            Self::Dynamic => "Dynamic View",
        }
    }
}

impl fmt::Display for ViewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown view type '{0}' (expected landscape, context, container, component, deployment or dynamic)")]
pub struct ViewTypeParseError(pub String);

impl FromStr for ViewType {
    type Err = ViewTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "landscape" | "systemlandscape" => Ok(Self::Landscape),
            "context" | "systemcontext" => Ok(Self::Context),
            "container" => Ok(Self::Container),
            "component" => Ok(Self::Component),
            "deployment" => Ok(Self::Deployment),
            "dynamic" => Ok(Self::Dynamic),
            _ => Err(ViewTypeParseError(s.to_string())),
        }
    }
}

impl Views {
    pub fn category(&self, view_type: ViewType) -> &[ViewRecord] {
        match view_type {
            ViewType::Landscape => &self.system_landscape_views,
            ViewType::Context => &self.system_context_views,
            ViewType::Container => &self.container_views,
            ViewType::Component => &self.component_views,
            ViewType::Deployment => &self.deployment_views,
            ViewType::Dynamic => &self.dynamic_views,
        }
    }
}

/// Picks the view to draw: the keyed entry when a key is given, otherwise the
/// first view of the category. `None` means an empty diagram.
pub fn resolve_view<'a>(
    workspace: &'a Workspace,
    view_type: ViewType,
    key: Option<&str>,
) -> Option<&'a ViewRecord> {
    let views = workspace.views.category(view_type);
    match key {
        Some(key) => views.iter().find(|view| view.key == key),
        None => views.first(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewTypeSummary {
    pub view_type: ViewType,
    pub label: &'static str,
    pub count: usize,
}

/// Non-empty view categories in display order.
pub fn available_view_types(workspace: &Workspace) -> Vec<ViewTypeSummary> {
    ViewType::ALL
        .iter()
        .map(|view_type| ViewTypeSummary {
            view_type: *view_type,
            label: view_type.label(),
            count: workspace.views.category(*view_type).len(),
        })
        .filter(|summary| summary.count > 0)
        .collect()
}

/// `(key, display name)` pairs for a category's view picker.
pub fn views_in_category(workspace: &Workspace, view_type: ViewType) -> Vec<(String, String)> {
    workspace
        .views
        .category(view_type)
        .iter()
        .map(|view| {
            let name = view
                .description
                .clone()
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| view.key.clone());
            (view.key.clone(), name)
        })
        .collect()
}

/// Caption for the active view: its own description, else the category's first
/// description, else the category label.
pub fn view_description(workspace: &Workspace, view_type: ViewType, key: Option<&str>) -> String {
    let views = workspace.views.category(view_type);
    let keyed = key.and_then(|key| views.iter().find(|view| view.key == key));
    keyed
        .and_then(|view| view.description.clone())
        .or_else(|| views.first().and_then(|view| view.description.clone()))
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| view_type.label().to_string())
}
