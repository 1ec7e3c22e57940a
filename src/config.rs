use crate::style::{StyleOverrides, TaggedElementStyle, TaggedRelationshipStyle};
use crate::theme::Theme;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Grid and label constants shared by layout, routing and scene building.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub node_width: f32,
    pub node_height: f32,
    pub horizontal_gap: f32,
    pub vertical_gap: f32,
    pub person_height: f32,
    /// Vertical advance after a non-empty person row.
    pub person_row_advance: f32,
    pub component_height: f32,
    pub component_row_gap: f32,
    pub container_columns: usize,
    pub component_columns: usize,
    pub padding: f32,
    /// Inset of the destination anchor so the arrowhead stays outside the box.
    pub arrow_offset: f32,
    pub label_char_width: f32,
    pub label_margin: f32,
    /// Skip font lookup and size labels with the per-character heuristic.
    pub fast_text_metrics: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 200.0,
            node_height: 150.0,
            horizontal_gap: 120.0,
            vertical_gap: 180.0,
            person_height: 130.0,
            person_row_advance: 230.0,
            component_height: 130.0,
            component_row_gap: 100.0,
            container_columns: 4,
            component_columns: 3,
            padding: 100.0,
            arrow_offset: 12.0,
            label_char_width: 6.5,
            label_margin: 10.0,
            fast_text_metrics: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Host container size used for auto-fit and raster output.
    pub width: f32,
    pub height: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
    pub styles: StyleOverrides,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    background: Option<String>,
    primary_text_color: Option<String>,
    secondary_text_color: Option<String>,
    line_color: Option<String>,
    element_stroke: Option<String>,
    edge_label_background: Option<String>,
    selection_color: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    node_width: Option<f32>,
    node_height: Option<f32>,
    horizontal_gap: Option<f32>,
    vertical_gap: Option<f32>,
    padding: Option<f32>,
    arrow_offset: Option<f32>,
    fast_text_metrics: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    width: Option<f32>,
    height: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutConfigFile>,
    render: Option<RenderConfigFile>,
    element_styles: Vec<TaggedElementStyle>,
    relationship_styles: Vec<TaggedRelationshipStyle>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    parse_config(&contents).with_context(|| format!("parsing config file {}", path.display()))
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = serde_json::from_str(contents)?;
    let mut config = Config::default();

    match parsed.theme.as_deref() {
        Some("modern") => config.theme = Theme::modern(),
        Some("default") | Some("c4") => config.theme = Theme::c4_default(),
        Some(other) => log::warn!(theme = other; "Unknown theme name, keeping default"),
        None => {}
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
        if let Some(v) = vars.primary_text_color {
            config.theme.primary_text_color = v;
        }
        if let Some(v) = vars.secondary_text_color {
            config.theme.secondary_text_color = v;
        }
        if let Some(v) = vars.line_color {
            config.theme.line_color = v;
        }
        if let Some(v) = vars.element_stroke {
            config.theme.element_stroke = v;
        }
        if let Some(v) = vars.edge_label_background {
            config.theme.edge_label_background = v;
        }
        if let Some(v) = vars.selection_color {
            config.theme.selection_color = v;
        }
    }

    if let Some(layout) = parsed.layout {
        if let Some(v) = layout.node_width {
            config.layout.node_width = v;
        }
        if let Some(v) = layout.node_height {
            config.layout.node_height = v;
        }
        if let Some(v) = layout.horizontal_gap {
            config.layout.horizontal_gap = v;
        }
        if let Some(v) = layout.vertical_gap {
            config.layout.vertical_gap = v;
        }
        if let Some(v) = layout.padding {
            config.layout.padding = v;
        }
        if let Some(v) = layout.arrow_offset {
            config.layout.arrow_offset = v;
        }
        if let Some(v) = layout.fast_text_metrics {
            config.layout.fast_text_metrics = v;
        }
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.width {
            config.render.width = v;
        }
        if let Some(v) = render.height {
            config.render.height = v;
        }
    }

    config.styles.element_styles = parsed.element_styles;
    config.styles.relationship_styles = parsed.relationship_styles;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::ShapeKind;

    #[test]
    fn empty_config_is_default() {
        let config = parse_config("{}").unwrap();
        assert_eq!(config.layout.node_width, 200.0);
        assert_eq!(config.layout.padding, 100.0);
        assert_eq!(config.theme.line_color, "#707070");
    }

    #[test]
    fn applies_theme_layout_and_style_sections() {
        let config = parse_config(
            r##"{
                "theme": "modern",
                "themeVariables": { "selectionColor": "#ff00ff", "fontSize": 12 },
                "layout": { "padding": 40, "fastTextMetrics": true },
                "render": { "width": 640 },
                "elementStyles": [ { "tag": "Queue", "shape": "Cylinder" } ]
            }"##,
        )
        .unwrap();
        assert_eq!(config.theme.selection_color, "#ff00ff");
        assert_eq!(config.theme.font_size, 12.0);
        assert_eq!(config.theme.background, Theme::modern().background);
        assert_eq!(config.layout.padding, 40.0);
        assert!(config.layout.fast_text_metrics);
        assert_eq!(config.render.width, 640.0);
        assert_eq!(config.render.height, 800.0);
        assert_eq!(config.styles.element_styles[0].style.shape, Some(ShapeKind::Cylinder));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(parse_config("{ nope").is_err());
    }
}
