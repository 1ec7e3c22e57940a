use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    /// Base size for edge labels; element text sizes are fixed by shape.
    pub font_size: f32,
    pub background: String,
    pub primary_text_color: String,
    pub secondary_text_color: String,
    pub line_color: String,
    pub element_stroke: String,
    pub edge_label_background: String,
    pub selection_color: String,
}

impl Theme {
    pub fn c4_default() -> Self {
        Self {
            font_family: "Arial, Helvetica, sans-serif".to_string(),
            font_size: 10.0,
            background: "#FFFFFF".to_string(),
            primary_text_color: "#000000".to_string(),
            secondary_text_color: "#666666".to_string(),
            line_color: "#707070".to_string(),
            element_stroke: "#000000".to_string(),
            edge_label_background: "#FFFFFF".to_string(),
            selection_color: "#0066cc".to_string(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 10.0,
            background: "#F8FAFF".to_string(),
            primary_text_color: "#1C2430".to_string(),
            secondary_text_color: "#5B6B82".to_string(),
            line_color: "#7A8AA6".to_string(),
            element_stroke: "#1C2430".to_string(),
            edge_label_background: "#FFFFFF".to_string(),
            selection_color: "#2563EB".to_string(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::c4_default()
    }
}
