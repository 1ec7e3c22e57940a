use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementKind {
    Person,
    SoftwareSystem,
    Container,
    Component,
}

impl ElementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::SoftwareSystem => "softwareSystem",
            Self::Container => "container",
            Self::Component => "component",
        }
    }
}

/// A model element flattened out of the workspace hierarchy for one view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: String,
    pub name: String,
    pub kind: ElementKind,
    pub technology: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    /// Owning system (for containers) or container (for components).
    pub parent_id: Option<String>,
}

impl Element {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub id: String,
    pub source_id: String,
    pub destination_id: String,
    pub description: Option<String>,
    pub technology: Option<String>,
    pub tags: Vec<String>,
    pub interaction_style: Option<String>,
}

impl Relationship {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn is_asynchronous(&self) -> bool {
        self.has_tag("Asynchronous") || self.interaction_style.as_deref() == Some("Asynchronous")
    }
}
