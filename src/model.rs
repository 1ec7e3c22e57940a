//! Workspace document as delivered by the host (Structurizr-style JSON).
//!
//! Every collection is optional in the wire format; missing arrays and objects
//! deserialize to empty values so downstream code never has to special-case
//! absent sections.

use crate::style::{TaggedElementStyle, TaggedRelationshipStyle};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Workspace {
    pub name: Option<String>,
    pub description: Option<String>,
    pub model: Model,
    pub views: Views,
    pub documentation: Documentation,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Model {
    pub people: Vec<PersonRecord>,
    pub software_systems: Vec<SoftwareSystemRecord>,
    /// Model-level relationships. Structurizr usually nests relationships under
    /// their source element instead; both places are read.
    pub relationships: Vec<RelationshipRecord>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PersonRecord {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub tags: Tags,
    pub location: Option<String>,
    pub relationships: Vec<RelationshipRecord>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SoftwareSystemRecord {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub tags: Tags,
    pub location: Option<String>,
    pub containers: Vec<ContainerRecord>,
    pub relationships: Vec<RelationshipRecord>,
}

impl SoftwareSystemRecord {
    pub fn is_external(&self) -> bool {
        self.tags.contains("External") || self.location.as_deref() == Some("External")
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContainerRecord {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub technology: Option<String>,
    pub tags: Tags,
    pub components: Vec<ComponentRecord>,
    pub relationships: Vec<RelationshipRecord>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ComponentRecord {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub technology: Option<String>,
    pub tags: Tags,
    pub relationships: Vec<RelationshipRecord>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RelationshipRecord {
    pub id: String,
    pub source_id: String,
    pub destination_id: String,
    pub description: Option<String>,
    pub technology: Option<String>,
    pub tags: Tags,
    pub interaction_style: Option<String>,
}

/// Ordered tag list.
///
/// Structurizr serializes tags as one comma-separated string
/// (`"Element,Container,Database"`); some producers emit a JSON array instead.
/// Both forms are accepted. Empty and whitespace-only entries are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "RawTags")]
pub struct Tags(pub Vec<String>);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTags {
    Joined(String),
    List(Vec<String>),
    Other(serde::de::IgnoredAny),
}

impl From<RawTags> for Tags {
    fn from(raw: RawTags) -> Self {
        match raw {
            RawTags::Joined(joined) => Tags::parse(&joined),
            RawTags::List(list) => Tags(
                list.iter()
                    .map(|tag| tag.trim())
                    .filter(|tag| !tag.is_empty())
                    .map(str::to_string)
                    .collect(),
            ),
            RawTags::Other(_) => Tags::default(),
        }
    }
}

impl Tags {
    pub fn parse(joined: &str) -> Self {
        Tags(
            joined
                .split(',')
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|t| t == tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Views {
    pub system_landscape_views: Vec<ViewRecord>,
    pub system_context_views: Vec<ViewRecord>,
    pub container_views: Vec<ViewRecord>,
    pub component_views: Vec<ViewRecord>,
    pub deployment_views: Vec<ViewRecord>,
    pub dynamic_views: Vec<ViewRecord>,
    pub configuration: ViewConfiguration,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewRecord {
    pub key: String,
    pub description: Option<String>,
    pub software_system_id: Option<String>,
    pub container_id: Option<String>,
    pub elements: Vec<ViewRef>,
    pub relationships: Vec<ViewRef>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ViewRef {
    pub id: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewConfiguration {
    pub styles: StyleSet,
    pub element_styles: Vec<TaggedElementStyle>,
    pub relationship_styles: Vec<TaggedRelationshipStyle>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct StyleSet {
    pub elements: Vec<TaggedElementStyle>,
    pub relationships: Vec<TaggedRelationshipStyle>,
}

impl ViewConfiguration {
    pub fn element_styles(&self) -> impl Iterator<Item = &TaggedElementStyle> {
        self.styles.elements.iter().chain(self.element_styles.iter())
    }

    pub fn relationship_styles(&self) -> impl Iterator<Item = &TaggedRelationshipStyle> {
        self.styles
            .relationships
            .iter()
            .chain(self.relationship_styles.iter())
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Documentation {
    pub sections: Vec<DocumentationSection>,
    pub decisions: Vec<Decision>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct DocumentationSection {
    pub title: Option<String>,
    pub content: String,
    pub format: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Decision {
    pub id: String,
    pub title: String,
    pub status: String,
    pub date: Option<String>,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_accept_joined_string_and_list() {
        let joined: Tags = serde_json::from_str(r#""Element, Container ,,Database""#).unwrap();
        assert_eq!(joined.0, vec!["Element", "Container", "Database"]);

        let list: Tags = serde_json::from_str(r#"["Element", " ", "Person"]"#).unwrap();
        assert_eq!(list.0, vec!["Element", "Person"]);

        let missing: Tags = serde_json::from_str("null").unwrap();
        assert!(missing.is_empty());
    }

    #[test]
    fn malformed_tags_become_empty() {
        let number: Tags = serde_json::from_str("42").unwrap();
        assert!(number.is_empty());
        let object: Tags = serde_json::from_str(r#"{"a": 1}"#).unwrap();
        assert!(object.is_empty());

        let ws: Workspace =
            serde_json::from_str(r#"{"model":{"people":[{"id":"p","name":"P","tags":42}]}}"#).unwrap();
        assert_eq!(ws.model.people[0].id, "p");
        assert!(ws.model.people[0].tags.is_empty());
    }

    #[test]
    fn external_system_by_tag_or_location() {
        let mut sys = SoftwareSystemRecord::default();
        assert!(!sys.is_external());
        sys.location = Some("External".to_string());
        assert!(sys.is_external());
        sys.location = None;
        sys.tags = Tags::parse("Element,External");
        assert!(sys.is_external());
    }

    #[test]
    fn tag_membership_is_exact() {
        let tags = Tags::parse("Externally Hosted");
        assert!(!tags.contains("External"));
    }
}
