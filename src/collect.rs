use crate::filter::Filters;
use crate::ir::{Element, ElementKind, Relationship};
use crate::model::{Model, RelationshipRecord, Tags, ViewRecord, Workspace};
use log::{debug, trace};
use std::collections::HashSet;

/// Elements and relationships that survive filtering for one view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewContents {
    pub elements: Vec<Element>,
    pub relationships: Vec<Relationship>,
}

impl ViewContents {
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|element| element.id == id)
    }
}

/// Runs both collection passes: category filtering, then endpoint validation
/// against the visible element set.
pub fn collect_view(workspace: &Workspace, view: &ViewRecord, filters: &Filters) -> ViewContents {
    let elements = collect_elements(workspace, view, filters);
    let mut relationships = collect_relationships(workspace, view, filters);
    let before = relationships.len();
    retain_connected(&mut relationships, &elements);
    debug!(
        view = view.key.as_str(),
        elements = elements.len(),
        relationships = relationships.len(),
        dangling = before - relationships.len();
        "Collected view contents"
    );
    ViewContents {
        elements,
        relationships,
    }
}

pub fn collect_elements(workspace: &Workspace, view: &ViewRecord, filters: &Filters) -> Vec<Element> {
    let in_view: HashSet<&str> = view.elements.iter().map(|r| r.id.as_str()).collect();
    let model = &workspace.model;
    let mut out = Vec::new();

    if filters.person {
        for person in &model.people {
            if in_view.contains(person.id.as_str()) {
                out.push(element(
                    &person.id,
                    &person.name,
                    ElementKind::Person,
                    None,
                    person.description.as_ref(),
                    &person.tags,
                    None,
                ));
            }
        }
    }

    for system in &model.software_systems {
        if in_view.contains(system.id.as_str())
            && filters.software_system
            && (!system.is_external() || filters.external)
        {
            out.push(element(
                &system.id,
                &system.name,
                ElementKind::SoftwareSystem,
                None,
                system.description.as_ref(),
                &system.tags,
                None,
            ));
        }

        for container in &system.containers {
            if in_view.contains(container.id.as_str()) && container_visible(&container.tags, filters) {
                out.push(element(
                    &container.id,
                    &container.name,
                    ElementKind::Container,
                    container.technology.as_ref(),
                    container.description.as_ref(),
                    &container.tags,
                    Some(&system.id),
                ));
            }

            if !filters.component {
                continue;
            }
            for component in &container.components {
                if in_view.contains(component.id.as_str()) {
                    out.push(element(
                        &component.id,
                        &component.name,
                        ElementKind::Component,
                        component.technology.as_ref(),
                        component.description.as_ref(),
                        &component.tags,
                        Some(&container.id),
                    ));
                }
            }
        }
    }

    trace!(view = view.key.as_str(), count = out.len(); "Visible elements");
    out
}

fn container_visible(tags: &Tags, filters: &Filters) -> bool {
    let database = tags.contains("Database");
    let external = tags.contains("External");
    (!database && !external && filters.container)
        || (database && filters.database)
        || (external && filters.external)
}

fn element(
    id: &str,
    name: &str,
    kind: ElementKind,
    technology: Option<&String>,
    description: Option<&String>,
    tags: &Tags,
    parent_id: Option<&String>,
) -> Element {
    Element {
        id: id.to_string(),
        name: name.to_string(),
        kind,
        technology: technology.cloned(),
        description: description.cloned(),
        tags: tags.0.clone(),
        parent_id: parent_id.cloned(),
    }
}

/// Every relationship declared in the model, in declaration order: model-level
/// entries first, then the ones nested under their source elements. The first
/// declaration of an id wins.
pub fn model_relationships(model: &Model) -> Vec<&RelationshipRecord> {
    let mut nested: Vec<&RelationshipRecord> = model.relationships.iter().collect();
    for person in &model.people {
        nested.extend(person.relationships.iter());
    }
    for system in &model.software_systems {
        nested.extend(system.relationships.iter());
        for container in &system.containers {
            nested.extend(container.relationships.iter());
            for component in &container.components {
                nested.extend(component.relationships.iter());
            }
        }
    }

    let mut seen = HashSet::new();
    nested.retain(|rel| seen.insert(rel.id.as_str()));
    nested
}

pub fn collect_relationships(
    workspace: &Workspace,
    view: &ViewRecord,
    filters: &Filters,
) -> Vec<Relationship> {
    let in_view: HashSet<&str> = view.relationships.iter().map(|r| r.id.as_str()).collect();
    model_relationships(&workspace.model)
        .into_iter()
        .filter(|record| in_view.contains(record.id.as_str()))
        .map(|record| Relationship {
            id: record.id.clone(),
            source_id: record.source_id.clone(),
            destination_id: record.destination_id.clone(),
            description: record.description.clone(),
            technology: record.technology.clone(),
            tags: record.tags.0.clone(),
            interaction_style: record.interaction_style.clone(),
        })
        .filter(|rel| {
            if rel.is_asynchronous() {
                filters.asynchronous
            } else {
                filters.synchronous
            }
        })
        .collect()
}

/// Drops relationships whose source or destination is not visible.
pub fn retain_connected(relationships: &mut Vec<Relationship>, elements: &[Element]) {
    let visible: HashSet<&str> = elements.iter().map(|e| e.id.as_str()).collect();
    relationships.retain(|rel| {
        let keep = visible.contains(rel.source_id.as_str())
            && visible.contains(rel.destination_id.as_str());
        if !keep {
            trace!(relationship = rel.id.as_str(); "Dropping relationship with hidden endpoint");
        }
        keep
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        ComponentRecord, ContainerRecord, PersonRecord, SoftwareSystemRecord, ViewRef,
    };

    fn refs(ids: &[&str]) -> Vec<ViewRef> {
        ids.iter().map(|id| ViewRef { id: id.to_string() }).collect()
    }

    fn rel(id: &str, from: &str, to: &str, tags: &str) -> RelationshipRecord {
        RelationshipRecord {
            id: id.to_string(),
            source_id: from.to_string(),
            destination_id: to.to_string(),
            tags: Tags::parse(tags),
            ..RelationshipRecord::default()
        }
    }

    fn fixture() -> (Workspace, ViewRecord) {
        let mut ws = Workspace::default();
        ws.model.people.push(PersonRecord {
            id: "u".into(),
            name: "User".into(),
            tags: Tags::parse("Element,Person"),
            relationships: vec![rel("r1", "u", "s", "Relationship")],
            ..PersonRecord::default()
        });
        ws.model.software_systems.push(SoftwareSystemRecord {
            id: "s".into(),
            name: "Shop".into(),
            containers: vec![
                ContainerRecord {
                    id: "api".into(),
                    name: "API".into(),
                    tags: Tags::parse("Element,Container"),
                    components: vec![ComponentRecord {
                        id: "ctl".into(),
                        name: "Controller".into(),
                        ..ComponentRecord::default()
                    }],
                    relationships: vec![rel("r2", "api", "db", "Relationship,Asynchronous")],
                    ..ContainerRecord::default()
                },
                ContainerRecord {
                    id: "db".into(),
                    name: "Store".into(),
                    tags: Tags::parse("Element,Container,Database"),
                    ..ContainerRecord::default()
                },
                ContainerRecord {
                    id: "ext".into(),
                    name: "Mailer".into(),
                    tags: Tags::parse("Element,Container,External"),
                    ..ContainerRecord::default()
                },
            ],
            ..SoftwareSystemRecord::default()
        });
        ws.model.software_systems.push(SoftwareSystemRecord {
            id: "pay".into(),
            name: "Payments".into(),
            location: Some("External".into()),
            ..SoftwareSystemRecord::default()
        });
        ws.model.relationships.push(rel("r3", "api", "pay", ""));
        let view = ViewRecord {
            key: "v".into(),
            elements: refs(&["u", "s", "api", "db", "ext", "ctl", "pay"]),
            relationships: refs(&["r1", "r2", "r3"]),
            ..ViewRecord::default()
        };
        (ws, view)
    }

    fn ids(elements: &[Element]) -> Vec<&str> {
        elements.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn walks_hierarchy_in_order_with_parents() {
        let (ws, view) = fixture();
        let elements = collect_elements(&ws, &view, &Filters::default());
        assert_eq!(ids(&elements), vec!["u", "s", "api", "ctl", "db", "ext", "pay"]);
        let ctl = elements.iter().find(|e| e.id == "ctl").unwrap();
        assert_eq!(ctl.parent_id.as_deref(), Some("api"));
        assert_eq!(ctl.kind, ElementKind::Component);
    }

    #[test]
    fn container_rule_is_any_of_three_clauses() {
        let (ws, view) = fixture();
        let filters = Filters {
            container: false,
            ..Filters::default()
        };
        let elements = collect_elements(&ws, &view, &filters);
        assert!(!ids(&elements).contains(&"api"));
        assert!(ids(&elements).contains(&"db"));
        assert!(ids(&elements).contains(&"ext"));

        let filters = Filters {
            database: false,
            ..Filters::default()
        };
        assert!(!ids(&collect_elements(&ws, &view, &filters)).contains(&"db"));
    }

    #[test]
    fn external_filter_hides_external_systems() {
        let (ws, view) = fixture();
        let filters = Filters {
            external: false,
            ..Filters::default()
        };
        let elements = collect_elements(&ws, &view, &filters);
        assert!(!ids(&elements).contains(&"pay"));
        assert!(!ids(&elements).contains(&"ext"));
        assert!(ids(&elements).contains(&"s"));
    }

    #[test]
    fn gathers_model_level_and_nested_relationships() {
        let (ws, _) = fixture();
        let all: Vec<&str> = model_relationships(&ws.model)
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(all, vec!["r3", "r1", "r2"]);
    }

    #[test]
    fn interaction_filters_and_endpoint_pass() {
        let (ws, view) = fixture();
        let filters = Filters {
            asynchronous: false,
            ..Filters::default()
        };
        let rels = collect_relationships(&ws, &view, &filters);
        assert!(rels.iter().all(|r| r.id != "r2"));

        let filters = Filters {
            external: false,
            ..Filters::default()
        };
        let contents = collect_view(&ws, &view, &filters);
        let rel_ids: Vec<&str> = contents.relationships.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(rel_ids, vec!["r1", "r2"]);
    }

    #[test]
    fn view_scoping_limits_both_sets() {
        let (ws, mut view) = fixture();
        view.elements = refs(&["u", "s"]);
        view.relationships = refs(&["r1", "r2"]);
        let contents = collect_view(&ws, &view, &Filters::default());
        assert_eq!(ids(&contents.elements), vec!["u", "s"]);
        assert_eq!(contents.relationships.len(), 1);
        assert_eq!(contents.relationships[0].id, "r1");
    }
}
