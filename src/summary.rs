//! Condensed overview of a workspace's primary software system.

use crate::collect::model_relationships;
use crate::model::{ContainerRecord, Workspace};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchitectureSummary {
    pub system_name: String,
    pub services: Vec<ServiceSummary>,
    pub infrastructure: InfrastructureSummary,
    pub documentation: String,
    pub decisions: Vec<DecisionSummary>,
}

impl ArchitectureSummary {
    pub fn is_empty(&self) -> bool {
        self.system_name.is_empty() && self.services.is_empty() && self.decisions.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSummary {
    pub name: String,
    pub description: Option<String>,
    pub technology: Option<String>,
    /// Technology of the first database the service (or one of its components) talks to.
    pub database: Option<String>,
    pub dependencies: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InfrastructureSummary {
    pub compute: Vec<String>,
    pub storage: Vec<String>,
    pub networking: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionSummary {
    pub id: String,
    pub title: String,
    pub status: String,
    pub date: Option<String>,
}

pub fn summarize(workspace: &Workspace) -> ArchitectureSummary {
    let decisions = workspace
        .documentation
        .decisions
        .iter()
        .map(|decision| DecisionSummary {
            id: decision.id.clone(),
            title: decision.title.clone(),
            status: decision.status.clone(),
            date: decision.date.clone(),
        })
        .collect();
    let documentation = workspace
        .documentation
        .sections
        .first()
        .map(|section| section.content.clone())
        .unwrap_or_default();

    let Some(system) = workspace.model.software_systems.first() else {
        return ArchitectureSummary {
            documentation,
            decisions,
            ..ArchitectureSummary::default()
        };
    };

    let names = element_names(workspace);
    let relationships = model_relationships(&workspace.model);
    let containers = &system.containers;

    let services = containers
        .iter()
        .filter(|c| c.tags.contains("Microservice") || c.tags.contains("Container"))
        .filter(|c| !c.tags.contains("Database") && !c.tags.contains("Infrastructure"))
        .map(|container| {
            let mut dependencies: Vec<String> = Vec::new();
            for rel in relationships.iter().filter(|r| r.source_id == container.id) {
                let name = names
                    .get(rel.destination_id.as_str())
                    .map(|name| name.to_string())
                    .unwrap_or_else(|| rel.destination_id.clone());
                if !dependencies.contains(&name) {
                    dependencies.push(name);
                }
            }
            ServiceSummary {
                name: container.name.clone(),
                description: container.description.clone(),
                technology: container.technology.clone(),
                database: database_technology(container, containers),
                dependencies,
            }
        })
        .collect();

    let tagged = |tag: &str| -> Vec<String> {
        containers
            .iter()
            .filter(|c| c.tags.contains(tag))
            .map(|c| c.name.clone())
            .filter(|name| !name.is_empty())
            .collect()
    };

    let mut networking = Vec::new();
    for container in containers {
        let lower = container.name.to_lowercase();
        let gateway = container.tags.contains("Gateway") || lower.contains("gateway");
        let balancer = container.tags.contains("LoadBalancer") || lower.contains("balancer");
        if (gateway || balancer) && !networking.contains(&container.name) {
            networking.push(container.name.clone());
        }
    }

    ArchitectureSummary {
        system_name: system.name.clone(),
        services,
        infrastructure: InfrastructureSummary {
            compute: tagged("Infrastructure"),
            storage: tagged("Database"),
            networking,
        },
        documentation,
        decisions,
    }
}

fn element_names(workspace: &Workspace) -> HashMap<&str, &str> {
    let mut names = HashMap::new();
    for person in &workspace.model.people {
        names.insert(person.id.as_str(), person.name.as_str());
    }
    for system in &workspace.model.software_systems {
        names.insert(system.id.as_str(), system.name.as_str());
        for container in &system.containers {
            names.insert(container.id.as_str(), container.name.as_str());
            for component in &container.components {
                names.insert(component.id.as_str(), component.name.as_str());
            }
        }
    }
    names
}

fn database_technology(container: &ContainerRecord, siblings: &[ContainerRecord]) -> Option<String> {
    container
        .relationships
        .iter()
        .chain(container.components.iter().flat_map(|c| c.relationships.iter()))
        .find_map(|rel| {
            siblings
                .iter()
                .find(|c| c.id == rel.destination_id && c.tags.contains("Database"))
        })
        .and_then(|db| db.technology.clone())
}
