use crate::model::Workspace;
use log::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("workspace input is empty")]
    Empty,
    #[error("invalid workspace JSON at line {line}, column {column}: {message}")]
    Json {
        line: usize,
        column: usize,
        message: String,
    },
}

/// Parses a workspace document. Strict JSON is tried first; on failure the
/// input is re-read as JSON5 so hand-edited files with comments or trailing
/// commas still load. The reported error is always the strict parser's.
pub fn parse_workspace(input: &str) -> Result<Workspace, ParseError> {
    if input.trim().is_empty() {
        return Err(ParseError::Empty);
    }
    let workspace = match serde_json::from_str::<Workspace>(input) {
        Ok(workspace) => workspace,
        Err(strict) => match json5::from_str::<Workspace>(input) {
            Ok(workspace) => {
                debug!("Workspace parsed with JSON5 fallback");
                workspace
            }
            Err(_) => {
                return Err(ParseError::Json {
                    line: strict.line(),
                    column: strict.column(),
                    message: strict.to_string(),
                });
            }
        },
    };
    info!(
        name = workspace.name.as_deref().unwrap_or(""),
        people = workspace.model.people.len(),
        systems = workspace.model.software_systems.len();
        "Parsed workspace"
    );
    Ok(workspace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_structurizr_shape() {
        let ws = parse_workspace(
            r#"{
                "name": "Shop",
                "model": {
                    "people": [{ "id": "1", "name": "Customer", "tags": "Element,Person" }],
                    "softwareSystems": [{
                        "id": "2", "name": "Shop",
                        "containers": [{
                            "id": "3", "name": "DB", "technology": "Postgres",
                            "tags": "Element,Container,Database"
                        }]
                    }]
                },
                "views": {
                    "containerViews": [{ "key": "c", "elements": [{ "id": "3" }] }],
                    "configuration": { "styles": { "elements": [{ "tag": "Person", "background": "lime" }] } }
                }
            }"#,
        )
        .unwrap();
        assert_eq!(ws.model.people[0].name, "Customer");
        assert!(ws.model.software_systems[0].containers[0].tags.contains("Database"));
        assert_eq!(ws.views.container_views[0].elements[0].id, "3");
        assert_eq!(ws.views.configuration.styles.elements.len(), 1);
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let ws = parse_workspace("{}").unwrap();
        assert!(ws.model.people.is_empty());
        assert!(ws.views.dynamic_views.is_empty());
        assert!(ws.documentation.decisions.is_empty());
    }

    #[test]
    fn accepts_json5_input() {
        let ws = parse_workspace(
            "{\n  // hand edited\n  name: 'Edited',\n  model: { people: [{ id: 'p', name: 'P' },] },\n}",
        )
        .unwrap();
        assert_eq!(ws.name.as_deref(), Some("Edited"));
        assert_eq!(ws.model.people.len(), 1);
    }

    #[test]
    fn reports_empty_and_malformed_input() {
        assert!(matches!(parse_workspace("  "), Err(ParseError::Empty)));
        let err = parse_workspace("{ \"model\": [ }").unwrap_err();
        assert!(matches!(err, ParseError::Json { line: 1, .. }));
    }
}
