use crate::scene::Scene;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub view: Option<String>,
    pub width: f32,
    pub height: f32,
    pub elements: Vec<ElementDump>,
    pub relationships: Vec<RelationshipDump>,
}

#[derive(Debug, Serialize)]
pub struct ElementDump {
    pub id: String,
    pub kind: String,
    pub shape: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub text: Vec<String>,
    pub selected: bool,
}

#[derive(Debug, Serialize)]
pub struct RelationshipDump {
    pub id: String,
    pub from: String,
    pub to: String,
    pub dashed: bool,
    pub points: Vec<[f32; 2]>,
    pub label: Option<String>,
}

impl LayoutDump {
    pub fn from_scene(scene: &Scene) -> Self {
        let elements = scene
            .nodes
            .iter()
            .map(|node| ElementDump {
                id: node.id.clone(),
                kind: node.kind.as_str().to_string(),
                shape: node.geometry.name().to_string(),
                x: node.bounds.x,
                y: node.bounds.y,
                width: node.bounds.width,
                height: node.bounds.height,
                text: node.texts.iter().map(|t| t.content.clone()).collect(),
                selected: node.highlight.is_some(),
            })
            .collect();

        let relationships = scene
            .edges
            .iter()
            .map(|edge| RelationshipDump {
                id: edge.id.clone(),
                from: edge.source_id.clone(),
                to: edge.destination_id.clone(),
                dashed: edge.dashed,
                points: vec![[edge.start.0, edge.start.1], [edge.end.0, edge.end.1]],
                label: edge.label.as_ref().map(|label| label.text.content.clone()),
            })
            .collect();

        LayoutDump {
            view: scene.view_key.clone(),
            width: scene.width,
            height: scene.height,
            elements,
            relationships,
        }
    }
}

pub fn write_layout_dump(path: &Path, scene: &Scene) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_scene(scene);
    serde_json::to_writer_pretty(writer, &dump)?;
    log::info!(path:% = path.display(), elements = dump.elements.len(); "Wrote layout dump");
    Ok(())
}
